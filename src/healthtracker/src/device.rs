use std::{
    collections::{BTreeSet, HashSet},
    time::Duration,
};

use btleplug::{
    api::{CharPropFlags, Central, Characteristic, Peripheral as _, ScanFilter, ValueNotification},
    platform::{Adapter, Peripheral},
};
use futures::StreamExt;
use healthtracker_codec::constants::{
    HEART_RATE_MEASUREMENT, HEART_RATE_SERVICE, SPO2_MEASUREMENT, SPO2_SERVICE,
};
use healthtracker_db::DatabaseHandler;
use tokio::{sync::mpsc, time::sleep};
use uuid::Uuid;

use crate::tracker::TrackerEvent;

/// What a scan is looking for.
#[derive(Debug, Clone)]
pub enum ScanTarget {
    /// Print every heart-rate device seen during the window.
    List(Duration),
    /// Match on the device address (or its advertised name on platforms that hide addresses).
    Device(String),
    /// First device whose advertised name contains the text.
    NameContains(String),
}

impl ScanTarget {
    pub fn matches(&self, address: &str, name: Option<&str>) -> bool {
        match self {
            ScanTarget::List(_) => false,
            ScanTarget::Device(id) => {
                address.eq_ignore_ascii_case(id) || name.is_some_and(|name| name == id)
            }
            ScanTarget::NameContains(filter) => name.is_some_and(|name| name.contains(filter.as_str())),
        }
    }
}

fn heart_rate_scan_filter() -> ScanFilter {
    ScanFilter {
        services: vec![HEART_RATE_SERVICE],
    }
}

fn is_heart_rate_device(services: &[Uuid]) -> bool {
    services.contains(&HEART_RATE_SERVICE)
}

/// Scans heart-rate devices until `target` is found. `ScanTarget::List` prints
/// what it sees and returns `None` once its window has passed.
pub async fn scan(adapter: &Adapter, target: &ScanTarget) -> anyhow::Result<Option<Peripheral>> {
    adapter.start_scan(heart_rate_scan_filter()).await?;
    let started = tokio::time::Instant::now();
    let mut seen = HashSet::new();

    loop {
        let peripherals = adapter.peripherals().await?;

        for peripheral in peripherals {
            let Some(properties) = peripheral.properties().await? else {
                continue;
            };

            if !is_heart_rate_device(&properties.services) {
                continue;
            }

            let address = properties.address.to_string();
            let name = properties.local_name.as_deref();

            if let ScanTarget::List(_) = target {
                if seen.insert(address.clone()) {
                    println!("Address: {}", address);
                    println!("Name: {}", name.unwrap_or("Unknown"));
                    println!("RSSI: {:?}", properties.rssi);
                    println!();
                }
                continue;
            }

            if target.matches(&address, name) {
                info!("Found {} ({})", name.unwrap_or("Unknown"), address);
                adapter.stop_scan().await?;
                return Ok(Some(peripheral));
            }
        }

        if let ScanTarget::List(window) = target {
            if started.elapsed() >= *window {
                adapter.stop_scan().await?;
                return Ok(None);
            }
        }

        sleep(Duration::from_secs(1)).await;
    }
}

enum Wake {
    Closed,
    Silent,
    Notification(Option<ValueNotification>),
}

/// A connected ring. Owns its peripheral handle; nothing about the connection
/// is shared process-wide.
pub struct RingDevice {
    peripheral: Peripheral,
    capture: Option<DatabaseHandler>,
    subscribed: Vec<(Uuid, Uuid)>,
}

impl RingDevice {
    const SILENCE_TIMEOUT: Duration = Duration::from_secs(10);
    const RECONNECT_ATTEMPTS: usize = 5;

    /// `capture` stores every raw notification when set.
    pub fn new(peripheral: Peripheral, capture: Option<DatabaseHandler>) -> Self {
        Self {
            peripheral,
            capture,
            subscribed: Vec::new(),
        }
    }

    pub fn device_id(&self) -> String {
        self.peripheral.address().to_string()
    }

    pub async fn connect(&mut self) -> anyhow::Result<()> {
        self.peripheral.connect().await?;
        self.peripheral.discover_services().await?;
        Ok(())
    }

    pub async fn is_connected(&self) -> anyhow::Result<bool> {
        let is_connected = self.peripheral.is_connected().await?;
        Ok(is_connected)
    }

    fn create_char(service: Uuid, characteristic: Uuid) -> Characteristic {
        Characteristic {
            uuid: characteristic,
            service_uuid: service,
            properties: CharPropFlags::empty(),
            descriptors: BTreeSet::new(),
        }
    }

    async fn subscribe(&mut self, service: Uuid, characteristic: Uuid) -> anyhow::Result<()> {
        self.peripheral
            .subscribe(&Self::create_char(service, characteristic))
            .await?;
        if !self.subscribed.contains(&(service, characteristic)) {
            self.subscribed.push((service, characteristic));
        }
        Ok(())
    }

    pub async fn subscribe_heart_rate(&mut self) -> anyhow::Result<()> {
        self.subscribe(HEART_RATE_SERVICE, HEART_RATE_MEASUREMENT).await
    }

    pub async fn subscribe_spo2(&mut self) -> anyhow::Result<()> {
        self.subscribe(SPO2_SERVICE, SPO2_MEASUREMENT).await
    }

    async fn resubscribe(&mut self) -> anyhow::Result<()> {
        for (service, characteristic) in self.subscribed.clone() {
            self.subscribe(service, characteristic).await?;
        }
        Ok(())
    }

    /// Forwards notifications into `events` until the receiver is dropped,
    /// the stream ends, or reconnecting fails.
    pub async fn stream_into(&mut self, events: mpsc::Sender<TrackerEvent>) -> anyhow::Result<()> {
        let device_id = self.device_id();
        let mut notifications = self.peripheral.notifications().await?;

        loop {
            let wake = tokio::select! {
                _ = events.closed() => Wake::Closed,
                _ = sleep(Self::SILENCE_TIMEOUT) => Wake::Silent,
                notification = notifications.next() => Wake::Notification(notification),
            };

            match wake {
                Wake::Closed => break,
                Wake::Notification(None) => {
                    warn!("Notification stream from {} ended", device_id);
                    break;
                }
                Wake::Notification(Some(notification)) => {
                    if let Some(database) = &self.capture {
                        database
                            .create_packet(notification.uuid, notification.value.clone())
                            .await?;
                    }

                    let event = TrackerEvent::Notification {
                        device_id: device_id.clone(),
                        uuid: notification.uuid,
                        payload: notification.value,
                    };
                    if events.send(event).await.is_err() {
                        break;
                    }
                }
                Wake::Silent => {
                    if self.is_connected().await? {
                        warn!(
                            "No data from {} in {} seconds",
                            device_id,
                            Self::SILENCE_TIMEOUT.as_secs()
                        );
                        continue;
                    }

                    error!("Ring {} disconnected", device_id);
                    if !self.reconnect().await? {
                        break;
                    }
                    notifications = self.peripheral.notifications().await?;
                }
            }
        }

        Ok(())
    }

    async fn reconnect(&mut self) -> anyhow::Result<bool> {
        for attempt in 1..=Self::RECONNECT_ATTEMPTS {
            if self.connect().await.is_ok() {
                self.resubscribe().await?;
                info!("Reconnected after {} attempt(s)", attempt);
                return Ok(true);
            }

            sleep(Self::SILENCE_TIMEOUT).await;
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_filter_matches_substring() {
        let target = ScanTarget::NameContains("Ring".to_string());
        assert!(target.matches("AA:BB:CC:DD:EE:FF", Some("Smart Ring R02")));
        assert!(!target.matches("AA:BB:CC:DD:EE:FF", Some("Band 7")));
        assert!(!target.matches("AA:BB:CC:DD:EE:FF", None));
    }

    #[test]
    fn device_matches_address_case_insensitively() {
        let target = ScanTarget::Device("aa:bb:cc:dd:ee:ff".to_string());
        assert!(target.matches("AA:BB:CC:DD:EE:FF", None));
        assert!(!target.matches("AA:BB:CC:DD:EE:00", Some("Ring")));
    }

    #[test]
    fn device_matches_exact_name() {
        let target = ScanTarget::Device("R02_1A2B".to_string());
        assert!(target.matches("00:00:00:00:00:00", Some("R02_1A2B")));
        assert!(!target.matches("00:00:00:00:00:00", Some("R02_1A2B_X")));
    }

    #[test]
    fn scan_filter_asks_for_heart_rate_service() {
        assert_eq!(heart_rate_scan_filter().services, vec![HEART_RATE_SERVICE]);
    }

    #[test]
    fn only_heart_rate_devices_are_considered() {
        assert!(is_heart_rate_device(&[SPO2_SERVICE, HEART_RATE_SERVICE]));
        assert!(!is_heart_rate_device(&[SPO2_SERVICE]));
        assert!(!is_heart_rate_device(&[]));
    }

    #[test]
    fn list_never_matches() {
        let target = ScanTarget::List(Duration::from_secs(8));
        assert!(!target.matches("AA:BB:CC:DD:EE:FF", Some("Ring")));
    }
}
