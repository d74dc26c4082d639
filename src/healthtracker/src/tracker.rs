use chrono::NaiveDateTime;
use healthtracker_algos::{WorkoutMetricsEngine, WorkoutSession};
use healthtracker_codec::{CodecError, RingData, payload_hex};
use healthtracker_types::profile::UserProfile;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Messages consumed by a [`WorkoutTracker`], published by the device stream,
/// the tick timer and the stop signal.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    Notification {
        device_id: String,
        uuid: Uuid,
        payload: Vec<u8>,
    },
    Tick(NaiveDateTime),
    Stop,
}

/// Drives `source` to completion, then publishes `Stop` so the consumer does
/// not outlive the device, whether the source finished cleanly or failed.
pub async fn stop_after<F>(events: mpsc::Sender<TrackerEvent>, source: F)
where
    F: Future<Output = anyhow::Result<()>>,
{
    if let Err(error) = source.await {
        error!("{}", error);
    }

    if events.send(TrackerEvent::Stop).await.is_err() {
        debug!("Tracker already finished");
    }
}

/// Publishes `Stop` from a thread outside the runtime, such as a signal
/// handler. Waits for room in a full channel instead of dropping the request.
pub fn request_stop(events: &mpsc::Sender<TrackerEvent>) {
    if let Err(error) = events.blocking_send(TrackerEvent::Stop) {
        warn!("Stop request not delivered: {}", error);
    }
}

/// Single consumer of [`TrackerEvent`]s. Owning the engine here keeps every
/// decode and tick on one task.
pub struct WorkoutTracker {
    engine: WorkoutMetricsEngine,
    latest_heart_rate: u16,
}

impl WorkoutTracker {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            engine: WorkoutMetricsEngine::new(profile),
            latest_heart_rate: 0,
        }
    }

    pub fn engine(&self) -> &WorkoutMetricsEngine {
        &self.engine
    }

    pub fn latest_heart_rate(&self) -> u16 {
        self.latest_heart_rate
    }

    /// Starts a workout at `start` and drives it until `Stop` arrives or every
    /// sender is gone. `on_tick` sees the session after each tick.
    pub async fn run<F>(
        &mut self,
        events: &mut mpsc::Receiver<TrackerEvent>,
        start: NaiveDateTime,
        mut on_tick: F,
    ) -> Option<WorkoutSession>
    where
        F: FnMut(&WorkoutSession),
    {
        self.engine.start(start);
        info!("Workout started at {}", start);

        while let Some(event) = events.recv().await {
            match event {
                TrackerEvent::Notification {
                    device_id,
                    uuid,
                    payload,
                } => self.handle_notification(&device_id, uuid, &payload),
                TrackerEvent::Tick(now) => {
                    if let Some(session) = self.engine.tick(self.latest_heart_rate, now) {
                        on_tick(session);
                    }
                }
                TrackerEvent::Stop => break,
            }
        }

        let session = self.engine.stop();
        self.latest_heart_rate = 0;
        if let Some(session) = &session {
            info!(
                "Workout finished after {} s, {} steps",
                session.elapsed_seconds, session.step_estimate
            );
        }
        session
    }

    pub fn handle_notification(&mut self, device_id: &str, uuid: Uuid, payload: &[u8]) {
        match RingData::from_notification(uuid, payload) {
            Ok(RingData::HeartRate(sample)) => {
                trace!("{}: {}", device_id, sample);
                self.latest_heart_rate = sample.bpm;
            }
            Ok(RingData::SpO2(sample)) => {
                debug!("{}: {}", device_id, sample);
            }
            Err(error @ CodecError::InvalidFrame { .. }) => {
                warn!(
                    "{}: dropping frame {} ({})",
                    device_id,
                    payload_hex(payload),
                    error
                );
            }
            Err(error @ CodecError::UnknownCharacteristic(_)) => {
                trace!("{}: {}", device_id, error);
            }
        }
    }
}
