#[macro_use]
extern crate log;

use std::time::Duration;

use anyhow::anyhow;
use btleplug::{
    api::{Central as _, Manager as _},
    platform::{Adapter, Manager},
};
use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use dotenv::dotenv;
use healthtracker::{
    RingDevice, ScanTarget, TrackerEvent, WorkoutTracker, request_stop, scan, stop_after,
};
use healthtracker_algos::{SleepScoreCalculator, simulated_phases};
use healthtracker_codec::RingData;
use healthtracker_db::DatabaseHandler;
use healthtracker_types::{
    profile::UserProfile,
    sleep::{SleepEntry, SleepPhases},
    workouts::WorkoutRecord,
};
use serde::Serialize;
use tokio::{sync::mpsc, time::interval};

const DEFAULT_NAME_FILTER: &str = "Ring";
const EVENT_BUFFER: usize = 64;

#[derive(Parser)]
#[command(name = "healthtracker", version)]
pub struct HealthTrackerCli {
    #[arg(env, long, default_value = "sqlite://healthtracker.db?mode=rwc")]
    pub database_url: String,
    #[arg(env, long)]
    pub ble_interface: Option<String>,
    /// Body weight in kg for calorie estimates
    #[arg(env, long)]
    pub weight: Option<u32>,
    /// Age in years for calorie estimates
    #[arg(env, long)]
    pub age: Option<u32>,
    /// Store every raw notification in the packets table
    #[arg(env, long)]
    pub debug_packets: bool,
    #[clap(subcommand)]
    pub subcommand: HealthTrackerCommand,
}

#[derive(Subcommand)]
pub enum HealthTrackerCommand {
    ///
    /// Scan for nearby Bluetooth devices
    ///
    Scan {
        #[arg(long, default_value_t = 8)]
        seconds: u64,
    },
    ///
    /// Track a workout from a heart rate ring until Ctrl-C
    ///
    Workout {
        #[command(flatten)]
        device: DeviceArgs,
        /// Stop automatically after this many seconds
        #[arg(long)]
        duration: Option<u64>,
    },
    ///
    /// Print SpO2 readings until Ctrl-C
    ///
    Spo2 {
        #[command(flatten)]
        device: DeviceArgs,
    },
    ///
    /// Score and store one sleep pass
    ///
    Sleep {
        #[arg(long, required_unless_present = "simulate")]
        deep: Option<u32>,
        #[arg(long, required_unless_present = "simulate")]
        light: Option<u32>,
        #[arg(long, required_unless_present = "simulate")]
        rem: Option<u32>,
        #[arg(long, required_unless_present = "simulate")]
        awake: Option<u32>,
        /// Use randomly generated phase durations
        #[arg(long, conflicts_with_all = ["deep", "light", "rem", "awake"])]
        simulate: bool,
    },
    ///
    /// Print stored workouts and sleep passes, newest first
    ///
    History {
        #[arg(long)]
        json: bool,
    },
    ///
    /// Decode packets captured with --debug-packets
    ///
    ReRun {
        #[arg(long)]
        json: bool,
    },
    ///
    /// Generate shell completions
    ///
    Completions { shell: Shell },
}

#[derive(clap::Args)]
pub struct DeviceArgs {
    /// Device address (or advertised name on macOS)
    #[arg(long, env = "RING_DEVICE")]
    pub device: Option<String>,
    /// Connect to the first device whose name contains this text
    #[arg(long, default_value = DEFAULT_NAME_FILTER)]
    pub name_filter: String,
}

impl DeviceArgs {
    fn target(self) -> ScanTarget {
        match self.device {
            Some(device) => ScanTarget::Device(device),
            None => ScanTarget::NameContains(self.name_filter),
        }
    }
}

#[derive(Serialize)]
struct History {
    workouts: Vec<WorkoutRecord>,
    sleep: Vec<SleepEntry>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("sqlx::query", log::LevelFilter::Off)
        .filter_module("sea_orm_migration::migrator", log::LevelFilter::Off)
        .init();

    let cli = HealthTrackerCli::parse();

    if let HealthTrackerCommand::Completions { shell } = cli.subcommand {
        clap_complete::generate(
            shell,
            &mut HealthTrackerCli::command(),
            "healthtracker",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let db_handler = DatabaseHandler::new(cli.database_url).await?;
    let profile = UserProfile::new(cli.weight, cli.age);
    let capture = cli.debug_packets.then(|| db_handler.clone());

    match cli.subcommand {
        HealthTrackerCommand::Scan { seconds } => {
            let adapter = find_adapter(cli.ble_interface).await?;
            scan(&adapter, &ScanTarget::List(Duration::from_secs(seconds))).await?;
            Ok(())
        }
        HealthTrackerCommand::Workout { device, duration } => {
            let adapter = find_adapter(cli.ble_interface).await?;
            let mut ring = connect_ring(&adapter, device.target(), capture).await?;
            ring.subscribe_heart_rate().await?;

            let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
            stop_on_ctrlc(&tx)?;
            spawn_ticker(tx.clone());
            if let Some(duration) = duration {
                let tx = tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(duration)).await;
                    if tx.send(TrackerEvent::Stop).await.is_err() {
                        debug!("Workout already finished before {} s", duration);
                    }
                });
            }

            let stream = tokio::spawn(stop_after(tx.clone(), async move {
                ring.stream_into(tx).await
            }));

            let mut tracker = WorkoutTracker::new(profile);
            let session = tracker
                .run(&mut rx, Local::now().naive_local(), |session| {
                    println!("{}", session)
                })
                .await;
            drop(rx);
            stream.await?;

            if let Some(session) = session {
                let record = db_handler.create_workout(&session).await?;
                println!("Saved workout #{}: {}", record.id, record);
            }
            Ok(())
        }
        HealthTrackerCommand::Spo2 { device } => {
            let adapter = find_adapter(cli.ble_interface).await?;
            let mut ring = connect_ring(&adapter, device.target(), capture).await?;
            ring.subscribe_spo2().await?;

            let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
            stop_on_ctrlc(&tx)?;
            let stream = tokio::spawn(stop_after(tx.clone(), async move {
                ring.stream_into(tx).await
            }));

            while let Some(event) = rx.recv().await {
                let TrackerEvent::Notification { uuid, payload, .. } = event else {
                    break;
                };
                match RingData::from_notification(uuid, &payload) {
                    Ok(data @ RingData::SpO2(_)) => println!("{}", data),
                    Ok(_) => {}
                    Err(error) => warn!("{}", error),
                }
            }
            drop(rx);
            stream.await?;
            Ok(())
        }
        HealthTrackerCommand::Sleep {
            deep,
            light,
            rem,
            awake,
            simulate,
        } => {
            let phases = if simulate {
                simulated_phases(&mut rand::rng())
            } else {
                SleepPhases {
                    deep_minutes: deep.unwrap_or_default(),
                    light_minutes: light.unwrap_or_default(),
                    rem_minutes: rem.unwrap_or_default(),
                    awake_minutes: awake.unwrap_or_default(),
                }
            };

            let record = SleepScoreCalculator::record(phases);
            let entry = db_handler.create_sleep(&record).await?;
            println!("Saved sleep #{}: {}", entry.id, entry.record);
            Ok(())
        }
        HealthTrackerCommand::History { json } => {
            let history = History {
                workouts: db_handler.get_workouts().await?,
                sleep: db_handler.get_sleep_records().await?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
                return Ok(());
            }

            println!("Workouts:");
            for workout in &history.workouts {
                println!("  #{} {}", workout.id, workout);
            }
            println!("\nSleep:");
            for entry in &history.sleep {
                println!("  #{} {}", entry.id, entry.record);
            }
            Ok(())
        }
        HealthTrackerCommand::ReRun { json } => {
            let mut id = 0;
            loop {
                let packets = db_handler.get_packets(id).await?;
                if packets.is_empty() {
                    break;
                }

                for packet in packets {
                    id = packet.id;
                    match RingData::from_notification(packet.uuid, &packet.bytes) {
                        Ok(data) if json => println!("{}", serde_json::to_string(&data)?),
                        Ok(data) => println!("#{} {}", packet.id, data),
                        Err(error) => warn!("#{}: {}", packet.id, error),
                    }
                }
            }
            Ok(())
        }
        HealthTrackerCommand::Completions { .. } => Ok(()),
    }
}

async fn find_adapter(interface: Option<String>) -> anyhow::Result<Adapter> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;

    match interface {
        Some(interface) => {
            for adapter in adapters {
                let name = adapter.adapter_info().await?;
                if name.starts_with(&interface) {
                    return Ok(adapter);
                }
            }
            Err(anyhow!("Adapter: `{}` not found", interface))
        }
        None => adapters
            .into_iter()
            .next()
            .ok_or(anyhow!("No BLE adapters found")),
    }
}

async fn connect_ring(
    adapter: &Adapter,
    target: ScanTarget,
    capture: Option<DatabaseHandler>,
) -> anyhow::Result<RingDevice> {
    info!("Scanning for {:?}", target);
    let peripheral = scan(adapter, &target)
        .await?
        .ok_or(anyhow!("No device found for {:?}", target))?;

    let mut ring = RingDevice::new(peripheral, capture);
    ring.connect().await?;
    info!("Connected to {}", ring.device_id());
    Ok(ring)
}

fn stop_on_ctrlc(tx: &mpsc::Sender<TrackerEvent>) -> anyhow::Result<()> {
    let tx = tx.clone();
    ctrlc::set_handler(move || {
        request_stop(&tx);
    })?;
    Ok(())
}

fn spawn_ticker(tx: mpsc::Sender<TrackerEvent>) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(1));
        // First tick fires immediately; the first workout update lands one second in.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if tx
                .send(TrackerEvent::Tick(Local::now().naive_local()))
                .await
                .is_err()
            {
                break;
            }
        }
    });
}
