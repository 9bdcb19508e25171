//! CLI for the Catwatch home alarm coordinator.
//!
//! Each invocation: load state file -> run one coordinator operation ->
//! print the resulting status. The last detector result is kept in the
//! state file so an image processed by one invocation still counts when a
//! later one arms the system.

mod config;
mod report;

use catwatch_coordinator::{AlarmCoordinator, EventLog, StatusObserver, TracingObserver};
use catwatch_core::{ArmingStatus, CatwatchError, Image, Sensor, SensorType};
use catwatch_store::{Detector, FixedDetector, JsonFileStore, RandomDetector};
use clap::{Parser, Subcommand, ValueEnum};
use config::{FileConfig, Settings};
use report::StatusReport;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "catwatch", version, about = "Home alarm coordinator with cat detection")]
struct Cli {
    /// State file; created on the first change.
    #[arg(long, global = true, env = "CATWATCH_STATE")]
    state: Option<PathBuf>,

    /// TOML settings file.
    #[arg(long, global = true, env = "CATWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Detector confidence threshold (0-100).
    #[arg(long, global = true)]
    threshold: Option<f32>,

    /// Append coordinator events as NDJSON to this file.
    #[arg(long, global = true)]
    event_log: Option<PathBuf>,

    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show alarm status, arming status, and sensors.
    Status,

    /// Arm the system. Resets every sensor to inactive.
    Arm {
        #[arg(value_enum)]
        mode: ArmMode,
    },

    /// Disarm the system and clear any alarm.
    Disarm,

    /// Manage and trigger sensors.
    #[command(subcommand)]
    Sensor(SensorCommand),

    /// Run an image through the cat detector.
    Image {
        path: PathBuf,

        /// Skip the detector and use this answer.
        #[arg(long)]
        assume_cat: Option<bool>,

        /// Seed the stand-in detector for reproducible results.
        #[arg(long, conflicts_with = "assume_cat")]
        seed: Option<u64>,
    },
}

#[derive(Subcommand, Debug)]
enum SensorCommand {
    List,
    Add {
        name: String,
        #[arg(value_parser = parse_sensor_type)]
        kind: SensorType,
    },
    Remove {
        name: String,
        #[arg(value_parser = parse_sensor_type)]
        kind: SensorType,
    },
    /// Set a sensor's activation explicitly.
    Set {
        name: String,
        #[arg(value_parser = parse_sensor_type)]
        kind: SensorType,
        #[arg(value_enum)]
        activation: SensorState,
    },
    /// Invert a sensor's activation.
    Toggle {
        name: String,
        #[arg(value_parser = parse_sensor_type)]
        kind: SensorType,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ArmMode {
    Home,
    Away,
}

impl From<ArmMode> for ArmingStatus {
    fn from(mode: ArmMode) -> Self {
        match mode {
            ArmMode::Home => ArmingStatus::ArmedHome,
            ArmMode::Away => ArmingStatus::ArmedAway,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SensorState {
    On,
    Off,
}

fn parse_sensor_type(s: &str) -> Result<SensorType, String> {
    s.parse().map_err(|e: CatwatchError| e.to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    let report = run(cli)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }

    Ok(())
}

/// Runs one command against the state file and reports the resulting status.
fn run(cli: Cli) -> Result<StatusReport, Box<dyn Error>> {
    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(file, cli.state, cli.threshold, cli.event_log)?;

    let detector: Arc<dyn Detector> = match &cli.command {
        Commands::Image {
            assume_cat: Some(cat),
            ..
        } => Arc::new(FixedDetector(*cat)),
        Commands::Image {
            seed: Some(seed), ..
        } => Arc::new(RandomDetector::seeded(*seed)),
        _ => Arc::new(RandomDetector::new()),
    };

    let store = JsonFileStore::open(&settings.state_path)?;
    let remembered_cat = store.cat_detected()?;
    tracing::debug!(
        path = %store.path().display(),
        threshold = settings.coordinator.confidence_threshold,
        remembered_cat,
        "state file"
    );

    let coordinator = AlarmCoordinator::with_config(store, detector, settings.coordinator.clone())
        .with_cat_detected(remembered_cat);
    coordinator.add_status_listener(Arc::new(TracingObserver));

    if let Some(path) = &settings.event_log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        let log: Arc<dyn StatusObserver> = Arc::new(EventLog::new(file));
        coordinator.add_status_listener(log);
    }

    let mut cat_detected = None;

    match cli.command {
        Commands::Status | Commands::Sensor(SensorCommand::List) => {}
        Commands::Arm { mode } => coordinator.set_arming_status(mode.into())?,
        Commands::Disarm => coordinator.set_arming_status(ArmingStatus::Disarmed)?,
        Commands::Sensor(SensorCommand::Add { name, kind }) => {
            coordinator.add_sensor(Sensor::new(name, kind))?
        }
        Commands::Sensor(SensorCommand::Remove { name, kind }) => {
            coordinator.remove_sensor(&Sensor::new(name, kind))?
        }
        Commands::Sensor(SensorCommand::Set {
            name,
            kind,
            activation,
        }) => {
            let active = matches!(activation, SensorState::On);
            coordinator.change_sensor_activation(&Sensor::new(name, kind), active)?;
        }
        Commands::Sensor(SensorCommand::Toggle { name, kind }) => {
            coordinator.toggle_sensor(&Sensor::new(name, kind))?;
        }
        Commands::Image { path, .. } => {
            let bytes = std::fs::read(&path).map_err(|e| {
                CatwatchError::InvalidInput(format!("Failed to read image {}: {e}", path.display()))
            })?;
            let cat = coordinator.process_image(&Image::from(bytes))?;
            coordinator.store().set_cat_detected(cat)?;
            cat_detected = Some(cat);
        }
    }

    Ok(StatusReport {
        alarm_status: coordinator.alarm_status()?,
        arming_status: coordinator.arming_status()?,
        sensors: coordinator.sensors()?,
        cat_detected,
    })
}
