//! Drivesense SDK CLI
//!
//! Host-side harness for the drive-session data layer: configure a driver,
//! replay recorded drive streams through the engine boundary, and inspect
//! delivery counters.

use clap::{Parser, Subcommand};
use crossbeam_channel::Receiver;
use drivesense_sdk::{
    attributes::ServiceLevel,
    config::SdkConfig,
    dispatch::{Dispatcher, DriveEventHandler},
    engine::{EngineNotification, NoopEngine, ReplayConfig, ReplayEngine},
    model::{AccidentInfo, DriveInfo, DriveResumeInfo},
    session::SessionTracker,
    stats::{create_shared_log_with_persistence, ActivityLog},
    DATA_DISCLOSURE, VERSION,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "drivesense")]
#[command(version = VERSION)]
#[command(about = "Drive-session and driving-event data layer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set the driver identity for this installation
    Setup {
        /// Driver id (must pass the input validity check)
        driver_id: String,
    },

    /// Start delivering engine notifications to the console
    Start {
        /// Recording to replay (JSONL, one notification per line)
        #[arg(long)]
        recording: Option<PathBuf>,

        /// Delay between replayed records in milliseconds
        #[arg(long)]
        interval_millis: Option<u64>,

        /// Start a manual drive with this tracking id
        #[arg(long)]
        tracking_id: Option<String>,

        /// Start a session with this session id
        #[arg(long)]
        session_id: Option<String>,
    },

    /// Show delivery counters
    Status,

    /// Inspect or modify driver attributes
    Attributes {
        #[command(subcommand)]
        action: AttributeAction,
    },

    /// Show configuration
    Config,

    /// Display the data-collection disclosure
    Disclosure,
}

#[derive(Subcommand)]
enum AttributeAction {
    /// Print the exported attributes
    Show,
    /// Set the driver's group id
    SetGroup { group_id: String },
    /// Set the driver's alias
    SetAlias { alias: String },
    /// Set the driver's service level (0 = default, 1 = level 1)
    SetServiceLevel { level: u8 },
    /// Set a custom attribute (up to 4 per driver)
    SetCustom { key: String, value: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Setup { driver_id } => cmd_setup(&driver_id),
        Commands::Start {
            recording,
            interval_millis,
            tracking_id,
            session_id,
        } => cmd_start(recording, interval_millis, tracking_id, session_id),
        Commands::Status => cmd_status(),
        Commands::Attributes { action } => cmd_attributes(action),
        Commands::Config => cmd_config(),
        Commands::Disclosure => cmd_disclosure(),
    }
}

/// The engine selected for this run.
enum Engine {
    Replay(ReplayEngine),
    Noop(NoopEngine),
}

impl Engine {
    fn receiver(&self) -> &Receiver<EngineNotification> {
        match self {
            Engine::Replay(e) => e.receiver(),
            Engine::Noop(e) => e.receiver(),
        }
    }

    fn is_running(&self) -> bool {
        match self {
            Engine::Replay(e) => e.is_running(),
            Engine::Noop(e) => e.is_running(),
        }
    }

    fn stop(&mut self) {
        match self {
            Engine::Replay(e) => e.stop(),
            Engine::Noop(e) => e.stop(),
        }
    }

    fn records_skipped(&self) -> u64 {
        match self {
            Engine::Replay(e) => e.records_skipped(),
            Engine::Noop(_) => 0,
        }
    }
}

/// Handler printing every delivered notification.
struct ConsoleHandler;

impl DriveEventHandler for ConsoleHandler {
    fn on_drive_resumed(&mut self, info: &DriveResumeInfo) {
        println!(
            "Drive {} resumed after a {} ms recording gap ({} waypoints, {:.0} m)",
            info.drive_id(),
            info.gap_duration_millis(),
            info.waypoints().len(),
            info.distance_meters()
        );
    }

    fn on_drive_ended(&mut self, info: &DriveInfo) {
        println!(
            "Drive {} ended: {:.0} m in {} s, {} events",
            info.drive_id(),
            info.distance_meters(),
            (info.end_timestamp() - info.start_timestamp()) / 1000,
            info.events().len()
        );
        for event in info.events() {
            let mut details = format!("  - {} ({:?})", event.event_type().as_str(), event.severity());
            if let Some(data) = event.speeding_data() {
                details.push_str(&format!(
                    " limit {:.1} m/s, avg {:.1} m/s, max {:.1} m/s",
                    data.speed_limit_mps, data.user_speed_mps, data.max_user_speed_mps
                ));
            }
            println!("{details}");
        }
    }

    fn on_accident_detected(&mut self, info: &AccidentInfo) {
        println!(
            "ACCIDENT reported on drive {} at {} (confidence {:?})",
            info.drive_id(),
            info.timestamp(),
            info.confidence()
        );
    }
}

fn cmd_setup(driver_id: &str) {
    let mut config = SdkConfig::load().unwrap_or_default();
    config.driver_id = driver_id.to_string();

    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = config.save() {
        eprintln!("Error: Could not save configuration: {e}");
        std::process::exit(1);
    }
    println!("Driver id set to '{driver_id}'");
}

fn cmd_start(
    recording: Option<PathBuf>,
    interval_millis: Option<u64>,
    tracking_id: Option<String>,
    session_id: Option<String>,
) {
    println!("Drivesense SDK v{VERSION}");
    println!();

    let config = SdkConfig::load().unwrap_or_default();
    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        eprintln!();
        eprintln!("Set a driver identity first:");
        eprintln!("  drivesense setup <driver-id>");
        std::process::exit(1);
    }
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    // Host-side manual drive / session state.
    let mut session = SessionTracker::new();
    if let Some(id) = tracking_id {
        if !session.start_manual_drive(&id) {
            eprintln!("Error: invalid tracking id {id:?}");
            std::process::exit(1);
        }
    }
    if let Some(id) = session_id {
        if !session.start_session(&id) {
            eprintln!("Error: invalid session id {id:?}");
            std::process::exit(1);
        }
    }

    println!("Driver: {}", config.driver_id);
    println!("Device: {}", config.device_id);
    if let Some(group) = config.attributes.group() {
        println!("Group: {group}");
    }
    if let Some(id) = session.active_tracking_id() {
        println!("Manual drive: {id}");
    }
    if let Some(id) = session.active_session_id() {
        println!("Session: {id}");
    }

    let recording = recording.or_else(|| config.recording_path.clone());
    let interval =
        Duration::from_millis(interval_millis.unwrap_or(config.replay_interval_millis));

    let mut engine = match &recording {
        Some(path) => {
            println!("Replaying: {}", path.display());
            let replay_config = ReplayConfig::new(path).with_interval(interval);
            let mut engine = ReplayEngine::new(replay_config);
            if let Err(e) = engine.start() {
                eprintln!("Error starting replay: {e}");
                std::process::exit(1);
            }
            Engine::Replay(engine)
        }
        None => {
            println!("No detection engine or recording available; running idle.");
            let mut engine = NoopEngine::new();
            if let Err(e) = engine.start() {
                eprintln!("Error starting engine: {e}");
                std::process::exit(1);
            }
            Engine::Noop(engine)
        }
    };

    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let log = create_shared_log_with_persistence(config.data_path.join("activity.json"));
    let dispatcher = Dispatcher::new(engine.receiver().clone(), log.clone());
    let mut handler = ConsoleHandler;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
        eprintln!("Warning: Could not install Ctrl+C handler: {e}");
    }

    while running.load(Ordering::SeqCst) {
        let delivered = dispatcher.pump(&mut handler);
        if delivered == 0 {
            if !engine.is_running() {
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }

    // Deliver anything still queued before shutting down.
    dispatcher.pump(&mut handler);
    log.record_records_skipped(engine.records_skipped());
    engine.stop();

    if let Err(e) = log.save() {
        eprintln!("Warning: Could not save delivery counters: {e}");
    }

    println!();
    println!("{}", log.summary());
}

fn cmd_status() {
    let config = SdkConfig::load().unwrap_or_default();
    let log = ActivityLog::with_persistence(config.data_path.join("activity.json"));
    println!("{}", log.summary());
}

fn cmd_attributes(action: AttributeAction) {
    let mut config = SdkConfig::load().unwrap_or_default();

    let changed = match &action {
        AttributeAction::Show => {
            match serde_json::to_string_pretty(&serde_json::Value::Object(
                config.attributes.as_dictionary(),
            )) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error: Could not serialize attributes: {e}");
                    std::process::exit(1);
                }
            }
            return;
        }
        AttributeAction::SetGroup { group_id } => config.attributes.set_group(group_id),
        AttributeAction::SetAlias { alias } => config.attributes.set_alias(alias),
        AttributeAction::SetServiceLevel { level } => {
            let level = match *level {
                0 => ServiceLevel::Default,
                1 => ServiceLevel::Level1,
                other => {
                    eprintln!("Error: unknown service level {other}");
                    std::process::exit(1);
                }
            };
            config.attributes.set_service_level(level)
        }
        AttributeAction::SetCustom { key, value } => {
            config.attributes.set_custom_attribute(key, value)
        }
    };

    if !changed {
        eprintln!("Rejected: attribute unchanged");
        std::process::exit(1);
    }
    if let Err(e) = config.save() {
        eprintln!("Error: Could not save configuration: {e}");
        std::process::exit(1);
    }
    println!("Attribute set");
}

fn cmd_config() {
    let config = SdkConfig::load().unwrap_or_default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: Could not serialize configuration: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_disclosure() {
    println!("{DATA_DISCLOSURE}");
}
