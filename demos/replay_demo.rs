//! Replay demo: build a small recording, replay it through the engine
//! boundary, and print every callback.
//!
//! Run with: cargo run --example replay_demo

use drivesense_sdk::{
    dispatch::{Dispatcher, DriveEventHandler},
    engine::{EngineNotification, ReplayConfig, ReplayEngine},
    model::{
        DriveInfo, DriveResumeInfo, Event, EventKind, EventSeverity, InsurancePeriod,
        LocationPoint, SpeedingData,
    },
    stats,
};
use std::io::Write;

struct Printer;

impl DriveEventHandler for Printer {
    fn on_drive_resumed(&mut self, info: &DriveResumeInfo) {
        println!(
            "resumed drive {} (gap {} ms)",
            info.drive_id(),
            info.gap_duration_millis()
        );
    }

    fn on_drive_ended(&mut self, info: &DriveInfo) {
        println!(
            "drive {} ended with {} events",
            info.drive_id(),
            info.events().len()
        );
        for event in info.events() {
            println!("  {}", event.event_type().as_str());
        }
    }
}

fn main() {
    let point = |ts| LocationPoint::new(ts, 37.77, -122.41);

    let resume = DriveResumeInfo::new(
        "demo-drive",
        InsurancePeriod::NoPeriod,
        1_000,
        2_500.0,
        vec![point(1_000), point(60_000)],
        None,
        None,
        70_000,
        95_000,
    )
    .expect("valid resume payload");

    let speeding = Event::new(
        point(10_000),
        point(25_000),
        10_000,
        25_000,
        EventSeverity::High,
        EventKind::OverSpeeding(SpeedingData::new(13.4, 16.0, 18.2)),
    )
    .expect("valid event");

    let drive = DriveInfo::new(
        "demo-drive",
        InsurancePeriod::NoPeriod,
        1_000,
        120_000,
        2_500.0,
        12.0,
        vec![point(1_000), point(120_000)],
        None,
        None,
        vec![speeding],
    )
    .expect("valid drive payload");

    // Write the recording next to the other temp state.
    let path = std::env::temp_dir().join("drivesense-demo.jsonl");
    let mut file = std::fs::File::create(&path).expect("create recording");
    for notification in [
        EngineNotification::DriveResumed(resume),
        EngineNotification::DriveEnded(drive),
    ] {
        let line = serde_json::to_string(&notification).expect("serialize notification");
        writeln!(file, "{line}").expect("write recording");
    }

    let log = stats::create_shared_log();
    let mut engine = ReplayEngine::new(ReplayConfig::new(&path));
    let dispatcher = Dispatcher::new(engine.receiver().clone(), log.clone());

    engine.start().expect("start replay");

    let mut handler = Printer;
    while engine.is_running() {
        dispatcher.pump(&mut handler);
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    dispatcher.pump(&mut handler);

    println!();
    println!("{}", log.summary());

    let _ = std::fs::remove_file(path);
}
