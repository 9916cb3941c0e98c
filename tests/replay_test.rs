//! End-to-end tests for the engine boundary: recording -> replay ->
//! dispatcher -> handler callbacks.

use drivesense_sdk::{
    dispatch::{Dispatcher, DriveEventHandler},
    engine::{EngineNotification, ReplayConfig, ReplayEngine},
    model::{
        AccidentConfidence, AccidentInfo, DriveInfo, DriveResumeInfo, Event, EventKind,
        EventSeverity, EventType, InsurancePeriod, LocationPoint, SpeedingData, TurnDirection,
    },
    stats,
};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

fn point(ts: i64) -> LocationPoint {
    LocationPoint::new(ts, 37.77, -122.41)
}

fn write_recording(name: &str, lines: &[String]) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "drivesense-integration-{name}-{}.jsonl",
        std::process::id()
    ));
    let mut file = File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    path
}

fn record(notification: &EngineNotification) -> String {
    serde_json::to_string(notification).unwrap()
}

fn sample_resume() -> EngineNotification {
    EngineNotification::DriveResumed(
        DriveResumeInfo::new(
            "drive-1",
            InsurancePeriod::Period1,
            1_000,
            4_200.0,
            vec![point(1_000), point(90_000), point(180_000)],
            Some("meter-42".to_string()),
            None,
            200_000,
            260_000,
        )
        .unwrap(),
    )
}

fn sample_drive_end() -> EngineNotification {
    let speeding = Event::new(
        point(30_000),
        point(60_000),
        30_000,
        60_000,
        EventSeverity::High,
        EventKind::OverSpeeding(SpeedingData::new(13.4, 16.0, 18.2)),
    )
    .unwrap();
    let turn = Event::new(
        point(90_000),
        point(92_000),
        90_000,
        92_000,
        EventSeverity::Low,
        EventKind::HardTurn(TurnDirection::Right),
    )
    .unwrap();
    let phone = Event::new(
        point(120_000),
        point(150_000),
        120_000,
        150_000,
        EventSeverity::None,
        EventKind::PhoneHandling,
    )
    .unwrap();

    EngineNotification::DriveEnded(
        DriveInfo::new(
            "drive-1",
            InsurancePeriod::Period1,
            1_000,
            180_000,
            4_200.0,
            14.2,
            vec![point(1_000), point(90_000), point(180_000)],
            Some("meter-42".to_string()),
            None,
            vec![speeding, turn, phone],
        )
        .unwrap(),
    )
}

fn sample_accident() -> EngineNotification {
    EngineNotification::AccidentDetected(
        AccidentInfo::new(
            "drive-1",
            "acc-7",
            150_000,
            point(150_000),
            Some("meter-42".to_string()),
            None,
            AccidentConfidence::High,
        )
        .unwrap(),
    )
}

#[derive(Default)]
struct CollectingHandler {
    resumed: Vec<DriveResumeInfo>,
    ended: Vec<DriveInfo>,
    accidents: Vec<AccidentInfo>,
}

impl DriveEventHandler for CollectingHandler {
    fn on_drive_resumed(&mut self, info: &DriveResumeInfo) {
        self.resumed.push(info.clone());
    }

    fn on_drive_ended(&mut self, info: &DriveInfo) {
        self.ended.push(info.clone());
    }

    fn on_accident_detected(&mut self, info: &AccidentInfo) {
        self.accidents.push(info.clone());
    }
}

fn wait_until_finished(engine: &ReplayEngine) {
    for _ in 0..300 {
        if !engine.is_running() {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("replay did not finish in time");
}

#[test]
fn test_recording_is_delivered_through_callbacks() {
    let path = write_recording(
        "callbacks",
        &[
            record(&sample_resume()),
            record(&sample_accident()),
            record(&sample_drive_end()),
        ],
    );

    let log = stats::create_shared_log();
    let mut engine = ReplayEngine::new(ReplayConfig::new(&path));
    let dispatcher = Dispatcher::new(engine.receiver().clone(), log.clone());

    engine.start().unwrap();
    wait_until_finished(&engine);

    let mut handler = CollectingHandler::default();
    dispatcher.pump(&mut handler);

    assert_eq!(handler.resumed.len(), 1);
    assert_eq!(handler.ended.len(), 1);
    assert_eq!(handler.accidents.len(), 1);

    // Resume payload invariants survived the boundary.
    let resume = &handler.resumed[0];
    assert_eq!(resume.drive_id(), "drive-1");
    assert_eq!(resume.tracking_id(), Some("meter-42"));
    assert!(resume
        .waypoints()
        .windows(2)
        .all(|pair| pair[0].timestamp_millis <= pair[1].timestamp_millis));
    assert_eq!(resume.waypoints()[0].timestamp_millis, 1_000);
    assert_eq!(resume.waypoints().last().unwrap().timestamp_millis, 180_000);
    assert_eq!(resume.gap_duration_millis(), 60_000);

    // Event cross-field invariants hold for every delivered event.
    let drive = &handler.ended[0];
    assert_eq!(drive.events().len(), 3);
    for event in drive.events() {
        assert_eq!(
            event.speeding_data().is_some(),
            event.event_type() == EventType::OverSpeeding
        );
        if event.event_type() != EventType::HardTurn {
            assert_eq!(event.turn_direction(), TurnDirection::NotAvailable);
        }
    }

    let snapshot = log.stats();
    assert_eq!(snapshot.drives_resumed, 1);
    assert_eq!(snapshot.drives_ended, 1);
    assert_eq!(snapshot.events_delivered, 3);
    assert_eq!(snapshot.accidents_reported, 1);

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_invalid_records_never_reach_the_host() {
    let unordered_waypoints = r#"{"kind":"drive_resumed","payload":{
        "drive_id":"bad-order",
        "start_timestamp":1000,
        "distance_meters":10.0,
        "waypoints":[
            {"timestamp_millis":3000,"latitude":1.0,"longitude":2.0},
            {"timestamp_millis":2000,"latitude":1.0,"longitude":2.0}
        ],
        "drive_gap_start_timestamp_millis":100,
        "drive_gap_end_timestamp_millis":200
    }}"#
    .replace('\n', " ");

    let speeding_without_data = r#"{"kind":"drive_ended","payload":{
        "drive_id":"bad-speeding",
        "start_timestamp":0,
        "end_timestamp":1000,
        "distance_meters":1.0,
        "events":[{
            "start_location":{"timestamp_millis":0,"latitude":1.0,"longitude":2.0},
            "stop_location":{"timestamp_millis":500,"latitude":1.0,"longitude":2.0},
            "start_time":0,
            "end_time":500,
            "event_type":"over_speeding"
        }]
    }}"#
    .replace('\n', " ");

    let path = write_recording(
        "invalid",
        &[
            unordered_waypoints,
            record(&sample_drive_end()),
            speeding_without_data,
            "plain garbage".to_string(),
        ],
    );

    let log = stats::create_shared_log();
    let mut engine = ReplayEngine::new(ReplayConfig::new(&path));
    let dispatcher = Dispatcher::new(engine.receiver().clone(), log.clone());

    engine.start().unwrap();
    wait_until_finished(&engine);

    let mut handler = CollectingHandler::default();
    dispatcher.pump(&mut handler);

    assert_eq!(engine.records_delivered(), 1);
    assert_eq!(engine.records_skipped(), 3);
    assert!(handler.resumed.is_empty());
    assert_eq!(handler.ended.len(), 1);
    assert_eq!(handler.ended[0].drive_id(), "drive-1");

    let _ = std::fs::remove_file(path);
}

#[test]
fn test_paced_replay_still_delivers_everything() {
    let path = write_recording(
        "paced",
        &[record(&sample_resume()), record(&sample_drive_end())],
    );

    let log = stats::create_shared_log();
    let mut engine = ReplayEngine::new(
        ReplayConfig::new(&path).with_interval(Duration::from_millis(20)),
    );
    let dispatcher = Dispatcher::new(engine.receiver().clone(), log.clone());

    engine.start().unwrap();

    let mut handler = CollectingHandler::default();
    while engine.is_running() {
        dispatcher.pump(&mut handler);
        std::thread::sleep(Duration::from_millis(5));
    }
    dispatcher.pump(&mut handler);

    assert_eq!(handler.resumed.len(), 1);
    assert_eq!(handler.ended.len(), 1);
    assert_eq!(log.stats().drives_ended, 1);

    let _ = std::fs::remove_file(path);
}
