//! Callback delivery from the engine channel to host handlers.
//!
//! The host registers a [`DriveEventHandler`] and the [`Dispatcher`] pumps
//! engine notifications into it, in channel order. There are no retries at
//! this layer: redelivery and queuing across process restarts belong to the
//! engine.

use crate::engine::EngineNotification;
use crate::model::{AccidentInfo, DriveInfo, DriveResumeInfo};
use crate::stats::SharedActivityLog;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Host-registered callbacks for engine notifications.
///
/// All methods default to doing nothing, so a handler only implements the
/// callbacks it cares about. Payloads are immutable; a handler wanting to
/// keep one clones it.
pub trait DriveEventHandler {
    /// Drive recording resumed after a gap.
    fn on_drive_resumed(&mut self, _info: &DriveResumeInfo) {}

    /// A drive ended; `info.events()` holds its classified behavior events.
    fn on_drive_ended(&mut self, _info: &DriveInfo) {}

    /// Realtime collision report.
    fn on_accident_detected(&mut self, _info: &AccidentInfo) {}
}

/// Pumps engine notifications into a handler.
pub struct Dispatcher {
    receiver: Receiver<EngineNotification>,
    log: SharedActivityLog,
}

impl Dispatcher {
    pub fn new(receiver: Receiver<EngineNotification>, log: SharedActivityLog) -> Self {
        Self { receiver, log }
    }

    /// Deliver all currently queued notifications without blocking.
    /// Returns the number delivered.
    pub fn pump(&self, handler: &mut dyn DriveEventHandler) -> usize {
        let mut delivered = 0;
        while let Ok(notification) = self.receiver.try_recv() {
            self.deliver(notification, handler);
            delivered += 1;
        }
        delivered
    }

    /// Deliver notifications until `running` clears. Blocks the calling
    /// thread; wakes periodically to observe the flag.
    pub fn run_until(&self, running: &AtomicBool, handler: &mut dyn DriveEventHandler) {
        while running.load(Ordering::SeqCst) {
            match self.receiver.recv_timeout(Duration::from_millis(100)) {
                Ok(notification) => self.deliver(notification, handler),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    fn deliver(&self, notification: EngineNotification, handler: &mut dyn DriveEventHandler) {
        tracing::debug!(
            kind = notification.kind_name(),
            drive = notification.drive_id(),
            "delivering notification"
        );
        match notification {
            EngineNotification::DriveResumed(info) => {
                self.log.record_drive_resumed();
                handler.on_drive_resumed(&info);
            }
            EngineNotification::DriveEnded(info) => {
                self.log.record_drive_ended();
                self.log.record_events_delivered(info.events().len() as u64);
                handler.on_drive_ended(&info);
            }
            EngineNotification::AccidentDetected(info) => {
                self.log.record_accident_reported();
                handler.on_accident_detected(&info);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AccidentConfidence, Event, EventKind, EventSeverity, InsurancePeriod, LocationPoint,
    };
    use crate::stats::create_shared_log;
    use crossbeam_channel::bounded;

    #[derive(Default)]
    struct CollectingHandler {
        resumed: Vec<String>,
        ended: Vec<String>,
        accidents: Vec<String>,
    }

    impl DriveEventHandler for CollectingHandler {
        fn on_drive_resumed(&mut self, info: &DriveResumeInfo) {
            self.resumed.push(info.drive_id().to_string());
        }

        fn on_drive_ended(&mut self, info: &DriveInfo) {
            self.ended.push(info.drive_id().to_string());
        }

        fn on_accident_detected(&mut self, info: &AccidentInfo) {
            self.accidents.push(info.drive_id().to_string());
        }
    }

    fn point(ts: i64) -> LocationPoint {
        LocationPoint::new(ts, 37.77, -122.41)
    }

    fn sample_drive(drive_id: &str) -> DriveInfo {
        let event = Event::new(
            point(1_000),
            point(2_000),
            1_000,
            2_000,
            EventSeverity::High,
            EventKind::HardBrake,
        )
        .unwrap();
        DriveInfo::new(
            drive_id,
            InsurancePeriod::NoPeriod,
            0,
            10_000,
            500.0,
            10.0,
            vec![point(0), point(10_000)],
            None,
            None,
            vec![event],
        )
        .unwrap()
    }

    #[test]
    fn test_pump_delivers_in_channel_order() {
        let (sender, receiver) = bounded(16);
        let log = create_shared_log();
        let dispatcher = Dispatcher::new(receiver, log.clone());

        let resume = DriveResumeInfo::new(
            "drive-1",
            InsurancePeriod::NoPeriod,
            0,
            0.0,
            Vec::new(),
            None,
            None,
            10,
            20,
        )
        .unwrap();
        sender
            .send(EngineNotification::DriveResumed(resume))
            .unwrap();
        sender
            .send(EngineNotification::DriveEnded(sample_drive("drive-1")))
            .unwrap();

        let mut handler = CollectingHandler::default();
        let delivered = dispatcher.pump(&mut handler);

        assert_eq!(delivered, 2);
        assert_eq!(handler.resumed, vec!["drive-1"]);
        assert_eq!(handler.ended, vec!["drive-1"]);

        let stats = log.stats();
        assert_eq!(stats.drives_resumed, 1);
        assert_eq!(stats.drives_ended, 1);
        assert_eq!(stats.events_delivered, 1);
    }

    #[test]
    fn test_accident_callback_and_counting() {
        let (sender, receiver) = bounded(16);
        let log = create_shared_log();
        let dispatcher = Dispatcher::new(receiver, log.clone());

        let accident = AccidentInfo::new(
            "drive-9",
            "acc-1",
            5_000,
            point(5_000),
            None,
            None,
            AccidentConfidence::High,
        )
        .unwrap();
        sender
            .send(EngineNotification::AccidentDetected(accident))
            .unwrap();

        let mut handler = CollectingHandler::default();
        dispatcher.pump(&mut handler);

        assert_eq!(handler.accidents, vec!["drive-9"]);
        assert_eq!(log.stats().accidents_reported, 1);
    }

    #[test]
    fn test_run_until_stops_on_disconnect() {
        let (sender, receiver) = bounded(16);
        let dispatcher = Dispatcher::new(receiver, create_shared_log());

        sender
            .send(EngineNotification::DriveEnded(sample_drive("drive-2")))
            .unwrap();
        drop(sender);

        let running = AtomicBool::new(true);
        let mut handler = CollectingHandler::default();
        // Returns because the channel disconnects, not because the flag clears.
        dispatcher.run_until(&running, &mut handler);
        assert_eq!(handler.ended, vec!["drive-2"]);
    }
}
