//! Notification types delivered across the engine boundary.

use crate::model::{AccidentInfo, DriveInfo, DriveResumeInfo};
use serde::{Deserialize, Serialize};

/// One callback payload from the detection engine.
///
/// Recorded streams serialize these as tagged objects, one per line:
/// `{"kind": "drive_ended", "payload": {...}}`. Deserializing a notification
/// runs the payload validation of the model layer, so an invalid record can
/// never cross the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum EngineNotification {
    /// Drive recording resumed after a gap.
    DriveResumed(DriveResumeInfo),
    /// A drive ended; the payload carries its events.
    DriveEnded(DriveInfo),
    /// Realtime collision report.
    AccidentDetected(AccidentInfo),
}

impl EngineNotification {
    /// The drive this notification belongs to.
    pub fn drive_id(&self) -> &str {
        match self {
            EngineNotification::DriveResumed(info) => info.drive_id(),
            EngineNotification::DriveEnded(info) => info.drive_id(),
            EngineNotification::AccidentDetected(info) => info.drive_id(),
        }
    }

    /// Stable name of the notification kind, for logs and counters.
    pub fn kind_name(&self) -> &'static str {
        match self {
            EngineNotification::DriveResumed(_) => "drive_resumed",
            EngineNotification::DriveEnded(_) => "drive_ended",
            EngineNotification::AccidentDetected(_) => "accident_detected",
        }
    }
}

/// Errors that can occur operating an engine.
#[derive(Debug)]
pub enum EngineError {
    /// The engine is already running.
    AlreadyRunning,
    /// The recording source could not be read.
    Io(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::AlreadyRunning => write!(f, "Engine is already running"),
            EngineError::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DriveResumeInfo, InsurancePeriod};

    #[test]
    fn test_notification_tagged_form() {
        let info = DriveResumeInfo::new(
            "drive-1",
            InsurancePeriod::NoPeriod,
            1_000,
            0.0,
            Vec::new(),
            None,
            None,
            100,
            200,
        )
        .unwrap();
        let notification = EngineNotification::DriveResumed(info);

        let json = serde_json::to_string(&notification).unwrap();
        assert!(json.contains("\"kind\":\"drive_resumed\""));
        assert!(json.contains("\"payload\""));

        let back: EngineNotification = serde_json::from_str(&json).unwrap();
        assert_eq!(back, notification);
        assert_eq!(back.drive_id(), "drive-1");
        assert_eq!(back.kind_name(), "drive_resumed");
    }

    #[test]
    fn test_notification_rejects_invalid_payload() {
        // Gap ends before it starts: the model layer rejects it during
        // notification deserialization.
        let json = r#"{"kind": "drive_resumed", "payload": {
            "drive_id": "drive-1",
            "start_timestamp": 1000,
            "distance_meters": 0.0,
            "drive_gap_start_timestamp_millis": 900,
            "drive_gap_end_timestamp_millis": 100
        }}"#;
        assert!(serde_json::from_str::<EngineNotification>(json).is_err());
    }
}
