//! Realtime collision notifications.
//!
//! Accidents are reported twice: in realtime through this payload as soon as
//! the engine detects the collision, and again as an accident [`Event`] in
//! the end-of-drive payload.
//!
//! [`Event`]: crate::model::Event

use crate::model::location::LocationPoint;
use serde::{Deserialize, Serialize};

/// Engine confidence in a reported collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccidentConfidence {
    High,
    Low,
}

/// Errors rejecting an invalid accident payload.
#[derive(Debug, PartialEq, Eq)]
pub enum AccidentError {
    EmptyDriveId,
    EmptyAccidentId,
}

impl std::fmt::Display for AccidentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccidentError::EmptyDriveId => write!(f, "accident drive id is empty"),
            AccidentError::EmptyAccidentId => write!(f, "accident id is empty"),
        }
    }
}

impl std::error::Error for AccidentError {}

/// A collision detected during an active drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAccidentInfo", into = "RawAccidentInfo")]
pub struct AccidentInfo {
    drive_id: String,
    accident_id: String,
    timestamp: i64,
    location: LocationPoint,
    tracking_id: Option<String>,
    session_id: Option<String>,
    confidence: AccidentConfidence,
}

impl AccidentInfo {
    pub fn new(
        drive_id: impl Into<String>,
        accident_id: impl Into<String>,
        timestamp: i64,
        location: LocationPoint,
        tracking_id: Option<String>,
        session_id: Option<String>,
        confidence: AccidentConfidence,
    ) -> Result<Self, AccidentError> {
        let drive_id = drive_id.into();
        let accident_id = accident_id.into();
        if drive_id.is_empty() {
            return Err(AccidentError::EmptyDriveId);
        }
        if accident_id.is_empty() {
            return Err(AccidentError::EmptyAccidentId);
        }
        Ok(Self {
            drive_id,
            accident_id,
            timestamp,
            location,
            tracking_id,
            session_id,
            confidence,
        })
    }

    /// The drive during which the collision occurred.
    pub fn drive_id(&self) -> &str {
        &self.drive_id
    }

    /// Unique id for this collision report.
    pub fn accident_id(&self) -> &str {
        &self.accident_id
    }

    /// Epoch timestamp of the collision in milliseconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn location(&self) -> &LocationPoint {
        &self.location
    }

    pub fn tracking_id(&self) -> Option<&str> {
        self.tracking_id.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn confidence(&self) -> AccidentConfidence {
        self.confidence
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawAccidentInfo {
    drive_id: String,
    accident_id: String,
    timestamp: i64,
    location: LocationPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tracking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    confidence: AccidentConfidence,
}

impl TryFrom<RawAccidentInfo> for AccidentInfo {
    type Error = AccidentError;

    fn try_from(raw: RawAccidentInfo) -> Result<Self, Self::Error> {
        AccidentInfo::new(
            raw.drive_id,
            raw.accident_id,
            raw.timestamp,
            raw.location,
            raw.tracking_id,
            raw.session_id,
            raw.confidence,
        )
    }
}

impl From<AccidentInfo> for RawAccidentInfo {
    fn from(info: AccidentInfo) -> Self {
        Self {
            drive_id: info.drive_id,
            accident_id: info.accident_id,
            timestamp: info.timestamp,
            location: info.location,
            tracking_id: info.tracking_id,
            session_id: info.session_id,
            confidence: info.confidence,
        }
    }
}
