//! Drive payloads delivered by the detection engine.
//!
//! [`DriveInfo`] is the end-of-drive payload carrying the drive's events.
//! [`DriveResumeInfo`] describes a drive whose recording resumed after a gap
//! caused by an application restart, kill or crash. Both are immutable once
//! constructed; the validation here runs at every construction point,
//! including deserialization of recorded payloads.

use crate::model::event::Event;
use crate::model::location::LocationPoint;
use serde::{Deserialize, Serialize};

/// Insurance context of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsurancePeriod {
    /// The drive is not associated with an insurance period.
    #[default]
    NoPeriod,
    Period1,
    Period2,
    Period3,
}

/// Errors rejecting an invalid drive payload at a construction boundary.
#[derive(Debug, PartialEq)]
pub enum DriveError {
    /// A drive id must be a non-empty string.
    EmptyDriveId,
    /// Trip distance must be non-negative.
    InvalidDistance(f64),
    /// Average speed must be non-negative.
    InvalidAverageSpeed(f64),
    /// Waypoints must be in non-decreasing timestamp order; holds the first
    /// offending index.
    UnorderedWaypoints { index: usize },
    /// The recording gap must not end before it starts.
    GapEndBeforeStart {
        gap_start_millis: i64,
        gap_end_millis: i64,
    },
    /// The drive must not end before it starts.
    EndBeforeStart {
        start_timestamp: i64,
        end_timestamp: i64,
    },
}

impl std::fmt::Display for DriveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriveError::EmptyDriveId => write!(f, "drive id is empty"),
            DriveError::InvalidDistance(d) => write!(f, "invalid trip distance: {d}"),
            DriveError::InvalidAverageSpeed(s) => write!(f, "invalid average speed: {s}"),
            DriveError::UnorderedWaypoints { index } => {
                write!(f, "waypoint {index} is out of timestamp order")
            }
            DriveError::GapEndBeforeStart {
                gap_start_millis,
                gap_end_millis,
            } => write!(
                f,
                "recording gap ends at {gap_end_millis} before it starts at {gap_start_millis}"
            ),
            DriveError::EndBeforeStart {
                start_timestamp,
                end_timestamp,
            } => write!(
                f,
                "drive ends at {end_timestamp} before it starts at {start_timestamp}"
            ),
        }
    }
}

impl std::error::Error for DriveError {}

/// First index whose timestamp precedes its predecessor, if any.
fn first_unordered_waypoint(waypoints: &[LocationPoint]) -> Option<usize> {
    waypoints
        .windows(2)
        .position(|pair| pair[1].timestamp_millis < pair[0].timestamp_millis)
        .map(|i| i + 1)
}

fn check_drive_fields(
    drive_id: &str,
    distance_meters: f64,
    waypoints: &[LocationPoint],
) -> Result<(), DriveError> {
    if drive_id.is_empty() {
        return Err(DriveError::EmptyDriveId);
    }
    // `!(x >= 0.0)` also catches NaN.
    if !(distance_meters >= 0.0) {
        return Err(DriveError::InvalidDistance(distance_meters));
    }
    if let Some(index) = first_unordered_waypoint(waypoints) {
        return Err(DriveError::UnorderedWaypoints { index });
    }
    Ok(())
}

/// End-of-drive payload.
///
/// Carries the drive's classified [`Event`]s; the first waypoint corresponds
/// to the trip start location and the last to the trip end location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDriveInfo", into = "RawDriveInfo")]
pub struct DriveInfo {
    drive_id: String,
    insurance_period: InsurancePeriod,
    start_timestamp: i64,
    end_timestamp: i64,
    distance_meters: f64,
    average_speed_mps: f64,
    waypoints: Vec<LocationPoint>,
    tracking_id: Option<String>,
    session_id: Option<String>,
    events: Vec<Event>,
}

impl DriveInfo {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        drive_id: impl Into<String>,
        insurance_period: InsurancePeriod,
        start_timestamp: i64,
        end_timestamp: i64,
        distance_meters: f64,
        average_speed_mps: f64,
        waypoints: Vec<LocationPoint>,
        tracking_id: Option<String>,
        session_id: Option<String>,
        events: Vec<Event>,
    ) -> Result<Self, DriveError> {
        let drive_id = drive_id.into();
        check_drive_fields(&drive_id, distance_meters, &waypoints)?;
        if end_timestamp < start_timestamp {
            return Err(DriveError::EndBeforeStart {
                start_timestamp,
                end_timestamp,
            });
        }
        if !(average_speed_mps >= 0.0) {
            return Err(DriveError::InvalidAverageSpeed(average_speed_mps));
        }
        Ok(Self {
            drive_id,
            insurance_period,
            start_timestamp,
            end_timestamp,
            distance_meters,
            average_speed_mps,
            waypoints,
            tracking_id,
            session_id,
            events,
        })
    }

    /// The unique id for this drive.
    pub fn drive_id(&self) -> &str {
        &self.drive_id
    }

    pub fn insurance_period(&self) -> InsurancePeriod {
        self.insurance_period
    }

    /// Trip start, epoch milliseconds.
    pub fn start_timestamp(&self) -> i64 {
        self.start_timestamp
    }

    /// Trip end, epoch milliseconds.
    pub fn end_timestamp(&self) -> i64 {
        self.end_timestamp
    }

    /// Trip distance in metres.
    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    pub fn average_speed_mps(&self) -> f64 {
        self.average_speed_mps
    }

    /// Sparse path sample in non-decreasing timestamp order; empty if no
    /// waypoints were recorded.
    pub fn waypoints(&self) -> &[LocationPoint] {
        &self.waypoints
    }

    /// Set only when the host started this drive manually.
    pub fn tracking_id(&self) -> Option<&str> {
        self.tracking_id.as_deref()
    }

    /// Set only when a session was active for this drive.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Behavior events detected during the drive.
    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawDriveInfo {
    drive_id: String,
    #[serde(default)]
    insurance_period: InsurancePeriod,
    start_timestamp: i64,
    end_timestamp: i64,
    distance_meters: f64,
    #[serde(default)]
    average_speed_mps: f64,
    #[serde(default)]
    waypoints: Vec<LocationPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tracking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    #[serde(default)]
    events: Vec<Event>,
}

impl TryFrom<RawDriveInfo> for DriveInfo {
    type Error = DriveError;

    fn try_from(raw: RawDriveInfo) -> Result<Self, Self::Error> {
        DriveInfo::new(
            raw.drive_id,
            raw.insurance_period,
            raw.start_timestamp,
            raw.end_timestamp,
            raw.distance_meters,
            raw.average_speed_mps,
            raw.waypoints,
            raw.tracking_id,
            raw.session_id,
            raw.events,
        )
    }
}

impl From<DriveInfo> for RawDriveInfo {
    fn from(info: DriveInfo) -> Self {
        Self {
            drive_id: info.drive_id,
            insurance_period: info.insurance_period,
            start_timestamp: info.start_timestamp,
            end_timestamp: info.end_timestamp,
            distance_meters: info.distance_meters,
            average_speed_mps: info.average_speed_mps,
            waypoints: info.waypoints,
            tracking_id: info.tracking_id,
            session_id: info.session_id,
            events: info.events,
        }
    }
}

/// A drive whose recording resumed after a gap.
///
/// Delivered when the engine bridges a recording interruption (application
/// restart, kill, crash). No ordering is guaranteed between the gap interval
/// and `start_timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDriveResumeInfo", into = "RawDriveResumeInfo")]
pub struct DriveResumeInfo {
    drive_id: String,
    insurance_period: InsurancePeriod,
    start_timestamp: i64,
    distance_meters: f64,
    waypoints: Vec<LocationPoint>,
    tracking_id: Option<String>,
    session_id: Option<String>,
    drive_gap_start_timestamp_millis: i64,
    drive_gap_end_timestamp_millis: i64,
}

impl DriveResumeInfo {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        drive_id: impl Into<String>,
        insurance_period: InsurancePeriod,
        start_timestamp: i64,
        distance_meters: f64,
        waypoints: Vec<LocationPoint>,
        tracking_id: Option<String>,
        session_id: Option<String>,
        drive_gap_start_timestamp_millis: i64,
        drive_gap_end_timestamp_millis: i64,
    ) -> Result<Self, DriveError> {
        let drive_id = drive_id.into();
        check_drive_fields(&drive_id, distance_meters, &waypoints)?;
        if drive_gap_end_timestamp_millis < drive_gap_start_timestamp_millis {
            return Err(DriveError::GapEndBeforeStart {
                gap_start_millis: drive_gap_start_timestamp_millis,
                gap_end_millis: drive_gap_end_timestamp_millis,
            });
        }
        Ok(Self {
            drive_id,
            insurance_period,
            start_timestamp,
            distance_meters,
            waypoints,
            tracking_id,
            session_id,
            drive_gap_start_timestamp_millis,
            drive_gap_end_timestamp_millis,
        })
    }

    /// The unique id for this drive.
    pub fn drive_id(&self) -> &str {
        &self.drive_id
    }

    pub fn insurance_period(&self) -> InsurancePeriod {
        self.insurance_period
    }

    /// Trip start, epoch milliseconds.
    pub fn start_timestamp(&self) -> i64 {
        self.start_timestamp
    }

    /// Trip distance in metres.
    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Sparse path sample in non-decreasing timestamp order; empty if no
    /// waypoints were recorded.
    pub fn waypoints(&self) -> &[LocationPoint] {
        &self.waypoints
    }

    /// Set only when the host started this drive manually.
    pub fn tracking_id(&self) -> Option<&str> {
        self.tracking_id.as_deref()
    }

    /// Set only when a session was active for this drive.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Start of the interval during which recording was interrupted,
    /// epoch milliseconds.
    pub fn drive_gap_start_timestamp_millis(&self) -> i64 {
        self.drive_gap_start_timestamp_millis
    }

    /// End of the interval during which recording was interrupted,
    /// epoch milliseconds.
    pub fn drive_gap_end_timestamp_millis(&self) -> i64 {
        self.drive_gap_end_timestamp_millis
    }

    /// Length of the recording gap in milliseconds.
    pub fn gap_duration_millis(&self) -> i64 {
        self.drive_gap_end_timestamp_millis - self.drive_gap_start_timestamp_millis
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawDriveResumeInfo {
    drive_id: String,
    #[serde(default)]
    insurance_period: InsurancePeriod,
    start_timestamp: i64,
    distance_meters: f64,
    #[serde(default)]
    waypoints: Vec<LocationPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tracking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    drive_gap_start_timestamp_millis: i64,
    drive_gap_end_timestamp_millis: i64,
}

impl TryFrom<RawDriveResumeInfo> for DriveResumeInfo {
    type Error = DriveError;

    fn try_from(raw: RawDriveResumeInfo) -> Result<Self, Self::Error> {
        DriveResumeInfo::new(
            raw.drive_id,
            raw.insurance_period,
            raw.start_timestamp,
            raw.distance_meters,
            raw.waypoints,
            raw.tracking_id,
            raw.session_id,
            raw.drive_gap_start_timestamp_millis,
            raw.drive_gap_end_timestamp_millis,
        )
    }
}

impl From<DriveResumeInfo> for RawDriveResumeInfo {
    fn from(info: DriveResumeInfo) -> Self {
        Self {
            drive_id: info.drive_id,
            insurance_period: info.insurance_period,
            start_timestamp: info.start_timestamp,
            distance_meters: info.distance_meters,
            waypoints: info.waypoints,
            tracking_id: info.tracking_id,
            session_id: info.session_id,
            drive_gap_start_timestamp_millis: info.drive_gap_start_timestamp_millis,
            drive_gap_end_timestamp_millis: info.drive_gap_end_timestamp_millis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(ts: i64) -> LocationPoint {
        LocationPoint::new(ts, 37.77, -122.41)
    }

    fn resume_info(waypoints: Vec<LocationPoint>) -> Result<DriveResumeInfo, DriveError> {
        DriveResumeInfo::new(
            "drive-1",
            InsurancePeriod::NoPeriod,
            1_000,
            1250.0,
            waypoints,
            None,
            None,
            5_000,
            9_000,
        )
    }

    #[test]
    fn test_resume_info_accepts_ordered_waypoints() {
        let info = resume_info(vec![point(1_000), point(2_000), point(2_000), point(3_500)])
            .unwrap();
        assert_eq!(info.waypoints().len(), 4);
        assert_eq!(info.waypoints()[0].timestamp_millis, 1_000);
        assert_eq!(info.waypoints().last().unwrap().timestamp_millis, 3_500);
        assert_eq!(info.gap_duration_millis(), 4_000);
    }

    #[test]
    fn test_resume_info_accepts_empty_waypoints() {
        let info = resume_info(Vec::new()).unwrap();
        assert!(info.waypoints().is_empty());
    }

    #[test]
    fn test_resume_info_rejects_unordered_waypoints() {
        let err = resume_info(vec![point(1_000), point(3_000), point(2_000)]).unwrap_err();
        assert_eq!(err, DriveError::UnorderedWaypoints { index: 2 });
    }

    #[test]
    fn test_resume_info_rejects_inverted_gap() {
        let err = DriveResumeInfo::new(
            "drive-1",
            InsurancePeriod::Period1,
            1_000,
            0.0,
            Vec::new(),
            None,
            None,
            9_000,
            5_000,
        )
        .unwrap_err();
        assert!(matches!(err, DriveError::GapEndBeforeStart { .. }));
    }

    #[test]
    fn test_resume_info_rejects_empty_drive_id() {
        let err = DriveResumeInfo::new(
            "",
            InsurancePeriod::NoPeriod,
            1_000,
            0.0,
            Vec::new(),
            None,
            None,
            0,
            0,
        )
        .unwrap_err();
        assert_eq!(err, DriveError::EmptyDriveId);
    }

    #[test]
    fn test_resume_info_rejects_negative_distance() {
        let err = DriveResumeInfo::new(
            "drive-1",
            InsurancePeriod::NoPeriod,
            1_000,
            -1.0,
            Vec::new(),
            None,
            None,
            0,
            0,
        )
        .unwrap_err();
        assert_eq!(err, DriveError::InvalidDistance(-1.0));
    }

    #[test]
    fn test_drive_info_rejects_inverted_time_range() {
        let err = DriveInfo::new(
            "drive-1",
            InsurancePeriod::NoPeriod,
            9_000,
            1_000,
            0.0,
            0.0,
            Vec::new(),
            None,
            None,
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, DriveError::EndBeforeStart { .. }));
    }

    #[test]
    fn test_resume_wire_rejects_unordered_waypoints() {
        let json = r#"{
            "drive_id": "drive-1",
            "start_timestamp": 1000,
            "distance_meters": 10.0,
            "waypoints": [
                {"timestamp_millis": 3000, "latitude": 1.0, "longitude": 2.0},
                {"timestamp_millis": 2000, "latitude": 1.0, "longitude": 2.0}
            ],
            "drive_gap_start_timestamp_millis": 100,
            "drive_gap_end_timestamp_millis": 200
        }"#;
        assert!(serde_json::from_str::<DriveResumeInfo>(json).is_err());
    }

    #[test]
    fn test_drive_info_wire_roundtrip() {
        let info = DriveInfo::new(
            "drive-7",
            InsurancePeriod::Period2,
            1_000,
            600_000,
            8_400.0,
            14.2,
            vec![point(1_000), point(600_000)],
            Some("meter-42".to_string()),
            None,
            Vec::new(),
        )
        .unwrap();

        let json = serde_json::to_string(&info).unwrap();
        let back: DriveInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
        assert_eq!(back.tracking_id(), Some("meter-42"));
        assert_eq!(back.session_id(), None);
    }
}
