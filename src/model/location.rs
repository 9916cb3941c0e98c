//! Location samples attached to drives and events.

use serde::{Deserialize, Serialize};

/// A single timestamped location sample.
///
/// Waypoint sequences are a sparse sample of the path taken, not a full
/// location trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationPoint {
    /// Epoch timestamp of the sample in milliseconds.
    pub timestamp_millis: i64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl LocationPoint {
    pub fn new(timestamp_millis: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp_millis,
            latitude,
            longitude,
        }
    }
}
