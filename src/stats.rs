//! Delivery accounting for the engine boundary.
//!
//! Tracks how many drives, events and accident reports have been delivered
//! to the host, and how many invalid records were skipped on the way in.
//! Counters survive restarts through JSON persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Activity counters for the current session.
#[derive(Debug)]
pub struct ActivityLog {
    /// Number of resume-after-gap notifications delivered
    drives_resumed: AtomicU64,
    /// Number of end-of-drive notifications delivered
    drives_ended: AtomicU64,
    /// Number of behavior events delivered inside end-of-drive payloads
    events_delivered: AtomicU64,
    /// Number of realtime accident reports delivered
    accidents_reported: AtomicU64,
    /// Number of invalid records skipped at the engine boundary
    records_skipped: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Path for persisting counters
    persist_path: Option<PathBuf>,
}

impl ActivityLog {
    /// Create a new activity log.
    pub fn new() -> Self {
        Self {
            drives_resumed: AtomicU64::new(0),
            drives_ended: AtomicU64::new(0),
            events_delivered: AtomicU64::new(0),
            accidents_reported: AtomicU64::new(0),
            records_skipped: AtomicU64::new(0),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create an activity log with persistence.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut log = Self::new();
        log.persist_path = Some(path);

        if let Err(e) = log.load() {
            tracing::warn!("could not load previous activity counters: {e}");
        }

        log
    }

    /// Record a delivered resume notification.
    pub fn record_drive_resumed(&self) {
        self.drives_resumed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a delivered end-of-drive notification.
    pub fn record_drive_ended(&self) {
        self.drives_ended.fetch_add(1, Ordering::Relaxed);
    }

    /// Record behavior events delivered inside a drive payload.
    pub fn record_events_delivered(&self, count: u64) {
        self.events_delivered.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a delivered accident report.
    pub fn record_accident_reported(&self) {
        self.accidents_reported.fetch_add(1, Ordering::Relaxed);
    }

    /// Record invalid records skipped at the boundary.
    pub fn record_records_skipped(&self, count: u64) {
        self.records_skipped.fetch_add(count, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> ActivitySnapshot {
        ActivitySnapshot {
            drives_resumed: self.drives_resumed.load(Ordering::Relaxed),
            drives_ended: self.drives_ended.load(Ordering::Relaxed),
            events_delivered: self.events_delivered.load(Ordering::Relaxed),
            accidents_reported: self.accidents_reported.load(Ordering::Relaxed),
            records_skipped: self.records_skipped.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds() as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Delivery Statistics:\n\
             - Drives resumed: {}\n\
             - Drives ended: {}\n\
             - Behavior events delivered: {}\n\
             - Accident reports: {}\n\
             - Invalid records skipped: {}\n\
             - Session duration: {} seconds",
            stats.drives_resumed,
            stats.drives_ended,
            stats.events_delivered,
            stats.accidents_reported,
            stats.records_skipped,
            stats.session_duration_secs
        )
    }

    /// Save counters to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                drives_resumed: stats.drives_resumed,
                drives_ended: stats.drives_ended,
                events_delivered: stats.events_delivered,
                accidents_reported: stats.accidents_reported,
                records_skipped: stats.records_skipped,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;

            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load counters from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.drives_resumed
                    .store(persisted.drives_resumed, Ordering::Relaxed);
                self.drives_ended
                    .store(persisted.drives_ended, Ordering::Relaxed);
                self.events_delivered
                    .store(persisted.events_delivered, Ordering::Relaxed);
                self.accidents_reported
                    .store(persisted.accidents_reported, Ordering::Relaxed);
                self.records_skipped
                    .store(persisted.records_skipped, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.drives_resumed.store(0, Ordering::Relaxed);
        self.drives_ended.store(0, Ordering::Relaxed);
        self.events_delivered.store(0, Ordering::Relaxed);
        self.accidents_reported.store(0, Ordering::Relaxed);
        self.records_skipped.store(0, Ordering::Relaxed);
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of activity statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub drives_resumed: u64,
    pub drives_ended: u64,
    pub events_delivered: u64,
    pub accidents_reported: u64,
    pub records_skipped: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Counter format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    drives_resumed: u64,
    drives_ended: u64,
    events_delivered: u64,
    accidents_reported: u64,
    records_skipped: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared activity log.
pub type SharedActivityLog = Arc<ActivityLog>;

/// Create a new shared activity log.
pub fn create_shared_log() -> SharedActivityLog {
    Arc::new(ActivityLog::new())
}

/// Create a new shared activity log with persistence.
pub fn create_shared_log_with_persistence(path: PathBuf) -> SharedActivityLog {
    Arc::new(ActivityLog::with_persistence(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_log_counting() {
        let log = ActivityLog::new();

        log.record_drive_resumed();
        log.record_drive_ended();
        log.record_events_delivered(3);
        log.record_accident_reported();

        let stats = log.stats();
        assert_eq!(stats.drives_resumed, 1);
        assert_eq!(stats.drives_ended, 1);
        assert_eq!(stats.events_delivered, 3);
        assert_eq!(stats.accidents_reported, 1);
        assert_eq!(stats.records_skipped, 0);
    }

    #[test]
    fn test_activity_log_reset() {
        let log = ActivityLog::new();

        log.record_drive_ended();
        log.record_events_delivered(10);
        log.reset();

        let stats = log.stats();
        assert_eq!(stats.drives_ended, 0);
        assert_eq!(stats.events_delivered, 0);
    }

    #[test]
    fn test_persistence_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "drivesense-activity-test-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let log = ActivityLog::with_persistence(path.clone());
        log.record_drive_resumed();
        log.record_events_delivered(5);
        log.save().unwrap();

        let restored = ActivityLog::with_persistence(path.clone());
        let stats = restored.stats();
        assert_eq!(stats.drives_resumed, 1);
        assert_eq!(stats.events_delivered, 5);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_summary_format() {
        let log = ActivityLog::new();
        let summary = log.summary();

        assert!(summary.contains("Drives resumed"));
        assert!(summary.contains("Behavior events delivered"));
        assert!(summary.contains("Invalid records skipped"));
    }
}
