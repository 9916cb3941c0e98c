//! Manual-drive and session correlation state.
//!
//! A host starts a manual drive when it knows a trip is underway (a taxi
//! meter being flagged, for example) and starts a session to group several
//! drives (a work shift). The engine stamps the active ids onto the drives
//! it reports as `tracking_id` and `session_id`; auto-detected drives
//! outside any session carry neither.
//!
//! This tracker holds the host-side view only. Persisting the active ids
//! across process restarts is the engine's job and stays opaque here.
//! Methods are not thread-safe; a host sharing a tracker across threads must
//! serialize access.

use crate::validation::is_valid_input_parameter;

/// Host-side manual-drive and session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTracker {
    tracking_id: Option<String>,
    session_id: Option<String>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a manual drive with the given tracking id.
    ///
    /// The id must pass the input validity check; invalid input is rejected:
    /// returns `false`, logs a warning, state unchanged. Starting while a
    /// manual drive is active replaces its tracking id.
    pub fn start_manual_drive(&mut self, tracking_id: &str) -> bool {
        if !is_valid_input_parameter(tracking_id) {
            tracing::warn!("rejected invalid tracking id");
            return false;
        }
        self.tracking_id = Some(tracking_id.to_string());
        true
    }

    /// Stop the active manual drive, if any.
    pub fn stop_manual_drive(&mut self) {
        self.tracking_id = None;
    }

    /// Start a session with the given session id. Same validity rules as
    /// [`start_manual_drive`](Self::start_manual_drive).
    pub fn start_session(&mut self, session_id: &str) -> bool {
        if !is_valid_input_parameter(session_id) {
            tracing::warn!("rejected invalid session id");
            return false;
        }
        self.session_id = Some(session_id.to_string());
        true
    }

    /// Stop the active session, if any.
    pub fn stop_session(&mut self) {
        self.session_id = None;
    }

    /// Tracking id of the active manual drive.
    pub fn active_tracking_id(&self) -> Option<&str> {
        self.tracking_id.as_deref()
    }

    /// Id of the active session.
    pub fn active_session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }
}
