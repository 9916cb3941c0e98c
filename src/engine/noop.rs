//! Engine stub for hosts without the vendored detection engine.
//!
//! Detection itself ships as a precompiled vendor binary that is not part of
//! this crate. This stub satisfies the engine interface so the data layer
//! and host wiring can run (and be tested) without it; it never reports a
//! drive.

use crate::engine::types::{EngineError, EngineNotification};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An engine that never emits notifications.
pub struct NoopEngine {
    _sender: Sender<EngineNotification>,
    receiver: Receiver<EngineNotification>,
    running: Arc<AtomicBool>,
}

impl NoopEngine {
    pub fn new() -> Self {
        let (sender, receiver) = bounded(1024);
        Self {
            _sender: sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the engine. Marks it running; no drives will be reported.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(EngineError::AlreadyRunning);
        }
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Stop the engine.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the engine is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for engine notifications.
    pub fn receiver(&self) -> &Receiver<EngineNotification> {
        &self.receiver
    }

    /// Try to receive a notification without blocking.
    pub fn try_recv(&self) -> Option<EngineNotification> {
        self.receiver.try_recv().ok()
    }
}

impl Default for NoopEngine {
    fn default() -> Self {
        Self::new()
    }
}
