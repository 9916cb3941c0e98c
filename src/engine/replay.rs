//! Replay engine: re-delivers a recorded notification stream.
//!
//! A recording is a JSONL file with one tagged [`EngineNotification`] per
//! line, as exported by the vendor tooling. The replay engine reads it on a
//! worker thread, validates every record through the model layer, and
//! delivers the valid ones over a bounded channel in file order. Invalid
//! records are skipped, counted and logged; they never reach the host.

use crate::engine::types::{EngineError, EngineNotification};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use uuid::Uuid;

/// Configuration for a replay run.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Path to the JSONL recording.
    pub recording_path: PathBuf,
    /// Fixed delay between delivered records. Zero replays as fast as the
    /// consumer drains the channel.
    pub interval: Duration,
    /// Capacity of the delivery channel.
    pub channel_capacity: usize,
}

impl ReplayConfig {
    pub fn new(recording_path: impl Into<PathBuf>) -> Self {
        Self {
            recording_path: recording_path.into(),
            interval: Duration::ZERO,
            channel_capacity: 1024,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Engine that replays a recorded notification stream.
pub struct ReplayEngine {
    config: ReplayConfig,
    instance_id: Uuid,
    sender: Sender<EngineNotification>,
    receiver: Receiver<EngineNotification>,
    running: Arc<AtomicBool>,
    delivered: Arc<AtomicU64>,
    skipped: Arc<AtomicU64>,
    worker: Option<JoinHandle<()>>,
}

impl ReplayEngine {
    pub fn new(config: ReplayConfig) -> Self {
        let (sender, receiver) = bounded(config.channel_capacity);
        Self {
            config,
            instance_id: Uuid::new_v4(),
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            delivered: Arc::new(AtomicU64::new(0)),
            skipped: Arc::new(AtomicU64::new(0)),
            worker: None,
        }
    }

    /// Start replaying. Returns once the worker thread is spawned; the
    /// engine marks itself stopped when the recording is exhausted.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(EngineError::AlreadyRunning);
        }
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        let file = File::open(&self.config.recording_path)
            .map_err(|e| EngineError::Io(format!("{}: {e}", self.config.recording_path.display())))?;

        self.running.store(true, Ordering::SeqCst);

        let running = self.running.clone();
        let delivered = self.delivered.clone();
        let skipped = self.skipped.clone();
        let sender = self.sender.clone();
        let interval = self.config.interval;

        self.worker = Some(std::thread::spawn(move || {
            let reader = BufReader::new(file);
            'records: for (index, line) in reader.lines().enumerate() {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!(line = index + 1, "stopping replay on read error: {e}");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<EngineNotification>(&line) {
                    Ok(notification) => {
                        // Re-check the stop flag while the channel is full so
                        // stop() can always join this thread.
                        let mut pending = notification;
                        loop {
                            match sender.send_timeout(pending, Duration::from_millis(100)) {
                                Ok(()) => {
                                    delivered.fetch_add(1, Ordering::Relaxed);
                                    break;
                                }
                                Err(SendTimeoutError::Timeout(n)) => {
                                    if !running.load(Ordering::SeqCst) {
                                        break 'records;
                                    }
                                    pending = n;
                                }
                                Err(SendTimeoutError::Disconnected(_)) => break 'records,
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(line = index + 1, "skipping invalid record: {e}");
                        skipped.fetch_add(1, Ordering::Relaxed);
                    }
                }
                if !interval.is_zero() {
                    std::thread::sleep(interval);
                }
            }
            running.store(false, Ordering::SeqCst);
        }));

        Ok(())
    }

    /// Stop replaying and join the worker thread. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    /// Whether a replay is in progress. Clears on its own once the
    /// recording is exhausted.
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

    /// Records delivered so far.
    pub fn records_delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Invalid records skipped so far.
    pub fn records_skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Unique id of this engine instance.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }
}

impl Drop for ReplayEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
