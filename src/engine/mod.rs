//! The detection-engine boundary.
//!
//! Drive detection itself (sensor fusion, trip segmentation, event
//! classification) lives in a precompiled vendor engine and is reachable
//! only through this interface: start/stop plus a channel of
//! [`EngineNotification`]s. This crate ships two engines that honor the
//! interface without the vendor binary: [`NoopEngine`] (never reports) and
//! [`ReplayEngine`] (re-delivers a recorded stream).

pub mod noop;
pub mod replay;
pub mod types;

// Re-export commonly used types
pub use noop::NoopEngine;
pub use replay::{ReplayConfig, ReplayEngine};
pub use types::{EngineError, EngineNotification};
