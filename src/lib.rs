//! Drivesense SDK - drive-session and driving-event data layer.
//!
//! This library is the host-facing half of a driving-behavior detection
//! stack: the typed payloads a detection engine delivers (drives, resume
//! records, behavior events, accident reports), the driver attributes the
//! host supplies, and the channel/callback plumbing between the two.
//!
//! Detection itself (sensor fusion, trip segmentation, event
//! classification, background continuity) lives in a precompiled vendor
//! engine reachable only through the interface in [`engine`]. This crate
//! ships a noop stand-in and a replay engine that re-delivers recorded
//! streams, which is also how the payload validation is exercised end to
//! end.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Drivesense SDK                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐    ┌─────────────┐    ┌──────────────────┐  │
//! │  │   Engine   │───▶│  Dispatcher │───▶│ DriveEventHandler│  │
//! │  │(noop/replay│    │   (pump)    │    │    (host app)    │  │
//! │  └────────────┘    └─────────────┘    └──────────────────┘  │
//! │        │                  │                                  │
//! │        ▼                  ▼                                  │
//! │  ┌────────────┐    ┌─────────────┐                          │
//! │  │   Model    │    │  Activity   │                          │
//! │  │(validated) │    │    Log      │                          │
//! │  └────────────┘    └─────────────┘                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use drivesense_sdk::{
//!     dispatch::{Dispatcher, DriveEventHandler},
//!     engine::{ReplayConfig, ReplayEngine},
//!     model::DriveInfo,
//!     stats,
//! };
//!
//! struct Printer;
//!
//! impl DriveEventHandler for Printer {
//!     fn on_drive_ended(&mut self, info: &DriveInfo) {
//!         println!("drive {} ended with {} events", info.drive_id(), info.events().len());
//!     }
//! }
//!
//! let mut engine = ReplayEngine::new(ReplayConfig::new("recording.jsonl"));
//! let dispatcher = Dispatcher::new(engine.receiver().clone(), stats::create_shared_log());
//! engine.start().expect("Failed to start replay");
//!
//! let mut handler = Printer;
//! while engine.is_running() {
//!     dispatcher.pump(&mut handler);
//! }
//! dispatcher.pump(&mut handler);
//! ```

pub mod attributes;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod model;
pub mod session;
pub mod stats;
pub mod validation;

// Re-export key types at crate root for convenience
pub use attributes::{DriverAttributes, ServiceLevel};
pub use config::{ConfigError, SdkConfig};
pub use dispatch::{Dispatcher, DriveEventHandler};
pub use engine::{EngineError, EngineNotification, NoopEngine, ReplayConfig, ReplayEngine};
pub use model::{
    AccidentConfidence, AccidentInfo, DriveInfo, DriveResumeInfo, Event, EventKind, EventSeverity,
    EventType, InsurancePeriod, LocationPoint, SpeedingData, TurnDirection,
};
pub use session::SessionTracker;
pub use stats::{ActivityLog, ActivitySnapshot, SharedActivityLog};
pub use validation::{is_valid_input_parameter, DefaultInputPolicy, InputPolicy};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Data-collection disclosure that can be displayed to drivers.
pub const DATA_DISCLOSURE: &str = r#"
╔══════════════════════════════════════════════════════════════════╗
║              DRIVESENSE SDK - DATA COLLECTION NOTICE             ║
╠══════════════════════════════════════════════════════════════════╣
║                                                                  ║
║  This SDK processes drive data reported by a detection engine.   ║
║                                                                  ║
║  ✓ WHAT IS PROCESSED:                                            ║
║    • Trip boundaries, distance and sparse path waypoints         ║
║    • Classified driving events (braking, speeding, phone use)    ║
║    • Driver attributes the host application supplies             ║
║                                                                  ║
║  ✗ WHAT IS NOT PROCESSED HERE:                                   ║
║    • Raw sensor streams (handled inside the detection engine)    ║
║    • Any upload to backend servers (out of scope of this SDK)    ║
║                                                                  ║
║  Delivery counters are kept locally and can be inspected         ║
║  anytime with:                                                   ║
║    drivesense status                                             ║
║                                                                  ║
╚══════════════════════════════════════════════════════════════════╝
"#;
