//! Data model for drives, events and accident reports.
//!
//! Everything here is a value type constructed by the detection engine and
//! read-only to the host. Cross-field invariants are enforced wherever an
//! instance enters the process: typed constructors and deserialization of
//! recorded payloads.

pub mod accident;
pub mod drive;
pub mod event;
pub mod location;

// Re-export commonly used types
pub use accident::{AccidentConfidence, AccidentError, AccidentInfo};
pub use drive::{DriveError, DriveInfo, DriveResumeInfo, InsurancePeriod};
pub use event::{
    Event, EventError, EventKind, EventSeverity, EventType, SpeedingData, TurnDirection,
};
pub use location::LocationPoint;
