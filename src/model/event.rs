//! Classified driving-behavior events.
//!
//! Events are produced by the detection engine and delivered to the host as
//! part of an end-of-drive payload. They are read-only to the host, so both
//! construction points ([`Event::new`] and deserialization of recorded
//! payloads) enforce the cross-field rules: speeding data exists exactly
//! for over-speeding events, and a turn direction exists exactly for hard
//! turns.

use crate::model::location::LocationPoint;
use serde::{Deserialize, Serialize};

/// The classification of a driving-behavior event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Braking too hard.
    HardBrake,
    /// Accelerating too fast.
    AggressiveAcceleration,
    /// Handling the phone while driving.
    PhoneHandling,
    /// Speeding more than allowed. Carries [`SpeedingData`].
    OverSpeeding,
    /// A collision detected by the engine. Also reported in realtime via
    /// the accident callback.
    Accident,
    /// A hard left or right turn.
    HardTurn,
    /// Interacting with the phone screen while driving.
    PhoneScreenInteraction,
}

impl EventType {
    /// Stable lowercase name, matching the recorded wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::HardBrake => "hard_brake",
            EventType::AggressiveAcceleration => "aggressive_acceleration",
            EventType::PhoneHandling => "phone_handling",
            EventType::OverSpeeding => "over_speeding",
            EventType::Accident => "accident",
            EventType::HardTurn => "hard_turn",
            EventType::PhoneScreenInteraction => "phone_screen_interaction",
        }
    }
}

/// Severity of an event, where applicable for its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    /// Severity not applicable for this event type.
    #[default]
    None,
    Low,
    High,
}

/// Turn direction of a hard-turn event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    /// Returned for every event type other than hard turns.
    #[default]
    NotAvailable,
    Left,
    Right,
}

/// Speed observations attached to an over-speeding event.
///
/// `user_speed_mps` is the average over the event duration. Semantics imply
/// `user_speed_mps <= max_user_speed_mps` and both above the limit, but the
/// engine interface does not guarantee it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedingData {
    /// The speed limit in metres per second.
    pub speed_limit_mps: f64,
    /// Average user speed over the event duration in metres per second.
    pub user_speed_mps: f64,
    /// Maximum user speed over the event duration in metres per second.
    pub max_user_speed_mps: f64,
}

impl SpeedingData {
    pub fn new(speed_limit_mps: f64, user_speed_mps: f64, max_user_speed_mps: f64) -> Self {
        Self {
            speed_limit_mps,
            user_speed_mps,
            max_user_speed_mps,
        }
    }
}

/// Event classification with its type-specific payload.
///
/// Modeling the payload as part of the variant makes the invalid
/// combinations (speeding data on a brake event, a turn direction on a
/// phone-handling event) unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    HardBrake,
    AggressiveAcceleration,
    PhoneHandling,
    OverSpeeding(SpeedingData),
    Accident,
    HardTurn(TurnDirection),
    PhoneScreenInteraction,
}

impl EventKind {
    /// The flat classification tag for this kind.
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::HardBrake => EventType::HardBrake,
            EventKind::AggressiveAcceleration => EventType::AggressiveAcceleration,
            EventKind::PhoneHandling => EventType::PhoneHandling,
            EventKind::OverSpeeding(_) => EventType::OverSpeeding,
            EventKind::Accident => EventType::Accident,
            EventKind::HardTurn(_) => EventType::HardTurn,
            EventKind::PhoneScreenInteraction => EventType::PhoneScreenInteraction,
        }
    }
}

/// Errors rejecting an invalid event at a construction boundary.
#[derive(Debug, PartialEq, Eq)]
pub enum EventError {
    /// `start_time` is after `end_time`.
    StartAfterEnd { start_time: i64, end_time: i64 },
    /// A hard turn must carry a left or right direction.
    MissingTurnDirection,
    /// A turn direction was supplied for a non-hard-turn event.
    UnexpectedTurnDirection(EventType),
    /// An over-speeding event must carry speeding data.
    MissingSpeedingData,
    /// Speeding data was supplied for a non-over-speeding event.
    UnexpectedSpeedingData(EventType),
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventError::StartAfterEnd {
                start_time,
                end_time,
            } => {
                write!(f, "event start {start_time} is after end {end_time}")
            }
            EventError::MissingTurnDirection => {
                write!(f, "hard turn event has no turn direction")
            }
            EventError::UnexpectedTurnDirection(t) => {
                write!(f, "turn direction supplied for {} event", t.as_str())
            }
            EventError::MissingSpeedingData => {
                write!(f, "over-speeding event has no speeding data")
            }
            EventError::UnexpectedSpeedingData(t) => {
                write!(f, "speeding data supplied for {} event", t.as_str())
            }
        }
    }
}

impl std::error::Error for EventError {}

/// One detected driving-behavior occurrence within a drive.
///
/// Immutable once constructed. Fields are reached through accessors so no
/// host-side mutation can break the construction-time invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent", into = "RawEvent")]
pub struct Event {
    start_location: LocationPoint,
    stop_location: LocationPoint,
    start_time: i64,
    end_time: i64,
    severity: EventSeverity,
    kind: EventKind,
}

impl Event {
    /// Build an event, validating the time range and the kind payload.
    pub fn new(
        start_location: LocationPoint,
        stop_location: LocationPoint,
        start_time: i64,
        end_time: i64,
        severity: EventSeverity,
        kind: EventKind,
    ) -> Result<Self, EventError> {
        if start_time > end_time {
            return Err(EventError::StartAfterEnd {
                start_time,
                end_time,
            });
        }
        if matches!(kind, EventKind::HardTurn(TurnDirection::NotAvailable)) {
            return Err(EventError::MissingTurnDirection);
        }
        Ok(Self {
            start_location,
            stop_location,
            start_time,
            end_time,
            severity,
            kind,
        })
    }

    pub fn start_location(&self) -> &LocationPoint {
        &self.start_location
    }

    pub fn stop_location(&self) -> &LocationPoint {
        &self.stop_location
    }

    /// Epoch timestamp of the start of the event in milliseconds.
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Epoch timestamp of the end of the event in milliseconds.
    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    pub fn duration_millis(&self) -> i64 {
        self.end_time - self.start_time
    }

    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// Severity of the event; [`EventSeverity::None`] when severity does not
    /// apply to this event type.
    pub fn severity(&self) -> EventSeverity {
        self.severity
    }

    /// Turn direction; [`TurnDirection::NotAvailable`] for every event type
    /// other than hard turns.
    pub fn turn_direction(&self) -> TurnDirection {
        match self.kind {
            EventKind::HardTurn(direction) => direction,
            _ => TurnDirection::NotAvailable,
        }
    }

    /// Speed observations, present exactly when the event is over-speeding.
    pub fn speeding_data(&self) -> Option<&SpeedingData> {
        match &self.kind {
            EventKind::OverSpeeding(data) => Some(data),
            _ => None,
        }
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }
}

/// Flat wire form of an event, as the engine records it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawEvent {
    start_location: LocationPoint,
    stop_location: LocationPoint,
    start_time: i64,
    end_time: i64,
    event_type: EventType,
    #[serde(default)]
    event_severity: EventSeverity,
    #[serde(default)]
    turn_direction: TurnDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speeding_data: Option<SpeedingData>,
}

impl TryFrom<RawEvent> for Event {
    type Error = EventError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        if raw.event_type != EventType::HardTurn && raw.turn_direction != TurnDirection::NotAvailable
        {
            return Err(EventError::UnexpectedTurnDirection(raw.event_type));
        }
        if raw.event_type != EventType::OverSpeeding && raw.speeding_data.is_some() {
            return Err(EventError::UnexpectedSpeedingData(raw.event_type));
        }

        let kind = match raw.event_type {
            EventType::HardBrake => EventKind::HardBrake,
            EventType::AggressiveAcceleration => EventKind::AggressiveAcceleration,
            EventType::PhoneHandling => EventKind::PhoneHandling,
            EventType::OverSpeeding => {
                EventKind::OverSpeeding(raw.speeding_data.ok_or(EventError::MissingSpeedingData)?)
            }
            EventType::Accident => EventKind::Accident,
            EventType::HardTurn => EventKind::HardTurn(raw.turn_direction),
            EventType::PhoneScreenInteraction => EventKind::PhoneScreenInteraction,
        };

        Event::new(
            raw.start_location,
            raw.stop_location,
            raw.start_time,
            raw.end_time,
            raw.event_severity,
            kind,
        )
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        let turn_direction = event.turn_direction();
        let speeding_data = event.speeding_data().copied();
        Self {
            start_location: event.start_location,
            stop_location: event.stop_location,
            start_time: event.start_time,
            end_time: event.end_time,
            event_type: event.kind.event_type(),
            event_severity: event.severity,
            turn_direction,
            speeding_data,
        }
    }
}
