//! Gesture event definitions
//!
//! Recognizers emit two classes of events:
//! - One-time events are edge-triggered: they fire once per state transition
//!   (pinch-start, pinch-end).
//! - Movement events are level-triggered but rate-limited: they may repeat
//!   while a condition holds (movement-active, swipe-left, swipe-right).
//!
//! Both share the same shape. Event details are a closed payload per type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{HandPointer, HandworldError, LandmarkPoint};

/// Event class
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventClass {
    OneTime,
    Movement,
}

/// Gesture event type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GestureKind {
    PinchStart,
    PinchEnd,
    SwipeLeft,
    SwipeRight,
    MovementActive,
}

impl GestureKind {
    /// Wire/display tag
    pub fn as_str(self) -> &'static str {
        match self {
            GestureKind::PinchStart => "pinch-start",
            GestureKind::PinchEnd => "pinch-end",
            GestureKind::SwipeLeft => "swipe-left",
            GestureKind::SwipeRight => "swipe-right",
            GestureKind::MovementActive => "movement-active",
        }
    }

    pub fn class(self) -> EventClass {
        match self {
            GestureKind::PinchStart | GestureKind::PinchEnd => EventClass::OneTime,
            GestureKind::SwipeLeft | GestureKind::SwipeRight | GestureKind::MovementActive => {
                EventClass::Movement
            }
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GestureKind {
    type Err = HandworldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pinch-start" => Ok(GestureKind::PinchStart),
            "pinch-end" => Ok(GestureKind::PinchEnd),
            "swipe-left" => Ok(GestureKind::SwipeLeft),
            "swipe-right" => Ok(GestureKind::SwipeRight),
            "movement-active" => Ok(GestureKind::MovementActive),
            other => Err(HandworldError::UnknownGesture(other.to_string())),
        }
    }
}

/// Measured values attached to an event
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventDetails {
    /// Thumb-index distance at the transition
    Pinch {
        #[serde(rename = "pinchDistance")]
        pinch_distance: f64,
    },
    /// Wrist displacement over the swipe window
    Swipe {
        dx: f64,
        dy: f64,
        #[serde(rename = "durationMs")]
        duration_ms: f64,
    },
    /// Instantaneous wrist velocity (units/ms)
    Movement { vx: f64, vy: f64, speed: f64 },
}

impl EventDetails {
    /// Key/value pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        match *self {
            EventDetails::Pinch { pinch_distance } => vec![("pinchDistance", pinch_distance)],
            EventDetails::Swipe {
                dx,
                dy,
                duration_ms,
            } => vec![("dx", dx), ("dy", dy), ("durationMs", duration_ms)],
            EventDetails::Movement { vx, vy, speed } => {
                vec![("vx", vx), ("vy", vy), ("speed", speed)]
            }
        }
    }
}

/// A recognized gesture event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    #[serde(rename = "type")]
    pub kind: GestureKind,
    #[serde(rename = "handIndex")]
    pub hand_index: usize,
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<EventDetails>,
}

impl GestureEvent {
    pub fn new(kind: GestureKind, hand_index: usize, timestamp: f64) -> Self {
        Self {
            kind,
            hand_index,
            timestamp,
            details: None,
        }
    }

    pub fn with_details(mut self, details: EventDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn class(&self) -> EventClass {
        self.kind.class()
    }
}

impl fmt::Display for GestureEvent {
    /// `pinch-start (hand 0) · pinchDistance=0.042`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (hand {}) · ", self.kind, self.hand_index)?;
        match &self.details {
            Some(details) => {
                for (i, (key, value)) in details.entries().into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={:.3}", key, value)?;
                }
                Ok(())
            }
            None => f.write_str("no details"),
        }
    }
}

/// Everything recognition produced for one frame
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameRecognition {
    pub one_time_events: Vec<GestureEvent>,
    pub movement_events: Vec<GestureEvent>,
    pub hand_pointers: Vec<HandPointer>,
}

impl FrameRecognition {
    /// No events and no hands
    pub fn is_empty(&self) -> bool {
        self.one_time_events.is_empty()
            && self.movement_events.is_empty()
            && self.hand_pointers.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.one_time_events.len() + self.movement_events.len()
    }

    /// One-time events first, then movement events
    pub fn events(&self) -> impl Iterator<Item = &GestureEvent> {
        self.one_time_events.iter().chain(self.movement_events.iter())
    }

    /// Index fingertip for a hand, if it reported one this frame
    pub fn pointer(&self, hand_index: usize) -> Option<LandmarkPoint> {
        self.hand_pointers
            .iter()
            .find(|p| p.hand_index == hand_index)
            .and_then(|p| p.index_tip)
    }
}
