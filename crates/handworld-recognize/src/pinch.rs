//! Pinch transition recognizer (one-time)

use handworld_core::{
    EventClass, EventDetails, GestureEvent, GestureKind, HandLandmark, RecognitionFrame,
};
use serde::{Deserialize, Serialize};

use crate::{RecognitionRuntimeState, Recognizer};

/// Pinch thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinchConfig {
    /// Thumb-index planar distance below which the hand is pinching
    pub threshold: f64,
}

impl Default for PinchConfig {
    fn default() -> Self {
        PinchConfig { threshold: 0.06 }
    }
}

/// Emits `pinch-start` / `pinch-end` once per edge
#[derive(Clone, Debug, Default)]
pub struct PinchRecognizer {
    config: PinchConfig,
}

impl PinchRecognizer {
    pub fn new(config: PinchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PinchConfig {
        &self.config
    }
}

impl Recognizer for PinchRecognizer {
    fn name(&self) -> &'static str {
        "pinch-transition"
    }

    fn class(&self) -> EventClass {
        EventClass::OneTime
    }

    fn recognize(
        &self,
        frame: &RecognitionFrame,
        state: &mut RecognitionRuntimeState,
    ) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        for (hand_index, hand) in frame.indexed_hands() {
            let hand_state = state.hand_mut(hand_index);

            let (Some(thumb), Some(index)) = (
                hand.landmark(HandLandmark::ThumbTip),
                hand.landmark(HandLandmark::IndexTip),
            ) else {
                continue;
            };

            let pinch_distance = thumb.planar_distance(index);
            let is_pinching = pinch_distance < self.config.threshold;

            let kind = match (hand_state.last_pinch, is_pinching) {
                (false, true) => Some(GestureKind::PinchStart),
                (true, false) => Some(GestureKind::PinchEnd),
                _ => None,
            };

            if let Some(kind) = kind {
                events.push(
                    GestureEvent::new(kind, hand_index, frame.timestamp)
                        .with_details(EventDetails::Pinch { pinch_distance }),
                );
            }

            hand_state.last_pinch = is_pinching;
        }

        events
    }
}
