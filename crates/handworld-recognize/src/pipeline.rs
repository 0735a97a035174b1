//! Recognizer pipeline
//!
//! A fixed, ordered set of one-time recognizers followed by movement
//! recognizers. Every recognizer sees the same frame and the same runtime
//! state; state mutations made by an earlier recognizer are visible to the
//! later ones within the frame.

use handworld_core::{EventClass, FrameRecognition, GestureEvent, HandPointer, RecognitionFrame};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    PinchConfig, PinchRecognizer, RecognitionRuntimeState, WristMotionConfig,
    WristMotionRecognizer,
};

/// A gesture recognizer
pub trait Recognizer {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Which class of events this recognizer emits
    fn class(&self) -> EventClass;

    /// Recognize events in `frame`, updating per-hand runtime state
    fn recognize(
        &self,
        frame: &RecognitionFrame,
        state: &mut RecognitionRuntimeState,
    ) -> Vec<GestureEvent>;
}

/// Configuration for the standard recognizer set
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    pub pinch: PinchConfig,
    pub wrist: WristMotionConfig,
}

/// Ordered recognizer set
pub struct RecognizerPipeline {
    one_time: Vec<Box<dyn Recognizer>>,
    movement: Vec<Box<dyn Recognizer>>,
}

impl RecognizerPipeline {
    /// Empty pipeline
    pub fn new() -> Self {
        Self {
            one_time: Vec::new(),
            movement: Vec::new(),
        }
    }

    /// Pinch transitions + wrist motion
    pub fn standard(config: &RecognizerConfig) -> Self {
        Self::new()
            .with_recognizer(Box::new(PinchRecognizer::new(config.pinch.clone())))
            .with_recognizer(Box::new(WristMotionRecognizer::new(config.wrist.clone())))
    }

    /// Append a recognizer to the list matching its class
    pub fn with_recognizer(mut self, recognizer: Box<dyn Recognizer>) -> Self {
        match recognizer.class() {
            EventClass::OneTime => self.one_time.push(recognizer),
            EventClass::Movement => self.movement.push(recognizer),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.one_time.len() + self.movement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recognizer names in execution order
    pub fn names(&self) -> Vec<&'static str> {
        self.one_time
            .iter()
            .chain(self.movement.iter())
            .map(|r| r.name())
            .collect()
    }

    /// Run every recognizer over one frame
    ///
    /// A frame without hands short-circuits: no recognizer runs and
    /// nothing is emitted.
    pub fn process(
        &self,
        frame: &RecognitionFrame,
        state: &mut RecognitionRuntimeState,
    ) -> FrameRecognition {
        if frame.hands.is_empty() {
            return FrameRecognition::default();
        }

        let one_time_events: Vec<GestureEvent> = self
            .one_time
            .iter()
            .flat_map(|r| r.recognize(frame, state))
            .collect();

        let movement_events: Vec<GestureEvent> = self
            .movement
            .iter()
            .flat_map(|r| r.recognize(frame, state))
            .collect();

        let hand_pointers = frame
            .indexed_hands()
            .map(|(index, hand)| HandPointer::from_hand(index, hand))
            .collect();

        for event in one_time_events.iter().chain(movement_events.iter()) {
            debug!("{}", event);
        }

        FrameRecognition {
            one_time_events,
            movement_events,
            hand_pointers,
        }
    }
}

impl Default for RecognizerPipeline {
    fn default() -> Self {
        Self::standard(&RecognizerConfig::default())
    }
}
