//! Per-hand runtime state for recognizers

use std::collections::{BTreeMap, VecDeque};

/// One wrist observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WristSample {
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Recognizer memory for one hand index
#[derive(Debug, Clone)]
pub struct HandRuntimeState {
    /// Was the hand pinching on the previous frame?
    pub last_pinch: bool,
    /// Timestamp of the last swipe emitted for this hand
    pub last_swipe_timestamp: f64,
    /// Timestamp of the last movement-active emitted for this hand
    pub last_movement_emit_timestamp: f64,
    /// Wrist positions, oldest first
    pub wrist_history: VecDeque<WristSample>,
}

impl HandRuntimeState {
    pub fn new() -> Self {
        Self {
            last_pinch: false,
            last_swipe_timestamp: f64::NEG_INFINITY,
            last_movement_emit_timestamp: f64::NEG_INFINITY,
            wrist_history: VecDeque::new(),
        }
    }

    /// Append a sample, then trim by age and by count (oldest first)
    pub fn push_wrist(&mut self, sample: WristSample, window_ms: f64, max_samples: usize) {
        self.wrist_history.push_back(sample);

        let now = sample.timestamp;
        self.wrist_history
            .retain(|s| now - s.timestamp <= window_ms);

        while self.wrist_history.len() > max_samples {
            self.wrist_history.pop_front();
        }
    }

    /// Drop all history but the newest sample
    pub fn collapse_history(&mut self) {
        if let Some(latest) = self.wrist_history.back().copied() {
            self.wrist_history.clear();
            self.wrist_history.push_back(latest);
        }
    }
}

impl Default for HandRuntimeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime state for every hand index seen during a detector session
///
/// Entries are created lazily and never dropped individually; only
/// `clear` (session teardown) removes them.
#[derive(Debug, Clone, Default)]
pub struct RecognitionRuntimeState {
    per_hand: BTreeMap<usize, HandRuntimeState>,
}

impl RecognitionRuntimeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state for a hand index, creating it on first sighting
    pub fn hand_mut(&mut self, hand_index: usize) -> &mut HandRuntimeState {
        self.per_hand.entry(hand_index).or_default()
    }

    pub fn hand(&self, hand_index: usize) -> Option<&HandRuntimeState> {
        self.per_hand.get(&hand_index)
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.per_hand.clear();
    }

    pub fn len(&self) -> usize {
        self.per_hand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_hand.is_empty()
    }

    pub fn hand_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.per_hand.keys().copied()
    }
}
