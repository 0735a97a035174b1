//! Landmark frames - what the hand detector sees
//!
//! A detector reports, per frame, zero or more hands. Each hand is an
//! ordered list of 21 landmark points in normalized image coordinates:
//! origin top-left, x right, y down, z growing away from the camera.
//!
//! A hand's index is its position in the frame's list. It is NOT a stable
//! identity: when a hand disappears, the remaining hands may shift down.

use serde::{Deserialize, Serialize};

/// Number of landmarks in a complete hand
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Hand landmark identifier (21-point hand model)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,

    // Thumb
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,

    // Index finger
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,

    // Middle finger
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,

    // Ring finger
    RingMcp,
    RingPip,
    RingDip,
    RingTip,

    // Pinky
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    /// All landmarks in detector order
    pub fn all() -> &'static [HandLandmark] {
        &[
            HandLandmark::Wrist,
            HandLandmark::ThumbCmc,
            HandLandmark::ThumbMcp,
            HandLandmark::ThumbIp,
            HandLandmark::ThumbTip,
            HandLandmark::IndexMcp,
            HandLandmark::IndexPip,
            HandLandmark::IndexDip,
            HandLandmark::IndexTip,
            HandLandmark::MiddleMcp,
            HandLandmark::MiddlePip,
            HandLandmark::MiddleDip,
            HandLandmark::MiddleTip,
            HandLandmark::RingMcp,
            HandLandmark::RingPip,
            HandLandmark::RingDip,
            HandLandmark::RingTip,
            HandLandmark::PinkyMcp,
            HandLandmark::PinkyPip,
            HandLandmark::PinkyDip,
            HandLandmark::PinkyTip,
        ]
    }

    /// Position of this landmark in a hand's landmark list
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Number of landmarks
    pub fn count() -> usize {
        HAND_LANDMARK_COUNT
    }
}

/// A single landmark in normalized coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance in the image plane (z ignored)
    pub fn planar_distance(&self, other: &LandmarkPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One detected hand
///
/// Landmarks are kept as a list rather than a fixed array: a malformed
/// detection may be short, and recognizers must skip missing points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub landmarks: Vec<LandmarkPoint>,
}

impl Hand {
    pub fn new(landmarks: Vec<LandmarkPoint>) -> Self {
        Self { landmarks }
    }

    /// Get a landmark, if the detector reported it
    pub fn landmark(&self, landmark: HandLandmark) -> Option<&LandmarkPoint> {
        self.landmarks.get(landmark.index())
    }

    /// Does this hand carry all 21 landmarks?
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= HAND_LANDMARK_COUNT
    }
}

/// One frame of detector output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionFrame {
    /// Monotonic timestamp in milliseconds
    pub timestamp: f64,
    /// Detected hands, indexed by position
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl RecognitionFrame {
    pub fn new(timestamp: f64, hands: Vec<Hand>) -> Self {
        Self { timestamp, hands }
    }

    /// A frame in which no hand was detected
    pub fn empty(timestamp: f64) -> Self {
        Self {
            timestamp,
            hands: Vec::new(),
        }
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }

    /// Iterate hands together with their frame-local index
    pub fn indexed_hands(&self) -> impl Iterator<Item = (usize, &Hand)> {
        self.hands.iter().enumerate()
    }
}

/// Per-hand pointer (index fingertip) carried from recognition to interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandPointer {
    pub hand_index: usize,
    pub index_tip: Option<LandmarkPoint>,
}

impl HandPointer {
    /// Pointer for a hand, taken from its index fingertip
    pub fn from_hand(hand_index: usize, hand: &Hand) -> Self {
        Self {
            hand_index,
            index_tip: hand.landmark(HandLandmark::IndexTip).copied(),
        }
    }
}
