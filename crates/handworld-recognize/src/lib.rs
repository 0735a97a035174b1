//! Handworld Recognize - Gesture recognition from landmark frames
//!
//! Recognizers are functions of (current frame, runtime state) → events.
//! Their only side effects land in the per-hand runtime state:
//! - Pinch transitions (one-time, edge-triggered)
//! - Wrist motion: continuous movement and horizontal swipes (movement,
//!   rate-limited)
//!
//! Runtime state is keyed by frame-local hand index, which is NOT a stable
//! hand identity. A hand that vanishes and returns under the same index
//! inherits whatever state that index last held.

pub mod runtime;
pub mod pinch;
pub mod motion;
pub mod pipeline;

pub use runtime::*;
pub use pinch::*;
pub use motion::*;
pub use pipeline::*;
