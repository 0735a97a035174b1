//! Landmark detection seam
//!
//! Detection may take longer than a frame. The session starts a detection
//! with `begin`, then polls once per frame until the result is ready. At most
//! one detection is in flight; frames that arrive meanwhile are dropped.

use handworld_core::{Hand, HandworldError, HandworldResult};

/// Result of polling an in-flight detection
#[derive(Debug)]
pub enum DetectionPoll {
    /// Still running
    Pending,
    /// Hands in detector order (index 0 first)
    Ready(Vec<Hand>),
    /// The backend failed; recognition is disabled afterwards
    Failed(HandworldError),
}

/// A hand landmark backend
pub trait LandmarkDetector {
    /// Load models and acquire resources
    fn initialize(&mut self) -> HandworldResult<()> {
        Ok(())
    }

    /// Start detecting the frame at `timestamp`
    fn begin(&mut self, timestamp: f64) -> HandworldResult<()>;

    /// Check on the detection started by the last `begin`
    fn poll(&mut self) -> DetectionPoll;

    /// Release resources; no calls follow
    fn close(&mut self) {}
}

/// Synchronous detector built from a closure. Each `begin` runs the closure
/// and the next `poll` returns its result.
pub struct FnDetector<F> {
    detect: F,
    result: Option<HandworldResult<Vec<Hand>>>,
}

impl<F> FnDetector<F>
where
    F: FnMut(f64) -> HandworldResult<Vec<Hand>>,
{
    pub fn new(detect: F) -> Self {
        Self {
            detect,
            result: None,
        }
    }
}

impl<F> LandmarkDetector for FnDetector<F>
where
    F: FnMut(f64) -> HandworldResult<Vec<Hand>>,
{
    fn begin(&mut self, timestamp: f64) -> HandworldResult<()> {
        self.result = Some((self.detect)(timestamp));
        Ok(())
    }

    fn poll(&mut self) -> DetectionPoll {
        match self.result.take() {
            None => DetectionPoll::Pending,
            Some(Ok(hands)) => DetectionPoll::Ready(hands),
            Some(Err(err)) => DetectionPoll::Failed(err),
        }
    }

    fn close(&mut self) {
        self.result = None;
    }
}
