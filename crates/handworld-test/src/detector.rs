//! Scripted landmark detector
//!
//! Replays a fixed list of responses, one per detection. A response can
//! stay pending for a number of polls, report simulated latency on a shared
//! `ManualClock`, or fail. Once the script runs out every detection returns
//! no hands.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use handworld_core::{Hand, HandworldError, HandworldResult};
use handworld_runtime::{DetectionPoll, LandmarkDetector, ManualClock};

/// One scripted detection
#[derive(Clone, Debug)]
pub struct ScriptedResponse {
    pub result: Result<Vec<Hand>, String>,
    /// Polls answered with `Pending` before the result
    pub pending_polls: u32,
    /// Clock advance applied when the result is delivered
    pub latency_ms: f64,
}

impl ScriptedResponse {
    pub fn hands(hands: Vec<Hand>) -> Self {
        Self {
            result: Ok(hands),
            pending_polls: 0,
            latency_ms: 0.0,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: Err(message.into()),
            pending_polls: 0,
            latency_ms: 0.0,
        }
    }

    pub fn pending_for(mut self, polls: u32) -> Self {
        self.pending_polls = polls;
        self
    }

    pub fn with_latency(mut self, latency_ms: f64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

/// What the session did to the detector
#[derive(Clone, Debug, Default)]
pub struct DetectorCalls {
    pub initialized: bool,
    /// Timestamps passed to `begin`
    pub begun: Vec<f64>,
    pub polls: u64,
    pub closed: bool,
}

/// Detector driven by a script
pub struct ScriptedDetector {
    script: VecDeque<ScriptedResponse>,
    current: Option<ScriptedResponse>,
    clock: Option<ManualClock>,
    init_error: Option<String>,
    calls: Rc<RefCell<DetectorCalls>>,
}

impl ScriptedDetector {
    pub fn new(script: impl IntoIterator<Item = ScriptedResponse>) -> Self {
        Self {
            script: script.into_iter().collect(),
            current: None,
            clock: None,
            init_error: None,
            calls: Rc::new(RefCell::new(DetectorCalls::default())),
        }
    }

    /// Every detection returns the given hand lists in turn
    pub fn from_hands(frames: impl IntoIterator<Item = Vec<Hand>>) -> Self {
        Self::new(frames.into_iter().map(ScriptedResponse::hands))
    }

    /// Advance `clock` by each response's latency
    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn failing_init(mut self, message: impl Into<String>) -> Self {
        self.init_error = Some(message.into());
        self
    }

    /// Shared view of the calls made so far
    pub fn calls(&self) -> Rc<RefCell<DetectorCalls>> {
        self.calls.clone()
    }
}

impl LandmarkDetector for ScriptedDetector {
    fn initialize(&mut self) -> HandworldResult<()> {
        self.calls.borrow_mut().initialized = true;
        match &self.init_error {
            Some(message) => Err(HandworldError::DetectorInit(message.clone())),
            None => Ok(()),
        }
    }

    fn begin(&mut self, timestamp: f64) -> HandworldResult<()> {
        self.calls.borrow_mut().begun.push(timestamp);
        self.current = Some(
            self.script
                .pop_front()
                .unwrap_or_else(|| ScriptedResponse::hands(Vec::new())),
        );
        Ok(())
    }

    fn poll(&mut self) -> DetectionPoll {
        self.calls.borrow_mut().polls += 1;

        let Some(response) = self.current.as_mut() else {
            return DetectionPoll::Pending;
        };
        if response.pending_polls > 0 {
            response.pending_polls -= 1;
            return DetectionPoll::Pending;
        }

        let Some(response) = self.current.take() else {
            return DetectionPoll::Pending;
        };
        if let Some(clock) = &self.clock {
            clock.advance(response.latency_ms);
        }
        match response.result {
            Ok(hands) => DetectionPoll::Ready(hands),
            Err(message) => DetectionPoll::Failed(HandworldError::DetectorFailure(message)),
        }
    }

    fn close(&mut self) {
        self.script.clear();
        self.current = None;
        self.calls.borrow_mut().closed = true;
    }
}
