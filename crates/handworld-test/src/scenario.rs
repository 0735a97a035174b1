//! Scenario runner
//!
//! Drives a `Session` the way a host frame loop would: a frame runs only
//! when the session has asked for one, timestamps advance by a fixed
//! interval, and detection latency is simulated on a shared manual clock.

use std::cell::RefCell;
use std::rc::Rc;

use handworld_core::{GestureEvent, Hand, HandworldResult};
use handworld_runtime::{
    FrameClock, FrameOutcome, ManualClock, ManualScheduler, Session, SessionConfig,
};

use crate::detector::{DetectorCalls, ScriptedDetector, ScriptedResponse};

/// A session wired to a scripted detector, manual scheduler, and manual clock
pub struct ScenarioRunner {
    session: Session,
    scheduler: ManualScheduler,
    clock: ManualClock,
    calls: Rc<RefCell<DetectorCalls>>,
    now_ms: f64,
    frame_interval_ms: f64,
    outcomes: Vec<FrameOutcome>,
}

impl ScenarioRunner {
    pub fn new(config: SessionConfig, detector: ScriptedDetector) -> Self {
        let scheduler = ManualScheduler::new();
        let clock = ManualClock::new(0.0);
        let detector = detector.with_clock(clock.clone());
        let calls = detector.calls();
        let session = Session::new(
            config,
            Box::new(detector),
            Box::new(scheduler.clone()),
            Box::new(clock.clone()),
        );

        Self {
            session,
            scheduler,
            clock,
            calls,
            now_ms: 0.0,
            frame_interval_ms: 16.0,
            outcomes: Vec::new(),
        }
    }

    /// Default config, one scripted response per hand list
    pub fn with_hands(frames: impl IntoIterator<Item = Vec<Hand>>) -> Self {
        Self::new(SessionConfig::default(), ScriptedDetector::from_hands(frames))
    }

    pub fn with_responses(responses: impl IntoIterator<Item = ScriptedResponse>) -> Self {
        Self::new(SessionConfig::default(), ScriptedDetector::new(responses))
    }

    pub fn frame_interval(mut self, interval_ms: f64) -> Self {
        self.frame_interval_ms = interval_ms;
        self
    }

    /// Start the session; the first frame runs at timestamp 0
    pub fn start(&mut self) -> HandworldResult<()> {
        self.session.start()
    }

    /// Run the next frame if one is scheduled
    pub fn tick(&mut self) -> Option<FrameOutcome> {
        if !self.scheduler.take_pending() {
            return None;
        }
        let timestamp = self.now_ms;
        self.now_ms += self.frame_interval_ms;
        // Wall time never runs behind frame time
        self.clock.set(self.clock.now_ms().max(timestamp));

        let outcome = self.session.on_frame(timestamp);
        self.outcomes.push(outcome.clone());
        Some(outcome)
    }

    /// Run up to `frames` frames; stops early if nothing is scheduled
    pub fn run(&mut self, frames: usize) -> Vec<FrameOutcome> {
        (0..frames).map_while(|_| self.tick()).collect()
    }

    /// Events from every recognized frame so far, in order
    pub fn events(&self) -> Vec<GestureEvent> {
        self.outcomes
            .iter()
            .filter_map(FrameOutcome::report)
            .flat_map(|report| report.events.iter().cloned())
            .collect()
    }

    pub fn outcomes(&self) -> &[FrameOutcome] {
        &self.outcomes
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn scheduler(&self) -> &ManualScheduler {
        &self.scheduler
    }

    pub fn detector_calls(&self) -> DetectorCalls {
        self.calls.borrow().clone()
    }

    /// Timestamp the next frame will carry
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }
}
