//! Handworld Session - the per-frame loop
//!
//! A session owns everything that lives for one detector lifetime: the
//! recognizer pipeline and its per-hand state, the world, and the metrics.
//! The host calls `on_frame` from its frame callback. Each frame:
//! 1. Start a detection unless one is already in flight
//! 2. Poll it; if it is not ready the frame is dropped and the world reused
//! 3. On a result: recognize gestures, apply them to the world, record latency
//! 4. Advance idle animation
//! 5. Ask the scheduler for the next frame
//!
//! A detector failure disables recognition for the rest of the session;
//! animation and scheduling carry on.

use std::collections::VecDeque;

use handworld_core::{GestureEvent, HandworldError, HandworldResult, RecognitionFrame};
use handworld_recognize::{RecognitionRuntimeState, RecognizerPipeline};
use handworld_world::{
    IdleAnimator, InteractionEngine, InteractionReport, ObjectRequest, World, WorldSnapshot,
    STATUS_DISABLED_COLOR, STATUS_DOT_ID, STATUS_INITIALIZING_COLOR, STATUS_READY_COLOR,
};
use tracing::{debug, info, trace, warn};

use crate::{
    DetectionPoll, FrameClock, FrameScheduler, FrameStats, LandmarkDetector, LatencyStats,
    SessionConfig,
};

/// Recognition health, mirrored on the status indicator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecognitionStatus {
    /// Detector not initialized yet
    Initializing,
    Ready,
    /// Detector failed; only animation runs
    Disabled,
}

impl RecognitionStatus {
    pub fn indicator_color(self) -> &'static str {
        match self {
            RecognitionStatus::Initializing => STATUS_INITIALIZING_COLOR,
            RecognitionStatus::Ready => STATUS_READY_COLOR,
            RecognitionStatus::Disabled => STATUS_DISABLED_COLOR,
        }
    }
}

/// What a completed detection did
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// Timestamp of the frame the detection started on
    pub timestamp: f64,
    pub hands: usize,
    pub events: Vec<GestureEvent>,
    pub interaction: InteractionReport,
    pub latency_ms: f64,
}

/// Result of one `on_frame` call
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    /// A detection completed and was applied
    Recognized(FrameReport),
    /// Detection still in flight; world reused
    Dropped,
    /// Recognition is not running; only animation advanced
    AnimationOnly,
    /// The detector failed on this frame and recognition is now disabled
    DetectorFailed,
    /// The session was torn down
    Stopped,
}

impl FrameOutcome {
    pub fn report(&self) -> Option<&FrameReport> {
        match self {
            FrameOutcome::Recognized(report) => Some(report),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct InFlight {
    timestamp: f64,
    started_ms: f64,
}

/// One detector lifetime
pub struct Session {
    config: SessionConfig,
    detector: Box<dyn LandmarkDetector>,
    scheduler: Box<dyn FrameScheduler>,
    clock: Box<dyn FrameClock>,
    pipeline: RecognizerPipeline,
    interaction: InteractionEngine,
    animator: IdleAnimator,
    runtime: RecognitionRuntimeState,
    world: World,
    status: RecognitionStatus,
    in_flight: Option<InFlight>,
    last_frame_timestamp: Option<f64>,
    latency: LatencyStats,
    stats: FrameStats,
    /// Newest first
    event_log: VecDeque<String>,
    last_error: Option<String>,
    stopped: bool,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        detector: Box<dyn LandmarkDetector>,
        scheduler: Box<dyn FrameScheduler>,
        clock: Box<dyn FrameClock>,
    ) -> Self {
        let mut session = Session {
            pipeline: RecognizerPipeline::standard(&config.recognizer),
            interaction: InteractionEngine::new(config.interaction.clone()),
            animator: IdleAnimator::new(config.animation.clone()),
            latency: LatencyStats::new(config.latency_smoothing),
            event_log: VecDeque::with_capacity(config.event_log_capacity),
            config,
            detector,
            scheduler,
            clock,
            runtime: RecognitionRuntimeState::new(),
            world: World::new(),
            status: RecognitionStatus::Initializing,
            in_flight: None,
            last_frame_timestamp: None,
            stats: FrameStats::default(),
            last_error: None,
            stopped: false,
        };
        session.set_status(RecognitionStatus::Initializing);
        session
    }

    /// Initialize the detector and schedule the first frame.
    ///
    /// An initialization failure disables recognition and is returned, but
    /// the first frame is still scheduled so animation runs.
    pub fn start(&mut self) -> HandworldResult<()> {
        if self.stopped {
            return Err(HandworldError::SessionStopped);
        }

        let initialized = self.detector.initialize();
        match &initialized {
            Ok(()) => {
                info!(max_hands = self.config.max_hands, "recognition ready");
                self.set_status(RecognitionStatus::Ready);
            }
            Err(err) => self.disable(err),
        }

        self.scheduler.schedule_next_frame();
        initialized
    }

    /// Run one frame. `timestamp` is the host's frame time in milliseconds.
    pub fn on_frame(&mut self, timestamp: f64) -> FrameOutcome {
        if self.stopped {
            return FrameOutcome::Stopped;
        }
        self.stats.frames += 1;

        let delta_seconds = match self.last_frame_timestamp {
            Some(previous) => (timestamp - previous) / 1000.0,
            None => 0.0,
        };
        self.last_frame_timestamp = Some(timestamp);

        let outcome = match self.status {
            RecognitionStatus::Ready => self.detect(timestamp),
            RecognitionStatus::Initializing | RecognitionStatus::Disabled => {
                FrameOutcome::AnimationOnly
            }
        };

        self.animator.step(&mut self.world, delta_seconds);
        self.scheduler.schedule_next_frame();
        outcome
    }

    fn detect(&mut self, timestamp: f64) -> FrameOutcome {
        if self.in_flight.is_none() {
            if let Err(err) = self.detector.begin(timestamp) {
                self.disable(&err);
                return FrameOutcome::DetectorFailed;
            }
            self.in_flight = Some(InFlight {
                timestamp,
                started_ms: self.clock.now_ms(),
            });
            self.stats.detections_started += 1;
        }

        match self.detector.poll() {
            DetectionPoll::Pending => {
                self.stats.dropped_frames += 1;
                trace!(timestamp, "detection in flight, frame dropped");
                FrameOutcome::Dropped
            }
            DetectionPoll::Failed(err) => {
                self.in_flight = None;
                self.disable(&err);
                FrameOutcome::DetectorFailed
            }
            DetectionPoll::Ready(mut hands) => {
                let Some(flight) = self.in_flight.take() else {
                    return FrameOutcome::Dropped;
                };
                let latency_ms = (self.clock.now_ms() - flight.started_ms).max(0.0);
                let average_ms = self.latency.record(latency_ms);

                hands.truncate(self.config.max_hands);
                let frame = RecognitionFrame::new(flight.timestamp, hands);
                let recognition = self.pipeline.process(&frame, &mut self.runtime);
                let interaction = self.interaction.apply(&mut self.world, &recognition);

                let events: Vec<GestureEvent> = recognition.events().cloned().collect();
                for event in &events {
                    self.push_event_log(event.to_string());
                }

                self.stats.detections_completed += 1;
                self.stats.hands_seen += frame.hand_count() as u64;
                self.stats.events_emitted += events.len() as u64;
                debug!(
                    timestamp = flight.timestamp,
                    hands = frame.hand_count(),
                    events = events.len(),
                    latency_ms,
                    average_ms,
                    "frame recognized"
                );

                FrameOutcome::Recognized(FrameReport {
                    timestamp: flight.timestamp,
                    hands: frame.hand_count(),
                    events,
                    interaction,
                    latency_ms,
                })
            }
        }
    }

    fn disable(&mut self, err: &HandworldError) {
        warn!(error = %err, "recognition disabled");
        self.stats.detector_failures += 1;
        self.last_error = Some(err.to_string());
        self.in_flight = None;
        self.set_status(RecognitionStatus::Disabled);
    }

    fn set_status(&mut self, status: RecognitionStatus) {
        self.status = status;
        if let Some(dot) = self.world.get_mut(STATUS_DOT_ID) {
            dot.color = Some(status.indicator_color().to_string());
        }
    }

    fn push_event_log(&mut self, line: String) {
        if self.config.event_log_capacity == 0 {
            return;
        }
        self.event_log.push_front(line);
        self.event_log.truncate(self.config.event_log_capacity);
    }

    /// Stop scheduling, close the detector, and drop all per-hand state.
    /// Idempotent.
    pub fn teardown(&mut self) {
        if self.stopped {
            return;
        }
        self.scheduler.cancel();
        self.detector.close();
        self.runtime.clear();
        self.world.clear_interaction();
        self.in_flight = None;
        self.stopped = true;
        info!(frames = self.stats.frames, "session stopped");
    }

    /// Validate and add an object
    pub fn create_object(&mut self, request: ObjectRequest) -> HandworldResult<String> {
        self.world.create_object(request)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    pub fn runtime_state(&self) -> &RecognitionRuntimeState {
        &self.runtime
    }

    pub fn status(&self) -> RecognitionStatus {
        self.status
    }

    pub fn is_detection_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn latency(&self) -> &LatencyStats {
        &self.latency
    }

    /// Formatted recent events, newest first
    pub fn event_log(&self) -> impl Iterator<Item = &str> {
        self.event_log.iter().map(String::as_str)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
