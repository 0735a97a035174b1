//! Wrist motion recognizer (movement)
//!
//! Tracks the wrist of every hand in a short time window and runs two
//! independent detections per frame:
//! - continuous movement from the two newest samples, throttled
//! - horizontal swipe from the oldest vs newest sample, with cooldown
//!
//! Both may fire for the same hand in the same frame.

use handworld_core::{
    EventClass, EventDetails, GestureEvent, GestureKind, HandLandmark, RecognitionFrame,
};
use serde::{Deserialize, Serialize};

use crate::{RecognitionRuntimeState, Recognizer, WristSample};

/// Wrist motion thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WristMotionConfig {
    /// Maximum age of a history sample (ms)
    pub window_ms: f64,
    /// Hard cap on history length
    pub max_samples: usize,
    /// Floor for the velocity time step (ms)
    pub min_dt_ms: f64,
    /// Planar speed above which the wrist is moving (units/ms)
    pub movement_speed: f64,
    /// Minimum gap between movement-active events (ms)
    pub movement_interval_ms: f64,
    /// Shortest swipe (ms)
    pub swipe_min_duration_ms: f64,
    /// Longest swipe (ms)
    pub swipe_max_duration_ms: f64,
    /// |dx| must exceed |dy| by this factor
    pub swipe_dominance: f64,
    /// Minimum horizontal travel
    pub swipe_min_dx: f64,
    /// Maximum vertical drift
    pub swipe_max_dy: f64,
    /// Minimum gap between swipes (ms)
    pub swipe_cooldown_ms: f64,
}

impl Default for WristMotionConfig {
    fn default() -> Self {
        WristMotionConfig {
            window_ms: 700.0,
            max_samples: 60,
            min_dt_ms: 1.0,
            movement_speed: 0.00045,
            movement_interval_ms: 150.0,
            swipe_min_duration_ms: 150.0,
            swipe_max_duration_ms: 700.0,
            swipe_dominance: 1.5,
            swipe_min_dx: 0.18,
            swipe_max_dy: 0.12,
            swipe_cooldown_ms: 450.0,
        }
    }
}

impl WristMotionConfig {
    /// Shorter cooldowns and travel for quick, small gestures
    pub fn responsive() -> Self {
        WristMotionConfig {
            movement_interval_ms: 100.0,
            swipe_min_dx: 0.14,
            swipe_cooldown_ms: 300.0,
            ..Self::default()
        }
    }
}

/// Emits `movement-active`, `swipe-left`, and `swipe-right`
#[derive(Clone, Debug, Default)]
pub struct WristMotionRecognizer {
    config: WristMotionConfig,
}

impl WristMotionRecognizer {
    pub fn new(config: WristMotionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WristMotionConfig {
        &self.config
    }

    fn is_swipe(&self, dx: f64, dy: f64, duration_ms: f64) -> bool {
        let cfg = &self.config;
        let (abs_dx, abs_dy) = (dx.abs(), dy.abs());

        duration_ms >= cfg.swipe_min_duration_ms
            && duration_ms <= cfg.swipe_max_duration_ms
            && abs_dx > abs_dy * cfg.swipe_dominance
            && abs_dx > cfg.swipe_min_dx
            && abs_dy < cfg.swipe_max_dy
    }
}

impl Recognizer for WristMotionRecognizer {
    fn name(&self) -> &'static str {
        "wrist-movement"
    }

    fn class(&self) -> EventClass {
        EventClass::Movement
    }

    fn recognize(
        &self,
        frame: &RecognitionFrame,
        state: &mut RecognitionRuntimeState,
    ) -> Vec<GestureEvent> {
        let cfg = &self.config;
        let now = frame.timestamp;
        let mut events = Vec::new();

        for (hand_index, hand) in frame.indexed_hands() {
            let hand_state = state.hand_mut(hand_index);
            let Some(wrist) = hand.landmark(HandLandmark::Wrist) else {
                continue;
            };

            hand_state.push_wrist(
                WristSample {
                    timestamp: now,
                    x: wrist.x,
                    y: wrist.y,
                    z: wrist.z,
                },
                cfg.window_ms,
                cfg.max_samples,
            );

            let history = &hand_state.wrist_history;
            let len = history.len();
            if len < 2 {
                continue;
            }

            let previous = history[len - 2];
            let current = history[len - 1];
            let start = history[0];

            // Continuous movement
            let dt = (current.timestamp - previous.timestamp).max(cfg.min_dt_ms);
            let vx = (current.x - previous.x) / dt;
            let vy = (current.y - previous.y) / dt;
            let speed = vx.hypot(vy);

            if speed > cfg.movement_speed
                && now - hand_state.last_movement_emit_timestamp > cfg.movement_interval_ms
            {
                hand_state.last_movement_emit_timestamp = now;
                events.push(
                    GestureEvent::new(GestureKind::MovementActive, hand_index, now)
                        .with_details(EventDetails::Movement { vx, vy, speed }),
                );
            }

            // Swipe
            let duration_ms = current.timestamp - start.timestamp;
            let dx = current.x - start.x;
            let dy = current.y - start.y;

            if self.is_swipe(dx, dy, duration_ms)
                && now - hand_state.last_swipe_timestamp > cfg.swipe_cooldown_ms
            {
                hand_state.last_swipe_timestamp = now;
                let kind = if dx > 0.0 {
                    GestureKind::SwipeRight
                } else {
                    GestureKind::SwipeLeft
                };
                events.push(
                    GestureEvent::new(kind, hand_index, now).with_details(EventDetails::Swipe {
                        dx,
                        dy,
                        duration_ms,
                    }),
                );

                // Overlapping data must not produce a second swipe
                hand_state.collapse_history();
            }
        }

        events
    }
}
