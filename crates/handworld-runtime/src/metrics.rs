//! Session metrics
//!
//! Reporting only; nothing in the frame loop reads these back.

use serde::Serialize;

/// Detection latency with an exponential moving average
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyStats {
    /// Weight of each new sample
    smoothing: f64,
    last_ms: Option<f64>,
    average_ms: Option<f64>,
    samples: u64,
}

impl LatencyStats {
    pub fn new(smoothing: f64) -> Self {
        Self {
            smoothing: smoothing.clamp(0.0, 1.0),
            last_ms: None,
            average_ms: None,
            samples: 0,
        }
    }

    /// Record a sample and return the new average.
    /// `avg' = avg * (1 - s) + sample * s`, seeded by the first sample.
    pub fn record(&mut self, sample_ms: f64) -> f64 {
        let average = match self.average_ms {
            Some(avg) => avg * (1.0 - self.smoothing) + sample_ms * self.smoothing,
            None => sample_ms,
        };
        self.last_ms = Some(sample_ms);
        self.average_ms = Some(average);
        self.samples += 1;
        average
    }

    pub fn last_ms(&self) -> Option<f64> {
        self.last_ms
    }

    pub fn average_ms(&self) -> Option<f64> {
        self.average_ms
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
        self.average_ms = None;
        self.samples = 0;
    }
}

impl Default for LatencyStats {
    fn default() -> Self {
        Self::new(0.1)
    }
}

/// Frame loop counters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    pub frames: u64,
    pub detections_started: u64,
    pub detections_completed: u64,
    /// Frames that arrived while a detection was still in flight
    pub dropped_frames: u64,
    pub detector_failures: u64,
    pub events_emitted: u64,
    pub hands_seen: u64,
}
