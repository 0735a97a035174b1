//! Synthetic hands and wrist trajectories
//!
//! Builders produce complete 21-point hands whose only meaningful landmarks
//! are the wrist (0), thumb tip (4), and index tip (8). Trajectories move
//! the whole hand rigidly, optionally with seeded jitter.

use handworld_core::{Hand, HandLandmark, LandmarkPoint, RecognitionFrame, HAND_LANDMARK_COUNT};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Thumb-index gap of an open hand (well above the pinch threshold)
pub const OPEN_GAP: f64 = 0.125;

/// Wrist sits this far below the index tip
pub const WRIST_OFFSET: f64 = 0.25;

/// Hand builder anchored at the index fingertip
#[derive(Clone, Copy, Debug)]
pub struct HandBuilder {
    index_tip: LandmarkPoint,
    pinch_gap: f64,
}

impl HandBuilder {
    /// Open hand pointing at `(x, y)` at camera depth `z`
    pub fn pointing_at(x: f64, y: f64, z: f64) -> Self {
        Self {
            index_tip: LandmarkPoint::new(x, y, z),
            pinch_gap: OPEN_GAP,
        }
    }

    /// Hand whose wrist is at `(x, y)`
    pub fn wrist_at(x: f64, y: f64) -> Self {
        Self::pointing_at(x, y - WRIST_OFFSET, 0.0)
    }

    pub fn pinched(mut self) -> Self {
        self.pinch_gap = 0.0;
        self
    }

    pub fn open(mut self) -> Self {
        self.pinch_gap = OPEN_GAP;
        self
    }

    pub fn with_pinch_gap(mut self, gap: f64) -> Self {
        self.pinch_gap = gap;
        self
    }

    /// Shift the whole hand
    pub fn translated(mut self, dx: f64, dy: f64) -> Self {
        self.index_tip.x += dx;
        self.index_tip.y += dy;
        self
    }

    pub fn build(self) -> Hand {
        let tip = self.index_tip;
        let wrist = LandmarkPoint::new(tip.x, tip.y + WRIST_OFFSET, 0.0);
        let mut landmarks = vec![wrist; HAND_LANDMARK_COUNT];

        // Fingers fan out between wrist and tip; only 0, 4 and 8 matter
        for landmark in HandLandmark::all() {
            let i = landmark.index();
            if i == 0 {
                continue;
            }
            let t = (i % 4) as f64 * 0.25;
            landmarks[i] = LandmarkPoint::new(
                tip.x + 0.02 * (i / 4) as f64,
                wrist.y - t * WRIST_OFFSET,
                tip.z,
            );
        }
        landmarks[HandLandmark::IndexTip.index()] = tip;
        landmarks[HandLandmark::ThumbTip.index()] =
            LandmarkPoint::new(tip.x - self.pinch_gap, tip.y, tip.z);

        Hand::new(landmarks)
    }
}

/// A hand with fewer than 21 landmarks
pub fn truncated_hand(len: usize) -> Hand {
    Hand::new(vec![LandmarkPoint::new(0.5, 0.5, 0.0); len.min(HAND_LANDMARK_COUNT - 1)])
}

/// Linear wrist motion sampled at a fixed step
#[derive(Clone, Debug)]
pub struct WristTrajectory {
    pub start: (f64, f64),
    pub delta: (f64, f64),
    pub duration_ms: f64,
    pub step_ms: f64,
    jitter: Option<(u64, f64)>,
}

impl WristTrajectory {
    pub fn new(start: (f64, f64), delta: (f64, f64), duration_ms: f64) -> Self {
        Self {
            start,
            delta,
            duration_ms,
            step_ms: 50.0,
            jitter: None,
        }
    }

    /// Horizontal swipe from the screen center
    pub fn swipe(dx: f64, dy: f64, duration_ms: f64) -> Self {
        Self::new((0.5 - dx / 2.0, 0.6), (dx, dy), duration_ms)
    }

    pub fn with_step(mut self, step_ms: f64) -> Self {
        self.step_ms = step_ms;
        self
    }

    /// Add uniform noise in `±amplitude` to every sample except the
    /// endpoints, reproducible from `seed`
    pub fn with_jitter(mut self, seed: u64, amplitude: f64) -> Self {
        self.jitter = Some((seed, amplitude));
        self
    }

    /// Number of samples, endpoints included
    pub fn sample_count(&self) -> usize {
        (self.duration_ms / self.step_ms).round() as usize + 1
    }

    /// `(offset_ms, x, y)` wrist samples
    pub fn samples(&self) -> Vec<(f64, f64, f64)> {
        let count = self.sample_count();
        let mut noise = self.jitter.map(|(seed, amplitude)| {
            (
                StdRng::seed_from_u64(seed),
                Uniform::new_inclusive(-amplitude, amplitude),
            )
        });

        (0..count)
            .map(|i| {
                let progress = if count > 1 { i as f64 / (count - 1) as f64 } else { 1.0 };
                let mut x = self.start.0 + self.delta.0 * progress;
                let mut y = self.start.1 + self.delta.1 * progress;
                if let Some((rng, dist)) = noise.as_mut() {
                    if i > 0 && i + 1 < count {
                        x += dist.sample(&mut *rng);
                        y += dist.sample(&mut *rng);
                    }
                }
                (self.duration_ms * progress, x, y)
            })
            .collect()
    }

    /// One-hand frames starting at `start_ms`
    pub fn frames(&self, start_ms: f64) -> Vec<RecognitionFrame> {
        self.samples()
            .into_iter()
            .map(|(offset, x, y)| {
                RecognitionFrame::new(start_ms + offset, vec![HandBuilder::wrist_at(x, y).build()])
            })
            .collect()
    }

    /// Hand lists only, for scripted detectors
    pub fn hands(&self) -> Vec<Vec<Hand>> {
        self.samples()
            .into_iter()
            .map(|(_, x, y)| vec![HandBuilder::wrist_at(x, y).build()])
            .collect()
    }
}
