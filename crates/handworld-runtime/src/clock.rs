//! Clocks for latency measurement
//!
//! Frame timestamps come from the host's frame callback; these clocks only
//! time how long detection takes.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Millisecond clock
pub trait FrameClock {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `Instant`, zero at construction
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    reference: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            reference: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.reference.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl FrameClock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
