//! Handworld Runtime - Session orchestration and frame loop
//!
//! This crate wires detection, recognition, interaction, and animation into
//! a cooperative, single-threaded frame loop:
//! - `LandmarkDetector`: begin/poll detection seam with an in-flight guard
//! - `FrameScheduler`: host frame callbacks, cancelled on teardown
//! - `FrameClock`: latency timing
//! - `Session`: the per-frame pipeline and its lifecycle
//! - Config loading and tracing setup

pub mod clock;
pub mod config;
pub mod detector;
pub mod logging;
pub mod metrics;
pub mod scheduler;
pub mod session;

pub use clock::*;
pub use config::*;
pub use detector::*;
pub use logging::*;
pub use metrics::*;
pub use scheduler::*;
pub use session::*;
