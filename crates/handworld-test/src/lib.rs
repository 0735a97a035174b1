//! Handworld Test Harness - Synthetic input and scenario testing
//!
//! This crate provides:
//! - Synthetic hand builders and wrist trajectories (seeded jitter)
//! - A scripted landmark detector with latency, pending, and failure modes
//! - A scenario runner that drives a full session frame by frame
//! - End-to-end scenario tests

pub mod detector;
pub mod integration;
pub mod scenario;
pub mod synth;

pub use detector::*;
pub use scenario::*;
pub use synth::*;
