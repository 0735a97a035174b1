//! Handworld Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every Handworld layer:
//! - Landmark points, hands, and recognition frames
//! - Hand landmark indices (21-point hand model)
//! - Gesture events and per-frame recognition output
//! - The error type used across the workspace

pub mod landmark;
pub mod event;
pub mod error;

pub use landmark::*;
pub use event::*;
pub use error::*;
