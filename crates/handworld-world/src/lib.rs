//! Handworld World - Shared scene and gesture interaction
//!
//! This crate owns the scene that recognized gestures act on:
//! - Objects, their insertion order, and paint order
//! - Hit testing with z-order tie-break and a 3D depth gate
//! - The per-frame interaction state machine (select, grab, resize, track)
//! - Idle spin for untouched objects

pub mod animation;
pub mod color;
pub mod interaction;
pub mod object;
pub mod world;

pub use animation::*;
pub use color::*;
pub use interaction::*;
pub use object::*;
pub use world::*;
