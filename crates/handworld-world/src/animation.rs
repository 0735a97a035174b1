//! Idle spin
//!
//! Objects nobody is touching rotate slowly. Selected or grabbed objects,
//! hidden objects, and objects with animation disabled hold still.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, TAU};

use serde::{Deserialize, Serialize};

use crate::object::WorldObject;
use crate::world::World;

/// Default spin speeds, radians per second
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub spin_speed_3d: f64,
    pub spin_speed_2d: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            spin_speed_3d: FRAC_PI_2,
            spin_speed_2d: FRAC_PI_3,
        }
    }
}

/// Wrap an angle into `[0, 2π)`
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negatives up to exactly TAU
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Advances idle rotation
#[derive(Clone, Debug, Default)]
pub struct IdleAnimator {
    config: AnimationConfig,
}

impl IdleAnimator {
    pub fn new(config: AnimationConfig) -> Self {
        Self { config }
    }

    /// Spin speed of an object, honoring its override
    pub fn spin_speed(&self, object: &WorldObject) -> f64 {
        object
            .animation
            .and_then(|a| a.spin_speed)
            .unwrap_or(if object.kind.is_3d() {
                self.config.spin_speed_3d
            } else {
                self.config.spin_speed_2d
            })
    }

    /// Advance every idle object by `delta_seconds`; returns how many moved.
    /// Non-positive deltas do nothing.
    pub fn step(&self, world: &mut World, delta_seconds: f64) -> usize {
        if !(delta_seconds > 0.0) {
            return 0;
        }

        let interaction = &world.interaction;
        let mut advanced = 0;
        for object in world.objects.values_mut() {
            if !object.visible || !object.animation_enabled() || interaction.is_interacted(&object.id) {
                continue;
            }
            let speed = self.spin_speed(object);
            object.rotation = normalize_angle(object.rotation + speed * delta_seconds);
            advanced += 1;
        }
        advanced
    }
}
