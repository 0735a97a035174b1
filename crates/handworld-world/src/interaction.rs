//! Gesture-driven world interaction
//!
//! Applied once per frame, in a fixed order:
//! 1. hit testing and selection (with lost-hand cleanup)
//! 2. one-time events: pinch-start grabs, pinch-end releases
//! 3. movement events: swipes resize, movement raises
//! 4. pointer tracking for grabbed objects
//!
//! Each step sees the bindings left by the previous one, so a grab made in
//! step 2 is tracked in step 4 of the same frame.

use std::collections::BTreeMap;

use handworld_core::{FrameRecognition, GestureEvent, GestureKind, LandmarkPoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{invert_hex_color, FALLBACK_INVERTED_COLOR};
use crate::object::{WorldObject, MIN_OBJECT_EXTENT};
use crate::world::World;

/// Interaction tuning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Slack added to half the object depth in the 3D depth gate
    pub depth_tolerance: f64,
    /// Size factor for swipe-right
    pub grow_factor: f64,
    /// Size factor for swipe-left
    pub shrink_factor: f64,
    pub min_extent: f64,
    pub max_extent: f64,
    /// Used when an object's color can't be inverted
    pub fallback_color: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            depth_tolerance: 0.15,
            grow_factor: 1.08,
            shrink_factor: 0.92,
            min_extent: MIN_OBJECT_EXTENT,
            max_extent: 1.0,
            fallback_color: FALLBACK_INVERTED_COLOR.to_string(),
        }
    }
}

/// Normalized depth of a raw landmark z (negative is toward the camera)
pub fn pointer_depth(z: f64) -> f64 {
    (0.5 - 2.0 * z).clamp(0.0, 1.0)
}

/// What one frame of interaction changed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InteractionReport {
    pub hands_pruned: usize,
    pub selections: usize,
    pub grabs_started: usize,
    pub grabs_released: usize,
    pub resized: usize,
    pub raised: usize,
    pub tracked: usize,
}

/// Applies recognized gestures to a world
#[derive(Clone, Debug, Default)]
pub struct InteractionEngine {
    config: InteractionConfig,
}

impl InteractionEngine {
    pub fn new(config: InteractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Does `object` contain the pointer?
    pub fn contains(&self, object: &WorldObject, pointer: &LandmarkPoint) -> bool {
        let half_width = object.size.width / 2.0;
        let half_height = object.size.height / 2.0;
        let dx = pointer.x - object.position.x;
        let dy = pointer.y - object.position.y;

        let inside = if object.kind.is_rect_like() {
            dx.abs() <= half_width && dy.abs() <= half_height
        } else {
            let radius = half_width.min(half_height);
            (dx * dx + dy * dy).sqrt() <= radius
        };
        if !inside {
            return false;
        }

        if object.kind.is_3d() {
            let depth_gap = (pointer_depth(pointer.z) - object.depth_position()).abs();
            return depth_gap <= object.depth_extent() / 2.0 + self.config.depth_tolerance;
        }

        true
    }

    /// Topmost visible interactable object under the pointer.
    /// Score is `zIndex * 10000 + order index`; higher wins.
    pub fn hit_test(&self, world: &World, pointer: &LandmarkPoint) -> Option<String> {
        let mut best: Option<(i128, &str)> = None;

        for (order_index, id) in world.object_order.iter().enumerate() {
            let Some(object) = world.objects.get(id) else {
                continue;
            };
            if !object.visible || !object.interactable || !self.contains(object, pointer) {
                continue;
            }

            let score = i128::from(object.z_index) * 10_000 + order_index as i128;
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, id));
            }
        }

        best.map(|(_, id)| id.to_string())
    }

    /// Run all four interaction steps for one frame
    pub fn apply(&self, world: &mut World, recognition: &FrameRecognition) -> InteractionReport {
        let mut report = InteractionReport::default();

        let pointers: BTreeMap<usize, LandmarkPoint> = recognition
            .hand_pointers
            .iter()
            .filter_map(|p| p.index_tip.map(|tip| (p.hand_index, tip)))
            .collect();

        self.update_selection(world, &pointers, &mut report);

        for event in &recognition.one_time_events {
            self.apply_one_time(world, event, &mut report);
        }

        for event in &recognition.movement_events {
            self.apply_movement(world, event, &mut report);
        }

        self.track_grabs(world, &pointers, &mut report);

        report
    }

    fn update_selection(
        &self,
        world: &mut World,
        pointers: &BTreeMap<usize, LandmarkPoint>,
        report: &mut InteractionReport,
    ) {
        for hand in world.interaction.bound_hands() {
            if !pointers.contains_key(&hand) {
                debug!(hand, "hand lost, releasing bindings");
                world.interaction.forget_hand(hand);
                report.hands_pruned += 1;
            }
        }

        let objects = &world.objects;
        world
            .interaction
            .grabbed_object_by_hand
            .retain(|_, id| objects.contains_key(id));

        for (&hand, pointer) in pointers {
            match self.hit_test(world, pointer) {
                Some(id) => {
                    world.interaction.selected_object_by_hand.insert(hand, id);
                    report.selections += 1;
                }
                None => {
                    world.interaction.selected_object_by_hand.remove(&hand);
                }
            }
        }
    }

    fn apply_one_time(&self, world: &mut World, event: &GestureEvent, report: &mut InteractionReport) {
        let hand = event.hand_index;
        match event.kind {
            GestureKind::PinchStart => {
                let Some(id) = world.interaction.selected(hand).map(str::to_string) else {
                    return;
                };
                let Some(object) = world.objects.get_mut(&id) else {
                    return;
                };

                let inverted = invert_hex_color(object.display_color(), &self.config.fallback_color);
                object.color = Some(inverted);
                object.z_index = object.z_index.saturating_add(1);
                debug!(hand, id = %id, "grab");
                world.interaction.grabbed_object_by_hand.insert(hand, id);
                report.grabs_started += 1;
            }
            GestureKind::PinchEnd => {
                if let Some(id) = world.interaction.grabbed_object_by_hand.remove(&hand) {
                    debug!(hand, id = %id, "release");
                    report.grabs_released += 1;
                }
            }
            _ => {}
        }
    }

    fn apply_movement(&self, world: &mut World, event: &GestureEvent, report: &mut InteractionReport) {
        let Some(id) = world.interaction.selected(event.hand_index) else {
            return;
        };
        let Some(object) = world.objects.get_mut(id) else {
            return;
        };

        match event.kind {
            GestureKind::SwipeRight => {
                self.resize(object, self.config.grow_factor);
                report.resized += 1;
            }
            GestureKind::SwipeLeft => {
                self.resize(object, self.config.shrink_factor);
                report.resized += 1;
            }
            GestureKind::MovementActive => {
                object.z_index = object.z_index.saturating_add(1);
                report.raised += 1;
            }
            _ => {}
        }
    }

    fn resize(&self, object: &mut WorldObject, factor: f64) {
        let clamp = |v: f64| (v * factor).clamp(self.config.min_extent, self.config.max_extent);

        let base_depth = object.size.depth.unwrap_or(object.size.width);
        object.size.width = clamp(object.size.width);
        object.size.height = clamp(object.size.height);
        if object.kind.is_3d() {
            object.size.depth = Some(clamp(base_depth));
        }
        object.z_index = object.z_index.saturating_add(1);
    }

    fn track_grabs(
        &self,
        world: &mut World,
        pointers: &BTreeMap<usize, LandmarkPoint>,
        report: &mut InteractionReport,
    ) {
        for (hand, id) in &world.interaction.grabbed_object_by_hand {
            let Some(pointer) = pointers.get(hand) else {
                continue;
            };
            let Some(object) = world.objects.get_mut(id) else {
                continue;
            };
            if !object.interactable {
                continue;
            }

            object.position.x = pointer.x.clamp(0.0, 1.0);
            object.position.y = pointer.y.clamp(0.0, 1.0);
            if object.kind.is_3d() {
                object.position.z = Some(pointer_depth(pointer.z));
            }
            report.tracked += 1;
        }
    }
}
