//! The shared scene
//!
//! `World` owns every object, the insertion order that breaks paint and
//! hit-test ties, and the per-hand interaction bindings. Hand indices are
//! frame-local positions in the detector's output, not identities: if hand 1
//! disappears, whatever is reported at index 1 next frame inherits its
//! bindings.

use std::collections::{BTreeMap, HashMap};

use handworld_core::{HandworldError, HandworldResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::object::{ObjectKind, ObjectPatch, ObjectRequest, Position, Size, WorldObject};

/// Id of the built-in status indicator
pub const STATUS_DOT_ID: &str = "status-dot";

/// Status indicator colors
pub const STATUS_READY_COLOR: &str = "#22c55e";
pub const STATUS_INITIALIZING_COLOR: &str = "#f59e0b";
pub const STATUS_DISABLED_COLOR: &str = "#ef4444";

/// The non-interactable status indicator every world starts with
pub fn status_indicator() -> WorldObject {
    WorldObject::new(
        STATUS_DOT_ID,
        ObjectKind::Circle,
        Position::new(0.92, 0.08),
        Size::new(0.03, 0.03),
    )
    .with_interactable(false)
    .with_color(STATUS_READY_COLOR)
    .with_z_index(10)
}

/// Per-hand bindings, keyed by the current frame's hand index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionState {
    pub selected_object_by_hand: BTreeMap<usize, String>,
    pub grabbed_object_by_hand: BTreeMap<usize, String>,
}

impl InteractionState {
    pub fn selected(&self, hand_index: usize) -> Option<&str> {
        self.selected_object_by_hand.get(&hand_index).map(String::as_str)
    }

    pub fn grabbed(&self, hand_index: usize) -> Option<&str> {
        self.grabbed_object_by_hand.get(&hand_index).map(String::as_str)
    }

    /// Is any hand selecting or grabbing this object?
    pub fn is_interacted(&self, object_id: &str) -> bool {
        self.selected_object_by_hand.values().any(|id| id == object_id)
            || self.grabbed_object_by_hand.values().any(|id| id == object_id)
    }

    /// Hands with either binding
    pub fn bound_hands(&self) -> Vec<usize> {
        let mut hands: Vec<usize> = self
            .selected_object_by_hand
            .keys()
            .chain(self.grabbed_object_by_hand.keys())
            .copied()
            .collect();
        hands.sort_unstable();
        hands.dedup();
        hands
    }

    /// Drop both bindings of a hand
    pub fn forget_hand(&mut self, hand_index: usize) {
        self.selected_object_by_hand.remove(&hand_index);
        self.grabbed_object_by_hand.remove(&hand_index);
    }

    /// Drop every binding that points at `object_id`
    pub fn forget_object(&mut self, object_id: &str) {
        self.selected_object_by_hand.retain(|_, id| id != object_id);
        self.grabbed_object_by_hand.retain(|_, id| id != object_id);
    }

    pub fn clear(&mut self) {
        self.selected_object_by_hand.clear();
        self.grabbed_object_by_hand.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected_object_by_hand.is_empty() && self.grabbed_object_by_hand.is_empty()
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    /// Objects in paint order (back to front)
    pub objects: Vec<WorldObject>,
    pub interaction: InteractionState,
}

impl WorldSnapshot {
    pub fn object(&self, id: &str) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.id == id)
    }
}

/// Objects, their order, and the interaction bindings
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) objects: HashMap<String, WorldObject>,
    pub(crate) object_order: Vec<String>,
    pub(crate) interaction: InteractionState,
    next_seq: u64,
}

impl World {
    /// A world holding only the status indicator
    pub fn new() -> Self {
        let mut world = Self::empty();
        world.add_object(status_indicator());
        world
    }

    /// A world with no objects at all
    pub fn empty() -> Self {
        Self {
            objects: HashMap::new(),
            object_order: Vec::new(),
            interaction: InteractionState::default(),
            next_seq: 1,
        }
    }

    /// Insert an object. An existing object with the same id is replaced in
    /// place and keeps its order slot.
    pub fn add_object(&mut self, object: WorldObject) {
        if !self.objects.contains_key(&object.id) {
            self.object_order.push(object.id.clone());
        }
        self.objects.insert(object.id.clone(), object);
    }

    /// Validate a request and add the resulting object under a fresh id.
    /// Nothing changes if the request is rejected.
    pub fn create_object(&mut self, request: ObjectRequest) -> HandworldResult<String> {
        if let Err(err) = request.validate() {
            warn!(kind = %request.kind, error = %err, "object request rejected");
            return Err(err);
        }

        let id = self.fresh_id(request.kind);
        let object = request.into_object(id.clone())?;
        debug!(id = %id, kind = %object.kind, "object created");
        self.add_object(object);
        Ok(id)
    }

    fn fresh_id(&mut self, kind: ObjectKind) -> String {
        loop {
            let id = format!("{}-{}", kind, self.next_seq);
            self.next_seq += 1;
            if !self.objects.contains_key(&id) {
                return id;
            }
        }
    }

    /// Remove an object and any binding that referenced it
    pub fn remove_object(&mut self, id: &str) -> Option<WorldObject> {
        let removed = self.objects.remove(id)?;
        self.object_order.retain(|existing| existing != id);
        self.interaction.forget_object(id);
        Some(removed)
    }

    /// Patch an object in place. A rejected patch changes nothing.
    pub fn update_object(&mut self, id: &str, patch: ObjectPatch) -> HandworldResult<()> {
        let object = self
            .objects
            .get_mut(id)
            .ok_or_else(|| HandworldError::ObjectNotFound(id.to_string()))?;
        if let Err(err) = patch.validate(object.kind) {
            warn!(id = %id, error = %err, "object patch rejected");
            return Err(err);
        }
        patch.apply(object);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&WorldObject> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut WorldObject> {
        self.objects.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Ids in insertion order
    pub fn ids(&self) -> &[String] {
        &self.object_order
    }

    /// Position of an id in insertion order
    pub fn order_index(&self, id: &str) -> Option<usize> {
        self.object_order.iter().position(|existing| existing == id)
    }

    /// Objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = &WorldObject> {
        self.object_order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Paint order: stable sort of insertion order by `zIndex`
    pub fn ordered_objects(&self) -> Vec<&WorldObject> {
        let mut ordered: Vec<&WorldObject> = self.objects().collect();
        ordered.sort_by_key(|o| o.z_index);
        ordered
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Is the object selected or grabbed by any hand?
    pub fn is_interacted(&self, id: &str) -> bool {
        self.interaction.is_interacted(id)
    }

    /// Selected object of a hand, ignoring stale ids
    pub fn selected_object(&self, hand_index: usize) -> Option<&WorldObject> {
        self.interaction
            .selected(hand_index)
            .and_then(|id| self.objects.get(id))
    }

    /// Grabbed object of a hand, ignoring stale ids
    pub fn grabbed_object(&self, hand_index: usize) -> Option<&WorldObject> {
        self.interaction
            .grabbed(hand_index)
            .and_then(|id| self.objects.get(id))
    }

    /// Drop all bindings, keep the objects
    pub fn clear_interaction(&mut self) {
        self.interaction.clear();
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            objects: self.ordered_objects().into_iter().cloned().collect(),
            interaction: self.interaction.clone(),
        }
    }

    /// Structural problems, if any. An empty list means the world is
    /// consistent.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.object_order.len() != self.objects.len() {
            violations.push(format!(
                "order has {} ids but {} objects exist",
                self.object_order.len(),
                self.objects.len()
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for id in &self.object_order {
            if !seen.insert(id.as_str()) {
                violations.push(format!("duplicate id in order: {}", id));
            }
            if !self.objects.contains_key(id) {
                violations.push(format!("ordered id without object: {}", id));
            }
        }

        for (key, object) in &self.objects {
            if key != &object.id {
                violations.push(format!("object keyed {} has id {}", key, object.id));
            }
            if object.kind.is_3d() {
                continue;
            }
            if object.position.z.is_some() || object.size.depth.is_some() {
                violations.push(format!("2D object {} carries depth", key));
            }
        }

        violations
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
