//! World objects and object-creation requests
//!
//! Positions and sizes are normalized to the presentation surface:
//! `[0,1] × [0,1]`, plus an optional depth in `[0,1]` for 3D kinds.
//! 2D kinds never carry `z` or `depth`.

use std::fmt;
use std::str::FromStr;

use handworld_core::{HandworldError, HandworldResult};
use serde::{Deserialize, Serialize};

use crate::color::{DEFAULT_INTERACTABLE_COLOR, DEFAULT_STATIC_COLOR};

/// Smallest normalized extent an object may have
pub const MIN_OBJECT_EXTENT: f64 = 0.01;

/// Depth assumed for 3D objects without `position.z`
pub const DEFAULT_OBJECT_DEPTH: f64 = 0.5;

/// Object shape; immutable after creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Circle,
    Rect,
    Box3d,
    Sphere3d,
    Model3d,
}

impl ObjectKind {
    pub fn all() -> &'static [ObjectKind] {
        &[
            ObjectKind::Circle,
            ObjectKind::Rect,
            ObjectKind::Box3d,
            ObjectKind::Sphere3d,
            ObjectKind::Model3d,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Circle => "circle",
            ObjectKind::Rect => "rect",
            ObjectKind::Box3d => "box3d",
            ObjectKind::Sphere3d => "sphere3d",
            ObjectKind::Model3d => "model3d",
        }
    }

    /// Rendered by the 3D renderer; carries depth
    pub fn is_3d(self) -> bool {
        matches!(self, ObjectKind::Box3d | ObjectKind::Sphere3d | ObjectKind::Model3d)
    }

    /// Hit-tested as an axis-aligned rectangle
    pub fn is_rect_like(self) -> bool {
        matches!(self, ObjectKind::Rect | ObjectKind::Box3d | ObjectKind::Model3d)
    }

    /// Hit-tested as a circle of radius min(half width, half height)
    pub fn is_circle_like(self) -> bool {
        matches!(self, ObjectKind::Circle | ObjectKind::Sphere3d)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = HandworldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| HandworldError::UnknownObjectKind(s.to_string()))
    }
}

/// Normalized position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }
}

/// Normalized size
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            depth: None,
        }
    }

    pub fn with_depth(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth: Some(depth),
        }
    }
}

/// Idle animation overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    /// `Some(false)` disables idle spin; absent means enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Radians per second; absent means the kind's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_speed: Option<f64>,
}

fn default_visible() -> bool {
    true
}

/// An object in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldObject {
    pub id: String,
    pub kind: ObjectKind,
    pub interactable: bool,
    pub position: Position,
    pub size: Size,
    /// Radians, kept in `[0, 2π)` by the animation step
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub z_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl WorldObject {
    /// A visible, interactable object with no color, animation, or z-index
    pub fn new(id: impl Into<String>, kind: ObjectKind, position: Position, size: Size) -> Self {
        Self {
            id: id.into(),
            kind,
            interactable: true,
            position,
            size,
            rotation: 0.0,
            animation: None,
            model_url: None,
            visible: true,
            z_index: 0,
            color: None,
        }
    }

    pub fn with_interactable(mut self, interactable: bool) -> Self {
        self.interactable = interactable;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_z_index(mut self, z_index: i64) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn with_model_url(mut self, url: impl Into<String>) -> Self {
        self.model_url = Some(url.into());
        self
    }

    /// Color the presentation layer should draw
    pub fn display_color(&self) -> &str {
        match &self.color {
            Some(color) => color,
            None if self.interactable => DEFAULT_INTERACTABLE_COLOR,
            None => DEFAULT_STATIC_COLOR,
        }
    }

    /// Depth of the object's center (3D kinds)
    pub fn depth_position(&self) -> f64 {
        self.position.z.unwrap_or(DEFAULT_OBJECT_DEPTH)
    }

    /// Depth extent used for hit testing (3D kinds)
    pub fn depth_extent(&self) -> f64 {
        self.size
            .depth
            .unwrap_or_else(|| self.size.width.min(self.size.height))
    }

    pub fn animation_enabled(&self) -> bool {
        self.animation.and_then(|a| a.enabled).unwrap_or(true)
    }
}

fn default_interactable() -> bool {
    true
}

/// Object-creation request from the authoring side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRequest {
    pub kind: ObjectKind,
    #[serde(default)]
    pub color: Option<String>,
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub model_url: Option<String>,
    #[serde(default = "default_interactable")]
    pub interactable: bool,
}

impl ObjectRequest {
    pub fn new(kind: ObjectKind, position: Position, size: Size) -> Self {
        Self {
            kind,
            color: None,
            position,
            size,
            model_url: None,
            interactable: true,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_model_url(mut self, url: impl Into<String>) -> Self {
        self.model_url = Some(url.into());
        self
    }

    /// Check the request without building anything
    pub fn validate(&self) -> HandworldResult<()> {
        check_position(self.kind, &self.position)?;
        check_size(self.kind, &self.size)?;

        if self.kind == ObjectKind::Model3d {
            let has_url = self
                .model_url
                .as_deref()
                .map_or(false, |url| !url.trim().is_empty());
            if !has_url {
                return Err(HandworldError::MissingModelUrl);
            }
        }

        Ok(())
    }

    /// Build the object. Coordinates are clamped into the normalized range;
    /// 2D kinds drop `z`, `depth`, and the model URL.
    pub fn into_object(self, id: impl Into<String>) -> HandworldResult<WorldObject> {
        self.validate()?;

        let position = normalized_position(self.kind, self.position);
        let size = normalized_size(self.kind, self.size);

        let mut object = WorldObject::new(id, self.kind, position, size)
            .with_interactable(self.interactable);
        object.color = self.color;
        if self.kind == ObjectKind::Model3d {
            object.model_url = self.model_url.map(|url| url.trim().to_string());
        }

        Ok(object)
    }
}

/// Clamp a position into the normalized range; 2D kinds lose `z`
fn normalized_position(kind: ObjectKind, position: Position) -> Position {
    Position {
        x: position.x.clamp(0.0, 1.0),
        y: position.y.clamp(0.0, 1.0),
        z: if kind.is_3d() {
            position.z.map(|z| z.clamp(0.0, 1.0))
        } else {
            None
        },
    }
}

/// Clamp extents into `[MIN_OBJECT_EXTENT, 1]`; 2D kinds lose `depth`
fn normalized_size(kind: ObjectKind, size: Size) -> Size {
    Size {
        width: size.width.clamp(MIN_OBJECT_EXTENT, 1.0),
        height: size.height.clamp(MIN_OBJECT_EXTENT, 1.0),
        depth: if kind.is_3d() {
            size.depth.map(|d| d.clamp(MIN_OBJECT_EXTENT, 1.0))
        } else {
            None
        },
    }
}

fn check_position(kind: ObjectKind, position: &Position) -> HandworldResult<()> {
    check_finite("position.x", position.x)?;
    check_finite("position.y", position.y)?;
    if kind.is_3d() {
        if let Some(z) = position.z {
            check_finite("position.z", z)?;
        }
    }
    Ok(())
}

fn check_size(kind: ObjectKind, size: &Size) -> HandworldResult<()> {
    check_extent("width", size.width)?;
    check_extent("height", size.height)?;
    if kind.is_3d() {
        if let Some(depth) = size.depth {
            check_extent("depth", depth)?;
        }
    }
    Ok(())
}

fn check_finite(field: &'static str, value: f64) -> HandworldResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(HandworldError::InvalidDimension { field, value })
    }
}

fn check_extent(field: &'static str, value: f64) -> HandworldResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(HandworldError::InvalidDimension { field, value })
    }
}

/// Partial update of an object; `id` and `kind` can't change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPatch {
    pub interactable: Option<bool>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub rotation: Option<f64>,
    pub animation: Option<Animation>,
    pub model_url: Option<String>,
    pub visible: Option<bool>,
    pub z_index: Option<i64>,
    pub color: Option<String>,
}

impl ObjectPatch {
    /// Check the patch against the kind of the object it will be applied to
    pub fn validate(&self, kind: ObjectKind) -> HandworldResult<()> {
        if let Some(position) = &self.position {
            check_position(kind, position)?;
        }
        if let Some(size) = &self.size {
            check_size(kind, size)?;
        }
        if let Some(rotation) = self.rotation {
            check_finite("rotation", rotation)?;
        }
        if kind == ObjectKind::Model3d {
            if let Some(url) = &self.model_url {
                if url.trim().is_empty() {
                    return Err(HandworldError::MissingModelUrl);
                }
            }
        }
        Ok(())
    }

    /// Apply the patch. Coordinates are normalized the way object creation
    /// normalizes them; 2D kinds ignore `z`, `depth`, and the model URL.
    pub fn apply(self, object: &mut WorldObject) {
        let kind = object.kind;
        if let Some(interactable) = self.interactable {
            object.interactable = interactable;
        }
        if let Some(position) = self.position {
            object.position = normalized_position(kind, position);
        }
        if let Some(size) = self.size {
            object.size = normalized_size(kind, size);
        }
        if let Some(rotation) = self.rotation {
            object.rotation = rotation;
        }
        if let Some(animation) = self.animation {
            object.animation = Some(animation);
        }
        if let Some(url) = self.model_url {
            if kind == ObjectKind::Model3d {
                object.model_url = Some(url.trim().to_string());
            }
        }
        if let Some(visible) = self.visible {
            object.visible = visible;
        }
        if let Some(z_index) = self.z_index {
            object.z_index = z_index;
        }
        if let Some(color) = self.color {
            object.color = Some(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_families() {
        assert!(ObjectKind::Rect.is_rect_like());
        assert!(ObjectKind::Box3d.is_rect_like());
        assert!(ObjectKind::Model3d.is_rect_like());
        assert!(ObjectKind::Circle.is_circle_like());
        assert!(ObjectKind::Sphere3d.is_circle_like());

        for kind in ObjectKind::all() {
            assert_ne!(kind.is_rect_like(), kind.is_circle_like());
            assert_eq!(kind.as_str().parse::<ObjectKind>().unwrap(), *kind);
        }
        assert!(!ObjectKind::Circle.is_3d());
        assert!(ObjectKind::Sphere3d.is_3d());
        assert!("triangle".parse::<ObjectKind>().is_err());
    }

    #[test]
    fn test_display_color_defaults() {
        let obj = WorldObject::new("a", ObjectKind::Rect, Position::new(0.5, 0.5), Size::new(0.1, 0.1));
        assert_eq!(obj.display_color(), "#f59e0b");
        assert_eq!(obj.clone().with_interactable(false).display_color(), "#60a5fa");
        assert_eq!(obj.with_color("#123456").display_color(), "#123456");
    }

    #[test]
    fn test_depth_defaults() {
        let obj = WorldObject::new("a", ObjectKind::Box3d, Position::new(0.5, 0.5), Size::new(0.2, 0.1));
        assert_eq!(obj.depth_position(), 0.5);
        assert_eq!(obj.depth_extent(), 0.1);

        let obj = WorldObject::new(
            "b",
            ObjectKind::Box3d,
            Position::with_z(0.5, 0.5, 0.25),
            Size::with_depth(0.2, 0.1, 0.4),
        );
        assert_eq!(obj.depth_position(), 0.25);
        assert_eq!(obj.depth_extent(), 0.4);
    }

    #[test]
    fn test_model_requires_url() {
        let request = ObjectRequest::new(ObjectKind::Model3d, Position::new(0.5, 0.5), Size::new(0.2, 0.2));
        assert!(matches!(request.clone().into_object("m"), Err(HandworldError::MissingModelUrl)));
        assert!(matches!(
            request.clone().with_model_url("   ").validate(),
            Err(HandworldError::MissingModelUrl)
        ));

        let obj = request.with_model_url(" /models/duck.glb ").into_object("m").unwrap();
        assert_eq!(obj.model_url.as_deref(), Some("/models/duck.glb"));
    }

    #[test]
    fn test_invalid_size_rejected() {
        let request = ObjectRequest::new(ObjectKind::Rect, Position::new(0.5, 0.5), Size::new(f64::NAN, 0.2));
        match request.validate() {
            Err(HandworldError::InvalidDimension { field, .. }) => assert_eq!(field, "width"),
            other => panic!("unexpected: {:?}", other),
        }

        let request = ObjectRequest::new(ObjectKind::Rect, Position::new(0.5, 0.5), Size::new(0.2, 0.0));
        assert!(request.validate().is_err());

        let request = ObjectRequest::new(ObjectKind::Rect, Position::new(f64::INFINITY, 0.5), Size::new(0.2, 0.2));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_2d_kinds_drop_depth() {
        let request = ObjectRequest {
            kind: ObjectKind::Circle,
            color: Some("#ff0000".into()),
            position: Position::with_z(0.4, 0.6, 0.9),
            size: Size::with_depth(0.2, 0.2, f64::NAN),
            model_url: Some("ignored.glb".into()),
            interactable: true,
        };

        let obj = request.into_object("c").unwrap();
        assert_eq!(obj.position.z, None);
        assert_eq!(obj.size.depth, None);
        assert_eq!(obj.model_url, None);
        assert_eq!(obj.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_request_clamps_into_range() {
        let request = ObjectRequest::new(
            ObjectKind::Sphere3d,
            Position::with_z(1.4, -0.2, 2.0),
            Size::with_depth(3.0, 0.001, 0.5),
        );

        let obj = request.into_object("s").unwrap();
        assert_eq!(obj.position, Position::with_z(1.0, 0.0, 1.0));
        assert_eq!(obj.size, Size::with_depth(1.0, MIN_OBJECT_EXTENT, 0.5));
    }

    #[test]
    fn test_request_json() {
        let json = r##"{"kind": "box3d", "color": "#00ff00", "position": {"x": 0.3, "y": 0.4, "z": 0.6}, "size": {"width": 0.2, "height": 0.2}}"##;
        let request: ObjectRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.kind, ObjectKind::Box3d);
        assert!(request.interactable);
        assert_eq!(request.position.z, Some(0.6));
    }

    #[test]
    fn test_patch_applies_named_fields() {
        let mut obj = WorldObject::new("a", ObjectKind::Rect, Position::new(0.5, 0.5), Size::new(0.1, 0.1));
        ObjectPatch {
            z_index: Some(4),
            visible: Some(false),
            ..ObjectPatch::default()
        }
        .apply(&mut obj);

        assert_eq!(obj.z_index, 4);
        assert!(!obj.visible);
        assert_eq!(obj.position, Position::new(0.5, 0.5));
        assert_eq!(obj.kind, ObjectKind::Rect);
    }

    #[test]
    fn test_patch_normalizes_like_creation() {
        let mut flat = WorldObject::new("a", ObjectKind::Rect, Position::new(0.5, 0.5), Size::new(0.1, 0.1));
        ObjectPatch {
            position: Some(Position::with_z(1.5, -0.2, 0.3)),
            size: Some(Size::with_depth(2.0, 0.001, 0.4)),
            model_url: Some("/models/a.glb".into()),
            ..ObjectPatch::default()
        }
        .apply(&mut flat);

        assert_eq!(flat.position, Position::new(1.0, 0.0));
        assert_eq!(flat.size, Size::new(1.0, MIN_OBJECT_EXTENT));
        assert_eq!(flat.model_url, None);

        let mut cube = WorldObject::new("b", ObjectKind::Box3d, Position::new(0.5, 0.5), Size::new(0.1, 0.1));
        ObjectPatch {
            position: Some(Position::with_z(0.5, 0.5, 1.25)),
            size: Some(Size::with_depth(0.2, 0.2, 3.0)),
            ..ObjectPatch::default()
        }
        .apply(&mut cube);

        assert_eq!(cube.position.z, Some(1.0));
        assert_eq!(cube.size.depth, Some(1.0));
    }

    #[test]
    fn test_patch_validation() {
        let bad_size = ObjectPatch {
            size: Some(Size::new(0.0, 0.1)),
            ..ObjectPatch::default()
        };
        assert!(matches!(
            bad_size.validate(ObjectKind::Rect),
            Err(HandworldError::InvalidDimension { field: "width", .. })
        ));

        let bad_position = ObjectPatch {
            position: Some(Position::new(f64::NAN, 0.5)),
            ..ObjectPatch::default()
        };
        assert!(bad_position.validate(ObjectKind::Circle).is_err());

        // Depth is ignored on 2D kinds, checked on 3D kinds
        let bad_depth = ObjectPatch {
            size: Some(Size::with_depth(0.1, 0.1, f64::INFINITY)),
            ..ObjectPatch::default()
        };
        assert!(bad_depth.validate(ObjectKind::Rect).is_ok());
        assert!(bad_depth.validate(ObjectKind::Sphere3d).is_err());

        let blank_url = ObjectPatch {
            model_url: Some("  ".into()),
            ..ObjectPatch::default()
        };
        assert!(matches!(
            blank_url.validate(ObjectKind::Model3d),
            Err(HandworldError::MissingModelUrl)
        ));
        assert!(blank_url.validate(ObjectKind::Rect).is_ok());
    }

    #[test]
    fn test_animation_enabled_default() {
        let obj = WorldObject::new("a", ObjectKind::Rect, Position::new(0.5, 0.5), Size::new(0.1, 0.1));
        assert!(obj.animation_enabled());
        let obj = obj.with_animation(Animation {
            enabled: Some(false),
            spin_speed: None,
        });
        assert!(!obj.animation_enabled());
    }
}
