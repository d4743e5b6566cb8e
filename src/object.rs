use crate::render::ProxyHandle;
use anyhow::{anyhow, bail};
use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Session-unique object identity. Ids are handed out in increasing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl ObjectId {
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Quad,
    Cube,
    Camera,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] = [ObjectKind::Quad, ObjectKind::Cube, ObjectKind::Camera];

    /// Name used in scene files and commands.
    pub fn key(self) -> &'static str {
        match self {
            ObjectKind::Quad => "quad",
            ObjectKind::Cube => "cube",
            ObjectKind::Camera => "camera",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ObjectKind::Quad => "Quad",
            ObjectKind::Cube => "Cube",
            ObjectKind::Camera => "Camera",
        }
    }

    pub fn is_camera(self) -> bool {
        matches!(self, ObjectKind::Camera)
    }

    /// Primitives are the placeable geometric kinds that end up in interchange exports.
    pub fn is_primitive(self) -> bool {
        !self.is_camera()
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position, Euler XYZ rotation in radians, and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Vec3::ZERO, scale: Vec3::ONE }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        let (x, y, z) = orientation.normalize().to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation(), self.position)
    }

    /// Direction the object faces; cameras look down their local -Z.
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformProperty {
    Position,
    Rotation,
    Scale,
}

/// One scalar slot of a transform, as edited through the property panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformField {
    pub property: TransformProperty,
    /// 0 = x, 1 = y, 2 = z
    pub axis: usize,
}

impl TransformField {
    pub fn new(property: TransformProperty, axis: usize) -> Option<Self> {
        (axis < 3).then_some(Self { property, axis })
    }

    pub fn read(&self, transform: &Transform) -> f32 {
        match self.property {
            TransformProperty::Position => transform.position[self.axis],
            TransformProperty::Rotation => transform.rotation[self.axis],
            TransformProperty::Scale => transform.scale[self.axis],
        }
    }

    pub fn write(&self, transform: &mut Transform, value: f32) {
        match self.property {
            TransformProperty::Position => transform.position[self.axis] = value,
            TransformProperty::Rotation => transform.rotation[self.axis] = value,
            TransformProperty::Scale => transform.scale[self.axis] = value,
        }
    }
}

impl FromStr for TransformField {
    type Err = anyhow::Error;

    /// Parses `position.x`, `rotation.z`, `scale.y` and so on.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (property, axis) =
            s.split_once('.').ok_or_else(|| anyhow!("Expected <property>.<axis>, got '{s}'"))?;
        let property = match property.to_ascii_lowercase().as_str() {
            "position" | "pos" => TransformProperty::Position,
            "rotation" | "rot" => TransformProperty::Rotation,
            "scale" => TransformProperty::Scale,
            other => bail!("Unknown transform property '{other}'"),
        };
        let axis = match axis.to_ascii_lowercase().as_str() {
            "x" => 0,
            "y" => 1,
            "z" => 2,
            other => bail!("Unknown axis '{other}'"),
        };
        Ok(Self { property, axis })
    }
}

#[derive(Debug)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    kind: ObjectKind,
    pub transform: Transform,
    proxy: ProxyHandle,
}

impl SceneObject {
    pub(crate) fn new(id: ObjectId, name: String, kind: ObjectKind, transform: Transform, proxy: ProxyHandle) -> Self {
        Self { id, name, kind, transform, proxy }
    }

    /// Kind is fixed at creation; changing it means deleting and recreating the object.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn proxy(&self) -> ProxyHandle {
        self.proxy
    }

    pub fn is_camera(&self) -> bool {
        self.kind.is_camera()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transform_has_unit_scale() {
        let transform = Transform::default();
        assert_eq!(transform.scale, Vec3::ONE);
        assert_eq!(transform.position, Vec3::ZERO);
    }

    #[test]
    fn orientation_roundtrips_through_euler() {
        let mut transform = Transform::default().with_rotation(Vec3::new(0.3, -0.7, 1.1));
        let orientation = transform.orientation();
        transform.set_orientation(orientation);
        assert!((transform.rotation - Vec3::new(0.3, -0.7, 1.1)).length() < 1e-4);
    }

    #[test]
    fn transform_field_parses_and_writes() {
        let field: TransformField = "rotation.y".parse().expect("field");
        let mut transform = Transform::default();
        field.write(&mut transform, 1.25);
        assert_eq!(transform.rotation, Vec3::new(0.0, 1.25, 0.0));
        assert_eq!(field.read(&transform), 1.25);
        assert!("color.x".parse::<TransformField>().is_err());
        assert!("scale.w".parse::<TransformField>().is_err());
    }

    #[test]
    fn identity_rotation_faces_negative_z() {
        let forward = Transform::default().forward();
        assert!((forward - Vec3::NEG_Z).length() < 1e-6);
    }
}
