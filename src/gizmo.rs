use crate::object::{ObjectId, Transform};
use anyhow::{bail, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TRANSLATE_SNAP_STEP: f32 = 0.5;
pub const ROTATE_SNAP_STEP_DEGREES: f32 = 15.0;
pub const SCALE_SNAP_STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl GizmoMode {
    pub fn label(self) -> &'static str {
        match self {
            GizmoMode::Translate => "Translate",
            GizmoMode::Rotate => "Rotate",
            GizmoMode::Scale => "Scale",
        }
    }
}

impl FromStr for GizmoMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "translate" | "move" => Ok(GizmoMode::Translate),
            "rotate" => Ok(GizmoMode::Rotate),
            "scale" => Ok(GizmoMode::Scale),
            other => bail!("Unknown gizmo mode '{other}'. Use translate, rotate or scale."),
        }
    }
}

/// Plane the editor grid is drawn on; snapping acts on its two axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridPlane {
    #[default]
    Xz,
    Xy,
    Yz,
}

impl GridPlane {
    pub fn key(self) -> &'static str {
        match self {
            GridPlane::Xz => "xz",
            GridPlane::Xy => "xy",
            GridPlane::Yz => "yz",
        }
    }

    /// Per-axis mask, 1.0 for axes that lie in the plane.
    pub fn axis_mask(self) -> Vec3 {
        match self {
            GridPlane::Xz => Vec3::new(1.0, 0.0, 1.0),
            GridPlane::Xy => Vec3::new(1.0, 1.0, 0.0),
            GridPlane::Yz => Vec3::new(0.0, 1.0, 1.0),
        }
    }
}

impl fmt::Display for GridPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GridPlane {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xz" => Ok(GridPlane::Xz),
            "xy" => Ok(GridPlane::Xy),
            "yz" => Ok(GridPlane::Yz),
            other => bail!("Unknown grid plane '{other}'. Use xz, xy or yz."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSnap {
    pub plane: GridPlane,
    pub enabled: bool,
    pub translate_step: f32,
    pub rotate_step_radians: f32,
    pub scale_step: f32,
}

impl Default for GridSnap {
    fn default() -> Self {
        Self {
            plane: GridPlane::default(),
            enabled: false,
            translate_step: TRANSLATE_SNAP_STEP,
            rotate_step_radians: ROTATE_SNAP_STEP_DEGREES.to_radians(),
            scale_step: SCALE_SNAP_STEP,
        }
    }
}

impl GridSnap {
    /// Snaps the component a gizmo mode edits. Position snaps only along the grid plane.
    pub fn apply(&self, mode: GizmoMode, mut transform: Transform) -> Transform {
        if !self.enabled {
            return transform;
        }
        match mode {
            GizmoMode::Translate => {
                let mask = self.plane.axis_mask();
                let snapped = snap_vec(transform.position, self.translate_step);
                transform.position = snapped * mask + transform.position * (Vec3::ONE - mask);
            }
            GizmoMode::Rotate => {
                transform.rotation = snap_vec(transform.rotation, self.rotate_step_radians);
            }
            GizmoMode::Scale => {
                let step = self.scale_step;
                transform.scale = snap_vec(transform.scale, step).max(Vec3::splat(step));
            }
        }
        transform
    }
}

fn snap_vec(value: Vec3, step: f32) -> Vec3 {
    if step <= f32::EPSILON {
        return value;
    }
    (value / step).round() * step
}

/// In-progress gizmo drag. Live updates do not touch history; releasing commits once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub object: ObjectId,
    pub mode: GizmoMode,
    pub start: Transform,
}

impl DragSession {
    pub fn new(object: ObjectId, mode: GizmoMode, start: Transform) -> Self {
        Self { object, mode, start }
    }

    pub fn changed(&self, current: &Transform) -> bool {
        self.start != *current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_snap_keeps_off_plane_axis() {
        let snap = GridSnap { enabled: true, ..GridSnap::default() };
        let transform = Transform::from_position(Vec3::new(0.74, 1.33, -0.26));
        let snapped = snap.apply(GizmoMode::Translate, transform);
        assert_eq!(snapped.position, Vec3::new(0.5, 1.33, -0.5));
    }

    #[test]
    fn rotation_snaps_to_fifteen_degrees() {
        let snap = GridSnap { enabled: true, ..GridSnap::default() };
        let transform = Transform::default().with_rotation(Vec3::new(0.0, 40.0_f32.to_radians(), 0.0));
        let snapped = snap.apply(GizmoMode::Rotate, transform);
        assert!((snapped.rotation.y - 45.0_f32.to_radians()).abs() < 1e-5);
    }

    #[test]
    fn scale_never_snaps_to_zero() {
        let snap = GridSnap { enabled: true, ..GridSnap::default() };
        let transform = Transform::default().with_scale(Vec3::new(0.01, 2.04, 1.0));
        let snapped = snap.apply(GizmoMode::Scale, transform);
        assert!((snapped.scale.x - 0.1).abs() < 1e-6);
        assert!((snapped.scale.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn disabled_snap_is_identity() {
        let snap = GridSnap::default();
        let transform = Transform::from_position(Vec3::new(0.123, 0.456, 0.789));
        assert_eq!(snap.apply(GizmoMode::Translate, transform), transform);
    }

    #[test]
    fn grid_plane_parses_case_insensitively() {
        assert_eq!("YZ".parse::<GridPlane>().expect("plane"), GridPlane::Yz);
        assert!("zz".parse::<GridPlane>().is_err());
    }
}
