use crate::gizmo::{GridPlane, GridSnap, ROTATE_SNAP_STEP_DEGREES, SCALE_SNAP_STEP, TRANSLATE_SNAP_STEP};
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::playback::DEFAULT_TOTAL_FRAMES;
use anyhow::{Context, Result};
use glam::Vec3;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "TimelineConfig::default_total_frames")]
    pub total_frames: u32,
    #[serde(default = "TimelineConfig::default_frames_per_second")]
    pub frames_per_second: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub plane: GridPlane,
    #[serde(default)]
    pub snap: bool,
    #[serde(default = "GridConfig::default_translate_step")]
    pub translate_step: f32,
    #[serde(default = "GridConfig::default_rotate_step_degrees")]
    pub rotate_step_degrees: f32,
    #[serde(default = "GridConfig::default_scale_step")]
    pub scale_step: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClipboardConfig {
    #[serde(default = "ClipboardConfig::default_paste_offset")]
    pub paste_offset: [f32; 3],
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorConfigOverrides {
    pub total_frames: Option<u32>,
    pub history_capacity: Option<usize>,
    pub grid_plane: Option<GridPlane>,
    pub grid_snap: Option<bool>,
}

impl HistoryConfig {
    const fn default_capacity() -> usize {
        DEFAULT_HISTORY_CAPACITY
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: Self::default_capacity() }
    }
}

impl TimelineConfig {
    const fn default_total_frames() -> u32 {
        DEFAULT_TOTAL_FRAMES
    }

    const fn default_frames_per_second() -> u32 {
        30
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            total_frames: Self::default_total_frames(),
            frames_per_second: Self::default_frames_per_second(),
        }
    }
}

impl GridConfig {
    const fn default_translate_step() -> f32 {
        TRANSLATE_SNAP_STEP
    }

    const fn default_rotate_step_degrees() -> f32 {
        ROTATE_SNAP_STEP_DEGREES
    }

    const fn default_scale_step() -> f32 {
        SCALE_SNAP_STEP
    }

    pub fn to_snap(&self) -> GridSnap {
        GridSnap {
            plane: self.plane,
            enabled: self.snap,
            translate_step: self.translate_step.max(0.0),
            rotate_step_radians: self.rotate_step_degrees.max(0.0).to_radians(),
            scale_step: self.scale_step.max(0.0),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            plane: GridPlane::default(),
            snap: false,
            translate_step: Self::default_translate_step(),
            rotate_step_degrees: Self::default_rotate_step_degrees(),
            scale_step: Self::default_scale_step(),
        }
    }
}

impl ClipboardConfig {
    const fn default_paste_offset() -> [f32; 3] {
        [0.5, 0.0, 0.5]
    }

    pub fn offset(&self) -> Vec3 {
        Vec3::from_array(self.paste_offset)
    }
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self { paste_offset: Self::default_paste_offset() }
    }
}

impl EditorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!(target: "config", "Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &EditorConfigOverrides) {
        if let Some(total_frames) = overrides.total_frames {
            self.timeline.total_frames = total_frames;
        }
        if let Some(capacity) = overrides.history_capacity {
            self.history.capacity = capacity;
        }
        if let Some(plane) = overrides.grid_plane {
            self.grid.plane = plane;
        }
        if let Some(snap) = overrides.grid_snap {
            self.grid.snap = snap;
        }
    }
}

impl EditorConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.total_frames.is_none()
            && self.history_capacity.is_none()
            && self.grid_plane.is_none()
            && self.grid_snap.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.total_frames.is_some() {
            fields.push("total_frames");
        }
        if self.history_capacity.is_some() {
            fields.push("history_capacity");
        }
        if self.grid_plane.is_some() {
            fields.push("grid_plane");
        }
        if self.grid_snap.is_some() {
            fields.push("grid_snap");
        }
        fields
    }
}
