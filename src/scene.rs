use crate::animation::Keyframe;
use crate::gizmo::GridPlane;
use crate::object::{ObjectId, ObjectKind, SceneObject, Transform};
use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const SCENE_VERSION: u32 = 1;

#[cfg(feature = "binary_scene")]
pub const BINARY_SCENE_EXTENSION: &str = "sscene";

/// On-disk scene document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFile {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Unknown or missing values leave the editor's current plane in place.
    #[serde(default, deserialize_with = "lenient_grid_plane", skip_serializing_if = "Option::is_none")]
    pub grid_plane: Option<GridPlane>,
    #[serde(default, deserialize_with = "lenient_frame_count", skip_serializing_if = "Option::is_none")]
    pub total_frames: Option<u32>,
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
    /// Keyed by object id rendered as a string.
    #[serde(default)]
    pub clips: BTreeMap<String, ClipRecord>,
}

impl Default for SceneFile {
    fn default() -> Self {
        Self {
            version: SCENE_VERSION,
            grid_plane: None,
            total_frames: None,
            objects: Vec::new(),
            clips: BTreeMap::new(),
        }
    }
}

const fn default_version() -> u32 {
    SCENE_VERSION
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

/// Serialized identity and transform of one object. `kind` stays a string so that records for
/// kinds this build does not know survive parsing and can be skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub track_target: Option<ObjectId>,
}

impl ObjectRecord {
    pub fn capture(object: &SceneObject, track_target: Option<ObjectId>) -> Self {
        let transform = object.transform;
        Self {
            id: object.id,
            name: object.name.clone(),
            kind: object.kind().key().to_string(),
            position: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
            track_target,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform { position: self.position, rotation: self.rotation, scale: self.scale }
    }

    pub fn kind_key(&self) -> String {
        self.kind.trim().to_ascii_lowercase()
    }

    pub fn is_kind(&self, kind: ObjectKind) -> bool {
        self.kind_key() == kind.key()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipRecord {
    #[serde(default)]
    pub position: Vec<Keyframe>,
    #[serde(default)]
    pub rotation: Vec<Keyframe>,
}

impl SceneFile {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Parsing scene JSON")
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Serializing scene JSON")
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("Reading scene file {}", path.display()))?;
        #[cfg(feature = "binary_scene")]
        if is_binary_path(path) {
            return decode_binary(&bytes).with_context(|| format!("Decoding binary scene {}", path.display()));
        }
        serde_json::from_slice::<SceneFile>(&bytes)
            .with_context(|| format!("Parsing scene file {}", path.display()))
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating scene directory {}", parent.display()))?;
        }
        #[cfg(feature = "binary_scene")]
        if is_binary_path(path) {
            let bytes = encode_binary(self)?;
            fs::write(path, bytes).with_context(|| format!("Writing binary scene {}", path.display()))?;
            return Ok(());
        }
        let json = self.to_json_string()?;
        fs::write(path, json.as_bytes()).with_context(|| format!("Writing scene file {}", path.display()))?;
        Ok(())
    }

    /// Parses clip keys back into object ids. Keys that are not ids are dropped.
    pub fn clips_by_id(&self) -> BTreeMap<ObjectId, &ClipRecord> {
        self.clips
            .iter()
            .filter_map(|(key, clip)| match key.trim().parse::<u64>() {
                Ok(raw) => Some((ObjectId(raw), clip)),
                Err(_) => {
                    log::warn!(target: "scene", "ignoring clip with non-numeric key '{key}'");
                    None
                }
            })
            .collect()
    }
}

fn lenient_grid_plane<'de, D>(deserializer: D) -> std::result::Result<Option<GridPlane>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| value.as_str().and_then(|raw| raw.parse::<GridPlane>().ok())))
}

fn lenient_frame_count<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| value.as_u64()).filter(|frames| *frames > 0).and_then(|frames| u32::try_from(frames).ok()))
}

#[cfg(feature = "binary_scene")]
fn is_binary_path(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case(BINARY_SCENE_EXTENSION))
}

// The binary format is lz4 over the JSON bytes so the lenient field handling above
// applies to both encodings.
#[cfg(feature = "binary_scene")]
fn encode_binary(scene: &SceneFile) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(scene).context("Serializing scene for binary encoding")?;
    Ok(lz4_flex::compress_prepend_size(&json))
}

#[cfg(feature = "binary_scene")]
fn decode_binary(bytes: &[u8]) -> Result<SceneFile> {
    let json = lz4_flex::decompress_size_prepended(bytes).context("Decompressing binary scene")?;
    serde_json::from_slice(&json).context("Parsing binary scene contents")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_documented_layout() {
        let json = r#"{
            "version": 1,
            "gridPlane": "xy",
            "totalFrames": 120,
            "objects": [
                { "id": 3, "name": "Cam", "kind": "camera", "position": [1, 2, 3],
                  "rotation": [0, 0.5, 0], "scale": [1, 1, 1], "trackTarget": 4 }
            ],
            "clips": { "3": { "position": [ { "frame": 10, "value": [1, 2, 3] } ], "rotation": [] } }
        }"#;
        let scene = SceneFile::from_json_str(json).expect("parse");
        assert_eq!(scene.grid_plane, Some(GridPlane::Xy));
        assert_eq!(scene.total_frames, Some(120));
        let record = &scene.objects[0];
        assert_eq!(record.id, ObjectId(3));
        assert!(record.is_kind(ObjectKind::Camera));
        assert_eq!(record.track_target, Some(ObjectId(4)));
        let clips = scene.clips_by_id();
        assert_eq!(clips[&ObjectId(3)].position[0].frame, 10);
    }

    #[test]
    fn unknown_settings_are_ignored() {
        let json = r#"{ "gridPlane": "diagonal", "totalFrames": "lots", "objects": [] }"#;
        let scene = SceneFile::from_json_str(json).expect("parse");
        assert_eq!(scene.grid_plane, None);
        assert_eq!(scene.total_frames, None);
        assert_eq!(scene.version, SCENE_VERSION);
    }

    #[test]
    fn missing_scale_defaults_to_one() {
        let json = r#"{ "objects": [ { "id": 1, "kind": "cube", "position": [0, 0, 0] } ] }"#;
        let scene = SceneFile::from_json_str(json).expect("parse");
        assert_eq!(scene.objects[0].scale, Vec3::ONE);
        assert_eq!(scene.objects[0].track_target, None);
    }

    #[test]
    fn structural_errors_are_reported() {
        assert!(SceneFile::from_json_str(r#"{ "objects": 7 }"#).is_err());
        assert!(SceneFile::from_json_str("not json").is_err());
    }
}
