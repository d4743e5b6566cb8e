use super::Editor;
use crate::animation::Clip;
use crate::events::EditorEvent;
use crate::mesh::ExportObject;
use crate::render::RenderBackend;
use crate::scene::{SceneFile, SCENE_VERSION};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

impl<R: RenderBackend> Editor<R> {
    /// Scene document for the current state. Dangling bindings and clips are left out.
    pub fn to_scene_file(&self) -> SceneFile {
        let snapshot = self.snapshot();
        let clips = snapshot.clips.iter().map(|(id, clip)| (id.to_string(), clip.to_record())).collect();
        SceneFile {
            version: SCENE_VERSION,
            grid_plane: Some(self.grid.plane),
            total_frames: Some(self.playhead.total_frames()),
            objects: snapshot.objects,
            clips,
        }
    }

    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.to_scene_file().save_to_path(path)?;
        log::info!(target: "scene", "saved {} objects to {}", self.registry.len(), path.display());
        self.set_status(format!("Saved scene to {}", path.display()));
        Ok(())
    }

    /// Loads a scene file. On any read or parse error the current scene is left untouched.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let parsed = SceneFile::load_from_path(path);
        self.finish_load(parsed, &path.display().to_string())
    }

    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let parsed = SceneFile::from_json_str(json);
        self.finish_load(parsed, "scene JSON")
    }

    fn finish_load(&mut self, parsed: Result<SceneFile>, source: &str) -> Result<()> {
        match parsed {
            Ok(scene) => {
                self.apply_scene_file(&scene);
                self.set_status(format!("Loaded {source}"));
                Ok(())
            }
            Err(err) => {
                log::warn!(target: "scene", "load of {source} failed: {err:#}");
                self.set_status(format!("Could not load {source}: {err}"));
                Err(err)
            }
        }
    }

    /// Replaces the scene with `scene`. Objects of unknown kinds and duplicate ids are skipped;
    /// missing timeline length or grid plane keep the current values. Commits one history entry.
    pub fn apply_scene_file(&mut self, scene: &SceneFile) {
        self.drag = None;
        self.selection.clear();
        self.registry.clear(&mut self.renderer);
        self.animator.clear();

        let mut skipped = 0;
        for record in &scene.objects {
            if self.registry.reconstruct(&mut self.renderer, record).is_none() {
                skipped += 1;
            }
        }
        self.registry.recompute_next_id();

        let clips: BTreeMap<_, _> = scene
            .clips_by_id()
            .into_iter()
            .filter(|(id, _)| self.registry.get(*id).is_some_and(|object| object.is_camera()))
            .map(|(id, record)| (id, Clip::from_record(record)))
            .collect();
        self.animator.replace(clips, BTreeMap::new());
        for record in &scene.objects {
            if let Some(target) = record.track_target {
                self.animator.set_track_target(&self.registry, record.id, target);
            }
        }

        if let Some(total_frames) = scene.total_frames {
            self.playhead.set_total_frames(total_frames);
        }
        if let Some(plane) = scene.grid_plane {
            self.set_grid_plane(plane);
        }
        if scene.version > SCENE_VERSION {
            log::warn!(target: "scene", "scene version {} is newer than supported {}", scene.version, SCENE_VERSION);
        }
        log::info!(target: "scene", "loaded {} objects ({} skipped)", self.registry.len(), skipped);

        self.sync_selection();
        self.events.push(EditorEvent::SceneLoaded { objects: self.registry.len(), skipped });
        self.events.push(EditorEvent::FrameChanged { frame: self.playhead.current_frame() });
        self.commit();
    }

    /// Objects handed to the interchange exporter; cameras are never exported.
    pub fn export_objects(&self) -> Vec<ExportObject> {
        self.registry
            .iter()
            .filter(|object| object.kind().is_primitive())
            .map(|object| ExportObject { name: object.name.clone(), kind: object.kind(), transform: object.transform })
            .collect()
    }

    pub fn export_bytes(&mut self) -> Result<Vec<u8>> {
        let objects = self.export_objects();
        self.renderer.export_scene(&objects).context("Exporting scene")
    }

    pub fn export(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let bytes = match self.export_bytes() {
            Ok(bytes) => bytes,
            Err(err) => {
                self.set_status(format!("Export failed: {err}"));
                return Err(err);
            }
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("Creating export directory {}", parent.display()))?;
        }
        fs::write(path, &bytes).with_context(|| format!("Writing export {}", path.display()))?;
        log::info!(target: "scene", "exported {} bytes to {}", bytes.len(), path.display());
        self.set_status(format!("Exported {}", path.display()));
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EditorConfig;
    use crate::editor::Editor;
    use crate::gizmo::GridPlane;
    use crate::object::{ObjectId, ObjectKind};
    use crate::render::HeadlessRenderer;

    fn editor() -> Editor<HeadlessRenderer> {
        Editor::new(EditorConfig::default(), HeadlessRenderer::default())
    }

    #[test]
    fn malformed_json_leaves_scene_untouched() {
        let mut editor = editor();
        let id = editor.add_object(ObjectKind::Cube);
        let depth = editor.history().undo_depth();
        assert!(editor.load_json(r#"{ "objects": [ { "id": "x" } ] }"#).is_err());
        assert!(editor.object(id).is_some());
        assert_eq!(editor.selection().ids(), &[id]);
        assert_eq!(editor.history().undo_depth(), depth);
        assert!(editor.status().is_some_and(|status| status.starts_with("Could not load scene JSON")));
    }

    #[test]
    fn loaded_maximal_timeline_loops_without_overflow() {
        let mut editor = editor();
        editor.load_json(r#"{ "totalFrames": 4294967295, "objects": [] }"#).expect("load");
        assert_eq!(editor.playhead().total_frames(), u32::MAX);
        editor.seek(u32::MAX);
        editor.play();
        editor.tick().expect("tick");
        assert_eq!(editor.playhead().current_frame(), 0);
    }

    #[test]
    fn load_skips_unknown_kinds_and_keeps_missing_settings() {
        let mut editor = editor();
        editor.set_grid_plane(GridPlane::Yz);
        let json = r#"{
            "objects": [
                { "id": 5, "name": "Box", "kind": "cube", "position": [1, 0, 0] },
                { "id": 6, "name": "Torus", "kind": "torus", "position": [0, 0, 0] }
            ]
        }"#;
        editor.load_json(json).expect("load");
        assert_eq!(editor.registry().len(), 1);
        assert!(editor.object(ObjectId(5)).is_some());
        assert_eq!(editor.grid().plane, GridPlane::Yz);
        assert_eq!(editor.playhead().total_frames(), 300);
        assert_eq!(editor.add_object(ObjectKind::Quad), ObjectId(6));
    }

    #[test]
    fn load_drops_clips_for_non_cameras_and_invalid_bindings() {
        let mut editor = editor();
        let json = r#"{
            "totalFrames": 90,
            "objects": [
                { "id": 1, "kind": "camera", "position": [0, 0, 5], "trackTarget": 2 },
                { "id": 2, "kind": "cube", "position": [0, 0, 0], "trackTarget": 1 },
                { "id": 3, "kind": "camera", "position": [0, 0, 5], "trackTarget": 99 }
            ],
            "clips": {
                "1": { "position": [ { "frame": 0, "value": [0, 0, 5] } ] },
                "2": { "position": [ { "frame": 0, "value": [1, 1, 1] } ] }
            }
        }"#;
        editor.load_json(json).expect("load");
        assert_eq!(editor.playhead().total_frames(), 90);
        assert!(editor.animator().clip(ObjectId(1)).is_some());
        assert!(editor.animator().clip(ObjectId(2)).is_none());
        assert_eq!(editor.animator().track_target(ObjectId(1)), Some(ObjectId(2)));
        assert_eq!(editor.animator().track_target(ObjectId(2)), None);
        assert_eq!(editor.animator().track_target(ObjectId(3)), None);
    }

    #[test]
    fn export_excludes_cameras() {
        let mut editor = editor();
        editor.add_object(ObjectKind::Cube);
        editor.add_object(ObjectKind::Camera);
        let objects = editor.export_objects();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].kind, ObjectKind::Cube);
    }

    #[test]
    fn failed_export_leaves_state_unchanged() {
        let mut editor = editor();
        editor.add_object(ObjectKind::Cube);
        editor.renderer_mut().set_fail_exports(true);
        let depth = editor.history().undo_depth();
        assert!(editor.export_bytes().is_err());
        assert_eq!(editor.registry().len(), 1);
        assert_eq!(editor.history().undo_depth(), depth);
    }
}
