#![cfg(feature = "binary_scene")]

use glam::Vec3;
use stagecraft::config::EditorConfig;
use stagecraft::render::HeadlessRenderer;
use stagecraft::scene::SceneFile;
use stagecraft::{Editor, ObjectKind, Transform};
use tempfile::tempdir;

#[test]
fn binary_scene_roundtrip_preserves_objects() {
    let mut editor = Editor::new(EditorConfig::default(), HeadlessRenderer::default());
    let cube = editor.add_object(ObjectKind::Cube);
    editor.set_transform(cube, Transform::from_position(Vec3::new(1.0, -2.0, 0.5)));
    let camera = editor.add_object(ObjectKind::Camera);
    editor.add_keyframe();
    editor.set_track_target(camera, Some(cube));
    let original = editor.snapshot();

    let dir = tempdir().expect("temp dir");
    let binary_path = dir.path().join("roundtrip.sscene");
    editor.save(&binary_path).expect("save binary scene");

    let bytes = std::fs::read(&binary_path).expect("read binary scene");
    assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_err(), "binary scenes are not plain json");

    let mut restored = Editor::new(EditorConfig::default(), HeadlessRenderer::default());
    restored.load(&binary_path).expect("load binary scene");
    assert_eq!(restored.snapshot(), original);
    assert_eq!(restored.animator().track_target(camera), Some(cube));

    let json_path = dir.path().join("roundtrip.json");
    SceneFile::load_from_path(&binary_path).expect("decode").save_to_path(&json_path).expect("save json");
    let from_json = SceneFile::load_from_path(&json_path).expect("load json");
    assert_eq!(from_json.objects, original.objects);
}
