use stagecraft::config::EditorConfig;
use stagecraft::render::{Highlight, HeadlessRenderer};
use stagecraft::{Editor, ObjectKind};

fn editor() -> Editor<HeadlessRenderer> {
    Editor::new(EditorConfig::default(), HeadlessRenderer::default())
}

#[test]
fn plain_select_twice_does_not_toggle() {
    let mut editor = editor();
    let a = editor.add_object(ObjectKind::Cube);
    editor.add_object(ObjectKind::Quad);
    editor.select(a, false);
    editor.select(a, false);
    assert_eq!(editor.selection().ids(), &[a]);
}

#[test]
fn additive_select_twice_toggles_off() {
    let mut editor = editor();
    let a = editor.add_object(ObjectKind::Cube);
    editor.clear_selection();
    editor.select(a, true);
    editor.select(a, true);
    assert!(editor.selection().is_empty());
    assert_eq!(editor.renderer().gizmo_target(), None);
}

#[test]
fn select_all_follows_registry_order() {
    let mut editor = editor();
    let a = editor.add_object(ObjectKind::Cube);
    let b = editor.add_object(ObjectKind::Camera);
    let c = editor.add_object(ObjectKind::Quad);
    editor.select_all();
    assert_eq!(editor.selection().ids(), &[a, b, c]);
    assert_eq!(editor.selection().primary(), Some(c));
    let proxy = editor.object(a).map(|o| o.proxy()).expect("a");
    assert_eq!(editor.renderer().proxy(proxy).map(|p| p.highlight), Some(Highlight::Multi));
}

#[test]
fn delete_cascades_through_selection_clips_and_bindings() {
    let mut editor = editor();
    let cube = editor.add_object(ObjectKind::Cube);
    let camera = editor.add_object(ObjectKind::Camera);
    editor.add_keyframe();
    assert!(editor.set_track_target(camera, Some(cube)));

    editor.select(cube, false);
    editor.select(camera, true);
    editor.delete_selection();

    assert!(editor.selection().is_empty());
    assert!(editor.animator().clips().is_empty());
    assert!(editor.animator().track_targets().is_empty());
    assert_eq!(editor.renderer().live_proxy_count(), 0);
}

#[test]
fn deleting_target_removes_binding() {
    let mut editor = editor();
    let cube = editor.add_object(ObjectKind::Cube);
    let camera = editor.add_object(ObjectKind::Camera);
    editor.set_track_target(camera, Some(cube));
    editor.delete_object(cube);
    assert_eq!(editor.animator().track_target(camera), None);
    let record = editor.snapshot().object(camera).cloned().expect("camera record");
    assert_eq!(record.track_target, None);
}

#[test]
fn click_picks_object_under_cursor() {
    let mut editor = editor();
    let a = editor.add_object(ObjectKind::Cube);
    let b = editor.add_object(ObjectKind::Quad);
    editor.set_transform(b, stagecraft::Transform::from_position(glam::Vec3::new(3.0, 0.0, 0.0)));
    editor.clear_selection();

    let proxy = editor.object(a).map(|o| o.proxy()).expect("a");
    let screen = editor.renderer().screen_position(proxy).expect("a is visible");
    assert_eq!(editor.click(screen, false), Some(a));
    assert_eq!(editor.selection().ids(), &[a]);

    assert_eq!(editor.click(glam::Vec2::new(1.0, 1.0), true), None);
    assert_eq!(editor.selection().ids(), &[a], "additive miss keeps the selection");
    editor.click(glam::Vec2::new(1.0, 1.0), false);
    assert!(editor.selection().is_empty());
}
