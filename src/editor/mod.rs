use crate::animation::Animator;
use crate::config::EditorConfig;
use crate::events::{EditorEvent, EventBus, UiRefresh};
use crate::gizmo::{DragSession, GizmoMode, GridPlane, GridSnap};
use crate::history::{History, SceneSnapshot};
use crate::kinds::KindCatalog;
use crate::object::{ObjectId, ObjectKind, SceneObject, Transform, TransformField};
use crate::playback::Playhead;
use crate::registry::SceneRegistry;
use crate::render::{Highlight, RenderBackend};
use crate::scene::ObjectRecord;
use crate::selection::Selection;

use anyhow::{Context, Result};
use glam::Vec2;
use std::collections::BTreeMap;

mod clipboard;
mod persistence;
mod timeline;

/// Editing session. Owns the scene registry, selection, history, animation data and the render
/// collaborator; every user-facing mutation goes through here and is committed to history.
pub struct Editor<R: RenderBackend> {
    config: EditorConfig,
    renderer: R,
    registry: SceneRegistry,
    selection: Selection,
    history: History,
    animator: Animator,
    playhead: Playhead,
    clipboard: Vec<ObjectRecord>,
    grid: GridSnap,
    gizmo_mode: GizmoMode,
    drag: Option<DragSession>,
    events: EventBus,
    status: Option<String>,
}

impl<R: RenderBackend> Editor<R> {
    pub fn new(config: EditorConfig, renderer: R) -> Self {
        Self::with_catalog(config, renderer, KindCatalog::default())
    }

    pub fn with_catalog(config: EditorConfig, renderer: R, catalog: KindCatalog) -> Self {
        let history = History::new(config.history.capacity);
        let playhead = Playhead::new(config.timeline.total_frames);
        let grid = config.grid.to_snap();
        let mut editor = Self {
            config,
            renderer,
            registry: SceneRegistry::new(catalog),
            selection: Selection::default(),
            history,
            animator: Animator::default(),
            playhead,
            clipboard: Vec::new(),
            grid,
            gizmo_mode: GizmoMode::default(),
            drag: None,
            events: EventBus::default(),
            status: None,
        };
        // baseline entry so the first user action can be undone
        editor.commit();
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.registry.get(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn playhead(&self) -> &Playhead {
        &self.playhead
    }

    pub fn clipboard(&self) -> &[ObjectRecord] {
        &self.clipboard
    }

    pub fn grid(&self) -> &GridSnap {
        &self.grid
    }

    pub fn gizmo_mode(&self) -> GizmoMode {
        self.gizmo_mode
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain()
    }

    pub fn take_refresh(&mut self) -> UiRefresh {
        self.events.take_refresh()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = Some(message.clone());
        self.events.push(EditorEvent::Status { message });
    }

    // ---- history -------------------------------------------------------------------------

    /// Full copy of the current scene. Track targets are written only when both ends are live,
    /// and clips only for live objects.
    pub fn snapshot(&self) -> SceneSnapshot {
        let objects = self
            .registry
            .iter()
            .map(|object| {
                let target = self.animator.track_target(object.id).filter(|target| self.registry.contains(*target));
                ObjectRecord::capture(object, target)
            })
            .collect();
        let clips = self
            .animator
            .clips()
            .iter()
            .filter(|(id, _)| self.registry.contains(**id))
            .map(|(id, clip)| (*id, clip.clone()))
            .collect();
        SceneSnapshot { objects, clips }
    }

    /// Records the current scene as a new history entry and drops any redo entries.
    pub fn commit(&mut self) {
        let snapshot = self.snapshot();
        self.history.commit(snapshot);
        self.events.push(EditorEvent::HistoryChanged {
            undo_depth: self.history.undo_depth(),
            redo_depth: self.history.redo_depth(),
        });
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            log::debug!(target: "history", "nothing to undo");
            return false;
        };
        self.restore(&snapshot);
        self.set_status("Undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            log::debug!(target: "history", "nothing to redo");
            return false;
        };
        self.restore(&snapshot);
        self.set_status("Redo");
        true
    }

    /// Tears the whole scene down and rebuilds it from `snapshot`, keeping ids.
    fn restore(&mut self, snapshot: &SceneSnapshot) {
        self.drag = None;
        self.registry.clear(&mut self.renderer);
        for record in &snapshot.objects {
            self.registry.reconstruct(&mut self.renderer, record);
        }
        self.registry.recompute_next_id();

        let clips = snapshot
            .clips
            .iter()
            .filter(|(id, _)| self.registry.get(**id).is_some_and(|object| object.is_camera()))
            .map(|(id, clip)| (*id, clip.clone()))
            .collect();
        self.animator.replace(clips, BTreeMap::new());
        for record in &snapshot.objects {
            if let Some(target) = record.track_target {
                self.animator.set_track_target(&self.registry, record.id, target);
            }
        }

        self.selection.retain_live(|id| self.registry.contains(id));
        self.sync_selection();
        self.events.push(EditorEvent::SceneRestored { objects: self.registry.len() });
        self.events.push(EditorEvent::HistoryChanged {
            undo_depth: self.history.undo_depth(),
            redo_depth: self.history.redo_depth(),
        });
        log::debug!(
            target: "history",
            "restored {} objects (undo {}, redo {})",
            self.registry.len(),
            self.history.undo_depth(),
            self.history.redo_depth()
        );
    }

    // ---- selection -----------------------------------------------------------------------

    /// Pushes highlight and gizmo focus to the renderer and notifies observers.
    fn sync_selection(&mut self) {
        let emphasis = self.selection.highlight();
        for object in self.registry.iter() {
            let highlight = if self.selection.contains(object.id) { emphasis } else { Highlight::None };
            self.renderer.set_highlight(object.proxy(), highlight);
        }
        let focus = self.selection.focus().and_then(|id| self.registry.get(id)).map(|object| object.proxy());
        self.renderer.attach_gizmo(focus);
        self.events.push(EditorEvent::SelectionChanged {
            primary: self.selection.primary(),
            count: self.selection.len(),
        });
    }

    pub fn select(&mut self, id: ObjectId, additive: bool) -> bool {
        if !self.registry.contains(id) {
            return false;
        }
        let changed = self.selection.select(id, additive);
        if changed {
            self.sync_selection();
        }
        changed
    }

    pub fn add_to_selection(&mut self, id: ObjectId) -> bool {
        if !self.registry.contains(id) || !self.selection.add(id) {
            return false;
        }
        self.sync_selection();
        true
    }

    pub fn remove_from_selection(&mut self, id: ObjectId) -> bool {
        if !self.selection.remove(id) {
            return false;
        }
        self.sync_selection();
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if !self.selection.clear() {
            return false;
        }
        self.sync_selection();
        true
    }

    pub fn select_all(&mut self) -> bool {
        if !self.selection.select_all(self.registry.ids()) {
            return false;
        }
        self.sync_selection();
        true
    }

    /// Selects whatever the renderer reports under `screen`. A plain click on empty space
    /// clears the selection; an additive one leaves it alone.
    pub fn click(&mut self, screen: Vec2, additive: bool) -> Option<ObjectId> {
        let hit = self.renderer.pick(screen).and_then(|proxy| self.registry.find_by_proxy(proxy));
        match hit {
            Some(id) => {
                self.select(id, additive);
            }
            None if !additive => {
                self.clear_selection();
            }
            None => {}
        }
        hit
    }

    // ---- object mutations ----------------------------------------------------------------

    pub fn add_object(&mut self, kind: ObjectKind) -> ObjectId {
        let id = self.registry.create(&mut self.renderer, kind, None);
        self.events.push(EditorEvent::ObjectCreated { id, kind });
        self.selection.select(id, false);
        self.sync_selection();
        self.commit();
        self.set_status(format!("Added {kind} {id}"));
        id
    }

    /// Removes an object together with everything that refers to it: selection entry, clip,
    /// and track-target bindings in either direction.
    fn remove_object(&mut self, id: ObjectId) -> bool {
        if self.drag.is_some_and(|drag| drag.object == id) {
            self.drag = None;
        }
        let selection_changed = self.selection.remove(id);
        self.animator.forget_object(id);
        let removed = self.registry.destroy(&mut self.renderer, id).is_some();
        if removed {
            self.events.push(EditorEvent::ObjectDeleted { id });
        }
        if selection_changed {
            self.sync_selection();
        }
        removed
    }

    pub fn delete_object(&mut self, id: ObjectId) -> bool {
        if !self.remove_object(id) {
            return false;
        }
        self.commit();
        true
    }

    pub fn delete_selection(&mut self) -> usize {
        let mut removed = 0;
        for id in self.selection.ids().to_vec() {
            if self.remove_object(id) {
                removed += 1;
            }
        }
        if removed > 0 {
            self.commit();
            self.set_status(format!("Deleted {removed} object(s)"));
        }
        removed
    }

    pub fn rename(&mut self, id: ObjectId, name: &str) -> bool {
        if !self.registry.rename(id, name) {
            return false;
        }
        self.events.push(EditorEvent::ObjectRenamed { id, name: name.to_string() });
        self.commit();
        true
    }

    /// Replaces an object's transform directly and commits.
    pub fn set_transform(&mut self, id: ObjectId, transform: Transform) -> bool {
        if !transform.is_finite() || !self.registry.set_transform(&mut self.renderer, id, transform) {
            return false;
        }
        self.events.push(EditorEvent::TransformChanged { id });
        self.commit();
        true
    }

    pub fn set_transform_field(&mut self, id: ObjectId, field: TransformField, value: f32) -> bool {
        let Some(mut transform) = self.registry.get(id).map(|object| object.transform) else {
            return false;
        };
        field.write(&mut transform, value);
        self.set_transform(id, transform)
    }

    /// Binds `camera` to look at `target`, or unbinds it with `None`.
    pub fn set_track_target(&mut self, camera: ObjectId, target: Option<ObjectId>) -> bool {
        let changed = match target {
            Some(target) => self.animator.set_track_target(&self.registry, camera, target),
            None => self.animator.clear_track_target(camera),
        };
        if !changed {
            return false;
        }
        self.events.push(EditorEvent::TrackTargetChanged { camera, target });
        self.commit();
        true
    }

    // ---- grid and gizmo ------------------------------------------------------------------

    pub fn set_grid_plane(&mut self, plane: GridPlane) {
        if self.grid.plane != plane {
            self.grid.plane = plane;
            self.events.push(EditorEvent::GridChanged);
        }
    }

    pub fn toggle_grid_snap(&mut self) -> bool {
        self.grid.enabled = !self.grid.enabled;
        self.events.push(EditorEvent::GridChanged);
        self.grid.enabled
    }

    pub fn set_gizmo_mode(&mut self, mode: GizmoMode) {
        if self.gizmo_mode != mode {
            self.gizmo_mode = mode;
            self.set_status(format!("{} mode", mode.label()));
        }
    }

    pub fn dragging(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Starts a gizmo drag on the manipulation focus.
    pub fn begin_drag(&mut self) -> bool {
        let Some(object) = self.selection.focus().and_then(|id| self.registry.get(id)) else {
            return false;
        };
        self.drag = Some(DragSession::new(object.id, self.gizmo_mode, object.transform));
        true
    }

    /// Live drag update; snapped when grid snapping is on, never committed.
    pub fn drag_to(&mut self, transform: Transform) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let snapped = self.grid.apply(drag.mode, transform);
        if !snapped.is_finite() {
            return false;
        }
        let changed = self.registry.set_transform(&mut self.renderer, drag.object, snapped);
        if changed {
            self.events.push(EditorEvent::TransformChanged { id: drag.object });
        }
        changed
    }

    /// Gizmo release. Commits once if the drag moved the object.
    pub fn end_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        let moved = self.registry.get(drag.object).is_some_and(|object| drag.changed(&object.transform));
        if moved {
            self.commit();
        }
        moved
    }

    pub fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            if self.registry.set_transform(&mut self.renderer, drag.object, drag.start) {
                self.events.push(EditorEvent::TransformChanged { id: drag.object });
            }
        }
    }

    // ---- frame loop ----------------------------------------------------------------------

    /// One scheduling tick: advance playback and apply clips while playing, re-aim every bound
    /// camera (always, even when paused), then render.
    pub fn tick(&mut self) -> Result<()> {
        let mut touched = Vec::new();
        if self.playhead.is_playing() {
            let frame = self.playhead.advance();
            self.events.push(EditorEvent::FrameChanged { frame });
            touched.extend(self.animator.apply_frame(&mut self.registry, frame));
        }
        touched.extend(self.animator.apply_look_at(&mut self.registry));
        self.finish_animation_update(&touched);
        self.renderer.render_frame().context("Rendering frame")
    }

    fn finish_animation_update(&mut self, touched: &[ObjectId]) {
        self.registry.sync_proxies(&mut self.renderer, touched);
        if let Some(primary) = self.selection.primary().filter(|primary| touched.contains(primary)) {
            self.events.push(EditorEvent::TransformChanged { id: primary });
        }
    }
}
