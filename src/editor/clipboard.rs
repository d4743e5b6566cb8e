use super::Editor;
use crate::events::EditorEvent;
use crate::object::ObjectId;
use crate::render::RenderBackend;
use crate::scene::ObjectRecord;

impl<R: RenderBackend> Editor<R> {
    fn selected_records(&self) -> Vec<ObjectRecord> {
        self.selection
            .ids()
            .iter()
            .filter_map(|id| self.registry.serialize(*id, self.animator.track_target(*id)))
            .collect()
    }

    /// Copies the selection into the clipboard. An empty selection leaves the clipboard as is.
    pub fn copy_selection(&mut self) -> usize {
        let records = self.selected_records();
        if records.is_empty() {
            return 0;
        }
        let count = records.len();
        self.clipboard = records;
        self.set_status(format!("Copied {count} object(s)"));
        count
    }

    /// Creates new objects from the clipboard and selects them.
    pub fn paste(&mut self) -> Vec<ObjectId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let records = self.clipboard.clone();
        let created = self.instantiate_copies(&records);
        if !created.is_empty() {
            self.set_status(format!("Pasted {} object(s)", created.len()));
        }
        created
    }

    /// Copies the selection in place without touching the clipboard.
    pub fn duplicate_selection(&mut self) -> Vec<ObjectId> {
        let records = self.selected_records();
        let created = self.instantiate_copies(&records);
        if !created.is_empty() {
            self.set_status(format!("Duplicated {} object(s)", created.len()));
        }
        created
    }

    /// Spawns fresh objects (new ids) shaped like `records`, offset by the paste offset. Camera
    /// copies keep their track target while it is still live; clips are not copied.
    fn instantiate_copies(&mut self, records: &[ObjectRecord]) -> Vec<ObjectId> {
        let offset = self.config.clipboard.offset();
        let mut created = Vec::with_capacity(records.len());
        for record in records {
            let Some(kind) = self.registry.catalog().resolve(&record.kind_key()).map(|entry| entry.kind) else {
                continue;
            };
            let mut transform = record.transform();
            transform.position += offset;
            let id = self.registry.create(&mut self.renderer, kind, Some(transform));
            if !record.name.is_empty() {
                self.registry.rename(id, &record.name);
            }
            if let Some(target) = record.track_target {
                self.animator.set_track_target(&self.registry, id, target);
            }
            self.events.push(EditorEvent::ObjectCreated { id, kind });
            created.push(id);
        }
        if created.is_empty() {
            return created;
        }
        self.selection.clear();
        for id in &created {
            self.selection.add(*id);
        }
        self.sync_selection();
        self.commit();
        created
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EditorConfig;
    use crate::editor::Editor;
    use crate::object::ObjectKind;
    use crate::render::HeadlessRenderer;
    use glam::Vec3;

    fn editor() -> Editor<HeadlessRenderer> {
        Editor::new(EditorConfig::default(), HeadlessRenderer::default())
    }

    #[test]
    fn paste_with_empty_clipboard_is_noop() {
        let mut editor = editor();
        let depth = editor.history().undo_depth();
        assert!(editor.paste().is_empty());
        assert_eq!(editor.history().undo_depth(), depth);
    }

    #[test]
    fn paste_creates_offset_copies_with_new_ids() {
        let mut editor = editor();
        let source = editor.add_object(ObjectKind::Cube);
        editor.rename(source, "Crate");
        assert_eq!(editor.copy_selection(), 1);
        let pasted = editor.paste();
        assert_eq!(pasted.len(), 1);
        let copy = editor.object(pasted[0]).expect("copy");
        assert_ne!(copy.id, source);
        assert_eq!(copy.name, "Crate");
        let original = editor.object(source).map(|o| o.transform.position).expect("source");
        assert_eq!(copy.transform.position, original + Vec3::new(0.5, 0.0, 0.5));
        assert_eq!(editor.selection().ids(), pasted.as_slice());
    }

    #[test]
    fn clipboard_survives_delete_and_undo() {
        let mut editor = editor();
        editor.add_object(ObjectKind::Quad);
        editor.copy_selection();
        editor.delete_selection();
        editor.undo();
        assert_eq!(editor.clipboard().len(), 1);
        assert_eq!(editor.paste().len(), 1);
    }

    #[test]
    fn duplicate_leaves_clipboard_untouched() {
        let mut editor = editor();
        editor.add_object(ObjectKind::Cube);
        let duplicated = editor.duplicate_selection();
        assert_eq!(duplicated.len(), 1);
        assert!(editor.clipboard().is_empty());
        assert_eq!(editor.registry().len(), 2);
    }
}
