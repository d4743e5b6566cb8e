use crate::animation::Clip;
use crate::object::ObjectId;
use crate::scene::ObjectRecord;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Self-contained copy of the scene: every object record (with its track target) and every clip.
/// Selection and clipboard are deliberately not part of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneSnapshot {
    pub objects: Vec<ObjectRecord>,
    pub clips: BTreeMap<ObjectId, Clip>,
}

impl SceneSnapshot {
    pub fn object(&self, id: ObjectId) -> Option<&ObjectRecord> {
        self.objects.iter().find(|record| record.id == id)
    }
}

/// Linear undo/redo over full snapshots. The top of the undo stack is always the current state,
/// so a single entry means there is nothing to undo.
#[derive(Debug)]
pub struct History {
    undo: VecDeque<Arc<SceneSnapshot>>,
    redo: Vec<Arc<SceneSnapshot>>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self { undo: VecDeque::new(), redo: Vec::new(), capacity: capacity.max(1) }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn current(&self) -> Option<&Arc<SceneSnapshot>> {
        self.undo.back()
    }

    pub fn commit(&mut self, snapshot: SceneSnapshot) {
        self.undo.push_back(Arc::new(snapshot));
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Steps back one entry and returns the snapshot to restore.
    pub fn undo(&mut self) -> Option<Arc<SceneSnapshot>> {
        if !self.can_undo() {
            return None;
        }
        let undone = self.undo.pop_back()?;
        self.redo.push(undone);
        self.undo.back().cloned()
    }

    pub fn redo(&mut self) -> Option<Arc<SceneSnapshot>> {
        let snapshot = self.redo.pop()?;
        self.undo.push_back(Arc::clone(&snapshot));
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        Some(snapshot)
    }
}
