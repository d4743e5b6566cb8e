use crate::object::{ObjectId, ObjectKind};
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Presentation areas that need redrawing after a change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct UiRefresh: u8 {
        const OBJECT_LIST = 1 << 0;
        const TRANSFORM_PANEL = 1 << 1;
        const STATUS = 1 << 2;
        const TIMELINE = 1 << 3;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ObjectCreated { id: ObjectId, kind: ObjectKind },
    ObjectDeleted { id: ObjectId },
    ObjectRenamed { id: ObjectId, name: String },
    TransformChanged { id: ObjectId },
    SelectionChanged { primary: Option<ObjectId>, count: usize },
    HistoryChanged { undo_depth: usize, redo_depth: usize },
    SceneRestored { objects: usize },
    SceneLoaded { objects: usize, skipped: usize },
    FrameChanged { frame: u32 },
    PlaybackChanged { playing: bool },
    KeyframeAdded { id: ObjectId, frame: u32 },
    TrackTargetChanged { camera: ObjectId, target: Option<ObjectId> },
    GridChanged,
    Status { message: String },
}

impl EditorEvent {
    pub fn refresh(&self) -> UiRefresh {
        match self {
            EditorEvent::ObjectCreated { .. }
            | EditorEvent::ObjectDeleted { .. }
            | EditorEvent::SceneRestored { .. }
            | EditorEvent::SceneLoaded { .. } => UiRefresh::all(),
            EditorEvent::ObjectRenamed { .. } => UiRefresh::OBJECT_LIST | UiRefresh::TRANSFORM_PANEL,
            EditorEvent::TransformChanged { .. } => UiRefresh::TRANSFORM_PANEL,
            EditorEvent::SelectionChanged { .. } => {
                UiRefresh::OBJECT_LIST | UiRefresh::TRANSFORM_PANEL | UiRefresh::STATUS
            }
            EditorEvent::HistoryChanged { .. } | EditorEvent::Status { .. } | EditorEvent::GridChanged => {
                UiRefresh::STATUS
            }
            EditorEvent::FrameChanged { .. } | EditorEvent::PlaybackChanged { .. } => UiRefresh::TIMELINE,
            EditorEvent::KeyframeAdded { .. } => UiRefresh::TIMELINE | UiRefresh::STATUS,
            EditorEvent::TrackTargetChanged { .. } => UiRefresh::TRANSFORM_PANEL | UiRefresh::STATUS,
        }
    }
}

impl fmt::Display for EditorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorEvent::ObjectCreated { id, kind } => write!(f, "ObjectCreated id={id} kind={kind}"),
            EditorEvent::ObjectDeleted { id } => write!(f, "ObjectDeleted id={id}"),
            EditorEvent::ObjectRenamed { id, name } => write!(f, "ObjectRenamed id={id} name={name}"),
            EditorEvent::TransformChanged { id } => write!(f, "TransformChanged id={id}"),
            EditorEvent::SelectionChanged { primary, count } => match primary {
                Some(primary) => write!(f, "SelectionChanged primary={primary} count={count}"),
                None => write!(f, "SelectionChanged primary=none count={count}"),
            },
            EditorEvent::HistoryChanged { undo_depth, redo_depth } => {
                write!(f, "HistoryChanged undo={undo_depth} redo={redo_depth}")
            }
            EditorEvent::SceneRestored { objects } => write!(f, "SceneRestored objects={objects}"),
            EditorEvent::SceneLoaded { objects, skipped } => {
                write!(f, "SceneLoaded objects={objects} skipped={skipped}")
            }
            EditorEvent::FrameChanged { frame } => write!(f, "FrameChanged frame={frame}"),
            EditorEvent::PlaybackChanged { playing } => write!(f, "PlaybackChanged playing={playing}"),
            EditorEvent::KeyframeAdded { id, frame } => write!(f, "KeyframeAdded id={id} frame={frame}"),
            EditorEvent::TrackTargetChanged { camera, target } => match target {
                Some(target) => write!(f, "TrackTargetChanged camera={camera} target={target}"),
                None => write!(f, "TrackTargetChanged camera={camera} target=none"),
            },
            EditorEvent::GridChanged => write!(f, "GridChanged"),
            EditorEvent::Status { message } => write!(f, "Status {message}"),
        }
    }
}

/// Queue of change notifications for the presentation layer, drained once per frame.
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<EditorEvent>,
    pending_refresh: UiRefresh,
}

impl EventBus {
    pub fn push(&mut self, event: EditorEvent) {
        self.pending_refresh |= event.refresh();
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<EditorEvent> {
        self.events.drain(..).collect()
    }

    pub fn take_refresh(&mut self) -> UiRefresh {
        std::mem::take(&mut self.pending_refresh)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
