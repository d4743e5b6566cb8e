pub mod animation;
pub mod camera3d;
pub mod cli;
pub mod command;
pub mod config;
pub mod editor;
pub mod events;
pub mod gizmo;
pub mod history;
pub mod kinds;
pub mod mesh;
pub mod object;
pub mod playback;
pub mod registry;
pub mod render;
pub mod scene;
pub mod selection;

pub use editor::Editor;
pub use object::{ObjectId, ObjectKind, Transform};
