use crate::editor::Editor;
use crate::gizmo::{GizmoMode, GridPlane};
use crate::object::{ObjectId, ObjectKind, TransformField};
use crate::render::RenderBackend;
use anyhow::{anyhow, bail, Context, Result};
use glam::Vec2;
use std::path::PathBuf;
use std::str::FromStr;

/// One discrete user input, independent of how it was bound (key, button, script line).
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    Select(ObjectId),
    Toggle(ObjectId),
    Click { screen: Vec2, additive: bool },
    SelectAll,
    ClearSelection,
    Add(ObjectKind),
    Delete,
    Duplicate,
    Copy,
    Paste,
    Undo,
    Redo,
    Grid(GridPlane),
    ToggleSnap,
    Mode(GizmoMode),
    TogglePlayback,
    Stop,
    Seek(u32),
    Step(i64),
    AddKeyframe,
    NextKeyframe,
    PrevKeyframe,
    Save(PathBuf),
    Load(PathBuf),
    Export(PathBuf),
    Rename { id: ObjectId, name: String },
    Target { camera: ObjectId, target: Option<ObjectId> },
    Set { id: ObjectId, field: TransformField, value: f32 },
    Tick(u32),
}

fn parse_id(raw: Option<&str>, usage: &str) -> Result<ObjectId> {
    let raw = raw.ok_or_else(|| anyhow!("Missing object id. Usage: {usage}"))?;
    let value = raw.parse::<u64>().with_context(|| format!("Invalid object id '{raw}'"))?;
    Ok(ObjectId(value))
}

fn parse_kind(raw: Option<&str>) -> Result<ObjectKind> {
    let raw = raw.ok_or_else(|| anyhow!("Missing kind. Usage: add <quad|cube|camera>"))?;
    ObjectKind::ALL
        .into_iter()
        .find(|kind| kind.key().eq_ignore_ascii_case(raw))
        .ok_or_else(|| anyhow!("Unknown object kind '{raw}'"))
}

fn parse_path(raw: Option<&str>, verb: &str) -> Result<PathBuf> {
    raw.map(PathBuf::from).ok_or_else(|| anyhow!("'{verb}' requires a path"))
}

fn parse_float(raw: Option<&str>, what: &str) -> Result<f32> {
    let raw = raw.ok_or_else(|| anyhow!("Missing {what}"))?;
    raw.parse::<f32>().with_context(|| format!("Invalid {what} '{raw}'"))
}

impl FromStr for EditorCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or_else(|| anyhow!("Empty command"))?.to_ascii_lowercase();
        let command = match verb.as_str() {
            "select" => EditorCommand::Select(parse_id(parts.next(), "select <id>")?),
            "toggle" => EditorCommand::Toggle(parse_id(parts.next(), "toggle <id>")?),
            "click" => {
                let x = parse_float(parts.next(), "screen x")?;
                let y = parse_float(parts.next(), "screen y")?;
                let additive = match parts.next() {
                    None => false,
                    Some(flag) if flag.eq_ignore_ascii_case("add") => true,
                    Some(other) => bail!("Unexpected click modifier '{other}'. Use 'add'."),
                };
                EditorCommand::Click { screen: Vec2::new(x, y), additive }
            }
            "select-all" => EditorCommand::SelectAll,
            "clear-selection" | "deselect" => EditorCommand::ClearSelection,
            "add" => EditorCommand::Add(parse_kind(parts.next())?),
            "delete" => EditorCommand::Delete,
            "duplicate" => EditorCommand::Duplicate,
            "copy" => EditorCommand::Copy,
            "paste" => EditorCommand::Paste,
            "undo" => EditorCommand::Undo,
            "redo" => EditorCommand::Redo,
            "grid" => {
                let raw = parts.next().ok_or_else(|| anyhow!("'grid' requires a plane (xz, xy, yz)"))?;
                EditorCommand::Grid(raw.parse()?)
            }
            "snap" => EditorCommand::ToggleSnap,
            "mode" => {
                let raw = parts.next().ok_or_else(|| anyhow!("'mode' requires translate, rotate or scale"))?;
                EditorCommand::Mode(raw.parse()?)
            }
            "play" | "pause" => EditorCommand::TogglePlayback,
            "stop" => EditorCommand::Stop,
            "seek" => {
                let raw = parts.next().ok_or_else(|| anyhow!("'seek' requires a frame"))?;
                EditorCommand::Seek(raw.parse().with_context(|| format!("Invalid frame '{raw}'"))?)
            }
            "step" => {
                let raw = parts.next().ok_or_else(|| anyhow!("'step' requires a frame delta"))?;
                EditorCommand::Step(raw.parse().with_context(|| format!("Invalid frame delta '{raw}'"))?)
            }
            "keyframe" => EditorCommand::AddKeyframe,
            "next-key" => EditorCommand::NextKeyframe,
            "prev-key" => EditorCommand::PrevKeyframe,
            "save" => EditorCommand::Save(parse_path(parts.next(), "save")?),
            "load" => EditorCommand::Load(parse_path(parts.next(), "load")?),
            "export" => EditorCommand::Export(parse_path(parts.next(), "export")?),
            "rename" => {
                let id = parse_id(parts.next(), "rename <id> <name>")?;
                let name = parts.by_ref().collect::<Vec<_>>().join(" ");
                if name.is_empty() {
                    bail!("'rename' requires a name");
                }
                return Ok(EditorCommand::Rename { id, name });
            }
            "target" => {
                let camera = parse_id(parts.next(), "target <camera> <target|none>")?;
                let target = match parts.next() {
                    Some(raw) if raw.eq_ignore_ascii_case("none") => None,
                    raw => Some(parse_id(raw, "target <camera> <target|none>")?),
                };
                EditorCommand::Target { camera, target }
            }
            "set" => {
                let id = parse_id(parts.next(), "set <id> <property>.<axis> <value>")?;
                let field: TransformField =
                    parts.next().ok_or_else(|| anyhow!("'set' requires a field like position.x"))?.parse()?;
                let value = parse_float(parts.next(), "value")?;
                EditorCommand::Set { id, field, value }
            }
            "tick" => {
                let count = match parts.next() {
                    Some(raw) => raw.parse().with_context(|| format!("Invalid tick count '{raw}'"))?,
                    None => 1,
                };
                EditorCommand::Tick(count)
            }
            other => bail!("Unknown command '{other}'"),
        };
        if let Some(extra) = parts.next() {
            bail!("Unexpected argument '{extra}' for '{verb}'");
        }
        Ok(command)
    }
}

impl<R: RenderBackend> Editor<R> {
    /// Runs one command. Guarded no-ops (undo with no history, paste with an empty clipboard,
    /// keyframing a non-camera) succeed silently; only IO, parse and collaborator failures are
    /// errors.
    pub fn execute(&mut self, command: &EditorCommand) -> Result<()> {
        match command {
            EditorCommand::Select(id) => {
                self.select(*id, false);
            }
            EditorCommand::Toggle(id) => {
                self.select(*id, true);
            }
            EditorCommand::Click { screen, additive } => {
                self.click(*screen, *additive);
            }
            EditorCommand::SelectAll => {
                self.select_all();
            }
            EditorCommand::ClearSelection => {
                self.clear_selection();
            }
            EditorCommand::Add(kind) => {
                self.add_object(*kind);
            }
            EditorCommand::Delete => {
                self.delete_selection();
            }
            EditorCommand::Duplicate => {
                self.duplicate_selection();
            }
            EditorCommand::Copy => {
                self.copy_selection();
            }
            EditorCommand::Paste => {
                self.paste();
            }
            EditorCommand::Undo => {
                self.undo();
            }
            EditorCommand::Redo => {
                self.redo();
            }
            EditorCommand::Grid(plane) => self.set_grid_plane(*plane),
            EditorCommand::ToggleSnap => {
                self.toggle_grid_snap();
            }
            EditorCommand::Mode(mode) => self.set_gizmo_mode(*mode),
            EditorCommand::TogglePlayback => {
                self.toggle_playback();
            }
            EditorCommand::Stop => self.stop(),
            EditorCommand::Seek(frame) => {
                self.seek(*frame);
            }
            EditorCommand::Step(delta) => {
                self.step_frames(*delta);
            }
            EditorCommand::AddKeyframe => {
                self.add_keyframe();
            }
            EditorCommand::NextKeyframe => {
                self.jump_next_keyframe();
            }
            EditorCommand::PrevKeyframe => {
                self.jump_prev_keyframe();
            }
            EditorCommand::Save(path) => self.save(path)?,
            EditorCommand::Load(path) => self.load(path)?,
            EditorCommand::Export(path) => {
                self.export(path)?;
            }
            EditorCommand::Rename { id, name } => {
                self.rename(*id, name);
            }
            EditorCommand::Target { camera, target } => {
                self.set_track_target(*camera, *target);
            }
            EditorCommand::Set { id, field, value } => {
                self.set_transform_field(*id, *field, *value);
            }
            EditorCommand::Tick(count) => {
                for _ in 0..*count {
                    self.tick()?;
                }
            }
        }
        Ok(())
    }

    /// Executes a newline-separated script. Blank lines and `#` comments are skipped; the first
    /// failing line aborts with its line number.
    pub fn run_script(&mut self, script: &str) -> Result<usize> {
        let mut executed = 0;
        for (index, raw) in script.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let command: EditorCommand = line.parse().with_context(|| format!("line {}: '{line}'", index + 1))?;
            self.execute(&command).with_context(|| format!("line {}: '{line}'", index + 1))?;
            executed += 1;
        }
        Ok(executed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::object::TransformProperty;
    use crate::render::HeadlessRenderer;

    #[test]
    fn parses_core_commands() {
        assert_eq!("add Camera".parse::<EditorCommand>().expect("add"), EditorCommand::Add(ObjectKind::Camera));
        assert_eq!("step -10".parse::<EditorCommand>().expect("step"), EditorCommand::Step(-10));
        assert_eq!(
            "target 3 none".parse::<EditorCommand>().expect("target"),
            EditorCommand::Target { camera: ObjectId(3), target: None }
        );
        assert_eq!(
            "rename 2 Main Camera".parse::<EditorCommand>().expect("rename"),
            EditorCommand::Rename { id: ObjectId(2), name: "Main Camera".into() }
        );
        assert_eq!(
            "set 4 scale.z 2.5".parse::<EditorCommand>().expect("set"),
            EditorCommand::Set {
                id: ObjectId(4),
                field: TransformField { property: TransformProperty::Scale, axis: 2 },
                value: 2.5,
            }
        );
        assert_eq!(
            "click 10 20 add".parse::<EditorCommand>().expect("click"),
            EditorCommand::Click { screen: Vec2::new(10.0, 20.0), additive: true }
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!("add sphere".parse::<EditorCommand>().is_err());
        assert!("undo now".parse::<EditorCommand>().is_err());
        assert!("seek -1".parse::<EditorCommand>().is_err());
        assert!("frobnicate".parse::<EditorCommand>().is_err());
        assert!("".parse::<EditorCommand>().is_err());
    }

    #[test]
    fn script_runs_commands_and_reports_line_numbers() {
        let mut editor = Editor::new(EditorConfig::default(), HeadlessRenderer::default());
        let script = "# scene setup\nadd cube\nadd camera\n\ntarget 2 1\ntick 3\n";
        assert_eq!(editor.run_script(script).expect("script"), 4);
        assert_eq!(editor.registry().len(), 2);
        assert_eq!(editor.animator().track_target(ObjectId(2)), Some(ObjectId(1)));
        assert_eq!(editor.renderer().frames_rendered(), 3);

        let err = editor.run_script("add cube\nbogus\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }
}
