use anyhow::{Context, Result};
use stagecraft::cli::CliOptions;
use stagecraft::config::EditorConfig;
use stagecraft::editor::Editor;
use stagecraft::render::HeadlessRenderer;
use std::fs;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = match CliOptions::parse_from_env() {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("[cli] {err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = run(options) {
        log::error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(options: CliOptions) -> Result<()> {
    let mut config = match &options.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    if !options.overrides.is_empty() {
        log::info!(target: "config", "CLI overrides: {}", options.overrides.applied_fields().join(", "));
        config.apply_overrides(&options.overrides);
    }

    let mut editor = Editor::new(config, HeadlessRenderer::default());
    if let Some(path) = &options.load {
        editor.load(path)?;
    }
    if let Some(path) = &options.script {
        let script =
            fs::read_to_string(path).with_context(|| format!("Reading script {}", path.display()))?;
        let executed = editor.run_script(&script)?;
        log::info!(target: "editor", "ran {executed} command(s) from {}", path.display());
    }
    for event in editor.drain_events() {
        log::debug!(target: "editor", "{event}");
    }
    if let Some(path) = &options.save {
        editor.save(path)?;
    }
    if let Some(path) = &options.export {
        editor.export(path)?;
    }
    log::info!(
        target: "editor",
        "{} object(s), frame {}/{} ({:.2}s), undo depth {}",
        editor.registry().len(),
        editor.playhead().current_frame(),
        editor.playhead().total_frames(),
        editor.playhead().seconds(editor.config().timeline.frames_per_second),
        editor.history().undo_depth()
    );
    Ok(())
}
