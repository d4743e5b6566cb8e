use crate::config::EditorConfigOverrides;
use crate::gizmo::GridPlane;
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;

/// Parsed command line of the headless driver.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub load: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub overrides: EditorConfigOverrides,
}

const SUPPORTED_FLAGS: &str =
    "--config, --load, --script, --save, --export, --total-frames, --history, --grid, --snap";

impl CliOptions {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = CliOptions::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            let Some(key) = flag.strip_prefix("--") else {
                bail!("Unexpected argument '{flag}'. Flags take the form --name <value>.");
            };
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "config" => options.config = Some(PathBuf::from(value)),
                "load" => options.load = Some(PathBuf::from(value)),
                "script" => options.script = Some(PathBuf::from(value)),
                "save" => options.save = Some(PathBuf::from(value)),
                "export" => options.export = Some(PathBuf::from(value)),
                "total-frames" => {
                    let frames =
                        value.parse::<u32>().with_context(|| format!("Invalid total-frames '{value}'"))?;
                    if frames == 0 {
                        bail!("total-frames must be at least 1");
                    }
                    options.overrides.total_frames = Some(frames);
                }
                "history" => {
                    let capacity =
                        value.parse::<usize>().with_context(|| format!("Invalid history size '{value}'"))?;
                    options.overrides.history_capacity = Some(capacity);
                }
                "grid" => {
                    options.overrides.grid_plane = Some(value.parse::<GridPlane>()?);
                }
                "snap" => {
                    options.overrides.grid_snap = Some(parse_bool_flag("snap", &value)?);
                }
                _ => bail!("Unknown flag '{flag}'. Supported flags: {SUPPORTED_FLAGS}."),
            }
        }
        Ok(options)
    }
}

fn parse_bool_flag(flag: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => bail!("Invalid {flag} value '{other}'. Use on/off or true/false."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths_and_overrides() {
        let args = [
            "stagecraft",
            "--load",
            "in.json",
            "--save",
            "out.json",
            "--total-frames",
            "120",
            "--grid",
            "xy",
            "--snap",
            "on",
        ];
        let options = CliOptions::parse(args).expect("parse options");
        assert_eq!(options.load, Some(PathBuf::from("in.json")));
        assert_eq!(options.save, Some(PathBuf::from("out.json")));
        assert_eq!(options.overrides.total_frames, Some(120));
        assert_eq!(options.overrides.grid_plane, Some(GridPlane::Xy));
        assert_eq!(options.overrides.grid_snap, Some(true));
    }

    #[test]
    fn latest_flag_wins() {
        let args = ["stagecraft", "--history", "10", "--history", "25", "--snap", "on", "--snap", "off"];
        let options = CliOptions::parse(args).expect("parse options");
        assert_eq!(options.overrides.history_capacity, Some(25));
        assert_eq!(options.overrides.grid_snap, Some(false));
    }

    #[test]
    fn missing_value_errors() {
        let err = CliOptions::parse(["stagecraft", "--load"]).unwrap_err();
        assert!(err.to_string().contains("Expected a value"), "error should mention missing value");
    }

    #[test]
    fn rejects_unknown_flags_and_zero_frames() {
        let err = CliOptions::parse(["stagecraft", "--foo", "bar"]).unwrap_err();
        assert!(err.to_string().contains("Unknown flag"), "unknown flags should error");
        assert!(CliOptions::parse(["stagecraft", "--total-frames", "0"]).is_err());
    }
}
