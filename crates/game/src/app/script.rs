use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use depths_engine::{InputAction, InputSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_FRAMES_PER_SECOND: u32 = 60;
const DEFAULT_MAX_SECONDS: f64 = 120.0;

/// Scripted input for a headless run: each step holds a set of actions down
/// for a number of seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct InputScript {
    #[serde(default = "default_frames_per_second")]
    pub(crate) frames_per_second: u32,
    /// Hard cap on simulated time regardless of the steps.
    #[serde(default = "default_max_seconds")]
    pub(crate) max_seconds: f64,
    pub(crate) steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScriptStep {
    pub(crate) seconds: f64,
    #[serde(default)]
    pub(crate) actions: Vec<InputAction>,
}

#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    #[error("failed to read input script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse input script {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[error("invalid input script {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

fn default_frames_per_second() -> u32 {
    DEFAULT_FRAMES_PER_SECOND
}

fn default_max_seconds() -> f64 {
    DEFAULT_MAX_SECONDS
}

impl InputScript {
    pub(crate) fn load(path: &Path) -> Result<Self, ScriptError> {
        let raw = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, path)
    }

    pub(crate) fn parse(raw: &str, path: &Path) -> Result<Self, ScriptError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let script: Self = serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
            ScriptError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        script.validate(path)?;
        Ok(script)
    }

    fn validate(&self, path: &Path) -> Result<(), ScriptError> {
        let invalid = |reason: String| ScriptError::Invalid {
            path: path.to_path_buf(),
            reason,
        };
        if self.frames_per_second == 0 {
            return Err(invalid("frames_per_second must be at least 1".to_string()));
        }
        if !self.max_seconds.is_finite() || self.max_seconds <= 0.0 {
            return Err(invalid(format!(
                "max_seconds must be a positive finite number, got {}",
                self.max_seconds
            )));
        }
        for (index, step) in self.steps.iter().enumerate() {
            if !step.seconds.is_finite() || step.seconds < 0.0 {
                return Err(invalid(format!(
                    "steps[{index}].seconds must be a non-negative finite number, got {}",
                    step.seconds
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn frame_delta(&self) -> f64 {
        1.0 / f64::from(self.frames_per_second)
    }

    pub(crate) fn max_frames(&self) -> u64 {
        (self.max_seconds * f64::from(self.frames_per_second)).floor() as u64
    }
}

impl ScriptStep {
    /// Frames this step lasts at `frames_per_second`, rounded to the nearest
    /// whole frame.
    pub(crate) fn frame_count(&self, frames_per_second: u32) -> u64 {
        (self.seconds * f64::from(frames_per_second)).round() as u64
    }

    pub(crate) fn snapshot(&self) -> InputSnapshot {
        InputSnapshot::from_actions(&self.actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<InputScript, ScriptError> {
        InputScript::parse(raw, Path::new("test.json"))
    }

    #[test]
    fn parses_steps_with_defaults() {
        let script = parse(
            r#"{ "steps": [ { "seconds": 1.5, "actions": ["move_right", "activate_pearl"] },
                            { "seconds": 0.5 } ] }"#,
        )
        .expect("valid script");
        assert_eq!(script.frames_per_second, 60);
        assert_eq!(script.max_seconds, 120.0);
        assert_eq!(
            script.steps[0].actions,
            vec![InputAction::MoveRight, InputAction::ActivatePearl]
        );
        assert!(script.steps[1].actions.is_empty());
        assert_eq!(script.steps[0].frame_count(60), 90);
        assert_eq!(script.max_frames(), 7200);
        assert!(script.steps[0]
            .snapshot()
            .is_down(InputAction::ActivatePearl));
    }

    #[test]
    fn parse_error_names_the_offending_field() {
        let err = parse(r#"{ "steps": [ { "seconds": 1, "actions": ["move_right", "jump"] } ] }"#)
            .expect_err("unknown action");
        let message = err.to_string();
        assert!(message.contains("steps[0].actions[1]"), "message={message}");
        assert!(message.contains("test.json"), "message={message}");
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = parse(r#"{ "steps": [], "speed": 2 }"#).expect_err("unknown field");
        assert!(matches!(err, ScriptError::Parse { .. }));
    }

    #[test]
    fn validation_rejects_degenerate_timing() {
        assert!(matches!(
            parse(r#"{ "frames_per_second": 0, "steps": [] }"#),
            Err(ScriptError::Invalid { .. })
        ));
        assert!(matches!(
            parse(r#"{ "max_seconds": 0, "steps": [] }"#),
            Err(ScriptError::Invalid { .. })
        ));
        let err = parse(r#"{ "steps": [ { "seconds": 1 }, { "seconds": -1 } ] }"#)
            .expect_err("negative step");
        assert!(err.to_string().contains("steps[1].seconds"));
    }

    #[test]
    fn load_reports_missing_file_path() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("absent.json");
        let err = InputScript::load(&path).expect_err("missing file");
        assert!(matches!(err, ScriptError::Read { .. }));

        let present = temp.path().join("run.json");
        fs::write(&present, r#"{ "frames_per_second": 30, "steps": [] }"#).expect("write");
        let script = InputScript::load(&present).expect("loads");
        assert_eq!(script.frame_delta(), 1.0 / 30.0);
    }
}
