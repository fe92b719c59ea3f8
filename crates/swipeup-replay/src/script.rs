#![forbid(unsafe_code)]

//! Gesture scripts.
//!
//! A script is JSON Lines: one step object per line, tagged by `step`.
//! Blank lines and lines starting with `#` are skipped. A `tick` may span at
//! most [`MAX_TICK_MS`] and pointer timestamps may not exceed
//! [`MAX_TIMESTAMP_MS`].
//!
//! ```text
//! # flick the panel open
//! {"step": "down", "x": 200, "y": 700, "t_ms": 0}
//! {"step": "move", "x": 200, "y": 600, "t_ms": 16}
//! {"step": "up", "t_ms": 40}
//! {"step": "tick", "ms": 300}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReplayError, Result};

/// Longest single `tick` step.
pub const MAX_TICK_MS: u64 = 600_000;

/// Latest pointer timestamp a script may use.
pub const MAX_TIMESTAMP_MS: u64 = 3_600_000;

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Pointer pressed at `(x, y)`.
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        t_ms: Option<u64>,
    },
    /// Pointer moved to `(x, y)`.
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        t_ms: Option<u64>,
    },
    /// Pointer lifted at its last position.
    Up {
        #[serde(default)]
        t_ms: Option<u64>,
    },
    /// Another claimant requests the gesture.
    Preempt,
    /// The platform cancels the gesture.
    Cancel,
    /// Advance the animation clock.
    Tick { ms: u64 },
    /// Programmatic open.
    Open,
    /// Programmatic close.
    Close,
    /// Lock drag-to-close.
    Lock,
    /// Unlock drag-to-close.
    Unlock,
    /// Toggle the open path.
    SetCanSwipeUp { enabled: bool },
}

impl Step {
    /// Short label for trace records.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Down { .. } => "down",
            Self::Move { .. } => "move",
            Self::Up { .. } => "up",
            Self::Preempt => "preempt",
            Self::Cancel => "cancel",
            Self::Tick { .. } => "tick",
            Self::Open => "open",
            Self::Close => "close",
            Self::Lock => "lock",
            Self::Unlock => "unlock",
            Self::SetCanSwipeUp { .. } => "set_can_swipe_up",
        }
    }

    fn timestamp(&self) -> Option<u64> {
        match self {
            Self::Down { t_ms, .. } | Self::Move { t_ms, .. } | Self::Up { t_ms } => *t_ms,
            _ => None,
        }
    }

    /// Check the step's time values against the script limits.
    pub fn check_limits(&self) -> std::result::Result<(), String> {
        match *self {
            Self::Tick { ms } if ms > MAX_TICK_MS => {
                Err(format!("tick of {ms}ms exceeds the {MAX_TICK_MS}ms limit"))
            }
            _ => match self.timestamp() {
                Some(t) if t > MAX_TIMESTAMP_MS => Err(format!(
                    "timestamp {t}ms exceeds the {MAX_TIMESTAMP_MS}ms limit"
                )),
                _ => Ok(()),
            },
        }
    }
}

/// A parsed script; each step remembers its source line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    steps: Vec<(usize, Step)>,
}

impl Script {
    /// Parse JSON Lines text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut steps = Vec::new();
        let mut pressed = false;
        let mut last_t: Option<u64> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let step: Step = serde_json::from_str(trimmed)
                .map_err(|e| ReplayError::invalid_script(line, e.to_string()))?;
            step.check_limits()
                .map_err(|message| ReplayError::invalid_script(line, message))?;

            match &step {
                Step::Down { .. } => pressed = true,
                Step::Move { .. } | Step::Up { .. } if !pressed => {
                    return Err(ReplayError::invalid_script(
                        line,
                        format!("`{}` before `down`", step.label()),
                    ));
                }
                Step::Up { .. } => pressed = false,
                _ => {}
            }
            if let Some(t) = step.timestamp() {
                if last_t.is_some_and(|prev| t < prev) {
                    return Err(ReplayError::invalid_script(
                        line,
                        format!("timestamp {t}ms goes backwards"),
                    ));
                }
                last_t = Some(t);
            }
            steps.push((line, step));
        }

        Ok(Self { steps })
    }

    /// Read and parse a script file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReplayError::MissingPath {
                path: path.to_path_buf(),
            });
        }
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Steps with their source lines.
    pub fn steps(&self) -> impl Iterator<Item = (usize, &Step)> {
        self.steps.iter().map(|(line, step)| (*line, step))
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the script has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_steps_and_skips_comments() {
        let script = Script::parse(
            "# open it\n\
             {\"step\": \"down\", \"x\": 1, \"y\": 700, \"t_ms\": 0}\n\
             \n\
             {\"step\": \"move\", \"x\": 1, \"y\": 500}\n\
             {\"step\": \"up\", \"t_ms\": 40}\n\
             {\"step\": \"tick\", \"ms\": 250}\n\
             {\"step\": \"set_can_swipe_up\", \"enabled\": false}\n",
        )
        .unwrap();
        assert_eq!(script.len(), 5);
        let lines: Vec<usize> = script.steps().map(|(line, _)| line).collect();
        assert_eq!(lines, [2, 4, 5, 6, 7]);
        assert_eq!(
            script.steps().nth(1).map(|(_, s)| s.clone()),
            Some(Step::Move {
                x: 1.0,
                y: 500.0,
                t_ms: None
            })
        );
    }

    #[test]
    fn unknown_step_reports_line() {
        let err = Script::parse("{\"step\": \"open\"}\n{\"step\": \"wiggle\"}\n").unwrap_err();
        assert!(matches!(err, ReplayError::InvalidScript { line: 2, .. }), "{err}");
    }

    #[test]
    fn move_before_down_is_rejected() {
        let err = Script::parse("{\"step\": \"move\", \"x\": 0, \"y\": 0}").unwrap_err();
        assert_eq!(err.to_string(), "invalid script at line 1: `move` before `down`");
    }

    #[test]
    fn backwards_timestamps_are_rejected() {
        let err = Script::parse(
            "{\"step\": \"down\", \"x\": 0, \"y\": 0, \"t_ms\": 50}\n\
             {\"step\": \"up\", \"t_ms\": 10}",
        )
        .unwrap_err();
        assert!(matches!(err, ReplayError::InvalidScript { line: 2, .. }));
    }

    #[test]
    fn oversized_tick_is_rejected_with_its_line() {
        let err = Script::parse(
            "{\"step\": \"open\"}\n{\"step\": \"tick\", \"ms\": 18446744073709551615}",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid script at line 2: tick of 18446744073709551615ms exceeds the 600000ms limit"
        );
        assert_eq!(err.exit_code(), 2);
        assert!(Script::parse(&format!("{{\"step\": \"tick\", \"ms\": {MAX_TICK_MS}}}")).is_ok());
    }

    #[test]
    fn far_future_timestamp_is_rejected() {
        let err = Script::parse(&format!(
            "{{\"step\": \"down\", \"x\": 0, \"y\": 0, \"t_ms\": {}}}",
            u64::MAX
        ))
        .unwrap_err();
        assert!(matches!(err, ReplayError::InvalidScript { line: 1, .. }), "{err}");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Script::from_file(Path::new("/no/such/script.jsonl")).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
