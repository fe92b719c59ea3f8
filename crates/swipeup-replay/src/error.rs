#![forbid(unsafe_code)]

use std::path::PathBuf;

use swipeup_panel::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplayError>;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid script at line {line}: {message}")]
    InvalidScript { line: usize, message: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("required path does not exist: {path}")]
    MissingPath { path: PathBuf },

    #[error("panel did not settle within {limit_ms}ms")]
    Unsettled { limit_ms: u64 },
}

impl ReplayError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidScript { .. } | Self::InvalidArgument { .. } => 2,
            Self::Config(_) => 3,
            Self::MissingPath { .. } => 4,
            Self::Unsettled { .. } => 5,
            Self::Io(_) | Self::Json(_) => 1,
        }
    }

    #[must_use]
    pub fn invalid_script(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidScript {
            line,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
