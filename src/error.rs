//! Run-level errors and their exit codes.

use std::io;
use std::path::PathBuf;

use crate::config::ConfigError;
use crate::merge::ConflictError;

/// Exit code for a version conflict.
pub const EXIT_CONFLICT: i32 = 1;

/// Exit code for input/output failures.
pub const EXIT_IO: i32 = 2;

/// Exit code for configuration failures.
pub const EXIT_CONFIG: i32 = 3;

/// Anything that aborts a fuse run. Nothing is written once one occurs.
#[derive(Debug, thiserror::Error)]
pub enum FuseError {
    #[error("no input files given")]
    NoInputs,

    #[error("input file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("output file '{}' already exists. use -w --overwrite to bypass", .0.display())]
    OutputExists(PathBuf),

    #[error("cannot {action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    /// Conflict rendered with input paths.
    #[error("{message}")]
    Conflict {
        message: String,
        #[source]
        conflict: ConflictError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot serialize merge report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Result type for fuse operations
pub type FuseResult<T> = Result<T, FuseError>;

impl FuseError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Conflict { .. } => EXIT_CONFLICT,
            Self::Config(_) => EXIT_CONFIG,
            Self::NoInputs
            | Self::InputNotFound(_)
            | Self::OutputExists(_)
            | Self::Io { .. }
            | Self::Report(_) => EXIT_IO,
        }
    }
}
