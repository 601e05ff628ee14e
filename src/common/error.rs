//! Error types for scene-tools
//!
//! Every error is fatal to the run. Messages are single-line so the top-level
//! handler can print them as-is on stderr.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for scene-tools
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("invalid scene config: {scene}: {reason}")]
    InvalidScene { scene: String, reason: String },

    // === Build Errors ===
    #[error("build command '{command}' failed: {reason}")]
    BuildFailed { command: String, reason: String },

    #[error("missing exe: {} (build finished without producing it)", .0.display())]
    BuildOutputMissing(PathBuf),

    // === Subprocess Errors ===
    #[error("failed to start '{program}': {error}")]
    SpawnFailed { program: String, error: String },

    #[error("command '{command}' exited with {status}")]
    SubprocessFailed { command: String, status: String },

    // === Postcondition Errors ===
    #[error("missing {what}: {}", .path.display())]
    OutputMissing { what: String, path: PathBuf },

    // === IO Errors ===
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    // === Interrupt ===
    #[error("interrupted")]
    Interrupted,
}

/// Coarse classification of an [`Error`], matching the failure classes a run
/// can abort with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Build,
    Subprocess,
    Postcondition,
    Io,
    Interrupted,
}

impl Error {
    /// Create an invalid scene error
    pub fn invalid_scene(scene: &str, reason: impl Into<String>) -> Self {
        Self::InvalidScene {
            scene: scene.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a build failed error
    pub fn build_failed(command: &str, reason: impl Into<String>) -> Self {
        Self::BuildFailed {
            command: command.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a missing output error
    pub fn output_missing(what: &str, path: impl Into<PathBuf>) -> Self {
        Self::OutputMissing {
            what: what.to_string(),
            path: path.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_)
            | Error::ConfigParse(_)
            | Error::InvalidScene { .. }
            | Error::FileRead { .. }
            | Error::Json(_) => ErrorCategory::Config,
            Error::BuildFailed { .. } | Error::BuildOutputMissing(_) => ErrorCategory::Build,
            Error::SpawnFailed { .. } | Error::SubprocessFailed { .. } => {
                ErrorCategory::Subprocess
            }
            Error::OutputMissing { .. } => ErrorCategory::Postcondition,
            Error::Io(_) => ErrorCategory::Io,
            Error::Interrupted => ErrorCategory::Interrupted,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Interrupted => 130,
            _ => 1,
        }
    }
}
