//! scene-tools - orchestration for the layout dump and native runner tools
//!
//! This library loads scene definitions, builds the external executables on
//! demand and drives them scene by scene, failing fast on the first error.

pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod common;
pub mod drivers;
pub mod process;
pub mod scenes;

// Re-export commonly used types for tests
pub use common::{Error, ErrorCategory, Result};
pub use process::{CommandRunner, Invocation, ProcessRunner, RecordingRunner};
pub use scenes::{SceneConfig, SceneRegistry, Selection};
