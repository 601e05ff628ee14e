//! Repository and configuration paths
//!
//! All scene, baseline and artifact paths are resolved against the
//! repository root, which is also the working directory of every external
//! invocation.

use std::path::{Path, PathBuf};

/// Name used for the configuration directory
const APP_NAME: &str = "scene-tools";

/// File name of a repository-local configuration file
pub const REPO_CONFIG_FILE: &str = "scene-tools.toml";

/// Find the repository root
///
/// Walks up from `start` looking for a directory containing `marker` (the
/// build script). Falls back to `start` itself when no ancestor has it.
pub fn find_repo_root(start: &Path, marker: &str) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_file())
        .unwrap_or(start)
        .to_path_buf()
}

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/scene-tools/`
/// - macOS: `~/Library/Application Support/scene-tools/`
/// - Windows: `%APPDATA%\scene-tools\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the user configuration file
pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the repository-local configuration file
pub fn repo_config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(REPO_CONFIG_FILE)
}
