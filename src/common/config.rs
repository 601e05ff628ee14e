//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::{repo_config_path, user_config_path};
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Command that builds the external executables, run from the repo root
    pub build_command: Vec<String>,

    /// Default scenes file, relative to the repo root
    pub scenes: String,

    /// Layout dump settings
    pub layout_dump: LayoutDumpConfig,

    /// Screenshot settings
    pub screenshot: ScreenshotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build_command: vec!["sh".to_string(), "zig_build_simple.sh".to_string()],
            scenes: "tools/layoutdump_scenes.json".to_string(),
            layout_dump: LayoutDumpConfig::default(),
            screenshot: ScreenshotConfig::default(),
        }
    }
}

/// Layout dump driver settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LayoutDumpConfig {
    /// Path to the layout dump executable, relative to the repo root
    pub exe: PathBuf,

    /// Directory holding conventional baselines
    pub snapshots_dir: PathBuf,

    /// Scenes selected when neither `--only` nor `--all` is given
    pub default_prefix: String,
}

impl Default for LayoutDumpConfig {
    fn default() -> Self {
        Self {
            exe: PathBuf::from("zig-out/bin/luau-layout-dump.exe"),
            snapshots_dir: PathBuf::from("snapshots"),
            default_prefix: "docs_".to_string(),
        }
    }
}

/// Screenshot driver settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScreenshotConfig {
    /// Path to the native runner executable, relative to the repo root
    pub exe: PathBuf,

    /// Directory the runner writes `<scene>.png` into
    pub artifacts_dir: PathBuf,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            exe: PathBuf::from("zig-out/bin/luau-native-runner.exe"),
            artifacts_dir: PathBuf::from("artifacts"),
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Otherwise the repo-local file is tried,
    /// then the user config file, and defaults are returned if neither exists.
    pub fn load(explicit: Option<&Path>, repo_root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let candidates = std::iter::once(repo_config_path(repo_root)).chain(user_config_path());
        for path in candidates {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "Loading configuration");
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            Error::ConfigParse(format!("{}: {}", path.display(), describe_toml_error(&content, &e)))
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.build_command.is_empty() {
            return Err(Error::Config("build_command must not be empty".to_string()));
        }
        Ok(())
    }

    /// Build script name used to locate the repo root
    ///
    /// This is the last element of the build command, e.g. `zig_build_simple.sh`.
    pub fn build_marker(&self) -> &str {
        self.build_command
            .last()
            .map(String::as_str)
            .unwrap_or("zig_build_simple.sh")
    }
}

/// One-line rendering of a TOML error: message plus line and column
///
/// `toml::de::Error`'s `Display` draws a multi-line source snippet.
fn describe_toml_error(content: &str, error: &toml::de::Error) -> String {
    let message = error.message().lines().collect::<Vec<_>>().join("; ");
    let Some(before) = error.span().and_then(|span| content.get(..span.start)) else {
        return message;
    };
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    format!("{message} at line {line}, column {column}")
}
