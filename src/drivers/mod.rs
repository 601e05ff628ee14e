//! Scene drivers
//!
//! Each driver walks the selected scenes in name order and invokes one
//! external tool per scene. The first failure aborts the run.

pub mod layout;
pub mod screenshot;

use std::path::{Path, PathBuf};

use crate::common::config::Config;
use crate::process::CommandRunner;

/// Everything a driver needs besides its own options
pub struct DriverContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub repo_root: PathBuf,
    pub config: &'a Config,
}

impl<'a> DriverContext<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        repo_root: impl Into<PathBuf>,
        config: &'a Config,
    ) -> Self {
        Self {
            runner,
            repo_root: repo_root.into(),
            config,
        }
    }

    /// Resolve a repo-relative path
    pub fn repo_path(&self, path: impl AsRef<Path>) -> PathBuf {
        crate::process::resolve(&self.repo_root, path.as_ref())
    }
}

/// Outcome of a completed run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Scenes processed, in order
    pub processed: Vec<String>,
    /// Scenes whose baseline was (re)generated
    pub updated: Vec<String>,
}
