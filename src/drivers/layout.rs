//! Layout dump driver
//!
//! Runs the layout dump tool once per selected scene, asking it to rewrite
//! the baseline when the baseline mode calls for it.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::{DriverContext, RunSummary};
use crate::bootstrap::ensure_executable;
use crate::common::Result;
use crate::process::{run_checked, Invocation};
use crate::scenes::{SceneConfig, SceneRegistry, Selection};

/// When baselines get rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaselineMode {
    /// Compare against existing baselines only
    #[default]
    Verify,
    /// Create baselines that do not exist yet, leave the rest alone
    InitMissing,
    /// Rewrite every baseline
    UpdateAll,
}

impl BaselineMode {
    /// Mode from the `--init-baselines` / `--update-baselines` flags
    pub fn from_flags(init: bool, update: bool) -> Self {
        if update {
            BaselineMode::UpdateAll
        } else if init {
            BaselineMode::InitMissing
        } else {
            BaselineMode::Verify
        }
    }

    pub fn should_update(self, baseline_exists: bool) -> bool {
        match self {
            BaselineMode::UpdateAll => true,
            BaselineMode::InitMissing => !baseline_exists,
            BaselineMode::Verify => false,
        }
    }
}

/// Options for a layout dump run
#[derive(Debug, Clone)]
pub struct LayoutDumpOptions {
    /// Scenes file as given on the command line, relative to the repo root
    pub scenes_arg: String,
    pub selection: Selection,
    pub mode: BaselineMode,
}

/// Baseline file for a scene
///
/// The scene's own `baseline` wins; otherwise
/// `<snapshots_dir>/<name>.layout.json`. Both are relative to the repo root.
pub fn baseline_path(
    repo_root: &Path,
    snapshots_dir: &Path,
    name: &str,
    scene: &SceneConfig,
) -> PathBuf {
    match &scene.baseline {
        Some(baseline) => repo_root.join(baseline),
        None => repo_root
            .join(snapshots_dir)
            .join(format!("{}.layout.json", name)),
    }
}

/// Command line for one layout dump
pub fn layout_dump_invocation(
    exe: &Path,
    repo_root: &Path,
    scenes_arg: &str,
    name: &str,
    update_baseline: bool,
) -> Invocation {
    let invocation = Invocation::new(exe, repo_root).args(["--scenes", scenes_arg, name]);
    if update_baseline {
        invocation.arg("--update-baseline")
    } else {
        invocation
    }
}

/// Run the layout dump tool over the selected scenes
pub async fn run(ctx: &DriverContext<'_>, opts: &LayoutDumpOptions) -> Result<RunSummary> {
    let registry = SceneRegistry::load(&ctx.repo_path(&opts.scenes_arg))?;

    let exe = ctx.repo_path(&ctx.config.layout_dump.exe);
    ensure_executable(ctx.runner, &ctx.repo_root, &exe, &ctx.config.build_command).await?;

    let selected = registry.select(&opts.selection);
    tracing::info!(
        scenes = selected.len(),
        mode = ?opts.mode,
        "Running layout dump"
    );

    let mut summary = RunSummary::default();
    for (name, scene) in selected {
        let scene = scene?;
        let baseline = baseline_path(
            &ctx.repo_root,
            &ctx.config.layout_dump.snapshots_dir,
            name,
            scene,
        );
        let update = opts.mode.should_update(baseline.exists());
        tracing::debug!(scene = name, baseline = %baseline.display(), update, "Layout dump");

        let label = if update { "updating baseline" } else { "checking" };
        println!("{} {} ({})", "▶".cyan(), name.white().bold(), label.dimmed());

        let invocation =
            layout_dump_invocation(&exe, &ctx.repo_root, &opts.scenes_arg, name, update);
        run_checked(ctx.runner, &invocation).await?;

        println!("  {} {}", "✓".green(), name);
        summary.processed.push(name.to_string());
        if update {
            summary.updated.push(name.to_string());
        }
    }

    Ok(summary)
}
