//! Screenshot driver
//!
//! Runs the native runner once per selected scene in automatic screenshot
//! mode and checks that each screenshot actually landed on disk.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::{DriverContext, RunSummary};
use crate::bootstrap::ensure_executable;
use crate::common::{Error, Result};
use crate::process::{run_checked, Invocation};
use crate::scenes::{SceneConfig, SceneRegistry, Selection};

/// Options for a screenshot run
#[derive(Debug, Clone)]
pub struct ScreenshotOptions {
    /// Scenes file, relative to the repo root
    pub scenes_arg: String,
    pub selection: Selection,
}

/// Screenshot path for a scene, relative to the repo root
pub fn screenshot_out(artifacts_dir: &Path, name: &str) -> PathBuf {
    artifacts_dir.join(format!("{}.png", name))
}

/// Command line for one screenshot capture
pub fn runner_invocation(
    exe: &Path,
    repo_root: &Path,
    scene: &SceneConfig,
    screenshot_out: &Path,
) -> Invocation {
    let mut invocation = Invocation::new(exe, repo_root).args(["--lua-entry", scene.lua_entry()]);
    if let Some(app_module) = &scene.app_module {
        invocation = invocation.args(["--app-module", app_module.as_str()]);
    }
    invocation = invocation
        .args(["--width".to_string(), scene.width().to_string()])
        .args(["--height".to_string(), scene.height().to_string()])
        .arg("--screenshot-auto")
        .args([
            "--screenshot-out".to_string(),
            screenshot_out.display().to_string(),
        ]);
    if let Some(pixel_width) = scene.pixel_width {
        invocation = invocation.args(["--pixel-width".to_string(), pixel_width.to_string()]);
    }
    if let Some(pixel_height) = scene.pixel_height {
        invocation = invocation.args(["--pixel-height".to_string(), pixel_height.to_string()]);
    }
    invocation
}

/// Capture a screenshot for every selected scene
pub async fn run(ctx: &DriverContext<'_>, opts: &ScreenshotOptions) -> Result<RunSummary> {
    let registry = SceneRegistry::load(&ctx.repo_path(&opts.scenes_arg))?;

    let exe = ctx.repo_path(&ctx.config.screenshot.exe);
    ensure_executable(ctx.runner, &ctx.repo_root, &exe, &ctx.config.build_command).await?;

    let selected = registry.select(&opts.selection);
    tracing::info!(scenes = selected.len(), "Capturing screenshots");

    let mut summary = RunSummary::default();
    for (name, scene) in selected {
        let scene = scene?;
        let out = screenshot_out(&ctx.config.screenshot.artifacts_dir, name);
        println!(
            "{} {} ({})",
            "▶".cyan(),
            name.white().bold(),
            out.display().to_string().dimmed()
        );

        let invocation = runner_invocation(&exe, &ctx.repo_root, scene, &out);
        run_checked(ctx.runner, &invocation).await?;

        // A zero exit without the file is still a failed capture
        let produced = ctx.repo_path(&out);
        if !produced.exists() {
            return Err(Error::output_missing("screenshot", out));
        }

        println!("  {} {}", "✓".green(), name);
        summary.processed.push(name.to_string());
    }

    Ok(summary)
}
