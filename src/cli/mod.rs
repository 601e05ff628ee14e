//! CLI command handling
//!
//! Resolves the repository root and configuration, then dispatches to the
//! drivers and prints their summaries.

mod list;

pub use list::{scene_listings, SceneListing};

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::commands::{Commands, GlobalArgs};
use crate::common::config::Config;
use crate::common::paths::find_repo_root;
use crate::common::Result;
use crate::drivers::layout::{self, BaselineMode, LayoutDumpOptions};
use crate::drivers::screenshot::{self, ScreenshotOptions};
use crate::drivers::{DriverContext, RunSummary};
use crate::process::{CommandRunner, ProcessRunner};
use crate::scenes::{SceneRegistry, Selection};

/// Dispatch a CLI command using real child processes
pub async fn dispatch(global: GlobalArgs, command: Commands) -> Result<()> {
    dispatch_with(&ProcessRunner, global, command).await
}

/// Dispatch a CLI command through the given runner
pub async fn dispatch_with(
    runner: &dyn CommandRunner,
    global: GlobalArgs,
    command: Commands,
) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let (config, repo_root) = resolve_setup(&global, &cwd)?;
    tracing::debug!(repo_root = %repo_root.display(), "Resolved repository root");

    let ctx = DriverContext::new(runner, repo_root, &config);

    match command {
        Commands::LayoutDump {
            scenes,
            all,
            only,
            init_baselines,
            update_baselines,
        } => {
            let opts = LayoutDumpOptions {
                scenes_arg: scenes.unwrap_or_else(|| config.scenes.clone()),
                selection: Selection::for_layout(only, all, &config.layout_dump.default_prefix),
                mode: BaselineMode::from_flags(init_baselines, update_baselines),
            };
            let summary = layout::run(&ctx, &opts).await?;
            print_summary("layout dump", &summary);
            Ok(())
        }

        Commands::Screenshot { scenes, only } => {
            let opts = ScreenshotOptions {
                scenes_arg: scenes.unwrap_or_else(|| config.scenes.clone()),
                selection: Selection::for_screenshot(only),
            };
            let summary = screenshot::run(&ctx, &opts).await?;
            print_summary("screenshot", &summary);
            Ok(())
        }

        Commands::List { scenes, json } => {
            let scenes_arg = scenes.unwrap_or_else(|| config.scenes.clone());
            let registry = SceneRegistry::load(&ctx.repo_path(&scenes_arg))?;
            let listings = scene_listings(&ctx.repo_root, &config, &registry);
            list::print_listings(&listings, json)
        }
    }
}

/// Load the configuration and locate the repository root
///
/// An explicit `--config` decides which build script marks the root;
/// otherwise the root is found first and its local config file loaded.
fn resolve_setup(global: &GlobalArgs, cwd: &Path) -> Result<(Config, PathBuf)> {
    let explicit = global
        .config
        .as_deref()
        .map(|path| Config::from_file(&cwd.join(path)))
        .transpose()?;

    let repo_root = match &global.repo_root {
        Some(root) => cwd.join(root),
        None => {
            let marker = explicit
                .as_ref()
                .map(|c| c.build_marker().to_string())
                .unwrap_or_else(|| Config::default().build_marker().to_string());
            find_repo_root(cwd, &marker)
        }
    };

    let config = match explicit {
        Some(config) => config,
        None => Config::load(None, &repo_root)?,
    };

    Ok((config, repo_root))
}

fn print_summary(what: &str, summary: &RunSummary) {
    if summary.processed.is_empty() {
        println!("{} No scenes selected", "!".yellow().bold());
        return;
    }

    let mut line = format!(
        "{} {} finished: {} scene(s)",
        "✓".green().bold(),
        what,
        summary.processed.len()
    );
    if !summary.updated.is_empty() {
        line.push_str(&format!(", {} baseline(s) written", summary.updated.len()));
    }
    println!("{}", line);
}
