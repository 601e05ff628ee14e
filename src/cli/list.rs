//! Scene listing

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::common::config::Config;
use crate::common::Result;
use crate::drivers::{layout, screenshot};
use crate::scenes::SceneRegistry;

/// A scene with every setting resolved the way the drivers resolve it
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SceneListing {
    pub name: String,
    pub baseline: String,
    pub baseline_exists: bool,
    pub lua_entry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_module: Option<String>,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_height: Option<u32>,
    pub screenshot: String,
}

/// Resolve every well-formed scene; malformed entries are skipped with a warning
pub fn scene_listings(
    repo_root: &Path,
    config: &Config,
    registry: &SceneRegistry,
) -> Vec<SceneListing> {
    registry
        .iter()
        .filter_map(|(name, scene)| match scene {
            Ok(scene) => Some((name, scene)),
            Err(e) => {
                tracing::warn!(scene = name, "Skipping scene: {}", e);
                None
            }
        })
        .map(|(name, scene)| {
            let baseline =
                layout::baseline_path(repo_root, &config.layout_dump.snapshots_dir, name, scene);
            SceneListing {
                name: name.to_string(),
                baseline_exists: baseline.exists(),
                baseline: baseline.display().to_string(),
                lua_entry: scene.lua_entry().to_string(),
                app_module: scene.app_module.clone(),
                width: scene.width(),
                height: scene.height(),
                pixel_width: scene.pixel_width,
                pixel_height: scene.pixel_height,
                screenshot: screenshot::screenshot_out(&config.screenshot.artifacts_dir, name)
                    .display()
                    .to_string(),
            }
        })
        .collect()
}

pub fn print_listings(listings: &[SceneListing], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(listings)?);
        return Ok(());
    }

    if listings.is_empty() {
        println!("No scenes defined");
        return Ok(());
    }

    for scene in listings {
        let marker = if scene.baseline_exists {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("{}", scene.name.white().bold());
        println!("  baseline:  {} {}", marker, scene.baseline.dimmed());
        match &scene.app_module {
            Some(app) => println!("  entry:     {} ({})", scene.lua_entry, app),
            None => println!("  entry:     {}", scene.lua_entry),
        }
        print!("  size:      {}x{}", scene.width, scene.height);
        if scene.pixel_width.is_some() || scene.pixel_height.is_some() {
            let dim = |v: Option<u32>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
            print!(" (pixels {}x{})", dim(scene.pixel_width), dim(scene.pixel_height));
        }
        println!();
    }

    Ok(())
}
