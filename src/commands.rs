//! CLI command definitions
//!
//! Defines the clap commands for scene-tools.

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Repository root (default: nearest ancestor holding the build script)
    #[arg(long, global = true)]
    pub repo_root: Option<PathBuf>,

    /// Configuration file (default: <repo>/scene-tools.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the layout dump tool over scenes, checking or regenerating baselines
    #[command(name = "layout-dump", alias = "layout")]
    LayoutDump {
        /// Scenes file relative to the repo root (default: tools/layoutdump_scenes.json)
        #[arg(long)]
        scenes: Option<String>,

        /// Process every scene instead of only the docs_ scenes
        #[arg(long)]
        all: bool,

        /// Process only these scenes
        #[arg(long, num_args = 0..)]
        only: Option<Vec<String>>,

        /// Write baselines for scenes that do not have one yet
        #[arg(long)]
        init_baselines: bool,

        /// Rewrite every selected baseline
        #[arg(long)]
        update_baselines: bool,
    },

    /// Capture a screenshot of each scene with the native runner
    #[command(alias = "shots")]
    Screenshot {
        /// Scenes file relative to the repo root (default: tools/layoutdump_scenes.json)
        #[arg(long)]
        scenes: Option<String>,

        /// Capture only these scenes
        #[arg(long, num_args = 0..)]
        only: Option<Vec<String>>,
    },

    /// List scenes with their resolved settings
    #[command(alias = "ls")]
    List {
        /// Scenes file relative to the repo root (default: tools/layoutdump_scenes.json)
        #[arg(long)]
        scenes: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
