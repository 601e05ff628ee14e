//! scene-tools - drive the layout dump and native runner tools over scenes
//!
//! Regenerates or checks layout baselines and captures screenshots for the
//! scenes listed in a JSON scenes file.

use clap::Parser;
use scene_tools::commands::{Commands, GlobalArgs};
use scene_tools::common::logging;
use scene_tools::{cli, Error};

#[derive(Parser)]
#[command(name = "scene-tools", about = "Layout dump and screenshot scene driver")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let guard = logging::init_cli(cli.global.verbose, cli.global.log_file.as_deref());

    let result = tokio::select! {
        result = cli::dispatch(cli.global, cli.command) => result,
        Ok(()) = tokio::signal::ctrl_c() => Err(Error::Interrupted),
    };

    if let Err(e) = result {
        tracing::debug!(category = ?e.category(), "Run aborted");
        if !matches!(e, Error::Interrupted) {
            eprintln!("Error: {e}");
        }
        drop(guard);
        std::process::exit(e.exit_code());
    }
}
