//! Executable bootstrapping
//!
//! Builds the external tools on demand when their binary is missing.

use std::path::Path;

use crate::common::{Error, Result};
use crate::process::{CommandRunner, Invocation};

/// Ensure `exe` exists, running the build command in `repo_root` if not
///
/// A failed build, or a build that does not produce `exe`, is fatal.
pub async fn ensure_executable(
    runner: &dyn CommandRunner,
    repo_root: &Path,
    exe: &Path,
    build_command: &[String],
) -> Result<()> {
    if exe.exists() {
        tracing::debug!(exe = %exe.display(), "Executable present");
        return Ok(());
    }

    let (program, args) = build_command
        .split_first()
        .ok_or_else(|| Error::Config("build_command must not be empty".to_string()))?;
    let command = build_command.join(" ");

    // Bare names are looked up on PATH up front for a clearer message
    if !program.contains(['/', '\\']) && which::which(program).is_err() {
        return Err(Error::build_failed(
            &command,
            format!("'{}' not found on PATH", program),
        ));
    }

    tracing::info!(exe = %exe.display(), "Executable missing, running '{}'", command);

    let invocation = Invocation::new(program, repo_root).args(args.iter().cloned());
    let status = runner
        .run(&invocation)
        .await
        .map_err(|e| Error::build_failed(&command, e.to_string()))?;
    if !status.success() {
        return Err(Error::build_failed(&command, status.to_string()));
    }

    if !exe.exists() {
        return Err(Error::BuildOutputMissing(exe.to_path_buf()));
    }

    tracing::info!(exe = %exe.display(), "Build finished");
    Ok(())
}
