//! External command execution
//!
//! Drivers never spawn processes directly: they hand an [`Invocation`] to a
//! [`CommandRunner`]. [`ProcessRunner`] runs it for real; [`RecordingRunner`]
//! records it and answers with a scripted exit code.

mod recording;

pub use recording::RecordingRunner;

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::common::{Error, Result};

/// A single external command: program, arguments and working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Whether `flag` appears among the arguments
    pub fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    /// Value following `flag`, if present
    pub fn arg_value(&self, flag: &str) -> Option<&str> {
        let pos = self.args.iter().position(|a| a == flag)?;
        self.args.get(pos + 1).map(String::as_str)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How an external command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "termination by signal"),
        }
    }
}

/// Capability to run an external command to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the invocation, waiting for it to exit
    ///
    /// Only failure to start the process is an error; a non-zero exit is
    /// reported through the returned status.
    async fn run(&self, invocation: &Invocation) -> Result<RunStatus>;
}

/// Run an invocation and turn a non-zero exit into [`Error::SubprocessFailed`]
pub async fn run_checked(runner: &dyn CommandRunner, invocation: &Invocation) -> Result<()> {
    let status = runner.run(invocation).await?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::SubprocessFailed {
            command: invocation.to_string(),
            status: status.to_string(),
        })
    }
}

/// Runs commands as child processes sharing this process's stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<RunStatus> {
        tracing::debug!(cwd = %invocation.cwd.display(), "Running {}", invocation);

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            // An interrupted run must not leave the child behind
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| Error::SpawnFailed {
                program: invocation.program.display().to_string(),
                error: e.to_string(),
            })?;

        Ok(RunStatus {
            code: status.code(),
        })
    }
}

/// Resolve `path` against `root` unless it is already absolute
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
