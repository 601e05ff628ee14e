//! Recording command runner
//!
//! Stands in for [`ProcessRunner`](super::ProcessRunner) when driver logic is
//! exercised without the external tools. Each invocation is recorded and
//! answered by a responder closure, which may also create files to imitate
//! the tool's output.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{CommandRunner, Invocation, RunStatus};
use crate::common::Result;

type Responder = dyn Fn(&Invocation) -> i32 + Send + Sync;

pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    responder: Box<Responder>,
}

impl RecordingRunner {
    /// Runner that answers every invocation with exit code 0
    pub fn succeeding() -> Self {
        Self::with_responder(|_| 0)
    }

    /// Runner whose exit codes (and side effects) come from `responder`
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&Invocation) -> i32 + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    /// Invocations seen so far, in order
    pub fn calls(&self) -> Vec<Invocation> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Invocation>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for RecordingRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingRunner")
            .field("calls", &*self.lock())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<RunStatus> {
        self.lock().push(invocation.clone());
        Ok(RunStatus::exited((self.responder)(invocation)))
    }
}
