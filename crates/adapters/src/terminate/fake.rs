// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process terminator for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ProcessTerminator, TerminateOutcome};
use crate::launcher::{ExitInfo, FakeLauncher, WorkerProcess};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct FakeTerminatorState {
    calls: Vec<u32>,
    launcher: Option<FakeLauncher>,
    ignore_term: bool,
}

/// Records termination requests; exits fake processes when linked to a launcher
#[derive(Clone)]
pub struct FakeTerminator {
    inner: Arc<Mutex<FakeTerminatorState>>,
}

impl Default for FakeTerminator {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeTerminatorState {
                calls: Vec::new(),
                launcher: None,
                ignore_term: false,
            })),
        }
    }
}

impl FakeTerminator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_launcher(self, launcher: FakeLauncher) -> Self {
        self.inner.lock().launcher = Some(launcher);
        self
    }

    /// Simulate a worker that only dies to the forced kill.
    pub fn set_ignore_term(&self, ignore: bool) {
        self.inner.lock().ignore_term = ignore;
    }

    /// Pids whose groups were signalled, in order, exited leaders included
    pub fn calls(&self) -> Vec<u32> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl ProcessTerminator for FakeTerminator {
    async fn terminate_tree(&self, process: &WorkerProcess, grace: Duration) -> TerminateOutcome {
        let (launcher, ignore_term) = {
            let mut state = self.inner.lock();
            state.calls.push(process.pid());
            (state.launcher.clone(), state.ignore_term)
        };
        if process.has_exited() {
            return TerminateOutcome::AlreadyExited;
        }
        if ignore_term {
            tokio::time::sleep(grace).await;
        }
        if let Some(launcher) = launcher {
            launcher.exit(process.pid(), ExitInfo::signalled());
        }
        if ignore_term {
            TerminateOutcome::Forced
        } else {
            TerminateOutcome::Graceful
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
