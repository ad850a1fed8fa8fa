// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-tree termination
//!
//! The engine may spawn helpers of its own, so termination always targets
//! the whole tree. The platform strategy lives entirely behind
//! [`ProcessTerminator`].

mod system;

pub use system::{process_exists, SystemTerminator};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTerminator;

use crate::launcher::WorkerProcess;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// How a termination request concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminateOutcome {
    /// Exited within the grace period after a polite signal
    Graceful,
    /// Needed the unconditional kill
    Forced,
    /// Leader was already gone; only leftover group members were killed
    AlreadyExited,
}

impl fmt::Display for TerminateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TerminateOutcome::Graceful => "graceful",
            TerminateOutcome::Forced => "forced",
            TerminateOutcome::AlreadyExited => "already exited",
        })
    }
}

/// Terminates a worker and every descendant in its process group
#[async_trait]
pub trait ProcessTerminator: Clone + Send + Sync + 'static {
    /// Signal the tree, escalating to a kill once `grace` has passed.
    ///
    /// The group is killed even when its leader has already exited.
    async fn terminate_tree(&self, process: &WorkerProcess, grace: Duration) -> TerminateOutcome;
}
