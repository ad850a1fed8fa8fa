// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Platform termination via the system `kill` / `taskkill` utilities.
//!
//! Unix: `SIGTERM` to the negated process group (falling back to the single
//! pid), then `SIGKILL` to whatever remains after the grace period. A group
//! whose leader already exited still gets `SIGKILL`.
//! Windows: `taskkill /T /F` immediately.

use super::{ProcessTerminator, TerminateOutcome};
use crate::launcher::WorkerProcess;
use crate::subprocess::{succeeds, SIGNAL_TIMEOUT};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

/// Terminator backed by OS process utilities
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTerminator;

impl SystemTerminator {
    pub fn new() -> Self {
        Self
    }

    /// Terminate a process known only by pid, as reported by `/health`.
    ///
    /// Without a monitor the exit is observed by polling.
    pub async fn terminate_pid(&self, pid: u32, grace: Duration) -> TerminateOutcome {
        if !process_exists(pid).await {
            return TerminateOutcome::AlreadyExited;
        }
        if cfg!(windows) {
            force_tree(pid).await;
            return TerminateOutcome::Forced;
        }
        signal_tree("-TERM", pid).await;
        let poll = async {
            while process_exists(pid).await {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        };
        if tokio::time::timeout(grace, poll).await.is_ok() {
            return TerminateOutcome::Graceful;
        }
        signal_tree("-KILL", pid).await;
        TerminateOutcome::Forced
    }
}

#[async_trait]
impl ProcessTerminator for SystemTerminator {
    async fn terminate_tree(&self, process: &WorkerProcess, grace: Duration) -> TerminateOutcome {
        let pid = process.pid();
        if process.has_exited() {
            if cfg!(unix) {
                kill_group("-KILL", pid).await;
            }
            return TerminateOutcome::AlreadyExited;
        }

        if cfg!(windows) {
            force_tree(pid).await;
            let _ = tokio::time::timeout(grace, process.wait_exit()).await;
            return TerminateOutcome::Forced;
        }

        signal_tree("-TERM", pid).await;
        if tokio::time::timeout(grace, process.wait_exit()).await.is_ok() {
            tracing::debug!(pid, "engine exited after SIGTERM");
            return TerminateOutcome::Graceful;
        }

        tracing::warn!(pid, grace_ms = grace.as_millis() as u64, "engine ignored SIGTERM, killing");
        signal_tree("-KILL", pid).await;
        TerminateOutcome::Forced
    }
}

/// Send `signal` to the process group led by `pid`, or to `pid` alone if
/// group targeting fails.
async fn signal_tree(signal: &str, pid: u32) -> bool {
    if kill_group(signal, pid).await {
        return true;
    }
    tracing::debug!(pid, signal, "process group signal failed, signalling pid");
    kill(&[signal, &pid.to_string()]).await
}

/// Signal only the group; a dead leader's pid is never signalled alone.
async fn kill_group(signal: &str, pid: u32) -> bool {
    let group = format!("-{pid}");
    kill(&[signal, "--", &group]).await
}

async fn kill(args: &[&str]) -> bool {
    let mut cmd = Command::new("kill");
    cmd.args(args);
    quiet(&mut cmd);
    succeeds(cmd, SIGNAL_TIMEOUT, "kill").await
}

async fn force_tree(pid: u32) -> bool {
    let mut cmd = Command::new("taskkill");
    cmd.args(["/PID", &pid.to_string(), "/T", "/F"]);
    quiet(&mut cmd);
    succeeds(cmd, SIGNAL_TIMEOUT, "taskkill").await
}

fn quiet(cmd: &mut Command) {
    cmd.stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null());
}

/// Check if a process with the given PID exists
pub async fn process_exists(pid: u32) -> bool {
    if cfg!(windows) {
        let mut cmd = Command::new("tasklist");
        cmd.args(["/FI", &format!("PID eq {pid}"), "/NH"]);
        return match crate::subprocess::run_with_timeout(cmd, SIGNAL_TIMEOUT, "tasklist").await {
            Ok(output) => String::from_utf8_lossy(&output.stdout).contains(&pid.to_string()),
            Err(_) => false,
        };
    }
    kill(&["-0", &pid.to_string()]).await
}

#[cfg(test)]
#[path = "system_tests.rs"]
mod tests;
