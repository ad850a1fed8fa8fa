// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Short-lived helper commands (`--version` checks, `kill`, `tasklist`).

use std::process::Output;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Bound on an interpreter `--version` check during command resolution.
pub const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Bound on a single `kill` / `taskkill` invocation.
pub const SIGNAL_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("{description} could not run: {source}")]
    Spawn {
        description: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{description} timed out after {}ms", timeout.as_millis())]
    TimedOut {
        description: String,
        timeout: Duration,
    },
}

/// Collect a helper's output, killing it if `timeout` passes first.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, SubprocessError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(result) => result.map_err(|source| SubprocessError::Spawn {
            description: description.to_string(),
            source,
        }),
        Err(_) => Err(SubprocessError::TimedOut {
            description: description.to_string(),
            timeout,
        }),
    }
}

/// Whether the helper ran and exited zero.
pub async fn succeeds(cmd: Command, timeout: Duration, description: &str) -> bool {
    match run_with_timeout(cmd, timeout, description).await {
        Ok(output) => output.status.success(),
        Err(e) => {
            tracing::debug!(error = %e, "helper command failed");
            false
        }
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
