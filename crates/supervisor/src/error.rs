// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor, relay and bridge errors.

use pz_adapters::{ExitInfo, FetchError, LaunchError, ResolutionError, SubmitError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a start attempt failed.
///
/// `Clone` so one outcome can be handed to every caller sharing the attempt.
#[derive(Debug, Clone, Error)]
pub enum StartError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Launch(Arc<LaunchError>),
    #[error(
        "engine did not become healthy on port {port} within {}ms (logs: {}){}",
        timeout.as_millis(),
        log_dir.display(),
        detail(startup_error)
    )]
    HealthTimeout {
        port: u16,
        timeout: Duration,
        log_dir: PathBuf,
        startup_error: Option<String>,
    },
    #[error(
        "engine exited during startup ({status}) (logs: {}){}",
        log_dir.display(),
        detail(startup_error)
    )]
    Exited {
        status: ExitInfo,
        log_dir: PathBuf,
        startup_error: Option<String>,
    },
    #[error("engine start aborted by shutdown")]
    Aborted,
}

fn detail(startup_error: &Option<String>) -> String {
    match startup_error {
        Some(error) => format!(":\n{error}"),
        None => String::new(),
    }
}

impl From<LaunchError> for StartError {
    fn from(e: LaunchError) -> Self {
        StartError::Launch(Arc::new(e))
    }
}

impl StartError {
    /// Error lines the engine logged during this start, if any
    pub fn startup_error(&self) -> Option<&str> {
        match self {
            StartError::HealthTimeout { startup_error, .. }
            | StartError::Exited { startup_error, .. } => startup_error.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("engine is not running")]
    NotReady,
    #[error("relay is closed")]
    Closed,
}

/// Failures of the ensure-ready, submit, attach sequence
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Start(#[from] StartError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Relay(#[from] RelayError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
