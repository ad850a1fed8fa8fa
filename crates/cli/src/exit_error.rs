// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors that carry a specific process exit code.

use thiserror::Error;

/// The job ran but did not produce a result
pub const JOB_FAILED: i32 = 2;
/// Interrupted by Ctrl+C
pub const INTERRUPTED: i32 = 130;

/// Exit with `code`, printing `message` unless it is empty.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
