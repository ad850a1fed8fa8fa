// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op notification sink.

use super::NotifySink;
use pz_core::Notification;

/// Sink that silently discards all notifications.
///
/// Used when the caller only cares about the final result.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpSink;

impl NoOpSink {
    pub fn new() -> Self {
        Self
    }
}

impl NotifySink for NoOpSink {
    fn notify(&self, _notification: Notification) {}
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
