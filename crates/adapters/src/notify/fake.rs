// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notification sink for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::NotifySink;
use parking_lot::Mutex;
use pz_core::Notification;
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Default)]
struct FakeSinkState {
    notifications: Mutex<Vec<Notification>>,
    changed: Notify,
}

/// Fake sink that records every notification it receives
#[derive(Clone, Default)]
pub struct FakeSink {
    inner: Arc<FakeSinkState>,
}

impl FakeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded notifications, in delivery order
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.notifications.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.notifications.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait until at least `n` notifications have been recorded.
    pub async fn wait_for(&self, n: usize) -> Vec<Notification> {
        loop {
            let notified = self.inner.changed.notified();
            if self.len() >= n {
                return self.notifications();
            }
            notified.await;
        }
    }
}

impl NotifySink for FakeSink {
    fn notify(&self, notification: Notification) {
        self.inner.notifications.lock().push(notification);
        self.inner.changed.notify_waiters();
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
