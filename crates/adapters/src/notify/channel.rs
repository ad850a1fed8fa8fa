// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel-backed notification sink.

use super::NotifySink;
use pz_core::Notification;
use tokio::sync::mpsc;

/// Forwards notifications into an unbounded channel.
///
/// Once the receiver is gone notifications are discarded with a debug log.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }

    /// Create a sink along with the receiving half.
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl NotifySink for ChannelSink {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.tx.send(notification) {
            tracing::debug!(job_id = ?e.0.job_id(), "notification receiver closed, dropping");
        }
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
