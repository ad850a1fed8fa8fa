// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification sinks
//!
//! The relay pushes progress, completion and error notices through a
//! [`NotifySink`]. Delivery is synchronous and infallible from the
//! caller's point of view so that ordering per job is preserved.

mod channel;
mod noop;

pub use channel::ChannelSink;
pub use noop::NoOpSink;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSink;

use pz_core::Notification;

/// Destination for client-facing notifications
pub trait NotifySink: Clone + Send + Sync + 'static {
    /// Deliver a notification. Sinks that can no longer deliver drop it.
    fn notify(&self, notification: Notification);
}
