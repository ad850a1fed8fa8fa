// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker health probing
//!
//! A probe is a single bounded-time `GET /health`. Every failure mode
//! (connection refused, timeout, bad status, malformed body) collapses to
//! "unhealthy"; probes never error outward.

mod http;

pub use http::{HttpHealthProbe, DEFAULT_PROBE_TIMEOUT};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeHealthProbe;

use async_trait::async_trait;
use pz_core::HealthReport;
use std::time::Duration;
use tokio::time::Instant;

/// Single-shot liveness check against a worker port
#[async_trait]
pub trait HealthProbe: Clone + Send + Sync + 'static {
    /// Check the worker on `port`, returning its report when healthy.
    async fn check(&self, port: u16) -> Option<HealthReport>;

    async fn probe(&self, port: u16) -> bool {
        self.check(port).await.is_some()
    }
}

/// Poll cadence and overall deadline for [`wait_until_healthy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(200),
            deadline: Duration::from_secs(10),
        }
    }
}

/// Repeat the probe every `interval` until it succeeds or `deadline`
/// passes.
///
/// The deadline is absolute so time spent before polling counts against it.
/// Returns `false` no earlier than the deadline. An in-flight probe is cut
/// off at the deadline so the overshoot stays within one poll interval.
pub async fn wait_until_healthy<P: HealthProbe>(
    probe: &P,
    port: u16,
    interval: Duration,
    deadline: Instant,
) -> bool {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match tokio::time::timeout_at(deadline, probe.probe(port)).await {
            Ok(true) => {
                tracing::debug!(port, attempt, "worker healthy");
                return true;
            }
            Ok(false) => {}
            Err(_) => break,
        }
        let next = Instant::now() + interval;
        if next >= deadline {
            tokio::time::sleep_until(deadline).await;
            break;
        }
        tokio::time::sleep_until(next).await;
    }
    tracing::debug!(port, attempt, "health deadline elapsed");
    false
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
