// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock abstraction used for timestamps.
//!
//! Deadlines and delays go through `tokio::time`, which tests pause and
//! advance deterministically. This trait covers the remaining wall-clock
//! reads (when a worker started, when a job was submitted).

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock time.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> u64;
}

/// Real system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Manually advanced clock for tests
#[derive(Clone, Debug)]
pub struct FakeClock {
    now_ms: Arc<Mutex<u64>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::at(1_000_000)
    }

    pub fn at(epoch_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(Mutex::new(epoch_ms)),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        *self.now_ms.lock() += ms;
    }
}

impl Clock for FakeClock {
    fn epoch_ms(&self) -> u64 {
        *self.now_ms.lock()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
