// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake health probe for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::HealthProbe;
use async_trait::async_trait;
use parking_lot::Mutex;
use pz_core::HealthReport;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct FakeProbeState {
    /// Ports that answer healthy, with the pid they report
    healthy: HashMap<u16, u32>,
    /// Ports that turn healthy after the given number of further probes
    pending: HashMap<u16, (u32, u32)>,
    latency: Duration,
    probes: Vec<u16>,
}

/// Scriptable probe; ports are unhealthy unless told otherwise.
#[derive(Clone, Default)]
pub struct FakeHealthProbe {
    inner: Arc<Mutex<FakeProbeState>>,
}

impl FakeHealthProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_healthy(&self, port: u16, pid: u32) {
        let mut state = self.inner.lock();
        state.pending.remove(&port);
        state.healthy.insert(port, pid);
    }

    pub fn set_unhealthy(&self, port: u16) {
        let mut state = self.inner.lock();
        state.pending.remove(&port);
        state.healthy.remove(&port);
    }

    /// Report healthy once `probes` more probes of `port` have failed.
    pub fn healthy_after(&self, port: u16, probes: u32, pid: u32) {
        let mut state = self.inner.lock();
        state.healthy.remove(&port);
        state.pending.insert(port, (probes, pid));
    }

    /// Delay every probe by `latency` before answering.
    pub fn set_latency(&self, latency: Duration) {
        self.inner.lock().latency = latency;
    }

    /// Ports probed so far, in order
    pub fn probes(&self) -> Vec<u16> {
        self.inner.lock().probes.clone()
    }

    pub fn probe_count(&self) -> usize {
        self.inner.lock().probes.len()
    }
}

#[async_trait]
impl HealthProbe for FakeHealthProbe {
    async fn check(&self, port: u16) -> Option<HealthReport> {
        let latency = self.inner.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.inner.lock();
        state.probes.push(port);
        if let Some((remaining, pid)) = state.pending.get_mut(&port) {
            if *remaining == 0 {
                let pid = *pid;
                state.pending.remove(&port);
                state.healthy.insert(port, pid);
            } else {
                *remaining -= 1;
                return None;
            }
        }
        state.healthy.get(&port).map(|pid| HealthReport {
            status: "ok".to_string(),
            pid: *pid,
        })
    }
}
