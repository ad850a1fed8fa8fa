// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake worker launcher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{
    CandidateKind, ExitInfo, ExitNotifier, LaunchCommand, LaunchError, LaunchSpec,
    ResolutionError, WorkerLauncher, WorkerProcess,
};
use crate::health::FakeHealthProbe;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// What a fake launch does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchBehavior {
    /// Answer health probes after this many failed probes
    HealthyAfter(u32),
    /// Run but never answer health probes
    NeverHealthy,
    /// Exit with this code right after spawning
    ExitImmediately(i32),
    /// Spawning fails
    SpawnFails,
    /// No command can be resolved
    Unresolvable,
}

struct FakeLauncherState {
    behavior: LaunchBehavior,
    delay: Duration,
    next_pid: u32,
    launches: Vec<LaunchSpec>,
    running: HashMap<u32, (u16, ExitNotifier)>,
    probe: Option<FakeHealthProbe>,
}

/// Fake launcher that hands out detached process handles
#[derive(Clone)]
pub struct FakeLauncher {
    inner: Arc<Mutex<FakeLauncherState>>,
}

impl Default for FakeLauncher {
    fn default() -> Self {
        Self::new(LaunchBehavior::HealthyAfter(0))
    }
}

impl FakeLauncher {
    pub fn new(behavior: LaunchBehavior) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeLauncherState {
                behavior,
                delay: Duration::ZERO,
                next_pid: 1000,
                launches: Vec::new(),
                running: HashMap::new(),
                probe: None,
            })),
        }
    }

    /// Drive `probe` from launched processes: healthy while running.
    pub fn with_probe(self, probe: FakeHealthProbe) -> Self {
        self.inner.lock().probe = Some(probe);
        self
    }

    pub fn set_behavior(&self, behavior: LaunchBehavior) {
        self.inner.lock().behavior = behavior;
    }

    /// Suspend each launch for `delay` before it completes.
    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().delay = delay;
    }

    pub fn launch_count(&self) -> usize {
        self.inner.lock().launches.len()
    }

    pub fn launches(&self) -> Vec<LaunchSpec> {
        self.inner.lock().launches.clone()
    }

    /// Pids of launched processes that have not exited
    pub fn running(&self) -> Vec<u32> {
        let mut pids: Vec<u32> = self.inner.lock().running.keys().copied().collect();
        pids.sort_unstable();
        pids
    }

    /// Make a launched process exit. Returns false if it was not running.
    pub fn exit(&self, pid: u32, info: ExitInfo) -> bool {
        let mut state = self.inner.lock();
        let Some((port, notifier)) = state.running.remove(&pid) else {
            return false;
        };
        if let Some(probe) = &state.probe {
            probe.set_unhealthy(port);
        }
        notifier.exited(info);
        true
    }
}

#[async_trait]
impl WorkerLauncher for FakeLauncher {
    async fn resolve(&self) -> Result<LaunchCommand, ResolutionError> {
        if self.inner.lock().behavior == LaunchBehavior::Unresolvable {
            return Err(ResolutionError {
                tried: vec!["fake: nothing to launch".to_string()],
            });
        }
        Ok(LaunchCommand::new("fake-engine", CandidateKind::Override))
    }

    async fn launch(
        &self,
        command: &LaunchCommand,
        spec: &LaunchSpec,
    ) -> Result<WorkerProcess, LaunchError> {
        let delay = self.inner.lock().delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.inner.lock();
        state.launches.push(spec.clone());
        let pid = state.next_pid;
        state.next_pid += 1;

        let (process, notifier) = WorkerProcess::detached(pid);
        match state.behavior {
            LaunchBehavior::SpawnFails | LaunchBehavior::Unresolvable => {
                return Err(LaunchError::Spawn {
                    program: command.display(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "fake spawn failure"),
                });
            }
            LaunchBehavior::ExitImmediately(code) => {
                notifier.exited(ExitInfo::code(code));
                return Ok(process);
            }
            LaunchBehavior::HealthyAfter(probes) => {
                if let Some(probe) = &state.probe {
                    probe.healthy_after(spec.port, probes, pid);
                }
            }
            LaunchBehavior::NeverHealthy => {}
        }
        state.running.insert(pid, (spec.port, notifier));
        Ok(process)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
