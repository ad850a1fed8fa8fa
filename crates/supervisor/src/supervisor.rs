// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine lifecycle supervisor.
//!
//! `Idle → Starting → Ready → Stopping → Idle`. A failed start is recorded
//! (reported as `Failed`) and the machine falls back to `Idle`, so the next
//! `ensure_ready` retries from scratch.
//!
//! Concurrent `ensure_ready` calls share one start attempt. The attempt runs
//! as its own task, so it completes (and cleans up after itself) even if
//! every caller stops waiting.

use crate::config::SupervisorConfig;
use crate::error::StartError;
use crate::relay::PortSource;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use pz_adapters::launcher::read_startup_error;
use pz_adapters::{
    wait_until_healthy, ExitInfo, HealthProbe, LaunchSpec, ProcessTerminator, WorkerLauncher,
    WorkerProcess,
};
use pz_core::{Clock, WorkerState};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Adapter dependencies for the supervisor
pub struct SupervisorDeps<P, L, T> {
    pub probe: P,
    pub launcher: L,
    pub terminator: T,
}

type StartAttempt = Shared<BoxFuture<'static, Result<u16, StartError>>>;

enum Phase {
    Idle,
    Starting {
        attempt: StartAttempt,
        cancel: CancellationToken,
    },
    Ready,
    Stopping,
}

/// The engine this supervisor currently answers for
struct WorkerInstance {
    /// `None` for an adopted engine, which is never signalled
    process: Option<WorkerProcess>,
    port: u16,
    pid: Option<u32>,
    started_at_ms: u64,
    adopted: bool,
}

struct SupervisorState {
    phase: Phase,
    instance: Option<WorkerInstance>,
    last_error: Option<String>,
    /// Bumped by every start attempt and shutdown; stale tasks compare it
    generation: u64,
}

struct Inner<P, L, T, C> {
    deps: SupervisorDeps<P, L, T>,
    clock: C,
    config: SupervisorConfig,
    state: Mutex<SupervisorState>,
    /// Reentrancy guard for `shutdown`
    stopping: AtomicBool,
}

/// Point-in-time view of the supervisor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupervisorStatus {
    pub state: WorkerState,
    pub port: u16,
    pub pid: Option<u32>,
    pub started_at_ms: Option<u64>,
    pub adopted: bool,
    pub last_error: Option<String>,
}

/// Owns the single engine instance.
pub struct Supervisor<P, L, T, C> {
    inner: Arc<Inner<P, L, T, C>>,
}

impl<P, L, T, C> Clone for Supervisor<P, L, T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

enum Next {
    Join(StartAttempt),
    Verify { port: u16, generation: u64 },
    Aborted,
}

enum Startup {
    Healthy,
    TimedOut,
    Exited(ExitInfo),
    Cancelled,
}

enum Settled {
    Applied(Result<u16, StartError>, Option<WorkerProcess>),
    Superseded(Result<WorkerInstance, StartError>),
}

impl<P, L, T, C> Supervisor<P, L, T, C>
where
    P: HealthProbe,
    L: WorkerLauncher,
    T: ProcessTerminator,
    C: Clock,
{
    pub fn new(deps: SupervisorDeps<P, L, T>, clock: C, config: SupervisorConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                deps,
                clock,
                config,
                state: Mutex::new(SupervisorState {
                    phase: Phase::Idle,
                    instance: None,
                    last_error: None,
                    generation: 0,
                }),
                stopping: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.inner.config
    }

    /// Return the port of a healthy engine, starting one if needed.
    ///
    /// Callers arriving while a start is in flight share its outcome.
    /// Fails with [`StartError::Aborted`] while a shutdown is running.
    pub async fn ensure_ready(&self) -> Result<u16, StartError> {
        loop {
            let next = {
                let mut state = self.inner.state.lock();
                let found = match (&state.phase, &state.instance) {
                    (Phase::Starting { attempt, .. }, _) => Some(Next::Join(attempt.clone())),
                    (Phase::Stopping, _) => Some(Next::Aborted),
                    (Phase::Ready, Some(instance)) => Some(Next::Verify {
                        port: instance.port,
                        generation: state.generation,
                    }),
                    (Phase::Ready, None) | (Phase::Idle, _) => None,
                };
                match found {
                    Some(next) => next,
                    None => Next::Join(self.begin_attempt(&mut state, None)),
                }
            };

            match next {
                Next::Join(attempt) => return attempt.await,
                Next::Aborted => return Err(StartError::Aborted),
                Next::Verify { port, generation } => {
                    if self.inner.deps.probe.probe(port).await {
                        return Ok(port);
                    }
                    tracing::warn!(port, "ready engine failed health probe, restarting");
                    let restart = {
                        let mut state = self.inner.state.lock();
                        if state.generation == generation && matches!(state.phase, Phase::Ready) {
                            let stale = state.instance.take();
                            Some(self.begin_attempt(&mut state, stale))
                        } else {
                            None
                        }
                    };
                    if let Some(attempt) = restart {
                        return attempt.await;
                    }
                    // Someone else moved the state on; look again
                }
            }
        }
    }

    /// Stop the owned engine and its process tree.
    ///
    /// Idempotent: without an owned engine this does nothing, and a call
    /// overlapping a running shutdown returns immediately. Adopted engines
    /// are forgotten but never signalled.
    pub async fn shutdown(&self) {
        if self.inner.stopping.swap(true, Ordering::SeqCst) {
            tracing::debug!("shutdown already in progress");
            return;
        }
        let _guard = StopGuard { inner: &self.inner };

        let (instance, attempt) = {
            let mut state = self.inner.state.lock();
            state.generation += 1;
            let attempt = match std::mem::replace(&mut state.phase, Phase::Stopping) {
                Phase::Starting { attempt, cancel } => {
                    cancel.cancel();
                    Some(attempt)
                }
                _ => None,
            };
            (state.instance.take(), attempt)
        };

        if instance.is_none() && attempt.is_none() {
            tracing::debug!("no engine owned, nothing to stop");
            return;
        }
        tracing::info!("engine state: stopping");
        if let Some(attempt) = attempt {
            // The cancelled attempt terminates whatever it launched
            let _ = attempt.await;
        }
        if let Some(instance) = instance {
            self.release(instance).await;
        }
        tracing::info!("engine state: idle");
    }

    pub fn status(&self) -> SupervisorStatus {
        let state = self.inner.state.lock();
        let worker_state = match state.phase {
            Phase::Idle if state.last_error.is_some() => WorkerState::Failed,
            Phase::Idle => WorkerState::Idle,
            Phase::Starting { .. } => WorkerState::Starting,
            Phase::Ready => WorkerState::Ready,
            Phase::Stopping => WorkerState::Stopping,
        };
        let instance = state.instance.as_ref();
        SupervisorStatus {
            state: worker_state,
            port: instance.map_or(self.inner.config.port, |i| i.port),
            pid: instance.and_then(|i| i.pid),
            started_at_ms: instance.map(|i| i.started_at_ms),
            adopted: instance.is_some_and(|i| i.adopted),
            last_error: state.last_error.clone(),
        }
    }

    /// Port of the engine while it is ready
    pub fn current_port(&self) -> Option<u16> {
        let state = self.inner.state.lock();
        match (&state.phase, &state.instance) {
            (Phase::Ready, Some(instance)) => Some(instance.port),
            _ => None,
        }
    }

    /// Create the shared start attempt. Must be called with the state locked.
    fn begin_attempt(
        &self,
        state: &mut SupervisorState,
        stale: Option<WorkerInstance>,
    ) -> StartAttempt {
        state.generation += 1;
        let generation = state.generation;
        let cancel = CancellationToken::new();

        let this = self.clone();
        let token = cancel.clone();
        let handle = tokio::spawn(async move { this.run_attempt(generation, stale, token).await });
        let attempt = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(error = %e, "start attempt task failed");
                    Err(StartError::Aborted)
                }
            }
        }
        .boxed()
        .shared();

        state.phase = Phase::Starting {
            attempt: attempt.clone(),
            cancel,
        };
        tracing::info!(generation, port = self.inner.config.port, "engine state: starting");
        attempt
    }

    async fn run_attempt(
        &self,
        generation: u64,
        stale: Option<WorkerInstance>,
        cancel: CancellationToken,
    ) -> Result<u16, StartError> {
        if let Some(stale) = stale {
            self.release(stale).await;
        }
        let result = self.start_worker(&cancel).await;

        let settled = {
            let mut state = self.inner.state.lock();
            if state.generation != generation {
                Settled::Superseded(result)
            } else {
                match result {
                    Ok(instance) => {
                        let port = instance.port;
                        let process = instance.process.clone();
                        tracing::info!(
                            port,
                            pid = ?instance.pid,
                            adopted = instance.adopted,
                            "engine state: ready"
                        );
                        state.instance = Some(instance);
                        state.phase = Phase::Ready;
                        state.last_error = None;
                        Settled::Applied(Ok(port), process)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "engine state: failed");
                        state.phase = Phase::Idle;
                        state.last_error = Some(e.to_string());
                        Settled::Applied(Err(e), None)
                    }
                }
            }
        };

        match settled {
            Settled::Applied(result, process) => {
                if let Some(process) = process {
                    self.watch_exit(process, generation);
                }
                result
            }
            Settled::Superseded(result) => {
                if let Ok(instance) = result {
                    let port = instance.port;
                    tracing::info!(port, "discarding engine started during shutdown");
                    self.release(instance).await;
                }
                Err(StartError::Aborted)
            }
        }
    }

    /// Reuse a healthy engine on the well-known port, or launch one and
    /// wait for it to answer health probes.
    ///
    /// The health deadline covers the whole attempt, adoption check included.
    async fn start_worker(&self, cancel: &CancellationToken) -> Result<WorkerInstance, StartError> {
        let deps = &self.inner.deps;
        let config = &self.inner.config;
        let port = config.port;
        let deadline = Instant::now() + config.poll.deadline;

        if let Some(report) = deps.probe.check(port).await {
            tracing::info!(port, pid = report.pid, "adopting healthy engine on well-known port");
            return Ok(WorkerInstance {
                process: None,
                port,
                pid: Some(report.pid),
                started_at_ms: self.inner.clock.epoch_ms(),
                adopted: true,
            });
        }
        if cancel.is_cancelled() {
            return Err(StartError::Aborted);
        }

        let command = deps.launcher.resolve().await?;
        if cancel.is_cancelled() {
            return Err(StartError::Aborted);
        }
        let spec = LaunchSpec::new(port, &config.log_dir);
        let process = deps.launcher.launch(&command, &spec).await?;
        let started_at_ms = self.inner.clock.epoch_ms();

        let startup = tokio::select! {
            biased;
            healthy = wait_until_healthy(&deps.probe, port, config.poll.interval, deadline) => {
                if healthy { Startup::Healthy } else { Startup::TimedOut }
            }
            status = process.wait_exit() => Startup::Exited(status),
            _ = cancel.cancelled() => Startup::Cancelled,
        };

        match startup {
            Startup::Healthy => {
                if let Some(announced) = process.announced_port().filter(|p| *p != port) {
                    tracing::warn!(port, announced, "engine announced a different port");
                }
                Ok(WorkerInstance {
                    pid: Some(process.pid()),
                    process: Some(process),
                    port,
                    started_at_ms,
                    adopted: false,
                })
            }
            Startup::TimedOut => {
                tracing::warn!(port, pid = process.pid(), "engine never became healthy, killing");
                self.kill(&process).await;
                Err(StartError::HealthTimeout {
                    port,
                    timeout: config.poll.deadline,
                    log_dir: config.log_dir.clone(),
                    startup_error: read_startup_error(&config.log_dir),
                })
            }
            Startup::Exited(status) => {
                tracing::warn!(port, pid = process.pid(), %status, "engine exited during startup");
                self.kill(&process).await;
                Err(StartError::Exited {
                    status,
                    log_dir: config.log_dir.clone(),
                    startup_error: read_startup_error(&config.log_dir),
                })
            }
            Startup::Cancelled => {
                self.terminate(&process).await;
                Err(StartError::Aborted)
            }
        }
    }

    /// Clear the instance, and kill what is left of its group, if its process
    /// exits while it is still current.
    fn watch_exit(&self, process: WorkerProcess, generation: u64) {
        let inner: Weak<Inner<P, L, T, C>> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            let status = process.wait_exit().await;
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let current = {
                let mut state = inner.state.lock();
                let current = matches!(state.phase, Phase::Ready)
                    && state.generation == generation
                    && state.instance.as_ref().and_then(|i| i.pid) == Some(process.pid());
                if current {
                    tracing::warn!(pid = process.pid(), %status, "engine exited unexpectedly");
                    state.instance = None;
                    state.phase = Phase::Idle;
                    state.last_error = Some(format!("engine exited unexpectedly ({status})"));
                }
                current
            };
            // Helpers the engine spawned may outlive it
            if current {
                let outcome = inner
                    .deps
                    .terminator
                    .terminate_tree(&process, Duration::ZERO)
                    .await;
                tracing::debug!(pid = process.pid(), %outcome, "reaped exited engine's group");
            }
        });
    }

    async fn release(&self, instance: WorkerInstance) {
        if instance.adopted {
            tracing::info!(port = instance.port, pid = ?instance.pid, "forgetting adopted engine");
            return;
        }
        if let Some(process) = instance.process {
            self.terminate(&process).await;
        }
    }

    async fn terminate(&self, process: &WorkerProcess) {
        let outcome = self
            .inner
            .deps
            .terminator
            .terminate_tree(process, self.inner.config.kill_grace)
            .await;
        tracing::info!(pid = process.pid(), %outcome, "engine terminated");
    }

    /// Kill the process group at once, without a graceful phase.
    async fn kill(&self, process: &WorkerProcess) {
        let outcome = self
            .inner
            .deps
            .terminator
            .terminate_tree(process, Duration::ZERO)
            .await;
        tracing::info!(pid = process.pid(), %outcome, "engine killed");
    }
}

impl<P, L, T, C> PortSource for Supervisor<P, L, T, C>
where
    P: HealthProbe,
    L: WorkerLauncher,
    T: ProcessTerminator,
    C: Clock,
{
    fn current_port(&self) -> Option<u16> {
        Supervisor::current_port(self)
    }
}

/// Resets the shutdown guard and the phase however `shutdown` ends.
struct StopGuard<'a, P, L, T, C> {
    inner: &'a Inner<P, L, T, C>,
}

impl<P, L, T, C> Drop for StopGuard<'_, P, L, T, C> {
    fn drop(&mut self) {
        let mut state = self.inner.state.lock();
        if matches!(state.phase, Phase::Stopping) {
            state.phase = Phase::Idle;
        }
        state.instance = None;
        drop(state);
        self.inner.stopping.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
