// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Facade used by foreground applications: ensure the engine is ready,
//! submit a job, and relay its notifications.

use crate::config::SupervisorConfig;
use crate::error::{BridgeError, RelayError, StartError};
use crate::relay::{JobRelay, JobSubscription, RelayOutcome};
use crate::supervisor::{Supervisor, SupervisorDeps, SupervisorStatus};
use pz_adapters::{
    CommandResolver, HealthProbe, HttpHealthProbe, HttpWorkerClient, NotifySink, ProcessLauncher,
    ProcessTerminator, SystemTerminator, TracedLauncher, TracedWorkerClient, WorkerClient,
    WorkerLauncher,
};
use pz_core::{Clock, JobId, ResultResponse, SystemClock, TranslateRequest};
use tokio::task::JoinHandle;

/// Bridge wired to the real process, HTTP and clock adapters
pub type SystemBridge = Bridge<
    HttpHealthProbe,
    TracedLauncher<ProcessLauncher>,
    SystemTerminator,
    SystemClock,
    TracedWorkerClient<HttpWorkerClient>,
>;

pub struct Bridge<P, L, T, C, W> {
    supervisor: Supervisor<P, L, T, C>,
    relay: JobRelay<W, Supervisor<P, L, T, C>>,
    client: W,
}

impl<P, L, T, C, W> Bridge<P, L, T, C, W>
where
    P: HealthProbe,
    L: WorkerLauncher,
    T: ProcessTerminator,
    C: Clock,
    W: WorkerClient,
{
    pub fn new(supervisor: Supervisor<P, L, T, C>, client: W) -> Self {
        let retry = supervisor.config().retry;
        let relay = JobRelay::new(client.clone(), supervisor.clone(), retry);
        Self {
            supervisor,
            relay,
            client,
        }
    }

    pub fn supervisor(&self) -> &Supervisor<P, L, T, C> {
        &self.supervisor
    }

    pub fn status(&self) -> SupervisorStatus {
        self.supervisor.status()
    }

    pub async fn ensure_ready(&self) -> Result<u16, StartError> {
        self.supervisor.ensure_ready().await
    }

    /// Submit `request` and subscribe to the new job's notifications.
    pub async fn translate(
        &self,
        request: &TranslateRequest,
    ) -> Result<JobSubscription, BridgeError> {
        let job_id = self.submit(request).await?;
        Ok(self.relay.subscribe(&job_id)?)
    }

    /// Submit `request`, relaying the job's notifications into `sink`.
    pub async fn translate_into<N: NotifySink>(
        &self,
        request: &TranslateRequest,
        sink: N,
    ) -> Result<(JobId, JoinHandle<RelayOutcome>), BridgeError> {
        let job_id = self.submit(request).await?;
        let task = self.relay.attach(&job_id, sink)?;
        Ok((job_id, task))
    }

    /// Relay an already-submitted job into `sink`.
    pub fn attach<N: NotifySink>(
        &self,
        job_id: &JobId,
        sink: N,
    ) -> Result<JoinHandle<RelayOutcome>, RelayError> {
        self.relay.attach(job_id, sink)
    }

    /// Fetch a job's result directly, bypassing the event stream.
    pub async fn pull_result(&self, job_id: &JobId) -> Result<ResultResponse, BridgeError> {
        let port = self.supervisor.ensure_ready().await?;
        let response = self.client.fetch_result(port, job_id).await?;
        tracing::debug!(%job_id, ok = response.ok, "pulled result");
        Ok(response)
    }

    /// Close every job stream, then stop the engine.
    pub async fn shutdown(&self) {
        self.relay.close();
        self.supervisor.shutdown().await;
    }

    /// Fails before starting an engine once the relay is closed, so no job
    /// is submitted without a stream to report its outcome.
    async fn submit(&self, request: &TranslateRequest) -> Result<JobId, BridgeError> {
        if self.relay.is_closed() {
            return Err(RelayError::Closed.into());
        }
        let port = self.supervisor.ensure_ready().await?;
        let job_id = self.client.submit(port, request).await?;
        tracing::info!(%job_id, port, file = %request.source_filename, "job submitted");
        Ok(job_id)
    }
}

impl SystemBridge {
    /// Build the production bridge from `config`.
    pub fn system(config: SupervisorConfig) -> Self {
        let deps = SupervisorDeps {
            probe: HttpHealthProbe::new(config.probe_timeout),
            launcher: TracedLauncher::new(ProcessLauncher::new(CommandResolver::new(
                config.resolve.clone(),
            ))),
            terminator: SystemTerminator::new(),
        };
        let supervisor = Supervisor::new(deps, SystemClock, config);
        Bridge::new(supervisor, TracedWorkerClient::new(HttpWorkerClient::default()))
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
