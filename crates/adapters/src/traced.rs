// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::client::{EventStream, FetchError, SubmitError, TransportError, WorkerClient};
use crate::launcher::{
    LaunchCommand, LaunchError, LaunchSpec, ResolutionError, WorkerLauncher, WorkerProcess,
};
use async_trait::async_trait;
use pz_core::{JobId, ResultResponse, TranslateRequest};
use tracing::Instrument;

/// Wrapper that adds tracing to any WorkerClient
#[derive(Clone)]
pub struct TracedWorkerClient<C> {
    inner: C,
}

impl<C> TracedWorkerClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: WorkerClient> WorkerClient for TracedWorkerClient<C> {
    async fn submit(&self, port: u16, request: &TranslateRequest) -> Result<JobId, SubmitError> {
        async {
            tracing::info!(service = %request.service, threads = request.threads, "submitting");
            let start = std::time::Instant::now();
            let result = self.inner.submit(port, request).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(job_id) => tracing::info!(%job_id, elapsed_ms, "job accepted"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "submit failed"),
            }
            result
        }
        .instrument(tracing::info_span!("worker.submit", port, file = %request.source_filename))
        .await
    }

    async fn open_events(&self, port: u16, job_id: &JobId) -> Result<EventStream, TransportError> {
        let result = self.inner.open_events(port, job_id).await;
        tracing::info_span!("worker.events", port, %job_id).in_scope(|| match &result {
            Ok(_) => tracing::debug!("stream opened"),
            Err(e) => tracing::warn!(error = %e, "stream failed to open"),
        });
        result
    }

    async fn fetch_result(&self, port: u16, job_id: &JobId) -> Result<ResultResponse, FetchError> {
        let result = self.inner.fetch_result(port, job_id).await;
        tracing::trace!(
            port,
            %job_id,
            ok = ?result.as_ref().map(|r| r.ok).ok(),
            pending = ?result.as_ref().map(ResultResponse::is_pending).ok(),
            "fetched result"
        );
        result
    }
}

/// Wrapper that adds tracing to any WorkerLauncher
#[derive(Clone)]
pub struct TracedLauncher<L> {
    inner: L,
}

impl<L> TracedLauncher<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<L: WorkerLauncher> WorkerLauncher for TracedLauncher<L> {
    async fn resolve(&self) -> Result<LaunchCommand, ResolutionError> {
        let result = self.inner.resolve().await;
        tracing::info_span!("engine.resolve").in_scope(|| match &result {
            Ok(command) => {
                tracing::info!(kind = %command.kind, command = %command.display(), "resolved")
            }
            Err(e) => tracing::error!(error = %e, "resolution failed"),
        });
        result
    }

    async fn launch(
        &self,
        command: &LaunchCommand,
        spec: &LaunchSpec,
    ) -> Result<WorkerProcess, LaunchError> {
        let span = tracing::info_span!(
            "engine.launch",
            port = spec.port,
            log_dir = %spec.log_dir.display()
        );
        async {
            tracing::info!(command = %command.display(), "starting");
            let start = std::time::Instant::now();
            let result = self.inner.launch(command, spec).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(process) => tracing::info!(pid = process.pid(), elapsed_ms, "engine spawned"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "launch failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
