// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP health probe against the worker's loopback endpoint.

use super::HealthProbe;
use async_trait::async_trait;
use pz_core::HealthReport;
use std::time::Duration;

/// Default hard timeout for a single probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(300);

/// Probes `http://127.0.0.1:<port>/health`.
#[derive(Clone, Debug)]
pub struct HttpHealthProbe {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpHealthProbe {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout,
        }
    }

    /// Share an existing client's connection pool.
    pub fn with_client(http: reqwest::Client, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, port: u16) -> Result<HealthReport, String> {
        let url = format!("http://127.0.0.1:{port}/health");
        let response = self.http.get(&url).send().await.map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }
        let body = response.bytes().await.map_err(|e| e.to_string())?;
        HealthReport::parse(&body).map_err(|e| e.to_string())
    }
}

impl Default for HttpHealthProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn check(&self, port: u16) -> Option<HealthReport> {
        match tokio::time::timeout(self.timeout, self.fetch(port)).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(reason)) => {
                tracing::trace!(port, %reason, "health probe failed");
                None
            }
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                tracing::trace!(port, timeout_ms, "health probe timed out");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
