// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! reqwest-backed worker client.

use super::{EventStream, FetchError, SubmitError, TransportError, WorkerClient};
use async_trait::async_trait;
use futures::StreamExt;
use pz_core::{JobId, ResultResponse, SubmitResponse, TranslateRequest};
use reqwest::Url;
use std::time::Duration;

/// Default bound on submit and result requests. Event streams are unbounded.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct HttpWorkerClient {
    http: reqwest::Client,
    request_timeout: Duration,
}

impl HttpWorkerClient {
    pub fn new(request_timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), request_timeout)
    }

    pub fn with_client(http: reqwest::Client, request_timeout: Duration) -> Self {
        Self {
            http,
            request_timeout,
        }
    }

    fn url(port: u16, path: &str, job_id: Option<&JobId>) -> Result<Url, TransportError> {
        let base = format!("http://127.0.0.1:{port}{path}");
        let parsed = match job_id {
            Some(id) => Url::parse_with_params(&base, &[("jobId", id.as_str())]),
            None => Url::parse(&base),
        };
        parsed.map_err(|e| TransportError::new(format!("invalid worker url {base}: {e}")))
    }
}

impl Default for HttpWorkerClient {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

fn transport(e: reqwest::Error) -> TransportError {
    TransportError::new(e.to_string())
}

#[async_trait]
impl WorkerClient for HttpWorkerClient {
    async fn submit(&self, port: u16, request: &TranslateRequest) -> Result<JobId, SubmitError> {
        let url = Self::url(port, "/translate", None)?;
        let response = self
            .http
            .post(url)
            .timeout(self.request_timeout)
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;
        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        SubmitResponse::parse(&body)?
            .job_id
            .ok_or(SubmitError::NoJobId)
    }

    async fn open_events(&self, port: u16, job_id: &JobId) -> Result<EventStream, TransportError> {
        let url = Self::url(port, "/events", Some(job_id))?;
        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(format!("event stream refused: {status}")));
        }
        Ok(response.bytes_stream().map(|chunk| chunk.map_err(transport)).boxed())
    }

    async fn fetch_result(&self, port: u16, job_id: &JobId) -> Result<ResultResponse, FetchError> {
        let url = Self::url(port, "/result", Some(job_id))?;
        let response = self
            .http
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(transport)?;
        // Failure bodies may arrive with non-2xx statuses; the body decides.
        let body = response.bytes().await.map_err(transport)?;
        Ok(ResultResponse::parse(&body)?)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
