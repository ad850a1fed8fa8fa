// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker HTTP client: submission, event streams, result fetches

mod http;

pub use http::{HttpWorkerClient, DEFAULT_REQUEST_TIMEOUT};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeWorkerClient, WorkerCall};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use pz_core::{JobId, ProtocolError, ResultResponse, TranslateRequest};
use thiserror::Error;

/// Raw bytes of a job's event stream, as delivered by the transport
pub type EventStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Network-level failure talking to the worker
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors from fetching a job result
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Errors from submitting a job
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("worker rejected submission ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("worker accepted submission but returned no job id")]
    NoJobId,
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Client for the worker's job endpoints on a given port
#[async_trait]
pub trait WorkerClient: Clone + Send + Sync + 'static {
    /// `POST /translate`
    async fn submit(&self, port: u16, request: &TranslateRequest) -> Result<JobId, SubmitError>;

    /// `GET /events?jobId=…`, returning the body as a byte stream
    async fn open_events(&self, port: u16, job_id: &JobId) -> Result<EventStream, TransportError>;

    /// `GET /result?jobId=…`
    async fn fetch_result(&self, port: u16, job_id: &JobId) -> Result<ResultResponse, FetchError>;
}
