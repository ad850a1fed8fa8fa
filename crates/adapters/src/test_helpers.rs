// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process fake worker for HTTP adapter tests.

use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

struct FakeWorkerState {
    health: (StatusCode, String),
    health_delay: Duration,
    submit: (StatusCode, String),
    submitted: Vec<serde_json::Value>,
    event_chunks: Vec<String>,
    event_queries: Vec<String>,
    results: VecDeque<String>,
    last_result: Option<String>,
    result_queries: Vec<String>,
}

/// Scriptable worker speaking the loopback HTTP protocol.
#[derive(Clone)]
pub(crate) struct FakeWorker {
    inner: Arc<Mutex<FakeWorkerState>>,
}

impl FakeWorker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeWorkerState {
                health: (StatusCode::OK, r#"{"status":"ok","pid":123}"#.to_string()),
                health_delay: Duration::ZERO,
                submit: (StatusCode::OK, r#"{"jobId":"job-1"}"#.to_string()),
                submitted: Vec::new(),
                event_chunks: Vec::new(),
                event_queries: Vec::new(),
                results: VecDeque::new(),
                last_result: None,
                result_queries: Vec::new(),
            })),
        }
    }

    pub fn health(self, status: StatusCode, body: &str) -> Self {
        self.inner.lock().health = (status, body.to_string());
        self
    }

    pub fn health_delay(self, delay: Duration) -> Self {
        self.inner.lock().health_delay = delay;
        self
    }

    pub fn submit(self, status: StatusCode, body: &str) -> Self {
        self.inner.lock().submit = (status, body.to_string());
        self
    }

    /// Raw chunks written to every `/events` stream before it closes.
    pub fn events(self, chunks: &[&str]) -> Self {
        self.inner.lock().event_chunks = chunks.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Queue `/result` bodies; the last one repeats.
    pub fn results(self, bodies: &[&str]) -> Self {
        self.inner.lock().results = bodies.iter().map(|b| b.to_string()).collect();
        self
    }

    pub fn submitted(&self) -> Vec<serde_json::Value> {
        self.inner.lock().submitted.clone()
    }

    pub fn event_queries(&self) -> Vec<String> {
        self.inner.lock().event_queries.clone()
    }

    pub fn result_queries(&self) -> Vec<String> {
        self.inner.lock().result_queries.clone()
    }

    /// Bind to an ephemeral loopback port and serve in the background.
    pub async fn serve(&self) -> u16 {
        let app = Router::new()
            .route("/health", get(health))
            .route("/translate", post(translate))
            .route("/events", get(events))
            .route("/result", get(result))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        port
    }
}

fn job_param(query: &HashMap<String, String>) -> String {
    query.get("jobId").cloned().unwrap_or_default()
}

async fn health(State(worker): State<FakeWorker>) -> Response {
    let (delay, (status, body)) = {
        let state = worker.inner.lock();
        (state.health_delay, state.health.clone())
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    (status, body).into_response()
}

async fn translate(
    State(worker): State<FakeWorker>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let mut state = worker.inner.lock();
    state.submitted.push(body);
    state.submit.clone().into_response()
}

async fn events(
    State(worker): State<FakeWorker>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let chunks = {
        let mut state = worker.inner.lock();
        state.event_queries.push(job_param(&query));
        state.event_chunks.clone()
    };
    let stream = futures::stream::iter(
        chunks
            .into_iter()
            .map(|chunk| Ok::<_, Infallible>(Bytes::from(chunk))),
    );
    Body::from_stream(stream).into_response()
}

async fn result(
    State(worker): State<FakeWorker>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = worker.inner.lock();
    state.result_queries.push(job_param(&query));
    let body = match state.results.pop_front() {
        Some(body) => {
            state.last_result = Some(body.clone());
            body
        }
        None => state.last_result.clone().unwrap_or_else(|| "{}".to_string()),
    };
    (StatusCode::OK, body).into_response()
}
