// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake worker client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{EventStream, FetchError, SubmitError, TransportError, WorkerClient};
use async_trait::async_trait;
use bytes::Bytes;
use futures::channel::mpsc;
use futures::StreamExt;
use parking_lot::Mutex;
use pz_core::{JobId, ResultResponse, TranslateRequest};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Recorded client call
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerCall {
    Submit { port: u16, request: TranslateRequest },
    OpenEvents { port: u16, job_id: JobId },
    FetchResult { port: u16, job_id: JobId },
}

type Chunk = Result<Bytes, TransportError>;

enum EventScript {
    Chunks(Vec<Chunk>),
    Live(mpsc::UnboundedReceiver<Chunk>),
    Refuse(String),
}

#[derive(Clone)]
enum ResultScript {
    Response(ResultResponse),
    Transport(String),
    Malformed,
}

#[derive(Default)]
struct FakeClientState {
    calls: Vec<WorkerCall>,
    next_job_ids: VecDeque<JobId>,
    submit_counter: u32,
    reject_submit: Option<(u16, String)>,
    events: HashMap<JobId, EventScript>,
    results: HashMap<JobId, VecDeque<ResultScript>>,
    last_result: HashMap<JobId, ResultScript>,
}

/// Scriptable in-memory worker
#[derive(Clone, Default)]
pub struct FakeWorkerClient {
    inner: Arc<Mutex<FakeClientState>>,
}

impl FakeWorkerClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Job ids handed out by subsequent submissions; defaults to `job-N`.
    pub fn queue_job_id(&self, job_id: impl Into<JobId>) {
        self.inner.lock().next_job_ids.push_back(job_id.into());
    }

    pub fn reject_submissions(&self, status: u16, body: &str) {
        self.inner.lock().reject_submit = Some((status, body.to_string()));
    }

    /// Serve these raw chunks, then close the stream.
    pub fn script_events(&self, job_id: &JobId, chunks: &[&str]) {
        let chunks = chunks
            .iter()
            .map(|c| Ok(Bytes::from(c.to_string())))
            .collect();
        self.inner
            .lock()
            .events
            .insert(job_id.clone(), EventScript::Chunks(chunks));
    }

    /// Serve the chunks, then fail the stream with a transport error.
    pub fn script_events_then_fail(&self, job_id: &JobId, chunks: &[&str], error: &str) {
        let mut items: Vec<Chunk> = chunks
            .iter()
            .map(|c| Ok(Bytes::from(c.to_string())))
            .collect();
        items.push(Err(TransportError::new(error)));
        self.inner
            .lock()
            .events
            .insert(job_id.clone(), EventScript::Chunks(items));
    }

    /// Feed the stream by hand; it closes when the sender is dropped.
    pub fn live_events(&self, job_id: &JobId) -> mpsc::UnboundedSender<Chunk> {
        let (tx, rx) = mpsc::unbounded();
        self.inner
            .lock()
            .events
            .insert(job_id.clone(), EventScript::Live(rx));
        tx
    }

    /// Opening the stream fails outright.
    pub fn refuse_events(&self, job_id: &JobId, error: &str) {
        self.inner
            .lock()
            .events
            .insert(job_id.clone(), EventScript::Refuse(error.to_string()));
    }

    /// Queue result responses; the last one repeats.
    pub fn push_result(&self, job_id: &JobId, response: ResultResponse) {
        self.push_script(job_id, ResultScript::Response(response));
    }

    pub fn push_result_transport_error(&self, job_id: &JobId, error: &str) {
        self.push_script(job_id, ResultScript::Transport(error.to_string()));
    }

    pub fn push_result_malformed(&self, job_id: &JobId) {
        self.push_script(job_id, ResultScript::Malformed);
    }

    fn push_script(&self, job_id: &JobId, script: ResultScript) {
        self.inner
            .lock()
            .results
            .entry(job_id.clone())
            .or_default()
            .push_back(script);
    }

    pub fn calls(&self) -> Vec<WorkerCall> {
        self.inner.lock().calls.clone()
    }

    pub fn fetch_count(&self, job_id: &JobId) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, WorkerCall::FetchResult { job_id: id, .. } if id == job_id))
            .count()
    }

    /// Ports used to open event streams, in order
    pub fn event_ports(&self) -> Vec<u16> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                WorkerCall::OpenEvents { port, .. } => Some(*port),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl WorkerClient for FakeWorkerClient {
    async fn submit(&self, port: u16, request: &TranslateRequest) -> Result<JobId, SubmitError> {
        let mut state = self.inner.lock();
        state.calls.push(WorkerCall::Submit {
            port,
            request: request.clone(),
        });
        if let Some((status, body)) = state.reject_submit.clone() {
            return Err(SubmitError::Rejected { status, body });
        }
        state.submit_counter += 1;
        let fallback = JobId::new(format!("job-{}", state.submit_counter));
        Ok(state.next_job_ids.pop_front().unwrap_or(fallback))
    }

    async fn open_events(&self, port: u16, job_id: &JobId) -> Result<EventStream, TransportError> {
        let mut state = self.inner.lock();
        state.calls.push(WorkerCall::OpenEvents {
            port,
            job_id: job_id.clone(),
        });
        match state.events.remove(job_id) {
            Some(EventScript::Chunks(chunks)) => Ok(futures::stream::iter(chunks).boxed()),
            Some(EventScript::Live(rx)) => Ok(rx.boxed()),
            Some(EventScript::Refuse(error)) => Err(TransportError::new(error)),
            None => Ok(futures::stream::empty().boxed()),
        }
    }

    async fn fetch_result(&self, port: u16, job_id: &JobId) -> Result<ResultResponse, FetchError> {
        let mut state = self.inner.lock();
        state.calls.push(WorkerCall::FetchResult {
            port,
            job_id: job_id.clone(),
        });
        let next = state.results.get_mut(job_id).and_then(VecDeque::pop_front);
        let script = match next {
            Some(script) => {
                state.last_result.insert(job_id.clone(), script.clone());
                script
            }
            None => state
                .last_result
                .get(job_id)
                .cloned()
                .unwrap_or(ResultScript::Transport("no result scripted".to_string())),
        };
        match script {
            ResultScript::Response(response) => Ok(response),
            ResultScript::Transport(error) => Err(TransportError::new(error).into()),
            ResultScript::Malformed => Ok(ResultResponse::parse(b"<html>")?),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
