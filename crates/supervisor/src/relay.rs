// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job event relay.
//!
//! Each attached job gets one event stream and one task. The task frames
//! the stream into lines, forwards this job's events in wire order, and on
//! `done` drives the result fetch. Streams are one-shot: a failed stream is
//! reported, never reopened.

use crate::error::RelayError;
use crate::fetch::{fetch_result_with_retry, FetchOutcome, RetryPolicy};
use crate::frame::FrameBuffer;
use futures::StreamExt;
use pz_adapters::{ChannelSink, NotifySink, WorkerClient};
use pz_core::{JobId, Notification, ResultPayload, WorkerEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Where the relay reads the engine port from.
///
/// Consulted on every attach so a restarted engine is never addressed on a
/// stale port.
pub trait PortSource: Clone + Send + Sync + 'static {
    fn current_port(&self) -> Option<u16>;
}

/// A port that never changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPort(pub u16);

impl PortSource for FixedPort {
    fn current_port(&self) -> Option<u16> {
        Some(self.0)
    }
}

/// Why a relay task stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// `done` was received and the fetch outcome delivered
    Completed,
    /// The engine reported an error for the job
    WorkerError,
    /// The stream could not be opened or broke mid-way
    TransportFailed,
    /// The stream ended without a terminal event
    Abandoned,
    /// The relay was closed
    Cancelled,
}

/// Attaches jobs to their event streams
#[derive(Clone)]
pub struct JobRelay<W, S> {
    client: W,
    ports: S,
    retry: RetryPolicy,
    cancel: CancellationToken,
}

impl<W: WorkerClient, S: PortSource> JobRelay<W, S> {
    pub fn new(client: W, ports: S, retry: RetryPolicy) -> Self {
        Self {
            client,
            ports,
            retry,
            cancel: CancellationToken::new(),
        }
    }

    /// Start relaying `job_id`'s events into `sink`.
    pub fn attach<N: NotifySink>(
        &self,
        job_id: &JobId,
        sink: N,
    ) -> Result<JoinHandle<RelayOutcome>, RelayError> {
        if self.cancel.is_cancelled() {
            return Err(RelayError::Closed);
        }
        let port = self.ports.current_port().ok_or(RelayError::NotReady)?;
        let task = RelayTask {
            client: self.client.clone(),
            port,
            job_id: job_id.clone(),
            retry: self.retry,
            cancel: self.cancel.child_token(),
            sink,
        };
        let span = tracing::info_span!("job.relay", %job_id, port);
        Ok(tokio::spawn(task.run().instrument(span)))
    }

    /// Attach `job_id` to a fresh channel and hand back the receiving end.
    pub fn subscribe(&self, job_id: &JobId) -> Result<JobSubscription, RelayError> {
        let (sink, rx) = ChannelSink::pair();
        self.attach(job_id, sink)?;
        Ok(JobSubscription {
            job_id: job_id.clone(),
            rx,
        })
    }

    /// Stop every relay task and refuse further attaches.
    pub fn close(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!("closing job relay");
            self.cancel.cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

struct RelayTask<W, N> {
    client: W,
    port: u16,
    job_id: JobId,
    retry: RetryPolicy,
    cancel: CancellationToken,
    sink: N,
}

impl<W: WorkerClient, N: NotifySink> RelayTask<W, N> {
    async fn run(self) -> RelayOutcome {
        let opened = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return RelayOutcome::Cancelled,
            opened = self.client.open_events(self.port, &self.job_id) => opened,
        };
        let mut stream = match opened {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "failed to open event stream");
                self.sink
                    .notify(Notification::error(Some(&self.job_id), e.to_string(), None));
                return RelayOutcome::TransportFailed;
            }
        };
        tracing::debug!("event stream open");

        let mut frames = FrameBuffer::new();
        loop {
            let chunk = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::debug!("relay cancelled");
                    return RelayOutcome::Cancelled;
                }
                chunk = stream.next() => chunk,
            };
            match chunk {
                Some(Ok(bytes)) => {
                    for line in frames.push(&bytes) {
                        if let Some(outcome) = self.handle_line(&line).await {
                            return outcome;
                        }
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "event stream failed");
                    self.sink
                        .notify(Notification::error(Some(&self.job_id), e.to_string(), None));
                    return RelayOutcome::TransportFailed;
                }
                None => break,
            }
        }

        if let Some(line) = frames.finish() {
            if let Some(outcome) = self.handle_line(&line).await {
                return outcome;
            }
        }
        tracing::warn!("event stream closed without a terminal event");
        RelayOutcome::Abandoned
    }

    /// Process one line; `Some` once the job has reached a terminal outcome.
    async fn handle_line(&self, line: &str) -> Option<RelayOutcome> {
        let Some(event) = WorkerEvent::parse_line(line) else {
            if !line.trim().is_empty() {
                tracing::trace!(line, "skipping non-event line");
            }
            return None;
        };
        if !event.belongs_to(&self.job_id) {
            tracing::debug!(
                event = event.name(),
                other = ?event.job_id(),
                "ignoring event for another job"
            );
            return None;
        }

        match event {
            WorkerEvent::Progress {
                pct,
                stage,
                message,
                ..
            } => {
                self.sink
                    .notify(Notification::progress(&self.job_id, pct, stage, message));
                None
            }
            WorkerEvent::Error {
                message, detail, ..
            } => {
                tracing::warn!(error = %message, "engine reported job error");
                self.sink
                    .notify(Notification::error(Some(&self.job_id), message, detail));
                Some(RelayOutcome::WorkerError)
            }
            WorkerEvent::Done { .. } => {
                tracing::info!("job done, fetching result");
                let fetch =
                    fetch_result_with_retry(&self.client, self.port, &self.job_id, self.retry);
                let outcome = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return Some(RelayOutcome::Cancelled),
                    outcome = fetch => outcome,
                };
                if matches!(outcome, FetchOutcome::Ready(_)) {
                    tracing::info!("result delivered");
                }
                for notification in outcome.into_notifications(&self.job_id) {
                    self.sink.notify(notification);
                }
                Some(RelayOutcome::Completed)
            }
        }
    }
}

/// How a job ended, as seen by a subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed(ResultPayload),
    Failed {
        message: String,
        detail: Option<String>,
    },
    /// The stream ended with no terminal notification
    Abandoned,
}

/// Receiving end of one job's notifications.
///
/// Dropping it only stops observation; the relay task runs to completion.
#[derive(Debug)]
pub struct JobSubscription {
    job_id: JobId,
    rx: mpsc::UnboundedReceiver<Notification>,
}

impl JobSubscription {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Next notification, or `None` once the relay has finished.
    pub async fn next(&mut self) -> Option<Notification> {
        self.rx.recv().await
    }

    /// Drain notifications until the job settles, showing each to `observe`.
    pub async fn finish(mut self, mut observe: impl FnMut(&Notification)) -> JobOutcome {
        let mut last_error = None;
        while let Some(notification) = self.rx.recv().await {
            observe(&notification);
            match notification {
                Notification::Progress(_) => {}
                Notification::Error(error) => last_error = Some(error),
                Notification::Done(done) => {
                    if let Some(payload) = done.result() {
                        return JobOutcome::Completed(payload);
                    }
                    return match last_error {
                        Some(error) => JobOutcome::Failed {
                            message: error.message,
                            detail: error.detail,
                        },
                        None => {
                            let response = done.response.unwrap_or_default();
                            JobOutcome::Failed {
                                message: response.error_message(),
                                detail: response.detail,
                            }
                        }
                    };
                }
            }
        }
        match last_error {
            Some(error) => JobOutcome::Failed {
                message: error.message,
                detail: error.detail,
            },
            None => JobOutcome::Abandoned,
        }
    }
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
