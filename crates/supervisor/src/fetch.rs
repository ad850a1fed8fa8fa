// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result retrieval after the engine reports completion.
//!
//! Completion and artifact availability are decoupled on the engine side,
//! so a `done` event may be followed by a few "job not finished" answers.

use pz_adapters::{FetchError, WorkerClient};
use pz_core::{JobId, Notification, ResultResponse};
use std::time::Duration;

/// Bounded retry of the result fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause between fetches while the result is pending
    pub delay: Duration,
    /// Total fetches, including the first
    pub attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            attempts: 10,
        }
    }
}

/// How the fetch sequence ended
#[derive(Debug)]
pub enum FetchOutcome {
    /// The engine returned the artifact
    Ready(ResultResponse),
    /// Still pending after every attempt; the last response, unchanged
    Exhausted(ResultResponse),
    /// The engine reported a terminal failure
    Failed(ResultResponse),
    /// The fetch itself failed (network or malformed body)
    Error(FetchError),
}

impl FetchOutcome {
    /// Notifications delivering this outcome for `job_id`.
    ///
    /// Success and exhaustion deliver a single `Done` carrying the response
    /// as received. Failures deliver an `Error` followed by `Done { ok: false }`.
    pub fn into_notifications(self, job_id: &JobId) -> Vec<Notification> {
        match self {
            FetchOutcome::Ready(response) | FetchOutcome::Exhausted(response) => {
                vec![Notification::done(job_id, response)]
            }
            FetchOutcome::Failed(response) => vec![
                Notification::error(
                    Some(job_id),
                    response.error_message(),
                    response.detail.clone(),
                ),
                Notification::failed(job_id, Some(response)),
            ],
            FetchOutcome::Error(e) => vec![
                Notification::error(Some(job_id), e.to_string(), None),
                Notification::failed(job_id, None),
            ],
        }
    }
}

/// Fetch `job_id`'s result, retrying while the engine says it is not finished.
pub async fn fetch_result_with_retry<W: WorkerClient>(
    client: &W,
    port: u16,
    job_id: &JobId,
    policy: RetryPolicy,
) -> FetchOutcome {
    let attempts = policy.attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        let response = match client.fetch_result(port, job_id).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%job_id, attempt, error = %e, "result fetch failed");
                return FetchOutcome::Error(e);
            }
        };
        if response.ok {
            tracing::debug!(%job_id, attempt, "result ready");
            return FetchOutcome::Ready(response);
        }
        if response.is_failure() {
            let error = response.error_message();
            tracing::warn!(%job_id, attempt, %error, "engine reported failure");
            return FetchOutcome::Failed(response);
        }
        if attempt >= attempts {
            tracing::warn!(%job_id, attempts, "result still pending after final attempt");
            return FetchOutcome::Exhausted(response);
        }
        tracing::debug!(%job_id, attempt, "result not finished, retrying");
        tokio::time::sleep(policy.delay).await;
    }
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
