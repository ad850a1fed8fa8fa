// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-addressed notifications delivered to the foreground application.
//!
//! Per job the contract is finite: zero or more `Progress`, then a terminal
//! outcome. A successful result is a single `Done { ok: true }`; a failure
//! is an `Error`, followed by `Done { ok: false }` when the failure came
//! from the result fetch.

use serde::{Deserialize, Serialize};

use crate::{JobId, ResultPayload, ResultResponse};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressNotice {
    pub job_id: JobId,
    pub pct: f64,
    pub stage: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoneNotice {
    pub job_id: JobId,
    pub ok: bool,
    /// The last result response seen, forwarded as received.
    pub response: Option<ResultResponse>,
}

impl DoneNotice {
    pub fn result(&self) -> Option<ResultPayload> {
        if !self.ok {
            return None;
        }
        self.response.as_ref().and_then(ResultResponse::payload)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub job_id: Option<JobId>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Notification produced for the foreground application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Progress(ProgressNotice),
    Done(DoneNotice),
    Error(ErrorNotice),
}

impl Notification {
    pub fn progress(
        job_id: &JobId,
        pct: f64,
        stage: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Notification::Progress(ProgressNotice {
            job_id: job_id.clone(),
            pct,
            stage: stage.into(),
            message: message.into(),
        })
    }

    pub fn done(job_id: &JobId, response: ResultResponse) -> Self {
        Notification::Done(DoneNotice {
            job_id: job_id.clone(),
            ok: response.ok,
            response: Some(response),
        })
    }

    /// `Done { ok: false }` paired with an error so consumers that wait on
    /// either signal settle.
    pub fn failed(job_id: &JobId, response: Option<ResultResponse>) -> Self {
        Notification::Done(DoneNotice {
            job_id: job_id.clone(),
            ok: false,
            response,
        })
    }

    pub fn error(
        job_id: Option<&JobId>,
        message: impl Into<String>,
        detail: Option<String>,
    ) -> Self {
        Notification::Error(ErrorNotice {
            job_id: job_id.cloned(),
            message: message.into(),
            detail,
        })
    }

    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            Notification::Progress(p) => Some(&p.job_id),
            Notification::Done(d) => Some(&d.job_id),
            Notification::Error(e) => e.job_id.as_ref(),
        }
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
