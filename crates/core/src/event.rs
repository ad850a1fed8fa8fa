// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events carried on a job's `/events` stream.
//!
//! Each event is one `data: <json>` line. Lines without the prefix, blank
//! keep-alive lines, and unknown event types are not events.

use serde::{Deserialize, Serialize};

use crate::JobId;

/// Line prefix marking an event frame
pub const DATA_PREFIX: &str = "data:";

/// A typed event pushed by the worker for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerEvent {
    Progress {
        #[serde(rename = "jobId", default, skip_serializing_if = "Option::is_none")]
        job_id: Option<JobId>,
        pct: f64,
        #[serde(default)]
        stage: String,
        #[serde(default)]
        message: String,
    },
    Done {
        #[serde(rename = "jobId", default, skip_serializing_if = "Option::is_none")]
        job_id: Option<JobId>,
    },
    Error {
        #[serde(rename = "jobId", default, skip_serializing_if = "Option::is_none")]
        job_id: Option<JobId>,
        #[serde(default)]
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

impl WorkerEvent {
    /// Parse one stream line. Returns `None` for anything that is not a
    /// well-formed event frame.
    pub fn parse_line(line: &str) -> Option<Self> {
        let payload = line.trim().strip_prefix(DATA_PREFIX)?.trim_start();
        serde_json::from_str(payload).ok()
    }

    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            WorkerEvent::Progress { job_id, .. }
            | WorkerEvent::Done { job_id }
            | WorkerEvent::Error { job_id, .. } => job_id.as_ref(),
        }
    }

    /// True when the event is addressed to `watched`. Events without a job
    /// id arrive on a job-scoped stream and belong to that job.
    pub fn belongs_to(&self, watched: &JobId) -> bool {
        self.job_id().is_none_or(|id| id == watched)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkerEvent::Done { .. } | WorkerEvent::Error { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkerEvent::Progress { .. } => "progress",
            WorkerEvent::Done { .. } => "done",
            WorkerEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
