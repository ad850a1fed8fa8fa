// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire types for the worker's HTTP protocol.
//!
//! The worker listens on loopback and speaks JSON:
//! - stdout first line: `{"type":"ready","port":<n>}`
//! - `GET /health` → `{"status":"ok","pid":<n>}`
//! - `POST /translate` → `{"jobId": <string|null>}`
//! - `GET /result?jobId=<id>` → `{"ok":true,"filename":..,"pdf_base64":..}`
//!   or `{"ok":false,"error":..,"detail":..}`

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::JobId;

/// Result-endpoint error text meaning "completion reported, artifact not yet
/// queryable". Any other error text is terminal.
pub const JOB_NOT_FINISHED: &str = "job not finished";

/// Errors decoding worker payloads
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed {what}: {source}")]
    Malformed {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unhealthy status: {0}")]
    Unhealthy(String),
}

fn decode<'a, T: Deserialize<'a>>(what: &'static str, body: &'a [u8]) -> Result<T, ProtocolError> {
    serde_json::from_slice(body).map_err(|source| ProtocolError::Malformed { what, source })
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub pid: u32,
}

impl HealthReport {
    /// Decode a health body, rejecting anything but `status == "ok"` with a
    /// numeric pid.
    pub fn parse(body: &[u8]) -> Result<Self, ProtocolError> {
        let report: HealthReport = decode("health report", body)?;
        if report.status != "ok" {
            return Err(ProtocolError::Unhealthy(report.status));
        }
        Ok(report)
    }
}

/// First stdout line the worker prints once it is listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyLine {
    pub port: u16,
}

impl ReadyLine {
    pub fn parse(line: &str) -> Option<Self> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(rename = "type")]
            kind: String,
            port: u16,
        }

        let raw: Raw = serde_json::from_str(line.trim()).ok()?;
        (raw.kind == "ready").then_some(ReadyLine { port: raw.port })
    }
}

/// Translation backends the worker accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslateService {
    #[default]
    Google,
    Bing,
}

impl TranslateService {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslateService::Google => "google",
            TranslateService::Bing => "bing",
        }
    }
}

impl std::fmt::Display for TranslateService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslateService {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(TranslateService::Google),
            "bing" => Ok(TranslateService::Bing),
            other => Err(format!("unsupported service: {other}")),
        }
    }
}

/// Body of `POST /translate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub source_path: String,
    pub source_filename: String,
    pub service: TranslateService,
    pub threads: u32,
}

impl TranslateRequest {
    pub const DEFAULT_THREADS: u32 = 4;

    /// Build a request for a local file, deriving the display filename from
    /// the path.
    pub fn for_file(path: &Path, service: TranslateService) -> Self {
        let source_filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        Self {
            source_path: path.to_string_lossy().into_owned(),
            source_filename,
            service,
            threads: Self::DEFAULT_THREADS,
        }
    }

    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = threads.max(1);
        self
    }
}

/// Response to `POST /translate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(rename = "jobId", default)]
    pub job_id: Option<JobId>,
}

impl SubmitResponse {
    pub fn parse(body: &[u8]) -> Result<Self, ProtocolError> {
        decode("submit response", body)
    }
}

/// Successful translation artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub filename: String,
    /// Base64-encoded PDF bytes, exactly as the worker sent them.
    pub encoded_content: String,
}

/// Body of `GET /result`, kept as received.
///
/// A missing `ok` reads as `false`: absence of success is failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ResultResponse {
    pub fn parse(body: &[u8]) -> Result<Self, ProtocolError> {
        decode("result response", body)
    }

    /// The worker reported completion but the artifact is not queryable yet.
    pub fn is_pending(&self) -> bool {
        !self.ok && self.error.as_deref() == Some(JOB_NOT_FINISHED)
    }

    /// Terminal failure reported by the worker.
    pub fn is_failure(&self) -> bool {
        !self.ok && !self.is_pending()
    }

    pub fn payload(&self) -> Option<ResultPayload> {
        if !self.ok {
            return None;
        }
        Some(ResultPayload {
            filename: self.filename.clone()?,
            encoded_content: self.pdf_base64.clone()?,
        })
    }

    /// Human-readable failure text for a non-ok response.
    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| "worker returned no result".to_string())
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
