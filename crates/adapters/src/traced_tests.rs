// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::client::FakeWorkerClient;
use crate::launcher::{FakeLauncher, LaunchBehavior};
use pz_core::TranslateService;
use serial_test::serial;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn assert_log(logs: &str, label: &str, expected: &str) {
    assert!(logs.contains(expected), "Should log {label}. Logs:\n{logs}");
}

#[test]
#[serial(tracing)]
fn traced_submit_logs_entry_and_job() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedWorkerClient::new(FakeWorkerClient::new());
        let request = TranslateRequest::for_file(Path::new("/d/a.pdf"), TranslateService::Google);
        traced.submit(18321, &request).await
    });

    assert_eq!(result.unwrap(), "job-1");
    assert_log(&logs, "span name", "worker.submit");
    assert_log(&logs, "file field", "file=a.pdf");
    assert_log(&logs, "entry", "submitting");
    assert_log(&logs, "acceptance", "job accepted");
}

#[test]
#[serial(tracing)]
fn traced_submit_logs_failure() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeWorkerClient::new();
        fake.reject_submissions(500, "boom");
        let traced = TracedWorkerClient::new(fake);
        let request = TranslateRequest::for_file(Path::new("/d/a.pdf"), TranslateService::Google);
        traced.submit(1, &request).await
    });

    assert!(result.is_err());
    assert_log(&logs, "error", "submit failed");
    assert_log(&logs, "error detail", "boom");
}

#[test]
#[serial(tracing)]
fn traced_events_logs_refusal() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeWorkerClient::new();
        let job = JobId::new("j9");
        fake.refuse_events(&job, "connection refused");
        TracedWorkerClient::new(fake).open_events(1, &job).await.err()
    });

    assert!(result.is_some());
    assert_log(&logs, "span", "worker.events");
    assert_log(&logs, "warning", "stream failed to open");
}

#[test]
#[serial(tracing)]
fn traced_launcher_logs_resolution_and_pid() {
    let (logs, pid) = with_tracing(|| async {
        let traced = TracedLauncher::new(FakeLauncher::new(LaunchBehavior::NeverHealthy));
        let command = traced.resolve().await.unwrap();
        let process = traced
            .launch(&command, &LaunchSpec::new(7, "/tmp/logs"))
            .await
            .unwrap();
        process.pid()
    });

    assert_log(&logs, "resolution", "resolved");
    assert_log(&logs, "launch span", "engine.launch");
    assert_log(&logs, "pid", &format!("pid={pid}"));
}

#[test]
#[serial(tracing)]
fn traced_launcher_logs_resolution_failure() {
    let (logs, result) = with_tracing(|| async {
        TracedLauncher::new(FakeLauncher::new(LaunchBehavior::Unresolvable))
            .resolve()
            .await
    });

    assert!(result.is_err());
    assert_log(&logs, "failure", "resolution failed");
}
