// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::FakeWorker;
use axum::http::StatusCode;

#[tokio::test]
async fn healthy_worker_reports_pid() {
    let port = FakeWorker::new().serve().await;
    let probe = HttpHealthProbe::new(Duration::from_secs(2));

    let report = probe.check(port).await.unwrap();
    assert_eq!(report.pid, 123);
    assert!(probe.probe(port).await);
}

#[tokio::test]
async fn bad_responses_are_unhealthy() {
    let cases = [
        (StatusCode::INTERNAL_SERVER_ERROR, r#"{"status":"ok","pid":1}"#),
        (StatusCode::OK, r#"{"status":"starting","pid":1}"#),
        (StatusCode::OK, r#"{"status":"ok"}"#),
        (StatusCode::OK, r#"{"status":"ok","pid":"1"}"#),
        (StatusCode::OK, "hello"),
    ];
    let probe = HttpHealthProbe::new(Duration::from_secs(2));
    for (status, body) in cases {
        let port = FakeWorker::new().health(status, body).serve().await;
        assert!(!probe.probe(port).await, "{} {} should be unhealthy", status, body);
    }
}

#[tokio::test]
async fn slow_worker_times_out() {
    let port = FakeWorker::new()
        .health_delay(Duration::from_secs(5))
        .serve()
        .await;
    let probe = HttpHealthProbe::new(Duration::from_millis(100));

    let started = std::time::Instant::now();
    assert!(!probe.probe(port).await);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn nothing_listening_is_unhealthy() {
    // Bind then drop to find a port that is very likely closed
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    assert!(!HttpHealthProbe::default().probe(port).await);
}
