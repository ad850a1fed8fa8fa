// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::FakeWorker;
use axum::http::StatusCode;
use pz_core::{TranslateService, JOB_NOT_FINISHED};
use std::path::Path;

fn request() -> TranslateRequest {
    TranslateRequest::for_file(Path::new("/docs/paper.pdf"), TranslateService::Bing).with_threads(2)
}

#[tokio::test]
async fn submit_posts_request_body() {
    let worker = FakeWorker::new();
    let port = worker.serve().await;

    let job_id = HttpWorkerClient::default().submit(port, &request()).await.unwrap();
    assert_eq!(job_id, "job-1");

    let submitted = worker.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0]["source_path"], "/docs/paper.pdf");
    assert_eq!(submitted[0]["source_filename"], "paper.pdf");
    assert_eq!(submitted[0]["service"], "bing");
    assert_eq!(submitted[0]["threads"], 2);
}

#[tokio::test]
async fn submit_null_job_id() {
    let port = FakeWorker::new()
        .submit(StatusCode::OK, r#"{"jobId":null}"#)
        .serve()
        .await;
    let err = HttpWorkerClient::default().submit(port, &request()).await.unwrap_err();
    assert!(matches!(err, SubmitError::NoJobId), "{:?}", err);
}

#[tokio::test]
async fn submit_rejected() {
    let port = FakeWorker::new()
        .submit(StatusCode::BAD_REQUEST, "missing source_path")
        .serve()
        .await;
    let err = HttpWorkerClient::default().submit(port, &request()).await.unwrap_err();
    match err {
        SubmitError::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "missing source_path");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn events_stream_raw_chunks() {
    let worker = FakeWorker::new().events(&["data: {\"type\":\"prog", "ress\",\"pct\":1}\n\n"]);
    let port = worker.serve().await;

    let stream = HttpWorkerClient::default()
        .open_events(port, &JobId::new("job 7"))
        .await
        .unwrap();
    let chunks: Vec<_> = stream.collect().await;
    let body: Vec<u8> = chunks
        .into_iter()
        .flat_map(|c| c.unwrap().to_vec())
        .collect();
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "data: {\"type\":\"progress\",\"pct\":1}\n\n"
    );
    // Query parameter survives encoding
    assert_eq!(worker.event_queries(), vec!["job 7"]);
}

#[tokio::test]
async fn fetch_result_parses_pending_and_success() {
    let worker = FakeWorker::new().results(&[
        r#"{"ok":false,"error":"job not finished"}"#,
        r#"{"ok":true,"filename":"x.pdf","pdf_base64":"QUJD"}"#,
    ]);
    let port = worker.serve().await;
    let client = HttpWorkerClient::default();
    let job = JobId::new("j1");

    let first = client.fetch_result(port, &job).await.unwrap();
    assert!(first.is_pending());
    assert_eq!(first.error.as_deref(), Some(JOB_NOT_FINISHED));

    let second = client.fetch_result(port, &job).await.unwrap();
    assert!(second.ok);
    assert_eq!(second.payload().unwrap().filename, "x.pdf");
    assert_eq!(worker.result_queries(), vec!["j1", "j1"]);
}

#[tokio::test]
async fn fetch_result_malformed_is_protocol_error() {
    let port = FakeWorker::new().results(&["<html>"]).serve().await;
    let err = HttpWorkerClient::default()
        .fetch_result(port, &JobId::new("j1"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Protocol(_)), "{:?}", err);
}

#[tokio::test]
async fn closed_port_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = HttpWorkerClient::default();
    let job = JobId::new("j1");
    assert!(client.open_events(port, &job).await.is_err());
    assert!(matches!(
        client.fetch_result(port, &job).await,
        Err(FetchError::Transport(_))
    ));
    assert!(matches!(
        client.submit(port, &request()).await,
        Err(SubmitError::Transport(_))
    ));
}
