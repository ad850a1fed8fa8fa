// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn done_exposes_payload_only_when_ok() {
    let job = JobId::new("j1");
    let ok = Notification::done(
        &job,
        ResultResponse {
            ok: true,
            filename: Some("x.pdf".into()),
            pdf_base64: Some("AA==".into()),
            ..Default::default()
        },
    );
    let Notification::Done(done) = ok else {
        panic!("expected done");
    };
    assert!(done.ok);
    assert_eq!(done.result().unwrap().filename, "x.pdf");

    let Notification::Done(failed) = Notification::failed(&job, None) else {
        panic!("expected done");
    };
    assert!(!failed.ok);
    assert_eq!(failed.result(), None);
}

#[test]
fn serializes_with_kind_tag() {
    let n = Notification::progress(&JobId::new("j1"), 12.5, "ocr", "page 1");
    let json = serde_json::to_value(&n).unwrap();
    assert_eq!(json["kind"], "progress");
    assert_eq!(json["job_id"], "j1");
    assert_eq!(json["pct"], 12.5);
}

#[test]
fn error_without_job_has_no_job_id() {
    let n = Notification::error(None, "connection refused", None);
    assert_eq!(n.job_id(), None);
    assert!(matches!(n, Notification::Error(_)));
}
