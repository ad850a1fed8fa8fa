// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[test]
fn launch_spec_args() {
    let spec = LaunchSpec {
        port: 18321,
        ppid: 99,
        log_dir: PathBuf::from("/tmp/logs"),
    };
    assert_eq!(
        spec.args(),
        vec!["--port", "18321", "--ppid", "99", "--log-dir", "/tmp/logs"]
    );
}

#[test]
fn launch_spec_uses_own_pid() {
    assert_eq!(LaunchSpec::new(1, "/tmp").ppid, std::process::id());
}

#[test]
fn command_display() {
    let command = LaunchCommand::new("/venv/bin/python", CandidateKind::VenvInterpreter)
        .args(["-m", "pdf2zh_engine.server"]);
    assert_eq!(command.display(), "/venv/bin/python -m pdf2zh_engine.server");
}

#[test]
fn resolution_error_lists_candidates() {
    let err = ResolutionError {
        tried: vec!["a (not found)".into(), "b (--version failed)".into()],
    };
    assert_eq!(
        err.to_string(),
        "no usable engine command found (tried: a (not found); b (--version failed))"
    );
}

#[tokio::test]
async fn detached_process_reports_exit() {
    let (process, notifier) = WorkerProcess::detached(10);
    assert_eq!(process.pid(), 10);
    assert!(!process.has_exited());
    assert_eq!(process.announced_port(), None);

    notifier.announce(5000);
    assert_eq!(process.announced_port(), Some(5000));

    let waiter = process.clone();
    let handle = tokio::spawn(async move { waiter.wait_exit().await });
    tokio::time::sleep(Duration::from_millis(5)).await;
    notifier.exited(ExitInfo::code(1));

    let info = handle.await.unwrap();
    assert_eq!(info.code, Some(1));
    assert!(process.has_exited());
}

#[tokio::test]
async fn dropped_notifier_counts_as_exit() {
    let (process, notifier) = WorkerProcess::detached(11);
    drop(notifier);
    assert!(process.has_exited());
    assert_eq!(process.wait_exit().await.code, None);
}
