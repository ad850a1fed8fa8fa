// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::launcher::{LaunchBehavior, LaunchSpec, WorkerLauncher};

async fn launch(launcher: &FakeLauncher) -> WorkerProcess {
    let command = launcher.resolve().await.unwrap();
    launcher
        .launch(&command, &LaunchSpec::new(1, "/tmp"))
        .await
        .unwrap()
}

#[tokio::test]
async fn linked_terminator_exits_process() {
    let launcher = FakeLauncher::new(LaunchBehavior::NeverHealthy);
    let terminator = FakeTerminator::new().with_launcher(launcher.clone());
    let process = launch(&launcher).await;

    let outcome = terminator.terminate_tree(&process, Duration::from_secs(1)).await;
    assert_eq!(outcome, TerminateOutcome::Graceful);
    assert!(process.has_exited());
    assert_eq!(terminator.calls(), vec![process.pid()]);

    let again = terminator.terminate_tree(&process, Duration::from_secs(1)).await;
    assert_eq!(again, TerminateOutcome::AlreadyExited);
    assert_eq!(terminator.calls(), vec![process.pid(), process.pid()]);
}

#[tokio::test(start_paused = true)]
async fn ignoring_term_waits_out_grace() {
    let launcher = FakeLauncher::new(LaunchBehavior::NeverHealthy);
    let terminator = FakeTerminator::new().with_launcher(launcher.clone());
    terminator.set_ignore_term(true);
    let process = launch(&launcher).await;

    let start = tokio::time::Instant::now();
    let outcome = terminator
        .terminate_tree(&process, Duration::from_millis(1500))
        .await;
    assert_eq!(outcome, TerminateOutcome::Forced);
    assert_eq!(start.elapsed(), Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn zero_grace_kills_without_waiting() {
    let launcher = FakeLauncher::new(LaunchBehavior::NeverHealthy);
    let terminator = FakeTerminator::new().with_launcher(launcher.clone());
    terminator.set_ignore_term(true);
    let process = launch(&launcher).await;

    let start = tokio::time::Instant::now();
    let outcome = terminator.terminate_tree(&process, Duration::ZERO).await;
    assert_eq!(outcome, TerminateOutcome::Forced);
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(process.has_exited());
}
