// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the worker process, its HTTP endpoint, and
//! the notification sink.

pub mod client;
pub mod health;
pub mod launcher;
pub mod notify;
pub mod subprocess;
pub mod terminate;
pub mod traced;

#[cfg(test)]
mod test_helpers;

pub use client::{
    EventStream, FetchError, HttpWorkerClient, SubmitError, TransportError, WorkerClient,
};
pub use health::{wait_until_healthy, HealthProbe, HttpHealthProbe, PollPolicy};
pub use launcher::{
    CandidateKind, CommandResolver, ExitInfo, ExitNotifier, LaunchCommand, LaunchError,
    LaunchSpec, OutputLog, ProcessLauncher, ResolutionError, ResolveConfig, WorkerLauncher,
    WorkerProcess, STDIO_LOG_NAME,
};
pub use notify::{ChannelSink, NoOpSink, NotifySink};
pub use terminate::{ProcessTerminator, SystemTerminator, TerminateOutcome};
pub use traced::{TracedLauncher, TracedWorkerClient};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use client::{FakeWorkerClient, WorkerCall};
#[cfg(any(test, feature = "test-support"))]
pub use health::FakeHealthProbe;
#[cfg(any(test, feature = "test-support"))]
pub use launcher::{FakeLauncher, LaunchBehavior};
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeSink;
#[cfg(any(test, feature = "test-support"))]
pub use terminate::FakeTerminator;
