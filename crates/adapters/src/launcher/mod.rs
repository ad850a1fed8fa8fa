// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker command resolution and process launch

mod output_log;
mod process;
mod resolve;

pub use output_log::{
    parse_startup_error, read_startup_error, OutputLog, LAUNCH_MARKER_PREFIX, STDIO_LOG_NAME,
};
pub use process::ProcessLauncher;
pub use resolve::{CommandResolver, ResolveConfig, ENGINE_BINARY_NAME, ENGINE_MODULE};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLauncher, LaunchBehavior};

use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// Where a resolved command came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// Explicitly configured binary path
    Override,
    /// Standalone binary shipped next to the supervisor
    PackagedBinary,
    /// Interpreter from the engine's isolated virtual environment
    VenvInterpreter,
    /// Interpreter found on `PATH`
    SystemInterpreter,
}

impl CandidateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateKind::Override => "override",
            CandidateKind::PackagedBinary => "packaged binary",
            CandidateKind::VenvInterpreter => "venv interpreter",
            CandidateKind::SystemInterpreter => "system interpreter",
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved, runnable worker command (without per-launch arguments)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub kind: CandidateKind,
    pub env: Vec<(String, String)>,
    pub working_dir: Option<PathBuf>,
}

impl LaunchCommand {
    pub fn new(program: impl Into<PathBuf>, kind: CandidateKind) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            kind,
            env: Vec::new(),
            working_dir: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Human-readable command line for logs and errors
    pub fn display(&self) -> String {
        let mut out = self.program.display().to_string();
        for arg in &self.args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }
}

/// Per-launch arguments appended to the resolved command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub port: u16,
    /// Supervising process id; the worker exits when it disappears
    pub ppid: u32,
    pub log_dir: PathBuf,
}

impl LaunchSpec {
    pub fn new(port: u16, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            port,
            ppid: std::process::id(),
            log_dir: log_dir.into(),
        }
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            "--port".to_string(),
            self.port.to_string(),
            "--ppid".to_string(),
            self.ppid.to_string(),
            "--log-dir".to_string(),
            self.log_dir.display().to_string(),
        ]
    }
}

/// No candidate command qualified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no usable engine command found (tried: {})", .tried.join("; "))]
pub struct ResolutionError {
    /// Every candidate considered, with the reason it was rejected
    pub tried: Vec<String>,
}

/// Errors from spawning the worker
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} started but reported no pid")]
    NoPid { program: String },
}

/// How a worker process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitInfo {
    pub code: Option<i32>,
    pub description: String,
}

impl ExitInfo {
    pub fn from_status(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
            description: status.to_string(),
        }
    }

    pub fn code(code: i32) -> Self {
        Self {
            code: Some(code),
            description: format!("exit status: {code}"),
        }
    }

    pub fn signalled() -> Self {
        Self {
            code: None,
            description: "terminated by signal".to_string(),
        }
    }

    fn unknown() -> Self {
        Self {
            code: None,
            description: "exit status unknown".to_string(),
        }
    }
}

impl fmt::Display for ExitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Handle to a launched worker.
///
/// The child itself is owned by a monitor task; this handle observes its
/// exit through a watch channel and can be cloned freely.
#[derive(Debug, Clone)]
pub struct WorkerProcess {
    pid: u32,
    exit: watch::Receiver<Option<ExitInfo>>,
    announced_port: Arc<Mutex<Option<u16>>>,
}

/// Publishing half of a [`WorkerProcess`].
#[derive(Debug)]
pub struct ExitNotifier {
    exit: watch::Sender<Option<ExitInfo>>,
    announced_port: Arc<Mutex<Option<u16>>>,
}

impl ExitNotifier {
    pub fn exited(&self, info: ExitInfo) {
        self.exit.send_replace(Some(info));
    }

    pub fn announce(&self, port: u16) {
        *self.announced_port.lock() = Some(port);
    }
}

impl WorkerProcess {
    /// A handle whose exit is reported through the returned notifier.
    pub fn detached(pid: u32) -> (Self, ExitNotifier) {
        let (tx, rx) = watch::channel(None);
        let announced_port = Arc::new(Mutex::new(None));
        (
            Self {
                pid,
                exit: rx,
                announced_port: Arc::clone(&announced_port),
            },
            ExitNotifier {
                exit: tx,
                announced_port,
            },
        )
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn has_exited(&self) -> bool {
        self.exit.borrow().is_some() || self.exit.has_changed().is_err()
    }

    /// Wait until the process has exited.
    ///
    /// A monitor that disappears without reporting counts as an exit.
    pub async fn wait_exit(&self) -> ExitInfo {
        let mut rx = self.exit.clone();
        let info = match rx.wait_for(Option::is_some).await {
            Ok(info) => info.clone().unwrap_or_else(ExitInfo::unknown),
            Err(_) => ExitInfo::unknown(),
        };
        info
    }

    /// Port from the worker's `ready` line, once printed
    pub fn announced_port(&self) -> Option<u16> {
        *self.announced_port.lock()
    }
}

/// Resolves and launches worker processes
#[async_trait]
pub trait WorkerLauncher: Clone + Send + Sync + 'static {
    /// Pick the command to run, verifying it is usable.
    async fn resolve(&self) -> Result<LaunchCommand, ResolutionError>;

    /// Start `command` with the per-launch arguments from `spec`.
    async fn launch(
        &self,
        command: &LaunchCommand,
        spec: &LaunchSpec,
    ) -> Result<WorkerProcess, LaunchError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
