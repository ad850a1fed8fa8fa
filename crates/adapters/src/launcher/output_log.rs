// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only capture of the worker's stdout/stderr.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Log file name inside the log directory.
pub const STDIO_LOG_NAME: &str = "engine-stdio.log";

/// Marker written before each launch; startup errors are read after the last one.
pub const LAUNCH_MARKER_PREFIX: &str = "--- pz: launching engine (pid: ";

/// Maximum number of lines attached to a startup failure.
const MAX_STARTUP_ERROR_LINES: usize = 20;

struct OutputLogInner {
    path: PathBuf,
    file: Mutex<Option<File>>,
    warned: AtomicBool,
}

/// Timestamped, stream-tagged log of worker output.
///
/// Write failures are reported once at `warn` and otherwise ignored.
#[derive(Clone)]
pub struct OutputLog {
    inner: Arc<OutputLogInner>,
}

impl OutputLog {
    /// Open (or create) `<log_dir>/engine-stdio.log` for appending.
    pub fn open(log_dir: &Path) -> Self {
        let path = log_dir.join(STDIO_LOG_NAME);
        let log = Self {
            inner: Arc::new(OutputLogInner {
                path: path.clone(),
                file: Mutex::new(None),
                warned: AtomicBool::new(false),
            }),
        };
        let opened = std::fs::create_dir_all(log_dir)
            .and_then(|()| OpenOptions::new().create(true).append(true).open(&path));
        match opened {
            Ok(file) => *log.inner.file.lock() = Some(file),
            Err(e) => log.warn_once(&e),
        }
        log
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Record the start of a launch.
    pub fn marker(&self, pid: u32) {
        self.write_raw(&format!("{LAUNCH_MARKER_PREFIX}{pid}) ---\n"));
    }

    /// Append one line of worker output.
    pub fn append(&self, stream: &str, line: &str) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        self.write_raw(&format!("{timestamp} [{stream}] {line}\n"));
    }

    fn write_raw(&self, text: &str) {
        let mut guard = self.inner.file.lock();
        let Some(file) = guard.as_mut() else {
            return;
        };
        if let Err(e) = file.write_all(text.as_bytes()) {
            // Stop trying once the sink is broken
            *guard = None;
            drop(guard);
            self.warn_once(&e);
        }
    }

    fn warn_once(&self, error: &std::io::Error) {
        if !self.inner.warned.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                path = %self.inner.path.display(),
                error = %error,
                "engine output log unavailable, discarding output"
            );
        }
    }
}

/// Read the stdio log in `log_dir` and extract errors from the last launch.
pub fn read_startup_error(log_dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(log_dir.join(STDIO_LOG_NAME)).ok()?;
    parse_startup_error(&content)
}

/// Extract error lines logged since the last launch marker (pure logic, no I/O).
///
/// A Python traceback is kept from its header onward; other lines qualify
/// when they carry an error level or an `Error:` message.
pub fn parse_startup_error(content: &str) -> Option<String> {
    let start_pos = content.rfind(LAUNCH_MARKER_PREFIX)?;
    let launch_log = &content[start_pos..];

    let mut in_traceback = false;
    let mut errors: Vec<&str> = Vec::new();
    for line in launch_log.lines().skip(1) {
        let message = strip_prefix(line);
        if message.starts_with("Traceback") {
            in_traceback = true;
        }
        if in_traceback
            || message.contains(" ERROR ")
            || message.starts_with("ERROR")
            || message.contains("Error:")
        {
            errors.push(message);
        }
    }

    if errors.is_empty() {
        return None;
    }
    let skip = errors.len().saturating_sub(MAX_STARTUP_ERROR_LINES);
    Some(errors[skip..].join("\n"))
}

/// Drop the `<timestamp> [stream] ` prefix written by [`OutputLog::append`].
fn strip_prefix(line: &str) -> &str {
    match line.split_once("] ") {
        Some((head, rest)) if head.contains(" [") => rest,
        _ => line,
    }
}

#[cfg(test)]
#[path = "output_log_tests.rs"]
mod tests;
