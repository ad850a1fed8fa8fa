// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File logging for the CLI process. Stdout stays reserved for user output.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

pub const LOG_FILE_NAME: &str = "pz.log";

/// Install a non-blocking subscriber writing to `<log_dir>/pz.log`.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. Keep the guard
/// alive for the life of the process so buffered lines are flushed.
pub fn init(log_dir: &Path) -> std::io::Result<WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .map_err(std::io::Error::other)?;

    Ok(guard)
}
