// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the supervisor crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::ConfigError;

// --- Parse helpers (private) ---

fn parse_duration_ms(var: &str) -> Option<Duration> {
    parse(var).map(Duration::from_millis)
}

fn parse<T: std::str::FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.is_empty())
}

// --- State directory ---

/// Resolve state directory: PZ_STATE_DIR > XDG_STATE_HOME/pz > ~/.local/state/pz
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = non_empty("PZ_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("pz"));
    }
    let home = non_empty("HOME").ok_or(ConfigError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/pz"))
}

// --- Engine ---

pub fn engine_port() -> Option<u16> {
    parse("PZ_ENGINE_PORT")
}

pub fn engine_binary() -> Option<PathBuf> {
    non_empty("PZ_ENGINE_BINARY").map(PathBuf::from)
}

pub fn engine_root() -> Option<PathBuf> {
    non_empty("PZ_ENGINE_ROOT").map(PathBuf::from)
}

pub fn python() -> Option<String> {
    non_empty("PZ_PYTHON")
}

// --- Timeouts ---

pub fn timeout_probe_ms() -> Option<Duration> {
    parse_duration_ms("PZ_TIMEOUT_PROBE_MS")
}
pub fn timeout_start_ms() -> Option<Duration> {
    parse_duration_ms("PZ_TIMEOUT_START_MS")
}
pub fn health_poll_ms() -> Option<Duration> {
    parse_duration_ms("PZ_HEALTH_POLL_MS")
}
pub fn kill_grace_ms() -> Option<Duration> {
    parse_duration_ms("PZ_KILL_GRACE_MS")
}
pub fn result_retry_ms() -> Option<Duration> {
    parse_duration_ms("PZ_RESULT_RETRY_MS")
}
pub fn result_attempts() -> Option<u32> {
    parse("PZ_RESULT_ATTEMPTS")
}
