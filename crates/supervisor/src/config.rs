// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor configuration.
//!
//! Values come from the environment, then `<state>/config.toml`, then
//! built-in defaults, in that order of precedence.

use crate::env;
use crate::fetch::RetryPolicy;
use pz_adapters::{PollPolicy, ResolveConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Well-known engine port, probed before any launch.
pub const DEFAULT_PORT: u16 = 18321;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine state directory (set PZ_STATE_DIR or HOME)")]
    NoStateDir,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Effective supervisor settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Root state directory (e.g. ~/.local/state/pz)
    pub state_dir: PathBuf,
    /// Passed to the engine as `--log-dir`; also holds the stdio capture
    pub log_dir: PathBuf,
    pub port: u16,
    /// Bound on a single health probe
    pub probe_timeout: Duration,
    /// Startup health polling: interval and overall deadline
    pub poll: PollPolicy,
    /// Wait between the polite signal and the forced kill
    pub kill_grace: Duration,
    pub retry: RetryPolicy,
    pub resolve: ResolveConfig,
}

impl SupervisorConfig {
    /// Built-in defaults rooted at `state_dir`.
    pub fn with_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            log_dir: state_dir.join("logs"),
            state_dir,
            port: DEFAULT_PORT,
            probe_timeout: pz_adapters::health::DEFAULT_PROBE_TIMEOUT,
            poll: PollPolicy::default(),
            kill_grace: Duration::from_millis(1500),
            retry: RetryPolicy::default(),
            resolve: ResolveConfig::default().beside_current_exe(),
        }
    }

    /// Load configuration for the current user.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(env::state_dir()?)
    }

    /// Load from an explicit state directory, still honouring env overrides.
    pub fn load_from(state_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let state_dir = state_dir.into();
        let file = ConfigFile::read(&state_dir.join(CONFIG_FILE_NAME))?;
        let mut config = Self::with_state_dir(state_dir);
        config.apply_file(file);
        config.apply_env();
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        let ConfigFile { engine, timeouts } = file;
        if let Some(port) = engine.port {
            self.port = port;
        }
        if engine.binary.is_some() {
            self.resolve.binary_override = engine.binary;
        }
        if engine.python.is_some() {
            self.resolve.python = engine.python;
        }
        if engine.root.is_some() {
            self.resolve.engine_root = engine.root;
        }
        if let Some(ms) = timeouts.probe_ms {
            self.probe_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = timeouts.start_ms {
            self.poll.deadline = Duration::from_millis(ms);
        }
        if let Some(ms) = timeouts.poll_ms {
            self.poll.interval = Duration::from_millis(ms);
        }
        if let Some(ms) = timeouts.kill_grace_ms {
            self.kill_grace = Duration::from_millis(ms);
        }
        if let Some(ms) = timeouts.result_retry_ms {
            self.retry.delay = Duration::from_millis(ms);
        }
        if let Some(attempts) = timeouts.result_attempts {
            self.retry.attempts = attempts;
        }
    }

    fn apply_env(&mut self) {
        if let Some(port) = env::engine_port() {
            self.port = port;
        }
        if let Some(binary) = env::engine_binary() {
            self.resolve.binary_override = Some(binary);
        }
        if let Some(python) = env::python() {
            self.resolve.python = Some(python);
        }
        if let Some(root) = env::engine_root() {
            self.resolve.engine_root = Some(root);
        }
        if let Some(d) = env::timeout_probe_ms() {
            self.probe_timeout = d;
        }
        if let Some(d) = env::timeout_start_ms() {
            self.poll.deadline = d;
        }
        if let Some(d) = env::health_poll_ms() {
            self.poll.interval = d;
        }
        if let Some(d) = env::kill_grace_ms() {
            self.kill_grace = d;
        }
        if let Some(d) = env::result_retry_ms() {
            self.retry.delay = d;
        }
        if let Some(n) = env::result_attempts() {
            self.retry.attempts = n;
        }
    }
}

/// On-disk `config.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    engine: EngineSection,
    timeouts: TimeoutSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EngineSection {
    port: Option<u16>,
    binary: Option<PathBuf>,
    python: Option<String>,
    root: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TimeoutSection {
    probe_ms: Option<u64>,
    start_ms: Option<u64>,
    poll_ms: Option<u64>,
    kill_grace_ms: Option<u64>,
    result_retry_ms: Option<u64>,
    result_attempts: Option<u32>,
}

impl ConfigFile {
    /// A missing file is an empty config.
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
