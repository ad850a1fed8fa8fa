// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine command resolution.
//!
//! Candidates, in order: an explicit override (authoritative when set), a
//! standalone binary packaged next to the supervisor, the engine checkout's
//! virtual-environment interpreter, then interpreters on `PATH`. Every
//! rejected candidate is recorded so the operator can see what was tried.

use super::{CandidateKind, LaunchCommand, ResolutionError};
use crate::subprocess::{succeeds, VERSION_CHECK_TIMEOUT};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// File name of the packaged standalone engine.
pub const ENGINE_BINARY_NAME: &str = if cfg!(windows) {
    "pdf2zh-engine.exe"
} else {
    "pdf2zh-engine"
};

/// Python module that runs the engine's HTTP server.
pub const ENGINE_MODULE: &str = "pdf2zh_engine.server";

/// Inputs to command resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveConfig {
    /// Explicit engine executable; disables every other candidate
    pub binary_override: Option<PathBuf>,
    /// Directory searched for the packaged engine binary
    pub packaged_dir: Option<PathBuf>,
    /// Engine source checkout containing `.venv` and `src/`
    pub engine_root: Option<PathBuf>,
    /// Interpreter to use instead of `python3`/`python`
    pub python: Option<String>,
}

impl ResolveConfig {
    /// Search next to the running executable for a packaged engine.
    pub fn beside_current_exe(mut self) -> Self {
        self.packaged_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        self
    }
}

/// Walks the candidate list and returns the first usable command.
#[derive(Debug, Clone, Default)]
pub struct CommandResolver {
    config: ResolveConfig,
}

impl CommandResolver {
    pub fn new(config: ResolveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    pub async fn resolve(&self) -> Result<LaunchCommand, ResolutionError> {
        let mut tried = Vec::new();

        if let Some(path) = &self.config.binary_override {
            if path.is_file() {
                return Ok(LaunchCommand::new(path, CandidateKind::Override));
            }
            tried.push(format!("{}: {} (not found)", CandidateKind::Override, path.display()));
            return Err(ResolutionError { tried });
        }

        if let Some(dir) = &self.config.packaged_dir {
            let path = dir.join(ENGINE_BINARY_NAME);
            if path.is_file() {
                return Ok(LaunchCommand::new(path, CandidateKind::PackagedBinary));
            }
            tried.push(format!(
                "{}: {} (not found)",
                CandidateKind::PackagedBinary,
                path.display()
            ));
        }

        if let Some(root) = &self.config.engine_root {
            let path = venv_python(root);
            if path.is_file() {
                return Ok(LaunchCommand::new(path, CandidateKind::VenvInterpreter)
                    .args(["-m", ENGINE_MODULE])
                    .working_dir(root));
            }
            tried.push(format!(
                "{}: {} (not found)",
                CandidateKind::VenvInterpreter,
                path.display()
            ));
        }

        let interpreters: Vec<String> = match &self.config.python {
            Some(python) => vec![python.clone()],
            None => vec!["python3".to_string(), "python".to_string()],
        };
        for interpreter in interpreters {
            let mut check = Command::new(&interpreter);
            check.arg("--version");
            if succeeds(check, VERSION_CHECK_TIMEOUT, &format!("{interpreter} --version")).await {
                let mut command = LaunchCommand::new(&interpreter, CandidateKind::SystemInterpreter)
                    .args(["-m", ENGINE_MODULE]);
                if let Some(root) = &self.config.engine_root {
                    command = command
                        .env("PYTHONPATH", root.join("src").display().to_string())
                        .working_dir(root);
                }
                return Ok(command);
            }
            tried.push(format!(
                "{}: {} (--version failed)",
                CandidateKind::SystemInterpreter,
                interpreter
            ));
        }

        tracing::warn!(tried = ?tried, "no engine command resolved");
        Err(ResolutionError { tried })
    }
}

fn venv_python(root: &Path) -> PathBuf {
    if cfg!(windows) {
        root.join(".venv").join("Scripts").join("python.exe")
    } else {
        root.join(".venv").join("bin").join("python")
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
