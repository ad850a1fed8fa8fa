// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launches the engine as a real child process.

use super::{
    CommandResolver, ExitInfo, LaunchCommand, LaunchError, LaunchSpec, OutputLog, ResolutionError,
    WorkerLauncher, WorkerProcess,
};
use async_trait::async_trait;
use pz_core::ReadyLine;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Windows `CREATE_NEW_PROCESS_GROUP`
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Spawns the resolved engine command in its own process group.
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher {
    resolver: CommandResolver,
}

impl ProcessLauncher {
    pub fn new(resolver: CommandResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl WorkerLauncher for ProcessLauncher {
    async fn resolve(&self) -> Result<LaunchCommand, ResolutionError> {
        self.resolver.resolve().await
    }

    async fn launch(
        &self,
        command: &LaunchCommand,
        spec: &LaunchSpec,
    ) -> Result<WorkerProcess, LaunchError> {
        let program = command.program.display().to_string();

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .args(spec.args())
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }
        // Own process group so the whole tree can be signalled at once
        #[cfg(unix)]
        cmd.process_group(0);
        #[cfg(windows)]
        cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);

        let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: program.clone(),
            source,
        })?;
        let Some(pid) = child.id() else {
            return Err(LaunchError::NoPid { program });
        };

        let log = OutputLog::open(&spec.log_dir);
        log.marker(pid);
        tracing::info!(
            pid,
            port = spec.port,
            kind = %command.kind,
            command = %command.display(),
            log = %log.path().display(),
            "engine launched"
        );

        let (process, notifier) = WorkerProcess::detached(pid);
        let notifier = std::sync::Arc::new(notifier);

        if let Some(stdout) = child.stdout.take() {
            let log = log.clone();
            let notifier = std::sync::Arc::clone(&notifier);
            tokio::spawn(pump(stdout, "stdout", log, move |line| {
                if let Some(ready) = ReadyLine::parse(line) {
                    tracing::info!(pid, port = ready.port, "engine announced ready");
                    notifier.announce(ready.port);
                }
            }));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(pump(stderr, "stderr", log, |_| {}));
        }

        // Monitor owns the child and publishes its exit
        tokio::spawn(async move {
            let info = match child.wait().await {
                Ok(status) => ExitInfo::from_status(status),
                Err(e) => {
                    tracing::warn!(pid, error = %e, "failed to wait on engine");
                    ExitInfo {
                        code: None,
                        description: format!("wait failed: {e}"),
                    }
                }
            };
            tracing::info!(pid, status = %info, "engine exited");
            notifier.exited(info);
        });

        Ok(process)
    }
}

/// Copy lines from a child stream into the log until it closes.
async fn pump<R, F>(reader: R, stream: &'static str, log: OutputLog, mut on_line: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                on_line(&line);
                log.append(stream, &line);
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(stream, error = %e, "engine output stream error");
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
