// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pz stop` - stop whatever engine answers on the well-known port.

use anyhow::Result;
use pz_adapters::{SystemTerminator, TerminateOutcome};
use pz_supervisor::SupervisorConfig;

use crate::output::{print_json, OutputFormat};

pub async fn handle(config: &SupervisorConfig, format: OutputFormat) -> Result<()> {
    let Some(health) = super::probe_engine(config).await else {
        match format {
            OutputFormat::Json => print_json(&serde_json::json!({ "stopped": false }))?,
            OutputFormat::Text => println!("Engine not running"),
        }
        return Ok(());
    };

    tracing::info!(pid = health.pid, port = config.port, "stopping engine");
    let outcome = SystemTerminator::new()
        .terminate_pid(health.pid, config.kill_grace)
        .await;
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "stopped": true,
            "pid": health.pid,
            "outcome": outcome.to_string(),
        }))?,
        OutputFormat::Text => println!("{}", format_stopped(health.pid, outcome)),
    }
    Ok(())
}

fn format_stopped(pid: u32, outcome: TerminateOutcome) -> String {
    match outcome {
        TerminateOutcome::Graceful => format!("Engine stopped (pid: {pid})"),
        TerminateOutcome::Forced => format!("Engine killed (pid: {pid}) after ignoring SIGTERM"),
        TerminateOutcome::AlreadyExited => format!("Engine (pid: {pid}) had already exited"),
    }
}

#[cfg(test)]
#[path = "stop_tests.rs"]
mod tests;
