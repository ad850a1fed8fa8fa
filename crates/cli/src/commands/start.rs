// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pz start` - run the engine in the foreground until Ctrl+C.

use std::time::Duration;

use anyhow::{bail, Result};
use pz_core::WorkerState;
use pz_supervisor::{SupervisorConfig, SupervisorStatus, SystemBridge};

use crate::color;
use crate::output::{print_json, OutputFormat};

/// How often the foreground loop checks that the engine is still up.
const WATCH_INTERVAL: Duration = Duration::from_secs(1);

pub async fn handle(config: SupervisorConfig, format: OutputFormat) -> Result<()> {
    let bridge = SystemBridge::system(config);
    bridge.ensure_ready().await?;

    let status = bridge.status();
    print_status(&status, format)?;
    if status.adopted {
        // Owned by another process; nothing for us to supervise.
        return Ok(());
    }

    let mut ticker = tokio::time::interval(WATCH_INTERVAL);
    let lost = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break None,
            _ = ticker.tick() => {
                let status = bridge.status();
                if status.state != WorkerState::Ready {
                    break Some(status);
                }
            }
        }
    };

    bridge.shutdown().await;
    if let Some(status) = lost {
        let reason = status
            .last_error
            .unwrap_or_else(|| "engine stopped".to_string());
        bail!("{reason}");
    }
    if format == OutputFormat::Text {
        println!("Engine {}", color::status("stopped"));
    }
    Ok(())
}

fn print_status(status: &SupervisorStatus, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(status)?,
        OutputFormat::Text => println!("{}", format_started(status)),
    }
    Ok(())
}

fn format_started(status: &SupervisorStatus) -> String {
    let pid = status
        .pid
        .map_or_else(|| "?".to_string(), |pid| pid.to_string());
    if status.adopted {
        format!(
            "Engine already running (pid: {pid}, port: {}); not managed by this process",
            status.port
        )
    } else {
        format!(
            "Engine {} (pid: {pid}, port: {}). Press Ctrl+C to stop.",
            color::status("ready"),
            status.port
        )
    }
}

#[cfg(test)]
#[path = "start_tests.rs"]
mod tests;
