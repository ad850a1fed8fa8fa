// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pz status` - report whether an engine answers on the well-known port.

use anyhow::Result;
use pz_core::HealthReport;
use pz_supervisor::SupervisorConfig;
use serde::Serialize;

use crate::color;
use crate::output::{print_json, OutputFormat};

#[derive(Debug, Serialize, PartialEq)]
struct StatusReport {
    status: &'static str,
    port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pid: Option<u32>,
    log_dir: String,
}

pub async fn handle(config: &SupervisorConfig, format: OutputFormat) -> Result<()> {
    let health = super::probe_engine(config).await;
    let report = build_report(config, health.as_ref());
    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            println!("{}", format_text(&report));
            println!("Logs:   {}", color::muted(&report.log_dir));
        }
    }
    Ok(())
}

fn build_report(config: &SupervisorConfig, health: Option<&HealthReport>) -> StatusReport {
    StatusReport {
        status: if health.is_some() { "running" } else { "not running" },
        port: config.port,
        pid: health.map(|h| h.pid),
        log_dir: config.log_dir.display().to_string(),
    }
}

fn format_text(report: &StatusReport) -> String {
    let state = color::status(report.status);
    match report.pid {
        Some(pid) => format!("Engine: {state} (pid: {pid}, port: {})", report.port),
        None => format!("Engine: {state} (port: {})", report.port),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
