// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pz logs` - show the tail of the engine or CLI log.

use std::path::PathBuf;

use anyhow::Result;
use pz_adapters::STDIO_LOG_NAME;
use pz_supervisor::SupervisorConfig;

use crate::logging::LOG_FILE_NAME;
use crate::output::{print_json, read_last_lines, OutputFormat};

#[derive(clap::Args)]
pub struct LogsArgs {
    /// Number of lines to show
    #[arg(short = 'n', long, default_value_t = 50)]
    pub lines: usize,

    /// Show the CLI's own log instead of the engine output
    #[arg(long)]
    pub cli: bool,
}

pub fn handle(args: LogsArgs, config: &SupervisorConfig, format: OutputFormat) -> Result<()> {
    let path = log_path(&args, config);
    let content = if path.exists() {
        read_last_lines(&path, args.lines)?
    } else {
        String::new()
    };

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "log_path": path,
            "content": content,
        }))?,
        OutputFormat::Text => {
            if content.is_empty() {
                println!("No log entries ({})", path.display());
            } else {
                println!("{content}");
            }
        }
    }
    Ok(())
}

fn log_path(args: &LogsArgs, config: &SupervisorConfig) -> PathBuf {
    let name = if args.cli { LOG_FILE_NAME } else { STDIO_LOG_NAME };
    config.log_dir.join(name)
}

#[cfg(test)]
#[path = "logs_tests.rs"]
mod tests;
