// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pz - PDF translation engine supervisor CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod color;
mod commands;
mod env;
mod exit_error;
mod logging;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use commands::{logs, result, start, status, stop, translate};
use output::OutputFormat;
use pz_supervisor::SupervisorConfig;

#[derive(Parser)]
#[command(
    name = "pz",
    version,
    about = "pz - translate PDFs with a supervised local engine"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a PDF, starting the engine if needed
    Translate(translate::TranslateArgs),
    /// Show whether an engine answers on the well-known port
    Status,
    /// Run the engine in the foreground until interrupted
    Start,
    /// Stop the engine answering on the well-known port
    Stop,
    /// Fetch a job's result directly from the engine
    Result(result::ResultArgs),
    /// Show recent engine output
    Logs(logs::LogsArgs),
}

pub(crate) fn cli_command() -> clap::Command {
    Cli::command()
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level message already contains every source message, the
/// chain is skipped; otherwise it is rendered like anyhow's Debug.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let Some(command) = cli.command else {
        // No subcommand: print help and exit 0
        cli_command().print_help()?;
        println!();
        return Ok(());
    };

    let config = SupervisorConfig::load()?;
    let _log_guard = match logging::init(&config.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: file logging disabled: {e}");
            None
        }
    };
    tracing::debug!(state_dir = %config.state_dir.display(), port = config.port, "pz starting");

    match command {
        Commands::Translate(args) => translate::handle(args, config, format).await,
        Commands::Status => status::handle(&config, format).await,
        Commands::Start => start::handle(config, format).await,
        Commands::Stop => stop::handle(&config, format).await,
        Commands::Result(args) => result::handle(args, config, format).await,
        Commands::Logs(args) => logs::handle(args, &config, format),
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
