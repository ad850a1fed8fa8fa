// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pz translate` - start the engine if needed, run one job, save the PDF.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use pz_core::{Notification, ResultPayload, TranslateRequest, TranslateService};
use pz_supervisor::{JobOutcome, SupervisorConfig, SystemBridge};

use crate::color;
use crate::exit_error::{ExitError, INTERRUPTED, JOB_FAILED};
use crate::output::{format_progress, write_result, OutputFormat};

#[derive(clap::Args)]
pub struct TranslateArgs {
    /// PDF to translate
    pub file: PathBuf,

    /// Translation backend (google, bing)
    #[arg(long, short = 's', default_value = "google")]
    pub service: TranslateService,

    /// Worker threads the engine may use for this job
    #[arg(long, short = 't', default_value_t = TranslateRequest::DEFAULT_THREADS)]
    pub threads: u32,

    /// Directory for the translated PDF (defaults to the source's directory)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Leave a launched engine running after the job
    #[arg(long)]
    pub keep_engine: bool,
}

pub async fn handle(
    args: TranslateArgs,
    config: SupervisorConfig,
    format: OutputFormat,
) -> Result<()> {
    let source = resolve_source(&args.file)?;
    let out_dir = output_dir(&source, args.out_dir.as_deref());
    let request = TranslateRequest::for_file(&source, args.service).with_threads(args.threads);

    let bridge = SystemBridge::system(config);
    let outcome = tokio::select! {
        outcome = run_job(&bridge, &request, format) => outcome,
        _ = tokio::signal::ctrl_c() => Err(ExitError::new(INTERRUPTED, "interrupted").into()),
    };
    if !args.keep_engine {
        bridge.shutdown().await;
    }

    let payload = outcome?;
    let path = write_result(&payload, &out_dir)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "saved": path })),
        OutputFormat::Text => println!("{} {}", color::status("done"), path.display()),
    }
    Ok(())
}

async fn run_job(
    bridge: &SystemBridge,
    request: &TranslateRequest,
    format: OutputFormat,
) -> Result<ResultPayload> {
    let subscription = bridge.translate(request).await?;
    let job_id = subscription.job_id().clone();
    if format == OutputFormat::Text {
        println!("{} {job_id}", color::header("Job:"));
    }

    let outcome = subscription
        .finish(|notification| print_notification(notification, format))
        .await;
    match outcome {
        JobOutcome::Completed(payload) => Ok(payload),
        JobOutcome::Failed { message, detail } => {
            let message = match detail {
                Some(detail) => format!("job {job_id} failed: {message}\n{detail}"),
                None => format!("job {job_id} failed: {message}"),
            };
            Err(ExitError::new(JOB_FAILED, message).into())
        }
        JobOutcome::Abandoned => {
            bail!("engine closed the event stream for job {job_id} without finishing it")
        }
    }
}

fn print_notification(notification: &Notification, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(line) = serde_json::to_string(notification) {
                println!("{line}");
            }
        }
        OutputFormat::Text => {
            if let Notification::Progress(progress) = notification {
                println!("{}", format_progress(progress));
                let _ = std::io::stdout().flush();
            }
        }
    }
}

fn resolve_source(file: &Path) -> Result<PathBuf> {
    let source = std::fs::canonicalize(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    if !source.is_file() {
        bail!("not a file: {}", file.display());
    }
    Ok(source)
}

fn output_dir(source: &Path, requested: Option<&Path>) -> PathBuf {
    match requested {
        Some(dir) => dir.to_path_buf(),
        None => source
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    }
}

#[cfg(test)]
#[path = "translate_tests.rs"]
mod tests;
