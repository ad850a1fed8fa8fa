// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pz result` - fetch a finished job's PDF from a running engine.

use std::path::PathBuf;

use anyhow::{bail, Result};
use pz_core::{JobId, ResultResponse};
use pz_supervisor::{SupervisorConfig, SystemBridge};

use crate::color;
use crate::exit_error::{ExitError, JOB_FAILED};
use crate::output::{print_json, write_result, OutputFormat};

#[derive(clap::Args)]
pub struct ResultArgs {
    /// Job ID returned when the job was submitted
    pub job_id: String,

    /// Directory for the translated PDF
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

pub async fn handle(
    args: ResultArgs,
    config: SupervisorConfig,
    format: OutputFormat,
) -> Result<()> {
    // Jobs live only in the engine's memory; a fresh launch could never know them.
    if super::probe_engine(&config).await.is_none() {
        bail!("engine not running on port {}", config.port);
    }

    let job_id = JobId::new(args.job_id);
    let bridge = SystemBridge::system(config);
    let response = bridge.pull_result(&job_id).await?;

    match classify(&response) {
        Pulled::Ready => {
            let Some(payload) = response.payload() else {
                bail!("engine returned an incomplete result for job {job_id}");
            };
            let path = write_result(&payload, &args.out_dir)?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({ "saved": path }))?,
                OutputFormat::Text => println!("{} {}", color::status("done"), path.display()),
            }
            Ok(())
        }
        Pulled::Pending => {
            match format {
                OutputFormat::Json => print_json(&response)?,
                OutputFormat::Text => println!("Job {job_id}: {}", color::status("pending")),
            }
            Ok(())
        }
        Pulled::Failed => {
            let mut message = format!("job {job_id} failed: {}", response.error_message());
            if let Some(detail) = &response.detail {
                message.push('\n');
                message.push_str(detail);
            }
            Err(ExitError::new(JOB_FAILED, message).into())
        }
    }
}

#[derive(Debug, PartialEq)]
enum Pulled {
    Ready,
    Pending,
    Failed,
}

fn classify(response: &ResultResponse) -> Pulled {
    if response.is_pending() {
        Pulled::Pending
    } else if response.ok {
        Pulled::Ready
    } else {
        Pulled::Failed
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
