// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use anyhow::{anyhow, Context, Result};
use base64::Engine as _;
use clap::ValueEnum;
use pz_core::{ProgressNotice, ResultPayload};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One progress line, e.g. `[ 42%] translate: page 3/8`.
pub fn format_progress(progress: &ProgressNotice) -> String {
    let pct = progress.pct.clamp(0.0, 100.0);
    let mut line = format!("[{pct:>3.0}%]");
    match (progress.stage.is_empty(), progress.message.is_empty()) {
        (true, true) => {}
        (false, true) => line.push_str(&format!(" {}", progress.stage)),
        (true, false) => line.push_str(&format!(" {}", progress.message)),
        (false, false) => line.push_str(&format!(" {}: {}", progress.stage, progress.message)),
    }
    line
}

/// Decode a result payload and write it into `out_dir`.
///
/// Only the final path component of the engine-supplied file name is used.
pub fn write_result(payload: &ResultPayload, out_dir: &Path) -> Result<PathBuf> {
    let name = Path::new(&payload.filename)
        .file_name()
        .ok_or_else(|| anyhow!("engine returned an invalid file name: {:?}", payload.filename))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.encoded_content.trim())
        .context("engine returned undecodable PDF content")?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let path = out_dir.join(name);
    std::fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Last `n` lines of a file.
pub fn read_last_lines(path: &Path, n: usize) -> Result<String> {
    use std::io::{BufRead, BufReader};
    let file = std::fs::File::open(path)?;
    let lines: Vec<String> = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<_>>()?;
    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].join("\n"))
}
