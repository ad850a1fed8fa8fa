// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod logs;
pub mod result;
pub mod start;
pub mod status;
pub mod stop;
pub mod translate;

use pz_adapters::{HealthProbe, HttpHealthProbe};
use pz_core::HealthReport;
use pz_supervisor::SupervisorConfig;

/// Probe the configured port once, without launching anything.
pub(crate) async fn probe_engine(config: &SupervisorConfig) -> Option<HealthReport> {
    HttpHealthProbe::new(config.probe_timeout)
        .check(config.port)
        .await
}
