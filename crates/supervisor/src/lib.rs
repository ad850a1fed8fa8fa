// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Engine lifecycle supervision and per-job event relay.
//!
//! [`Supervisor`] owns the single engine instance: it reuses a healthy
//! engine on the well-known port, otherwise launches one, and tears the
//! whole process tree down on shutdown. [`JobRelay`] turns each job's event
//! stream into ordered [`pz_core::Notification`]s and drives the result
//! fetch once the engine reports completion. [`Bridge`] combines the two.

pub mod bridge;
pub mod config;
pub mod env;
pub mod error;
pub mod fetch;
pub mod frame;
pub mod relay;
pub mod supervisor;

pub use bridge::{Bridge, SystemBridge};
pub use config::{ConfigError, SupervisorConfig, CONFIG_FILE_NAME, DEFAULT_PORT};
pub use error::{BridgeError, RelayError, StartError};
pub use fetch::{fetch_result_with_retry, FetchOutcome, RetryPolicy};
pub use frame::FrameBuffer;
pub use relay::{FixedPort, JobOutcome, JobRelay, JobSubscription, PortSource, RelayOutcome};
pub use supervisor::{Supervisor, SupervisorDeps, SupervisorStatus};
