// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pz-core: protocol and domain types shared by the pz supervisor and CLI

pub mod clock;
pub mod event;
pub mod id;
pub mod job;
pub mod notification;
pub mod protocol;
pub mod worker;

pub use clock::{Clock, FakeClock, SystemClock};
pub use event::WorkerEvent;
pub use job::JobId;
pub use notification::{DoneNotice, ErrorNotice, Notification, ProgressNotice};
pub use protocol::{
    HealthReport, ProtocolError, ReadyLine, ResultPayload, ResultResponse, SubmitResponse,
    TranslateRequest, TranslateService, JOB_NOT_FINISHED,
};
pub use worker::WorkerState;
