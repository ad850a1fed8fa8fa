// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Translation job identity.

crate::define_id! {
    /// Worker-assigned job identifier.
    ///
    /// The sole correlation key between submissions, stream events and
    /// result queries. Never reused for a second submission.
    pub struct JobId;
}
