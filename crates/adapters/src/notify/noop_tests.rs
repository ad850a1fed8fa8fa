// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn noop_accepts_everything() {
    let sink = NoOpSink::new();
    sink.notify(Notification::error(None, "ignored", None));
    sink.notify(Notification::error(None, "also ignored", Some("detail".into())));
}
