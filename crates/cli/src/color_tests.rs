// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use yare::parameterized;

#[test]
#[serial]
fn header_produces_ansi_when_color_forced() {
    std::env::set_var("COLOR", "1");
    std::env::remove_var("NO_COLOR");

    let result = header("foo");
    assert!(result.contains("\x1b[38;5;74m"), "expected ANSI header color");
    assert!(result.contains("foo"));
    assert!(result.contains("\x1b[0m"), "expected ANSI reset");
}

#[test]
#[serial]
fn no_color_wins_over_color() {
    std::env::set_var("COLOR", "1");
    std::env::set_var("NO_COLOR", "1");

    assert_eq!(muted("bar"), "bar");
    assert_eq!(status("ready"), "ready");

    std::env::remove_var("NO_COLOR");
    std::env::remove_var("COLOR");
}

#[parameterized(
    ready = { "ready", "\x1b[32m" },
    running = { "running (pid 42)", "\x1b[32m" },
    starting = { "starting", "\x1b[33m" },
    not_running = { "not running", "\x1b[33m" },
    failed = { "failed: engine exited", "\x1b[31m" },
)]
fn status_colors_by_first_word(text: &str, code: &str) {
    assert_eq!(apply_status(text), format!("{code}{text}\x1b[0m"));
}

#[test]
fn unknown_status_is_left_plain() {
    assert_eq!(apply_status("mystery"), "mystery");
}
