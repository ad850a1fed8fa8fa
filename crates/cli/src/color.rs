// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal colouring for text output. JSON output is never coloured.

use std::io::IsTerminal;

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    /// Labels such as `Job:` (steel blue)
    Header,
    /// Paths and other secondary detail (dark grey)
    Muted,
    Good,
    Waiting,
    Bad,
}

impl Tone {
    fn sgr(self) -> &'static str {
        match self {
            Tone::Header => "\x1b[38;5;74m",
            Tone::Muted => "\x1b[38;5;240m",
            Tone::Good => "\x1b[32m",
            Tone::Waiting => "\x1b[33m",
            Tone::Bad => "\x1b[31m",
        }
    }

    /// Tone for an engine or job state, keyed on its first word.
    fn for_state(text: &str) -> Option<Tone> {
        let lower = text.trim_start().to_lowercase();
        let word = lower.split(|c: char| !c.is_alphabetic()).next()?;
        match word {
            "running" | "ready" | "done" | "stopped" => Some(Tone::Good),
            "idle" | "starting" | "stopping" | "pending" | "not" => Some(Tone::Waiting),
            "failed" | "error" => Some(Tone::Bad),
            _ => None,
        }
    }
}

/// `NO_COLOR=1` disables, then `COLOR=1` forces, then stdout must be a TTY.
pub fn should_colorize() -> bool {
    if crate::env::no_color() {
        return false;
    }
    crate::env::force_color() || std::io::stdout().is_terminal()
}

fn paint(tone: Tone, text: &str) -> String {
    format!("{}{text}{RESET}", tone.sgr())
}

fn paint_if_enabled(tone: Tone, text: &str) -> String {
    if should_colorize() {
        paint(tone, text)
    } else {
        text.to_string()
    }
}

pub fn header(text: &str) -> String {
    paint_if_enabled(Tone::Header, text)
}

pub fn muted(text: &str) -> String {
    paint_if_enabled(Tone::Muted, text)
}

/// Colour a state word such as `ready` or `not running`.
pub fn status(text: &str) -> String {
    if !should_colorize() {
        return text.to_string();
    }
    apply_status(text)
}

pub(crate) fn apply_status(text: &str) -> String {
    match Tone::for_state(text) {
        Some(tone) => paint(tone, text),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
