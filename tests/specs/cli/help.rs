//! CLI help output specs

use crate::prelude::*;

#[test]
fn pz_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn pz_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("translate")
        .stdout_has("status")
        .stdout_has("start")
        .stdout_has("stop")
        .stdout_has("result")
        .stdout_has("logs");
}

#[test]
fn pz_translate_help_shows_options() {
    cli()
        .args(&["translate", "--help"])
        .passes()
        .stdout_has("--service")
        .stdout_has("--threads")
        .stdout_has("--keep-engine");
}

#[test]
fn pz_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
