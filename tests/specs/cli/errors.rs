//! CLI error handling specs

use crate::prelude::*;

#[test]
fn unknown_command_fails() {
    cli().args(&["frobnicate"]).fails().exit_code(2);
}

#[test]
fn translate_missing_file_fails_before_touching_engine() {
    let ws = Workspace::empty();
    ws.pz()
        .args(&["translate", "absent.pdf"])
        .fails()
        .exit_code(1)
        .stderr_has("Error: cannot read absent.pdf");
    assert!(!ws.log_dir().join("engine-stdio.log").exists());
}

#[test]
fn translate_unknown_service_is_a_usage_error() {
    let ws = Workspace::empty();
    ws.file("paper.pdf", b"%PDF-1.4");
    ws.pz()
        .args(&["translate", "paper.pdf", "--service", "deepl"])
        .fails()
        .exit_code(2)
        .stderr_has("unsupported service: deepl");
}

#[test]
fn translate_reports_unresolvable_engine() {
    let ws = Workspace::empty();
    ws.file("paper.pdf", b"%PDF-1.4");
    let missing = ws.path().join("no-such-engine");
    ws.pz()
        .env("PZ_ENGINE_BINARY", &missing)
        .args(&["translate", "paper.pdf"])
        .fails()
        .exit_code(1)
        .stderr_has("no usable engine command found")
        .stderr_has("no-such-engine");
}

#[test]
fn invalid_config_file_is_reported() {
    let ws = Workspace::empty();
    std::fs::write(ws.state_path().join("config.toml"), "[engine]\nport = \"x\"\n").unwrap();
    ws.pz()
        .args(&["status"])
        .fails()
        .stderr_has("invalid config");
}

#[test]
fn result_requires_running_engine() {
    let ws = Workspace::empty();
    ws.pz()
        .args(&["result", "job-1"])
        .fails()
        .stderr_has(&format!("engine not running on port {}", ws.port()));
}
