//! Engine status and stop specs against an idle port

use crate::prelude::*;

#[test]
fn status_reports_not_running() {
    let ws = Workspace::empty();
    ws.pz()
        .args(&["status"])
        .passes()
        .stdout_has(&format!("Engine: not running (port: {})", ws.port()));
}

#[test]
fn status_json_reports_not_running() {
    let ws = Workspace::empty();
    let out = ws.pz().args(&["status", "-o", "json"]).passes().stdout();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["status"], "not running");
    assert_eq!(json["port"], ws.port());
    assert!(json.get("pid").is_none());
}

#[test]
fn stop_without_engine_is_a_no_op() {
    let ws = Workspace::empty();
    ws.pz()
        .args(&["stop"])
        .passes()
        .stdout_eq("Engine not running\n");
}

#[test]
fn config_file_port_is_used() {
    let ws = Workspace::empty();
    let port = unused_port();
    std::fs::write(
        ws.state_path().join("config.toml"),
        format!("[engine]\nport = {port}\n"),
    )
    .unwrap();
    // PZ_ENGINE_PORT outranks the file, so drop it for this run
    let mut cmd = ws.pz().args(&["status"]).command();
    cmd.env_remove("PZ_ENGINE_PORT");
    let output = cmd.output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(&format!("(port: {port})")));
}
