//! `pz logs` specs

use crate::prelude::*;

#[test]
fn logs_without_file_says_so() {
    let ws = Workspace::empty();
    ws.pz()
        .args(&["logs"])
        .passes()
        .stdout_has("No log entries")
        .stdout_has("engine-stdio.log");
}

#[test]
fn logs_shows_tail_of_engine_output() {
    let ws = Workspace::empty();
    std::fs::create_dir_all(ws.log_dir()).unwrap();
    std::fs::write(
        ws.log_dir().join("engine-stdio.log"),
        "one\ntwo\nthree\nfour\n",
    )
    .unwrap();
    ws.pz()
        .args(&["logs", "-n", "2"])
        .passes()
        .stdout_eq("three\nfour\n");
}

#[test]
fn logs_json_includes_path() {
    let ws = Workspace::empty();
    let out = ws.pz().args(&["logs", "-o", "json"]).passes().stdout();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["content"], "");
    assert!(json["log_path"]
        .as_str()
        .unwrap()
        .ends_with("engine-stdio.log"));
}
