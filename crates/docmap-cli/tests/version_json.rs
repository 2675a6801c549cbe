//! Integration tests for `docmap version --json`.

use serde_json::json;
use std::process::Command;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "docmap-cli", "--bin", "docmap", "--"]);
    cmd
}

#[test]
fn test_version_json_reports_defaults() {
    let output = cargo_bin()
        .args(["--json", "version"])
        .output()
        .expect("Failed to run version command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");

    assert_eq!(json["name"], json!("docmap"));
    assert_eq!(json["default_condition"], json!("types"));
    assert_eq!(json["config_file"], json!("docmap.json"));
    assert!(json["version"].as_str().is_some_and(|v| !v.is_empty()));
}
