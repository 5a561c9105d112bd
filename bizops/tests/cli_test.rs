//! Binary-level tests for the `bizops` CLI

use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const KEY_ENV: &str = "BIZOPS_CLI_TEST_KEY";

/// The binary with HOME, XDG dirs and cwd pointed at `home`, and no API key
fn bizops(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bizops").expect("bin");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env_remove("GEMINI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

/// Serve a single HTTP response on a background thread
fn serve_once(status: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    thread::spawn(move || {
        let (mut socket, _) = listener.accept().unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_lowercase();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).unwrap();
    });

    base_url
}

fn write_config(home: &Path, base_url: &str) -> std::path::PathBuf {
    let path = home.join("bizops.yml");
    let yaml = format!(
        "log-level: debug\nllm:\n  base-url: {}\n  api-key-env: {}\n  timeout-ms: 5000\n",
        base_url, KEY_ENV
    );
    fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn test_help_lists_commands() {
    let tmp = TempDir::new().unwrap();
    bizops(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("dashboard"));
}

#[test]
fn test_dashboard_runs_without_credentials() {
    let tmp = TempDir::new().unwrap();
    bizops(tmp.path())
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Inventory Turnover"))
        .stdout(predicate::str::contains("AI Implementation Status: 70% Complete"));
}

#[test]
fn test_dashboard_json() {
    let tmp = TempDir::new().unwrap();
    let output = bizops(tmp.path()).args(["dashboard", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["kpis"].as_array().unwrap().len(), 4);
    assert_eq!(value["series"][0]["name"], "Jan");
}

#[cfg(target_os = "linux")]
#[test]
fn test_log_file_is_written() {
    let tmp = TempDir::new().unwrap();
    bizops(tmp.path())
        .args(["--log-level", "debug", "dashboard"])
        .assert()
        .success();
    assert!(tmp.path().join("data/bizops/logs/bizops.log").exists());
}

#[test]
fn test_blank_goal_is_rejected_before_any_request() {
    let tmp = TempDir::new().unwrap();
    bizops(tmp.path())
        .args(["plan", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Goal must not be empty"));
}

#[test]
fn test_blank_document_on_stdin_is_rejected() {
    let tmp = TempDir::new().unwrap();
    bizops(tmp.path())
        .arg("analyze")
        .write_stdin("\n  \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Document must not be empty"));
}

#[test]
fn test_missing_api_key() {
    let tmp = TempDir::new().unwrap();
    bizops(tmp.path())
        .args(["ask", "How can we cut logistics costs by 15%?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn test_plan_json_from_service() {
    let tmp = TempDir::new().unwrap();
    let plan = r#"{"title":"APAC Entry","executiveSummary":"Hub in Singapore.","roiEstimate":"12% growth","steps":[{"phase":"Phase 1: Assessment","action":"Market sizing","owner":"CFO","estimatedImpact":"Clear targets"}]}"#;
    let reply = serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": plan }] }, "finishReason": "STOP" }]
    });
    let config = write_config(tmp.path(), &serve_once("200 OK", reply.to_string()));

    let output = bizops(tmp.path())
        .env(KEY_ENV, "test-key")
        .arg("-c")
        .arg(&config)
        .args(["plan", "--format", "json", "Expand into APAC"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["title"], "APAC Entry");
    assert_eq!(value["steps"][0]["estimatedImpact"], "Clear targets");
}

#[test]
fn test_service_failure_prints_fixed_message() {
    let tmp = TempDir::new().unwrap();
    let reply = serde_json::json!({ "error": { "code": 403, "message": "API key not valid." } });
    let config = write_config(tmp.path(), &serve_once("403 Forbidden", reply.to_string()));

    bizops(tmp.path())
        .env(KEY_ENV, "bad-key")
        .arg("-c")
        .arg(&config)
        .arg("analyze")
        .write_stdin("Revenue increased 20% year over year.")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to analyze document."))
        .stderr(predicate::str::contains("API key not valid").not());
}
