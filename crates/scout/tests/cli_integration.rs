//! CLI integration tests.
//!
//! These run the compiled `scout` binary.

use std::net::TcpListener;
use std::process::{Child, Command as StdCommand, Stdio};
use std::time::{Duration, Instant};

use assert_cmd::Command;
use predicates::prelude::*;

fn scout() -> Command {
    let mut cmd = Command::cargo_bin("scout").unwrap();
    cmd.env_remove("PORT")
        .env_remove("SCOUT_BIND")
        .env_remove("SCOUT_UPSTREAM_URL")
        .env_remove("SCOUT_TIMEOUT_SECS")
        .env_remove("SCOUT_LOG_DIR");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and version
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help() {
    scout()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--endpoint"))
        .stdout(predicate::str::contains("--timeout-secs"));
}

#[test]
fn test_version() {
    scout()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scout"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument validation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_port() {
    scout()
        .args(["--port", "70000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--port"));
}

#[test]
fn test_invalid_bind_address() {
    scout()
        .args(["--bind", "not-an-ip"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bind"));
}

#[test]
fn test_zero_timeout_rejected() {
    scout()
        .args(["--timeout-secs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout-secs"));
}

#[test]
fn test_invalid_endpoint_fails_startup() {
    scout()
        .args(["--endpoint", "not a url", "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to initialize search tool"))
        .stderr(predicate::str::contains("invalid endpoint"));
}

#[test]
fn test_port_env_var() {
    scout()
        .env("PORT", "abc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--port"));
}

#[test]
fn test_log_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");

    scout()
        .args(["--endpoint", "ftp://example.com/search", "--port", "0"])
        .arg("--log-dir")
        .arg(&log_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("http or https"));

    let files = std::fs::read_dir(&log_dir).unwrap().count();
    assert!(files >= 1, "expected a log file in {}", log_dir.display());
}

// ─────────────────────────────────────────────────────────────────────────────
// Serving
// ─────────────────────────────────────────────────────────────────────────────

struct RunningServer(Child);

impl Drop for RunningServer {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn wait_for_health(port: u16) -> serde_json::Value {
    let client = reqwest::blocking::Client::new();
    let url = format!("http://127.0.0.1:{port}/health");
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Ok(resp) = client.get(&url).send() {
            if resp.status().is_success() {
                return resp.json().unwrap();
            }
        }
        assert!(Instant::now() < deadline, "server did not become healthy");
        std::thread::sleep(Duration::from_millis(50));
    }
}

#[test]
fn test_serves_health_and_tools_list() {
    let port = free_port();
    let child = StdCommand::new(assert_cmd::cargo::cargo_bin("scout"))
        .args(["--bind", "127.0.0.1", "--port", &port.to_string()])
        .args(["--endpoint", "http://127.0.0.1:9/search"])
        .env_remove("PORT")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let _server = RunningServer(child);

    let health = wait_for_health(port);
    assert_eq!(health["status"], "ok");

    let body: serde_json::Value = reqwest::blocking::Client::new()
        .post(format!("http://127.0.0.1:{port}/mcp"))
        .header("content-type", "application/json")
        .body(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#)
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(body["result"]["tools"][0]["name"], "search");
}
