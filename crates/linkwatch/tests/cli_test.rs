//! Integration tests for the `linkwatch` binary.
//!
//! Fetch tests run against a local mock server; connectivity tests probe
//! local listeners. Nothing here needs the real network.
#![allow(clippy::unwrap_used)]

use std::net::{SocketAddr, TcpListener};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FETCH_FAILED: &str = "Error: Failed to fetch data. Please check your connection.";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the binary with env isolation.
///
/// Clears `LINKWATCH_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn linkwatch_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("linkwatch");
    cmd.env("HOME", "/tmp/linkwatch-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/linkwatch-cli-test-nonexistent")
        .env_remove("LINKWATCH_ENDPOINT")
        .env_remove("LINKWATCH_TIMEOUT")
        .env_remove("LINKWATCH_INSECURE")
        .env_remove("LINKWATCH_PROBE__HOST")
        .env_remove("LINKWATCH_PROBE__PORT")
        .env_remove("RUST_LOG")
        .env_remove("NO_COLOR");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// An address nothing is listening on.
fn closed_local_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

async fn users_server(body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = linkwatch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    linkwatch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("connectivity")
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("fetch"))
            .and(predicate::str::contains("status")),
    );
}

#[test]
fn test_version_flag() {
    linkwatch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("linkwatch"));
}

#[test]
fn test_invalid_subcommand() {
    linkwatch_cmd()
        .arg("refresh")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    linkwatch_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("linkwatch"));
}

#[test]
fn test_completions_zsh() {
    linkwatch_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Man page ────────────────────────────────────────────────────────

#[test]
fn test_man_page() {
    linkwatch_cmd()
        .arg("man")
        .assert()
        .success()
        .stdout(predicate::str::contains(".TH linkwatch").and(predicate::str::contains("fetch")));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    linkwatch_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_defaults() {
    linkwatch_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://jsonplaceholder.typicode.com/users")
                .and(predicate::str::contains("[probe]")),
        );
}

#[test]
fn test_config_show_reflects_environment() {
    linkwatch_cmd()
        .args(["config", "show"])
        .env("LINKWATCH_PROBE__PORT", "8443")
        .assert()
        .success()
        .stdout(predicate::str::contains("port = 8443"));
}

#[test]
fn test_config_init_then_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();

    linkwatch_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(dir.path().join("linkwatch").join("config.toml").exists());

    linkwatch_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("already exists"));

    linkwatch_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_file_endpoint_is_validated() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("linkwatch");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "endpoint = \"ftp://x/users\"\n").unwrap();

    linkwatch_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .arg("fetch")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported scheme"));
}

// ── Fetch ───────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_renders_entries_in_order() {
    let server = users_server(json!([
        { "id": 1, "name": "Ann", "email": "ann@x.com" },
        { "id": 2, "name": "Bo", "email": "bo@y.org" }
    ]))
    .await;

    linkwatch_cmd()
        .args(["fetch", "--color", "never", "--endpoint"])
        .arg(format!("{}/users", server.uri()))
        .assert()
        .success()
        .stdout("Loading...\nAnn (ann@x.com)\nBo (bo@y.org)\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_json_output() {
    let server = users_server(json!([{ "name": "Ann", "email": "ann@x.com", "phone": "1" }])).await;

    let output = linkwatch_cmd()
        .args(["fetch", "-o", "json", "--endpoint"])
        .arg(format!("{}/users", server.uri()))
        .output()
        .unwrap();

    assert!(output.status.success());
    let users: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(users, json!([{ "name": "Ann", "email": "ann@x.com" }]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_endpoint_from_env() {
    let server = users_server(json!([])).await;

    linkwatch_cmd()
        .env("LINKWATCH_ENDPOINT", format!("{}/users", server.uri()))
        .args(["fetch", "--color", "never"])
        .assert()
        .success()
        .stdout("Loading...\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_server_error_shows_canonical_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    linkwatch_cmd()
        .args(["fetch", "--color", "never", "--endpoint"])
        .arg(format!("{}/users", server.uri()))
        .assert()
        .code(7)
        .stdout("Loading...\n")
        .stderr(
            predicate::str::contains(FETCH_FAILED)
                .and(predicate::str::contains(format!("Fetch from {}/users failed", server.uri()))),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_malformed_body_shows_canonical_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    linkwatch_cmd()
        .args(["fetch", "--color", "never", "--endpoint"])
        .arg(format!("{}/users", server.uri()))
        .assert()
        .code(7)
        .stderr(predicate::str::contains(FETCH_FAILED));
}

#[test]
fn test_fetch_unreachable_endpoint() {
    let addr = closed_local_addr();

    linkwatch_cmd()
        .args(["fetch", "--color", "never", "--endpoint"])
        .arg(format!("http://{addr}/users"))
        .assert()
        .code(7)
        .stderr(predicate::str::contains(FETCH_FAILED));
}

#[test]
fn test_fetch_zero_timeout_is_rejected() {
    linkwatch_cmd()
        .args(["fetch", "--timeout", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("timeout"));
}

#[test]
fn test_fetch_invalid_endpoint() {
    linkwatch_cmd()
        .args(["fetch", "--endpoint", "not a url"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("endpoint"));
}

// ── Status ──────────────────────────────────────────────────────────

#[test]
fn test_status_online() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    linkwatch_cmd()
        .args(["status", "--color", "never"])
        .env("LINKWATCH_PROBE__HOST", "127.0.0.1")
        .env("LINKWATCH_PROBE__PORT", port.to_string())
        .assert()
        .success()
        .stdout("online\n");
}

#[test]
fn test_status_offline() {
    let addr = closed_local_addr();

    linkwatch_cmd()
        .args(["status", "--color", "never"])
        .env("LINKWATCH_PROBE__HOST", "127.0.0.1")
        .env("LINKWATCH_PROBE__PORT", addr.port().to_string())
        .assert()
        .code(7)
        .stdout("offline\n");
}

// ── Watch ───────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_watch_status_reports_online() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = users_server(json!([{ "name": "Ann", "email": "ann@x.com" }])).await;

    linkwatch_cmd()
        .args(["watch", "--color", "never", "--endpoint"])
        .arg(format!("{}/users", server.uri()))
        .env("LINKWATCH_PROBE__HOST", "127.0.0.1")
        .env("LINKWATCH_PROBE__PORT", port.to_string())
        .write_stdin("s\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("online").and(predicate::str::contains("offline").not()));
}

#[test]
fn test_watch_shows_banner_when_offline() {
    let addr = closed_local_addr();

    linkwatch_cmd()
        .args(["watch", "--color", "never", "--endpoint", "http://127.0.0.1:9/users"])
        .env("LINKWATCH_PROBE__HOST", "127.0.0.1")
        .env("LINKWATCH_PROBE__PORT", addr.port().to_string())
        .write_stdin("q\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("! You are currently offline"));
}
