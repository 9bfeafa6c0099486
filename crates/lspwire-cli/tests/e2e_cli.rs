//! E2E tests for lspwire CLI command execution.
//!
//! These tests spawn the actual CLI binary and verify:
//! - Exit codes
//! - stdout/stderr output
//! - Command behavior

use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::NamedTempFile;

fn get_binary_path() -> String {
    env!("CARGO_BIN_EXE_lspwire").to_string()
}

fn command() -> Command {
    let mut command = Command::new(get_binary_path());
    command
        .env_remove("LSPWIRE_LOG")
        .env_remove("LSPWIRE_UNKNOWN_NOTIFICATIONS")
        .env_remove("LSPWIRE_MAX_PENDING");
    command
}

/// Helper to run the CLI and capture output.
fn run_cli(args: &[&str]) -> Output {
    command()
        .args(args)
        .output()
        .expect("Failed to execute CLI binary")
}

/// Helper to run the CLI with `input` on stdin.
fn run_cli_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = command()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI binary");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    child.wait_with_output().expect("Failed to wait for CLI")
}

fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn message_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

// =============================================================================
// Help Command Tests
// =============================================================================

#[test]
fn e2e_cli_help_shows_usage() {
    let output = run_cli(&["--help"]);

    assert!(output.status.success(), "help should exit 0");

    let stdout = stdout_str(&output);
    assert!(stdout.contains("lspwire"));
    assert!(stdout.contains("inspect"), "Should list inspect command");
    assert!(stdout.contains("methods"), "Should list methods command");
    assert!(stdout.contains("--config"));
}

#[test]
fn e2e_cli_inspect_help() {
    let output = run_cli(&["inspect", "--help"]);

    assert!(output.status.success());

    let stdout = stdout_str(&output);
    assert!(stdout.contains("Inspect a single JSON-RPC message"));
    assert!(stdout.contains("--format"));
}

#[test]
fn e2e_cli_version() {
    let output = run_cli(&["--version"]);

    assert!(output.status.success());
    assert!(stdout_str(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn e2e_cli_unknown_subcommand_fails() {
    let output = run_cli(&["frobnicate"]);

    assert!(!output.status.success());
    assert!(stderr_str(&output).contains("frobnicate"));
}

// =============================================================================
// Inspect Command Tests
// =============================================================================

#[test]
fn e2e_cli_inspect_valid_request_from_file() {
    let file = message_file(
        r#"{"jsonrpc":"2.0","id":7,"method":"textDocument/hover","params":{"textDocument":{"uri":"file:///a.rs"},"position":{"line":2,"character":4}}}"#,
    );
    let output = run_cli(&["inspect", file.path().to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", stderr_str(&output));

    let stdout = stdout_str(&output);
    assert!(stdout.contains("status:    valid"));
    assert!(stdout.contains("shape:     request"));
    assert!(stdout.contains("method:    textDocument/hover"));
    assert!(stdout.contains("kind:      Hover"));
    assert!(stdout.contains("direction: request"));
    assert!(stdout.contains("id:        7"));
    assert!(stdout.contains("\"character\": 4"));
}

#[test]
fn e2e_cli_inspect_reads_stdin() {
    let output = run_cli_with_stdin(
        &["inspect", "--format", "json"],
        r#"{"jsonrpc":"2.0","method":"exit"}"#,
    );

    assert!(output.status.success(), "stderr: {}", stderr_str(&output));

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("inspect --format json prints JSON");
    assert_eq!(report["valid"], true);
    assert_eq!(report["shape"], "notification");
    assert_eq!(report["kind"], "Exit");
    assert_eq!(report["direction"], "notification");
}

#[test]
fn e2e_cli_inspect_invalid_request_shows_reply() {
    let output = run_cli_with_stdin(
        &["inspect", "-", "--format", "json"],
        r#"{"jsonrpc":"2.0","id":"a1","method":"textDocument/rename","params":{"newName":"x"}}"#,
    );

    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["error"]["code"], -32602);
    assert_eq!(report["error"]["name"], "InvalidParams");
    assert_eq!(report["reply"]["id"], "a1");
    assert_eq!(report["reply"]["error"]["code"], -32602);
}

#[test]
fn e2e_cli_inspect_invalid_notification_has_no_reply() {
    let output = run_cli_with_stdin(
        &["inspect", "--format", "json"],
        r#"{"jsonrpc":"2.0","method":"window/logMessage","params":{"type":"loud","message":"m"}}"#,
    );

    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["shape"], "notification");
    assert!(report.get("reply").is_none());
}

#[test]
fn e2e_cli_inspect_parse_error() {
    let output = run_cli_with_stdin(&["inspect"], "{not json");

    assert_eq!(output.status.code(), Some(1));

    let stdout = stdout_str(&output);
    assert!(stdout.contains("status:    invalid"));
    assert!(stdout.contains("-32700"));
    assert!(stdout.contains("reply:"));
}

#[test]
fn e2e_cli_inspect_yaml_response() {
    let output = run_cli_with_stdin(
        &["inspect", "-f", "yaml"],
        r#"{"jsonrpc":"2.0","id":3,"result":null}"#,
    );

    assert!(output.status.success(), "stderr: {}", stderr_str(&output));

    let stdout = stdout_str(&output);
    assert!(stdout.contains("valid: true"));
    assert!(stdout.contains("shape: response"));
}

#[test]
fn e2e_cli_inspect_unknown_notification_is_ignored() {
    let output = run_cli_with_stdin(&["inspect"], r#"{"jsonrpc":"2.0","method":"$/custom"}"#);

    assert!(output.status.success());
    assert!(stdout_str(&output).contains("unknown notification, ignored"));
}

#[test]
fn e2e_cli_inspect_missing_file_fails() {
    let output = run_cli(&["inspect", "/nonexistent/message.json"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_str(&output).contains("Error:"));
}

#[test]
fn e2e_cli_inspect_rejects_unknown_format() {
    let output = run_cli_with_stdin(&["inspect", "--format", "xml"], "{}");

    assert!(!output.status.success());
    assert!(stderr_str(&output).contains("Unknown format"));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn e2e_cli_config_reject_policy() {
    let config = message_file("unknown_notifications = \"reject\"\n");
    let output = run_cli_with_stdin(
        &[
            "--config",
            config.path().to_str().unwrap(),
            "inspect",
            "--format",
            "json",
        ],
        r#"{"jsonrpc":"2.0","method":"$/custom"}"#,
    );

    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["error"]["code"], -32601);
}

#[test]
fn e2e_cli_bad_config_fails() {
    let config = message_file("no_such_key = 1\n");
    let output = run_cli(&["--config", config.path().to_str().unwrap(), "methods"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_str(&output).contains("Failed to parse config"));
}

#[test]
fn e2e_cli_verbose_logs_to_stderr() {
    let config = message_file("[logging]\ntimestamps = false\n");
    let output = run_cli_with_stdin(
        &["-vv", "--config", config.path().to_str().unwrap(), "inspect"],
        r#"{"jsonrpc":"2.0","id":1,"method":"shutdown"}"#,
    );

    assert!(output.status.success());
    assert!(stderr_str(&output).contains("lspwire::"));
}

// =============================================================================
// Methods Command Tests
// =============================================================================

#[test]
fn e2e_cli_methods_table() {
    let output = run_cli(&["methods"]);

    assert!(output.status.success());

    let stdout = stdout_str(&output);
    assert!(stdout.contains("METHOD"));
    assert!(stdout.contains("textDocument/definition"));
    assert!(stdout.contains("$/cancelRequest"));
    assert!(stdout.contains("methods"));
}

#[test]
fn e2e_cli_methods_filter_by_direction() {
    let output = run_cli(&["methods", "--direction", "notification", "--format", "json"]);

    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|row| row["direction"] == "notification"));
    assert!(rows.iter().any(|row| row["method"] == "initialized"));
    assert!(!rows.iter().any(|row| row["method"] == "initialize"));
}

#[test]
fn e2e_cli_methods_yaml() {
    let output = run_cli(&["methods", "-d", "request", "-f", "yaml"]);

    assert!(output.status.success());

    let stdout = stdout_str(&output);
    assert!(stdout.contains("method: shutdown"));
    assert!(stdout.contains("direction: request"));
}
