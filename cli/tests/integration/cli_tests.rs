//! Integration tests for the devx CLI skeleton: argument parsing, help and
//! error reporting.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn devx() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("devx"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    devx()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Manage workshop environments"));
}

#[test]
fn test_cli_help_flag_shows_help() {
    devx()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    devx()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("devx"));
}

// --- Command hierarchy tests ---

#[test]
fn test_help_lists_every_command() {
    let output = devx().arg("--help").output().expect("run devx");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["sync", "start", "stop", "build", "restart", "status", "publish"] {
        assert!(stdout.contains(command), "{command} missing from help");
    }
}

#[test]
fn test_start_help_shows_port_flag() {
    devx()
        .args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--no-browser"));
}

#[test]
fn test_sync_help_explains_deleted_sources() {
    devx()
        .args(["sync", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("variables.env"));
}

#[test]
fn test_publish_help_shows_dry_run_and_yes() {
    devx()
        .args(["publish", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--yes"));
}

#[test]
fn test_invalid_subcommand_fails() {
    devx().arg("deploy").assert().code(2);
}

#[test]
fn test_start_rejects_non_numeric_port() {
    devx().args(["start", "--port", "abc"]).assert().code(2);
}

// --- Error reporting ---

#[test]
fn test_sync_outside_project_reports_missing_descriptor() {
    let dir = TempDir::new().expect("tempdir");
    devx()
        .arg("sync")
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("pyproject.toml"));
}

#[test]
fn test_stop_outside_project_fails() {
    let dir = TempDir::new().expect("tempdir");
    devx()
        .arg("stop")
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}
