//! Integration tests for `devx sync` and `devx publish --dry-run` against a
//! real project tree.

#![allow(clippy::expect_used)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PYPROJECT: &str = r#"[project]
name = "demo"
description = "Demo workshop"
repo_url = "https://github.com/org/demo"
image_url = "ghcr.io/org/demo"

[tool.brev]
instance_type = "l40s-48gb.1x"
cloud = "gcp"
ports = [{ name = "jupyter", port = 8888 }]
"#;

const COMPOSE: &str = "services:\n  db:\n    image: postgres:16\n";

fn devx(dir: &Path, brev_home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("devx"));
    cmd.env("NO_COLOR", "1")
        .env("DEVX_BREV_HOME", brev_home)
        .env_remove("CI")
        .env_remove("DEVX_YES")
        .current_dir(dir);
    cmd
}

struct Project {
    dir: TempDir,
    brev_home: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir(dir.path().join(".git")).expect("create .git");
        fs::write(dir.path().join("pyproject.toml"), PYPROJECT).expect("write pyproject");
        fs::write(dir.path().join("compose.yaml"), COMPOSE).expect("write compose");
        Self {
            dir,
            brev_home: TempDir::new().expect("tempdir"),
        }
    }

    fn devx(&self) -> Command {
        devx(self.dir.path(), self.brev_home.path())
    }

    fn artifact(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(".devx").join(name)).expect("artifact written")
    }
}

#[cfg(unix)]
#[test]
fn test_sync_writes_both_artifacts() {
    let project = Project::new();

    project.devx().arg("sync").assert().success();

    let local = project.artifact("compose.local.yaml");
    assert!(local.starts_with("# Generated by devx"));
    assert!(local.contains("postgres:16"));
    assert!(local.contains("8888:8888"));
    let launchable = project.artifact("compose.yaml");
    assert!(launchable.contains("ghcr.io/org/demo/devx:main"));
    assert!(launchable.contains("devx-permissions"));
}

#[cfg(unix)]
#[test]
fn test_second_sync_reports_up_to_date() {
    let project = Project::new();
    project.devx().arg("sync").assert().success();

    project
        .devx()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[cfg(unix)]
#[test]
fn test_forced_sync_regenerates() {
    let project = Project::new();
    project.devx().arg("sync").assert().success();

    project
        .devx()
        .args(["sync", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date").not());
}

#[test]
fn test_invalid_user_compose_fails_sync() {
    let project = Project::new();
    fs::write(project.dir.path().join("compose.yaml"), "services: [db]\n").expect("write");

    project
        .devx()
        .arg("sync")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_stop_reports_sync_failures_on_stderr() {
    let project = Project::new();
    fs::write(project.dir.path().join("compose.yaml"), "services: [db]\n").expect("write");

    project
        .devx()
        .arg("stop")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No running workshop found"))
        .stderr(predicate::str::contains("failed to sync local artifact"))
        .stderr(predicate::str::contains("failed to sync launchable artifact"));
}

#[cfg(unix)]
#[test]
fn test_publish_dry_run_without_credentials_prints_payload() {
    let project = Project::new();

    project
        .devx()
        .args(["publish", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<org-id>"))
        .stdout(predicate::str::contains("\"workspaceGroupId\": \"GCP\""))
        .stdout(predicate::str::contains(
            "https://github.com/org/demo/raw/main/.devx/compose.yaml",
        ));
}

#[test]
fn test_publish_without_credentials_fails() {
    let project = Project::new();

    project
        .devx()
        .args(["publish", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}
