//! Application service — container runtime use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Every action runs `docker compose` against the local artifact.

use std::path::Path;

use anyhow::{Result, bail};
use tracing::{debug, warn};

use crate::application::ports::{CommandRunner, WorkspaceFs};
use crate::application::services::sync::ArtifactKind;
use crate::domain::artifacts::{ARTIFACT_DIR, LOCAL_ARTIFACT};
use crate::domain::error::RuntimeError;

/// A `docker compose` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeAction {
    Up,
    Down,
    Build,
    Restart,
    Status,
}

impl ComposeAction {
    /// Arguments following `docker compose -f <file>`.
    #[must_use]
    pub fn args(self) -> &'static [&'static str] {
        match self {
            ComposeAction::Up => &["up", "--build", "-d"],
            ComposeAction::Down => &["down"],
            ComposeAction::Build => &["build"],
            ComposeAction::Restart => &["restart"],
            ComposeAction::Status => &["ps"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeOutcome {
    Completed,
    /// `down` was requested but no local artifact exists.
    NotRunning,
}

/// Run `action` for the project at `root`.
///
/// # Errors
///
/// Returns `RuntimeError::ComposeFailed` on a non-zero exit, or an error if
/// the local artifact is missing or `docker` cannot be spawned.
pub fn run_compose(
    runner: &impl CommandRunner,
    fs: &impl WorkspaceFs,
    root: &Path,
    action: ComposeAction,
) -> Result<RuntimeOutcome> {
    if !fs.exists(&ArtifactKind::Local.path(root)) {
        if action == ComposeAction::Down {
            return Ok(RuntimeOutcome::NotRunning);
        }
        bail!("{ARTIFACT_DIR}/{LOCAL_ARTIFACT} is missing; run `devx sync` first");
    }

    let file = format!("{ARTIFACT_DIR}/{LOCAL_ARTIFACT}");
    let mut args = vec!["compose", "-f", file.as_str()];
    args.extend_from_slice(action.args());
    debug!(cwd = %root.display(), args = ?args, "running docker");

    let status = runner.run_status("docker", &args, root)?;
    if !status.success() {
        return Err(RuntimeError::ComposeFailed {
            subcommand: action.args().join(" "),
            status: status.to_string(),
        }
        .into());
    }
    Ok(RuntimeOutcome::Completed)
}

/// Opener command for `url` on the operating system named `os` (as in
/// `std::env::consts::OS`).
#[must_use]
pub fn browser_command(os: &str, url: &str) -> (&'static str, Vec<String>) {
    match os {
        "macos" => ("open", vec![url.to_string()]),
        "windows" => (
            "cmd",
            vec!["/C".into(), "start".into(), String::new(), url.to_string()],
        ),
        _ => ("xdg-open", vec![url.to_string()]),
    }
}

/// Open `url` in the default browser. Returns whether the opener succeeded;
/// failure is never fatal.
pub fn open_browser(runner: &impl CommandRunner, url: &str) -> bool {
    let (program, args) = browser_command(std::env::consts::OS, url);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match runner.run(program, &args) {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            warn!(program, status = %output.status, "browser opener failed");
            false
        }
        Err(e) => {
            warn!(program, error = %e, "browser opener unavailable");
            false
        }
    }
}
