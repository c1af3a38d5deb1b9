//! `devx stop` — stop the local workshop containers.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::runtime::{self, ComposeAction, RuntimeOutcome};
use crate::application::services::sync::{ArtifactOutcome, SyncOptions};
use crate::commands::load_and_sync;

/// Run `devx stop`.
///
/// A failed sync does not prevent tearing down containers started from an
/// earlier artifact.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or `docker compose down`
/// fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let (config, report) = load_and_sync(app, &SyncOptions::default())?;
    app.output.step("Stopping workshop...");
    match runtime::run_compose(&app.runner, &app.fs, config.root(), ComposeAction::Down)? {
        RuntimeOutcome::NotRunning => app.output.warn("No running workshop found"),
        RuntimeOutcome::Completed => app.output.success("Workshop stopped."),
    }
    if report.is_success() {
        return Ok(ExitCode::SUCCESS);
    }
    for artifact in report.failures() {
        if let ArtifactOutcome::Failed(e) = &artifact.outcome {
            app.output
                .error(&format!("failed to sync {} artifact: {e:#}", artifact.kind.label()));
        }
    }
    Ok(ExitCode::FAILURE)
}
