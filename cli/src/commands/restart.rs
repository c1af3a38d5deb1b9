//! `devx restart` — restart the workshop containers.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::runtime::ComposeAction;
use crate::application::services::sync::SyncOptions;
use crate::commands::compose_action;

/// Run `devx restart`.
///
/// # Errors
///
/// Returns an error if sync fails or the containers cannot be restarted.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    app.output.step("Restarting workshop...");
    compose_action(app, &SyncOptions::default(), ComposeAction::Restart)?;
    app.output.success("Workshop restarted.");
    Ok(ExitCode::SUCCESS)
}
