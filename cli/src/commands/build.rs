//! `devx build` — build the workshop image.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::runtime::ComposeAction;
use crate::application::services::sync::SyncOptions;
use crate::commands::compose_action;

/// Run `devx build`.
///
/// # Errors
///
/// Returns an error if sync fails or the build fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    app.output.step("Building workshop container...");
    compose_action(app, &SyncOptions::default(), ComposeAction::Build)?;
    app.output.success("Workshop container built.");
    Ok(ExitCode::SUCCESS)
}
