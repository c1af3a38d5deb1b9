//! `devx status` — show the workshop containers.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::runtime::ComposeAction;
use crate::application::services::sync::SyncOptions;
use crate::commands::compose_action;

/// Run `devx status`.
///
/// # Errors
///
/// Returns an error if sync fails or `docker compose ps` fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    compose_action(app, &SyncOptions::default(), ComposeAction::Status)?;
    Ok(ExitCode::SUCCESS)
}
