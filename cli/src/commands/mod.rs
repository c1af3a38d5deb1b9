//! Command implementations
//!
//! Every command loads the configuration and brings the artifacts up to date
//! before doing its own work.

pub mod build;
pub mod publish;
pub mod restart;
pub mod start;
pub mod status;
pub mod stop;
pub mod sync;

use anyhow::{Result, bail};

use crate::app::AppContext;
use crate::application::services::config_loader::LoadedConfig;
use crate::application::services::runtime::{self, ComposeAction, RuntimeOutcome};
use crate::application::services::sync::{
    ArtifactOutcome, ProjectResolver, SyncOptions, SyncReport,
};

/// Fail with every artifact error when the report has any.
///
/// # Errors
///
/// Returns an error naming each failed artifact.
pub fn ensure_synced(report: &SyncReport) -> Result<()> {
    let failures: Vec<String> = report
        .failures()
        .filter_map(|a| match &a.outcome {
            ArtifactOutcome::Failed(e) => Some(format!("{} artifact: {e:#}", a.kind.label())),
            _ => None,
        })
        .collect();
    if failures.is_empty() {
        return Ok(());
    }
    bail!("failed to sync {}", failures.join("; "))
}

/// Load the configuration and run sync, returning the report unchecked.
///
/// # Errors
///
/// Returns an error if the configuration is missing or invalid.
pub fn load_and_sync(app: &AppContext, opts: &SyncOptions) -> Result<(LoadedConfig, SyncReport)> {
    let config = app.load_config()?;
    let remote = app.remote();
    let project = ProjectResolver::new(&config.project, &remote);
    let report = app.sync(&config, &project, opts);
    Ok((config, report))
}

/// Sync, then run one `docker compose` action against the local artifact.
///
/// # Errors
///
/// Returns an error if sync fails or `docker compose` exits non-zero.
pub fn compose_action(
    app: &AppContext,
    opts: &SyncOptions,
    action: ComposeAction,
) -> Result<RuntimeOutcome> {
    let (config, report) = load_and_sync(app, opts)?;
    ensure_synced(&report)?;
    runtime::run_compose(&app.runner, &app.fs, config.root(), action)
}
