//! `devx sync` — regenerate stale artifacts and quit.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::sync::{ArtifactOutcome, SyncOptions};
use crate::commands::{ensure_synced, load_and_sync};

/// Arguments for the sync command.
#[derive(Args)]
pub struct SyncArgs {
    /// Regenerate both artifacts even when they are up to date. Needed after
    /// deleting a source such as variables.env, which does not mark them stale
    #[arg(short, long)]
    pub force: bool,
}

/// Run `devx sync`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or any artifact failed.
pub fn run(app: &AppContext, args: &SyncArgs) -> Result<ExitCode> {
    let opts = if args.force {
        SyncOptions::forced()
    } else {
        SyncOptions::default()
    };
    let (config, report) = load_and_sync(app, &opts)?;

    for artifact in &report.artifacts {
        if matches!(artifact.outcome, ArtifactOutcome::UpToDate) {
            let path = artifact
                .path
                .strip_prefix(config.root())
                .unwrap_or(&artifact.path);
            app.output.info(&format!("{} is up to date", path.display()));
        }
    }
    ensure_synced(&report)?;
    Ok(ExitCode::SUCCESS)
}
