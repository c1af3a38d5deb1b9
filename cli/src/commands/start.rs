//! `devx start` — build and start the workshop locally.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::runtime::{self, ComposeAction};
use crate::application::services::sync::{DEFAULT_LOCAL_PORT, SyncOptions};
use crate::commands::compose_action;

/// Arguments for the start command.
#[derive(Args)]
pub struct StartArgs {
    /// Host port for the Jupyter service (regenerates the local artifact)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Don't open the browser automatically
    #[arg(long)]
    pub no_browser: bool,
}

impl StartArgs {
    /// An explicit port always regenerates the local artifact so it takes
    /// effect.
    #[must_use]
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            force_local: self.port.is_some(),
            local_port: self.port.unwrap_or(DEFAULT_LOCAL_PORT),
            ..SyncOptions::default()
        }
    }
}

/// Run `devx start`.
///
/// # Errors
///
/// Returns an error if sync fails or the containers cannot be started.
pub fn run(app: &AppContext, args: &StartArgs) -> Result<ExitCode> {
    let opts = args.sync_options();
    app.output.step("Starting workshop...");
    compose_action(app, &opts, ComposeAction::Up)?;
    app.output.success("Workshop started.");
    let url = format!("http://localhost:{}", opts.local_port);
    app.output.kv("Jupyter:", &url);
    if !args.no_browser && !runtime::open_browser(&app.runner, &url) {
        app.output.warn("Could not open a browser; visit the URL above.");
    }
    app.output.info("Stop: devx stop");
    Ok(ExitCode::SUCCESS)
}
