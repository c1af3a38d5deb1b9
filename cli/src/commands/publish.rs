//! `devx publish` — create a launchable on Brev from the committed artifact.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::publish::{self, PublishPlan};
use crate::application::services::sync::{ProjectResolver, SyncOptions};
use crate::commands::ensure_synced;
use crate::domain::project::Project;
use crate::domain::workspace::BrevWorkspace;
use crate::infra::launchable_api::{BrevHome, HttpLaunchableApi};

/// Arguments for the publish command.
#[derive(Args)]
pub struct PublishArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Show the API request without sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// Run `devx publish`.
///
/// # Errors
///
/// Returns an error if sync fails, credentials are missing, or the API
/// rejects the request.
pub fn run(app: &AppContext, args: &PublishArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let remote = app.remote();
    let resolver = ProjectResolver::new(&config.project, &remote);
    ensure_synced(&app.sync(&config, &resolver, &SyncOptions::default()))?;
    let project = resolver.get()?;

    let api = HttpLaunchableApi::from_env();
    let plan = publish::prepare(
        &BrevHome::from_env()?,
        &api,
        project,
        &config.workspace,
        args.dry_run,
    )?;

    if args.dry_run {
        print_request(app, &plan)?;
        return Ok(ExitCode::SUCCESS);
    }

    print_summary(app, project, &config.workspace);
    if !(app.non_interactive || app.confirm("Continue?", false)?) {
        app.output.warn("Aborted.");
        return Ok(ExitCode::FAILURE);
    }

    app.output.step("Creating launchable...");
    let published = publish::submit(&api, &plan)?;
    app.output
        .success(&format!("Launchable created with ID: {}", published.id));
    app.output.link(&published.deploy_link);
    Ok(ExitCode::SUCCESS)
}

fn print_request(app: &AppContext, plan: &PublishPlan) -> Result<()> {
    app.output.header("API request");
    app.output.kv("URL:", &plan.url);
    println!("{}", serde_json::to_string_pretty(&plan.request)?);
    Ok(())
}

fn print_summary(app: &AppContext, project: &Project, workspace: &BrevWorkspace) {
    let ports = workspace
        .ports
        .iter()
        .map(|p| format!("{}:{}", p.name, p.port))
        .collect::<Vec<_>>()
        .join(", ");
    let storage = workspace
        .storage
        .map_or_else(|| "default".to_string(), |gb| format!("{gb} GB"));

    app.output.header("About to create a launchable:");
    app.output.kv("Name:           ", &project.description);
    app.output.kv("Instance type:  ", &workspace.instance_type);
    app.output.kv("Workspace group:", workspace.workspace_group_id());
    app.output.kv("Storage:        ", &storage);
    app.output.kv("Ports:          ", &ports);
    app.output.kv("Repository:     ", &project.repo_url);
    app.output.kv("Image:          ", &project.launchable_image());
}
