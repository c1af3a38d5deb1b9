//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Manage workshop environments: compose artifacts, local runs and launchables
#[derive(Parser)]
#[command(
    name = "devx",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Only synchronize the generated compose files and quit
    Sync(commands::sync::SyncArgs),

    /// Start the workshop locally
    Start(commands::start::StartArgs),

    /// Stop the workshop
    Stop,

    /// Build the workshop container
    Build,

    /// Restart the workshop
    Restart,

    /// Show the status of the workshop containers
    Status,

    /// Create a launchable workshop on Brev
    Publish(commands::publish::PublishArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub fn run(self) -> Result<ExitCode> {
        let Cli {
            quiet,
            no_color,
            command,
        } = self;
        let yes = matches!(&command, Command::Publish(args) if args.yes);
        let app = AppContext::new(&AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes },
        })?;

        match command {
            Command::Sync(args) => commands::sync::run(&app, &args),
            Command::Start(args) => commands::start::run(&app, &args),
            Command::Stop => commands::stop::run(&app),
            Command::Build => commands::build::run(&app),
            Command::Restart => commands::restart::run(&app),
            Command::Status => commands::status::run(&app),
            Command::Publish(args) => commands::publish::run(&app, &args),
        }
    }
}
