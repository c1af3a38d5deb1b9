//! Application context — unified state passed to every command handler.
//!
//! `AppContext` owns the output context, the workspace registry and the
//! production port implementations. Command handlers borrow what they need.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::PureCompiler;
use crate::application::services::config_loader::{self, LoadedConfig};
use crate::application::services::sync::{self, ProjectResolver, SyncOptions, SyncReport};
use crate::domain::registry::WorkspaceRegistry;
use crate::infra::command_runner::ProcessCommandRunner;
use crate::infra::fs::LocalFs;
use crate::infra::git::GitRemote;
use crate::infra::host::SystemHost;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `DEVX_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Workspace groups known to this build.
    pub registry: WorkspaceRegistry,
    pub runner: ProcessCommandRunner,
    pub fs: LocalFs,
    /// Directory discovery starts from.
    pub cwd: PathBuf,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `DEVX_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("DEVX_YES").is_ok();
        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            registry: WorkspaceRegistry::builtin(),
            runner: ProcessCommandRunner,
            fs: LocalFs,
            cwd: std::env::current_dir().context("cannot determine the working directory")?,
            non_interactive: flags.behaviour.yes || ci_env,
        })
    }

    /// Discover and validate the project configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the configuration is missing or invalid.
    pub fn load_config(&self) -> Result<LoadedConfig> {
        config_loader::load_config(&self.fs, &self.cwd, &self.registry)
    }

    /// `origin` remote lookup backed by `git`.
    #[must_use]
    pub fn remote(&self) -> GitRemote<'_, ProcessCommandRunner> {
        GitRemote::new(&self.runner)
    }

    /// Bring both artifacts up to date with the production ports.
    #[must_use]
    pub fn sync(
        &self,
        config: &LoadedConfig,
        project: &ProjectResolver<'_, GitRemote<'_, ProcessCommandRunner>>,
        opts: &SyncOptions,
    ) -> SyncReport {
        sync::sync_artifacts(
            config,
            &self.fs,
            project,
            &SystemHost::new(&self.runner, &self.fs),
            &PureCompiler,
            &TerminalReporter::new(&self.output),
            opts,
        )
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `DEVX_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
