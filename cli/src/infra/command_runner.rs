//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `ProcessCommandRunner` runs programs synchronously with `std::process`.
//! There is no timeout: `docker compose up --build` may legitimately run for
//! a long time.

use std::path::Path;
use std::process::{Command, ExitStatus, Output, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::CommandRunner;

/// Production `CommandRunner`.
pub struct ProcessCommandRunner;

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        debug!(program, ?args, "run");
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to spawn {program}"))
    }

    fn run_status(&self, program: &str, args: &[&str], cwd: &Path) -> Result<ExitStatus> {
        debug!(program, ?args, cwd = %cwd.display(), "run with inherited stdio");
        Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .with_context(|| format!("failed to spawn {program}"))
    }
}
