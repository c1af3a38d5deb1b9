//! Host identity infrastructure — implements the `HostProbe` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, HostProbe, WorkspaceFs};
use crate::domain::host::{HostIdentity, docker_gid_from_group_file, parse_id_output};

const GROUP_FILE: &str = "/etc/group";

/// Reads uid/gid via `id` and the docker group from the group database.
pub struct SystemHost<'a, R, F> {
    runner: &'a R,
    fs: &'a F,
    group_file: PathBuf,
}

impl<'a, R: CommandRunner, F: WorkspaceFs> SystemHost<'a, R, F> {
    #[must_use]
    pub fn new(runner: &'a R, fs: &'a F) -> Self {
        Self {
            runner,
            fs,
            group_file: PathBuf::from(GROUP_FILE),
        }
    }

    /// Read the group database from `path` instead of `/etc/group`.
    #[must_use]
    pub fn with_group_file(mut self, path: impl AsRef<Path>) -> Self {
        self.group_file = path.as_ref().to_path_buf();
        self
    }

    fn id(&self, flag: &str) -> Result<u32> {
        let output = self.runner.run("id", &[flag])?;
        anyhow::ensure!(output.status.success(), "`id {flag}` failed");
        parse_id_output(&String::from_utf8_lossy(&output.stdout))
            .with_context(|| format!("unexpected output from `id {flag}`"))
    }
}

impl<R: CommandRunner, F: WorkspaceFs> HostProbe for SystemHost<'_, R, F> {
    fn identity(&self) -> Result<HostIdentity> {
        // No group database means no docker group either.
        let groups = self
            .fs
            .read_to_string(&self.group_file)
            .with_context(|| format!("reading {}", self.group_file.display()))?
            .unwrap_or_default();
        Ok(HostIdentity {
            uid: self.id("-u")?,
            gid: self.id("-g")?,
            docker_gid: docker_gid_from_group_file(&groups),
        })
    }
}
