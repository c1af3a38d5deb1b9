//! Version-control infrastructure — implements the `RemoteResolver` port.

use std::path::Path;

use anyhow::{Result, bail};

use crate::application::ports::{CommandRunner, RemoteResolver};

/// Queries `git remote get-url origin` through a `CommandRunner`.
pub struct GitRemote<'a, R> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> GitRemote<'a, R> {
    #[must_use]
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> RemoteResolver for GitRemote<'_, R> {
    fn origin_url(&self, root: &Path) -> Result<String> {
        let root = root.display().to_string();
        let output = self
            .runner
            .run("git", &["-C", &root, "remote", "get-url", "origin"])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "cannot read the `origin` remote: {}\n\nDeclare `repo_url` and `image_url` in [project] instead.",
                stderr.trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
