//! Project identity.
//!
//! Two-phase construction: `DeclaredProject` holds what the descriptor says,
//! `DeclaredProject::resolve` fills inferred URLs from the `origin` remote.
//! The remote is only consulted when a URL was left undeclared.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::config::{ProjectDecl, required};
use crate::domain::error::ConfigError;
use crate::domain::remote::RemoteUrl;

/// Branch whose image the launchable pulls.
pub const TARGET_BRANCH: &str = "main";

/// Name of the reserved service, also used as the image name.
pub const SERVICE_NAME: &str = "devx";

/// Project fields as declared, before any inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredProject {
    pub name: String,
    pub description: String,
    pub root: PathBuf,
    pub repo_url: Option<String>,
    pub image_url: Option<String>,
}

impl DeclaredProject {
    /// Validate the `[project]` table of the descriptor at `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the table or a required field is missing.
    pub fn from_decl(decl: Option<&ProjectDecl>, descriptor: &Path) -> Result<Self, ConfigError> {
        let decl = decl.ok_or_else(|| ConfigError::invalid(descriptor, "missing [project] table"))?;
        let root = descriptor
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok(Self {
            name: required(decl.name.as_deref(), "project.name", descriptor)?.to_string(),
            description: required(decl.description.as_deref(), "project.description", descriptor)?
                .to_string(),
            root,
            repo_url: non_blank(decl.repo_url.as_deref()),
            image_url: non_blank(decl.image_url.as_deref()),
        })
    }

    /// Whether resolving requires the `origin` remote.
    #[must_use]
    pub fn needs_remote(&self) -> bool {
        self.repo_url.is_none() || self.image_url.is_none()
    }

    /// Fill undeclared URLs. `origin` is invoked at most once, and only when
    /// [`needs_remote`](Self::needs_remote) is true.
    ///
    /// # Errors
    ///
    /// Propagates the error from `origin`, or `RemoteError::UnsupportedFormat`
    /// if the remote cannot be parsed.
    pub fn resolve(self, origin: impl FnOnce() -> Result<String>) -> Result<Project> {
        let remote = if self.needs_remote() {
            Some(RemoteUrl::parse(&origin()?)?)
        } else {
            None
        };
        let infer = |f: fn(&RemoteUrl) -> String| remote.as_ref().map(f).unwrap_or_default();
        Ok(Project {
            repo_url: self
                .repo_url
                .unwrap_or_else(|| infer(RemoteUrl::https_url)),
            image_url: self
                .image_url
                .unwrap_or_else(|| infer(RemoteUrl::image_url)),
            name: self.name,
            description: self.description,
            root: self.root,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.trim_end_matches('/').to_string())
}

/// Fully resolved project identity. Immutable for the rest of the invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub repo_url: String,
    /// Container image base, e.g. `ghcr.io/org/demo`.
    pub image_url: String,
    /// Directory holding the project descriptor.
    pub root: PathBuf,
}

impl Project {
    /// Directory the repository is cloned into on a launched workspace: the
    /// last segment of the repository URL, case preserved.
    #[must_use]
    pub fn repo_name(&self) -> &str {
        let repo = self.repo_url.trim_end_matches('/');
        let last = repo.rsplit('/').next().unwrap_or(repo);
        last.strip_suffix(".git").unwrap_or(last)
    }

    /// Pre-built image reference pulled by the launchable.
    #[must_use]
    pub fn launchable_image(&self) -> String {
        format!("{}/{SERVICE_NAME}:{TARGET_BRANCH}", self.image_url)
    }
}
