//! Application service — configuration loading use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Discovery walks the filesystem through the `WorkspaceFs` port.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::application::ports::WorkspaceFs;
use crate::domain::compose::USER_COMPOSE_FILES;
use crate::domain::config::{
    DESCRIPTOR_FILE, SIBLING_WORKSPACE_FILE, parse_descriptor, parse_workspace_file,
};
use crate::domain::env::ENV_FILE;
use crate::domain::error::ConfigError;
use crate::domain::project::DeclaredProject;
use crate::domain::registry::WorkspaceRegistry;
use crate::domain::workspace::{BrevWorkspace, relative_to_root};

/// Configuration for one invocation. URLs inferred from the remote are
/// resolved later, and only if needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub project: DeclaredProject,
    pub workspace: BrevWorkspace,
    pub descriptor: PathBuf,
    /// Sibling workspace file, when the descriptor has no `[tool.brev]` table.
    pub workspace_file: Option<PathBuf>,
}

impl LoadedConfig {
    /// Directory holding the descriptor.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.project.root
    }

    /// Every file whose change makes generated artifacts stale.
    #[must_use]
    pub fn sources(&self) -> Vec<PathBuf> {
        let root = self.root();
        let mut sources: Vec<PathBuf> = USER_COMPOSE_FILES.iter().map(|f| root.join(f)).collect();
        sources.push(root.join(ENV_FILE));
        sources.push(self.descriptor.clone());
        sources.extend(self.workspace_file.clone());
        sources
    }
}

/// Find the nearest descriptor at or above `start`.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` when no ancestor holds one.
pub fn find_descriptor(fs: &impl WorkspaceFs, start: &Path) -> Result<PathBuf, ConfigError> {
    start
        .ancestors()
        .map(|dir| dir.join(DESCRIPTOR_FILE))
        .find(|candidate| fs.exists(candidate))
        .ok_or_else(|| ConfigError::NotFound {
            start: start.to_path_buf(),
        })
}

/// Nearest ancestor of `root` (inclusive) holding a `.git` entry.
#[must_use]
pub fn find_vcs_root(fs: &impl WorkspaceFs, root: &Path) -> Option<PathBuf> {
    root.ancestors()
        .find(|dir| fs.exists(&dir.join(".git")))
        .map(Path::to_path_buf)
}

/// Load and validate the project descriptor and workspace settings.
///
/// # Errors
///
/// Returns a `ConfigError` when the descriptor is missing or invalid, or an
/// I/O error when a file exists but cannot be read.
pub fn load_config(
    fs: &impl WorkspaceFs,
    start: &Path,
    registry: &WorkspaceRegistry,
) -> Result<LoadedConfig> {
    let descriptor = find_descriptor(fs, start)?;
    debug!(descriptor = %descriptor.display(), "found project descriptor");
    let content = fs
        .read_to_string(&descriptor)?
        .ok_or_else(|| ConfigError::NotFound {
            start: start.to_path_buf(),
        })?;
    let parsed = parse_descriptor(&content, &descriptor)?;
    let project = DeclaredProject::from_decl(parsed.project.as_ref(), &descriptor)?;

    let (decl, source, workspace_file) = match parsed.tool.and_then(|t| t.brev) {
        Some(decl) => (decl, descriptor.clone(), None),
        None => {
            let sibling = project.root.join(SIBLING_WORKSPACE_FILE);
            let content = fs.read_to_string(&sibling)?.ok_or_else(|| {
                ConfigError::invalid(
                    &descriptor,
                    format!("missing [tool.brev] table and no {SIBLING_WORKSPACE_FILE} next to it"),
                )
            })?;
            let decl = parse_workspace_file(&content, &sibling)?;
            (decl, sibling.clone(), Some(sibling))
        }
    };

    let root = project.root.clone();
    let workspace = BrevWorkspace::from_decl(&decl, &source, registry, || {
        let vcs_root = find_vcs_root(fs, &root).ok_or_else(|| {
            ConfigError::invalid(
                &source,
                "no .git directory found above the project; declare `relative_to_root`",
            )
        })?;
        relative_to_root(&vcs_root, &root)
    })?;
    debug!(
        group = workspace.workspace_group_id(),
        relative_to_root = %workspace.relative_to_root,
        "workspace resolved"
    );

    Ok(LoadedConfig {
        project,
        workspace,
        descriptor,
        workspace_file,
    })
}
