//! Brev workspace deployment parameters.
//!
//! Pure functions only — validation against the injected registry happens
//! here; discovering the version-control root is the caller's job.

use std::path::{Component, Path};

use crate::domain::config::{Port, WorkspaceDecl, required};
use crate::domain::error::ConfigError;
use crate::domain::registry::{Provider, WorkspaceGroupConfig, WorkspaceRegistry};

/// Name of the port served by the primary interactive service.
pub const INTERACTIVE_PORT_NAME: &str = "jupyter";

/// Validated deployment parameters with the workspace group resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrevWorkspace {
    pub instance_type: String,
    pub cloud: Provider,
    pub group: WorkspaceGroupConfig,
    pub storage: Option<u32>,
    pub ports: Vec<Port>,
    /// Path from the version-control root to the project root, `.` when equal.
    pub relative_to_root: String,
    pub valid_driver_versions: Option<Vec<u32>>,
}

impl BrevWorkspace {
    /// Validate a declaration and resolve its workspace group.
    ///
    /// `computed_root` supplies the fallback for an undeclared
    /// `relative_to_root`; it is only called in that case.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a required field is missing, the provider is
    /// unknown or has no workspace group, the group's driver version is not
    /// accepted, or custom storage is requested on a fixed-storage group.
    pub fn from_decl(
        decl: &WorkspaceDecl,
        source: &Path,
        registry: &WorkspaceRegistry,
        computed_root: impl FnOnce() -> Result<String, ConfigError>,
    ) -> Result<Self, ConfigError> {
        let instance_type = required(decl.instance_type.as_deref(), "instance_type", source)?;
        let cloud: Provider = required(decl.cloud.as_deref(), "cloud", source)?.parse()?;
        let ports = decl
            .ports
            .clone()
            .ok_or_else(|| ConfigError::invalid(source, "missing required field `ports`"))?;
        let group = registry.resolve(cloud)?.clone();

        if let (Some(valid), Some(driver)) = (&decl.valid_driver_versions, group.nvidia_driver_version)
            && !valid.contains(&driver)
        {
            return Err(ConfigError::invalid(
                source,
                format!(
                    "cloud provider '{cloud}' has NVIDIA driver version {driver}, but valid versions are: {valid:?}"
                ),
            ));
        }

        if decl.storage.is_some() && !group.flexible_storage {
            return Err(ConfigError::invalid(
                source,
                format!(
                    "workspace group '{}' does not support a custom storage size",
                    group.name
                ),
            ));
        }

        let relative_to_root = match decl.relative_to_root.as_deref().map(str::trim) {
            Some(declared) if !declared.is_empty() => normalize_relative(declared),
            _ => computed_root()?,
        };

        Ok(Self {
            instance_type: instance_type.to_string(),
            cloud,
            group,
            storage: decl.storage,
            ports,
            relative_to_root,
            valid_driver_versions: decl.valid_driver_versions.clone(),
        })
    }

    /// Identifier of the resolved workspace group.
    #[must_use]
    pub fn workspace_group_id(&self) -> &str {
        &self.group.name
    }

    /// `relative_to_root` as a path suffix, `None` when the project sits at
    /// the repository root.
    #[must_use]
    pub fn root_suffix(&self) -> Option<&str> {
        match self.relative_to_root.as_str() {
            "" | "." => None,
            rel => Some(rel),
        }
    }
}

/// Relative path from `vcs_root` to `project_root`.
///
/// # Errors
///
/// Returns `ConfigError::Invalid` if `project_root` is not inside `vcs_root`.
pub fn relative_to_root(vcs_root: &Path, project_root: &Path) -> Result<String, ConfigError> {
    let rel = project_root.strip_prefix(vcs_root).map_err(|_| {
        ConfigError::invalid(
            project_root,
            format!("project is not inside repository {}", vcs_root.display()),
        )
    })?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        Ok(".".to_string())
    } else {
        Ok(parts.join("/"))
    }
}

fn normalize_relative(declared: &str) -> String {
    let trimmed = declared.trim_start_matches("./").trim_matches('/');
    if trimmed.is_empty() {
        ".".to_string()
    } else {
        trimmed.to_string()
    }
}
