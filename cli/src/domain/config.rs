//! Raw declarations read from the project descriptor.
//!
//! Pure functions only — no I/O, no filesystem access. These structs hold
//! exactly what the user wrote; computed fallbacks are applied later by
//! `domain::project` and `domain::workspace`.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// File name of the project descriptor.
pub const DESCRIPTOR_FILE: &str = "pyproject.toml";

/// Sibling file consulted when the descriptor carries no `[tool.brev]` table.
pub const SIBLING_WORKSPACE_FILE: &str = "brev.toml";

// ── Port ─────────────────────────────────────────────────────────────────────

/// A named port exposed by the workshop container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    #[serde(deserialize_with = "port_number")]
    pub port: u16,
}

impl Port {
    #[must_use]
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
        }
    }
}

/// Accepts `8888` as well as `"8888"`.
fn port_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u16),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port number '{s}'"))),
    }
}

// ── Descriptor schema ────────────────────────────────────────────────────────

/// Top-level shape of `pyproject.toml`. Unknown tables are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Descriptor {
    #[serde(default)]
    pub project: Option<ProjectDecl>,
    #[serde(default)]
    pub tool: Option<ToolDecl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolDecl {
    #[serde(default)]
    pub brev: Option<WorkspaceDecl>,
}

/// `[project]` as written by the user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectDecl {
    pub name: Option<String>,
    pub description: Option<String>,
    pub repo_url: Option<String>,
    pub image_url: Option<String>,
}

/// `[tool.brev]` (or a sibling `brev.toml`) as written by the user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceDecl {
    pub instance_type: Option<String>,
    pub cloud: Option<String>,
    pub storage: Option<u32>,
    pub ports: Option<Vec<Port>>,
    pub relative_to_root: Option<String>,
    pub valid_driver_versions: Option<Vec<u32>>,
}

/// Parse descriptor content.
///
/// # Errors
///
/// Returns `ConfigError::Invalid` if the content is not valid TOML or does not
/// match the expected field types.
pub fn parse_descriptor(content: &str, path: &Path) -> Result<Descriptor, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::invalid(path, e.message()))
}

/// Parse a sibling workspace file whose keys sit at top level.
///
/// # Errors
///
/// Returns `ConfigError::Invalid` if the content is not valid TOML.
pub fn parse_workspace_file(content: &str, path: &Path) -> Result<WorkspaceDecl, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::invalid(path, e.message()))
}

/// Unwrap a required declared field.
///
/// # Errors
///
/// Returns `ConfigError::Invalid` naming `field` when it is absent or blank.
pub fn required<'a>(value: Option<&'a str>, field: &str, path: &Path) -> Result<&'a str, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::invalid(
            path,
            format!("missing required field `{field}`"),
        )),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
