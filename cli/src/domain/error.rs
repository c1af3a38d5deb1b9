//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while loading the project descriptor and workspace settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No pyproject.toml found in {} or any parent directory.", start.display())]
    NotFound { start: PathBuf },

    #[error("Invalid configuration in {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("Unknown cloud provider '{provider}'. Valid providers: {valid}")]
    UnknownProvider { provider: String, valid: String },

    #[error("No workspace group found for cloud provider '{provider}'. Available providers: {available}")]
    NoWorkspaceGroup { provider: String, available: String },
}

impl ConfigError {
    /// Shorthand for an `Invalid` error against a given file.
    #[must_use]
    pub fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            message: message.into(),
        }
    }
}

// ── Remote errors ─────────────────────────────────────────────────────────────

/// Errors related to version-control remote metadata.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Unsupported remote URL format: {0}")]
    UnsupportedFormat(String),
}

// ── Compose errors ────────────────────────────────────────────────────────────

/// Errors related to reading a user compose document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Invalid compose syntax in {}: {message}", path.display())]
    InvalidSyntax { path: PathBuf, message: String },
}

// ── Runtime errors ────────────────────────────────────────────────────────────

/// Errors raised by the container runtime.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("docker compose {subcommand} failed ({status})")]
    ComposeFailed { subcommand: String, status: String },
}

// ── Publish errors ────────────────────────────────────────────────────────────

/// Errors raised while creating a launchable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PublishError {
    #[error("Brev credentials not found at {}. Run `brev login` first.", path.display())]
    MissingCredentials { path: PathBuf },

    #[error("Launchable creation failed: {0}")]
    Rejected(String),
}
