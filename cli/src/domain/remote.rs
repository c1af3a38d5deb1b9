//! Version-control remote parsing.
//!
//! Pure functions only — the caller supplies the raw `origin` URL.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::RemoteError;

/// Registry host used for inferred container images.
pub const IMAGE_REGISTRY: &str = "ghcr.io";

#[allow(clippy::expect_used)] // literal patterns, validated by the unit tests below
static SSH_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^git@([^:/]+):/?(.+?)(?:\.git)?/?$").expect("valid ssh remote pattern")
});

#[allow(clippy::expect_used)]
static HTTPS_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://(?:[^@/]+@)?([^/]+)/(.+?)(?:\.git)?/?$")
        .expect("valid https remote pattern")
});

/// A remote split into host and repository path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    pub host: String,
    /// Repository path without leading slash or `.git` suffix, e.g. `org/demo`.
    pub path: String,
}

impl RemoteUrl {
    /// Parse an SSH-style (`git@host:path.git`) or HTTPS-style remote.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::UnsupportedFormat` for any other shape.
    pub fn parse(remote: &str) -> Result<Self, RemoteError> {
        let remote = remote.trim();
        let caps = SSH_REMOTE
            .captures(remote)
            .or_else(|| HTTPS_REMOTE.captures(remote))
            .ok_or_else(|| RemoteError::UnsupportedFormat(remote.to_string()))?;
        Ok(Self {
            host: caps[1].to_string(),
            path: caps[2].to_string(),
        })
    }

    /// Canonical HTTPS URL of the repository.
    #[must_use]
    pub fn https_url(&self) -> String {
        format!("https://{}/{}", self.host, self.path)
    }

    /// Container image base URL published for this repository.
    #[must_use]
    pub fn image_url(&self) -> String {
        format!("{IMAGE_REGISTRY}/{}", self.path.to_ascii_lowercase())
    }
}

/// Infer the HTTPS repository URL from a remote.
///
/// # Errors
///
/// Returns `RemoteError::UnsupportedFormat` if the remote is not recognised.
pub fn infer_repo_url(remote: &str) -> Result<String, RemoteError> {
    RemoteUrl::parse(remote).map(|r| r.https_url())
}

/// Infer the container image base URL from a remote.
///
/// # Errors
///
/// Returns `RemoteError::UnsupportedFormat` if the remote is not recognised.
pub fn infer_image_url(remote: &str) -> Result<String, RemoteError> {
    RemoteUrl::parse(remote).map(|r| r.image_url())
}
