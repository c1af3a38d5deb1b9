//! Workspace group catalog.
//!
//! Pure data — the registry is constructed once at process start and handed
//! to every consumer by reference. Nothing mutates it afterwards.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Group id assumed for the container runtime socket on hosts that do not
/// declare one.
pub const DEFAULT_DOCKER_GID: u32 = 999;

// ── Provider ─────────────────────────────────────────────────────────────────

/// Supported cloud providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Crusoe,
    Gcp,
    Aws,
    Azure,
    Lambda,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::Crusoe,
        Provider::Gcp,
        Provider::Aws,
        Provider::Azure,
        Provider::Lambda,
    ];

    /// Lowercase tag used in descriptors and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Crusoe => "crusoe",
            Provider::Gcp => "gcp",
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Lambda => "lambda",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| ConfigError::UnknownProvider {
                provider: s.to_string(),
                valid: Provider::ALL.map(Provider::as_str).join(", "),
            })
    }
}

// ── WorkspaceGroupConfig ─────────────────────────────────────────────────────

/// Physical characteristics of a deployment target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceGroupConfig {
    /// Workspace group identifier sent to the provisioning API.
    pub name: String,
    /// Host directory backed by fast local storage, shared across restarts.
    pub data_dir: Option<PathBuf>,
    pub provider: Option<Provider>,
    /// Whether a custom storage size may be requested.
    pub flexible_storage: bool,
    /// Major version of the installed NVIDIA driver.
    pub nvidia_driver_version: Option<u32>,
    /// Group id owning the container runtime socket on the host.
    pub docker_gid: u32,
}

impl WorkspaceGroupConfig {
    /// A group with only a name; every other field takes its default.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_dir: None,
            provider: None,
            flexible_storage: true,
            nvidia_driver_version: None,
            docker_gid: DEFAULT_DOCKER_GID,
        }
    }
}

// ── WorkspaceRegistry ────────────────────────────────────────────────────────

/// Immutable lookup table of known workspace groups.
#[derive(Debug, Clone)]
pub struct WorkspaceRegistry {
    groups: Vec<WorkspaceGroupConfig>,
}

impl WorkspaceRegistry {
    #[must_use]
    pub fn new(groups: Vec<WorkspaceGroupConfig>) -> Self {
        Self { groups }
    }

    /// The catalog of workspace groups known to this release.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            WorkspaceGroupConfig {
                data_dir: Some(PathBuf::from("/ephemeral")),
                provider: Some(Provider::Crusoe),
                flexible_storage: false,
                nvidia_driver_version: Some(570),
                ..WorkspaceGroupConfig::named("crusoe-brev-wg")
            },
            WorkspaceGroupConfig {
                provider: Some(Provider::Gcp),
                nvidia_driver_version: Some(550),
                ..WorkspaceGroupConfig::named("GCP")
            },
            WorkspaceGroupConfig {
                provider: Some(Provider::Aws),
                nvidia_driver_version: Some(570),
                docker_gid: 998,
                ..WorkspaceGroupConfig::named("devplane-brev-1")
            },
        ])
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&WorkspaceGroupConfig> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// First group registered for the given provider.
    #[must_use]
    pub fn by_provider(&self, provider: Provider) -> Option<&WorkspaceGroupConfig> {
        self.groups.iter().find(|g| g.provider == Some(provider))
    }

    /// Resolve the provider to its workspace group.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoWorkspaceGroup` if no group serves the provider.
    pub fn resolve(&self, provider: Provider) -> Result<&WorkspaceGroupConfig, ConfigError> {
        self.by_provider(provider)
            .ok_or_else(|| ConfigError::NoWorkspaceGroup {
                provider: provider.to_string(),
                available: self.providers().join(", "),
            })
    }

    /// Provider tags that resolve to a group, in catalog order.
    #[must_use]
    pub fn providers(&self) -> Vec<&'static str> {
        self.groups
            .iter()
            .filter_map(|g| g.provider.map(Provider::as_str))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkspaceGroupConfig> {
        self.groups.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
