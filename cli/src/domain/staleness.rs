//! Artifact freshness evaluation.
//!
//! An artifact is stale iff it is missing, regeneration is forced, or any
//! existing source was modified strictly after it. Missing sources are ignored.

use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

/// Why an artifact must be regenerated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    Missing,
    Forced,
    SourceNewer(PathBuf),
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::Missing => write!(f, "missing"),
            StaleReason::Forced => write!(f, "forced"),
            StaleReason::SourceNewer(path) => {
                let name = path
                    .file_name()
                    .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
                write!(f, "{name} changed")
            }
        }
    }
}

/// Outcome of a freshness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale(StaleReason),
}

impl Freshness {
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Freshness::Stale(_))
    }
}

/// Decide whether an artifact needs regenerating.
///
/// `artifact` is the artifact's modification time, `None` when it does not
/// exist. Each source carries its modification time, `None` when missing.
/// The first newer source in `sources` order is reported.
/// A deleted source never makes an artifact stale; `force` covers that case.
#[must_use]
pub fn evaluate(
    artifact: Option<SystemTime>,
    sources: &[(PathBuf, Option<SystemTime>)],
    force: bool,
) -> Freshness {
    let Some(artifact) = artifact else {
        return Freshness::Stale(StaleReason::Missing);
    };
    if force {
        return Freshness::Stale(StaleReason::Forced);
    }
    sources
        .iter()
        .find(|(_, modified)| modified.is_some_and(|m| m > artifact))
        .map_or(Freshness::Fresh, |(path, _)| {
            Freshness::Stale(StaleReason::SourceNewer(path.clone()))
        })
}
