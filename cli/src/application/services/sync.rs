//! Application service — artifact synchronisation use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Each artifact is evaluated and regenerated independently; a failure on one
//! never prevents the other from being written.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, warn};

use crate::application::ports::{
    ArtifactCompiler, HostProbe, ProgressReporter, RemoteResolver, WorkspaceFs,
};
use crate::application::services::config_loader::LoadedConfig;
use crate::domain::artifacts::{
    ARTIFACT_DIR, LAUNCHABLE_ARTIFACT, LOCAL_ARTIFACT, LaunchableInputs, LocalInputs,
};
use crate::domain::compose::{ComposeDocument, USER_COMPOSE_FILES};
use crate::domain::env::{ENV_FILE, EnvFile};
use crate::domain::project::{DeclaredProject, Project};
use crate::domain::staleness::{self, Freshness, StaleReason};

/// Host port the interactive service is published on locally by default.
pub const DEFAULT_LOCAL_PORT: u16 = 8888;

const GENERATED_HEADER: &str =
    "# Generated by devx. Edit compose.yaml and run `devx sync` instead.\n";

// ── Types ─────────────────────────────────────────────────────────────────────

/// The two generated artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Local,
    Launchable,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Local, ArtifactKind::Launchable];

    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Local => LOCAL_ARTIFACT,
            ArtifactKind::Launchable => LAUNCHABLE_ARTIFACT,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Local => "local",
            ArtifactKind::Launchable => "launchable",
        }
    }

    /// Location of the artifact under `root`.
    #[must_use]
    pub fn path(self, root: &Path) -> PathBuf {
        root.join(ARTIFACT_DIR).join(self.file_name())
    }
}

/// Options for one sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub force_local: bool,
    pub force_launchable: bool,
    /// Host port for the interactive service in the local artifact.
    pub local_port: u16,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            force_local: false,
            force_launchable: false,
            local_port: DEFAULT_LOCAL_PORT,
        }
    }
}

impl SyncOptions {
    /// Regenerate both artifacts regardless of timestamps.
    #[must_use]
    pub fn forced() -> Self {
        Self {
            force_local: true,
            force_launchable: true,
            ..Self::default()
        }
    }

    fn force(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::Local => self.force_local,
            ArtifactKind::Launchable => self.force_launchable,
        }
    }
}

/// What happened to one artifact.
#[derive(Debug)]
pub enum ArtifactOutcome {
    Regenerated(StaleReason),
    UpToDate,
    Failed(anyhow::Error),
}

#[derive(Debug)]
pub struct ArtifactReport {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub outcome: ArtifactOutcome,
}

/// Per-artifact results of a sync run.
#[derive(Debug)]
pub struct SyncReport {
    pub artifacts: Vec<ArtifactReport>,
}

impl SyncReport {
    #[must_use]
    pub fn get(&self, kind: ArtifactKind) -> Option<&ArtifactReport> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ArtifactReport> {
        self.artifacts
            .iter()
            .filter(|a| matches!(a.outcome, ArtifactOutcome::Failed(_)))
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

// ── Use-case ──────────────────────────────────────────────────────────────────

/// Bring both artifacts up to date.
///
/// The `origin` remote (through `project`) and the host identity are only
/// queried when an artifact is actually compiled.
pub fn sync_artifacts(
    config: &LoadedConfig,
    fs: &impl WorkspaceFs,
    project: &ProjectResolver<'_, impl RemoteResolver>,
    host: &impl HostProbe,
    compiler: &impl ArtifactCompiler,
    reporter: &impl ProgressReporter,
    opts: &SyncOptions,
) -> SyncReport {
    let syncer = Syncer {
        config,
        fs,
        host,
        compiler,
        project,
        opts,
    };

    let artifacts = ArtifactKind::ALL
        .into_iter()
        .map(|kind| {
            let path = kind.path(config.root());
            let outcome = match syncer.sync_one(kind, &path) {
                Ok(Some(reason)) => {
                    reporter.success(&format!("Regenerated {} ({reason})", display(config, &path)));
                    ArtifactOutcome::Regenerated(reason)
                }
                Ok(None) => ArtifactOutcome::UpToDate,
                Err(e) => {
                    reporter.warn(&format!("Failed to generate {}: {e:#}", display(config, &path)));
                    ArtifactOutcome::Failed(e)
                }
            };
            ArtifactReport {
                kind,
                path,
                outcome,
            }
        })
        .collect();

    SyncReport { artifacts }
}

fn display(config: &LoadedConfig, path: &Path) -> String {
    path.strip_prefix(config.root())
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Project resolution memoised for one invocation.
///
/// The `origin` remote is queried on the first [`get`](Self::get) that needs
/// it and never again, whether resolution succeeded or not.
pub struct ProjectResolver<'a, R> {
    declared: &'a DeclaredProject,
    remote: &'a R,
    resolved: OnceCell<Result<Project, String>>,
}

impl<'a, R: RemoteResolver> ProjectResolver<'a, R> {
    #[must_use]
    pub fn new(declared: &'a DeclaredProject, remote: &'a R) -> Self {
        Self {
            declared,
            remote,
            resolved: OnceCell::new(),
        }
    }

    /// The resolved project.
    ///
    /// # Errors
    ///
    /// Returns the resolution error, repeated on every call.
    pub fn get(&self) -> Result<&Project> {
        self.resolved
            .get_or_init(|| {
                self.declared
                    .clone()
                    .resolve(|| self.remote.origin_url(&self.declared.root))
                    .map_err(|e| format!("{e:#}"))
            })
            .as_ref()
            .map_err(|e| anyhow!("{e}"))
    }
}

struct Syncer<'a, F, R, H, C> {
    config: &'a LoadedConfig,
    fs: &'a F,
    host: &'a H,
    compiler: &'a C,
    project: &'a ProjectResolver<'a, R>,
    opts: &'a SyncOptions,
}

impl<F, R, H, C> Syncer<'_, F, R, H, C>
where
    F: WorkspaceFs,
    R: RemoteResolver,
    H: HostProbe,
    C: ArtifactCompiler,
{
    /// `Some(reason)` when the artifact was rewritten.
    fn sync_one(&self, kind: ArtifactKind, path: &Path) -> Result<Option<StaleReason>> {
        let artifact = self.fs.modified(path)?;
        let sources = self
            .config
            .sources()
            .into_iter()
            .map(|p| {
                let modified = self.fs.modified(&p)?;
                Ok((p, modified))
            })
            .collect::<Result<Vec<_>>>()?;

        let reason = match staleness::evaluate(artifact, &sources, self.opts.force(kind)) {
            Freshness::Fresh => {
                debug!(artifact = kind.label(), "up to date");
                return Ok(None);
            }
            Freshness::Stale(reason) => reason,
        };
        debug!(artifact = kind.label(), %reason, "stale");

        let doc = self.user_compose()?;
        let env_file = self.env_file()?;
        let project = self.project.get()?;
        let compiled = match kind {
            ArtifactKind::Local => self.compiler.compile_local(
                doc,
                &LocalInputs {
                    project,
                    ports: &self.config.workspace.ports,
                    local_port: self.opts.local_port,
                    env_file: &env_file,
                    host: self.host.identity()?,
                },
            ),
            ArtifactKind::Launchable => self.compiler.compile_launchable(
                doc,
                &LaunchableInputs {
                    project,
                    workspace: &self.config.workspace,
                    env_file: &env_file,
                },
            ),
        };

        let yaml = compiled
            .to_yaml()
            .with_context(|| format!("failed to serialize {}", kind.file_name()))?;
        if let Some(dir) = path.parent() {
            self.fs.create_dir_all(dir)?;
        }
        self.fs.write(path, &format!("{GENERATED_HEADER}{yaml}"))?;
        info!(path = %path.display(), %reason, "artifact written");
        Ok(Some(reason))
    }

    /// First existing user compose file, or an empty document.
    fn user_compose(&self) -> Result<ComposeDocument> {
        for name in USER_COMPOSE_FILES {
            let path = self.config.root().join(name);
            if let Some(content) = self.fs.read_to_string(&path)? {
                return Ok(ComposeDocument::parse(&content, &path)?);
            }
        }
        Ok(ComposeDocument::empty())
    }

    fn env_file(&self) -> Result<Vec<(String, String)>> {
        let path = self.config.root().join(ENV_FILE);
        let Some(content) = self.fs.read_to_string(&path)? else {
            return Ok(Vec::new());
        };
        let parsed = EnvFile::parse(&content);
        for line in &parsed.skipped {
            warn!(file = %path.display(), line, "skipping malformed environment line");
        }
        Ok(parsed.vars)
    }
}
