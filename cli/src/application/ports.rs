//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::{ExitStatus, Output};
use std::time::SystemTime;

use anyhow::Result;

use crate::domain::artifacts::{self, LaunchableInputs, LocalInputs};
use crate::domain::compose::ComposeDocument;
use crate::domain::host::HostIdentity;
use crate::domain::launchable::{LaunchableCreated, LaunchableRequest};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a program in `cwd` with inherited stdio and return its exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run_status(&self, program: &str, args: &[&str], cwd: &Path) -> Result<ExitStatus>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts the project tree so staleness can be tested with controlled
/// modification times.
pub trait WorkspaceFs {
    /// Whether `path` exists (file or directory).
    fn exists(&self, path: &Path) -> bool;

    /// Modification time of `path`, `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the path exists but its metadata cannot be read.
    fn modified(&self, path: &Path) -> Result<Option<SystemTime>>;

    /// Read a file, `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn read_to_string(&self, path: &Path) -> Result<Option<String>>;

    /// Replace the contents of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Create `path` and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
}

// ── Host and VCS Ports ────────────────────────────────────────────────────────

/// Reads the `origin` remote of the working copy holding a project.
pub trait RemoteResolver {
    /// URL of the `origin` remote for the working copy containing `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote cannot be queried.
    fn origin_url(&self, root: &Path) -> Result<String>;
}

/// Reads the identity of the invoking host user.
pub trait HostProbe {
    /// Invoker uid/gid and the host's docker group id.
    ///
    /// # Errors
    ///
    /// Returns an error if the ids cannot be determined.
    fn identity(&self) -> Result<HostIdentity>;
}

// ── Compiler Port ─────────────────────────────────────────────────────────────

/// Artifact compilation seam. The default methods call the pure compilers;
/// tests substitute counting implementations.
pub trait ArtifactCompiler {
    fn compile_local(&self, doc: ComposeDocument, inputs: &LocalInputs<'_>) -> ComposeDocument {
        artifacts::compile_local(doc, inputs)
    }

    fn compile_launchable(
        &self,
        doc: ComposeDocument,
        inputs: &LaunchableInputs<'_>,
    ) -> ComposeDocument {
        artifacts::compile_launchable(doc, inputs)
    }
}

/// The production compiler.
pub struct PureCompiler;

impl ArtifactCompiler for PureCompiler {}

// ── Launchable Ports ──────────────────────────────────────────────────────────

/// API credentials of the logged-in Brev user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrevCredentials {
    pub access_token: String,
    pub org_id: String,
}

/// Loads stored Brev credentials.
pub trait CredentialStore {
    /// # Errors
    ///
    /// Returns `PublishError::MissingCredentials` when the user is not logged
    /// in, or an error if the stored files are unreadable.
    fn load(&self) -> Result<BrevCredentials>;
}

/// Submits launchable creation requests.
pub trait LaunchableApi {
    /// Base URL requests are sent to.
    fn api_base(&self) -> String;

    /// POST `request` to `url` with bearer `token`.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Rejected` carrying the response payload when
    /// the API refuses the request, or a transport error.
    fn create(
        &self,
        url: &str,
        token: &str,
        request: &LaunchableRequest,
    ) -> Result<LaunchableCreated>;
}
