//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod artifacts;
pub mod compose;
pub mod config;
pub mod env;
pub mod error;
pub mod host;
pub mod launchable;
pub mod project;
pub mod registry;
pub mod remote;
pub mod staleness;
pub mod workspace;

pub use compose::ComposeDocument;
pub use error::{ComposeError, ConfigError, PublishError, RemoteError, RuntimeError};
pub use project::Project;
pub use registry::{Provider, WorkspaceGroupConfig, WorkspaceRegistry};
pub use staleness::{Freshness, StaleReason};
pub use workspace::BrevWorkspace;
