//! Unit tests for configuration discovery and loading.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use devx_cli::application::services::config_loader::{find_vcs_root, load_config};
use devx_cli::domain::error::ConfigError;
use devx_cli::domain::registry::{Provider, WorkspaceRegistry};

use crate::helpers::{PYPROJECT, load, project_fs, root};
use crate::mocks::MemFs;

fn config_error(fs: &MemFs, start: &str) -> ConfigError {
    let err = load_config(fs, &PathBuf::from(start), &WorkspaceRegistry::builtin())
        .expect_err("config must be rejected");
    err.downcast_ref::<ConfigError>()
        .cloned()
        .expect("a ConfigError")
}

#[test]
fn test_loads_descriptor_and_workspace() {
    let fs = project_fs(PYPROJECT);
    let config = load(&fs);

    assert_eq!(config.project.name, "demo");
    assert_eq!(config.project.root, root());
    assert!(config.project.needs_remote());
    assert_eq!(config.workspace.cloud, Provider::Aws);
    assert_eq!(config.workspace.workspace_group_id(), "devplane-brev-1");
    assert_eq!(config.workspace.ports.len(), 2);
    assert_eq!(config.workspace.ports[1].port, 8000);
    assert_eq!(config.workspace.relative_to_root, ".");
    assert_eq!(config.workspace_file, None);
}

#[test]
fn test_discovery_walks_up_from_subdirectory() {
    let fs = project_fs(PYPROJECT);
    let config = load_config(
        &fs,
        &root().join("notebooks").join("day1"),
        &WorkspaceRegistry::builtin(),
    )
    .unwrap();
    assert_eq!(config.descriptor, root().join("pyproject.toml"));
}

#[test]
fn test_missing_descriptor_is_not_found() {
    let fs = MemFs::new();
    let err = config_error(&fs, "/tmp/empty");
    assert!(matches!(err, ConfigError::NotFound { .. }));
}

#[test]
fn test_relative_root_computed_from_repository() {
    let fs = MemFs::new();
    fs.mkdir("/src/repo/.git");
    fs.put("/src/repo/workshops/intro/pyproject.toml", PYPROJECT);
    let config = load_config(
        &fs,
        &PathBuf::from("/src/repo/workshops/intro"),
        &WorkspaceRegistry::builtin(),
    )
    .unwrap();
    assert_eq!(config.workspace.relative_to_root, "workshops/intro");
    assert_eq!(
        find_vcs_root(&fs, &PathBuf::from("/src/repo/workshops/intro")),
        Some(PathBuf::from("/src/repo"))
    );
}

#[test]
fn test_no_repository_is_invalid_unless_declared() {
    let fs = MemFs::new();
    fs.put("/work/demo/pyproject.toml", PYPROJECT);
    let err = config_error(&fs, "/work/demo");
    assert!(err.to_string().contains(".git"), "got: {err}");

    let declared = PYPROJECT.replace("cloud = \"aws\"", "cloud = \"aws\"\nrelative_to_root = \".\"");
    fs.put("/work/demo/pyproject.toml", &declared);
    assert!(load_config(&fs, &PathBuf::from("/work/demo"), &WorkspaceRegistry::builtin()).is_ok());
}

#[test]
fn test_sibling_workspace_file_used_when_table_absent() {
    let fs = MemFs::new();
    fs.mkdir("/work/demo/.git");
    fs.put(
        "/work/demo/pyproject.toml",
        "[project]\nname = \"demo\"\ndescription = \"Demo\"\n",
    );
    fs.put(
        "/work/demo/brev.toml",
        "instance_type = \"n1\"\ncloud = \"gcp\"\nstorage = 256\nports = [{ name = \"jupyter\", port = 8888 }]\n",
    );
    let config = load(&fs);

    assert_eq!(config.workspace.workspace_group_id(), "GCP");
    assert_eq!(config.workspace.storage, Some(256));
    let brev = PathBuf::from("/work/demo/brev.toml");
    assert_eq!(config.workspace_file.as_ref(), Some(&brev));
    assert!(config.sources().contains(&brev));
}

#[test]
fn test_missing_workspace_section_is_invalid() {
    let fs = MemFs::new();
    fs.put(
        "/work/demo/pyproject.toml",
        "[project]\nname = \"demo\"\ndescription = \"Demo\"\n",
    );
    let err = config_error(&fs, "/work/demo");
    assert!(err.to_string().contains("[tool.brev]"), "got: {err}");
}

#[test]
fn test_missing_project_field_is_invalid() {
    let fs = project_fs(&PYPROJECT.replace("description = \"Demo workshop\"\n", ""));
    let err = config_error(&fs, "/work/demo");
    assert!(err.to_string().contains("project.description"), "got: {err}");
}

#[test]
fn test_unknown_provider_lists_valid_ones() {
    let fs = project_fs(&PYPROJECT.replace("\"aws\"", "\"oracle\""));
    let err = config_error(&fs, "/work/demo");
    assert!(matches!(err, ConfigError::UnknownProvider { .. }));
    assert!(err.to_string().contains("crusoe"), "got: {err}");
}

#[test]
fn test_malformed_toml_is_invalid() {
    let fs = project_fs("[project\nname = ");
    let err = config_error(&fs, "/work/demo");
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn test_sources_cover_every_input() {
    let fs = project_fs(PYPROJECT);
    let sources = load(&fs).sources();
    for name in ["compose.yaml", "docker-compose.yaml", "variables.env", "pyproject.toml"] {
        assert!(sources.contains(&root().join(name)), "{name} missing");
    }
}
