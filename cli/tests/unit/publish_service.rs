//! Unit tests for the launchable publishing service.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use devx_cli::application::services::publish::{ORG_PLACEHOLDER, prepare, submit};
use devx_cli::domain::config::Port;
use devx_cli::domain::error::PublishError;
use devx_cli::domain::project::Project;
use devx_cli::domain::registry::{Provider, WorkspaceRegistry};
use devx_cli::domain::workspace::BrevWorkspace;

use crate::mocks::{StubApi, StubCredentials};

fn project() -> Project {
    Project {
        name: "demo".into(),
        description: "Demo workshop".into(),
        repo_url: "https://github.com/org/demo".into(),
        image_url: "ghcr.io/org/demo".into(),
        root: PathBuf::from("/work/demo"),
    }
}

fn workspace() -> BrevWorkspace {
    let registry = WorkspaceRegistry::builtin();
    BrevWorkspace {
        instance_type: "l40s-48gb.1x".into(),
        cloud: Provider::Crusoe,
        group: registry.resolve(Provider::Crusoe).unwrap().clone(),
        storage: None,
        ports: vec![Port::new("jupyter", 8888)],
        relative_to_root: "workshops/intro".into(),
        valid_driver_versions: None,
    }
}

#[test]
fn test_dry_run_without_credentials_uses_placeholder() {
    let api = StubApi::answering("unused");
    let plan = prepare(&StubCredentials(None), &api, &project(), &workspace(), true).unwrap();

    assert!(plan.url.contains(ORG_PLACEHOLDER), "url: {}", plan.url);
    assert_eq!(
        plan.request.build_request.docker_compose.file_url,
        "https://github.com/org/demo/raw/main/workshops/intro/.devx/compose.yaml"
    );
    assert!(submit(&api, &plan).is_err());
    assert!(api.sent.borrow().is_empty());
}

#[test]
fn test_missing_credentials_fail_outside_dry_run() {
    let api = StubApi::answering("unused");
    let err = prepare(&StubCredentials(None), &api, &project(), &workspace(), false).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PublishError>(),
        Some(PublishError::MissingCredentials { .. })
    ));
}

#[test]
fn test_submit_sends_request_and_returns_link() {
    let api = StubApi::answering("env-7");
    let plan = prepare(&StubCredentials::logged_in(), &api, &project(), &workspace(), false)
        .unwrap();

    let published = submit(&api, &plan).unwrap();

    assert_eq!(published.id, "env-7");
    assert_eq!(
        published.deploy_link,
        "https://brev.nvidia.com/launchable/deploy/now?launchableID=env-7"
    );
    let sent = api.sent.borrow();
    let (url, token, request) = &sent[0];
    assert_eq!(
        url,
        "https://api.test/api/organizations/org-42/v2/launchables?utm_source=devx-cli"
    );
    assert_eq!(token, "token-123");
    assert_eq!(request.create_workspace_request.workspace_group_id, "crusoe-brev-wg");
    assert_eq!(request.name, "Demo workshop");
}

#[test]
fn test_empty_id_is_rejected() {
    let api = StubApi::answering("");
    let plan = prepare(&StubCredentials::logged_in(), &api, &project(), &workspace(), false)
        .unwrap();
    let err = submit(&api, &plan).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PublishError>(),
        Some(PublishError::Rejected(_))
    ));
}
