//! Launchable creation request — payload types and derivations.
//!
//! Pure: building the request needs only the resolved project and workspace.
//! Credentials and transport live in `crate::infra::launchable_api`.

use serde::{Deserialize, Serialize};

use crate::domain::artifacts::{ARTIFACT_DIR, LAUNCHABLE_ARTIFACT};
use crate::domain::config::Port;
use crate::domain::project::{Project, TARGET_BRANCH};
use crate::domain::workspace::BrevWorkspace;

/// Default API base, overridable with `DEVX_BREV_API_URL`.
pub const DEFAULT_API_BASE: &str = "https://brevapi2.us-west-2-prod.control-plane.brev.dev";

/// Attribution tag appended to the create endpoint.
pub const UTM_SOURCE: &str = "devx-cli";

const DEPLOY_LINK_BASE: &str = "https://brev.nvidia.com/launchable/deploy/now";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchableRequest {
    pub name: String,
    pub create_workspace_request: CreateWorkspaceRequest,
    pub build_request: BuildRequest,
    pub file: FileRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceRequest {
    pub instance_type: String,
    pub workspace_group_id: String,
    /// Storage size in GB, empty for the group default.
    pub storage: String,
    pub firewall_rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub ports: Vec<PortEntry>,
    pub docker_compose: DockerCompose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortEntry {
    pub name: String,
    pub port: String,
}

impl From<&Port> for PortEntry {
    fn from(port: &Port) -> Self {
        Self {
            name: port.name.clone(),
            port: port.port.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerCompose {
    pub file_url: String,
    pub jupyter_install: bool,
    pub registries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRef {
    pub url: String,
    pub path: String,
}

/// Response body of a successful create call. Other fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LaunchableCreated {
    #[serde(default)]
    pub id: String,
}

/// Build the create request for `project` deployed on `workspace`.
#[must_use]
pub fn build_request(project: &Project, workspace: &BrevWorkspace) -> LaunchableRequest {
    LaunchableRequest {
        name: project.description.clone(),
        create_workspace_request: CreateWorkspaceRequest {
            instance_type: workspace.instance_type.clone(),
            workspace_group_id: workspace.workspace_group_id().to_string(),
            storage: workspace
                .storage
                .map(|gb| gb.to_string())
                .unwrap_or_default(),
            firewall_rules: Vec::new(),
        },
        build_request: BuildRequest {
            ports: workspace.ports.iter().map(PortEntry::from).collect(),
            docker_compose: DockerCompose {
                file_url: compose_file_url(&project.repo_url, workspace.root_suffix()),
                jupyter_install: false,
                registries: Vec::new(),
            },
        },
        file: FileRef {
            url: project.repo_url.clone(),
            path: "./".into(),
        },
    }
}

/// Raw URL of the committed launchable artifact on the target branch.
#[must_use]
pub fn compose_file_url(repo_url: &str, root_suffix: Option<&str>) -> String {
    let repo = repo_url.trim_end_matches('/');
    match root_suffix {
        Some(rel) => format!("{repo}/raw/{TARGET_BRANCH}/{rel}/{ARTIFACT_DIR}/{LAUNCHABLE_ARTIFACT}"),
        None => format!("{repo}/raw/{TARGET_BRANCH}/{ARTIFACT_DIR}/{LAUNCHABLE_ARTIFACT}"),
    }
}

/// Create endpoint for `org_id` under `api_base`.
#[must_use]
pub fn endpoint(api_base: &str, org_id: &str) -> String {
    format!(
        "{}/api/organizations/{org_id}/v2/launchables?utm_source={UTM_SOURCE}",
        api_base.trim_end_matches('/')
    )
}

/// Link that deploys the created launchable.
#[must_use]
pub fn deploy_link(launchable_id: &str) -> String {
    format!("{DEPLOY_LINK_BASE}?launchableID={launchable_id}")
}
