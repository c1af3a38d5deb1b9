//! Application service — launchable publishing use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! Confirmation is the caller's job, between `prepare` and `submit`.

use anyhow::{Result, bail};
use tracing::{debug, info};

use crate::application::ports::{BrevCredentials, CredentialStore, LaunchableApi};
use crate::domain::error::PublishError;
use crate::domain::launchable::{self, LaunchableRequest};
use crate::domain::project::Project;
use crate::domain::workspace::BrevWorkspace;

/// Stand-in for the organisation id in a dry run without credentials.
pub const ORG_PLACEHOLDER: &str = "<org-id>";

/// A request ready to send.
#[derive(Debug, Clone)]
pub struct PublishPlan {
    pub url: String,
    pub request: LaunchableRequest,
    credentials: Option<BrevCredentials>,
}

/// A created launchable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub id: String,
    pub deploy_link: String,
}

/// Build the request and resolve the endpoint.
///
/// A dry run tolerates missing credentials and fills the organisation id
/// with [`ORG_PLACEHOLDER`].
///
/// # Errors
///
/// Returns `PublishError::MissingCredentials` (outside a dry run) or an
/// error if the stored credentials are unreadable.
pub fn prepare(
    store: &impl CredentialStore,
    api: &impl LaunchableApi,
    project: &Project,
    workspace: &BrevWorkspace,
    dry_run: bool,
) -> Result<PublishPlan> {
    let credentials = if dry_run {
        store.load().ok()
    } else {
        Some(store.load()?)
    };
    let org_id = credentials
        .as_ref()
        .map_or(ORG_PLACEHOLDER, |c| c.org_id.as_str());
    Ok(PublishPlan {
        url: launchable::endpoint(&api.api_base(), org_id),
        request: launchable::build_request(project, workspace),
        credentials,
    })
}

/// Send a prepared request.
///
/// # Errors
///
/// Returns `PublishError::Rejected` when the API refuses the request or
/// answers without a launchable id.
pub fn submit(api: &impl LaunchableApi, plan: &PublishPlan) -> Result<Published> {
    let Some(credentials) = &plan.credentials else {
        bail!("cannot submit a plan prepared without credentials");
    };
    debug!(url = %plan.url, "creating launchable");
    let created = api.create(&plan.url, &credentials.access_token, &plan.request)?;
    if created.id.is_empty() {
        return Err(PublishError::Rejected("response did not include a launchable id".into()).into());
    }
    info!(id = %created.id, "launchable created");
    Ok(Published {
        deploy_link: launchable::deploy_link(&created.id),
        id: created.id,
    })
}
