//! Brev infrastructure — stored credentials and the launchable HTTP API.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::ports::{BrevCredentials, CredentialStore, LaunchableApi};
use crate::domain::error::PublishError;
use crate::domain::launchable::{DEFAULT_API_BASE, LaunchableCreated, LaunchableRequest};

const CREDENTIALS_FILE: &str = "credentials.json";
const ACTIVE_ORG_FILE: &str = "active_org.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "devx-cli";

// ── Credentials ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CredentialsFile {
    access_token: String,
}

#[derive(Deserialize)]
struct ActiveOrgFile {
    id: String,
}

/// Credentials written by `brev login` under the Brev home directory.
pub struct BrevHome {
    dir: PathBuf,
}

impl BrevHome {
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// `DEVX_BREV_HOME`, else `~/.brev`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        if let Ok(dir) = std::env::var("DEVX_BREV_HOME")
            && !dir.is_empty()
        {
            return Ok(Self::new(PathBuf::from(dir)));
        }
        let home = dirs::home_dir().context("cannot determine home directory")?;
        Ok(Self::new(home.join(".brev")))
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PublishError::MissingCredentials { path }.into());
            }
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CredentialStore for BrevHome {
    fn load(&self) -> Result<BrevCredentials> {
        let credentials: CredentialsFile = self.read_json(CREDENTIALS_FILE)?;
        let org: ActiveOrgFile = self.read_json(ACTIVE_ORG_FILE)?;
        Ok(BrevCredentials {
            access_token: credentials.access_token,
            org_id: org.id,
        })
    }
}

// ── HTTP API ──────────────────────────────────────────────────────────────────

/// Blocking `ureq` client for the launchable endpoint.
pub struct HttpLaunchableApi {
    base: String,
}

impl HttpLaunchableApi {
    /// `DEVX_BREV_API_URL`, else the production API.
    #[must_use]
    pub fn from_env() -> Self {
        let base = std::env::var("DEVX_BREV_API_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self { base }
    }
}

impl LaunchableApi for HttpLaunchableApi {
    fn api_base(&self) -> String {
        self.base.clone()
    }

    fn create(
        &self,
        url: &str,
        token: &str,
        request: &LaunchableRequest,
    ) -> Result<LaunchableCreated> {
        let body = serde_json::to_string(request).context("serializing launchable request")?;
        let response = ureq::post(url)
            .set("Authorization", &format!("Bearer {token}"))
            .set("Content-Type", "application/json")
            .set("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send_string(&body);

        let text = match response {
            Ok(resp) => resp.into_string().context("reading response")?,
            Err(ureq::Error::Status(code, resp)) => {
                let payload = resp.into_string().unwrap_or_default();
                return Err(PublishError::Rejected(format!("HTTP {code}: {payload}")).into());
            }
            Err(e) => return Err(e).context("cannot reach the Brev API"),
        };

        serde_json::from_str(&text).map_err(|_| {
            anyhow::Error::from(PublishError::Rejected(format!("unexpected response: {text}")))
        })
    }
}
