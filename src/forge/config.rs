//! Configuration for the release-tracking forge connection.
use secrecy::SecretString;

use crate::{ReleaseToolsError, Result};

/// Host of the public GitHub instance.
pub const DEFAULT_HOST: &str = "github.com";
/// Page size used when listing milestones, issues and releases.
pub const DEFAULT_PAGE_SIZE: u8 = 100;
/// Upper bound on a single release asset upload.
pub const UPLOAD_TIMEOUT_SECS: u64 = 100;

/// Remote repository connection configuration, passed explicitly to the
/// forge client rather than held as process-wide state.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Remote forge host (e.g., "github.com").
    pub host: String,
    /// URL scheme (http or https).
    pub scheme: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token for authentication.
    pub token: SecretString,
    /// Base URL for links to a release by tag.
    pub release_link_base_url: String,
    /// Log mutating calls instead of sending them.
    pub dry_run: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "".to_string(),
            scheme: "".to_string(),
            owner: "".to_string(),
            repo: "".to_string(),
            token: SecretString::from("".to_string()),
            release_link_base_url: "".to_string(),
            dry_run: false,
        }
    }
}

impl RemoteConfig {
    /// Build a GitHub remote for `owner/repo`.
    pub fn github(
        owner: &str,
        repo: &str,
        token: SecretString,
        dry_run: bool,
    ) -> Self {
        let scheme = "https".to_string();
        let host = DEFAULT_HOST.to_string();
        let release_link_base_url =
            format!("{scheme}://{host}/{owner}/{repo}/releases/tag");

        Self {
            host,
            scheme,
            owner: owner.to_string(),
            repo: repo.to_string(),
            token,
            release_link_base_url,
            dry_run,
        }
    }

    /// Base URI of the REST API for this remote.
    pub fn api_base_uri(&self) -> String {
        format!("{}://api.{}", self.scheme, self.host)
    }

    /// Public link to the release with the given tag.
    pub fn release_link(&self, tag: &str) -> String {
        format!("{}/{}", self.release_link_base_url, tag)
    }
}

/// Split an `owner/repo` slug. A bare repo name falls back to
/// `default_owner` when one is given.
pub fn parse_repo_slug(
    slug: &str,
    default_owner: Option<&str>,
) -> Result<(String, String)> {
    let parts = slug.split('/').collect::<Vec<&str>>();

    match parts.as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        [repo] if !repo.is_empty() => match default_owner {
            Some(owner) => Ok((owner.to_string(), repo.to_string())),
            None => Err(ReleaseToolsError::invalid_args(format!(
                "repository must be given as owner/repo, got '{slug}'"
            ))),
        },
        _ => Err(ReleaseToolsError::invalid_args(format!(
            "repository must be given as owner/repo, got '{slug}'"
        ))),
    }
}
