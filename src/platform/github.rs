//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    CombinedState, CombinedStatus, CommitStatus, DesiredPr, PlatformConfig, PullRequest,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Public GitHub API root
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Fragment GitHub puts in the validation error for a duplicate PR
const ALREADY_EXISTS_FRAGMENT: &str = "pull request already exists";

// Wire types for the combined status endpoint

#[derive(Deserialize)]
struct ApiCombinedStatus {
    state: Option<String>,
    #[serde(default)]
    statuses: Vec<ApiStatus>,
}

#[derive(Deserialize)]
struct ApiStatus {
    context: Option<String>,
    target_url: Option<String>,
    state: Option<String>,
}

impl From<ApiCombinedStatus> for CombinedStatus {
    fn from(status: ApiCombinedStatus) -> Self {
        Self {
            state: status
                .state
                .as_deref()
                .map_or(CombinedState::Unknown, CombinedState::from_api),
            statuses: status
                .statuses
                .into_iter()
                .map(|s| CommitStatus {
                    context: s.context,
                    target_url: s.target_url,
                    state: s
                        .state
                        .as_deref()
                        .map_or(CombinedState::Unknown, CombinedState::from_api),
                })
                .collect(),
        }
    }
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests (combined status)
    token: String,
    /// HTTP client for raw requests (combined status)
    http_client: Client,
    /// API root for raw requests, without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `host` selects a GitHub Enterprise instance; `None` means github.com.
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let api_base = api_base_for(host.as_deref());
        let config = PlatformConfig { owner, repo, host };
        Self::with_api_base(token, config, &api_base)
    }

    /// Create a service against an explicit API root
    pub fn with_api_base(token: &str, config: PlatformConfig, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(&api_base)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("pr-push")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }
}

/// API root for github.com or a GitHub Enterprise host
fn api_base_for(host: Option<&str>) -> String {
    host.map_or_else(|| DEFAULT_API_BASE.to_string(), |h| format!("https://{h}/api/v3"))
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        head_sha: pr.head.sha.clone(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        head_ref: pr.head.ref_field.clone(),
        base_ref: pr.base.ref_field.clone(),
        title: pr.title.clone(),
        body: pr.body.clone(),
        assignee: pr.assignee.as_ref().map(|a| a.login.clone()),
    }
}

/// Whether a GitHub error response means "a PR for this head/base already exists"
///
/// GitHub answers 422 with a structured `errors` list; each entry carries its
/// own message. Only when that list is missing is the top-level message
/// consulted.
fn is_already_exists(status: u16, message: &str, errors: &[Value]) -> bool {
    if status != 422 {
        return false;
    }
    if errors.is_empty() {
        return message.to_lowercase().contains(ALREADY_EXISTS_FRAGMENT);
    }
    errors.iter().any(|entry| {
        entry
            .get("message")
            .and_then(Value::as_str)
            .is_some_and(|m| m.to_lowercase().contains(ALREADY_EXISTS_FRAGMENT))
    })
}

/// Map a creation failure, singling out the duplicate-PR rejection
fn classify_create_error(err: octocrab::Error, head: &str) -> Error {
    if let octocrab::Error::GitHub { source, .. } = &err {
        let errors = source.errors.as_deref().unwrap_or_default();
        if is_already_exists(source.status_code.as_u16(), &source.message, errors) {
            return Error::PullRequestExists {
                head: head.to_string(),
            };
        }
    }
    Error::Octocrab(err)
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn create_pr(&self, desired: &DesiredPr) -> Result<PullRequest> {
        debug!(head = %desired.head, base = %desired.base, "creating PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(&desired.title, &desired.head, &desired.base)
            .body(&desired.body)
            .send()
            .await
            .map_err(|e| classify_create_error(e, &desired.head))?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn list_prs(&self, head: &str, base: &str) -> Result<Vec<PullRequest>> {
        debug!(head, base, "listing PRs");
        let prs = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .head(head)
            .base(base)
            .state(octocrab::params::State::Open)
            .send()
            .await?;

        let result: Vec<PullRequest> = prs.items.iter().map(pr_from_octocrab).collect();
        debug!(count = result.len(), "listed PRs");
        Ok(result)
    }

    async fn edit_pr(&self, pr_number: u64, title: &str, body: &str) -> Result<PullRequest> {
        debug!(pr_number, "editing PR title/body");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .update(pr_number)
            .title(title)
            .body(body)
            .send()
            .await?;

        debug!(pr_number, "edited PR");
        Ok(pr_from_octocrab(&pr))
    }

    async fn add_assignees(&self, pr_number: u64, assignees: &[&str]) -> Result<()> {
        debug!(pr_number, ?assignees, "adding assignees");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .add_assignees(pr_number, assignees)
            .await?;
        debug!(pr_number, "added assignees");
        Ok(())
    }

    async fn combined_status(&self, sha: &str) -> Result<CombinedStatus> {
        debug!(sha, "fetching combined status");
        let url = format!(
            "{}/repos/{}/{}/commits/{}/status",
            self.api_base, self.config.owner, self.config.repo, sha
        );

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch commit status: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "commit status request returned {status}: {text}"
            )));
        }

        let combined: ApiCombinedStatus = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse commit status: {e}")))?;

        let combined = CombinedStatus::from(combined);
        debug!(state = %combined.state, count = combined.statuses.len(), "combined status");
        Ok(combined)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
