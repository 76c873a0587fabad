//! Core types for pr-push

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Base branch every pull request targets
pub const DEFAULT_BASE_BRANCH: &str = "master";

/// Remote the local ref is force-pushed to
pub const PUSH_REMOTE: &str = "origin";

/// Status context reported by the CI service
pub const CI_STATUS_CONTEXT: &str = "ci/circleci";

/// Query parameters stripped from CI build URLs
pub const TRACKING_QUERY_PARAMS: [&str; 3] = ["utm_campaign", "utm_medium", "utm_source"];

/// Local directories a publish operates in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalPaths {
    /// Git checkout holding the commit to publish
    pub repo_dir: PathBuf,
    /// Scratch directory for the operation; relative input files resolve here
    pub work_dir: PathBuf,
}

impl LocalPaths {
    /// Use one directory for both the checkout and the scratch space
    pub fn single(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            repo_dir: dir.clone(),
            work_dir: dir,
        }
    }
}

/// Everything needed to publish one commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishRequest {
    /// Repository name, without the owner
    pub repo_name: String,
    /// User or organization owning the repository
    pub repo_owner: String,
    /// Remote branch to push to
    pub branch: String,
    /// Commit message; its first line becomes the PR title
    pub commit_message: String,
    /// Explicit PR body, wins over the commit message remainder
    pub body_override: Option<String>,
    /// Login to assign the PR to
    pub assignee: Option<String>,
    /// Working directories
    pub paths: LocalPaths,
}

impl PublishRequest {
    /// Check the identity fields are present
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("repo owner", &self.repo_owner),
            ("repo name", &self.repo_name),
            ("branch", &self.branch),
            ("commit message", &self.commit_message),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::InvalidRequest(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }

    /// Head ref in `owner:branch` form
    pub fn head_ref(&self) -> String {
        format!("{}:{}", self.repo_owner, self.branch)
    }
}

/// The state a pull request should converge to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredPr {
    /// PR title
    pub title: String,
    /// PR body
    pub body: String,
    /// Head ref (`owner:branch`)
    pub head: String,
    /// Base branch
    pub base: String,
}

/// A pull request as reported by the remote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// SHA the head branch points at
    pub head_sha: String,
    /// Web URL for the PR
    pub html_url: String,
    /// Head branch name
    pub head_ref: String,
    /// Base branch name
    pub base_ref: String,
    /// PR title, if the remote reported one
    pub title: Option<String>,
    /// PR body, if the remote reported one
    pub body: Option<String>,
    /// Login of the assignee, if any
    pub assignee: Option<String>,
}

/// Aggregate CI state for a commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinedState {
    /// At least one context failed or errored
    Failure,
    /// Some contexts are still running
    Pending,
    /// All contexts passed
    Success,
    /// Anything else, including no state at all
    #[default]
    #[serde(other)]
    Unknown,
}

impl CombinedState {
    /// Map the API's state string
    pub fn from_api(state: &str) -> Self {
        match state {
            "failure" => Self::Failure,
            "pending" => Self::Pending,
            "success" => Self::Success,
            _ => Self::Unknown,
        }
    }

    /// Status glyph used in the one-line rendering
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Failure => "❌",
            Self::Pending => "🕐",
            Self::Success => "✅",
            Self::Unknown => "?",
        }
    }
}

impl std::fmt::Display for CombinedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failure => write!(f, "failure"),
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One status context attached to a commit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitStatus {
    /// Context identifier (e.g. `ci/circleci`)
    pub context: Option<String>,
    /// Link to the build
    pub target_url: Option<String>,
    /// State of this context
    pub state: CombinedState,
}

/// Combined status for a commit
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombinedStatus {
    /// Aggregate state
    pub state: CombinedState,
    /// Individual contexts
    pub statuses: Vec<CommitStatus>,
}

/// Outcome of one publish
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishResult {
    /// Whether every step completed
    pub success: bool,
    /// Head SHA of the pull request
    pub commit_sha: String,
    /// PR number
    pub pr_number: u64,
    /// PR web URL
    pub pr_url: String,
    /// Combined CI state for the head SHA
    pub combined_status: CombinedState,
    /// Login the PR is assigned to
    pub assignee: String,
    /// CI build link with tracking parameters removed
    pub ci_build_url: Option<String>,
}

impl PublishResult {
    /// The zero-valued result reported for a failed publish
    pub fn failure() -> Self {
        Self::default()
    }
}

impl std::fmt::Display for PublishResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "status:{}  assignee:{} {}",
            self.combined_status.glyph(),
            self.assignee,
            self.pr_url
        )?;
        if let Some(url) = &self.ci_build_url {
            write!(f, " {url}")?;
        }
        Ok(())
    }
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}
