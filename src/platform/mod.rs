//! Remote repository service
//!
//! Provides the pull request and status operations the publish flow needs,
//! bound to one owner/repo.

mod factory;
mod github;

pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{CombinedStatus, DesiredPr, PlatformConfig, PullRequest};
use async_trait::async_trait;

/// Platform service trait for PR operations
///
/// Implementations must report a rejected creation because of an existing
/// PR as [`Error::PullRequestExists`](crate::error::Error::PullRequestExists)
/// so the reconciler can fall back to a lookup.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Open a new PR
    async fn create_pr(&self, desired: &DesiredPr) -> Result<PullRequest>;

    /// List open PRs whose head and base match exactly
    async fn list_prs(&self, head: &str, base: &str) -> Result<Vec<PullRequest>>;

    /// Replace the title and body of an existing PR
    async fn edit_pr(&self, pr_number: u64, title: &str, body: &str) -> Result<PullRequest>;

    /// Add assignees to a PR
    async fn add_assignees(&self, pr_number: u64, assignees: &[&str]) -> Result<()>;

    /// Combined CI status for a commit
    async fn combined_status(&self, sha: &str) -> Result<CombinedStatus>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
