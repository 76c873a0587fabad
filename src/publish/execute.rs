//! Publish execution - effectful operations
//!
//! Sequences push, reconciliation, assignment and status lookup. Each step
//! either advances the run or ends it; nothing already done is rolled back.
//! A rerun is safe because the push is a force-push and creation falls back
//! to the existing PR.

use crate::error::Result;
use crate::limit::RateLimits;
use crate::platform::PlatformService;
use crate::publish::message::{ci_build_url, derive_title_body};
use crate::publish::progress::{ProgressCallback, PublishStage};
use crate::publish::reconcile::reconcile_pr;
use crate::repo::GitGateway;
use crate::types::{DEFAULT_BASE_BRANCH, DesiredPr, PUSH_REMOTE, PublishRequest, PublishResult};
use tracing::{info, warn};

/// Push the request's commit and converge its pull request
///
/// On failure the progress callback sees [`PublishStage::Failed`] and the
/// first error is returned unchanged.
pub async fn publish(
    request: &PublishRequest,
    git: &dyn GitGateway,
    platform: &dyn PlatformService,
    limits: &RateLimits,
    progress: &dyn ProgressCallback,
) -> Result<PublishResult> {
    progress.on_stage(&request.branch, PublishStage::Start).await;

    match run(request, git, platform, limits, progress).await {
        Ok(result) => {
            progress.on_stage(&request.branch, PublishStage::Done).await;
            Ok(result)
        }
        Err(e) => {
            warn!(branch = %request.branch, error = %e, "publish failed");
            progress.on_stage(&request.branch, PublishStage::Failed).await;
            Err(e)
        }
    }
}

async fn run(
    request: &PublishRequest,
    git: &dyn GitGateway,
    platform: &dyn PlatformService,
    limits: &RateLimits,
    progress: &dyn ProgressCallback,
) -> Result<PublishResult> {
    request.validate()?;
    let branch = request.branch.as_str();
    let repo_dir = request.paths.repo_dir.as_path();

    let local_sha = git.last_commit_sha(repo_dir).await?;
    git.force_push(repo_dir, PUSH_REMOTE, branch).await?;
    info!(branch, sha = %local_sha, "pushed");
    progress.on_stage(branch, PublishStage::Pushed).await;

    let (title, body) =
        derive_title_body(&request.commit_message, request.body_override.as_deref());
    let desired = DesiredPr {
        title,
        body,
        head: request.head_ref(),
        base: DEFAULT_BASE_BRANCH.to_string(),
    };
    let pr = reconcile_pr(&desired, platform, limits).await?;
    progress.on_stage(branch, PublishStage::Reconciled).await;

    if pr.head_sha != local_sha {
        warn!(
            pr_number = pr.number,
            pr_sha = %pr.head_sha,
            local_sha = %local_sha,
            "PR head does not match the pushed commit"
        );
    }

    let assignee = match request.assignee.as_deref() {
        Some(login) => {
            if pr.assignee.as_deref() != Some(login) {
                limits.api.acquire().await;
                platform.add_assignees(pr.number, &[login]).await?;
                info!(pr_number = pr.number, assignee = login, "assigned PR");
            }
            login.to_string()
        }
        None => pr.assignee.clone().unwrap_or_default(),
    };
    progress.on_stage(branch, PublishStage::AssigneeEnsured).await;

    limits.api.acquire().await;
    let status = platform.combined_status(&pr.head_sha).await?;
    progress.on_stage(branch, PublishStage::StatusFetched).await;

    Ok(PublishResult {
        success: true,
        commit_sha: pr.head_sha.clone(),
        pr_number: pr.number,
        pr_url: pr.html_url.clone(),
        combined_status: status.state,
        assignee,
        ci_build_url: ci_build_url(&status),
    })
}
