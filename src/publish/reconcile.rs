//! Find-or-create for pull requests
//!
//! Creation is attempted first. GitHub rejects a second open PR for the same
//! head/base pair, and that rejection is what routes us to the existing PR,
//! so repeated runs never produce duplicates.

use crate::error::{Error, Result};
use crate::limit::RateLimits;
use crate::platform::PlatformService;
use crate::publish::message::differs;
use crate::types::{DesiredPr, PullRequest};
use tracing::{debug, info};

/// Converge the remote PR for `desired.head` → `desired.base` to `desired`
///
/// Returns the created PR, or the existing one after correcting title/body
/// drift. No step is retried here.
pub async fn reconcile_pr(
    desired: &DesiredPr,
    platform: &dyn PlatformService,
    limits: &RateLimits,
) -> Result<PullRequest> {
    let repo = platform.config();
    limits.push.acquire().await;
    limits.api.acquire().await;

    let existing = match platform.create_pr(desired).await {
        Ok(pr) => {
            info!(
                owner = %repo.owner,
                repo = %repo.repo,
                pr_number = pr.number,
                head = %desired.head,
                "opened PR"
            );
            return Ok(pr);
        }
        Err(e) if e.is_already_exists() => {
            debug!(head = %desired.head, "PR already exists, looking it up");
            find_unique_pr(desired, platform, limits).await?
        }
        Err(e) => return Err(e),
    };

    let title_drift = differs(existing.title.as_deref(), Some(&desired.title));
    let body_drift = differs(existing.body.as_deref(), Some(&desired.body));
    if !title_drift && !body_drift {
        debug!(pr_number = existing.number, "PR already up to date");
        return Ok(existing);
    }

    info!(
        owner = %repo.owner,
        repo = %repo.repo,
        pr_number = existing.number,
        title_drift,
        body_drift,
        "updating PR title/body"
    );
    limits.api.acquire().await;
    platform
        .edit_pr(existing.number, &desired.title, &desired.body)
        .await
}

/// The single open PR for the desired head/base
async fn find_unique_pr(
    desired: &DesiredPr,
    platform: &dyn PlatformService,
    limits: &RateLimits,
) -> Result<PullRequest> {
    limits.api.acquire().await;
    let mut prs = platform.list_prs(&desired.head, &desired.base).await?;

    if prs.len() != 1 {
        return Err(Error::UnexpectedState(format!(
            "expected exactly 1 open PR for {} -> {}, found {}",
            desired.head,
            desired.base,
            prs.len()
        )));
    }

    Ok(prs.remove(0))
}
