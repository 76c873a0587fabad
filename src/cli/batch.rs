//! Batch command - publish many branches concurrently
//!
//! Every entry runs as its own task; all of them share the context's rate
//! limiters, which pace the remote calls across the whole batch.

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::entry::PublishEntry;
use crate::cli::push::{print_failure, print_result, result_json};
use crate::cli::style::{CHECK, Stylize};
use anstream::println;
use pr_push::error::{Error, Result};
use pr_push::publish::{ProgressCallback, publish};
use pr_push::types::{PublishRequest, PublishResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::debug;

/// Batch manifest: a list of `[[publish]]` tables
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Entries to publish
    #[serde(default)]
    pub publish: Vec<PublishEntry>,
}

impl Manifest {
    /// Parse manifest text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::InvalidRequest(format!("invalid manifest: {e}")))
    }
}

/// Options for the batch command
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Print results as a JSON array
    pub json: bool,
}

/// Run the batch command
pub async fn run_batch(
    config_path: Option<&Path>,
    manifest_path: &Path,
    options: BatchOptions,
) -> Result<()> {
    let content = fs::read_to_string(manifest_path).map_err(|e| {
        Error::InvalidRequest(format!("failed to read {}: {e}", manifest_path.display()))
    })?;
    let manifest = Manifest::from_toml(&content)?;
    if manifest.publish.is_empty() {
        println!("{}", "Nothing to publish".muted());
        return Ok(());
    }

    let ctx = Arc::new(CommandContext::new(config_path).await?);
    let base_dir = manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    // Resolve everything up front so a bad entry fails before anything is pushed
    let requests = manifest
        .publish
        .into_iter()
        .map(|entry| entry.into_request(base_dir, ctx.default_assignee()))
        .collect::<Result<Vec<_>>>()?;

    let progress = Arc::new(if options.json {
        CliProgress::hidden()
    } else {
        CliProgress::spinner()
    });
    progress
        .on_message(&format!("Publishing {} branch(es)...", requests.len()))
        .await;

    let outcomes = publish_all(&ctx, requests, &progress).await;
    progress.finish();

    let failed = outcomes.iter().filter(|(_, o)| o.is_err()).count();
    if options.json {
        let rows: Vec<_> = outcomes
            .iter()
            .map(|(req, outcome)| result_json(&req.branch, outcome))
            .collect();
        println!("{}", serde_json::Value::Array(rows));
    } else {
        for (req, outcome) in &outcomes {
            match outcome {
                Ok(result) => print_result(&req.branch, result),
                Err(e) => print_failure(&req.branch, e),
            }
        }
        println!();
        println!(
            "{} {} published, {} failed",
            format!("{CHECK} Batch complete:").success(),
            (outcomes.len() - failed).accent(),
            failed.accent()
        );
    }

    if failed > 0 {
        return Err(Error::Internal(format!(
            "{failed} of {} publishes failed",
            outcomes.len()
        )));
    }
    Ok(())
}

/// Publish every request concurrently; outcomes come back in request order
async fn publish_all(
    ctx: &Arc<CommandContext>,
    requests: Vec<PublishRequest>,
    progress: &Arc<CliProgress>,
) -> Vec<(PublishRequest, Result<PublishResult>)> {
    let mut tasks = JoinSet::new();
    for (index, request) in requests.iter().cloned().enumerate() {
        let ctx = Arc::clone(ctx);
        let progress = Arc::clone(progress);
        tasks.spawn(async move {
            let outcome = match ctx.platform_for(&request.repo_owner, &request.repo_name) {
                Ok(platform) => {
                    publish(
                        &request,
                        &ctx.git,
                        platform.as_ref(),
                        &ctx.limits,
                        progress.as_ref(),
                    )
                    .await
                }
                Err(e) => Err(e),
            };
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<Result<PublishResult>>> =
        std::iter::repeat_with(|| None).take(requests.len()).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => {
                debug!(index, ok = outcome.is_ok(), "publish finished");
                slots[index] = Some(outcome);
            }
            Err(e) => debug!(error = %e, "publish task aborted"),
        }
    }

    requests
        .into_iter()
        .zip(slots)
        .map(|(request, slot)| {
            let outcome = slot
                .unwrap_or_else(|| Err(Error::Internal("publish task did not complete".to_string())));
            (request, outcome)
        })
        .collect()
}
