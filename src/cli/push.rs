//! Push command - publish one commit as a PR

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::entry::PublishEntry;
use crate::cli::style::{Stylize, check, cross};
use anstream::println;
use pr_push::error::{Error, Result};
use pr_push::publish::publish;
use pr_push::types::PublishResult;
use std::path::Path;

/// Options for the push command
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    /// Print the result as JSON
    pub json: bool,
}

/// Run the push command
pub async fn run_push(
    config_path: Option<&Path>,
    entry: PublishEntry,
    options: PushOptions,
) -> Result<()> {
    let ctx = CommandContext::new(config_path).await?;
    let cwd = std::env::current_dir()?;
    let request = entry.into_request(&cwd, ctx.default_assignee())?;
    let platform = ctx.platform_for(&request.repo_owner, &request.repo_name)?;

    let progress = if options.json {
        CliProgress::hidden()
    } else {
        CliProgress::spinner()
    };

    let outcome = publish(&request, &ctx.git, platform.as_ref(), &ctx.limits, &progress).await;
    progress.finish();

    if options.json {
        println!("{}", result_json(&request.branch, &outcome));
    } else {
        match &outcome {
            Ok(result) => print_result(&request.branch, result),
            Err(e) => print_failure(&request.branch, e),
        }
    }

    outcome.map(|_| ())
}

/// Print one successful publish
pub fn print_result(branch: &str, result: &PublishResult) {
    println!("{} {} {result}", check(), branch.emphasis());
}

/// Print one failed publish
pub fn print_failure(branch: &str, error: &Error) {
    println!(
        "{} {} {}",
        cross(),
        branch.emphasis(),
        PublishResult::failure().muted()
    );
    println!("  {}", error.to_string().danger());
}

/// JSON form of one outcome; failures carry the zero-valued result plus the error
pub fn result_json(branch: &str, outcome: &Result<PublishResult>) -> serde_json::Value {
    match outcome {
        Ok(result) => serde_json::json!({
            "branch": branch,
            "result": result,
            "error": null,
        }),
        Err(e) => serde_json::json!({
            "branch": branch,
            "result": PublishResult::failure(),
            "error": e.to_string(),
        }),
    }
}
