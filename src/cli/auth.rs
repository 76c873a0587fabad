//! Auth command - check GitHub credentials

use crate::cli::context;
use crate::cli::style::{Stylize, check};
use anstream::println;
use pr_push::auth::{get_github_auth, test_github_auth};
use pr_push::error::Result;
use std::path::Path;

/// Resolve the token and confirm GitHub accepts it
pub async fn run_auth(config_path: Option<&Path>) -> Result<()> {
    let config = context::load(config_path)?;
    let auth = get_github_auth(&config.github.token_env, config.github.host.as_deref()).await?;
    let login = test_github_auth(&auth).await?;

    println!(
        "{} Authenticated as {} {}",
        check(),
        login.accent(),
        format!("(token from {})", auth.source).muted()
    );
    Ok(())
}
