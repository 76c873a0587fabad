//! GitHub token resolution

use super::AuthSource;
use crate::error::{Error, Result};
use octocrab::Octocrab;
use tokio::process::Command;
use tracing::debug;

/// Variables consulted after the configured one, in order
const FALLBACK_TOKEN_ENVS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolved GitHub credentials
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// Personal access token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
    /// GitHub Enterprise host, if any
    pub host: Option<String>,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .field("host", &self.host)
            .finish()
    }
}

/// Pick a token from the environment
///
/// `token_env` is tried first, then `GITHUB_TOKEN` and `GH_TOKEN`. Empty
/// values are skipped. Returns the token and the variable it came from.
pub fn resolve_github_token<F>(token_env: &str, lookup: F) -> Option<(String, String)>
where
    F: Fn(&str) -> Option<String>,
{
    std::iter::once(token_env)
        .chain(FALLBACK_TOKEN_ENVS.into_iter().filter(|name| *name != token_env))
        .find_map(|name| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(|value| (value, name.to_string()))
        })
}

/// Get GitHub credentials from the environment or the gh CLI
pub async fn get_github_auth(token_env: &str, host: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some((token, name)) = resolve_github_token(token_env, |name| std::env::var(name).ok()) {
        debug!(var = %name, "using GitHub token from environment");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::EnvVar,
            host: host.map(ToString::to_string),
        });
    }

    let mut cmd = Command::new("gh");
    cmd.args(["auth", "token"]);
    if let Some(h) = host {
        cmd.args(["--hostname", h]);
    }

    let not_found = || {
        Error::Auth(format!(
            "no GitHub token found: set {token_env}, GITHUB_TOKEN or GH_TOKEN, or run 'gh auth login'"
        ))
    };

    let output = cmd.output().await.map_err(|_| not_found())?;
    if !output.status.success() {
        return Err(not_found());
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(not_found());
    }

    debug!("using GitHub token from gh CLI");
    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
        host: host.map(ToString::to_string),
    })
}

/// Verify the token by fetching the authenticated user's login
pub async fn test_github_auth(config: &GitHubAuthConfig) -> Result<String> {
    let mut builder = Octocrab::builder().personal_token(config.token.clone());
    if let Some(ref h) = config.host {
        builder = builder
            .base_uri(format!("https://{h}/api/v3"))
            .map_err(|e| Error::Auth(e.to_string()))?;
    }
    let client = builder.build().map_err(|e| Error::Auth(e.to_string()))?;

    let user = client
        .current()
        .user()
        .await
        .map_err(|e| Error::Auth(format!("token rejected: {e}")))?;

    Ok(user.login)
}
