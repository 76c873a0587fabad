//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by push and batch.

use pr_push::auth::{GitHubAuthConfig, get_github_auth};
use pr_push::config::{Config, default_config_path, load_config};
use pr_push::error::Result;
use pr_push::limit::RateLimits;
use pr_push::platform::{PlatformService, create_platform_service};
use pr_push::repo::GitCli;
use pr_push::types::PlatformConfig;
use std::path::Path;
use tracing::debug;

/// Shared context for CLI commands that talk to GitHub
///
/// One context per process: every publish started from it shares the same
/// rate limiters.
pub struct CommandContext {
    /// Loaded configuration
    pub config: Config,
    /// Resolved credentials
    pub auth: GitHubAuthConfig,
    /// Limiters shared by all publishes
    pub limits: RateLimits,
    /// Local git access
    pub git: GitCli,
}

impl CommandContext {
    /// Load config, resolve the token and start the limiters
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = load(config_path)?;
        let auth = get_github_auth(&config.github.token_env, config.github.host.as_deref()).await?;
        let limits = config.limits.rate_limits();

        Ok(Self {
            config,
            auth,
            limits,
            git: GitCli::new(),
        })
    }

    /// Platform service for one repository
    pub fn platform_for(&self, owner: &str, repo: &str) -> Result<Box<dyn PlatformService>> {
        let platform_config = PlatformConfig {
            owner: owner.to_string(),
            repo: repo.to_string(),
            host: self.config.github.host.clone(),
        };
        create_platform_service(&platform_config, &self.auth.token)
    }

    /// Assignee used when a publish does not name one
    pub fn default_assignee(&self) -> Option<&str> {
        self.config.defaults.assignee.as_deref()
    }
}

/// Load config from an explicit path or the default location
pub fn load(config_path: Option<&Path>) -> Result<Config> {
    let path = config_path.map(Path::to_path_buf).or_else(default_config_path);
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path)
        }
        None => Ok(Config::default()),
    }
}
