//! User configuration loaded from `config.toml`.

use crate::error::{Error, Result};
use crate::limit::RateLimits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the platform config dir.
const APP_DIR: &str = "prpush";

/// Config filename.
const CONFIG_FILE: &str = "config.toml";

/// Environment variable holding the GitHub token unless configured otherwise.
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_API_TOKEN";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// GitHub connection settings
    pub github: GitHubSettings,
    /// Rate limiter periods
    pub limits: LimitSettings,
    /// Defaults for CLI flags
    pub defaults: Defaults,
}

/// GitHub connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GitHubSettings {
    /// GitHub Enterprise host; `None` for github.com
    pub host: Option<String>,
    /// Environment variable to read the token from
    pub token_env: String,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            host: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
        }
    }
}

/// Rate limiter periods in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitSettings {
    /// Period of the general API limiter
    pub api_interval_ms: u64,
    /// Period of the push/create limiter
    pub push_interval_ms: u64,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            api_interval_ms: 200,
            push_interval_ms: 1000,
        }
    }
}

impl LimitSettings {
    /// Build the shared limiters. Must be called inside a tokio runtime.
    pub fn rate_limits(&self) -> RateLimits {
        RateLimits::with_intervals(
            Duration::from_millis(self.api_interval_ms),
            Duration::from_millis(self.push_interval_ms),
        )
    }
}

/// Defaults for CLI flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Defaults {
    /// Assignee used when `--assignee` is not given
    pub assignee: Option<String>,
}

impl Config {
    /// Parse and validate config text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.limits.api_interval_ms == 0 || self.limits.push_interval_ms == 0 {
            return Err(Error::Config(
                "limit intervals must be greater than zero".to_string(),
            ));
        }
        if self.github.token_env.trim().is_empty() {
            return Err(Error::Config("github.token_env must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Default config path, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Load config from `path`.
///
/// Returns defaults if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    Config::from_toml(&content).map_err(|e| match e {
        Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
        other => other,
    })
}
