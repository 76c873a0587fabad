//! Error types for pr-push

use thiserror::Error;

/// Errors produced while publishing a commit as a pull request
#[derive(Error, Debug)]
pub enum Error {
    /// A local git command exited non-zero; carries its combined output verbatim
    #[error("{0}")]
    LocalVcs(String),

    /// GitHub API call failed
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Error surfaced by octocrab
    #[error("GitHub API error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Creation was rejected because an open PR already exists for the head/base pair
    #[error("pull request already exists for {head}")]
    PullRequestExists {
        /// Head ref (`owner:branch`) the PR was requested for
        head: String,
    },

    /// Remote state contradicts an invariant this tool relies on
    #[error("unexpected state: {0}")]
    UnexpectedState(String),

    /// The publish request is malformed
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No usable token, or the token was rejected
    #[error("authentication error: {0}")]
    Auth(String),

    /// Config file could not be read or parsed
    #[error("config error: {0}")]
    Config(String),

    /// I/O failure (e.g. git could not be spawned)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this is the "already exists" signal from PR creation
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::PullRequestExists { .. })
    }
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
