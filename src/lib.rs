//! pr-push - publish a commit as a GitHub pull request, idempotently
//!
//! Force-pushes the latest local commit to a branch, then converges GitHub to
//! exactly one open pull request for that branch with the desired title,
//! body and assignee, and reports the commit's combined CI status.
//!
//! Remote calls are paced by two injected limiters (see [`limit`]): a
//! general API budget and a stricter budget for PR creation.

pub mod auth;
pub mod config;
pub mod error;
pub mod limit;
pub mod platform;
pub mod publish;
pub mod repo;
pub mod types;
