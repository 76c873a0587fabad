//! User-facing description of one publish, shared by `push` and `batch`

use pr_push::error::{Error, Result};
use pr_push::types::{LocalPaths, PublishRequest};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One publish as given on the command line or in a batch manifest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishEntry {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Branch to push to
    pub branch: String,
    /// Inline commit message
    pub message: Option<String>,
    /// File holding the commit message
    pub message_file: Option<PathBuf>,
    /// Inline PR body
    pub body: Option<String>,
    /// File holding the PR body
    pub body_file: Option<PathBuf>,
    /// Assignee login
    pub assignee: Option<String>,
    /// Git checkout; defaults to the base directory
    pub repo_dir: Option<PathBuf>,
    /// Directory relative message/body files resolve against; defaults to `repo_dir`
    pub work_dir: Option<PathBuf>,
}

impl PublishEntry {
    /// Resolve paths against `base_dir` and read message/body files
    pub fn into_request(
        self,
        base_dir: &Path,
        default_assignee: Option<&str>,
    ) -> Result<PublishRequest> {
        let repo_dir = resolve(base_dir, self.repo_dir.as_deref().unwrap_or(Path::new(".")));
        let work_dir = self
            .work_dir
            .as_deref()
            .map_or_else(|| repo_dir.clone(), |dir| resolve(base_dir, dir));

        let commit_message = match (self.message, self.message_file) {
            (Some(_), Some(_)) => {
                return Err(Error::InvalidRequest(
                    "give either message or message_file, not both".to_string(),
                ));
            }
            (Some(message), None) => message,
            (None, Some(file)) => read_text(&resolve(&work_dir, &file))?,
            (None, None) => {
                return Err(Error::InvalidRequest(format!(
                    "no commit message for branch {}",
                    self.branch
                )));
            }
        };

        let body_override = match (self.body, self.body_file) {
            (Some(_), Some(_)) => {
                return Err(Error::InvalidRequest(
                    "give either body or body_file, not both".to_string(),
                ));
            }
            (Some(body), None) => Some(body),
            (None, Some(file)) => Some(read_text(&resolve(&work_dir, &file))?),
            (None, None) => None,
        };

        Ok(PublishRequest {
            repo_name: self.repo,
            repo_owner: self.owner,
            branch: self.branch,
            commit_message,
            body_override,
            assignee: self.assignee.or_else(|| default_assignee.map(ToString::to_string)),
            paths: LocalPaths { repo_dir, work_dir },
        })
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn read_text(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|e| {
        Error::InvalidRequest(format!("failed to read {}: {e}", path.display()))
    })?;
    Ok(text.trim_end_matches('\n').to_string())
}
