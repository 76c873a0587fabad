//! Local git access
//!
//! The publish flow only needs two things from the checkout: the SHA of the
//! latest commit and a force-push of `HEAD` to a remote branch.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Blocking operations against a local checkout
#[async_trait]
pub trait GitGateway: Send + Sync {
    /// SHA of the latest commit in `repo_dir`
    async fn last_commit_sha(&self, repo_dir: &Path) -> Result<String>;

    /// Force-push `HEAD` to `branch` on `remote`
    async fn force_push(&self, repo_dir: &Path, remote: &str, branch: &str) -> Result<()>;
}

/// Gateway backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitCli {
    /// Use the `git` found on `PATH`
    pub fn new() -> Self {
        Self::default()
    }

    /// Run git in `dir`, returning stdout on success and the combined
    /// output as the error otherwise
    async fn run(&self, dir: &Path, args: &[&str]) -> Result<String> {
        debug!(dir = %dir.display(), ?args, "running git");
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(status = %output.status, "git failed");
            return Err(Error::LocalVcs(format!("{stdout}{stderr}")));
        }

        Ok(stdout.into_owned())
    }
}

#[async_trait]
impl GitGateway for GitCli {
    async fn last_commit_sha(&self, repo_dir: &Path) -> Result<String> {
        let sha = self
            .run(repo_dir, &["log", "-1", "--pretty=format:%H"])
            .await?;
        Ok(sha.trim().to_string())
    }

    async fn force_push(&self, repo_dir: &Path, remote: &str, branch: &str) -> Result<()> {
        let refspec = format!("HEAD:{branch}");
        self.run(repo_dir, &["push", "-f", remote, &refspec]).await?;
        Ok(())
    }
}
