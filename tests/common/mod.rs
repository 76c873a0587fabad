//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_git::{
    CountedLimits, CountingLimiter, MockGit, PushCall, RecordingProgress, counted_limits,
};
pub use mock_platform::{AssignCall, EditCall, MockPlatformService};

use pr_push::types::{
    DEFAULT_BASE_BRANCH, DesiredPr, LocalPaths, PlatformConfig, PublishRequest, PullRequest,
};
use std::process::Command;
use tempfile::TempDir;

/// SHA both mocks agree on by default
pub const DEFAULT_SHA: &str = "4a7c1f0e9d2b3c4d5e6f708192a3b4c5d6e7f809";

pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "owner".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

pub fn make_request(branch: &str, message: &str) -> PublishRequest {
    PublishRequest {
        repo_name: "repo".to_string(),
        repo_owner: "owner".to_string(),
        branch: branch.to_string(),
        commit_message: message.to_string(),
        body_override: None,
        assignee: Some("octocat".to_string()),
        paths: LocalPaths::single("/work/repo"),
    }
}

pub fn make_desired(branch: &str, title: &str, body: &str) -> DesiredPr {
    DesiredPr {
        title: title.to_string(),
        body: body.to_string(),
        head: format!("owner:{branch}"),
        base: DEFAULT_BASE_BRANCH.to_string(),
    }
}

pub fn make_pr(number: u64, branch: &str, title: &str, body: &str) -> PullRequest {
    PullRequest {
        number,
        head_sha: DEFAULT_SHA.to_string(),
        html_url: format!("https://github.com/owner/repo/pull/{number}"),
        head_ref: branch.to_string(),
        base_ref: DEFAULT_BASE_BRANCH.to_string(),
        title: Some(title.to_string()),
        body: Some(body.to_string()),
        assignee: None,
    }
}

/// Run git in `dir`, panicking on failure
pub fn git(dir: &std::path::Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A git checkout with one commit and an `origin` pointing at a bare repo
pub struct TempGitRepo {
    pub dir: TempDir,
    pub remote: TempDir,
}

impl TempGitRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let remote = TempDir::new().expect("temp dir");

        git(remote.path(), &["init", "--bare", "--quiet"]);
        git(dir.path(), &["init", "--quiet"]);
        git(dir.path(), &["config", "user.email", "test@example.com"]);
        git(dir.path(), &["config", "user.name", "Test"]);
        git(dir.path(), &["config", "commit.gpgsign", "false"]);
        std::fs::write(dir.path().join("README.md"), "hello\n").expect("write file");
        git(dir.path(), &["add", "README.md"]);
        git(dir.path(), &["commit", "--quiet", "-m", "Initial commit"]);
        let remote_path = remote.path().to_string_lossy().to_string();
        git(dir.path(), &["remote", "add", "origin", &remote_path]);

        Self { dir, remote }
    }

    pub fn head_sha(&self) -> String {
        git(self.dir.path(), &["rev-parse", "HEAD"])
    }

    /// SHA of `branch` in the bare remote
    pub fn remote_sha(&self, branch: &str) -> String {
        git(self.remote.path(), &["rev-parse", &format!("refs/heads/{branch}")])
    }

    pub fn commit(&self, file: &str, message: &str) {
        std::fs::write(self.dir.path().join(file), message).expect("write file");
        git(self.dir.path(), &["add", file]);
        git(self.dir.path(), &["commit", "--quiet", "-m", message]);
    }
}
