//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_push::error::{Error, Result};
use pr_push::platform::PlatformService;
use pr_push::types::{CombinedStatus, DesiredPr, PlatformConfig, PullRequest};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `edit_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCall {
    pub pr_number: u64,
    pub title: String,
    pub body: String,
}

/// Call record for `add_assignees`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignCall {
    pub pr_number: u64,
    pub assignees: Vec<String>,
}

/// In-memory stand-in for GitHub
///
/// Behaves like the real API where it matters: creating a second open PR for
/// the same head/base is rejected with `PullRequestExists`.
///
/// Features:
/// - Auto-incrementing PR numbers
/// - Call tracking for verification
/// - Seeding existing PRs, including inconsistent duplicates
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    head_sha: Mutex<String>,
    open_prs: Mutex<HashMap<(String, String), Vec<PullRequest>>>,
    statuses: Mutex<HashMap<String, CombinedStatus>>,
    force_already_exists: Mutex<bool>,
    // Call tracking
    create_calls: Mutex<Vec<DesiredPr>>,
    list_calls: Mutex<Vec<(String, String)>>,
    edit_calls: Mutex<Vec<EditCall>>,
    assign_calls: Mutex<Vec<AssignCall>>,
    status_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_create: Mutex<Option<String>>,
    error_on_list: Mutex<Option<String>>,
    error_on_edit: Mutex<Option<String>>,
    error_on_assign: Mutex<Option<String>>,
    error_on_status: Mutex<Option<String>>,
}

fn branch_of(head: &str) -> String {
    head.split_once(':')
        .map_or(head, |(_, branch)| branch)
        .to_string()
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(1),
            head_sha: Mutex::new(crate::common::DEFAULT_SHA.to_string()),
            open_prs: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
            force_already_exists: Mutex::new(false),
            create_calls: Mutex::new(Vec::new()),
            list_calls: Mutex::new(Vec::new()),
            edit_calls: Mutex::new(Vec::new()),
            assign_calls: Mutex::new(Vec::new()),
            status_calls: Mutex::new(Vec::new()),
            error_on_create: Mutex::new(None),
            error_on_list: Mutex::new(None),
            error_on_edit: Mutex::new(None),
            error_on_assign: Mutex::new(None),
            error_on_status: Mutex::new(None),
        }
    }

    // === Setup ===

    /// SHA reported as head of PRs this mock creates
    pub fn set_head_sha(&self, sha: &str) {
        *self.head_sha.lock().unwrap() = sha.to_string();
    }

    /// Add an open PR, alongside any already present for its head/base
    pub fn seed_pr(&self, head: &str, base: &str, pr: PullRequest) {
        self.open_prs
            .lock()
            .unwrap()
            .entry((head.to_string(), base.to_string()))
            .or_default()
            .push(pr);
    }

    /// Set the combined status returned for `sha`
    pub fn set_status(&self, sha: &str, status: CombinedStatus) {
        self.statuses
            .lock()
            .unwrap()
            .insert(sha.to_string(), status);
    }

    /// Reject every creation as a duplicate, whether or not a PR exists
    pub fn always_already_exists(&self) {
        *self.force_already_exists.lock().unwrap() = true;
    }

    // === Error injection methods ===

    /// Make `create_pr` return an error
    pub fn fail_create(&self, msg: &str) {
        *self.error_on_create.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_prs` return an error
    pub fn fail_list(&self, msg: &str) {
        *self.error_on_list.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `edit_pr` return an error
    pub fn fail_edit(&self, msg: &str) {
        *self.error_on_edit.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_assignees` return an error
    pub fn fail_assign(&self, msg: &str) {
        *self.error_on_assign.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `combined_status` return an error
    pub fn fail_status(&self, msg: &str) {
        *self.error_on_status.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    pub fn get_create_calls(&self) -> Vec<DesiredPr> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn get_list_calls(&self) -> Vec<(String, String)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn get_edit_calls(&self) -> Vec<EditCall> {
        self.edit_calls.lock().unwrap().clone()
    }

    pub fn get_assign_calls(&self) -> Vec<AssignCall> {
        self.assign_calls.lock().unwrap().clone()
    }

    pub fn get_status_calls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }

    /// Number of open PRs for a head/base pair
    pub fn open_pr_count(&self, head: &str, base: &str) -> usize {
        self.open_prs
            .lock()
            .unwrap()
            .get(&(head.to_string(), base.to_string()))
            .map_or(0, Vec::len)
    }

    /// Number of remote calls of any kind
    pub fn total_calls(&self) -> usize {
        self.create_calls.lock().unwrap().len()
            + self.list_calls.lock().unwrap().len()
            + self.edit_calls.lock().unwrap().len()
            + self.assign_calls.lock().unwrap().len()
            + self.status_calls.lock().unwrap().len()
    }

    fn find_pr_mut<F>(&self, pr_number: u64, update: F) -> Option<PullRequest>
    where
        F: FnOnce(&mut PullRequest),
    {
        let mut open = self.open_prs.lock().unwrap();
        let pr = open
            .values_mut()
            .flat_map(|prs| prs.iter_mut())
            .find(|pr| pr.number == pr_number)?;
        update(pr);
        Some(pr.clone())
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn create_pr(&self, desired: &DesiredPr) -> Result<PullRequest> {
        self.create_calls.lock().unwrap().push(desired.clone());

        if let Some(msg) = self.error_on_create.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let key = (desired.head.clone(), desired.base.clone());
        let mut open = self.open_prs.lock().unwrap();
        let exists = open.get(&key).is_some_and(|prs| !prs.is_empty());
        if exists || *self.force_already_exists.lock().unwrap() {
            return Err(Error::PullRequestExists {
                head: desired.head.clone(),
            });
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = PullRequest {
            number,
            head_sha: self.head_sha.lock().unwrap().clone(),
            html_url: format!(
                "https://github.com/{}/{}/pull/{number}",
                self.config.owner, self.config.repo
            ),
            head_ref: branch_of(&desired.head),
            base_ref: desired.base.clone(),
            title: Some(desired.title.clone()),
            body: Some(desired.body.clone()),
            assignee: None,
        };
        open.entry(key).or_default().push(pr.clone());
        Ok(pr)
    }

    async fn list_prs(&self, head: &str, base: &str) -> Result<Vec<PullRequest>> {
        self.list_calls
            .lock()
            .unwrap()
            .push((head.to_string(), base.to_string()));

        if let Some(msg) = self.error_on_list.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let open = self.open_prs.lock().unwrap();
        Ok(open
            .get(&(head.to_string(), base.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn edit_pr(&self, pr_number: u64, title: &str, body: &str) -> Result<PullRequest> {
        self.edit_calls.lock().unwrap().push(EditCall {
            pr_number,
            title: title.to_string(),
            body: body.to_string(),
        });

        if let Some(msg) = self.error_on_edit.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        self.find_pr_mut(pr_number, |pr| {
            pr.title = Some(title.to_string());
            pr.body = Some(body.to_string());
        })
        .ok_or_else(|| Error::GitHubApi(format!("edit_pr: no PR #{pr_number}")))
    }

    async fn add_assignees(&self, pr_number: u64, assignees: &[&str]) -> Result<()> {
        self.assign_calls.lock().unwrap().push(AssignCall {
            pr_number,
            assignees: assignees.iter().map(ToString::to_string).collect(),
        });

        if let Some(msg) = self.error_on_assign.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let first = assignees.first().map(ToString::to_string);
        self.find_pr_mut(pr_number, |pr| pr.assignee = first)
            .map(|_| ())
            .ok_or_else(|| Error::GitHubApi(format!("add_assignees: no PR #{pr_number}")))
    }

    async fn combined_status(&self, sha: &str) -> Result<CombinedStatus> {
        self.status_calls.lock().unwrap().push(sha.to_string());

        if let Some(msg) = self.error_on_status.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(sha)
            .cloned()
            .unwrap_or_default())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
