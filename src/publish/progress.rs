//! Progress reporting for publish runs

use async_trait::async_trait;

/// Orchestration stages, in the order a successful run passes them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    /// Nothing done yet
    Start,
    /// Local ref force-pushed
    Pushed,
    /// PR exists with the desired title/body
    Reconciled,
    /// PR assigned to the requested login
    AssigneeEnsured,
    /// Combined status fetched
    StatusFetched,
    /// Result assembled
    Done,
    /// A step failed; terminal
    Failed,
}

impl std::fmt::Display for PublishStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Pushed => write!(f, "pushed"),
            Self::Reconciled => write!(f, "reconciled"),
            Self::AssigneeEnsured => write!(f, "assignee ensured"),
            Self::StatusFetched => write!(f, "status fetched"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Observer for publish progress
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called on every stage transition of `branch`
    async fn on_stage(&self, branch: &str, stage: PublishStage);

    /// Free-form status message
    async fn on_message(&self, message: &str);
}

/// Progress callback that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_stage(&self, _branch: &str, _stage: PublishStage) {}

    async fn on_message(&self, _message: &str) {}
}
