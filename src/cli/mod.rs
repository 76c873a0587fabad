//! CLI command implementations

pub mod auth;
pub mod batch;
pub mod context;
pub mod entry;
pub mod push;
pub mod style;

use async_trait::async_trait;
use indicatif::ProgressBar;
use pr_push::publish::{ProgressCallback, PublishStage};
use std::time::Duration;

/// Spinner-backed progress reporting
pub struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Spinner on stderr
    pub fn spinner() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style::spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    /// Progress that draws nothing (machine-readable output)
    pub fn hidden() -> Self {
        Self {
            spinner: ProgressBar::hidden(),
        }
    }

    /// Remove the spinner line
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_stage(&self, branch: &str, stage: PublishStage) {
        self.spinner.set_message(format!("{branch}: {stage}"));
    }

    async fn on_message(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }
}
