//! Publish engine
//!
//! Same split as elsewhere in the crate:
//! - message - pure derivation of PR content and status parsing
//! - reconcile - find-or-create for a single PR (effectful)
//! - execute - the end-to-end publish (effectful)

mod execute;
mod message;
mod progress;
mod reconcile;

pub use execute::publish;
pub use message::{ci_build_url, derive_title_body, differs, strip_tracking_params};
pub use progress::{NoopProgress, ProgressCallback, PublishStage};
pub use reconcile::reconcile_pr;
