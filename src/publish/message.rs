//! Pure helpers for deriving PR content and reading status results
//!
//! No I/O happens here.

use crate::types::{CI_STATUS_CONTEXT, CombinedStatus, TRACKING_QUERY_PARAMS};
use url::Url;

/// Split a commit message into PR title and body
///
/// The title is everything up to the first line break. The body is the
/// remainder after that line break, unless a non-empty `body_override` is
/// given, which always wins.
pub fn derive_title_body(commit_message: &str, body_override: Option<&str>) -> (String, String) {
    let (title, remainder) = match commit_message.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (commit_message, ""),
    };

    let body = match body_override {
        Some(body) if !body.is_empty() => body,
        _ => remainder,
    };

    (title.to_string(), body.to_string())
}

/// Whether a remote value has drifted from the desired one
///
/// A missing value on either side never counts as drift.
pub fn differs(current: Option<&str>, desired: Option<&str>) -> bool {
    matches!((current, desired), (Some(a), Some(b)) if a != b)
}

/// Remove tracking parameters from a URL, keeping every other parameter
///
/// Input that does not parse as a URL is returned unchanged.
pub fn strip_tracking_params(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !TRACKING_QUERY_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    url.to_string()
}

/// The CI build link from a combined status, cleaned of tracking parameters
///
/// When several statuses carry the CI context the last one wins.
pub fn ci_build_url(status: &CombinedStatus) -> Option<String> {
    status
        .statuses
        .iter()
        .filter(|s| s.context.as_deref() == Some(CI_STATUS_CONTEXT))
        .filter_map(|s| s.target_url.as_deref())
        .next_back()
        .map(strip_tracking_params)
}
