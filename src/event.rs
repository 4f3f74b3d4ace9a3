//! GitHub trigger-event classification
//!
//! A workflow run only tells us its trigger through the event payload file
//! pointed at by `GITHUB_EVENT_PATH`. The two shapes we distinguish:
//! a `pull_request` top-level key marks a pull request, a `ref` key marks a
//! push. Anything else (including no payload at all) is `Unknown`, which is a
//! valid state rather than an error.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{ExtbuildError, ExtbuildResult};
use crate::logging::Logger;

/// Environment variable GitHub Actions sets to the event payload file.
pub const GITHUB_EVENT_PATH_VAR: &str = "GITHUB_EVENT_PATH";

/// Classification of the CI trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GithubEventType {
    PullRequest,
    Push,
    Unknown,
}

impl fmt::Display for GithubEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GithubEventType::PullRequest => "pull_request",
            GithubEventType::Push => "push",
            GithubEventType::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Classify the trigger from `GITHUB_EVENT_PATH`.
///
/// An unset variable is a valid "unknown event" state. A set-but-unreadable
/// or unparsable payload is a hard failure - silently falling back to
/// `Unknown` would flip reduced-CI auto-resolution without anyone noticing.
pub fn detect_github_event_from_env(logger: &Logger) -> ExtbuildResult<GithubEventType> {
    match std::env::var(GITHUB_EVENT_PATH_VAR) {
        Ok(event_path) if !event_path.is_empty() => {
            logger.info("Using GitHub event payload file", &[("event_path", &event_path)]);
            detect_github_event_from_file(Path::new(&event_path))
        }
        _ => {
            logger.info("GITHUB_EVENT_PATH is not set so event type is unknown", &[]);
            Ok(GithubEventType::Unknown)
        }
    }
}

/// Classify the trigger from an explicit payload file.
pub fn detect_github_event_from_file(path: &Path) -> ExtbuildResult<GithubEventType> {
    let data = fs::read_to_string(path).map_err(|source| ExtbuildError::EventRead {
        path: path.to_path_buf(),
        source,
    })?;

    let payload: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(&data).map_err(|source| ExtbuildError::EventParse {
            path: path.to_path_buf(),
            source,
        })?;

    if payload.contains_key("pull_request") {
        return Ok(GithubEventType::PullRequest);
    }
    if payload.contains_key("ref") {
        return Ok(GithubEventType::Push);
    }
    Ok(GithubEventType::Unknown)
}
