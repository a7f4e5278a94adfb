// ABOUTME: Deploy status values and their grouping into terminal outcomes.
// ABOUTME: Unknown statuses are always treated as still in progress.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Statuses meaning the deploy finished and is serving traffic.
pub const DEFAULT_LIVE_STATUSES: &[&str] = &["live", "success"];

/// Statuses meaning the deploy will never become live.
pub const DEFAULT_FAILED_STATUSES: &[&str] = &["failed", "error", "cancelled", "build_failed"];

/// A deploy status as reported by the platform.
///
/// The platform's vocabulary is open-ended, so this is a plain string wrapper
/// rather than an enum; grouping happens in [`StatusClassifier`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeployStatus(String);

impl DeployStatus {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeployStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which group a status falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Live,
    Failed,
    InProgress,
}

/// Maps statuses onto [`StatusClass`] using two explicit sets.
#[derive(Debug, Clone)]
pub struct StatusClassifier {
    live: BTreeSet<String>,
    failed: BTreeSet<String>,
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self {
            live: DEFAULT_LIVE_STATUSES.iter().map(|s| s.to_string()).collect(),
            failed: DEFAULT_FAILED_STATUSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl StatusClassifier {
    /// Add statuses to the live-success group.
    pub fn with_live<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for status in statuses {
            let status = status.into();
            self.failed.remove(&status);
            self.live.insert(status);
        }
        self
    }

    /// Add statuses to the failure group.
    pub fn with_failed<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for status in statuses {
            let status = status.into();
            self.live.remove(&status);
            self.failed.insert(status);
        }
        self
    }

    pub fn classify(&self, status: &DeployStatus) -> StatusClass {
        if self.live.contains(status.as_str()) {
            StatusClass::Live
        } else if self.failed.contains(status.as_str()) {
            StatusClass::Failed
        } else {
            StatusClass::InProgress
        }
    }
}
