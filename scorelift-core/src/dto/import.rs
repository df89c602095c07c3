//! Import job wire shapes
//!
//! The import service answers both the submit and the poll request with one
//! of two JSON shapes: a "still running" signal carrying the job handle, or
//! the terminal report itself.

use serde::{Deserialize, Serialize};

use crate::domain::report::ImportReport;

/// Opaque server-issued handle for one in-flight import job
///
/// Issued when a submission is not completed synchronously. Owned by a single
/// polling sequence and never reused across sequences.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(String);

impl ResultId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ResultId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ResultId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ResultId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reply union for submit and poll requests
///
/// Untagged, so variant order matters: every field of [`ImportReport`] is
/// defaulted, and a waiting reply would deserialize into an empty report if
/// `Complete` were tried first. `Pending` stays declared first and requires
/// the `waiting` field, which terminal replies never carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportStatus {
    /// The job is still running server-side
    Pending {
        waiting: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result_id: Option<ResultId>,
    },
    /// The job finished; the reply is the terminal report
    Complete(ImportReport),
}

/// Poll request body, form-encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollRequest {
    pub result_id: ResultId,
}
