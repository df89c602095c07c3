//! Terminal import report

use serde::{Deserialize, Serialize};

/// Terminal outcome of one bulk score import
///
/// Produced exactly once per job and never mutated afterward. Every field is
/// defaulted because the server omits the counts on error-only replies.
/// `saved <= total` is a server guarantee, not enforced here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Rows the server processed
    #[serde(default)]
    pub total: u64,
    /// Rows successfully applied
    #[serde(default)]
    pub saved: u64,
    /// Row numbers that failed, in input order
    #[serde(default)]
    pub error_rows: Vec<u64>,
    /// Job-level error messages not tied to a single row
    #[serde(default)]
    pub error_messages: Vec<String>,
}

impl ImportReport {
    /// Returns true when the report carries any row-level or job-level errors.
    pub fn has_errors(&self) -> bool {
        !self.error_rows.is_empty() || !self.error_messages.is_empty()
    }
}
