//! Score export wire shapes

use serde::{Deserialize, Serialize};

/// Query parameters for the score CSV download
///
/// Unset fields are left out of the query string entirely; the server treats
/// a missing filter as "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohort: Option<String>,
}
