//! Score CSV export

use tracing::debug;

use crate::ImportClient;
use crate::error::Result;
use scorelift_core::dto::export::ExportFilter;

impl ImportClient {
    /// Download the current scores as CSV
    ///
    /// # Arguments
    /// * `filter` - Optional track and cohort restrictions; unset fields are
    ///   omitted from the query string
    ///
    /// # Returns
    /// The raw CSV body
    pub async fn export_scores(&self, filter: &ExportFilter) -> Result<String> {
        let url = format!("{}/export", self.base_url);
        debug!("Downloading score export");

        let response = self.client.get(&url).query(filter).send().await?;

        self.handle_text_response(response).await
    }
}
