//! Score file submission

use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::ImportClient;
use crate::error::{ClientError, Result};
use crate::upload::{CsvUpload, UploadRejection};
use scorelift_core::domain::report::ImportReport;
use scorelift_core::dto::import::{ImportStatus, ResultId};

/// Interpreted reply to one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The upload failed a local precondition; no request was made
    Rejected(UploadRejection),
    /// The server processed the file synchronously
    Completed(ImportReport),
    /// The server accepted the file and issued a job handle; start polling
    Pending(ResultId),
}

impl ImportClient {
    /// Submit a score file for import
    ///
    /// Local preconditions (empty payload, size over
    /// [`MAX_UPLOAD_BYTES`](crate::MAX_UPLOAD_BYTES)) are checked first and
    /// reported as [`SubmitOutcome::Rejected`] without any network traffic.
    /// Otherwise exactly one multipart POST is made, carrying the anti-forgery
    /// token and the file. There are no retries at this layer; transport and
    /// HTTP failures propagate to the caller.
    ///
    /// # Arguments
    /// * `upload` - The score file; consumed by the submission
    ///
    /// # Returns
    /// The interpreted outcome: rejected, completed synchronously, or pending
    /// with a handle to poll
    pub async fn submit(&self, upload: CsvUpload) -> Result<SubmitOutcome> {
        if let Err(rejection) = upload.validate() {
            debug!(
                "Rejecting {} before submit: {}",
                upload.file_name, rejection
            );
            return Ok(SubmitOutcome::Rejected(rejection));
        }

        let CsvUpload { file_name, data } = upload;
        info!("Submitting {} byte score file {}", data.len(), file_name);

        let form = Form::new()
            .text("csrfmiddlewaretoken", self.csrf_token.clone())
            .part("csv", Part::bytes(data).file_name(file_name));

        let url = format!("{}/import", self.base_url);
        let response = self.client.post(&url).multipart(form).send().await?;
        let status: ImportStatus = self.handle_response(response).await?;

        match status {
            ImportStatus::Complete(report) => {
                info!(
                    "Import completed synchronously ({} rows, {} saved)",
                    report.total, report.saved
                );
                Ok(SubmitOutcome::Completed(report))
            }
            ImportStatus::Pending {
                waiting: true,
                result_id: Some(id),
            } => {
                info!("Import accepted as result {}", id);
                Ok(SubmitOutcome::Pending(id))
            }
            ImportStatus::Pending {
                waiting: true,
                result_id: None,
            } => Err(ClientError::ParseError(
                "waiting reply did not include a result_id".to_string(),
            )),
            ImportStatus::Pending { waiting: false, .. } => Err(ClientError::ParseError(
                "reply set waiting to false".to_string(),
            )),
        }
    }
}
