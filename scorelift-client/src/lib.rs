//! Scorelift HTTP Client
//!
//! A type-safe client for a gradebook's bulk score import service: submit a
//! CSV of learner scores, track the resulting server-side job by polling its
//! handle, and download the current scores as CSV.
//!
//! # Example
//!
//! ```no_run
//! use scorelift_client::{CsvUpload, ImportClient, PollPolicy, SubmitOutcome};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ImportClient::new("http://localhost:8000", "csrf-token");
//!
//!     let upload = CsvUpload::new("scores.csv", b"user,score\nalice,90\n".to_vec());
//!     match client.submit(upload).await? {
//!         SubmitOutcome::Rejected(reason) => println!("{}", reason),
//!         SubmitOutcome::Completed(report) => println!("saved {} rows", report.saved),
//!         SubmitOutcome::Pending(handle) => {
//!             let report = client.await_report(&handle, &PollPolicy::default()).await?;
//!             println!("saved {} rows", report.saved);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod export;
mod poll;
mod submit;
mod upload;
mod watch;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use poll::{DEFAULT_POLL_DEADLINE, DEFAULT_POLL_INTERVAL, PollLimit, PollPolicy};
pub use submit::SubmitOutcome;
pub use upload::{CsvUpload, MAX_UPLOAD_BYTES, UploadRejection};
pub use watch::{ImportJob, ImportOutcome};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use scorelift_core::dto::import::{ImportStatus, ResultId};

/// HTTP client for the gradebook's score import API
///
/// Holds the service base URL plus the anti-forgery token the import endpoint
/// requires, and provides:
/// - Submission (one multipart POST, interpreted into a [`SubmitOutcome`])
/// - Status polling (single checks and the bounded waiting loop)
/// - Score CSV export
#[derive(Debug, Clone)]
pub struct ImportClient {
    /// Base URL of the gradebook service (e.g., "http://localhost:8000")
    base_url: String,
    /// Anti-forgery token sent with every submission
    csrf_token: String,
    /// HTTP client instance
    client: Client,
}

impl ImportClient {
    /// Create a new import client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the gradebook service
    /// * `csrf_token` - The anti-forgery token the import endpoint requires
    ///
    /// # Example
    /// ```
    /// use scorelift_client::ImportClient;
    ///
    /// let client = ImportClient::new("http://localhost:8000", "csrf-token");
    /// ```
    pub fn new(base_url: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf_token: csrf_token.into(),
            client: Client::new(),
        }
    }

    /// Create a new import client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use scorelift_client::ImportClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ImportClient::with_client("http://localhost:8000", "csrf-token", http_client);
    /// ```
    pub fn with_client(
        base_url: impl Into<String>,
        csrf_token: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf_token: csrf_token.into(),
            client,
        }
    }

    /// Get the base URL of the gradebook service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is plain text (e.g., the CSV export)
    ///
    /// This method checks the status code and returns an error if the request
    /// failed, or the raw body otherwise.
    async fn handle_text_response(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .text()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to read response body: {}", e)))
    }
}

// =============================================================================
// API Seam
// =============================================================================

/// The import service operations the polling machinery drives
///
/// Implemented by [`ImportClient`] against the real service; tests substitute
/// scripted fakes to exercise loop timing and cancellation without a network.
#[async_trait]
pub trait ImportApi: Send + Sync {
    /// Submits one score file, returning the interpreted outcome.
    async fn submit(&self, upload: CsvUpload) -> Result<SubmitOutcome>;

    /// Asks the service once whether the job behind `id` has finished.
    async fn poll_status(&self, id: &ResultId) -> Result<ImportStatus>;
}

#[async_trait]
impl ImportApi for ImportClient {
    async fn submit(&self, upload: CsvUpload) -> Result<SubmitOutcome> {
        ImportClient::submit(self, upload).await
    }

    async fn poll_status(&self, id: &ResultId) -> Result<ImportStatus> {
        ImportClient::poll_status(self, id).await
    }
}
