//! Upload payload and local preconditions

use thiserror::Error;

/// Largest score file the import service accepts, in bytes
pub const MAX_UPLOAD_BYTES: usize = 4_194_303;

/// Reason an upload fails local validation
///
/// Detected before any request is made. The Display texts are the user-facing
/// rejection reasons, so callers can show them directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("No file was provided. Please choose a file and try again.")]
    Empty,

    #[error(
        "Files must be less than 4MB. Please split the file into smaller chunks and upload again."
    )]
    TooLarge {
        /// Size of the rejected payload in bytes
        size: usize,
    },
}

/// One CSV score file prepared for submission
///
/// Created once per user action and consumed by the submit call; the payload
/// never outlives the submission that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl CsvUpload {
    /// Creates an upload from a file name and its raw contents.
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            data,
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Checks the local preconditions without touching the network.
    pub fn validate(&self) -> std::result::Result<(), UploadRejection> {
        if self.data.is_empty() {
            return Err(UploadRejection::Empty);
        }
        if self.data.len() > MAX_UPLOAD_BYTES {
            return Err(UploadRejection::TooLarge {
                size: self.data.len(),
            });
        }
        Ok(())
    }
}
