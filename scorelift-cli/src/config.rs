//! Configuration module
//!
//! Handles CLI configuration including the gradebook URL and credentials.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the gradebook service
    pub gradebook_url: String,
    /// Anti-forgery token sent with submissions
    pub csrf_token: String,
}
