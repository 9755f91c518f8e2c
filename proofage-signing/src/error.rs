//! Error types for signing operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while canonicalizing or signing a request
#[derive(Error, Debug)]
pub enum SigningError {
    /// Signing credentials are missing; not retryable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Form data could not be flattened into fields
    #[error("Invalid form data: {0}")]
    InvalidFormData(String),

    /// JSON body serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An attachment could not be read for hashing
    #[error("Failed to read attachment {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
