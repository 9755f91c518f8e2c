//! ProofAge client error types.

use crate::{Response, RetryConfig};
use proofage_config::ConfigError;
use proofage_signing::SigningError;
use serde_json::{Map, Value};
use thiserror::Error;

/// Result type for ProofAge client operations.
pub type Result<T> = std::result::Result<T, ProofAgeError>;

/// Message used when the API does not supply one.
pub const DEFAULT_ERROR_MESSAGE: &str = "ProofAge API request failed";

/// ProofAge client errors.
#[derive(Debug, Error)]
pub enum ProofAgeError {
    /// Credentials or endpoint settings are missing or invalid. Not retryable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The API rejected our credentials or signature (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Remote `error.code`, when present.
        code: Option<String>,
        /// Remote `error.message`, or a generic message.
        message: String,
    },

    /// The API rejected the request payload (HTTP 422).
    #[error("Validation failed: {message}")]
    Validation {
        /// Remote `error.code`, when present.
        code: Option<String>,
        /// Remote `error.message`, or a generic message.
        message: String,
        /// Field errors from the response `errors` object.
        errors: Map<String, Value>,
    },

    /// Any other non-success response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Remote `error.code`, when present.
        code: Option<String>,
        /// Remote `error.message`, or a generic message.
        message: String,
    },

    /// Request could not be canonicalized or signed.
    #[error("Signing error: {0}")]
    Signing(SigningError),

    /// Transport failed after all retries.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetryExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Last error message.
        message: String,
    },

    /// Response body was not the JSON we expected.
    #[error("JSON error: {0}")]
    Json(String),

    /// Connection, timeout or other transport failure.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Background task failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProofAgeError {
    /// Map a non-success response onto the error taxonomy.
    ///
    /// 401 becomes [`Authentication`](Self::Authentication), 422 becomes
    /// [`Validation`](Self::Validation), anything else [`Api`](Self::Api).
    pub fn from_response(response: &Response) -> Self {
        let status = response.status().as_u16();
        let body: Option<Value> = response.json().ok();
        let error = body.as_ref().and_then(|b| b.get("error"));

        let code = error
            .and_then(|e| e.get("code"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
            .to_string();

        match status {
            401 => Self::Authentication { code, message },
            422 => {
                let errors = body
                    .as_ref()
                    .and_then(|b| b.get("errors"))
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                Self::Validation {
                    code,
                    message,
                    errors,
                }
            }
            _ => Self::Api {
                status,
                code,
                message,
            },
        }
    }

    /// HTTP status code, if the error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Validation { .. } => Some(422),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Remote `error.code`, if the API supplied one.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Authentication { code, .. }
            | Self::Validation { code, .. }
            | Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Whether this is a local misconfiguration rather than a remote failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether the default retry policy would send the request again.
    pub fn is_retryable(&self) -> bool {
        RetryConfig::default().retries_error(self)
    }
}

impl From<SigningError> for ProofAgeError {
    fn from(err: SigningError) -> Self {
        match err {
            SigningError::Configuration(message) => Self::Configuration(message),
            other => Self::Signing(other),
        }
    }
}

impl From<ConfigError> for ProofAgeError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
