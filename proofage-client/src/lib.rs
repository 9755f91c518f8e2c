//! Signed HTTP client for the ProofAge verification API.
//!
//! Every request carries the workspace API key and an HMAC-SHA256 signature
//! over its canonical form. JSON bodies are sent as exactly the bytes that
//! were signed; requests with attachments go out as multipart forms.
//!
//! # Features
//!
//! - **Resources**: workspace, consent and verification endpoints
//! - **Retry**: constant-delay retries on connection errors, timeouts, 5xx and 429
//! - **Multi-tenant**: [`ProofAgeClientFactory`] builds a client per config prefix
//! - **Errors**: 401 and 422 responses map to dedicated error variants
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use proofage_client::{ClientOptions, ProofAgeClient};
//! use proofage_config::SigningConfig;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), proofage_client::ProofAgeError> {
//! let config = SigningConfig::new("pk_live", "sk_live", "https://api.proofage.xyz")?;
//! let client = ProofAgeClient::new(config, ClientOptions::default())?;
//!
//! let verification = client
//!     .verifications()
//!     .create(&json!({ "callback_url": "https://example.com/webhook" }))
//!     .await?;
//! println!("{verification}");
//! # Ok(())
//! # }
//! ```
//!
//! # Uploading Media
//!
//! ```rust,no_run
//! use proofage_client::ProofAgeClientFactory;
//! use proofage_signing::FileAttachment;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), proofage_client::ProofAgeError> {
//! let client = ProofAgeClientFactory::from_env().make_default()?;
//! let file = FileAttachment::from_path("file", "/tmp/selfie.jpg");
//!
//! client
//!     .verification("ver_123")
//!     .upload_media(&json!({ "type": "selfie" }), file)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod factory;
pub mod resources;
mod response;
mod retry;

pub use client::ProofAgeClient;
pub use config::{ClientOptions, ClientOptionsBuilder};
pub use error::{DEFAULT_ERROR_MESSAGE, ProofAgeError, Result};
pub use factory::ProofAgeClientFactory;
pub use resources::{Verification, Verifications, Workspace};
pub use response::Response;
pub use retry::{BackoffStrategy, RetryConfig};

pub use http::Method;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        ClientOptions, ProofAgeClient, ProofAgeClientFactory, ProofAgeError, Result, RetryConfig,
    };
}
