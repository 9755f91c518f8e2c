//! Request signing and webhook verification for ProofAge
//!
//! Both directions share one primitive, lowercase-hex HMAC-SHA256:
//!
//! - **Outbound**: [`RequestSigner`] canonicalizes a request (method, path,
//!   JSON body or multipart fields plus file hashes) and signs it.
//! - **Inbound**: [`WebhookSignatureVerifier`] recomputes the signature over
//!   `"<timestamp>.<raw body>"`, compares it in constant time and enforces a
//!   symmetric timestamp window.
//!
//! # Example: Signing a request
//!
//! ```rust
//! use proofage_config::SigningConfig;
//! use proofage_signing::RequestSigner;
//!
//! let config = SigningConfig::new("pk_test", "test-secret-key", "https://api.proofage.xyz")?;
//! let signer = RequestSigner::new(&config)?;
//!
//! let body = serde_json::json!({"callback_url": "https://example.com/webhook"});
//! let signature = signer.sign("POST", "verifications", Some(&body), &[])?;
//! assert_eq!(signature.len(), 64);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example: Verifying a webhook
//!
//! ```rust
//! use proofage_signing::WebhookSignatureVerifier;
//!
//! let verifier = WebhookSignatureVerifier::new("test-secret-key");
//! let body = br#"{"status":"approved"}"#;
//! let signature = verifier.generate_signature(body, 1_700_000_000);
//!
//! assert!(verifier.verify(body, 1_700_000_000, &signature));
//! ```

mod attachment;
pub mod canonical;
mod error;
pub mod mac;
mod signer;
mod verifier;

pub use attachment::{FileAttachment, FileSource, HashedFile};
pub use canonical::CanonicalRequest;
pub use error::SigningError;
pub use signer::{PreparedBody, RequestSigner, SignedRequest};
pub use verifier::{WebhookSignatureVerifier, is_timestamp_valid};

/// Result type for signing operations
pub type Result<T> = std::result::Result<T, SigningError>;

/// Header names shared by clients and webhook receivers
pub mod headers {
    /// API key sent with every outbound request
    pub const API_KEY: &str = "X-API-Key";

    /// Hex HMAC-SHA256 signature, both directions
    pub const SIGNATURE: &str = "X-HMAC-Signature";

    /// Unix seconds the webhook was signed at
    pub const TIMESTAMP: &str = "X-Timestamp";

    /// API key the webhook sender claims to be addressing
    pub const AUTH_CLIENT: &str = "X-Auth-Client";
}
