//! Inbound webhook verification for ProofAge.
//!
//! ProofAge signs every webhook with the workspace secret:
//!
//! ```text
//! X-HMAC-Signature: hex(HMAC-SHA256(secret_key, "<X-Timestamp>." + raw body))
//! X-Timestamp:      unix seconds
//! X-Auth-Client:    workspace API key
//! ```
//!
//! [`WebhookGate`] checks those headers in a fixed order and returns either a
//! [`WebhookEnvelope`] or the first [`WebhookRejection`] hit.
//! [`VerifyWebhookSignature`] runs the gate ahead of a handler.
//!
//! # Quick Start
//!
//! ```rust
//! use http::HeaderMap;
//! use proofage_webhooks::{WebhookGate, WebhookRejection};
//!
//! let gate = WebhookGate::new("pk_live", "sk_live");
//! let result = gate.check(&HeaderMap::new(), b"{}");
//!
//! assert_eq!(result, Err(WebhookRejection::MissingSignature));
//! ```
//!
//! # Multiple Workspaces
//!
//! ```rust
//! use proofage_config::{ConfigResolver, ConfigStore};
//! use proofage_webhooks::VerifyWebhookSignature;
//!
//! let store = ConfigStore::with_defaults();
//! store.set("services.acme.api_key", "pk_acme").unwrap();
//! store.set("services.acme.secret_key", "sk_acme").unwrap();
//!
//! let resolver = ConfigResolver::new(store);
//! let acme = VerifyWebhookSignature::for_prefix(&resolver, "services.acme").unwrap();
//! assert!(acme.gate().is_configured());
//! ```

mod envelope;
mod gate;
pub mod middleware;
mod rejection;

pub use envelope::WebhookEnvelope;
pub use gate::WebhookGate;
pub use middleware::{Middleware, Next, VerifyWebhookSignature, next_fn};
pub use rejection::WebhookRejection;

/// Result type for webhook checks.
pub type Result<T> = std::result::Result<T, WebhookRejection>;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        Middleware, VerifyWebhookSignature, WebhookEnvelope, WebhookGate, WebhookRejection,
    };
}
