// ProofAge - HMAC-signed client and webhook verification for the ProofAge API
//
// The member crates are re-exported here; `client` and `webhooks` can be
// disabled for consumers that only need one side of the protocol.

// Configuration and signing are always available
pub use proofage_config;
pub use proofage_signing;

pub use proofage_config::{
    ConfigError, ConfigResolver, ConfigStore, ResolvedConfig, SecretKey, SigningConfig,
};
pub use proofage_signing::{
    CanonicalRequest, FileAttachment, RequestSigner, SignedRequest, SigningError,
    WebhookSignatureVerifier, headers,
};

// Re-export optional crates
#[cfg(feature = "client")]
pub use proofage_client;

#[cfg(feature = "client")]
pub use proofage_client::{
    ClientOptions, ProofAgeClient, ProofAgeClientFactory, ProofAgeError, RetryConfig,
};

#[cfg(feature = "webhooks")]
pub use proofage_webhooks;

#[cfg(feature = "webhooks")]
pub use proofage_webhooks::{
    VerifyWebhookSignature, WebhookEnvelope, WebhookGate, WebhookRejection,
};

/// Client for the default `proofage` record, configured from built-in
/// defaults and `PROOFAGE_*` environment variables.
#[cfg(feature = "client")]
pub fn client_from_env() -> proofage_client::Result<ProofAgeClient> {
    ProofAgeClientFactory::from_env().make_default()
}

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ConfigResolver, ConfigStore, FileAttachment, RequestSigner, SigningConfig,
        WebhookSignatureVerifier,
    };

    #[cfg(feature = "client")]
    pub use crate::{ClientOptions, ProofAgeClient, ProofAgeClientFactory, ProofAgeError};

    #[cfg(feature = "webhooks")]
    pub use crate::{VerifyWebhookSignature, WebhookGate, WebhookRejection};

    pub use serde_json::{Value, json};
}
