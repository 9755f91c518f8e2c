//! Verified webhook envelope.

use bytes::Bytes;
use serde::de::DeserializeOwned;

/// An inbound webhook that passed every gate check.
///
/// Built per request and never persisted. The middleware stores it in the
/// request extensions for downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEnvelope {
    pub signature: String,
    /// Unix seconds from `X-Timestamp`.
    pub timestamp: i64,
    pub auth_client: String,
    pub raw_body: Bytes,
}

impl WebhookEnvelope {
    /// Deserialize the body that was signed.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.raw_body)
    }
}
