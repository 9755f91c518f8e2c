//! Ordered webhook verification gate.

use crate::{Result, WebhookEnvelope, WebhookRejection};
use bytes::Bytes;
use http::HeaderMap;
use proofage_config::{ConfigError, ConfigResolver, ResolvedConfig, SecretKey, defaults};
use proofage_signing::WebhookSignatureVerifier;
use proofage_signing::headers::{AUTH_CLIENT, SIGNATURE, TIMESTAMP};
use proofage_signing::mac::constant_time_eq;
use tracing::{debug, error, warn};

/// Verifies inbound webhooks against one workspace's credentials.
///
/// Checks run in a fixed order and the first failure wins:
///
/// 1. `X-HMAC-Signature` present
/// 2. `X-Timestamp` present
/// 3. `X-Auth-Client` present
/// 4. API key and secret configured for this prefix
/// 5. `X-Auth-Client` equals the API key
/// 6. timestamp within tolerance of now
/// 7. signature matches `HMAC-SHA256(secret, "<timestamp>." + body)`
#[derive(Debug, Clone)]
pub struct WebhookGate {
    prefix: String,
    api_key: Option<String>,
    verifier: Option<WebhookSignatureVerifier>,
    tolerance: u64,
}

impl WebhookGate {
    /// Gate with explicit credentials and the default tolerance.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<SecretKey>) -> Self {
        let secret_key = secret_key.into();
        let api_key = api_key.into();
        Self {
            prefix: proofage_config::DEFAULT_PREFIX.to_string(),
            api_key: (!api_key.is_empty()).then_some(api_key),
            verifier: (!secret_key.is_empty()).then(|| WebhookSignatureVerifier::new(secret_key)),
            tolerance: defaults::WEBHOOK_TOLERANCE,
        }
    }

    /// Gate for a resolved record. Missing credentials are not an error here;
    /// every request is then refused with `CONFIGURATION_ERROR`.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let verifier = config
            .secret_key
            .as_ref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| {
                WebhookSignatureVerifier::new(secret.clone())
                    .with_tolerance(config.webhook_tolerance)
            });

        Self {
            prefix: config.prefix.clone(),
            api_key: config.api_key.clone(),
            verifier,
            tolerance: config.webhook_tolerance,
        }
    }

    /// Resolve `prefix` and build its gate.
    pub fn for_prefix(
        resolver: &ConfigResolver,
        prefix: &str,
    ) -> std::result::Result<Self, ConfigError> {
        Ok(Self::from_config(&resolver.resolve(prefix)?))
    }

    /// Override the timestamp tolerance in seconds. Holds even when the
    /// gate is not configured yet.
    pub fn with_tolerance(mut self, seconds: u64) -> Self {
        self.tolerance = seconds;
        self.verifier = self.verifier.map(|v| v.with_tolerance(seconds));
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tolerance(&self) -> u64 {
        self.tolerance
    }

    /// Whether both credentials are present.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.verifier.is_some()
    }

    /// Check a webhook against the current time.
    pub fn check(&self, headers: &HeaderMap, body: &[u8]) -> Result<WebhookEnvelope> {
        self.check_at(headers, body, chrono::Utc::now().timestamp())
    }

    /// Check a webhook against a given unix time.
    pub fn check_at(&self, headers: &HeaderMap, body: &[u8], now: i64) -> Result<WebhookEnvelope> {
        let result = self.evaluate(headers, body, now);

        match &result {
            Ok(envelope) => debug!(
                prefix = %self.prefix,
                timestamp = envelope.timestamp,
                "Webhook signature verified"
            ),
            Err(rejection) if rejection.is_configuration() => error!(
                prefix = %self.prefix,
                code = rejection.code(),
                "Webhook secret key or API key is not configured"
            ),
            Err(rejection) => warn!(
                prefix = %self.prefix,
                code = rejection.code(),
                "Webhook rejected"
            ),
        }

        result
    }

    fn evaluate(&self, headers: &HeaderMap, body: &[u8], now: i64) -> Result<WebhookEnvelope> {
        let signature =
            header_value(headers, SIGNATURE).ok_or(WebhookRejection::MissingSignature)?;
        let timestamp =
            header_value(headers, TIMESTAMP).ok_or(WebhookRejection::MissingTimestamp)?;
        let auth_client = header_value(headers, AUTH_CLIENT)
            .ok_or(WebhookRejection::MissingAuthClient)?;

        let (Some(api_key), Some(verifier)) = (&self.api_key, &self.verifier) else {
            return Err(WebhookRejection::ConfigurationError);
        };

        if !constant_time_eq(api_key, auth_client) {
            return Err(WebhookRejection::InvalidAuthClient);
        }

        let timestamp = timestamp
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|ts| verifier.is_timestamp_valid_at(*ts, now))
            .ok_or(WebhookRejection::TimestampTooOld)?;

        if !verifier.verify(body, timestamp, signature) {
            return Err(WebhookRejection::InvalidSignature);
        }

        Ok(WebhookEnvelope {
            signature: signature.to_string(),
            timestamp,
            auth_client: auth_client.to_string(),
            raw_body: Bytes::copy_from_slice(body),
        })
    }
}

/// Header value as text; absent, empty or non-ASCII values count as missing.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}
