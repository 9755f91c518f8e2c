//! Inbound webhook signature verification.

use crate::mac::{constant_time_eq, hmac_sha256_hex};
use proofage_config::{SecretKey, SigningConfig, defaults};

/// Verifies `HMAC-SHA256(secret_key, "<timestamp>.<raw body>")` signatures.
///
/// The body must be the raw bytes as received; re-serializing parsed JSON
/// changes the digest.
#[derive(Debug, Clone)]
pub struct WebhookSignatureVerifier {
    secret_key: SecretKey,
    tolerance: u64,
}

impl WebhookSignatureVerifier {
    /// Create a verifier with the default 300 second tolerance.
    pub fn new(secret_key: impl Into<SecretKey>) -> Self {
        Self {
            secret_key: secret_key.into(),
            tolerance: defaults::WEBHOOK_TOLERANCE,
        }
    }

    /// Create a verifier from resolved credentials.
    pub fn from_config(config: &SigningConfig) -> Self {
        Self::new(config.secret_key.clone()).with_tolerance(config.webhook_tolerance)
    }

    /// Set the timestamp tolerance in seconds
    pub fn with_tolerance(mut self, seconds: u64) -> Self {
        self.tolerance = seconds;
        self
    }

    pub fn tolerance(&self) -> u64 {
        self.tolerance
    }

    /// Expected signature for a payload and timestamp.
    pub fn generate_signature(&self, payload: &[u8], timestamp: i64) -> String {
        let prefix = format!("{timestamp}.");
        hmac_sha256_hex(self.secret_key.expose(), &[prefix.as_bytes(), payload])
    }

    /// Check a provided signature in constant time.
    pub fn verify(&self, payload: &[u8], timestamp: i64, signature: &str) -> bool {
        let expected = self.generate_signature(payload, timestamp);
        constant_time_eq(&expected, signature)
    }

    /// Whether `timestamp` is within tolerance of the current time.
    pub fn is_timestamp_valid(&self, timestamp: i64) -> bool {
        is_timestamp_valid(timestamp, self.tolerance, chrono::Utc::now().timestamp())
    }

    /// Whether `timestamp` is within tolerance of `now`.
    pub fn is_timestamp_valid_at(&self, timestamp: i64, now: i64) -> bool {
        is_timestamp_valid(timestamp, self.tolerance, now)
    }
}

/// `|now - timestamp| <= tolerance`. Future timestamps are held to the same
/// window as past ones.
pub fn is_timestamp_valid(timestamp: i64, tolerance: u64, now: i64) -> bool {
    now.abs_diff(timestamp) <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_700_000_000;

    #[test]
    fn test_empty_body_known_value() {
        let verifier = WebhookSignatureVerifier::new("test-secret-key");
        let signature = verifier.generate_signature(b"", T);

        assert_eq!(
            signature,
            "c19c10621ef583ec3522b3676a637812a0703bfd7bb33c17a04b47a9262e4968"
        );
        assert!(verifier.verify(b"", T, &signature));
    }

    #[test]
    fn test_json_body_known_value() {
        let verifier = WebhookSignatureVerifier::new("test-secret-key");
        let body = br#"{"event":"verification.completed"}"#;

        assert_eq!(
            verifier.generate_signature(body, T),
            "8cbc5f68376b436ba5f821a7fddcfc9ed4f0dee16b65c61937b71b5e3eda1053"
        );
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let verifier = WebhookSignatureVerifier::new("test-secret-key");
        let signature = verifier.generate_signature(b"payload", T);

        assert!(verifier.verify(b"payload", T, &signature));
        assert!(!verifier.verify(b"payloae", T, &signature));
        assert!(!verifier.verify(b"payload", T + 1, &signature));
        assert!(!WebhookSignatureVerifier::new("other-secret").verify(b"payload", T, &signature));
    }

    #[test]
    fn test_verify_is_case_and_length_sensitive() {
        let verifier = WebhookSignatureVerifier::new("test-secret-key");
        let signature = verifier.generate_signature(b"payload", T);

        assert!(!verifier.verify(b"payload", T, &signature.to_uppercase()));
        assert!(!verifier.verify(b"payload", T, &signature[..63]));
        assert!(!verifier.verify(b"payload", T, ""));
    }

    #[test]
    fn test_non_utf8_body() {
        let verifier = WebhookSignatureVerifier::new("test-secret-key");
        let body = [0xff, 0xfe, 0x00, 0x80];
        let signature = verifier.generate_signature(&body, T);

        assert!(verifier.verify(&body, T, &signature));
        assert!(!verifier.verify(&[0xff, 0xfe, 0x00, 0x81], T, &signature));
    }

    #[test]
    fn test_timestamp_window_is_symmetric() {
        let verifier = WebhookSignatureVerifier::new("secret").with_tolerance(300);

        assert!(verifier.is_timestamp_valid_at(T, T));
        assert!(verifier.is_timestamp_valid_at(T - 300, T));
        assert!(!verifier.is_timestamp_valid_at(T - 301, T));
        assert!(verifier.is_timestamp_valid_at(T + 300, T));
        assert!(!verifier.is_timestamp_valid_at(T + 301, T));
    }

    #[test]
    fn test_timestamp_against_clock() {
        let verifier = WebhookSignatureVerifier::new("secret");
        let now = chrono::Utc::now().timestamp();

        assert!(verifier.is_timestamp_valid(now));
        assert!(!verifier.is_timestamp_valid(now - 1000));
        assert!(!verifier.is_timestamp_valid(now + 1000));
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        assert!(!is_timestamp_valid(i64::MIN, 300, i64::MAX));
        assert!(!is_timestamp_valid(i64::MAX, 300, 0));
    }

    #[test]
    fn test_from_config() {
        let config = SigningConfig::new("pk", "sk", "https://api.proofage.xyz")
            .unwrap()
            .with_webhook_tolerance(42);
        let verifier = WebhookSignatureVerifier::from_config(&config);
        assert_eq!(verifier.tolerance(), 42);
    }
}
