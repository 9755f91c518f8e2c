//! Fully resolved signing credentials.

use crate::validation::{ConfigValidator, Validate};
use crate::{ConfigError, Result};
use std::fmt;

/// HMAC secret that never appears in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret bytes, for keying the MAC.
    pub fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl From<&str> for SecretKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecretKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Credentials and endpoint settings used to sign and verify requests.
///
/// Immutable once built; share it by cloning or behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningConfig {
    pub api_key: String,
    pub secret_key: SecretKey,
    pub base_url: String,
    pub version: String,
    /// Seconds a webhook timestamp may drift from the local clock.
    pub webhook_tolerance: u64,
}

impl SigningConfig {
    /// Build and validate a config with default version and tolerance.
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<SecretKey>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let config = Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            base_url: base_url.into(),
            version: crate::defaults::VERSION.to_string(),
            webhook_tolerance: crate::defaults::WEBHOOK_TOLERANCE,
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the API version path segment.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Override the webhook timestamp tolerance.
    pub fn with_webhook_tolerance(mut self, seconds: u64) -> Self {
        self.webhook_tolerance = seconds;
        self
    }
}

impl Validate for SigningConfig {
    fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.api_key.trim().is_empty() {
            missing.push("api_key".to_string());
        }
        if self.secret_key.is_empty() {
            missing.push("secret_key".to_string());
        }
        if self.base_url.trim().is_empty() {
            missing.push("base_url".to_string());
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing));
        }

        ConfigValidator::is_url(&self.base_url, "base_url")?;
        ConfigValidator::is_path_segment(&self.version, "version")?;
        Ok(())
    }
}
