//! Per-prefix configuration resolution.

use crate::signing_config::{SecretKey, SigningConfig};
use crate::validation::Validate;
use crate::{ConfigError, ConfigStore, DEFAULT_PREFIX, Result, defaults};
use std::time::Duration;
use tracing::debug;

/// Resolves configuration records out of a [`ConfigStore`].
///
/// Credentials (`api_key`, `secret_key`) are read from the requested prefix
/// only. Shared settings fall back to the default `proofage` record.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    store: ConfigStore,
}

/// Everything known about one prefix, before required keys are enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub prefix: String,
    pub api_key: Option<String>,
    pub secret_key: Option<SecretKey>,
    pub base_url: Option<String>,
    pub version: String,
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub retry_delay: Duration,
    pub webhook_tolerance: u64,
}

impl ConfigResolver {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Resolver over built-in defaults and `PROOFAGE_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(ConfigStore::from_env())
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Resolve the record for `prefix`.
    ///
    /// Fails only when a present value has the wrong type; absent keys are
    /// reported later by [`ResolvedConfig::signing_config`].
    pub fn resolve(&self, prefix: &str) -> Result<ResolvedConfig> {
        let key = |name: &str| format!("{prefix}.{name}");

        let resolved = ResolvedConfig {
            prefix: prefix.to_string(),
            api_key: self.store.get_string(&key("api_key")),
            secret_key: self.store.get_string(&key("secret_key")).map(SecretKey::new),
            base_url: self.shared_string(prefix, "base_url"),
            version: self
                .shared_string(prefix, "version")
                .unwrap_or_else(|| defaults::VERSION.to_string()),
            timeout: Duration::from_secs(
                self.shared_u64(prefix, "timeout")?
                    .unwrap_or(defaults::TIMEOUT),
            ),
            retry_attempts: self
                .shared_u64(prefix, "retry_attempts")?
                .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
                .unwrap_or(defaults::RETRY_ATTEMPTS),
            retry_delay: Duration::from_millis(
                self.shared_u64(prefix, "retry_delay")?
                    .unwrap_or(defaults::RETRY_DELAY),
            ),
            webhook_tolerance: self
                .shared_u64(prefix, "webhook_tolerance")?
                .unwrap_or(defaults::WEBHOOK_TOLERANCE),
        };

        debug!(
            prefix,
            has_api_key = resolved.api_key.is_some(),
            has_secret_key = resolved.secret_key.is_some(),
            "Resolved configuration"
        );

        Ok(resolved)
    }

    /// Resolve `prefix` and require complete signing credentials.
    pub fn resolve_signing(&self, prefix: &str) -> Result<SigningConfig> {
        self.resolve(prefix)?.signing_config()
    }

    fn shared_string(&self, prefix: &str, name: &str) -> Option<String> {
        self.store
            .get_string(&format!("{prefix}.{name}"))
            .or_else(|| self.store.get_string(&format!("{DEFAULT_PREFIX}.{name}")))
    }

    fn shared_u64(&self, prefix: &str, name: &str) -> Result<Option<u64>> {
        match self.store.get_u64(&format!("{prefix}.{name}"))? {
            Some(value) => Ok(Some(value)),
            None => self.store.get_u64(&format!("{DEFAULT_PREFIX}.{name}")),
        }
    }
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(ConfigStore::with_defaults())
    }
}

impl ResolvedConfig {
    /// Required keys that are absent or blank, in a stable order.
    pub fn missing_required(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.api_key.is_none() {
            missing.push("api_key".to_string());
        }
        if self.secret_key.as_ref().is_none_or(SecretKey::is_empty) {
            missing.push("secret_key".to_string());
        }
        if self.base_url.is_none() {
            missing.push("base_url".to_string());
        }
        missing
    }

    /// Both webhook credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.secret_key.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Turn a complete record into signing credentials.
    pub fn signing_config(&self) -> Result<SigningConfig> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(
                missing
                    .into_iter()
                    .map(|key| format!("{}.{}", self.prefix, key))
                    .collect(),
            ));
        }

        let (Some(api_key), Some(secret_key), Some(base_url)) =
            (&self.api_key, &self.secret_key, &self.base_url)
        else {
            return Err(ConfigError::MissingKeys(vec![self.prefix.clone()]));
        };

        let config = SigningConfig {
            api_key: api_key.clone(),
            secret_key: secret_key.clone(),
            base_url: base_url.clone(),
            version: self.version.clone(),
            webhook_tolerance: self.webhook_tolerance,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ConfigStore {
        let store = ConfigStore::with_defaults();
        store.set("proofage.api_key", "pk_default").unwrap();
        store.set("proofage.secret_key", "sk_default").unwrap();
        store.set("proofage.webhook_tolerance", 120).unwrap();
        store
    }

    #[test]
    fn test_resolve_default_prefix() {
        let resolver = ConfigResolver::new(store());
        let config = resolver.resolve("proofage").unwrap();

        assert_eq!(config.api_key.as_deref(), Some("pk_default"));
        assert_eq!(config.base_url.as_deref(), Some("https://api.proofage.xyz"));
        assert_eq!(config.version, "v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_millis(1000));
        assert_eq!(config.webhook_tolerance, 120);
    }

    #[test]
    fn test_shared_keys_fall_back_to_default() {
        let store = store();
        store.set("services.acme.api_key", "pk_acme").unwrap();
        store.set("services.acme.secret_key", "sk_acme").unwrap();
        store.set("services.acme.version", "v2").unwrap();

        let config = ConfigResolver::new(store).resolve("services.acme").unwrap();
        assert_eq!(config.api_key.as_deref(), Some("pk_acme"));
        assert_eq!(config.version, "v2");
        assert_eq!(config.base_url.as_deref(), Some("https://api.proofage.xyz"));
        assert_eq!(config.webhook_tolerance, 120);
    }

    #[test]
    fn test_credentials_never_fall_back() {
        let store = store();
        store.set("services.acme.api_key", "pk_acme").unwrap();

        let config = ConfigResolver::new(store).resolve("services.acme").unwrap();
        assert_eq!(config.secret_key, None);
        assert!(!config.has_credentials());

        let err = config.signing_config().unwrap_err();
        assert_eq!(err.missing_keys(), ["services.acme.secret_key"]);
    }

    #[test]
    fn test_tolerance_defaults_to_300() {
        let resolver = ConfigResolver::new(ConfigStore::new());
        let config = resolver.resolve("anything").unwrap();
        assert_eq!(config.webhook_tolerance, 300);
        assert_eq!(config.base_url, None);
    }

    #[test]
    fn test_env_strings_are_parsed() {
        let store = ConfigStore::with_defaults();
        store.set("proofage.timeout", "45").unwrap();
        store.set("proofage.retry_delay", "250").unwrap();

        let config = ConfigResolver::new(store).resolve("proofage").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let store = ConfigStore::with_defaults();
        store.set("proofage.webhook_tolerance", "five minutes").unwrap();

        let result = ConfigResolver::new(store).resolve("proofage");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_missing_required_lists_everything() {
        let config = ConfigResolver::new(ConfigStore::new()).resolve("proofage").unwrap();
        assert_eq!(config.missing_required(), ["api_key", "secret_key", "base_url"]);
    }

    #[test]
    fn test_resolve_signing() {
        let signing = ConfigResolver::new(store()).resolve_signing("proofage").unwrap();
        assert_eq!(signing.api_key, "pk_default");
        assert_eq!(signing.secret_key.expose(), b"sk_default");
        assert_eq!(signing.webhook_tolerance, 120);
    }
}
