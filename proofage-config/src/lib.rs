//! Configuration for ProofAge clients and webhook receivers.
//!
//! Settings live in a [`ConfigStore`] as dotted keys (`"<prefix>.<key>"`), so
//! several workspaces can keep their own credentials side by side:
//!
//! ```rust
//! use proofage_config::{ConfigResolver, ConfigStore};
//!
//! let store = ConfigStore::with_defaults();
//! store.set("proofage.api_key", "pk_live").unwrap();
//! store.set("proofage.secret_key", "sk_live").unwrap();
//! store.set("services.acme.api_key", "pk_acme").unwrap();
//! store.set("services.acme.secret_key", "sk_acme").unwrap();
//!
//! let resolver = ConfigResolver::new(store);
//! let acme = resolver.resolve("services.acme").unwrap();
//!
//! assert_eq!(acme.api_key.as_deref(), Some("pk_acme"));
//! // Shared settings fall back to the default record.
//! assert_eq!(acme.version, "v1");
//! ```

pub mod env;
pub mod error;
pub mod loader;
pub mod resolver;
pub mod signing_config;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use resolver::{ConfigResolver, ResolvedConfig};
pub use signing_config::{SecretKey, SigningConfig};
pub use validation::{ConfigValidator, Validate};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Prefix of the default configuration record.
pub const DEFAULT_PREFIX: &str = "proofage";

/// Environment variable prefix mapped onto [`DEFAULT_PREFIX`].
pub const DEFAULT_ENV_PREFIX: &str = "PROOFAGE";

/// Built-in values for the shared keys of the default record.
pub mod defaults {
    pub const BASE_URL: &str = "https://api.proofage.xyz";
    pub const VERSION: &str = "v1";
    /// Seconds.
    pub const TIMEOUT: u64 = 30;
    pub const RETRY_ATTEMPTS: u32 = 3;
    /// Milliseconds.
    pub const RETRY_DELAY: u64 = 1000;
    /// Seconds.
    pub const WEBHOOK_TOLERANCE: u64 = 300;
}

/// Thread-safe store of configuration values keyed by dotted path.
#[derive(Clone, Default)]
pub struct ConfigStore {
    values: Arc<RwLock<HashMap<String, Value>>>,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the built-in shared defaults.
    pub fn with_defaults() -> Self {
        let store = Self::new();
        {
            let mut values = store.values.write();
            let mut put = |key: &str, value: Value| {
                values.insert(format!("{DEFAULT_PREFIX}.{key}"), value);
            };
            put("base_url", Value::from(defaults::BASE_URL));
            put("version", Value::from(defaults::VERSION));
            put("timeout", Value::from(defaults::TIMEOUT));
            put("retry_attempts", Value::from(defaults::RETRY_ATTEMPTS));
            put("retry_delay", Value::from(defaults::RETRY_DELAY));
            put("webhook_tolerance", Value::from(defaults::WEBHOOK_TOLERANCE));
        }
        store
    }

    /// Build the usual store: built-in defaults overlaid with `PROOFAGE_*`
    /// environment variables.
    pub fn from_env() -> Self {
        let store = Self::with_defaults();
        store.load_env(DEFAULT_ENV_PREFIX, DEFAULT_PREFIX);
        store
    }

    /// Set a configuration value.
    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }

    /// Remove a value, returning it if it was present.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.values.write().remove(key)
    }

    /// Raw value for a key.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    /// Typed value for a key.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .get_value(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// String value for a key. Numbers and booleans are rendered as text;
    /// `null` and empty strings count as absent.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get_value(key)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Unsigned integer value for a key, accepting numeric strings.
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        match self.get_value(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| invalid(format!("expected a non-negative integer, got {n}"))),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| invalid(format!("expected a non-negative integer, got {s:?}"))),
            Some(other) => Err(invalid(format!("expected a non-negative integer, got {other}"))),
        }
    }

    /// Check if a key exists
    pub fn has(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    /// All keys currently set.
    pub fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    /// Copy every value of `other` into this store, overwriting on conflict.
    pub fn merge(&self, other: &ConfigStore) {
        let theirs = other.values.read().clone();
        self.values.write().extend(theirs);
    }

    /// Load `<ENV_PREFIX>_*` process environment variables into `config_prefix`.
    ///
    /// `PROOFAGE_API_KEY` becomes `proofage.api_key`.
    pub fn load_env(&self, env_prefix: &str, config_prefix: &str) {
        let vars = EnvLoader::new(env_prefix).load();
        self.apply_vars(vars, config_prefix);
    }

    /// Load `<ENV_PREFIX>_*` entries of a `.env` file into `config_prefix`
    /// without touching the process environment.
    pub fn load_dotenv(
        &self,
        path: impl AsRef<Path>,
        env_prefix: &str,
        config_prefix: &str,
    ) -> Result<()> {
        let iter = dotenvy::from_path_iter(path.as_ref())
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;

        let mut pairs = Vec::new();
        for item in iter {
            pairs.push(item.map_err(|e| ConfigError::ParseError(e.to_string()))?);
        }

        let vars = EnvLoader::new(env_prefix).collect(pairs);
        self.apply_vars(vars, config_prefix);
        Ok(())
    }

    /// Load a JSON or TOML file. Nested tables become dotted keys, so
    /// `[services.acme] api_key = "..."` sets `services.acme.api_key`.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let loader = ConfigLoader::auto(path)?;
        let data = loader.load_file(path)?;
        self.apply_tree(data);
        Ok(())
    }

    /// Load configuration from a string in the given format.
    pub fn load_str(&self, content: &str, format: FileFormat) -> Result<()> {
        let data = ConfigLoader::new(format).parse(content)?;
        self.apply_tree(data);
        Ok(())
    }

    fn apply_vars(&self, vars: HashMap<String, String>, config_prefix: &str) {
        debug!(
            count = vars.len(),
            prefix = config_prefix,
            "Applying environment configuration"
        );
        let mut values = self.values.write();
        for (key, value) in vars {
            values.insert(format!("{config_prefix}.{key}"), Value::String(value));
        }
    }

    fn apply_tree(&self, data: Value) {
        let mut flat = Vec::new();
        flatten_into(String::new(), data, &mut flat);
        self.values.write().extend(flat);
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Values may hold secrets; only list keys.
        let mut keys = self.keys();
        keys.sort();
        f.debug_struct("ConfigStore").field("keys", &keys).finish()
    }
}

fn flatten_into(path: String, value: Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key
                } else {
                    format!("{path}.{key}")
                };
                flatten_into(child_path, child, out);
            }
        }
        leaf if !path.is_empty() => out.push((path, leaf)),
        _ => {}
    }
}
