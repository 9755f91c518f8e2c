// Environment variable loading

use std::collections::HashMap;
use std::env;

/// Collects `<PREFIX>_*` variables as lowercase config keys.
///
/// With prefix `PROOFAGE`, `PROOFAGE_SECRET_KEY` becomes `secret_key`.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    /// Create a loader for the given variable prefix (without trailing `_`).
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load matching variables from the process environment.
    pub fn load(&self) -> HashMap<String, String> {
        self.collect(env::vars())
    }

    /// Filter and rename matching pairs from any source.
    pub fn collect<I>(&self, vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| self.config_key(&key).map(|k| (k, value)))
            .collect()
    }

    /// Map a variable name to its config key, if it carries the prefix.
    pub fn config_key(&self, var: &str) -> Option<String> {
        let rest = var.strip_prefix(self.prefix.as_str())?.strip_prefix('_')?;
        if rest.is_empty() {
            return None;
        }
        Some(rest.to_lowercase())
    }

    /// Variable name for a config key.
    pub fn var_name(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key.to_uppercase())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(crate::DEFAULT_ENV_PREFIX)
    }
}
