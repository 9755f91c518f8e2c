//! Builds clients for named configuration prefixes.

use crate::{ProofAgeClient, Result};
use proofage_config::{ConfigResolver, DEFAULT_PREFIX};
use tracing::debug;

/// Creates [`ProofAgeClient`]s for any configured workspace.
///
/// Each prefix has its own credentials; shared transport settings fall back
/// to the default `proofage` record.
#[derive(Debug, Clone, Default)]
pub struct ProofAgeClientFactory {
    resolver: ConfigResolver,
}

impl ProofAgeClientFactory {
    pub fn new(resolver: ConfigResolver) -> Self {
        Self { resolver }
    }

    /// Factory over built-in defaults and `PROOFAGE_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(ConfigResolver::from_env())
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    /// Client for the record at `prefix`.
    pub fn make(&self, prefix: &str) -> Result<ProofAgeClient> {
        debug!(prefix, "Creating ProofAge client");
        let resolved = self.resolver.resolve(prefix)?;
        ProofAgeClient::from_resolved(&resolved)
    }

    /// Client for the default `proofage` record.
    pub fn make_default(&self) -> Result<ProofAgeClient> {
        self.make(DEFAULT_PREFIX)
    }
}
