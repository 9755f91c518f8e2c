//! Client configuration.

use crate::retry::RetryConfig;
use proofage_config::{ResolvedConfig, defaults};
use std::time::Duration;

/// Transport settings for a [`ProofAgeClient`](crate::ProofAgeClient).
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Retry configuration.
    pub retry: RetryConfig,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(defaults::TIMEOUT),
            connect_timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
            pool_max_idle_per_host: 8,
            user_agent: format!("proofage-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientOptions {
    /// Create a new options builder.
    pub fn builder() -> ClientOptionsBuilder {
        ClientOptionsBuilder::default()
    }

    /// Options taken from a resolved configuration record.
    pub fn from_resolved(config: &ResolvedConfig) -> Self {
        Self {
            timeout: config.timeout,
            retry: RetryConfig::constant(config.retry_attempts, config.retry_delay),
            ..Default::default()
        }
    }
}

/// Builder for [`ClientOptions`].
#[derive(Debug, Default)]
pub struct ClientOptionsBuilder {
    options: ClientOptions,
}

impl ClientOptionsBuilder {
    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    /// Set retry configuration.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.options.retry = retry;
        self
    }

    /// Set the maximum idle connections per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.options.pool_max_idle_per_host = max;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.user_agent = user_agent.into();
        self
    }

    /// Build the options.
    pub fn build(self) -> ClientOptions {
        self.options
    }
}
