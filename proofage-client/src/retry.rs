//! Retry configuration and strategies.

use crate::ProofAgeError;
use std::time::Duration;

/// Retry configuration.
///
/// `max_attempts` counts every request sent, including the first one.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts.
    pub max_attempts: u32,
    /// Backoff strategy.
    pub backoff: BackoffStrategy,
    /// Status codes below 500 that should trigger a retry.
    pub retry_status_codes: Vec<u16>,
    /// Whether every 5xx response triggers a retry.
    pub retry_server_errors: bool,
    /// Whether to retry on connection errors.
    pub retry_on_connection_error: bool,
    /// Whether to retry on timeout errors.
    pub retry_on_timeout: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::constant(
            proofage_config::defaults::RETRY_ATTEMPTS,
            Duration::from_millis(proofage_config::defaults::RETRY_DELAY),
        )
    }
}

impl RetryConfig {
    /// Create a retry config with constant delay.
    pub fn constant(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            backoff: BackoffStrategy::Constant(delay),
            retry_status_codes: vec![429],
            retry_server_errors: true,
            retry_on_connection_error: true,
            retry_on_timeout: true,
        }
    }

    /// Create a retry config with no delay.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            backoff: BackoffStrategy::None,
            ..Self::constant(max_attempts, Duration::ZERO)
        }
    }

    /// Send every request exactly once.
    pub fn disabled() -> Self {
        Self::immediate(1)
    }

    /// Attempts actually made; zero is treated as one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Pause before the next attempt.
    pub fn delay(&self) -> Duration {
        self.backoff.delay()
    }

    /// Check if a status code should trigger a retry.
    pub fn should_retry_status(&self, status: u16) -> bool {
        (self.retry_server_errors && (500..600).contains(&status))
            || self.retry_status_codes.contains(&status)
    }

    /// Whether the request that failed on `attempt` (1-indexed) should be sent again.
    pub fn should_retry(&self, attempt: u32, error: &ProofAgeError) -> bool {
        attempt < self.attempts() && self.retries_error(error)
    }

    /// Whether `error` is worth another attempt, ignoring the attempt budget.
    pub fn retries_error(&self, error: &ProofAgeError) -> bool {
        match error {
            ProofAgeError::Transport(e) => {
                if e.is_timeout() {
                    self.retry_on_timeout
                } else if e.is_connect() || e.is_request() || e.is_body() {
                    self.retry_on_connection_error
                } else if let Some(status) = e.status() {
                    self.should_retry_status(status.as_u16())
                } else {
                    false
                }
            }
            ProofAgeError::Authentication { .. } | ProofAgeError::Validation { .. } => false,
            ProofAgeError::Api { status, .. } => self.should_retry_status(*status),
            _ => false,
        }
    }
}

/// Backoff strategy for retries.
#[derive(Debug, Clone)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Constant delay between retries.
    Constant(Duration),
}

impl BackoffStrategy {
    pub fn delay(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Constant(d) => *d,
        }
    }
}
