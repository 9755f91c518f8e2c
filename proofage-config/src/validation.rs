// Configuration validation

use crate::{ConfigError, Result};

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Configuration validator with rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a value is present and not blank
    pub fn not_empty(value: Option<&str>, field: &str) -> Result<()> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            ))),
        }
    }

    /// Validate URL format
    pub fn is_url(value: &str, field: &str) -> Result<()> {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a valid URL",
                field
            )));
        }
        Ok(())
    }

    /// Validate that a value contains no path separators or whitespace
    pub fn is_path_segment(value: &str, field: &str) -> Result<()> {
        if value.is_empty() || value.contains('/') || value.chars().any(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be a single path segment",
                field
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty_validation() {
        assert!(ConfigValidator::not_empty(Some("value"), "field").is_ok());
        assert!(ConfigValidator::not_empty(Some("  "), "field").is_err());
        assert!(ConfigValidator::not_empty(None, "field").is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(ConfigValidator::is_url("https://api.proofage.xyz", "field").is_ok());
        assert!(ConfigValidator::is_url("http://localhost:8080", "field").is_ok());
        assert!(ConfigValidator::is_url("api.proofage.xyz", "field").is_err());
    }

    #[test]
    fn test_path_segment_validation() {
        assert!(ConfigValidator::is_path_segment("v1", "version").is_ok());
        assert!(ConfigValidator::is_path_segment("v1/beta", "version").is_err());
        assert!(ConfigValidator::is_path_segment("", "version").is_err());
    }
}
