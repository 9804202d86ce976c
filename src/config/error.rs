//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors raised during semantic validation of loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration value '{field}': {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    /// Creates a validation error for a configuration field.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_field_and_reason() {
        let err = ValidationError::new("policy.max_turns", "must be at least 1");
        assert_eq!(
            format!("{}", err),
            "invalid configuration value 'policy.max_turns': must be at least 1"
        );
    }
}
