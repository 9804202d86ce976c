//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `VENUE_SHERPA`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use venue_sherpa::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod store;

pub use error::{ConfigError, ValidationError};
pub use store::StoreConfig;

use serde::Deserialize;

use crate::domain::policy::PolicyConfig;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Policy tuning (turn budget, detail slot cap).
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Venue dataset location.
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `VENUE_SHERPA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `VENUE_SHERPA__POLICY__MAX_TURNS=30` -> `policy.max_turns = 30`
    /// - `VENUE_SHERPA__STORE__DATA_PATH=...` -> `store.data_path = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VENUE_SHERPA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.policy.max_turns == 0 {
            return Err(ValidationError::new(
                "policy.max_turns",
                "must be at least 1",
            ));
        }
        if self.policy.detail_slot_limit == 0 {
            return Err(ValidationError::new(
                "policy.detail_slot_limit",
                "must be at least 1",
            ));
        }
        self.store.validate()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            store: StoreConfig::default(),
        }
    }
}
