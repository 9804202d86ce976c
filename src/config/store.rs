//! Venue store configuration.

use std::path::PathBuf;

use serde::Deserialize;

use super::error::ValidationError;

/// Where the venue dataset comes from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Path to a JSON dataset file; the built-in demo dataset is used when
    /// unset.
    #[serde(default)]
    pub data_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Validates the configured dataset location.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(path) = &self.data_path {
            if path.as_os_str().is_empty() {
                return Err(ValidationError::new("store.data_path", "must not be empty"));
            }
        }
        Ok(())
    }
}
