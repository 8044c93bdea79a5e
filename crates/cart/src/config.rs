//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GOMARKETPLACE_STORAGE_KEY` - Key the cart snapshot is persisted under
//!   (default: `@gomarketplace/product-list`)
//! - `GOMARKETPLACE_DATA_DIR` - Directory for file-backed storage. When unset,
//!   the provider falls back to in-memory storage.

use std::path::PathBuf;

use thiserror::Error;

/// Key the cart snapshot is stored under unless overridden.
pub const DEFAULT_STORAGE_KEY: &str = "@gomarketplace/product-list";

const STORAGE_KEY_VAR: &str = "GOMARKETPLACE_STORAGE_KEY";
const DATA_DIR_VAR: &str = "GOMARKETPLACE_DATA_DIR";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Namespaced key for the persisted product list
    pub storage_key: String,
    /// Directory holding file-backed storage, if any
    pub data_dir: Option<PathBuf>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_key = get_env_or_default(STORAGE_KEY_VAR, DEFAULT_STORAGE_KEY);
        validate_storage_key(&storage_key, STORAGE_KEY_VAR)?;
        let data_dir = get_optional_env(DATA_DIR_VAR).map(PathBuf::from);

        Ok(Self {
            storage_key,
            data_dir,
        })
    }

    /// Use `data_dir` for file-backed storage.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    /// Persist under `storage_key` instead of the default key.
    #[must_use]
    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Reject keys that cannot address a storage slot.
fn validate_storage_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    if key.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must not be empty".to_string(),
        ));
    }
    Ok(())
}
