//! Catalog Config

use std::{path::PathBuf, time::Duration};

use clap::Args;

use crate::{config::ConfigError, retry::RetryPolicy};

/// Catalog source and fetch settings.
#[derive(Debug, Clone, Args)]
pub struct CatalogConfig {
    /// YAML file holding the catalog
    #[arg(long, env = "TAVOLA_CATALOG", default_value = "fixtures/catalog.yml")]
    pub catalog_path: PathBuf,

    /// Attempts per catalog collection, including the first
    #[arg(long, env = "TAVOLA_RETRY_ATTEMPTS", default_value_t = 3_u32)]
    pub retry_attempts: u32,

    /// Wait before the first retry, in milliseconds
    #[arg(long, env = "TAVOLA_RETRY_BACKOFF_MS", default_value_t = 250_u64)]
    pub retry_backoff_ms: u64,

    /// Upper bound on any single retry wait, in milliseconds
    #[arg(long, env = "TAVOLA_RETRY_MAX_BACKOFF_MS", default_value_t = 2_000_u64)]
    pub retry_max_backoff_ms: u64,
}

impl CatalogConfig {
    /// Build the retry policy for catalog fetches.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoAttempts`] if `retry_attempts` is zero.
    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        if self.retry_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }

        Ok(RetryPolicy {
            max_attempts: self.retry_attempts,
            initial_backoff: Duration::from_millis(self.retry_backoff_ms),
            max_backoff: Duration::from_millis(self.retry_max_backoff_ms),
        })
    }
}
