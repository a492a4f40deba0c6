//! Configuration
//!
//! Settings are read from CLI flags, falling back to environment variables (a `.env`
//! file is loaded first if present) and then to defaults.

use clap::Args;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::retry::RetryPolicy;

mod cart;
mod catalog;
mod logging;

pub use cart::CartConfig;
pub use catalog::CatalogConfig;
pub use logging::{LogFormat, LoggingConfig};

/// Errors raised while interpreting configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The currency code is not a known ISO 4217 code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// At least one fetch attempt is needed.
    #[error("retry attempts must be at least 1")]
    NoAttempts,
}

/// Tavola settings.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Catalog source and fetch settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Cart storage and pricing settings.
    #[command(flatten)]
    pub cart: CartConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load `.env` into the process environment if the file exists.
    pub fn load_dotenv() {
        // Missing file is fine
        _ = dotenvy::dotenv();
    }

    /// The display currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the configured code is not recognised.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        let code = self.cart.currency.trim().to_uppercase();

        iso::find(&code).ok_or(ConfigError::UnknownCurrency(code))
    }

    /// Retry policy for catalog fetches.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoAttempts`] if retry attempts is zero.
    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        self.catalog.retry_policy()
    }
}
