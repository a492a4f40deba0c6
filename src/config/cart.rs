//! Cart Config

use std::path::PathBuf;

use clap::Args;

/// Cart storage and pricing settings.
#[derive(Debug, Clone, Args)]
pub struct CartConfig {
    /// Directory the cart is persisted in
    #[arg(long, env = "TAVOLA_STORAGE_DIR", default_value = ".tavola")]
    pub storage_dir: PathBuf,

    /// ISO 4217 code used to display amounts
    #[arg(long, env = "TAVOLA_CURRENCY", default_value = "RUB")]
    pub currency: String,

    /// Restaurant whose prices apply; base prices when unset
    #[arg(long, env = "TAVOLA_RESTAURANT")]
    pub restaurant: Option<u64>,
}
