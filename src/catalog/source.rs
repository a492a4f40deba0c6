//! Catalog Sources

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::{
    catalog::CatalogBatch,
    products::{Category, Component, Product},
    promotions::PromoCode,
    restaurants::{Restaurant, RestaurantProductOverride},
};

/// Errors raised by a catalog source.
#[derive(Debug, Error)]
pub enum CatalogSourceError {
    /// Failed to read the catalog file
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the catalog document
    #[error("failed to parse catalog: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The backend could not be reached or refused the query
    #[error("catalog backend unavailable: {0}")]
    Unavailable(String),
}

/// Bulk, read-only queries against the backend holding the catalog.
#[automock]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch menu categories.
    async fn categories(&self) -> Result<Vec<Category>, CatalogSourceError>;

    /// Fetch restaurant locations.
    async fn restaurants(&self) -> Result<Vec<Restaurant>, CatalogSourceError>;

    /// Fetch menu products.
    async fn products(&self) -> Result<Vec<Product>, CatalogSourceError>;

    /// Fetch every restaurant price override.
    async fn overrides(&self) -> Result<Vec<RestaurantProductOverride>, CatalogSourceError>;

    /// Fetch sauces and sides.
    async fn components(&self) -> Result<Vec<Component>, CatalogSourceError>;

    /// Fetch promo code definitions.
    async fn promo_codes(&self) -> Result<Vec<PromoCode>, CatalogSourceError>;
}

/// Catalog source backed by a YAML document on disk.
///
/// The file is re-read on every query so edits show up on the next refresh.
#[derive(Debug, Clone)]
pub struct YamlCatalogSource {
    path: PathBuf,
}

impl YamlCatalogSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the catalog document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole document.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogSourceError`] if the file cannot be read or parsed.
    pub async fn load(&self) -> Result<CatalogBatch, CatalogSourceError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;

        Ok(serde_norway::from_str(&contents)?)
    }
}

#[async_trait]
impl CatalogSource for YamlCatalogSource {
    async fn categories(&self) -> Result<Vec<Category>, CatalogSourceError> {
        Ok(self.load().await?.categories)
    }

    async fn restaurants(&self) -> Result<Vec<Restaurant>, CatalogSourceError> {
        Ok(self.load().await?.restaurants)
    }

    async fn products(&self) -> Result<Vec<Product>, CatalogSourceError> {
        Ok(self.load().await?.products)
    }

    async fn overrides(&self) -> Result<Vec<RestaurantProductOverride>, CatalogSourceError> {
        Ok(self.load().await?.overrides)
    }

    async fn components(&self) -> Result<Vec<Component>, CatalogSourceError> {
        Ok(self.load().await?.components)
    }

    async fn promo_codes(&self) -> Result<Vec<PromoCode>, CatalogSourceError> {
        Ok(self.load().await?.promo_codes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::promotions::PromoKind;

    use super::*;

    const DOCUMENT: &str = r"
restaurants:
  - id: 1
    name: Centre
    min_order_amount: 1000
products:
  - id: 10
    name: Margherita
    price: 500
    category_id: 1
overrides:
  - product_id: 10
    restaurant_id: 1
    price: 650
promo_codes:
  - code: WELCOME10
    discount: 10
    type: percent
    min_order_amount: 500
";

    #[tokio::test]
    async fn reads_each_collection_from_the_document() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(DOCUMENT.as_bytes())?;

        let source = YamlCatalogSource::new(file.path());

        let products = source.products().await?;
        let overrides = source.overrides().await?;
        let promos = source.promo_codes().await?;

        assert_eq!(products.len(), 1);
        assert_eq!(overrides.first().map(|o| o.price), Some(Decimal::from(650)));
        assert_eq!(promos.first().map(|p| p.kind), Some(PromoKind::Percent));
        assert!(source.categories().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = YamlCatalogSource::new("/definitely/not/here.yml");

        let result = source.products().await;

        assert!(
            matches!(result, Err(CatalogSourceError::Io(_))),
            "expected Io error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn malformed_document_is_a_parse_error() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"products: [{ id: nope }]")?;

        let result = YamlCatalogSource::new(file.path()).products().await;

        assert!(
            matches!(result, Err(CatalogSourceError::Yaml(_))),
            "expected Yaml error, got {result:?}"
        );

        Ok(())
    }
}
