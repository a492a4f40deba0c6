//! Catalog
//!
//! The catalog is fetched in full from a [`CatalogSource`] and published as an
//! immutable [`CatalogSnapshot`]. Readers hold an `Arc` to the snapshot they were
//! given; a refresh builds a new one and swaps it in.

use std::sync::{
    Arc, PoisonError, RwLock,
    atomic::{AtomicU64, Ordering},
};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::retry::{RetryError, RetryPolicy, retry};

mod snapshot;
mod source;

pub use snapshot::{CatalogBatch, CatalogSnapshot};
pub use source::{CatalogSource, CatalogSourceError, MockCatalogSource, YamlCatalogSource};

/// Errors raised while refreshing the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A collection could not be fetched even after retrying.
    #[error(transparent)]
    Fetch(#[from] RetryError<CatalogSourceError>),

    /// A newer refresh started before this one finished, so its result was discarded.
    #[error("catalog refresh superseded by a newer refresh")]
    Superseded,
}

/// Where the catalog is in its lifecycle.
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    /// Nothing requested yet.
    #[default]
    Idle,

    /// A refresh is in flight.
    Loading {
        /// Refresh generation being loaded
        generation: u64,
    },

    /// The most recent refresh succeeded.
    Ready(Arc<CatalogSnapshot>),

    /// The most recent refresh gave up.
    Failed {
        /// Human readable failure, shown alongside a retry affordance
        reason: String,

        /// Attempts made for the collection that failed
        attempts: u32,
    },
}

/// Owns the catalog lifecycle for one session.
///
/// The last successfully fetched snapshot stays readable while a later refresh is
/// loading and after it fails.
#[derive(Debug)]
pub struct Catalog {
    inner: RwLock<Inner>,
    generation: AtomicU64,
    policy: RetryPolicy,
}

#[derive(Debug, Default)]
struct Inner {
    state: CatalogState,
    last_good: Option<Arc<CatalogSnapshot>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl Catalog {
    /// Create an idle catalog that retries fetches according to `policy`.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            generation: AtomicU64::new(0),
            policy,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CatalogState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .clone()
    }

    /// Whether a refresh is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.state(), CatalogState::Loading { .. })
    }

    /// The most recently fetched snapshot, whatever the current state.
    ///
    /// `None` until the first refresh succeeds, and again after a teardown.
    pub fn snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last_good
            .clone()
    }

    /// Fetch every collection from `source` and publish a new snapshot.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Fetch`]: a collection still failed after retrying; the
    ///   catalog moves to [`CatalogState::Failed`] and keeps serving the previous
    ///   snapshot, if any.
    /// - [`CatalogError::Superseded`]: another refresh (or a teardown) started while
    ///   this one was in flight; the newer one owns the state.
    pub async fn refresh<S>(&self, source: &S) -> Result<Arc<CatalogSnapshot>, CatalogError>
    where
        S: CatalogSource + ?Sized,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.commit(generation, CatalogState::Loading { generation });

        match fetch_batch(source, &self.policy).await {
            Ok(batch) => {
                let snapshot = Arc::new(CatalogSnapshot::from_batch(batch));

                if !self.commit(generation, CatalogState::Ready(Arc::clone(&snapshot))) {
                    debug!(generation, "discarding superseded catalog refresh");

                    return Err(CatalogError::Superseded);
                }

                info!(
                    generation,
                    products = snapshot.products().len(),
                    restaurants = snapshot.restaurants().len(),
                    promo_codes = snapshot.promo_codes().len(),
                    "catalog ready"
                );

                Ok(snapshot)
            }
            Err(error) => {
                let failed = CatalogState::Failed {
                    reason: error.to_string(),
                    attempts: error.attempts,
                };

                if !self.commit(generation, failed) {
                    debug!(generation, "discarding superseded catalog failure");

                    return Err(CatalogError::Superseded);
                }

                warn!(generation, %error, "catalog refresh failed");

                Err(error.into())
            }
        }
    }

    /// Drop the current snapshot and ignore any refresh still in flight.
    pub fn teardown(&self) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        self.generation.fetch_add(1, Ordering::SeqCst);
        *inner = Inner::default();
    }

    /// Store `next` if `generation` is still the latest refresh.
    fn commit(&self, generation: u64, next: CatalogState) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }

        if let CatalogState::Ready(snapshot) = &next {
            inner.last_good = Some(Arc::clone(snapshot));
        }

        inner.state = next;

        true
    }
}

async fn fetch_batch<S>(
    source: &S,
    policy: &RetryPolicy,
) -> Result<CatalogBatch, RetryError<CatalogSourceError>>
where
    S: CatalogSource + ?Sized,
{
    Ok(CatalogBatch {
        categories: retry(policy, "categories", || source.categories()).await?,
        restaurants: retry(policy, "restaurants", || source.restaurants()).await?,
        products: retry(policy, "products", || source.products()).await?,
        overrides: retry(policy, "overrides", || source.overrides()).await?,
        components: retry(policy, "components", || source.components()).await?,
        promo_codes: retry(policy, "promo codes", || source.promo_codes()).await?,
    })
}
