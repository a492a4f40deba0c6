//! Tavola prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        ActivePromo, CartError, CartLedger, CartLineItem, CartState, CartStore, Customization,
        FileStore, MemoryStore, StorageError,
    },
    catalog::{
        Catalog, CatalogBatch, CatalogError, CatalogSnapshot, CatalogSource, CatalogSourceError,
        CatalogState, YamlCatalogSource,
    },
    checkout::{CheckoutError, checkout},
    discounts::Discount,
    ids::TypedId,
    pricing::{MenuEntry, is_available_at, menu, resolve_price},
    products::{Category, CategoryId, Component, ComponentId, ComponentKind, Product, ProductId},
    promotions::{AppliedPromo, PromoCode, PromoError, PromoKind},
    receipt::{Receipt, ReceiptError, ReceiptLine},
    restaurants::{Restaurant, RestaurantId, RestaurantProductOverride},
    retry::{RetryError, RetryPolicy, retry},
};
