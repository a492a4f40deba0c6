//! Cart
//!
//! The [`CartLedger`] owns a session's cart: its line items, the single active promo
//! code, and the store the cart is persisted to. Prices are resolved against the
//! catalog snapshot and the selected restaurant every time a figure is computed, so a
//! restaurant switch or catalog refresh is reflected immediately.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    catalog::CatalogSnapshot,
    pricing::resolve_price,
    products::{Product, ProductId},
    promotions::{AppliedPromo, PromoError, normalize_code},
    restaurants::{Restaurant, RestaurantId},
};

mod items;
pub mod storage;

pub use items::{ActivePromo, CartLineItem, CartState, Customization};
pub use storage::{CartStore, FileStore, MemoryStore, StorageError};

/// Errors raised by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Items can only be added in positive quantities.
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

/// A session's cart, priced against a catalog snapshot.
#[derive(Debug)]
pub struct CartLedger<S: CartStore = MemoryStore> {
    state: CartState,
    catalog: Arc<CatalogSnapshot>,
    restaurant: Option<RestaurantId>,
    store: S,
}

impl<S: CartStore> CartLedger<S> {
    /// Create an empty cart without reading anything from `store`.
    pub fn new(store: S, catalog: Arc<CatalogSnapshot>) -> Self {
        Self {
            state: CartState::default(),
            catalog,
            restaurant: None,
            store,
        }
    }

    /// Restore the cart persisted in `store`.
    ///
    /// Missing or corrupt values fall back to an empty cart. A stored promo code is
    /// matched against the catalog to recover its discount; a code that is no longer
    /// active, or that takes nothing off the restored subtotal, is dropped.
    pub fn load(store: S, catalog: Arc<CatalogSnapshot>) -> Self {
        let persisted = storage::load(&store);

        let active_promo = persisted.promo_code.and_then(|code| {
            let Some(promo) = catalog.active_promo(&code) else {
                warn!(%code, "dropping persisted promo code that is no longer active");

                return None;
            };

            Some(ActivePromo {
                code: promo.normalized_code(),
                discount: promo.discount(),
            })
        });

        let mut ledger = Self {
            state: CartState {
                line_items: persisted.line_items,
                active_promo,
            },
            catalog,
            restaurant: None,
            store,
        };

        ledger.drop_ineffective_promo();

        debug!(
            line_items = ledger.state.line_items.len(),
            promo = ledger.active_promo_code(),
            "restored cart"
        );

        ledger
    }

    /// The whole cart state.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Line items in insertion order.
    pub fn line_items(&self) -> &[CartLineItem] {
        &self.state.line_items
    }

    /// Whether the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// The active promo code, if any.
    pub fn active_promo_code(&self) -> Option<&str> {
        self.state
            .active_promo
            .as_ref()
            .map(|promo| promo.code.as_str())
    }

    /// The active discount as a fraction of the current subtotal, zero without a promo.
    pub fn promo_discount_fraction(&self) -> Decimal {
        self.state
            .active_promo
            .as_ref()
            .map_or(Decimal::ZERO, |promo| {
                promo.discount.fraction_of(self.subtotal())
            })
    }

    /// The catalog snapshot prices are resolved against.
    pub fn catalog(&self) -> &CatalogSnapshot {
        &self.catalog
    }

    /// Price against a freshly fetched catalog.
    pub fn replace_catalog(&mut self, catalog: Arc<CatalogSnapshot>) {
        self.catalog = catalog;
    }

    /// The selected restaurant, if any.
    pub fn restaurant(&self) -> Option<RestaurantId> {
        self.restaurant
    }

    /// The selected restaurant's catalog record, if any.
    pub fn selected_restaurant(&self) -> Option<&Restaurant> {
        self.restaurant.and_then(|id| self.catalog.restaurant(id))
    }

    /// Select the restaurant whose prices apply.
    ///
    /// The cart is left as is; emptying it on a switch is the caller's call.
    pub fn select_restaurant(&mut self, restaurant: Option<RestaurantId>) {
        self.restaurant = restaurant;
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add `quantity` units of `product`.
    ///
    /// Adding a product already in the cart increases its quantity and overwrites any
    /// customisation given here.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity; the cart is unchanged.
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: u32,
        customization: Customization,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        match self.state.line_item_mut(product.id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(quantity);
                item.customize(customization);
            }
            None => {
                self.state
                    .line_items
                    .push(CartLineItem::new(product.id, quantity, customization));
            }
        }

        debug!(product = %product.id, quantity, "added to cart");

        self.persist();

        Ok(())
    }

    /// Remove the line for `product`. Does nothing if it is not in the cart.
    pub fn remove_item(&mut self, product: ProductId) {
        let before = self.state.line_items.len();

        self.state
            .line_items
            .retain(|item| item.product_id != product);

        if self.state.line_items.len() != before {
            debug!(product = %product, "removed from cart");

            self.persist();
        }
    }

    /// Set the quantity for `product`, removing the line when `quantity <= 0`.
    pub fn update_quantity(&mut self, product: ProductId, quantity: i64) {
        let Ok(quantity) = u32::try_from(quantity) else {
            if quantity <= 0 {
                self.remove_item(product);
            } else {
                self.set_quantity(product, u32::MAX);
            }

            return;
        };

        if quantity == 0 {
            self.remove_item(product);
        } else {
            self.set_quantity(product, quantity);
        }
    }

    /// Empty the cart, drop the promo code and erase everything persisted.
    pub fn clear_cart(&mut self) {
        self.state = CartState::default();

        if let Err(error) = storage::erase(&mut self.store) {
            warn!(%error, "failed to erase persisted cart");
        }

        debug!("cart cleared");
    }

    /// Sum of resolved unit price times quantity over every line, saturating at
    /// [`Decimal::MAX`].
    pub fn subtotal(&self) -> Decimal {
        self.state
            .line_items
            .iter()
            .map(|item| self.line_total(item))
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Resolved unit price of `item` times its quantity.
    pub fn line_total(&self, item: &CartLineItem) -> Decimal {
        self.unit_price(item.product_id)
            .saturating_mul(Decimal::from(item.quantity))
    }

    /// Resolved unit price of `product` at the selected restaurant.
    pub fn unit_price(&self, product: ProductId) -> Decimal {
        resolve_price(&self.catalog, product, self.restaurant)
    }

    /// Apply a promo code, replacing any code already active.
    ///
    /// # Errors
    ///
    /// - [`PromoError::Empty`]: nothing but whitespace was entered.
    /// - [`PromoError::NotFound`]: no active code matches.
    /// - [`PromoError::BelowMinimum`]: the subtotal is under the code's minimum order.
    /// - [`PromoError::NothingToDiscount`]: the code would take nothing off the
    ///   current subtotal, as on an empty cart.
    ///
    /// On error the previously active code, if any, stays active.
    pub fn apply_promo_code(&mut self, code: &str) -> Result<AppliedPromo, PromoError> {
        let code = normalize_code(code);

        if code.is_empty() {
            return Err(PromoError::Empty);
        }

        let Some(promo) = self.catalog.active_promo(&code) else {
            return Err(PromoError::NotFound(code));
        };

        let subtotal = self.subtotal();

        promo.check_minimum(subtotal)?;

        let discount = promo.discount();

        if discount.fraction_of(subtotal).is_zero() {
            return Err(PromoError::NothingToDiscount);
        }

        let message = format!("promo code {code} applied: {}", promo.describe());

        self.state.active_promo = Some(ActivePromo {
            code: code.clone(),
            discount,
        });

        info!(%code, "promo code applied");

        self.persist();

        Ok(AppliedPromo {
            code,
            discount,
            message,
        })
    }

    /// Drop the active promo code. Line items are untouched.
    pub fn remove_promo_code(&mut self) {
        if self.state.active_promo.take().is_some() {
            self.persist();
        }
    }

    /// What the active promo takes off the current subtotal.
    pub fn discount_amount(&self) -> Decimal {
        self.state
            .active_promo
            .as_ref()
            .map_or(Decimal::ZERO, |promo| {
                promo.discount.amount_off(self.subtotal())
            })
    }

    /// Subtotal after the active promo, never negative.
    pub fn total(&self) -> Decimal {
        let subtotal = self.subtotal();

        self.state
            .active_promo
            .as_ref()
            .map_or(subtotal, |promo| promo.discount.apply(subtotal))
    }

    /// Total units across all lines.
    pub fn total_item_count(&self) -> u64 {
        self.state
            .line_items
            .iter()
            .map(|item| u64::from(item.quantity))
            .fold(0, u64::saturating_add)
    }

    fn set_quantity(&mut self, product: ProductId, quantity: u32) {
        if let Some(item) = self.state.line_item_mut(product) {
            item.quantity = quantity;

            self.persist();
        }
    }

    /// A code that no longer takes anything off, such as after the last item is
    /// removed, is not kept active.
    fn drop_ineffective_promo(&mut self) {
        if self.promo_discount_fraction().is_zero()
            && let Some(promo) = self.state.active_promo.take()
        {
            debug!(code = %promo.code, "dropping promo code with nothing to discount");
        }
    }

    /// Best-effort write of the current state; in-memory state stays authoritative.
    fn persist(&mut self) {
        self.drop_ineffective_promo();

        let fraction = self.promo_discount_fraction();

        if let Err(error) = storage::save(&mut self.store, &self.state, fraction) {
            warn!(%error, "failed to persist cart");
        }
    }
}
