//! Checkout

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{CartLedger, CartStore},
    receipt::Receipt,
};

/// Reasons an order cannot be placed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("the cart is empty")]
    EmptyCart,

    /// The selected restaurant does not accept orders this small.
    #[error("minimum order at this restaurant is {}", .minimum.normalize())]
    BelowMinimumOrder {
        /// Restaurant's minimum order amount
        minimum: Decimal,

        /// Subtotal of the cart
        subtotal: Decimal,
    },
}

/// Place the order: price the cart into a [`Receipt`] and empty it.
///
/// The restaurant minimum is checked against the subtotal before any promo discount.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: the cart has no line items.
/// - [`CheckoutError::BelowMinimumOrder`]: the subtotal is under the selected
///   restaurant's minimum order amount.
///
/// On error the cart is left untouched.
pub fn checkout<S: CartStore>(
    ledger: &mut CartLedger<S>,
    currency: &'static Currency,
) -> Result<Receipt, CheckoutError> {
    if ledger.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let subtotal = ledger.subtotal();

    if let Some(restaurant) = ledger.selected_restaurant()
        && !restaurant.accepts_subtotal(subtotal)
    {
        return Err(CheckoutError::BelowMinimumOrder {
            minimum: restaurant.min_order_amount,
            subtotal,
        });
    }

    let receipt = Receipt::from_ledger(ledger, currency);

    info!(
        items = receipt.item_count(),
        total = %receipt.total(),
        promo = receipt.promo_code(),
        "order placed"
    );

    ledger.clear_cart();

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rusty_money::iso::RUB;
    use testresult::TestResult;

    use crate::{
        cart::{Customization, MemoryStore},
        catalog::{CatalogBatch, CatalogSnapshot},
        products::{CategoryId, Product, ProductId},
        restaurants::{Restaurant, RestaurantId, RestaurantProductOverride},
    };

    use super::*;

    const PIZZA: ProductId = ProductId::new(1);
    const CENTRE: RestaurantId = RestaurantId::new(10);

    fn ledger() -> CartLedger {
        let catalog = CatalogSnapshot::from_batch(CatalogBatch {
            restaurants: vec![Restaurant {
                id: CENTRE,
                name: "Centre".to_string(),
                address: "1 Main St".to_string(),
                min_order_amount: Decimal::from(1000),
                free_delivery_threshold: None,
                working_hours: None,
                is_active: true,
            }],
            products: vec![Product {
                id: PIZZA,
                name: "Margherita".to_string(),
                price: Decimal::from(400),
                category_id: CategoryId::new(1),
                weight: None,
                rating: 0.0,
                review_count: 0,
                is_available: true,
            }],
            overrides: vec![RestaurantProductOverride {
                product_id: PIZZA,
                restaurant_id: CENTRE,
                price: Decimal::from(500),
                is_available: true,
            }],
            ..CatalogBatch::default()
        });

        CartLedger::new(MemoryStore::new(), Arc::new(catalog))
    }

    fn add_pizzas(ledger: &mut CartLedger, quantity: u32) -> TestResult {
        let pizza = ledger
            .catalog()
            .product(PIZZA)
            .cloned()
            .ok_or("missing pizza")?;

        ledger.add_item(&pizza, quantity, Customization::default())?;

        Ok(())
    }

    #[test]
    fn empty_cart_cannot_be_checked_out() {
        let mut ledger = ledger();

        assert_eq!(
            checkout(&mut ledger, RUB).map(|r| r.total()),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn restaurant_minimum_is_enforced() -> TestResult {
        let mut ledger = ledger();

        add_pizzas(&mut ledger, 1)?;
        ledger.select_restaurant(Some(CENTRE));

        assert_eq!(
            checkout(&mut ledger, RUB).map(|r| r.total()),
            Err(CheckoutError::BelowMinimumOrder {
                minimum: Decimal::from(1000),
                subtotal: Decimal::from(500),
            })
        );
        assert_eq!(ledger.total_item_count(), 1);

        Ok(())
    }

    #[test]
    fn no_minimum_without_a_restaurant() -> TestResult {
        let mut ledger = ledger();

        add_pizzas(&mut ledger, 1)?;

        let receipt = checkout(&mut ledger, RUB)?;

        assert_eq!(receipt.total(), Decimal::from(400));

        Ok(())
    }

    #[test]
    fn checkout_issues_receipt_and_clears_cart() -> TestResult {
        let mut ledger = ledger();

        add_pizzas(&mut ledger, 2)?;
        ledger.select_restaurant(Some(CENTRE));

        let receipt = checkout(&mut ledger, RUB)?;

        assert_eq!(receipt.subtotal(), Decimal::from(1000));
        assert_eq!(receipt.item_count(), 2);
        assert!(ledger.is_empty());
        assert_eq!(ledger.active_promo_code(), None);

        Ok(())
    }
}
