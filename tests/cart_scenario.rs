//! End-to-end cart scenario against the bundled catalog fixture.
//!
//! Margherita (400) x 2 and Caesar (250) x 1 at base prices:
//!
//! - Subtotal: 1050
//! - WELCOME10 (10% off, minimum 500): total 945
//! - Promo removed: total back to 1050
//! - Cart cleared: nothing left in the cart or in storage

use std::sync::Arc;

use rust_decimal::Decimal;
use testresult::TestResult;

use tavola::prelude::*;

const MARGHERITA: ProductId = ProductId::new(1);
const CAESAR: ProductId = ProductId::new(4);
const CENTRE: RestaurantId = RestaurantId::new(1);

async fn fixture_catalog() -> TestResult<Arc<CatalogSnapshot>> {
    let source = YamlCatalogSource::new(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/catalog.yml"));
    let catalog = Catalog::new(RetryPolicy::no_retry());

    Ok(catalog.refresh(&source).await?)
}

fn add(ledger: &mut CartLedger<impl CartStore>, id: ProductId, quantity: u32) -> TestResult {
    let product = ledger
        .catalog()
        .product(id)
        .cloned()
        .ok_or("product missing from fixture")?;

    ledger.add_item(&product, quantity, Customization::default())?;

    Ok(())
}

#[tokio::test]
async fn apply_remove_and_clear() -> TestResult {
    let mut ledger = CartLedger::new(MemoryStore::new(), fixture_catalog().await?);

    add(&mut ledger, MARGHERITA, 2)?;
    add(&mut ledger, CAESAR, 1)?;

    assert_eq!(ledger.subtotal(), Decimal::from(1050));

    let applied = ledger.apply_promo_code("welcome10")?;

    assert_eq!(applied.code, "WELCOME10");
    assert_eq!(ledger.total(), Decimal::from(945));

    ledger.remove_promo_code();

    assert_eq!(ledger.total(), Decimal::from(1050));

    ledger.clear_cart();

    assert!(ledger.line_items().is_empty());
    assert_eq!(ledger.active_promo_code(), None);
    assert_eq!(ledger.promo_discount_fraction(), Decimal::ZERO);
    assert_eq!(ledger.store(), &MemoryStore::new());

    Ok(())
}

#[tokio::test]
async fn restaurant_switch_reprices_cart() -> TestResult {
    let mut ledger = CartLedger::new(MemoryStore::new(), fixture_catalog().await?);

    add(&mut ledger, MARGHERITA, 2)?;

    ledger.select_restaurant(Some(CENTRE));
    assert_eq!(ledger.subtotal(), Decimal::from(900));

    ledger.select_restaurant(None);
    assert_eq!(ledger.subtotal(), Decimal::from(800));

    Ok(())
}

#[tokio::test]
async fn fixture_hides_inactive_rows() -> TestResult {
    let catalog = fixture_catalog().await?;

    assert!(catalog.product(ProductId::new(7)).is_none());
    assert!(catalog.restaurant(RestaurantId::new(3)).is_none());
    assert!(catalog.active_promo("summer20").is_none());
    assert_eq!(catalog.categories().len(), 3);
    assert_eq!(catalog.sauces().count(), 2);
    assert_eq!(catalog.sides().count(), 2);

    Ok(())
}

#[tokio::test]
async fn checkout_at_restaurant() -> TestResult {
    let mut ledger = CartLedger::new(MemoryStore::new(), fixture_catalog().await?);

    ledger.select_restaurant(Some(CENTRE));
    add(&mut ledger, CAESAR, 1)?;

    assert!(matches!(
        checkout(&mut ledger, rusty_money::iso::RUB),
        Err(CheckoutError::BelowMinimumOrder { .. })
    ));

    add(&mut ledger, MARGHERITA, 2)?;
    ledger.apply_promo_code("welcome10")?;

    let receipt = checkout(&mut ledger, rusty_money::iso::RUB)?;

    assert_eq!(receipt.subtotal(), Decimal::from(1150));
    assert_eq!(receipt.total(), Decimal::from(1035));
    assert_eq!(receipt.promo_code(), Some("WELCOME10"));
    assert!(ledger.is_empty());

    Ok(())
}
