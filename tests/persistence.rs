//! Cart state survives a fresh session through the file store.

use std::{fs, sync::Arc};

use rust_decimal::Decimal;
use testresult::TestResult;

use tavola::prelude::*;

fn catalog() -> Arc<CatalogSnapshot> {
    let product = |id: u64, price: i64| Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        price: Decimal::from(price),
        category_id: CategoryId::new(1),
        weight: None,
        rating: 0.0,
        review_count: 0,
        is_available: true,
    };

    Arc::new(CatalogSnapshot::from_batch(CatalogBatch {
        products: vec![product(1, 400), product(2, 250)],
        promo_codes: vec![PromoCode {
            code: "MINUS500".to_string(),
            discount: Decimal::from(500),
            kind: PromoKind::Fixed,
            min_order_amount: Decimal::ZERO,
            is_active: true,
        }],
        ..CatalogBatch::default()
    }))
}

#[test]
fn session_round_trip() -> TestResult {
    let dir = tempfile::tempdir()?;
    let catalog = catalog();

    let expected = {
        let mut ledger = CartLedger::new(FileStore::new(dir.path()), Arc::clone(&catalog));
        let pizza = catalog.product(ProductId::new(1)).ok_or("missing pizza")?;
        let salad = catalog.product(ProductId::new(2)).ok_or("missing salad")?;

        ledger.add_item(
            pizza,
            2,
            Customization::default()
                .with_sauce("Garlic")
                .with_sides(["Fries", "Coleslaw"]),
        )?;
        ledger.add_item(salad, 1, Customization::default())?;
        ledger.apply_promo_code("minus500")?;

        ledger.state().clone()
    };

    let restored = CartLedger::load(FileStore::new(dir.path()), catalog);

    assert_eq!(restored.state(), &expected);
    assert_eq!(restored.total(), Decimal::from(550));

    Ok(())
}

#[test]
fn corrupt_promo_code_keeps_line_items() -> TestResult {
    let dir = tempfile::tempdir()?;

    fs::write(dir.path().join("cart"), r#"[{"productId":1,"quantity":2}]"#)?;
    fs::write(dir.path().join("promoCode"), "MINUS500")?;
    fs::write(dir.path().join("promoDiscount"), "0.47619")?;

    let restored = CartLedger::load(FileStore::new(dir.path()), catalog());

    assert_eq!(restored.total_item_count(), 2);
    assert_eq!(restored.active_promo_code(), None);

    Ok(())
}

#[test]
fn corrupt_line_items_leave_nothing_to_discount() -> TestResult {
    let dir = tempfile::tempdir()?;

    fs::write(dir.path().join("cart"), "not json")?;
    fs::write(dir.path().join("promoCode"), "\"MINUS500\"")?;
    fs::write(dir.path().join("promoDiscount"), "0.47619")?;

    let restored = CartLedger::load(FileStore::new(dir.path()), catalog());

    assert!(restored.is_empty());
    assert_eq!(restored.active_promo_code(), None);

    Ok(())
}

#[test]
fn clear_removes_files() -> TestResult {
    let dir = tempfile::tempdir()?;
    let catalog = catalog();
    let mut ledger = CartLedger::new(FileStore::new(dir.path()), Arc::clone(&catalog));
    let pizza = catalog.product(ProductId::new(1)).ok_or("missing pizza")?;

    ledger.add_item(pizza, 1, Customization::default())?;

    assert!(dir.path().join("cart").exists());

    ledger.clear_cart();

    assert!(!dir.path().join("cart").exists());
    assert!(!dir.path().join("promoCode").exists());
    assert!(!dir.path().join("promoDiscount").exists());

    Ok(())
}
