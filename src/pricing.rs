//! Pricing
//!
//! Resolves what a product costs at a given restaurant. Prices are returned exactly as
//! stored; any rounding is left to whatever displays them, so summing resolved prices
//! never compounds rounding error.

use rust_decimal::Decimal;

use crate::{
    catalog::CatalogSnapshot,
    products::{Product, ProductId},
    restaurants::RestaurantId,
};

/// The unit price of `product` at `restaurant`.
///
/// - Without a restaurant, the product's base price.
/// - With a restaurant, that location's override price if one exists (whatever its
///   availability flag says), otherwise the base price.
/// - A product missing from the catalog resolves to zero.
pub fn resolve_price(
    catalog: &CatalogSnapshot,
    product: ProductId,
    restaurant: Option<RestaurantId>,
) -> Decimal {
    let Some(base) = catalog.product(product) else {
        return Decimal::ZERO;
    };

    restaurant
        .and_then(|restaurant| catalog.override_for(product, restaurant))
        .map_or(base.price, |price_override| price_override.price)
}

/// Whether `product` can be ordered at `restaurant`.
///
/// This is a listing concern only; [`resolve_price`] ignores it.
pub fn is_available_at(
    catalog: &CatalogSnapshot,
    product: ProductId,
    restaurant: Option<RestaurantId>,
) -> bool {
    let Some(base) = catalog.product(product) else {
        return false;
    };

    let location_allows = restaurant
        .and_then(|restaurant| catalog.override_for(product, restaurant))
        .is_none_or(|price_override| price_override.is_available);

    base.is_available && location_allows
}

/// One orderable product with the price it costs at the selected restaurant.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry<'a> {
    /// The product
    pub product: &'a Product,

    /// Resolved unit price
    pub price: Decimal,
}

/// Products orderable at `restaurant`, in category order then product id.
pub fn menu(catalog: &CatalogSnapshot, restaurant: Option<RestaurantId>) -> Vec<MenuEntry<'_>> {
    let category_rank = |product: &Product| {
        catalog
            .categories()
            .iter()
            .position(|category| category.id == product.category_id)
            .unwrap_or(usize::MAX)
    };

    let mut entries: Vec<MenuEntry<'_>> = catalog
        .products()
        .iter()
        .filter(|product| is_available_at(catalog, product.id, restaurant))
        .map(|product| MenuEntry {
            product,
            price: resolve_price(catalog, product.id, restaurant),
        })
        .collect();

    entries.sort_by_key(|entry| (category_rank(entry.product), entry.product.id));

    entries
}

#[cfg(test)]
mod tests {
    use crate::{
        catalog::CatalogBatch,
        products::{Category, CategoryId},
        restaurants::RestaurantProductOverride,
    };

    use super::*;

    const PIZZA: ProductId = ProductId::new(1);
    const SALAD: ProductId = ProductId::new(2);
    const LEMONADE: ProductId = ProductId::new(3);
    const CENTRE: RestaurantId = RestaurantId::new(10);
    const HARBOUR: RestaurantId = RestaurantId::new(20);

    fn product(id: ProductId, price: i64, category: u64) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            price: Decimal::from(price),
            category_id: CategoryId::new(category),
            weight: None,
            rating: 0.0,
            review_count: 0,
            is_available: true,
        }
    }

    fn price_override(
        product: ProductId,
        restaurant: RestaurantId,
        price: i64,
        available: bool,
    ) -> RestaurantProductOverride {
        RestaurantProductOverride {
            product_id: product,
            restaurant_id: restaurant,
            price: Decimal::from(price),
            is_available: available,
        }
    }

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::from_batch(CatalogBatch {
            categories: vec![
                Category {
                    id: CategoryId::new(1),
                    name: "Drinks".to_string(),
                    sort_order: 2,
                    is_active: true,
                },
                Category {
                    id: CategoryId::new(2),
                    name: "Mains".to_string(),
                    sort_order: 1,
                    is_active: true,
                },
            ],
            products: vec![
                product(PIZZA, 500, 2),
                product(SALAD, 300, 2),
                product(LEMONADE, 150, 1),
            ],
            overrides: vec![
                price_override(PIZZA, CENTRE, 650, true),
                price_override(SALAD, CENTRE, 350, false),
            ],
            ..CatalogBatch::default()
        })
    }

    #[test]
    fn override_takes_precedence_at_its_restaurant() {
        let catalog = catalog();

        assert_eq!(resolve_price(&catalog, PIZZA, Some(CENTRE)), Decimal::from(650));
        assert_eq!(resolve_price(&catalog, PIZZA, None), Decimal::from(500));
    }

    #[test]
    fn other_restaurants_fall_back_to_base_price() {
        let catalog = catalog();

        assert_eq!(resolve_price(&catalog, PIZZA, Some(HARBOUR)), Decimal::from(500));
    }

    #[test]
    fn unavailable_override_still_sets_price() {
        let catalog = catalog();

        assert_eq!(resolve_price(&catalog, SALAD, Some(CENTRE)), Decimal::from(350));
        assert!(!is_available_at(&catalog, SALAD, Some(CENTRE)));
        assert!(is_available_at(&catalog, SALAD, Some(HARBOUR)));
    }

    #[test]
    fn unknown_product_resolves_to_zero() {
        let catalog = catalog();

        assert_eq!(
            resolve_price(&catalog, ProductId::new(999), Some(CENTRE)),
            Decimal::ZERO
        );
        assert!(!is_available_at(&catalog, ProductId::new(999), None));
    }

    #[test]
    fn prices_are_not_rounded() {
        let catalog = CatalogSnapshot::from_batch(CatalogBatch {
            products: vec![Product {
                price: Decimal::new(1995, 1),
                ..product(PIZZA, 0, 1)
            }],
            ..CatalogBatch::default()
        });

        assert_eq!(resolve_price(&catalog, PIZZA, None), Decimal::new(1995, 1));
    }

    #[test]
    fn menu_lists_available_products_in_category_order() {
        let catalog = catalog();

        let centre: Vec<(ProductId, Decimal)> = menu(&catalog, Some(CENTRE))
            .into_iter()
            .map(|entry| (entry.product.id, entry.price))
            .collect();

        assert_eq!(
            centre,
            [(PIZZA, Decimal::from(650)), (LEMONADE, Decimal::from(150))]
        );

        let anywhere: Vec<ProductId> = menu(&catalog, None)
            .into_iter()
            .map(|entry| entry.product.id)
            .collect();

        assert_eq!(anywhere, [PIZZA, SALAD, LEMONADE]);
    }
}
