//! Catalog Snapshot

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    products::{Category, Component, ComponentKind, Product, ProductId},
    promotions::{PromoCode, normalize_code},
    restaurants::{Restaurant, RestaurantId, RestaurantProductOverride},
};

/// One full set of catalog collections, as fetched from a [`CatalogSource`](super::CatalogSource).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogBatch {
    /// Menu categories
    pub categories: Vec<Category>,

    /// Restaurant locations
    pub restaurants: Vec<Restaurant>,

    /// Menu products
    pub products: Vec<Product>,

    /// Per-restaurant price overrides
    pub overrides: Vec<RestaurantProductOverride>,

    /// Sauces and sides
    pub components: Vec<Component>,

    /// Promo code definitions
    pub promo_codes: Vec<PromoCode>,
}

/// Read-only view of the catalog for one session.
///
/// Collections are only ever replaced wholesale; each replacement rebuilds the index
/// for that collection. Inactive or unavailable rows are dropped on the way in.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    categories: Vec<Category>,
    restaurants: Vec<Restaurant>,
    products: Vec<Product>,
    overrides: Vec<RestaurantProductOverride>,
    components: Vec<Component>,
    promo_codes: Vec<PromoCode>,

    product_index: FxHashMap<ProductId, usize>,
    restaurant_index: FxHashMap<RestaurantId, usize>,
    override_index: FxHashMap<(ProductId, RestaurantId), usize>,
    promo_index: FxHashMap<String, usize>,
}

impl CatalogSnapshot {
    /// An empty snapshot, as seen before the first successful fetch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from a fetched batch.
    #[must_use]
    pub fn from_batch(batch: CatalogBatch) -> Self {
        let mut snapshot = Self::new();

        snapshot.replace_categories(batch.categories);
        snapshot.replace_restaurants(batch.restaurants);
        snapshot.replace_products(batch.products);
        snapshot.replace_overrides(batch.overrides);
        snapshot.replace_components(batch.components);
        snapshot.replace_promo_codes(batch.promo_codes);

        snapshot
    }

    /// Whether nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.restaurants.is_empty()
            && self.products.is_empty()
            && self.overrides.is_empty()
            && self.components.is_empty()
            && self.promo_codes.is_empty()
    }

    /// Active categories, in menu order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Active restaurants.
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// Available products.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All restaurant price overrides.
    pub fn overrides(&self) -> &[RestaurantProductOverride] {
        &self.overrides
    }

    /// Active sauces and sides.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Active sauces.
    pub fn sauces(&self) -> impl Iterator<Item = &Component> {
        self.components_of(ComponentKind::Sauce)
    }

    /// Active sides.
    pub fn sides(&self) -> impl Iterator<Item = &Component> {
        self.components_of(ComponentKind::Side)
    }

    /// Active promo codes.
    pub fn promo_codes(&self) -> &[PromoCode] {
        &self.promo_codes
    }

    /// Look up a product by id.
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.product_index
            .get(&id)
            .and_then(|&idx| self.products.get(idx))
    }

    /// Look up a restaurant by id.
    pub fn restaurant(&self, id: RestaurantId) -> Option<&Restaurant> {
        self.restaurant_index
            .get(&id)
            .and_then(|&idx| self.restaurants.get(idx))
    }

    /// Look up the override for an exact (product, restaurant) pair.
    pub fn override_for(
        &self,
        product: ProductId,
        restaurant: RestaurantId,
    ) -> Option<&RestaurantProductOverride> {
        self.override_index
            .get(&(product, restaurant))
            .and_then(|&idx| self.overrides.get(idx))
    }

    /// Look up an active promo code, ignoring case and surrounding whitespace.
    pub fn active_promo(&self, code: &str) -> Option<&PromoCode> {
        self.promo_index
            .get(&normalize_code(code))
            .and_then(|&idx| self.promo_codes.get(idx))
    }

    /// Replace all categories.
    pub fn replace_categories(&mut self, categories: Vec<Category>) {
        let mut categories: Vec<Category> = categories
            .into_iter()
            .filter(|category| category.is_active)
            .collect();

        categories.sort_by_key(|category| (category.sort_order, category.id));

        self.categories = categories;
    }

    /// Replace all restaurants.
    pub fn replace_restaurants(&mut self, restaurants: Vec<Restaurant>) {
        self.restaurants = restaurants
            .into_iter()
            .filter(|restaurant| restaurant.is_active)
            .collect();

        self.restaurant_index = index_by(&self.restaurants, |restaurant| restaurant.id);
    }

    /// Replace all products.
    pub fn replace_products(&mut self, products: Vec<Product>) {
        self.products = products
            .into_iter()
            .filter(|product| product.is_available)
            .collect();

        self.product_index = index_by(&self.products, |product| product.id);
    }

    /// Replace all restaurant price overrides.
    pub fn replace_overrides(&mut self, overrides: Vec<RestaurantProductOverride>) {
        self.overrides = overrides;
        self.override_index = index_by(&self.overrides, |o| (o.product_id, o.restaurant_id));
    }

    /// Replace all sauces and sides.
    pub fn replace_components(&mut self, components: Vec<Component>) {
        self.components = components
            .into_iter()
            .filter(|component| component.is_active)
            .collect();
    }

    /// Replace all promo codes. Inactive codes and codes granting nothing are dropped.
    pub fn replace_promo_codes(&mut self, promo_codes: Vec<PromoCode>) {
        self.promo_codes = promo_codes
            .into_iter()
            .filter(|promo| promo.is_active && promo.discount > Decimal::ZERO)
            .collect();

        self.promo_index = index_by(&self.promo_codes, PromoCode::normalized_code);
    }

    fn components_of(&self, kind: ComponentKind) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(move |component| component.kind == kind)
    }
}

/// Index rows by key. The first row wins when keys repeat.
fn index_by<T, K, F>(rows: &[T], key: F) -> FxHashMap<K, usize>
where
    K: std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut index = FxHashMap::default();

    for (idx, row) in rows.iter().enumerate() {
        index.entry(key(row)).or_insert(idx);
    }

    index
}
