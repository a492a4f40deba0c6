//! Restaurants

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ids::TypedId, products::ProductId};

/// Restaurant Id
pub type RestaurantId = TypedId<Restaurant>;

/// A restaurant location the customer can order from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Restaurant id
    pub id: RestaurantId,

    /// Display name
    pub name: String,

    /// Street address
    #[serde(default)]
    pub address: String,

    /// Smallest subtotal this location accepts an order for
    #[serde(default)]
    pub min_order_amount: Decimal,

    /// Subtotal from which delivery is free
    #[serde(default)]
    pub free_delivery_threshold: Option<Decimal>,

    /// Free-form opening hours, e.g. "10:00-23:00"
    #[serde(default)]
    pub working_hours: Option<String>,

    /// Inactive restaurants are hidden
    #[serde(default = "active")]
    pub is_active: bool,
}

impl Restaurant {
    /// Whether `subtotal` reaches this location's minimum order amount.
    pub fn accepts_subtotal(&self, subtotal: Decimal) -> bool {
        subtotal >= self.min_order_amount
    }

    /// Whether `subtotal` qualifies for free delivery.
    ///
    /// Locations without a threshold never deliver for free.
    pub fn delivers_free(&self, subtotal: Decimal) -> bool {
        self.free_delivery_threshold
            .is_some_and(|threshold| subtotal >= threshold)
    }
}

/// A restaurant-specific price and availability for one product.
///
/// Overrides are sparse: a missing override means the base product price applies
/// and the product is available at that location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantProductOverride {
    /// Product the override applies to
    pub product_id: ProductId,

    /// Location the override applies at
    pub restaurant_id: RestaurantId,

    /// Price charged at this location
    pub price: Decimal,

    /// Whether the location currently offers the product
    #[serde(default = "active")]
    pub is_available: bool,
}

const fn active() -> bool {
    true
}
