//! Cart line items and state

use serde::{Deserialize, Serialize};

use crate::{discounts::Discount, products::ProductId};

/// One row in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product being ordered
    pub product_id: ProductId,

    /// Number of units, always at least 1
    pub quantity: u32,

    /// Chosen sauce, by component name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_sauce: Option<String>,

    /// Chosen sides, by component name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_sides: Option<Vec<String>>,
}

impl CartLineItem {
    /// Create a line item with the given customisation.
    pub fn new(product_id: ProductId, quantity: u32, customization: Customization) -> Self {
        Self {
            product_id,
            quantity,
            selected_sauce: customization.sauce,
            selected_sides: customization.sides,
        }
    }

    /// Overwrite whichever selections `customization` provides, keeping the rest.
    pub fn customize(&mut self, customization: Customization) {
        if let Some(sauce) = customization.sauce {
            self.selected_sauce = Some(sauce);
        }

        if let Some(sides) = customization.sides {
            self.selected_sides = Some(sides);
        }
    }
}

/// Sauce and side choices supplied when adding a product.
///
/// `None` means "no choice given", which leaves an existing selection untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customization {
    /// Sauce name
    pub sauce: Option<String>,

    /// Side names
    pub sides: Option<Vec<String>>,
}

impl Customization {
    /// Choose a sauce.
    #[must_use]
    pub fn with_sauce(mut self, sauce: impl Into<String>) -> Self {
        self.sauce = Some(sauce.into());
        self
    }

    /// Choose sides.
    #[must_use]
    pub fn with_sides<I, T>(mut self, sides: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.sides = Some(sides.into_iter().map(Into::into).collect());
        self
    }
}

/// The promo code currently active on a cart, with the discount it grants.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePromo {
    /// Normalised code
    pub code: String,

    /// Discount granted
    pub discount: Discount,
}

/// Everything a cart remembers between sessions.
///
/// Keeping the code and its discount in one optional value means a cart can never
/// hold a code without a discount or a discount without a code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    /// Line items in insertion order
    pub line_items: Vec<CartLineItem>,

    /// At most one active promo code
    pub active_promo: Option<ActivePromo>,
}

impl CartState {
    /// Whether the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// The line item for `product`, if any.
    pub fn line_item(&self, product: ProductId) -> Option<&CartLineItem> {
        self.line_items
            .iter()
            .find(|item| item.product_id == product)
    }

    pub(crate) fn line_item_mut(&mut self, product: ProductId) -> Option<&mut CartLineItem> {
        self.line_items
            .iter_mut()
            .find(|item| item.product_id == product)
    }
}
