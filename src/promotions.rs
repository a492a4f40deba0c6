//! Promotions
//!
//! Promo codes are defined externally and read from the catalog. A cart carries at
//! most one of them at a time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discounts::Discount;

/// How a promo code's `discount` value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoKind {
    /// `discount` is percent points off the subtotal
    Percent,

    /// `discount` is an amount off the subtotal
    Fixed,
}

/// A promo code definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    /// The code customers type; matched case-insensitively
    pub code: String,

    /// Percent points or amount, depending on `kind`
    pub discount: Decimal,

    /// Percent or fixed
    #[serde(rename = "type")]
    pub kind: PromoKind,

    /// Smallest subtotal the code can be applied to
    #[serde(default)]
    pub min_order_amount: Decimal,

    /// Deactivated codes are never matched
    #[serde(default = "active")]
    pub is_active: bool,
}

impl PromoCode {
    /// The discount this code grants.
    pub fn discount(&self) -> Discount {
        match self.kind {
            PromoKind::Percent => Discount::percent_points(self.discount),
            PromoKind::Fixed => Discount::Fixed(self.discount),
        }
    }

    /// The code in its normalised, uppercase form.
    pub fn normalized_code(&self) -> String {
        normalize_code(&self.code)
    }

    /// Check that the code can be applied to a cart with the given subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`PromoError::BelowMinimum`] if `subtotal` is under the code's minimum.
    pub fn check_minimum(&self, subtotal: Decimal) -> Result<(), PromoError> {
        if subtotal < self.min_order_amount {
            return Err(PromoError::BelowMinimum {
                minimum: self.min_order_amount,
                subtotal,
            });
        }

        Ok(())
    }

    /// Human readable description of the discount, e.g. "10% off".
    pub fn describe(&self) -> String {
        match self.kind {
            PromoKind::Percent => format!("{}% off", self.discount.normalize()),
            PromoKind::Fixed => format!("{} off", self.discount.normalize()),
        }
    }
}

/// Trim and uppercase a user-entered code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Reasons a promo code could not be applied.
///
/// These are expected outcomes of user input, and their `Display` output is the
/// message shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoError {
    /// Nothing was entered.
    #[error("enter a promo code")]
    Empty,

    /// The code does not match any active promo code.
    #[error("promo code {0} not found or expired")]
    NotFound(String),

    /// The cart subtotal is below the code's minimum order amount.
    #[error("this promo code requires a minimum order of {}", .minimum.normalize())]
    BelowMinimum {
        /// Minimum order amount required by the code
        minimum: Decimal,

        /// Subtotal at the time of the attempt
        subtotal: Decimal,
    },

    /// The code would take nothing off the cart, as when the cart is empty.
    #[error("add items to the cart before applying a promo code")]
    NothingToDiscount,
}

/// A promo code that was successfully applied to a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPromo {
    /// Normalised code now active on the cart
    pub code: String,

    /// Discount granted by the code
    pub discount: Discount,

    /// Confirmation message for the customer
    pub message: String,
}

const fn active() -> bool {
    true
}
