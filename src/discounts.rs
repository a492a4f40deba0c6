//! Discounts
//!
//! A promo code resolves to exactly one [`Discount`]. Totals are always computed by
//! matching on the variant, so a fixed discount subtracts its literal amount from the
//! current subtotal instead of reusing a fraction captured when the code was applied.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

/// The reduction a promo code grants on the cart subtotal.
#[derive(Debug, Clone, Copy)]
pub enum Discount {
    /// Take this fraction off the subtotal (e.g. `0.1` for "10% off").
    Percent(Percentage),

    /// Take this literal amount off the subtotal, never going below zero.
    Fixed(Decimal),
}

impl Discount {
    /// Build a percentage discount from percent points, e.g. `10` for "10% off".
    pub fn percent_points(points: Decimal) -> Self {
        Discount::Percent(Percentage::from(points / Decimal::ONE_HUNDRED))
    }

    /// The total payable once this discount is applied to `subtotal`.
    pub fn apply(&self, subtotal: Decimal) -> Decimal {
        match self {
            Discount::Percent(percent) => {
                let keep = (Decimal::ONE - fraction(percent)).max(Decimal::ZERO);

                subtotal.saturating_mul(keep)
            }
            Discount::Fixed(amount) => subtotal.saturating_sub(*amount).max(Decimal::ZERO),
        }
    }

    /// How much this discount takes off `subtotal`.
    pub fn amount_off(&self, subtotal: Decimal) -> Decimal {
        subtotal.saturating_sub(self.apply(subtotal))
    }

    /// The discount expressed as a fraction of `subtotal`, in `[0, 1]`.
    ///
    /// An empty subtotal has nothing to discount, so every discount reports zero there.
    pub fn fraction_of(&self, subtotal: Decimal) -> Decimal {
        if subtotal <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        match self {
            Discount::Percent(percent) => fraction(percent).clamp(Decimal::ZERO, Decimal::ONE),
            // A quotient too large to represent is well past the whole subtotal
            Discount::Fixed(amount) => (*amount)
                .max(Decimal::ZERO)
                .checked_div(subtotal)
                .map_or(Decimal::ONE, |f| f.clamp(Decimal::ZERO, Decimal::ONE)),
        }
    }
}

impl PartialEq for Discount {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Discount::Percent(a), Discount::Percent(b)) => fraction(a) == fraction(b),
            (Discount::Fixed(a), Discount::Fixed(b)) => a == b,
            _ => false,
        }
    }
}

/// The underlying fraction of a percentage, e.g. `0.25` for 25%.
pub fn fraction(percent: &Percentage) -> Decimal {
    // decimal_percentage does not expose its inner Decimal
    (*percent) * Decimal::ONE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_takes_fraction_off_subtotal() {
        let discount = Discount::percent_points(Decimal::from(10));

        assert_eq!(discount.apply(Decimal::from(1050)), Decimal::from(945));
        assert_eq!(discount.amount_off(Decimal::from(1050)), Decimal::from(105));
    }

    #[test]
    fn fixed_subtracts_literal_amount() {
        let discount = Discount::Fixed(Decimal::from(200));

        assert_eq!(discount.apply(Decimal::from(1050)), Decimal::from(850));
        assert_eq!(discount.apply(Decimal::from(2000)), Decimal::from(1800));
    }

    #[test]
    fn fixed_never_goes_negative() {
        let discount = Discount::Fixed(Decimal::from(500));

        assert_eq!(discount.apply(Decimal::from(300)), Decimal::ZERO);
        assert_eq!(discount.amount_off(Decimal::from(300)), Decimal::from(300));
    }

    #[test]
    fn percent_above_one_hundred_floors_at_zero() {
        let discount = Discount::percent_points(Decimal::from(150));

        assert_eq!(discount.apply(Decimal::from(400)), Decimal::ZERO);
    }

    #[test]
    fn fraction_of_fixed_tracks_current_subtotal() {
        let discount = Discount::Fixed(Decimal::from(100));

        assert_eq!(discount.fraction_of(Decimal::from(1000)), Decimal::new(1, 1));
        assert_eq!(discount.fraction_of(Decimal::from(50)), Decimal::ONE);
        assert_eq!(discount.fraction_of(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn fraction_of_empty_subtotal_is_zero_for_percent() {
        let discount = Discount::percent_points(Decimal::from(10));

        assert_eq!(discount.fraction_of(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(discount.fraction_of(Decimal::from(10)), Decimal::new(1, 1));
    }

    #[test]
    fn fraction_of_huge_fixed_amount_saturates_at_one() {
        let discount = Discount::Fixed(Decimal::MAX);

        assert_eq!(discount.fraction_of(Decimal::new(1, 28)), Decimal::ONE);
        assert_eq!(discount.amount_off(Decimal::new(1, 28)), Decimal::new(1, 28));
    }

    #[test]
    fn variants_compare_by_value() {
        assert_eq!(
            Discount::percent_points(Decimal::from(10)),
            Discount::percent_points(Decimal::from(10))
        );
        assert_ne!(
            Discount::percent_points(Decimal::from(10)),
            Discount::Fixed(Decimal::from(10))
        );
    }
}
