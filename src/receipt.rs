//! Receipt

use std::io;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{CartLedger, CartStore},
    products::ProductId,
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One priced row on a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Product ordered
    pub product_id: ProductId,

    /// Product name at the time of ordering
    pub name: String,

    /// Units ordered
    pub quantity: u32,

    /// Resolved unit price
    pub unit_price: Decimal,

    /// Unit price times quantity
    pub line_total: Decimal,

    /// Chosen sauce, if any
    pub sauce: Option<String>,

    /// Chosen sides, if any
    pub sides: Vec<String>,
}

/// Snapshot of a priced cart.
///
/// Amounts are kept exact; they are only rounded to whole units when displayed.
#[derive(Debug, Clone)]
pub struct Receipt {
    lines: Vec<ReceiptLine>,
    restaurant: Option<String>,
    promo_code: Option<String>,
    subtotal: Decimal,
    discount: Decimal,
    total: Decimal,
    item_count: u64,
    meets_minimum_order: bool,
    free_delivery: bool,
    currency: &'static Currency,
}

impl Receipt {
    /// Price every line of `ledger` and capture its totals.
    pub fn from_ledger<S: CartStore>(ledger: &CartLedger<S>, currency: &'static Currency) -> Self {
        let catalog = ledger.catalog();

        let lines = ledger
            .line_items()
            .iter()
            .map(|item| ReceiptLine {
                product_id: item.product_id,
                name: catalog
                    .product(item.product_id)
                    .map_or_else(|| format!("#{}", item.product_id), |p| p.name.clone()),
                quantity: item.quantity,
                unit_price: ledger.unit_price(item.product_id),
                line_total: ledger.line_total(item),
                sauce: item.selected_sauce.clone(),
                sides: item.selected_sides.clone().unwrap_or_default(),
            })
            .collect();

        let subtotal = ledger.subtotal();
        let restaurant = ledger.selected_restaurant();

        Self {
            lines,
            restaurant: restaurant.map(|r| r.name.clone()),
            promo_code: ledger.active_promo_code().map(str::to_string),
            subtotal,
            discount: ledger.discount_amount(),
            total: ledger.total(),
            item_count: ledger.total_item_count(),
            meets_minimum_order: restaurant.is_none_or(|r| r.accepts_subtotal(subtotal)),
            free_delivery: restaurant.is_some_and(|r| r.delivers_free(subtotal)),
            currency,
        }
    }

    /// Priced rows in cart order.
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Name of the restaurant the order was priced at.
    pub fn restaurant(&self) -> Option<&str> {
        self.restaurant.as_deref()
    }

    /// Promo code applied to the order.
    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code.as_deref()
    }

    /// Total before the promo code.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Amount taken off by the promo code.
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Amount payable.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Units across all lines.
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Whether the subtotal reaches the restaurant's minimum order amount.
    ///
    /// Always true when no restaurant is selected.
    pub fn meets_minimum_order(&self) -> bool {
        self.meets_minimum_order
    }

    /// Whether the subtotal reaches the restaurant's free delivery threshold.
    pub fn free_delivery(&self) -> bool {
        self.free_delivery
    }

    /// Currency used for display.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Difference between the displayed subtotal and total.
    ///
    /// Each side is rounded before subtracting, so this can differ from the rounded
    /// [`discount`](Self::discount) by a unit.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.money(self.subtotal).sub(self.money(self.total))
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written to `out`.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Price", "Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                describe_line(line),
                line.quantity.to_string(),
                self.money(line.unit_price).to_string(),
                self.money(line.line_total).to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Alignment::center());
        table.modify(Columns::new(2..5), Alignment::right());

        if let Some(restaurant) = &self.restaurant {
            writeln!(out, "\n {restaurant}").map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let mut rows = vec![(" Subtotal:".to_string(), self.money(self.subtotal).to_string())];

        if let Some(code) = &self.promo_code {
            rows.push((format!(" Promo {code}:"), format!("-{}", self.money(self.discount))));
        }

        rows.push((" Total:".to_string(), self.money(self.total).to_string()));

        if !self.meets_minimum_order {
            rows.push((" Minimum order:".to_string(), "not reached".to_string()));
        }

        if self.free_delivery {
            rows.push((" Delivery:".to_string(), "free".to_string()));
        }

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in rows {
            writeln!(out, "{label:>label_width$}  {value:>value_width$}")
                .map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }

    fn money(&self, amount: Decimal) -> Money<'static, Currency> {
        Money::from_decimal(
            amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            self.currency,
        )
    }
}

fn describe_line(line: &ReceiptLine) -> String {
    let mut extras: Vec<&str> = Vec::new();

    if let Some(sauce) = &line.sauce {
        extras.push(sauce);
    }

    extras.extend(line.sides.iter().map(String::as_str));

    if extras.is_empty() {
        line.name.clone()
    } else {
        format!("{} ({})", line.name, extras.join(", "))
    }
}
