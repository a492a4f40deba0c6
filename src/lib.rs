//! Tavola
//!
//! Tavola is the cart pricing and promo code engine behind a multi-location restaurant
//! menu: per-restaurant price resolution, a persisted cart ledger, single active promo
//! codes, and checkout receipts.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod discounts;
pub mod ids;
pub mod logging;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
pub mod restaurants;
pub mod retry;
