//! Monetary values.
//!
//! Prices are persisted as SQLite `REAL` columns and carried through the
//! domain as [`Decimal`] rounded to cents.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Number of fractional digits kept for prices.
pub const CENTS: u32 = 2;

/// Convert a stored `REAL` value into a cent-rounded price.
#[must_use]
pub fn price_from_f64(value: f64) -> Price {
    Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a price into the `REAL` value written to the database.
#[must_use]
pub fn price_to_f64(price: Price) -> f64 {
    round_cents(price).to_f64().unwrap_or(0.0)
}

/// Round a price to cents.
#[must_use]
pub fn round_cents(price: Price) -> Price {
    price.round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero)
}
