//! Unit prices copied into the cart.
//!
//! Catalog payloads carry prices either as JSON numbers (`12`, `12.5`) or as
//! decimal strings (`"12.50"`). Both decode into a [`UnitPrice`] backed by
//! [`Decimal`], so totals never go through floating point. A price that does
//! not parse is rejected when the payload is decoded; once a `UnitPrice`
//! exists it is always a valid amount.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Largest accepted per-unit amount, in either direction.
///
/// With quantities bounded by `u32::MAX`, a line total stays far below
/// `Decimal::MAX`.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Error parsing a unit price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid unit price: {0:?}")]
pub struct PriceError(pub String);

/// A per-unit amount in the store currency's standard unit (dollars, not cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UnitPrice(Decimal);

impl UnitPrice {
    /// Create a unit price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity, saturating at the `Decimal` bounds.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity))
    }
}

impl FromStr for UnitPrice {
    type Err = PriceError;

    /// Parse a base-10 amount. Surrounding whitespace is ignored and
    /// exponent notation (`1e3`) is accepted. Amounts beyond
    /// [`MAX_UNIT_PRICE`] are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .ok()
            .filter(|amount| amount.abs() <= MAX_UNIT_PRICE)
            .map(Self)
            .ok_or_else(|| PriceError(s.to_string()))
    }
}

impl std::fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for UnitPrice {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for UnitPrice {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

impl Serialize for UnitPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Wire forms accepted for a price.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(serde_json::Number),
    Text(String),
}

impl<'de> Deserialize<'de> for UnitPrice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match RawPrice::deserialize(deserializer)? {
            RawPrice::Number(n) => n.to_string(),
            RawPrice::Text(s) => s,
        };
        raw.parse().map_err(serde::de::Error::custom)
    }
}
