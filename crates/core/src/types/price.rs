//! Unit prices using decimal arithmetic.
//!
//! Prices are persisted as plain JSON numbers (`"price": 10`), which is the
//! layout existing cart snapshots on devices already use. In memory they are
//! held as [`Decimal`] so totals never pick up floating point drift.
//!
//! Every constructor rounds the amount to the nearest value a JSON number
//! can carry, so a price always reads back exactly as it was written.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A unit price in the store's currency.
///
/// ```
/// use gomarketplace_core::Price;
///
/// let price: Price = "19.99".parse().unwrap();
/// assert_eq!(price.to_string(), "$19.99");
/// assert_eq!(price.times(3).to_string(), "$59.97");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "json_number")] Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// Digits beyond what a JSON number holds are rounded away.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(normalize(amount))
    }

    /// Create a price from the smallest currency unit (e.g., cents).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// This price multiplied by a (possibly negative) quantity.
    ///
    /// Saturates at the bounds of [`Decimal`].
    #[must_use]
    pub fn times(self, quantity: i64) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

/// Round `amount` through its `f64` form.
///
/// `f64` formatting yields the shortest string that parses back to the same
/// float, so a normalized amount survives any number of save/load cycles.
/// Amounts outside the range both types share are kept unchanged.
fn normalize(amount: Decimal) -> Decimal {
    amount
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(from_f64)
        .unwrap_or(amount)
}

fn from_f64(value: f64) -> Option<Decimal> {
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

/// Serde adapter storing a [`Decimal`] as a JSON number.
mod json_number {
    use super::{Decimal, Deserialize, Deserializer, Serializer, from_f64};
    use serde::de::Error as _;
    use serde::ser::Error as _;

    pub fn serialize<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let value = amount
            .to_string()
            .parse::<f64>()
            .map_err(|e| S::Error::custom(format!("price {amount} is not a number: {e}")))?;
        serializer.serialize_f64(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = f64::deserialize(deserializer)?;
        from_f64(value).ok_or_else(|| D::Error::custom(format!("price {value} is out of range")))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_sign_negative() && !self.0.is_zero() {
            write!(f, "-${:.2}", self.0.abs())
        } else {
            write!(f, "${:.2}", self.0)
        }
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('$');
        Decimal::from_str(trimmed)
            .map(Self::new)
            .map_err(|_| PriceError::Invalid(s.to_owned()))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self::new(Decimal::from(amount))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
