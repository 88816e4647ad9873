//! Integer price representation.
//!
//! Prices are whole amounts in the store's smallest billing unit. All cart
//! arithmetic is integer arithmetic so totals never depend on rounding.

use core::fmt;
use core::iter::Sum;

use serde::{Deserialize, Serialize};

/// A non-negative price.
///
/// Arithmetic saturates at `u64::MAX` instead of wrapping, so an absurd cart
/// can never overflow into a small total.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(0);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.0
    }

    /// Add two prices, saturating at the maximum.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtract `other`, stopping at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Multiply by a quantity, saturating at the maximum.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Returns `true` if the price is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl From<Price> for u64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_multiplies_by_quantity() {
        assert_eq!(Price::new(120).times(3), Price::new(360));
        assert_eq!(Price::new(120).times(0), Price::ZERO);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Price::new(u64::MAX);
        assert_eq!(max.saturating_add(Price::new(1)), max);
        assert_eq!(max.times(2), max);
        assert_eq!(Price::new(5).saturating_sub(Price::new(10)), Price::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::new(120), Price::new(60), Price::new(20)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::new(200));
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&Price::new(240)).unwrap_or_default();
        assert_eq!(json, "240");
    }
}
