//! # Money Module
//!
//! Integer money for cart totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  The catalog sends prices as JSON numbers (e.g. 19.9), and the          │
//! │  persisted cart keeps them that way. Totals are a different matter:     │
//! │  each price is converted ONCE to integer cents, and every sum and       │
//! │  multiplication after that is exact.                                    │
//! │                                                                         │
//! │    CartItem.price (f64) ──► Money::from_price ──► cents (i64)           │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                   line_total = cents × quantity                         │
//! │                   subtotal   = Σ line_total                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gomarket_core::money::Money;
//!
//! let price = Money::from_price(19.9);
//! assert_eq!(price.cents(), 1990);
//!
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.to_string(), "59.70");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

/// A monetary value in the smallest currency unit (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a catalog price in major units to cents.
    ///
    /// Rounds half away from zero. Non-finite prices count as zero.
    ///
    /// ```rust
    /// use gomarket_core::money::Money;
    ///
    /// assert_eq!(Money::from_price(10.0).cents(), 1000);
    /// assert_eq!(Money::from_price(0.125).cents(), 13);
    /// assert_eq!(Money::from_price(f64::NAN).cents(), 0);
    /// ```
    pub fn from_price(price: f64) -> Self {
        if !price.is_finite() {
            return Money::zero();
        }
        Money((price * 100.0).round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole major units (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor part (0..=99), always non-negative.
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies a unit price by a quantity, saturating on overflow.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

/// Plain `major.minor` rendering. Currency symbols and locale formatting
/// are the UI's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_price_rounds_float_noise() {
        // 19.9 * 100.0 == 1989.9999999999998
        assert_eq!(Money::from_price(19.9).cents(), 1990);
        assert_eq!(Money::from_price(0.1).cents(), 10);
        assert_eq!(Money::from_price(-5.5).cents(), -550);
    }

    #[test]
    fn test_from_price_non_finite() {
        assert!(Money::from_price(f64::INFINITY).is_zero());
        assert!(Money::from_price(f64::NAN).is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 1]
            .into_iter()
            .map(Money::from_cents)
            .sum();
        assert_eq!(total.cents(), 351);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
        assert_eq!(Money::from_cents(i64::MAX).multiply_quantity(2).cents(), i64::MAX);
    }
}
