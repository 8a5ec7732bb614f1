//! # Money Module
//!
//! Provides the `Money` type used when a solver amount is shown to a user.
//!
//! ## Where Money Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Solvers work in f64 (closed-form formulas, 1e-9 consistency)          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Money::from_amount(f64) ── rounds to centavos (half away from zero)   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Display: "R$ 1.234,56"                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use margem_core::money::Money;
//!
//! let price = Money::from_centavos(123_456);
//! assert_eq!(price.to_string(), "R$ 1.234,56");
//!
//! let rounded = Money::from_amount(28.666).unwrap();
//! assert_eq!(rounded.centavos(), 2867);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (1/100 BRL).
///
/// ## Design Decisions
/// - **i64 (signed)**: losses and negative DIFAL are legitimate outputs
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    #[inline]
    pub const fn from_centavos(centavos: i64) -> Self {
        Money(centavos)
    }

    /// Rounds a solver amount to the nearest centavo.
    ///
    /// Returns `None` for NaN, infinities, or values outside the i64 range.
    ///
    /// ## Example
    /// ```rust
    /// use margem_core::money::Money;
    ///
    /// assert_eq!(Money::from_amount(109.3412).unwrap().centavos(), 10934);
    /// assert_eq!(Money::from_amount(-0.005).unwrap().centavos(), -1);
    /// assert!(Money::from_amount(f64::NAN).is_none());
    /// ```
    pub fn from_amount(amount: f64) -> Option<Self> {
        let centavos = (amount * 100.0).round();
        if !centavos.is_finite() || centavos.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Money(centavos as i64))
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn centavos(&self) -> i64 {
        self.0
    }

    /// Returns the whole reais portion (truncated toward zero).
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Formats with a caller-chosen currency symbol: `US$ 1.234,56`.
    ///
    /// An empty symbol yields the bare number.
    pub fn to_display(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let separator = if symbol.is_empty() { "" } else { " " };
        format!(
            "{}{}{}{},{:02}",
            sign,
            symbol,
            separator,
            group_thousands(self.reais().unsigned_abs()),
            self.centavos_part()
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// pt-BR display: `R$ 1.234,56`, `-R$ 5,50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display("R$"))
    }
}

/// Inserts `.` every three digits from the right: `1234567` → `1.234.567`.
pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_centavos() {
        let money = Money::from_centavos(1099);
        assert_eq!(money.centavos(), 1099);
        assert_eq!(money.reais(), 10);
        assert_eq!(money.centavos_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_centavos(1099).to_string(), "R$ 10,99");
        assert_eq!(Money::from_centavos(123_456_789).to_string(), "R$ 1.234.567,89");
        assert_eq!(Money::from_centavos(-550).to_string(), "-R$ 5,50");
        assert_eq!(Money::from_centavos(0).to_string(), "R$ 0,00");
        assert_eq!(Money::from_centavos(-5).to_string(), "-R$ 0,05");
    }

    #[test]
    fn test_from_amount_rounds_half_away_from_zero() {
        assert_eq!(Money::from_amount(13333.333).unwrap().centavos(), 1_333_333);
        assert_eq!(Money::from_amount(0.125).unwrap().centavos(), 13);
        assert_eq!(Money::from_amount(-0.125).unwrap().centavos(), -13);
    }

    #[test]
    fn test_from_amount_rejects_non_finite() {
        assert!(Money::from_amount(f64::INFINITY).is_none());
        assert!(Money::from_amount(f64::NAN).is_none());
        assert!(Money::from_amount(1e300).is_none());
    }

    #[test]
    fn test_custom_symbol() {
        let debit = Money::from_centavos(28866);
        assert_eq!(debit.to_display("US$"), "US$ 288,66");
        assert_eq!(debit.to_display(""), "288,66");
        assert_eq!(Money::from_centavos(-1_000_050).to_display("R$"), "-R$ 10.000,50");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1.000");
        assert_eq!(group_thousands(1_234_567), "1.234.567");
    }
}
