//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Repeated tax/discount application drifts:                              │
//! │    subtotal × 10% across many orders loses/gains cents silently         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units + Half-to-Even Rounding              │
//! │    2848 × 10% = 284.8 → 285 exactly, every time, on every device        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every value is tagged with its currency; combining two different
//! currencies is a `CurrencyMismatch` error, never a silent coercion.
//!
//! ## Usage
//! ```rust
//! use comanda_core::money::{Currency, Money};
//!
//! // Create from minor units (preferred)
//! let price = Money::new(1099, Currency::Eur); // 10.99 EUR
//!
//! let line = price.multiply_quantity(2); // 21.98 EUR
//! let total = line.add(Money::new(500, Currency::Eur)).unwrap(); // 26.98 EUR
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{DomainError, DomainResult};
use crate::types::Rate;

// =============================================================================
// Currency
// =============================================================================

/// ISO-4217 currency code.
///
/// All supported currencies use a 2-digit minor unit, so the minor-unit
/// exponent is fixed at 100 across the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Euro - the default for the product.
    Eur,
    /// US dollar.
    Usd,
    /// Pound sterling.
    Gbp,
}

impl Currency {
    /// Returns the 3-letter ISO code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Eur
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit, tagged with its currency.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and corrections
/// - **Currency tag**: Cross-currency arithmetic is a typed error
/// - **Derives**: Full serde support for JSON document payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    minor_units: i64,
    currency: Currency,
}

impl Money {
    /// Creates a Money value from minor units (cents for EUR/USD/GBP).
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::{Currency, Money};
    ///
    /// let price = Money::new(1099, Currency::Eur); // 10.99 EUR
    /// assert_eq!(price.minor_units(), 1099);
    /// ```
    #[inline]
    pub const fn new(minor_units: i64, currency: Currency) -> Self {
        Money {
            minor_units,
            currency,
        }
    }

    /// Returns zero in the given currency.
    #[inline]
    pub const fn zero(currency: Currency) -> Self {
        Money::new(0, currency)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.minor_units
    }

    /// Returns the currency tag.
    #[inline]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the major unit portion (10.99 EUR → 10).
    ///
    /// Truncates towards zero; this is the floor used by the loyalty
    /// points computation for non-negative totals.
    #[inline]
    pub const fn major_units(&self) -> i64 {
        self.minor_units / 100
    }

    /// Returns the minor unit portion, always 0-99 (10.99 EUR → 99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.minor_units % 100).abs()
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.minor_units == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.minor_units > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.minor_units < 0
    }

    /// Adds two Money values of the same currency.
    ///
    /// ## Errors
    /// `CurrencyMismatch` when the currencies differ.
    pub fn add(self, other: Money) -> DomainResult<Money> {
        self.require_same_currency(other)?;
        Ok(Money::new(self.minor_units + other.minor_units, self.currency))
    }

    /// Subtracts another Money value of the same currency.
    ///
    /// ## Errors
    /// `CurrencyMismatch` when the currencies differ.
    pub fn subtract(self, other: Money) -> DomainResult<Money> {
        self.require_same_currency(other)?;
        Ok(Money::new(self.minor_units - other.minor_units, self.currency))
    }

    /// Multiplies by an integer quantity.
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::{Currency, Money};
    ///
    /// let unit_price = Money::new(899, Currency::Eur); // 8.99 EUR
    /// assert_eq!(unit_price.multiply_quantity(2).minor_units(), 1798);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money::new(self.minor_units * qty, self.currency)
    }

    /// Applies a percentage rate, rounding **half to even** at the minor unit.
    ///
    /// ## Half-to-Even Rounding Explained
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  BANKER'S ROUNDING (Round Half to Even)                             │
    /// │                                                                     │
    /// │  Standard rounding always rounds 0.5 UP, causing systematic bias:   │
    /// │    0.5 → 1, 1.5 → 2, 2.5 → 3, 3.5 → 4 (always up = +bias)           │
    /// │                                                                     │
    /// │  Half-to-even rounds 0.5 to the nearest EVEN number:                │
    /// │    0.5 → 0, 1.5 → 2, 2.5 → 2, 3.5 → 4 (alternates = no bias)        │
    /// │                                                                     │
    /// │  Over many tax and discount applications this prevents              │
    /// │  systematic gain/loss on the house side.                            │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::{Currency, Money};
    /// use comanda_core::types::Rate;
    ///
    /// let subtotal = Money::new(2848, Currency::Eur); // 28.48 EUR
    /// let tax = subtotal.percentage(Rate::from_bps(1000)); // 10%
    /// assert_eq!(tax.minor_units(), 285); // 284.8 rounds up
    ///
    /// // The exact-half case rounds to even:
    /// let tax = Money::new(1225, Currency::Eur).percentage(Rate::from_bps(1000));
    /// assert_eq!(tax.minor_units(), 122); // 122.5 → 122
    /// ```
    pub fn percentage(&self, rate: Rate) -> Money {
        // i128 prevents overflow on large amounts; rate is basis points.
        let scaled = self.minor_units as i128 * rate.bps() as i128;
        Money::new(div_round_half_even(scaled, 10_000) as i64, self.currency)
    }

    /// Clamps negative values to zero, leaving positive values untouched.
    ///
    /// Used for the cart grand total, which must never be negative even
    /// when the discount exceeds everything else.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Money {
        if self.minor_units < 0 {
            Money::new(0, self.currency)
        } else {
            *self
        }
    }

    /// Returns the smaller of two values of the same currency.
    ///
    /// ## Errors
    /// `CurrencyMismatch` when the currencies differ.
    pub fn cap_at(self, ceiling: Money) -> DomainResult<Money> {
        self.require_same_currency(ceiling)?;
        if self.minor_units <= ceiling.minor_units {
            Ok(self)
        } else {
            Ok(ceiling)
        }
    }

    fn require_same_currency(&self, other: Money) -> DomainResult<()> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(())
    }
}

/// Divides `n / d` (d > 0) rounding half to even.
///
/// Works for negative numerators: -0.5 → 0, -1.5 → -2, -2.5 → -2.
fn div_round_half_even(n: i128, d: i128) -> i128 {
    let q = n.div_euclid(d);
    let r = n.rem_euclid(d);
    let twice = 2 * r;
    if twice > d || (twice == d && q % 2 != 0) {
        q + 1
    } else {
        q
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and error messages. The client UI formats amounts
/// itself to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor_units < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02} {}",
            sign,
            self.major_units().abs(),
            self.minor_part(),
            self.currency
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_parts() {
        let money = Money::new(1099, Currency::Eur);
        assert_eq!(money.minor_units(), 1099);
        assert_eq!(money.major_units(), 10);
        assert_eq!(money.minor_part(), 99);
        assert_eq!(money.currency(), Currency::Eur);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::new(1099, Currency::Eur)), "10.99 EUR");
        assert_eq!(format!("{}", Money::new(500, Currency::Usd)), "5.00 USD");
        assert_eq!(format!("{}", Money::new(-550, Currency::Gbp)), "-5.50 GBP");
        assert_eq!(format!("{}", Money::zero(Currency::Eur)), "0.00 EUR");
    }

    #[test]
    fn test_add_subtract_same_currency() {
        let a = Money::new(1000, Currency::Eur);
        let b = Money::new(500, Currency::Eur);

        assert_eq!(a.add(b).unwrap().minor_units(), 1500);
        assert_eq!(a.subtract(b).unwrap().minor_units(), 500);
    }

    #[test]
    fn test_cross_currency_is_an_error() {
        let eur = Money::new(1000, Currency::Eur);
        let usd = Money::new(500, Currency::Usd);

        assert!(matches!(
            eur.add(usd),
            Err(DomainError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            eur.subtract(usd),
            Err(DomainError::CurrencyMismatch { .. })
        ));
        assert!(matches!(
            eur.cap_at(usd),
            Err(DomainError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_percentage_basic() {
        // 10.00 at 10% = 1.00
        let amount = Money::new(1000, Currency::Eur);
        assert_eq!(amount.percentage(Rate::from_bps(1000)).minor_units(), 100);
    }

    #[test]
    fn test_percentage_rounds_half_to_even() {
        // 10.00 at 8.25% = 0.825 → 0.82 (2 is even, half goes down)
        let amount = Money::new(1000, Currency::Eur);
        assert_eq!(amount.percentage(Rate::from_bps(825)).minor_units(), 82);

        // 12.25 at 10% = 1.225 → 1.22
        let amount = Money::new(1225, Currency::Eur);
        assert_eq!(amount.percentage(Rate::from_bps(1000)).minor_units(), 122);

        // 12.35 at 10% = 1.235 → 1.24
        let amount = Money::new(1235, Currency::Eur);
        assert_eq!(amount.percentage(Rate::from_bps(1000)).minor_units(), 124);

        // 28.48 at 10% = 2.848 → 2.85 (not a half case, plain round up)
        let amount = Money::new(2848, Currency::Eur);
        assert_eq!(amount.percentage(Rate::from_bps(1000)).minor_units(), 285);
    }

    #[test]
    fn test_percentage_negative_amounts() {
        // -12.25 at 10% = -1.225 → -1.22
        let amount = Money::new(-1225, Currency::Eur);
        assert_eq!(amount.percentage(Rate::from_bps(1000)).minor_units(), -122);

        // -12.35 at 10% = -1.235 → -1.24
        let amount = Money::new(-1235, Currency::Eur);
        assert_eq!(amount.percentage(Rate::from_bps(1000)).minor_units(), -124);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(
            Money::new(-550, Currency::Eur).clamp_non_negative().minor_units(),
            0
        );
        assert_eq!(
            Money::new(550, Currency::Eur).clamp_non_negative().minor_units(),
            550
        );
    }

    #[test]
    fn test_cap_at() {
        let amount = Money::new(1500, Currency::Eur);
        let ceiling = Money::new(1000, Currency::Eur);
        assert_eq!(amount.cap_at(ceiling).unwrap().minor_units(), 1000);
        assert_eq!(ceiling.cap_at(amount).unwrap().minor_units(), 1000);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::new(299, Currency::Eur);
        assert_eq!(unit_price.multiply_quantity(3).minor_units(), 897);
    }
}
