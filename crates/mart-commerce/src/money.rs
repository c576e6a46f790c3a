//! Money type for representing monetary values.
//!
//! Amounts are exact base-10 decimals (`rust_decimal`), carried at full
//! precision through every calculation. Rounding to the currency's minor
//! unit happens only when a value is displayed or sent over the wire.

use crate::CommerceError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Get the currency code (e.g., "INR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }

    /// Get the currency symbol (e.g., "₹").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "\u{20b9}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "INR" => Some(Currency::INR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Exact amount in major units (rupees, dollars).
    pub amount: Decimal,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value.
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create an INR amount.
    ///
    /// ```
    /// use mart_commerce::money::Money;
    /// use rust_decimal::Decimal;
    /// let price = Money::inr(Decimal::new(4999, 2));
    /// assert_eq!(price.display(), "\u{20b9}49.99");
    /// ```
    pub fn inr(amount: Decimal) -> Self {
        Self::new(amount, Currency::INR)
    }

    /// Create a Money value from an amount in the minor unit (paise, cents).
    pub fn from_minor(minor: i64, currency: Currency) -> Self {
        Self::new(Decimal::new(minor, currency.decimal_places()), currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Round half away from zero to the currency's minor unit.
    pub fn rounded(&self) -> Money {
        Money::new(
            self.amount.round_dp_with_strategy(
                self.currency.decimal_places(),
                RoundingStrategy::MidpointAwayFromZero,
            ),
            self.currency,
        )
    }

    /// Format as a display string (e.g., "₹49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", self.rounded().amount)
    }

    /// Add another Money value, failing if currencies don't match.
    pub fn try_add(&self, other: &Money) -> Result<Money, CommerceError> {
        self.check_currency(other)?;
        Ok(Money::new(self.amount + other.amount, self.currency))
    }

    /// Subtract another Money value, failing if currencies don't match.
    pub fn try_subtract(&self, other: &Money) -> Result<Money, CommerceError> {
        self.check_currency(other)?;
        Ok(Money::new(self.amount - other.amount, self.currency))
    }

    /// Multiply by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money::new(self.amount * Decimal::from(quantity), self.currency)
    }

    /// Multiply by a rate (0.09 for 9%). Full precision, no rounding.
    pub fn apply_rate(&self, rate: Decimal) -> Money {
        Money::new(self.amount * rate, self.currency)
    }

    /// Sum an iterator of Money values.
    pub fn sum<'a>(
        iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, CommerceError> {
        iter.fold(Ok(Money::zero(currency)), |acc, m| acc?.try_add(m))
    }

    fn check_currency(&self, other: &Money) -> Result<(), CommerceError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            })
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inr(minor: i64) -> Money {
        Money::from_minor(minor, Currency::INR)
    }

    #[test]
    fn test_money_from_minor() {
        let m = inr(4999);
        assert_eq!(m.amount, Decimal::new(4999, 2));
        assert_eq!(m.currency, Currency::INR);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(inr(4999).display(), "\u{20b9}49.99");
        assert_eq!(Money::inr(Decimal::from(12744)).display(), "\u{20b9}12744.00");
        assert_eq!(Money::zero(Currency::USD).display(), "$0.00");
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let m = Money::inr(Decimal::new(10005, 3)); // 10.005
        assert_eq!(m.rounded().amount, Decimal::new(1001, 2));
        assert_eq!(m.display_amount(), "10.01");
    }

    #[test]
    fn test_full_precision_until_rounded() {
        let m = Money::inr(Decimal::new(3333, 2)).apply_rate(Decimal::new(9, 2));
        assert_eq!(m.amount, Decimal::new(29997, 4));
        assert_eq!(m.rounded().amount, Decimal::new(300, 2));
    }

    #[test]
    fn test_money_addition() {
        let c = inr(1000).try_add(&inr(500)).unwrap();
        assert_eq!(c, inr(1500));
    }

    #[test]
    fn test_money_subtraction() {
        let c = inr(1000).try_subtract(&inr(300)).unwrap();
        assert_eq!(c, inr(700));
    }

    #[test]
    fn test_money_multiply() {
        assert_eq!(inr(1000).multiply(3), inr(3000));
    }

    #[test]
    fn test_money_sum() {
        let items = [inr(100), inr(250), inr(650)];
        assert_eq!(Money::sum(items.iter(), Currency::INR).unwrap(), inr(1000));
    }

    #[test]
    fn test_money_currency_mismatch() {
        let usd = Money::from_minor(1000, Currency::USD);
        let err = inr(1000).try_add(&usd).unwrap_err();
        assert!(matches!(err, CommerceError::CurrencyMismatch { .. }));
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("INR"), Some(Currency::INR));
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
