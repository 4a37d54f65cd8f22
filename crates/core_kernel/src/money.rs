//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values in the
//! two currencies the business transacts in, plus the exchange-rate type used
//! to move between them. Amounts keep full `rust_decimal` precision; rounding
//! happens only at presentation boundaries (published rates carry up to
//! eight decimal places, and conversions must not lose them).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use thiserror::Error;

/// Tolerance used when deciding whether an amount is effectively zero.
///
/// Balances at or below one cent are treated as settled everywhere in the
/// system, absorbing rounding noise from rate conversions.
pub const AMOUNT_TOLERANCE: Decimal = dec!(0.01);

/// The two currencies the business operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// United States dollar
    USD,
    /// Venezuelan bolívar
    VES,
}

impl Currency {
    /// Returns the number of decimal places shown for this currency
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::VES => "Bs.",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::VES => "VES",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        expected: Currency,
        actual: Currency,
    },

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(Decimal),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// A monetary amount with associated currency
///
/// Unlike display formatting, the stored amount is never rounded: a VES
/// amount divided by an eight-decimal rate keeps every digit until a caller
/// explicitly rounds for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a USD amount
    pub fn usd(amount: Decimal) -> Self {
        Self::new(amount, Currency::USD)
    }

    /// Creates a VES amount
    pub fn ves(amount: Decimal) -> Self {
        Self::new(amount, Currency::VES)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns true if the amount is within the settlement tolerance of zero
    pub fn is_negligible(&self) -> bool {
        self.amount.abs() <= AMOUNT_TOLERANCE
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self {
            amount: self.amount.abs(),
            currency: self.currency,
        }
    }

    /// Rounds to the currency's standard decimal places, for presentation
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp(self.currency.decimal_places()),
            currency: self.currency,
        }
    }

    /// Checked addition that returns an error on currency mismatch
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        other.ensure_currency(self.currency)?;
        Ok(Self::new(self.amount + other.amount, self.currency))
    }

    /// Checked subtraction that returns an error on currency mismatch
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        other.ensure_currency(self.currency)?;
        Ok(Self::new(self.amount - other.amount, self.currency))
    }

    /// Returns the smaller of this amount and a same-currency ceiling
    pub fn clamp_at(&self, ceiling: &Money) -> Result<Money, MoneyError> {
        ceiling.ensure_currency(self.currency)?;
        Ok(Self::new(self.amount.min(ceiling.amount), self.currency))
    }

    /// Returns this amount floored at zero
    pub fn floor_zero(&self) -> Money {
        Self::new(self.amount.max(Decimal::ZERO), self.currency)
    }

    /// Verifies the amount is denominated in the expected currency
    pub fn ensure_currency(&self, expected: Currency) -> Result<(), MoneyError> {
        if self.currency != expected {
            return Err(MoneyError::CurrencyMismatch {
                expected,
                actual: self.currency,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other)
            .expect("Currency mismatch in Money::add")
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.checked_sub(&other)
            .expect("Currency mismatch in Money::sub")
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount, self.currency)
    }
}

/// A VES-per-USD exchange rate
///
/// Construction rejects non-positive values, so a rate in hand is always
/// usable for conversion. Orders and installments carry their own snapshot
/// rate; this type does not know which date a rate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct ExchangeRate {
    value: Decimal,
}

impl ExchangeRate {
    /// Creates an exchange rate, rejecting values that cannot divide
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value <= Decimal::ZERO {
            return Err(MoneyError::InvalidRate(value));
        }
        Ok(Self { value })
    }

    /// Returns the rate as a decimal (bolívars per dollar)
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Converts a VES amount to its USD equivalent
    pub fn to_usd(&self, ves: &Money) -> Result<Money, MoneyError> {
        ves.ensure_currency(Currency::VES)?;
        Ok(Money::usd(ves.amount() / self.value))
    }

    /// Converts a USD amount to its VES equivalent
    pub fn to_ves(&self, usd: &Money) -> Result<Money, MoneyError> {
        usd.ensure_currency(Currency::USD)?;
        Ok(Money::ves(usd.amount() * self.value))
    }
}

impl TryFrom<Decimal> for ExchangeRate {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExchangeRate> for Decimal {
    fn from(rate: ExchangeRate) -> Decimal {
        rate.value
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} VES/USD", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation_keeps_precision() {
        let m = Money::ves(dec!(1800.12345678));
        assert_eq!(m.amount(), dec!(1800.12345678));
        assert_eq!(m.currency(), Currency::VES);
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::usd(dec!(100.00));
        let b = Money::usd(dec!(50.00));

        assert_eq!((a + b).amount(), dec!(150.00));
        assert_eq!((a - b).amount(), dec!(50.00));
    }

    #[test]
    fn test_currency_mismatch() {
        let usd = Money::usd(dec!(100.00));
        let ves = Money::ves(dec!(100.00));

        let result = usd.checked_add(&ves);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_clamp_at_ceiling() {
        let received = Money::usd(dec!(60.00));
        let total = Money::usd(dec!(50.00));

        assert_eq!(received.clamp_at(&total).unwrap().amount(), dec!(50.00));
        assert_eq!(total.clamp_at(&received).unwrap().amount(), dec!(50.00));
    }

    #[test]
    fn test_floor_zero() {
        let negative = Money::usd(dec!(-3.25));
        assert_eq!(negative.floor_zero().amount(), dec!(0));

        let positive = Money::usd(dec!(3.25));
        assert_eq!(positive.floor_zero().amount(), dec!(3.25));
    }

    #[test]
    fn test_is_negligible() {
        assert!(Money::usd(dec!(0.005)).is_negligible());
        assert!(Money::usd(dec!(0.01)).is_negligible());
        assert!(!Money::usd(dec!(0.011)).is_negligible());
    }

    #[test]
    fn test_rate_rejects_non_positive() {
        assert!(matches!(
            ExchangeRate::new(dec!(0)),
            Err(MoneyError::InvalidRate(_))
        ));
        assert!(matches!(
            ExchangeRate::new(dec!(-36.5)),
            Err(MoneyError::InvalidRate(_))
        ));
        assert!(ExchangeRate::new(dec!(166.58)).is_ok());
    }

    #[test]
    fn test_ves_to_usd_conversion() {
        let rate = ExchangeRate::new(dec!(36.0)).unwrap();
        let converted = rate.to_usd(&Money::ves(dec!(1800.00))).unwrap();

        assert_eq!(converted.amount(), dec!(50));
        assert_eq!(converted.currency(), Currency::USD);
    }

    #[test]
    fn test_conversion_requires_matching_currency() {
        let rate = ExchangeRate::new(dec!(36.0)).unwrap();

        assert!(rate.to_usd(&Money::usd(dec!(10))).is_err());
        assert!(rate.to_ves(&Money::ves(dec!(10))).is_err());
    }

    #[test]
    fn test_money_display_uses_currency_symbols() {
        let m = Money::usd(dec!(175.96));
        assert_eq!(m.to_string(), "$ 175.96");

        let bs = Money::ves(dec!(1800.50));
        assert_eq!(bs.to_string(), "Bs. 1800.50");
    }

    #[test]
    fn test_round_to_currency_is_presentation_only() {
        let m = Money::usd(dec!(10.12345678));
        assert_eq!(m.round_to_currency().amount(), dec!(10.12));
        // The original value is untouched.
        assert_eq!(m.amount(), dec!(10.12345678));
    }

    #[test]
    fn test_rate_serde_rejects_invalid() {
        let ok: Result<ExchangeRate, _> = serde_json::from_str("166.58");
        assert!(ok.is_ok());

        let bad: Result<ExchangeRate, _> = serde_json::from_str("-1.0");
        assert!(bad.is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn rate_strategy() -> impl Strategy<Value = ExchangeRate> {
        (1i64..400_000_000i64)
            .prop_map(|n| ExchangeRate::new(Decimal::new(n, 6)).expect("positive rate"))
    }

    proptest! {
        #[test]
        fn conversion_round_trips_within_tolerance(
            cents in 0i64..100_000_000i64,
            rate in rate_strategy()
        ) {
            let usd = Money::usd(Decimal::new(cents, 2));
            let back = rate.to_usd(&rate.to_ves(&usd).unwrap()).unwrap();

            let diff = (back.amount() - usd.amount()).abs();
            prop_assert!(diff <= AMOUNT_TOLERANCE);
        }

        #[test]
        fn clamp_never_exceeds_ceiling(
            a in 0i64..1_000_000_000i64,
            b in 0i64..1_000_000_000i64
        ) {
            let amount = Money::usd(Decimal::new(a, 2));
            let ceiling = Money::usd(Decimal::new(b, 2));

            let clamped = amount.clamp_at(&ceiling).unwrap();
            prop_assert!(clamped.amount() <= ceiling.amount());
            prop_assert!(clamped.amount() <= amount.amount());
        }
    }
}
