//! Pre-built Test Fixtures
//!
//! Ready-to-use test data drawn from the value patterns the business
//! actually sees: four-digit bolívar rates, two-decimal dollar totals,
//! Caracas-local timestamps.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::{CustomerId, DateRange, ExchangeRate, InstallmentId, Money, OrderId, Timezone};
use domain_rates::RateHistory;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A standard order total
    pub fn usd_100() -> Money {
        Money::usd(dec!(100.00))
    }

    /// A zero USD amount
    pub fn usd_zero() -> Money {
        Money::usd(dec!(0))
    }

    /// A bolívar amount that converts to $50 at the legacy rate
    pub fn ves_1800() -> Money {
        Money::ves(dec!(1800.00))
    }
}

/// Fixture for exchange-rate test data
pub struct RateFixtures;

impl RateFixtures {
    /// The legacy-era rate used across old diagnostic data
    pub fn legacy() -> ExchangeRate {
        ExchangeRate::new(dec!(36.0)).unwrap()
    }

    /// A current-era rate
    pub fn current() -> ExchangeRate {
        ExchangeRate::new(dec!(166.58)).unwrap()
    }

    /// The rate after an overnight move
    pub fn next_day() -> ExchangeRate {
        ExchangeRate::new(dec!(170.50)).unwrap()
    }

    /// An observation history seeded with the legacy August rate and the
    /// current rate on the standard sale day
    pub fn seeded_history() -> RateHistory {
        let mut history = RateHistory::new(Timezone::default());
        history
            .record_observation(dec!(36.0), TemporalFixtures::caracas(2025, 8, 1, 9, 0))
            .expect("fixture rate");
        history
            .record_observation(dec!(166.58), TemporalFixtures::caracas(2025, 9, 24, 9, 0))
            .expect("fixture rate");
        history
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A Caracas-local instant as UTC
    pub fn caracas(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        chrono_tz::America::Caracas
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    /// The standard sale day used across tests
    pub fn sale_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 24).unwrap()
    }

    /// A mid-afternoon sale instant on the standard sale day
    pub fn sale_instant() -> DateTime<Utc> {
        Self::caracas(2025, 9, 24, 15, 0)
    }

    /// The report month containing the standard sale day
    pub fn september() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
        )
        .unwrap()
    }

    /// The month before the report month
    pub fn august() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
        )
        .unwrap()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    pub fn order_id() -> OrderId {
        OrderId::new(175)
    }

    pub fn installment_id() -> InstallmentId {
        InstallmentId::new(31)
    }

    pub fn customer() -> CustomerId {
        CustomerId::new("V-12345678")
    }

    pub fn other_customer() -> CustomerId {
        CustomerId::new("J-98765432")
    }
}
