//! Rate observation history
//!
//! Holds an immutable-for-the-duration-of-a-computation snapshot of rate
//! observations and implements the authoritative-rate lookup and the
//! record-if-changed rule for the polling feed.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{ExchangeRate, ObservationId, Timezone};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RateError;
use crate::observation::RateObservation;

/// Minimum change against the day's standing rate for a new row to be written
pub const RATE_CHANGE_TOLERANCE: Decimal = dec!(0.01);

/// Result of submitting a candidate rate to the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// Whether a new observation row was written
    pub inserted: bool,
    /// The rate standing after the call (the candidate if inserted)
    pub rate: Decimal,
}

/// The observation history for the official rate
///
/// Lookups and inserts interpret "today" on the business-local calendar.
/// The record-if-changed check is a check-then-act sequence: when two feed
/// pollers run concurrently, same-day persistence must be serialized by the
/// backing store (unique day constraint with conflict-as-no-op). In-process
/// the `&mut self` receiver provides that exclusion.
#[derive(Debug, Clone)]
pub struct RateHistory {
    timezone: Timezone,
    observations: Vec<RateObservation>,
    next_id: i64,
}

impl RateHistory {
    /// Creates an empty history
    pub fn new(timezone: Timezone) -> Self {
        Self {
            timezone,
            observations: Vec::new(),
            next_id: 1,
        }
    }

    /// Builds a history from previously stored observations
    pub fn from_observations(timezone: Timezone, observations: Vec<RateObservation>) -> Self {
        let next_id = observations
            .iter()
            .map(|o| o.id.value())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            timezone,
            observations,
            next_id,
        }
    }

    /// Returns all observations, in insertion order
    pub fn observations(&self) -> &[RateObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// The authoritative rate on or before the given day
    ///
    /// For a day with several observations the latest `observed_at` wins;
    /// a day with none falls back to the most recent earlier day.
    pub fn latest_rate(&self, as_of: NaiveDate) -> Result<ExchangeRate, RateError> {
        let best = self
            .observations
            .iter()
            .filter(|o| o.date <= as_of)
            .max_by_key(|o| (o.date, o.observed_at))
            .ok_or(RateError::NoRateAvailable(as_of))?;
        Ok(ExchangeRate::new(best.value)?)
    }

    /// Submits a candidate rate from the feed
    ///
    /// Inserts when today has no observation yet, or when the candidate
    /// differs from today's standing rate by more than
    /// [`RATE_CHANGE_TOLERANCE`]. Repeated identical submissions leave the
    /// history unchanged.
    pub fn record_observation(
        &mut self,
        candidate: Decimal,
        now: DateTime<Utc>,
    ) -> Result<RecordOutcome, RateError> {
        ExchangeRate::new(candidate)?;
        let today = self.timezone.local_date(now);

        if let Some(standing) = self.authoritative_value(today) {
            if (candidate - standing).abs() <= RATE_CHANGE_TOLERANCE {
                tracing::debug!(%today, rate = %standing, "rate unchanged, observation skipped");
                return Ok(RecordOutcome {
                    inserted: false,
                    rate: standing,
                });
            }
        }

        let observation =
            RateObservation::new(ObservationId::new(self.next_id), today, candidate, now);
        self.next_id += 1;
        self.observations.push(observation);
        tracing::debug!(%today, rate = %candidate, "rate observation recorded");

        Ok(RecordOutcome {
            inserted: true,
            rate: candidate,
        })
    }

    fn authoritative_value(&self, date: NaiveDate) -> Option<Decimal> {
        self.observations
            .iter()
            .filter(|o| o.date == date)
            .max_by_key(|o| o.observed_at)
            .map(|o| o.value)
    }
}
