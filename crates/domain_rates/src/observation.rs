//! Dated exchange-rate observations

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::ObservationId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single observation of the official exchange rate
///
/// `date` is the business-local calendar day the observation belongs to;
/// `observed_at` orders observations within that day. Rows are append-only:
/// the feed never edits an observation, it records a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateObservation {
    /// Unique identifier
    pub id: ObservationId,
    /// Business-local calendar day
    pub date: NaiveDate,
    /// VES per USD
    pub value: Decimal,
    /// When the observation was captured
    pub observed_at: DateTime<Utc>,
    /// Where the value came from (feed name, manual entry)
    pub source: Option<String>,
}

impl RateObservation {
    /// Creates a new observation
    pub fn new(id: ObservationId, date: NaiveDate, value: Decimal, observed_at: DateTime<Utc>) -> Self {
        Self {
            id,
            date,
            value,
            observed_at,
            source: None,
        }
    }

    /// Sets the source descriptor
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
