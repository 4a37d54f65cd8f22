//! Rate domain errors

use chrono::NaiveDate;
use core_kernel::MoneyError;
use thiserror::Error;

/// Errors that can occur in the rate domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateError {
    /// No observation exists on or before the requested date
    #[error("No exchange rate observation on or before {0}")]
    NoRateAvailable(NaiveDate),

    /// A supplied or stored rate value is unusable
    #[error(transparent)]
    Money(#[from] MoneyError),
}
