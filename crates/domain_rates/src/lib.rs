//! Exchange-Rate Domain
//!
//! This crate manages the history of official VES-per-USD rate observations
//! ("BCV rate") and answers the two questions the rest of the system asks:
//!
//! - What was the authoritative rate on a given day?
//! - Should this freshly polled rate be recorded, or is it the same number
//!   the feed already reported today?
//!
//! # Intra-day History
//!
//! The published rate can move within a day, so a date may carry several
//! observations; the one with the latest `observed_at` wins. A new same-day
//! row is only written when the candidate differs from the standing rate by
//! more than 0.01, which keeps an unchanged feed from growing the table on
//! every poll.

pub mod error;
pub mod history;
pub mod observation;
pub mod ports;

pub use error::RateError;
pub use history::{RateHistory, RecordOutcome, RATE_CHANGE_TOLERANCE};
pub use observation::RateObservation;
pub use ports::RateObservationStore;
