//! Settlement domain errors

use core_kernel::MoneyError;
use domain_sales::SalesError;
use thiserror::Error;

/// Errors that can occur while settling an order
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettlementError {
    /// Classification or ledger conversion failed
    #[error(transparent)]
    Sales(#[from] SalesError),

    /// Monetary arithmetic failed
    #[error(transparent)]
    Money(#[from] MoneyError),
}
