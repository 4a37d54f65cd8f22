//! Sales domain errors

use core_kernel::{InstallmentId, MoneyError, OrderId};
use thiserror::Error;

/// Errors that can occur in the sales domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SalesError {
    /// The order needs a currency conversion but carries no usable rate
    #[error("Order {order} requires an exchange rate but none is usable")]
    MissingRate { order: OrderId },

    /// Stored payment fields do not resolve to a single payment shape
    #[error("Order {order} payment fields do not resolve to a single payment shape: {detail}")]
    InconsistentPayment { order: OrderId, detail: String },

    /// Installment not found
    #[error("Installment not found: {0}")]
    InstallmentNotFound(InstallmentId),

    /// Monetary arithmetic failed
    #[error(transparent)]
    Money(#[from] MoneyError),
}
