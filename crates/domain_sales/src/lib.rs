//! Sales Domain - Orders and Installment Payments
//!
//! This crate models the two places money for an order can be recorded:
//!
//! - **On the order itself**: the payment descriptor captured at sale time
//!   (full cash payment, a single currency-mixed payment, an inline first
//!   installment, or a VES-rail payment recorded pre-converted).
//! - **In the installment ledger**: "abono" rows appended as the customer
//!   pays down the balance after the sale.
//!
//! Both records are append-only movements. They are additive - an order's
//! inline installment is the first installment, never a mirror of a ledger
//! row - and the settlement crate caps their combined sum at the order
//! total so legacy double-recordings cannot overstate income.
//!
//! # Payment Descriptor
//!
//! The legacy store keeps the descriptor as independently-nullable flat
//! columns. Here it is a closed sum type, built once at the data-access
//! boundary, so classification is a total match instead of a chain of
//! null checks.

pub mod classifier;
pub mod error;
pub mod installment;
pub mod ledger;
pub mod order;
pub mod ports;

pub use classifier::{
    classify, payment_kind, receipt_legs, sum_legs, Classification, PaymentKind, ReceiptChannel,
    ReceiptLeg,
};
pub use error::SalesError;
pub use installment::{InstallmentPayment, InstallmentStatus};
pub use ledger::InstallmentLedger;
pub use order::{InstallmentTerms, Order, OrderStatus, PaymentDescriptor, PaymentMethod};
pub use ports::{InstallmentStore, OrderStore};
