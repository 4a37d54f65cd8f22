//! Settlement Domain - Debt Resolution and Income Reporting
//!
//! Money for one order lives in two append-only records: the payment
//! captured on the order itself and the installment rows added later. This
//! crate combines the two into a single non-duplicated picture:
//!
//! - **DebtResolver**: per-order received/outstanding amounts and
//!   per-customer debt aggregation. The cap against the order total is
//!   applied exactly once here, at the combined sum, so a legacy
//!   double-recording can never push reported income past the sale.
//! - **IncomeReportEngine**: received income over a range of business-local
//!   days, broken down per currency and method. The breakdown applies the
//!   same per-order cap as the total, so its buckets always sum to the
//!   headline number.
//!
//! Malformed orders never abort a batch: they surface as fault entries on
//! the result, and reports disclose how many orders were excluded.

pub mod error;
pub mod report;
pub mod resolver;

pub use error::SettlementError;
pub use report::{IncomeReport, IncomeReportEngine, PaymentBreakdown};
pub use resolver::{CustomerDebt, DebtResolver, OrderFault, OrderSettlement};
