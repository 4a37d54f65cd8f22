//! Core Kernel - Foundational types for the dual-currency sales ledger
//!
//! This crate provides the building blocks used across all domain modules:
//! - Money and exchange-rate types with precise decimal arithmetic
//! - Business-calendar temporal types (the shop reconciles on Caracas days)
//! - Strongly-typed record identifiers
//! - Port abstractions for the storage boundary

pub mod error;
pub mod identifiers;
pub mod money;
pub mod ports;
pub mod temporal;

pub use error::CoreError;
pub use identifiers::{CustomerId, InstallmentId, ObservationId, OrderId};
pub use money::{Currency, ExchangeRate, Money, MoneyError, AMOUNT_TOLERANCE};
pub use ports::{DomainPort, PortError};
pub use temporal::{DateRange, TemporalError, Timezone, UtcWindow};
