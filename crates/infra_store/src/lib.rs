//! Storage Adapters
//!
//! The legacy store keeps an order's payment descriptor as a flat row of
//! independently-nullable flags and amounts. This crate is the one place
//! that shape is allowed to exist: `snapshot` decodes the flat records into
//! the domain types exactly once, and `memory` serves the decoded entities
//! through the store ports. Everything downstream works with the sum type.

pub mod error;
pub mod memory;
pub mod snapshot;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use snapshot::{
    decode, decode_installment, decode_order, DecodedSnapshot, InstallmentRecord, OrderRecord,
    RateRecord, Snapshot, SnapshotFault,
};
