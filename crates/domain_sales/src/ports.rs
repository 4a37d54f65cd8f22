//! Storage ports for orders and installments

use core_kernel::{CustomerId, DomainPort, InstallmentId, OrderId, PortError};

use crate::installment::InstallmentPayment;
use crate::order::Order;

/// Query boundary for orders
///
/// Orders returned here already carry the decoded payment descriptor; the
/// flat-to-sum-type conversion happens inside the adapter, once.
pub trait OrderStore: DomainPort {
    /// Looks up one order by id
    fn order(&self, id: OrderId) -> Result<Option<Order>, PortError>;

    /// All orders for one customer
    fn orders_for_customer(&self, customer: &CustomerId) -> Result<Vec<Order>, PortError>;

    /// Every order in the snapshot
    fn all_orders(&self) -> Result<Vec<Order>, PortError>;
}

/// Query and append boundary for installment rows
pub trait InstallmentStore: DomainPort {
    /// All rows for one order, confirmed and voided
    fn installments_for(&self, order: OrderId) -> Result<Vec<InstallmentPayment>, PortError>;

    /// Every row in the snapshot
    fn all_installments(&self) -> Result<Vec<InstallmentPayment>, PortError>;

    /// Appends a new row; duplicate ids are a conflict
    fn append_installment(&self, payment: InstallmentPayment) -> Result<(), PortError>;

    /// Soft-voids a row by id
    fn void_installment(&self, id: InstallmentId) -> Result<(), PortError>;
}
