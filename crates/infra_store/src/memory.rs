//! In-memory store adapter
//!
//! Serves a decoded snapshot through the domain store ports. Appends and
//! voids mutate only this process's copy; the adapter exists so jobs and
//! tests run against the same trait surface a database adapter would offer.

use std::sync::RwLock;

use core_kernel::{CustomerId, DomainPort, InstallmentId, OrderId, PortError};
use domain_rates::{RateObservation, RateObservationStore};
use domain_sales::{InstallmentPayment, InstallmentStore, Order, OrderStore};

use crate::snapshot::DecodedSnapshot;

#[derive(Debug, Default)]
struct Inner {
    orders: Vec<Order>,
    installments: Vec<InstallmentPayment>,
    observations: Vec<RateObservation>,
}

/// An in-memory implementation of all three store ports
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a decoded snapshot into a fresh store
    pub fn from_decoded(decoded: &DecodedSnapshot) -> Self {
        Self {
            inner: RwLock::new(Inner {
                orders: decoded.orders.clone(),
                installments: decoded.ledger.payments().to_vec(),
                observations: decoded.rates.observations().to_vec(),
            }),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, PortError> {
        self.inner
            .read()
            .map_err(|_| PortError::internal("store lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, PortError> {
        self.inner
            .write()
            .map_err(|_| PortError::internal("store lock poisoned"))
    }
}

impl DomainPort for MemoryStore {}

impl OrderStore for MemoryStore {
    fn order(&self, id: OrderId) -> Result<Option<Order>, PortError> {
        Ok(self.read()?.orders.iter().find(|o| o.id == id).cloned())
    }

    fn orders_for_customer(&self, customer: &CustomerId) -> Result<Vec<Order>, PortError> {
        Ok(self
            .read()?
            .orders
            .iter()
            .filter(|o| &o.customer_id == customer)
            .cloned()
            .collect())
    }

    fn all_orders(&self) -> Result<Vec<Order>, PortError> {
        Ok(self.read()?.orders.clone())
    }
}

impl InstallmentStore for MemoryStore {
    fn installments_for(&self, order: OrderId) -> Result<Vec<InstallmentPayment>, PortError> {
        Ok(self
            .read()?
            .installments
            .iter()
            .filter(|p| p.order_id == order)
            .cloned()
            .collect())
    }

    fn all_installments(&self) -> Result<Vec<InstallmentPayment>, PortError> {
        Ok(self.read()?.installments.clone())
    }

    fn append_installment(&self, payment: InstallmentPayment) -> Result<(), PortError> {
        let mut inner = self.write()?;
        if inner.installments.iter().any(|p| p.id == payment.id) {
            return Err(PortError::conflict(format!(
                "installment {} already exists",
                payment.id
            )));
        }
        inner.installments.push(payment);
        Ok(())
    }

    fn void_installment(&self, id: InstallmentId) -> Result<(), PortError> {
        let mut inner = self.write()?;
        let payment = inner
            .installments
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PortError::not_found("Installment", id))?;
        payment.void();
        Ok(())
    }
}

impl RateObservationStore for MemoryStore {
    fn rate_observations(&self) -> Result<Vec<RateObservation>, PortError> {
        Ok(self.read()?.observations.clone())
    }

    fn append_observation(&self, observation: RateObservation) -> Result<(), PortError> {
        let mut inner = self.write()?;
        if inner.observations.iter().any(|o| o.id == observation.id) {
            return Err(PortError::conflict(format!(
                "observation {} already exists",
                observation.id
            )));
        }
        inner.observations.push(observation);
        Ok(())
    }
}
