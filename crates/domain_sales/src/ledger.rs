//! The installment ledger
//!
//! An append-only view over every installment row, independent of the
//! orders' own inline installment fields. Totals here are deliberately
//! uncapped: the cap against an order's total belongs to settlement, where
//! inline and ledger movements are combined, and applying it twice would
//! hide the overpayment signals reconciliation audits look for.

use core_kernel::{Currency, ExchangeRate, InstallmentId, Money, OrderId, UtcWindow};
use serde::{Deserialize, Serialize};

use crate::classifier::ReceiptLeg;
use crate::error::SalesError;
use crate::installment::InstallmentPayment;

/// All installment rows in a reconciliation snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallmentLedger {
    payments: Vec<InstallmentPayment>,
}

impl InstallmentLedger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from stored rows
    pub fn from_payments(payments: Vec<InstallmentPayment>) -> Self {
        Self { payments }
    }

    /// Returns every row, confirmed or voided
    pub fn payments(&self) -> &[InstallmentPayment] {
        &self.payments
    }

    /// Appends a new row
    pub fn record(&mut self, payment: InstallmentPayment) {
        tracing::debug!(installment = %payment.id, order = %payment.order_id, "installment recorded");
        self.payments.push(payment);
    }

    /// Soft-voids a row by id
    pub fn void(&mut self, id: InstallmentId) -> Result<(), SalesError> {
        let payment = self
            .payments
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(SalesError::InstallmentNotFound(id))?;
        payment.void();
        Ok(())
    }

    /// Confirmed installments for one order
    pub fn confirmed_for(&self, order_id: OrderId) -> impl Iterator<Item = &InstallmentPayment> {
        self.payments
            .iter()
            .filter(move |p| p.order_id == order_id && p.is_confirmed())
    }

    /// Confirmed installments taken inside a UTC window, across all orders
    ///
    /// Installments are dated events in their own right; income reports
    /// count them by their own `paid_at`, not their order's date.
    pub fn confirmed_in_window(&self, window: &UtcWindow) -> impl Iterator<Item = &InstallmentPayment> + '_ {
        let window = *window;
        self.payments
            .iter()
            .filter(move |p| p.is_confirmed() && window.contains(p.paid_at))
    }

    /// USD-equivalent receipt legs of one order's confirmed installments
    pub fn receipt_legs_for(
        &self,
        order_id: OrderId,
        order_rate: Option<ExchangeRate>,
    ) -> Result<Vec<ReceiptLeg>, SalesError> {
        let mut legs = Vec::new();
        for payment in self.confirmed_for(order_id) {
            legs.extend(payment.receipt_legs(order_rate)?);
        }
        Ok(legs)
    }

    /// Total USD-equivalent paid toward one order through the ledger
    ///
    /// Each row converts with its own recorded rate, falling back to the
    /// order's snapshot rate only for legacy rows without one. No capping.
    pub fn total_paid_usd(
        &self,
        order_id: OrderId,
        order_rate: Option<ExchangeRate>,
    ) -> Result<Money, SalesError> {
        let mut total = Money::zero(Currency::USD);
        for payment in self.confirmed_for(order_id) {
            total = total.checked_add(&payment.amount_usd(order_rate)?)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn ledger_with_rows() -> InstallmentLedger {
        let order = OrderId::new(7);
        let mut ledger = InstallmentLedger::new();
        ledger.record(InstallmentPayment::new(
            InstallmentId::new(1),
            order,
            dec!(30),
            dec!(0),
            Utc::now(),
        ));
        ledger.record(
            InstallmentPayment::new(InstallmentId::new(2), order, dec!(0), dec!(720), Utc::now())
                .with_rate(ExchangeRate::new(dec!(36.0)).unwrap()),
        );
        ledger.record(InstallmentPayment::new(
            InstallmentId::new(3),
            OrderId::new(8),
            dec!(99),
            dec!(0),
            Utc::now(),
        ));
        ledger
    }

    #[test]
    fn test_total_sums_only_the_requested_order() {
        let ledger = ledger_with_rows();
        let total = ledger.total_paid_usd(OrderId::new(7), None).unwrap();

        assert_eq!(total.amount(), dec!(50)); // 30 + 720/36
    }

    #[test]
    fn test_voided_rows_do_not_count() {
        let mut ledger = ledger_with_rows();
        ledger.void(InstallmentId::new(1)).unwrap();

        let total = ledger.total_paid_usd(OrderId::new(7), None).unwrap();
        assert_eq!(total.amount(), dec!(20));
    }

    #[test]
    fn test_void_unknown_id_fails() {
        let mut ledger = ledger_with_rows();

        assert_eq!(
            ledger.void(InstallmentId::new(99)),
            Err(SalesError::InstallmentNotFound(InstallmentId::new(99)))
        );
    }

    #[test]
    fn test_totals_are_not_capped_here() {
        // The ledger reports what was actually recorded, even when it
        // exceeds any order total; settlement owns the cap.
        let mut ledger = InstallmentLedger::new();
        let order = OrderId::new(1);
        for i in 0..4 {
            ledger.record(InstallmentPayment::new(
                InstallmentId::new(i),
                order,
                dec!(100),
                dec!(0),
                Utc::now(),
            ));
        }

        let total = ledger.total_paid_usd(order, None).unwrap();
        assert_eq!(total.amount(), dec!(400));
    }
}
