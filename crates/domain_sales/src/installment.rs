//! Installment payments ("abonos")

use chrono::{DateTime, Utc};
use core_kernel::{Currency, ExchangeRate, InstallmentId, Money, OrderId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::classifier::{ReceiptChannel, ReceiptLeg};
use crate::error::SalesError;

/// Installment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// Counts toward paid totals
    Confirmed,
    /// Soft-deleted; kept for the audit trail, never summed
    Voided,
}

/// A partial payment recorded after order creation
///
/// Rows are append-only: a confirmed installment is immutable except for
/// the transition to voided. Either currency leg may be zero; both non-zero
/// means a genuinely currency-mixed installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPayment {
    /// Unique identifier
    pub id: InstallmentId,
    /// Order being paid down
    pub order_id: OrderId,
    /// USD leg
    pub usd_amount: Money,
    /// VES leg
    pub ves_amount: Money,
    /// Rate in effect when this installment was taken; legacy rows may
    /// lack one and fall back to the order's snapshot rate
    pub rate_at_payment: Option<ExchangeRate>,
    /// Free-form rail descriptor
    pub method: Option<String>,
    /// Free-form external reference (confirmation number, bank ref)
    pub reference: Option<String>,
    /// Status
    pub status: InstallmentStatus,
    /// When the payment was taken
    pub paid_at: DateTime<Utc>,
}

impl InstallmentPayment {
    /// Creates a confirmed installment
    pub fn new(
        id: InstallmentId,
        order_id: OrderId,
        usd_amount: Decimal,
        ves_amount: Decimal,
        paid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_id,
            usd_amount: Money::usd(usd_amount),
            ves_amount: Money::ves(ves_amount),
            rate_at_payment: None,
            method: None,
            reference: None,
            status: InstallmentStatus::Confirmed,
            paid_at,
        }
    }

    /// Sets the rate in effect at payment time
    pub fn with_rate(mut self, rate: ExchangeRate) -> Self {
        self.rate_at_payment = Some(rate);
        self
    }

    /// Sets the rail descriptor
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the external reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Soft-voids the installment
    pub fn void(&mut self) {
        self.status = InstallmentStatus::Voided;
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == InstallmentStatus::Confirmed
    }

    /// The USD-equivalent receipt legs of this installment
    ///
    /// The VES leg converts with this row's own rate when present, falling
    /// back to the order's snapshot rate for legacy rows; with neither, the
    /// conversion is impossible and surfaces as `MissingRate` on the order.
    pub fn receipt_legs(
        &self,
        order_rate: Option<ExchangeRate>,
    ) -> Result<Vec<ReceiptLeg>, SalesError> {
        let mut legs = Vec::new();

        if !self.usd_amount.is_zero() {
            legs.push(ReceiptLeg::new(
                Currency::USD,
                ReceiptChannel::Installment,
                self.usd_amount,
            ));
        }
        if !self.ves_amount.is_zero() {
            let rate = self
                .rate_at_payment
                .or(order_rate)
                .ok_or(SalesError::MissingRate {
                    order: self.order_id,
                })?;
            legs.push(ReceiptLeg::new(
                Currency::VES,
                ReceiptChannel::Installment,
                rate.to_usd(&self.ves_amount)?,
            ));
        }

        Ok(legs)
    }

    /// The USD-equivalent value of this installment
    pub fn amount_usd(&self, order_rate: Option<ExchangeRate>) -> Result<Money, SalesError> {
        let mut total = Money::zero(Currency::USD);
        for leg in self.receipt_legs(order_rate)? {
            total = total.checked_add(&leg.amount)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn installment(usd: Decimal, ves: Decimal) -> InstallmentPayment {
        InstallmentPayment::new(InstallmentId::new(1), OrderId::new(7), usd, ves, Utc::now())
    }

    #[test]
    fn test_own_rate_takes_priority_over_order_rate() {
        let payment = installment(dec!(0), dec!(1800)).with_rate(ExchangeRate::new(dec!(36.0)).unwrap());
        let order_rate = ExchangeRate::new(dec!(40.0)).unwrap();

        let amount = payment.amount_usd(Some(order_rate)).unwrap();
        assert_eq!(amount.amount(), dec!(50));
    }

    #[test]
    fn test_legacy_row_falls_back_to_order_rate() {
        let payment = installment(dec!(0), dec!(1800));
        let order_rate = ExchangeRate::new(dec!(36.0)).unwrap();

        let amount = payment.amount_usd(Some(order_rate)).unwrap();
        assert_eq!(amount.amount(), dec!(50));
    }

    #[test]
    fn test_ves_leg_with_no_rate_anywhere_fails() {
        let payment = installment(dec!(10), dec!(1800));

        assert_eq!(
            payment.amount_usd(None),
            Err(SalesError::MissingRate {
                order: OrderId::new(7)
            })
        );
    }

    #[test]
    fn test_usd_only_installment_never_needs_a_rate() {
        let payment = installment(dec!(30), dec!(0));

        let amount = payment.amount_usd(None).unwrap();
        assert_eq!(amount.amount(), dec!(30));
    }

    #[test]
    fn test_mixed_installment_produces_two_legs() {
        let payment = installment(dec!(20), dec!(720)).with_rate(ExchangeRate::new(dec!(36.0)).unwrap());

        let legs = payment.receipt_legs(None).unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(payment.amount_usd(None).unwrap().amount(), dec!(40));
    }

    #[test]
    fn test_void_transition() {
        let mut payment = installment(dec!(30), dec!(0));
        assert!(payment.is_confirmed());

        payment.void();
        assert!(!payment.is_confirmed());
        assert_eq!(payment.status, InstallmentStatus::Voided);
    }
}
