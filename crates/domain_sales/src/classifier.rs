//! Payment classification
//!
//! Turns an order's payment descriptor into the money actually received at
//! order-creation time, expressed as USD-equivalent receipt legs. Ledger
//! installments recorded after the sale are deliberately not visible here;
//! combining the two is the settlement crate's job.

use core_kernel::{Currency, ExchangeRate, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SalesError;
use crate::order::{InstallmentTerms, Order, PaymentDescriptor};

/// The payment shape an order resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentKind {
    FullCash,
    MixedSingle,
    InstallmentSimple,
    InstallmentMixed,
    Other,
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentKind::FullCash => "full-cash",
            PaymentKind::MixedSingle => "mixed-single",
            PaymentKind::InstallmentSimple => "installment-simple",
            PaymentKind::InstallmentMixed => "installment-mixed",
            PaymentKind::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Which reporting bucket a receipt belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptChannel {
    /// Full payment in dollar bills
    Cash,
    /// One leg of a currency-mixed single payment
    Mixed,
    /// An installment, inline or from the ledger
    Installment,
    /// A single VES-rail payment recorded pre-converted
    Single,
}

/// One received amount: the tender currency, its reporting channel, and
/// the USD-equivalent value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLeg {
    /// Currency the money physically arrived in
    pub tender: Currency,
    /// Reporting bucket
    pub channel: ReceiptChannel,
    /// USD-equivalent amount
    pub amount: Money,
}

impl ReceiptLeg {
    pub fn new(tender: Currency, channel: ReceiptChannel, amount: Money) -> Self {
        Self {
            tender,
            channel,
            amount,
        }
    }
}

/// Classification result for one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// The payment shape
    pub kind: PaymentKind,
    /// USD-equivalent received at order time, capped at the order total
    pub received: Money,
    /// Uncapped per-leg detail behind `received`
    pub legs: Vec<ReceiptLeg>,
}

/// Returns the payment shape of an order
pub fn payment_kind(order: &Order) -> PaymentKind {
    match &order.payment {
        PaymentDescriptor::FullCash => PaymentKind::FullCash,
        PaymentDescriptor::MixedSingle { .. } => PaymentKind::MixedSingle,
        PaymentDescriptor::Installment(InstallmentTerms::Simple { .. }) => {
            PaymentKind::InstallmentSimple
        }
        PaymentDescriptor::Installment(InstallmentTerms::Mixed { .. }) => {
            PaymentKind::InstallmentMixed
        }
        PaymentDescriptor::Other { .. } => PaymentKind::Other,
    }
}

/// The money received at order-creation time, one leg per tender
///
/// VES legs convert with the order's snapshot rate; an order that needs a
/// conversion without a usable rate fails with `MissingRate`. Zero VES legs
/// are omitted so they never demand a rate.
pub fn receipt_legs(order: &Order) -> Result<Vec<ReceiptLeg>, SalesError> {
    let mut legs = Vec::new();

    match &order.payment {
        PaymentDescriptor::FullCash => {
            legs.push(ReceiptLeg::new(
                Currency::USD,
                ReceiptChannel::Cash,
                order.total,
            ));
        }
        PaymentDescriptor::MixedSingle {
            usd_amount,
            ves_amount,
            ..
        } => {
            legs.push(ReceiptLeg::new(
                Currency::USD,
                ReceiptChannel::Mixed,
                *usd_amount,
            ));
            if !ves_amount.is_zero() {
                let rate = snapshot_rate(order)?;
                legs.push(ReceiptLeg::new(
                    Currency::VES,
                    ReceiptChannel::Mixed,
                    rate.to_usd(ves_amount)?,
                ));
            }
        }
        PaymentDescriptor::Installment(InstallmentTerms::Simple { amount, method }) => {
            match method.currency() {
                Currency::USD => legs.push(ReceiptLeg::new(
                    Currency::USD,
                    ReceiptChannel::Installment,
                    *amount,
                )),
                Currency::VES => {
                    let rate = snapshot_rate(order)?;
                    legs.push(ReceiptLeg::new(
                        Currency::VES,
                        ReceiptChannel::Installment,
                        rate.to_usd(amount)?,
                    ));
                }
            }
        }
        PaymentDescriptor::Installment(InstallmentTerms::Mixed {
            usd_amount,
            ves_amount,
        }) => {
            legs.push(ReceiptLeg::new(
                Currency::USD,
                ReceiptChannel::Installment,
                *usd_amount,
            ));
            if !ves_amount.is_zero() {
                let rate = snapshot_rate(order)?;
                legs.push(ReceiptLeg::new(
                    Currency::VES,
                    ReceiptChannel::Installment,
                    rate.to_usd(ves_amount)?,
                ));
            }
        }
        PaymentDescriptor::Other { .. } => {
            // The rail is VES but the stored total is already the converted
            // USD amount, by convention of those rails.
            legs.push(ReceiptLeg::new(
                Currency::VES,
                ReceiptChannel::Single,
                order.total,
            ));
        }
    }

    Ok(legs)
}

/// Classifies an order's at-creation payment
///
/// The returned `received` is capped at the order total: data-entry errors
/// can record more money than the order is worth, and income reports must
/// never exceed sales because of them. The `legs` keep the uncapped detail
/// for reconciliation audits.
pub fn classify(order: &Order) -> Result<Classification, SalesError> {
    let legs = receipt_legs(order)?;
    let raw = sum_legs(&legs)?;
    let received = raw.clamp_at(&order.total)?;

    Ok(Classification {
        kind: payment_kind(order),
        received,
        legs,
    })
}

/// Sums USD-equivalent leg amounts
pub fn sum_legs(legs: &[ReceiptLeg]) -> Result<Money, SalesError> {
    let mut total = Money::zero(Currency::USD);
    for leg in legs {
        total = total.checked_add(&leg.amount)?;
    }
    Ok(total)
}

fn snapshot_rate(order: &Order) -> Result<ExchangeRate, SalesError> {
    order
        .rate_at_order
        .ok_or(SalesError::MissingRate { order: order.id })
}
