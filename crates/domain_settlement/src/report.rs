//! Income reporting over a range of business-local days
//!
//! The report's central correctness property is that the per-method
//! breakdown sums exactly to the headline received total. The legacy
//! scripts broke this repeatedly by capping the total but not the detail;
//! here both come from the same capped per-order legs.

use core_kernel::{Currency, DateRange, Money, Timezone, UtcWindow};
use domain_sales::{
    receipt_legs, sum_legs, InstallmentLedger, Order, ReceiptChannel, ReceiptLeg,
};
use serde::{Deserialize, Serialize};

use crate::error::SettlementError;
use crate::resolver::OrderFault;

/// Per-currency, per-method decomposition of received income
///
/// Every field is a USD-equivalent amount; `total` is their exact sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    /// Full payments in dollar bills
    pub usd_cash: Money,
    /// USD legs of currency-mixed single payments
    pub usd_mixed: Money,
    /// USD installment legs, inline and from the ledger
    pub usd_installments: Money,
    /// VES-rail single payments recorded pre-converted
    pub ves_single: Money,
    /// VES legs of currency-mixed single payments
    pub ves_mixed: Money,
    /// VES installment legs, inline and from the ledger
    pub ves_installments: Money,
}

impl PaymentBreakdown {
    pub fn zero() -> Self {
        Self {
            usd_cash: Money::zero(Currency::USD),
            usd_mixed: Money::zero(Currency::USD),
            usd_installments: Money::zero(Currency::USD),
            ves_single: Money::zero(Currency::USD),
            ves_mixed: Money::zero(Currency::USD),
            ves_installments: Money::zero(Currency::USD),
        }
    }

    /// Adds one receipt leg to its bucket
    fn accumulate(&mut self, leg: &ReceiptLeg) {
        let bucket = match (leg.tender, leg.channel) {
            (Currency::USD, ReceiptChannel::Installment) => &mut self.usd_installments,
            (Currency::USD, ReceiptChannel::Mixed) => &mut self.usd_mixed,
            (Currency::USD, _) => &mut self.usd_cash,
            (Currency::VES, ReceiptChannel::Installment) => &mut self.ves_installments,
            (Currency::VES, ReceiptChannel::Mixed) => &mut self.ves_mixed,
            (Currency::VES, _) => &mut self.ves_single,
        };
        *bucket = *bucket + leg.amount;
    }

    /// Sum of all buckets
    pub fn total(&self) -> Money {
        self.usd_cash
            + self.usd_mixed
            + self.usd_installments
            + self.ves_single
            + self.ves_mixed
            + self.ves_installments
    }
}

impl Default for PaymentBreakdown {
    fn default() -> Self {
        Self::zero()
    }
}

/// Income over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeReport {
    pub range: DateRange,
    /// Sum of order totals created in range (non-cancelled)
    pub total_sales: Money,
    /// Capped received income attributable to the range
    pub total_received: Money,
    /// Per-currency, per-method detail; sums to `total_received`
    pub breakdown: PaymentBreakdown,
    /// In-range orders that contributed to the totals
    pub orders_included: usize,
    /// Orders excluded because of data errors, with reasons
    pub excluded: Vec<OrderFault>,
}

/// Builds income reports from an order set and the installment ledger
#[derive(Debug)]
pub struct IncomeReportEngine<'a> {
    ledger: &'a InstallmentLedger,
    timezone: Timezone,
}

impl<'a> IncomeReportEngine<'a> {
    pub fn new(ledger: &'a InstallmentLedger, timezone: Timezone) -> Self {
        Self { ledger, timezone }
    }

    /// Computes the income report for a range of business-local days
    ///
    /// In-range orders contribute their full capped received amount.
    /// Installments are dated events: a confirmed row whose `paid_at`
    /// falls in range is counted even when its parent order does not,
    /// under the installment buckets. Orders with data errors are excluded
    /// from both totals and disclosed in `excluded`.
    pub fn report_for(&self, range: DateRange, orders: &[Order]) -> IncomeReport {
        let window = range.to_utc_window(&self.timezone);
        let mut report = IncomeReport {
            range,
            total_sales: Money::zero(Currency::USD),
            total_received: Money::zero(Currency::USD),
            breakdown: PaymentBreakdown::zero(),
            orders_included: 0,
            excluded: Vec::new(),
        };

        for order in orders.iter().filter(|o| !o.is_cancelled()) {
            if window.contains(order.created_at) {
                match self.order_contribution(order) {
                    Ok((received, legs)) => {
                        report.total_sales = report.total_sales + order.total;
                        report.total_received = report.total_received + received;
                        for leg in &legs {
                            report.breakdown.accumulate(leg);
                        }
                        report.orders_included += 1;
                    }
                    Err(error) => {
                        tracing::warn!(order = %order.id, %error, "order excluded from income report");
                        report.excluded.push(OrderFault::new(order.id, &error));
                    }
                }
            } else {
                match self.stray_installment_legs(order, &window) {
                    Ok(legs) => {
                        for leg in &legs {
                            report.total_received = report.total_received + leg.amount;
                            report.breakdown.accumulate(leg);
                        }
                    }
                    Err(error) => {
                        tracing::warn!(order = %order.id, %error, "installments excluded from income report");
                        report.excluded.push(OrderFault::new(order.id, &error));
                    }
                }
            }
        }

        report
    }

    /// Capped received amount and cap-consistent legs for an in-range order
    ///
    /// When the raw legs exceed the order total, the capped amount is
    /// spread back over the legs so the breakdown stays in lockstep with
    /// the total.
    fn order_contribution(
        &self,
        order: &Order,
    ) -> Result<(Money, Vec<ReceiptLeg>), SettlementError> {
        let mut legs = receipt_legs(order)?;
        legs.extend(self.ledger.receipt_legs_for(order.id, order.rate_at_order)?);

        let raw = sum_legs(&legs)?;
        let received = raw.clamp_at(&order.total)?;
        if raw.amount() > received.amount() {
            legs = allocate_capped(&legs, &received, &raw);
        }

        Ok((received, legs))
    }

    /// In-window installment legs of an order created outside the window
    fn stray_installment_legs(
        &self,
        order: &Order,
        window: &UtcWindow,
    ) -> Result<Vec<ReceiptLeg>, SettlementError> {
        let mut legs = Vec::new();
        for payment in self
            .ledger
            .confirmed_for(order.id)
            .filter(|p| window.contains(p.paid_at))
        {
            legs.extend(payment.receipt_legs(order.rate_at_order)?);
        }
        Ok(legs)
    }
}

/// Scales legs so they sum exactly to the capped amount
///
/// Each leg takes its proportional share; the final leg absorbs the
/// division remainder so the reallocated legs reproduce `capped` to the
/// last digit.
fn allocate_capped(legs: &[ReceiptLeg], capped: &Money, raw: &Money) -> Vec<ReceiptLeg> {
    let mut allocated = Money::zero(Currency::USD);
    let mut scaled = Vec::with_capacity(legs.len());

    for (i, leg) in legs.iter().enumerate() {
        let amount = if i == legs.len() - 1 {
            *capped - allocated
        } else {
            let share = Money::usd(leg.amount.amount() * capped.amount() / raw.amount());
            allocated = allocated + share;
            share
        };
        scaled.push(ReceiptLeg::new(leg.tender, leg.channel, amount));
    }

    scaled
}
