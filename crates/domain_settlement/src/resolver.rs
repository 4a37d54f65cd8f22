//! Per-order settlement and per-customer debt
//!
//! The resolver evaluates the classifier and the installment ledger against
//! the same immutable snapshot of an order, so a rate update landing
//! mid-computation can never be visible to only one of the two.

use std::collections::BTreeSet;

use core_kernel::{Currency, CustomerId, Money, OrderId};
use domain_sales::{classify, InstallmentLedger, Order, PaymentKind};
use serde::{Deserialize, Serialize};

use crate::error::SettlementError;

/// The settled view of one order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSettlement {
    pub order_id: OrderId,
    pub customer_id: CustomerId,
    /// The payment shape the order resolved to
    pub kind: PaymentKind,
    /// USD-equivalent received at order time (classifier output)
    pub at_order: Money,
    /// USD-equivalent received through the installment ledger, uncapped
    pub installments: Money,
    /// Combined received, capped at the order total
    pub total_received: Money,
    /// Order total minus received, floored at zero
    pub outstanding: Money,
}

impl OrderSettlement {
    /// True when the balance is inside the settlement tolerance
    pub fn is_settled(&self) -> bool {
        self.outstanding.is_negligible()
    }
}

/// A per-order failure attached to a batch result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFault {
    pub order_id: OrderId,
    pub reason: String,
}

impl OrderFault {
    pub fn new(order_id: OrderId, error: &SettlementError) -> Self {
        Self {
            order_id,
            reason: error.to_string(),
        }
    }
}

/// Outstanding balance of one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDebt {
    pub customer_id: CustomerId,
    /// Sum of outstanding balances over the open orders below
    pub outstanding: Money,
    /// Non-settled orders, in id order
    pub open_orders: Vec<OrderSettlement>,
    /// Orders that could not be settled because of data errors
    pub faults: Vec<OrderFault>,
}

/// Combines the classifier and the installment ledger into per-order and
/// per-customer balances
#[derive(Debug)]
pub struct DebtResolver<'a> {
    ledger: &'a InstallmentLedger,
}

impl<'a> DebtResolver<'a> {
    pub fn new(ledger: &'a InstallmentLedger) -> Self {
        Self { ledger }
    }

    /// Settles one order
    ///
    /// The inline payment and the ledger rows are additive; their sum is
    /// capped at the order total exactly once, here. Capping earlier (in
    /// the ledger) would hide overpayment signals, capping later would let
    /// legacy double-recordings inflate income.
    pub fn settle(&self, order: &Order) -> Result<OrderSettlement, SettlementError> {
        let classification = classify(order)?;
        let at_order = classification.received;
        let installments = self
            .ledger
            .total_paid_usd(order.id, order.rate_at_order)?;

        let total_received = at_order
            .checked_add(&installments)?
            .clamp_at(&order.total)?;
        let outstanding = order.total.checked_sub(&total_received)?.floor_zero();

        Ok(OrderSettlement {
            order_id: order.id,
            customer_id: order.customer_id.clone(),
            kind: classification.kind,
            at_order,
            installments,
            total_received,
            outstanding,
        })
    }

    /// Aggregates one customer's outstanding balance
    ///
    /// Cancelled orders are skipped; settled orders (outstanding within the
    /// 0.01 tolerance) are excluded from the open list; orders that fail to
    /// settle become faults instead of aborting the aggregation.
    pub fn debt_for(&self, customer_id: &CustomerId, orders: &[Order]) -> CustomerDebt {
        let mut debt = CustomerDebt {
            customer_id: customer_id.clone(),
            outstanding: Money::zero(Currency::USD),
            open_orders: Vec::new(),
            faults: Vec::new(),
        };

        let mut own_orders: Vec<&Order> = orders
            .iter()
            .filter(|o| &o.customer_id == customer_id && !o.is_cancelled())
            .collect();
        own_orders.sort_by_key(|o| o.id);

        for order in own_orders {
            match self.settle(order) {
                Ok(settlement) if settlement.is_settled() => {}
                Ok(settlement) => {
                    debt.outstanding = debt.outstanding + settlement.outstanding;
                    debt.open_orders.push(settlement);
                }
                Err(error) => {
                    tracing::warn!(order = %order.id, %error, "order excluded from debt aggregation");
                    debt.faults.push(OrderFault::new(order.id, &error));
                }
            }
        }

        debt
    }

    /// Debt entries for every customer owing anything (or carrying faults)
    pub fn debts(&self, orders: &[Order]) -> Vec<CustomerDebt> {
        let customers: BTreeSet<&CustomerId> = orders
            .iter()
            .filter(|o| !o.is_cancelled())
            .map(|o| &o.customer_id)
            .collect();

        customers
            .into_iter()
            .map(|customer| self.debt_for(customer, orders))
            .filter(|debt| !debt.open_orders.is_empty() || !debt.faults.is_empty())
            .collect()
    }
}
