//! Test Data Builders
//!
//! Builder patterns for constructing test orders and installments with
//! sensible defaults, so tests specify only the fields they care about.

use chrono::{DateTime, Utc};
use core_kernel::{CustomerId, ExchangeRate, InstallmentId, OrderId};
use domain_sales::{InstallmentPayment, Order, OrderStatus, PaymentDescriptor};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{IdFixtures, RateFixtures, TemporalFixtures};

/// Builder for test orders
pub struct OrderBuilder {
    id: OrderId,
    customer_id: CustomerId,
    total_usd: Decimal,
    rate: Option<ExchangeRate>,
    payment: PaymentDescriptor,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl Default for OrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBuilder {
    /// Creates a builder with default values: a $100 full-cash order for
    /// the standard customer on the standard sale day
    pub fn new() -> Self {
        Self {
            id: IdFixtures::order_id(),
            customer_id: IdFixtures::customer(),
            total_usd: dec!(100.00),
            rate: Some(RateFixtures::current()),
            payment: PaymentDescriptor::FullCash,
            status: OrderStatus::Active,
            created_at: TemporalFixtures::sale_instant(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = OrderId::new(id);
        self
    }

    pub fn with_customer(mut self, customer: CustomerId) -> Self {
        self.customer_id = customer;
        self
    }

    pub fn with_total(mut self, total_usd: Decimal) -> Self {
        self.total_usd = total_usd;
        self
    }

    pub fn with_rate(mut self, rate: ExchangeRate) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn without_rate(mut self) -> Self {
        self.rate = None;
        self
    }

    pub fn with_payment(mut self, payment: PaymentDescriptor) -> Self {
        self.payment = payment;
        self
    }

    pub fn cancelled(mut self) -> Self {
        self.status = OrderStatus::Cancelled;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn build(self) -> Order {
        let mut order = Order::new(
            self.id,
            self.customer_id,
            self.total_usd,
            self.payment,
            self.created_at,
        )
        .with_status(self.status);
        if let Some(rate) = self.rate {
            order = order.with_rate(rate);
        }
        order
    }
}

/// Builder for test installments
pub struct InstallmentBuilder {
    id: InstallmentId,
    order_id: OrderId,
    usd_amount: Decimal,
    ves_amount: Decimal,
    rate: Option<ExchangeRate>,
    method: Option<String>,
    paid_at: DateTime<Utc>,
    voided: bool,
}

impl Default for InstallmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallmentBuilder {
    /// Creates a builder with default values: a confirmed $30 USD abono
    /// against the standard order
    pub fn new() -> Self {
        Self {
            id: IdFixtures::installment_id(),
            order_id: IdFixtures::order_id(),
            usd_amount: dec!(30.00),
            ves_amount: dec!(0),
            rate: None,
            method: None,
            paid_at: TemporalFixtures::sale_instant(),
            voided: false,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = InstallmentId::new(id);
        self
    }

    pub fn for_order(mut self, order_id: OrderId) -> Self {
        self.order_id = order_id;
        self
    }

    pub fn with_usd(mut self, amount: Decimal) -> Self {
        self.usd_amount = amount;
        self
    }

    pub fn with_ves(mut self, amount: Decimal) -> Self {
        self.ves_amount = amount;
        self
    }

    pub fn with_rate(mut self, rate: ExchangeRate) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn paid_at(mut self, at: DateTime<Utc>) -> Self {
        self.paid_at = at;
        self
    }

    pub fn voided(mut self) -> Self {
        self.voided = true;
        self
    }

    pub fn build(self) -> InstallmentPayment {
        let mut payment = InstallmentPayment::new(
            self.id,
            self.order_id,
            self.usd_amount,
            self.ves_amount,
            self.paid_at,
        );
        if let Some(rate) = self.rate {
            payment = payment.with_rate(rate);
        }
        if let Some(method) = self.method {
            payment = payment.with_method(method);
        }
        if self.voided {
            payment.void();
        }
        payment
    }
}
