//! Property-Based Test Generators
//!
//! Proptest strategies for orders and installments. The monetary strategies
//! are deliberately adversarial: recorded payment amounts are generated
//! independently of order totals, so overpayments and double-recordings
//! appear constantly - exactly the inputs the capping invariants must
//! survive.

use chrono::Duration;
use core_kernel::{ExchangeRate, InstallmentId, OrderId};
use domain_sales::{InstallmentPayment, InstallmentTerms, Order, PaymentDescriptor, PaymentMethod};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::{InstallmentBuilder, OrderBuilder};
use crate::fixtures::TemporalFixtures;

/// Strategy for non-negative USD amounts in cents
pub fn usd_amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for non-negative VES amounts in céntimos
pub fn ves_amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..500_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for valid exchange rates, up to eight decimal places
pub fn exchange_rate_strategy() -> impl Strategy<Value = ExchangeRate> {
    (1i64..40_000_000_000i64)
        .prop_map(|n| ExchangeRate::new(Decimal::new(n, 8)).expect("positive rate"))
}

/// Strategy for payment methods
pub fn payment_method_strategy() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::CashUsd),
        Just(PaymentMethod::Zelle),
        Just(PaymentMethod::CashVes),
        Just(PaymentMethod::PagoMovil),
        Just(PaymentMethod::Transfer),
        Just(PaymentMethod::PointOfSale),
    ]
}

/// Strategy for payment descriptors with amounts unrelated to any total
pub fn payment_descriptor_strategy() -> impl Strategy<Value = PaymentDescriptor> {
    prop_oneof![
        Just(PaymentDescriptor::FullCash),
        (
            usd_amount_strategy(),
            ves_amount_strategy(),
            payment_method_strategy()
        )
            .prop_map(|(usd, ves, ves_method)| {
                PaymentDescriptor::mixed_single(usd, ves, PaymentMethod::CashUsd, ves_method)
            }),
        (usd_amount_strategy(), payment_method_strategy())
            .prop_map(|(amount, method)| {
                PaymentDescriptor::Installment(InstallmentTerms::simple(amount, method))
            }),
        (usd_amount_strategy(), ves_amount_strategy())
            .prop_map(|(usd, ves)| PaymentDescriptor::Installment(InstallmentTerms::mixed(usd, ves))),
        payment_method_strategy().prop_map(|method| PaymentDescriptor::Other { method }),
    ]
}

/// Strategy for orders that always carry a snapshot rate
///
/// Totals and recorded amounts are independent, so a generated order is
/// frequently "overpaid" on paper.
pub fn order_strategy(id: i64) -> impl Strategy<Value = Order> {
    (
        usd_amount_strategy(),
        payment_descriptor_strategy(),
        exchange_rate_strategy(),
    )
        .prop_map(move |(total, payment, rate)| {
            OrderBuilder::new()
                .with_id(id)
                .with_total(total)
                .with_payment(payment)
                .with_rate(rate)
                .build()
        })
}

/// Strategy for confirmed installments against one order
///
/// Roughly half the rows carry their own rate; the rest exercise the
/// fall-back to the order's snapshot rate.
pub fn installments_strategy(order_id: i64) -> impl Strategy<Value = Vec<InstallmentPayment>> {
    proptest::collection::vec(
        (
            usd_amount_strategy(),
            ves_amount_strategy(),
            proptest::option::of(exchange_rate_strategy()),
            0i64..60i64,
        ),
        0..5,
    )
    .prop_map(move |rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (usd, ves, rate, day_offset))| {
                let mut builder = InstallmentBuilder::new()
                    .with_id(i as i64 + 1)
                    .for_order(OrderId::new(order_id))
                    .with_usd(usd)
                    .with_ves(ves)
                    .paid_at(TemporalFixtures::sale_instant() + Duration::days(day_offset));
                if let Some(rate) = rate {
                    builder = builder.with_rate(rate);
                }
                builder.build()
            })
            .collect()
    })
}

/// Strategy for installment ids
pub fn installment_id_strategy() -> impl Strategy<Value = InstallmentId> {
    (1i64..10_000i64).prop_map(InstallmentId::new)
}
