//! Tests for debt resolution and income reporting

use rust_decimal_macros::dec;

use core_kernel::{Money, Timezone, AMOUNT_TOLERANCE};
use domain_sales::{InstallmentLedger, InstallmentTerms, PaymentDescriptor, PaymentMethod};
use domain_settlement::{DebtResolver, IncomeReportEngine};
use test_utils::{
    assert_money_settled_eq, IdFixtures, InstallmentBuilder, OrderBuilder, RateFixtures,
    TemporalFixtures,
};

// ============================================================================
// Debt Resolution
// ============================================================================

mod duplicate_recording {
    use super::*;

    /// The legacy double-recording case: the order's inline first
    /// installment and a separately recorded ledger row describe the same
    /// real-world $30. The combined cap keeps the order from over-reporting.
    #[test]
    fn inline_and_ledger_duplicates_are_capped_at_the_total() {
        let order = OrderBuilder::new()
            .with_total(dec!(50.00))
            .with_payment(PaymentDescriptor::Installment(InstallmentTerms::simple(
                dec!(30),
                PaymentMethod::CashUsd,
            )))
            .build();

        let ledger = InstallmentLedger::from_payments(vec![InstallmentBuilder::new()
            .for_order(order.id)
            .with_usd(dec!(30))
            .build()]);

        let settlement = DebtResolver::new(&ledger).settle(&order).unwrap();

        assert_eq!(settlement.at_order.amount(), dec!(30));
        assert_eq!(settlement.installments.amount(), dec!(30));
        // Raw sum is 60; the cap lands exactly on the order total.
        assert_eq!(settlement.total_received.amount(), dec!(50.00));
        assert_eq!(settlement.outstanding.amount(), dec!(0));
        assert!(settlement.is_settled());
    }

    #[test]
    fn cap_is_applied_once_not_per_record() {
        // Installments alone exceed the total; at-order money alone does
        // not. Only the combined sum may be capped.
        let order = OrderBuilder::new()
            .with_total(dec!(100.00))
            .with_payment(PaymentDescriptor::Installment(InstallmentTerms::simple(
                dec!(40),
                PaymentMethod::Zelle,
            )))
            .build();

        let ledger = InstallmentLedger::from_payments(vec![
            InstallmentBuilder::new()
                .with_id(1)
                .for_order(order.id)
                .with_usd(dec!(50))
                .build(),
            InstallmentBuilder::new()
                .with_id(2)
                .for_order(order.id)
                .with_usd(dec!(50))
                .build(),
        ]);

        let settlement = DebtResolver::new(&ledger).settle(&order).unwrap();

        // The ledger total stays uncapped for audits.
        assert_eq!(settlement.installments.amount(), dec!(100));
        assert_eq!(settlement.total_received.amount(), dec!(100.00));
        assert_eq!(settlement.outstanding.amount(), dec!(0));
    }
}

mod customer_debt {
    use super::*;

    #[test]
    fn sub_cent_balances_count_as_settled() {
        let customer = IdFixtures::customer();

        let owing = OrderBuilder::new()
            .with_id(1)
            .with_total(dec!(100.00))
            .with_payment(PaymentDescriptor::Installment(InstallmentTerms::simple(
                dec!(20),
                PaymentMethod::CashUsd,
            )))
            .build();
        // $0.005 outstanding: inside the tolerance, treated as settled.
        let nearly_paid = OrderBuilder::new()
            .with_id(2)
            .with_total(dec!(50.00))
            .with_payment(PaymentDescriptor::Installment(InstallmentTerms::simple(
                dec!(49.995),
                PaymentMethod::CashUsd,
            )))
            .build();

        let ledger = InstallmentLedger::new();
        let debt = DebtResolver::new(&ledger).debt_for(&customer, &[owing, nearly_paid]);

        assert_eq!(debt.open_orders.len(), 1);
        assert_eq!(debt.outstanding.amount(), dec!(80.00));
    }

    #[test]
    fn one_bad_order_does_not_blank_the_customer_report() {
        let customer = IdFixtures::customer();

        // Needs a conversion, carries no rate.
        let broken = OrderBuilder::new()
            .with_id(1)
            .with_total(dec!(100.00))
            .without_rate()
            .with_payment(PaymentDescriptor::mixed_single(
                dec!(10),
                dec!(1800),
                PaymentMethod::CashUsd,
                PaymentMethod::PagoMovil,
            ))
            .build();
        let healthy = OrderBuilder::new()
            .with_id(2)
            .with_total(dec!(60.00))
            .with_payment(PaymentDescriptor::Installment(InstallmentTerms::simple(
                dec!(10),
                PaymentMethod::CashUsd,
            )))
            .build();

        let ledger = InstallmentLedger::new();
        let debt = DebtResolver::new(&ledger).debt_for(&customer, &[broken, healthy]);

        assert_eq!(debt.open_orders.len(), 1);
        assert_eq!(debt.outstanding.amount(), dec!(50.00));
        assert_eq!(debt.faults.len(), 1);
        assert!(debt.faults[0].reason.contains("exchange rate"));
    }

    #[test]
    fn debts_cover_every_owing_customer_in_order() {
        let ledger = InstallmentLedger::new();
        let orders = vec![
            OrderBuilder::new()
                .with_id(1)
                .with_customer(IdFixtures::other_customer())
                .with_total(dec!(25.00))
                .with_payment(PaymentDescriptor::Installment(InstallmentTerms::simple(
                    dec!(5),
                    PaymentMethod::CashUsd,
                )))
                .build(),
            OrderBuilder::new()
                .with_id(2)
                .with_customer(IdFixtures::customer())
                .with_total(dec!(40.00))
                .with_payment(PaymentDescriptor::Installment(InstallmentTerms::simple(
                    dec!(15),
                    PaymentMethod::CashUsd,
                )))
                .build(),
            // Fully paid: must not appear at all.
            OrderBuilder::new()
                .with_id(3)
                .with_customer(IdFixtures::customer())
                .with_total(dec!(10.00))
                .build(),
        ];

        let debts = DebtResolver::new(&ledger).debts(&orders);

        assert_eq!(debts.len(), 2);
        // BTree ordering: J-98765432 before V-12345678.
        assert_eq!(debts[0].customer_id, IdFixtures::other_customer());
        assert_eq!(debts[0].outstanding.amount(), dec!(20.00));
        assert_eq!(debts[1].outstanding.amount(), dec!(25.00));
    }
}

// ============================================================================
// Income Reporting
// ============================================================================

mod income_report {
    use super::*;

    #[test]
    fn breakdown_buckets_follow_tender_and_channel() {
        let mixed = OrderBuilder::new()
            .with_id(1)
            .with_total(dec!(100.00))
            .with_rate(RateFixtures::legacy())
            .with_payment(PaymentDescriptor::mixed_single(
                dec!(50),
                dec!(1800),
                PaymentMethod::CashUsd,
                PaymentMethod::PagoMovil,
            ))
            .build();
        let pos = OrderBuilder::new()
            .with_id(2)
            .with_total(dec!(80.00))
            .with_payment(PaymentDescriptor::Other {
                method: PaymentMethod::PointOfSale,
            })
            .build();

        let ledger = InstallmentLedger::new();
        let engine = IncomeReportEngine::new(&ledger, Timezone::default());
        let report = engine.report_for(TemporalFixtures::september(), &[mixed, pos]);

        assert_eq!(report.breakdown.usd_mixed.amount(), dec!(50));
        assert_eq!(report.breakdown.ves_mixed.amount(), dec!(50));
        assert_eq!(report.breakdown.ves_single.amount(), dec!(80));
        assert_eq!(report.total_received.amount(), dec!(180));
        assert_eq!(report.total_sales.amount(), dec!(180));
    }

    #[test]
    fn breakdown_uses_capped_amounts_like_the_total() {
        // The order is overpaid on paper: 30 inline + 30 ledger against a
        // $50 total. Both the total and the buckets must show $50.
        let order = OrderBuilder::new()
            .with_total(dec!(50.00))
            .with_payment(PaymentDescriptor::Installment(InstallmentTerms::simple(
                dec!(30),
                PaymentMethod::CashUsd,
            )))
            .build();
        let ledger = InstallmentLedger::from_payments(vec![InstallmentBuilder::new()
            .for_order(order.id)
            .with_usd(dec!(30))
            .build()]);

        let engine = IncomeReportEngine::new(&ledger, Timezone::default());
        let report = engine.report_for(TemporalFixtures::september(), &[order]);

        assert_eq!(report.total_received.amount(), dec!(50.00));
        assert_eq!(report.breakdown.usd_installments.amount(), dec!(50.00));
        assert_money_settled_eq(&report.breakdown.total(), &report.total_received);
    }

    #[test]
    fn installments_count_by_their_own_date() {
        // August order, September abono: the abono belongs to September's
        // income even though its order does not.
        let order = OrderBuilder::new()
            .with_total(dec!(100.00))
            .created_at(TemporalFixtures::caracas(2025, 8, 10, 15, 0))
            .with_payment(PaymentDescriptor::Installment(InstallmentTerms::simple(
                dec!(20),
                PaymentMethod::CashUsd,
            )))
            .build();
        let ledger = InstallmentLedger::from_payments(vec![InstallmentBuilder::new()
            .for_order(order.id)
            .with_usd(dec!(25))
            .paid_at(TemporalFixtures::caracas(2025, 9, 5, 11, 0))
            .build()]);

        let engine = IncomeReportEngine::new(&ledger, Timezone::default());

        let september = engine.report_for(TemporalFixtures::september(), std::slice::from_ref(&order));
        assert_eq!(september.total_sales.amount(), dec!(0));
        assert_eq!(september.total_received.amount(), dec!(25));
        assert_eq!(september.breakdown.usd_installments.amount(), dec!(25));

        // August sees the order (and all money attached to it).
        let august = engine.report_for(TemporalFixtures::august(), &[order]);
        assert_eq!(august.total_sales.amount(), dec!(100.00));
        assert_eq!(august.total_received.amount(), dec!(45));
    }

    #[test]
    fn excluded_orders_are_disclosed_not_silently_dropped() {
        let broken = OrderBuilder::new()
            .with_id(1)
            .without_rate()
            .with_payment(PaymentDescriptor::mixed_single(
                dec!(10),
                dec!(1800),
                PaymentMethod::CashUsd,
                PaymentMethod::PagoMovil,
            ))
            .build();
        let healthy = OrderBuilder::new().with_id(2).with_total(dec!(60.00)).build();

        let ledger = InstallmentLedger::new();
        let engine = IncomeReportEngine::new(&ledger, Timezone::default());
        let report = engine.report_for(TemporalFixtures::september(), &[broken, healthy]);

        assert_eq!(report.orders_included, 1);
        assert_eq!(report.excluded.len(), 1);
        assert_eq!(report.total_sales.amount(), dec!(60.00));
        assert_eq!(report.total_received.amount(), dec!(60.00));
    }

    #[test]
    fn snapshot_rate_from_the_day_of_sale_drives_conversion() {
        // The rate the history carried on the sale day is the one frozen
        // onto the order, and the one the report converts with.
        let rate = RateFixtures::seeded_history()
            .latest_rate(TemporalFixtures::sale_day())
            .unwrap();
        assert_eq!(rate.value(), rust_decimal_macros::dec!(166.58));

        let order = OrderBuilder::new()
            .with_total(dec!(100.00))
            .with_rate(rate)
            .with_payment(PaymentDescriptor::mixed_single(
                dec!(50.00),
                dec!(8329.00),
                PaymentMethod::CashUsd,
                PaymentMethod::PagoMovil,
            ))
            .build();

        let ledger = InstallmentLedger::new();
        let engine = IncomeReportEngine::new(&ledger, Timezone::default());
        let report = engine.report_for(TemporalFixtures::september(), &[order]);

        // 50 + 8329/166.58 = 50 + 50.0060...; capped at the 100.00 total.
        assert_eq!(report.total_received.amount(), dec!(100.00));
        assert_money_settled_eq(&report.breakdown.total(), &report.total_received);
    }

    #[test]
    fn cancelled_orders_never_reach_the_report() {
        let cancelled = OrderBuilder::new().cancelled().build();

        let ledger = InstallmentLedger::new();
        let engine = IncomeReportEngine::new(&ledger, Timezone::default());
        let report = engine.report_for(TemporalFixtures::september(), &[cancelled]);

        assert!(report.total_sales.is_zero());
        assert!(report.total_received.is_zero());
        assert_eq!(report.orders_included, 0);
    }
}

// ============================================================================
// Invariants (property-based)
// ============================================================================

mod invariants {
    use super::*;
    use proptest::prelude::*;
    use test_utils::{installments_strategy, order_strategy};

    proptest! {
        /// Received income never exceeds the order total, for any
        /// combination of recorded payments - including adversarial ones
        /// where the records sum past the total.
        #[test]
        fn received_is_capped_and_outstanding_non_negative(
            order in order_strategy(1),
            installments in installments_strategy(1)
        ) {
            let ledger = InstallmentLedger::from_payments(installments);
            let settlement = DebtResolver::new(&ledger).settle(&order).unwrap();

            prop_assert!(settlement.total_received.amount() <= order.total.amount());
            prop_assert!(settlement.outstanding.amount() >= rust_decimal::Decimal::ZERO);
            prop_assert!(settlement.total_received.amount() >= rust_decimal::Decimal::ZERO);
        }

        /// The breakdown always sums to the received total, and income
        /// never exceeds sales when all money belongs to in-range orders.
        #[test]
        fn report_breakdown_matches_total_and_income_stays_below_sales(
            order in order_strategy(1),
            installments in installments_strategy(1)
        ) {
            let ledger = InstallmentLedger::from_payments(installments);
            let engine = IncomeReportEngine::new(&ledger, Timezone::default());
            let report = engine.report_for(TemporalFixtures::september(), std::slice::from_ref(&order));

            prop_assert!(report.excluded.is_empty());

            let diff = (report.breakdown.total().amount() - report.total_received.amount()).abs();
            prop_assert!(diff <= AMOUNT_TOLERANCE);
            prop_assert!(report.total_received.amount() <= report.total_sales.amount());
        }

        /// Settlement and reporting agree on the received amount for an
        /// in-range order.
        #[test]
        fn resolver_and_report_agree(
            order in order_strategy(1),
            installments in installments_strategy(1)
        ) {
            let ledger = InstallmentLedger::from_payments(installments);
            let settlement = DebtResolver::new(&ledger).settle(&order).unwrap();

            let engine = IncomeReportEngine::new(&ledger, Timezone::default());
            let report = engine.report_for(TemporalFixtures::september(), std::slice::from_ref(&order));

            prop_assert_eq!(report.total_received.amount(), settlement.total_received.amount());
        }
    }

    #[test]
    fn settled_total_is_money_not_panic_on_zero_total() {
        // Degenerate but observed: a zero-total order with recorded money.
        let order = OrderBuilder::new()
            .with_total(dec!(0))
            .with_payment(PaymentDescriptor::Installment(InstallmentTerms::simple(
                dec!(10),
                PaymentMethod::CashUsd,
            )))
            .build();
        let ledger = InstallmentLedger::new();

        let settlement = DebtResolver::new(&ledger).settle(&order).unwrap();
        assert_eq!(settlement.total_received, Money::usd(dec!(0)));
        assert!(settlement.is_settled());
    }
}
