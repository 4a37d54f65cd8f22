//! Orders and their payment descriptors

use chrono::{DateTime, Utc};
use core_kernel::{Currency, CustomerId, ExchangeRate, Money, MoneyError, OrderId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment rail for money received at the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// US dollar bills
    CashUsd,
    /// Zelle transfer (USD)
    Zelle,
    /// Bolívar bills
    CashVes,
    /// Pago Móvil interbank transfer (VES)
    PagoMovil,
    /// Bank transfer (VES)
    Transfer,
    /// Card terminal / punto de venta (VES)
    PointOfSale,
}

impl PaymentMethod {
    /// The currency this rail is denominated in
    pub fn currency(&self) -> Currency {
        match self {
            PaymentMethod::CashUsd | PaymentMethod::Zelle => Currency::USD,
            PaymentMethod::CashVes
            | PaymentMethod::PagoMovil
            | PaymentMethod::Transfer
            | PaymentMethod::PointOfSale => Currency::VES,
        }
    }

    /// The label the order-entry UI writes into the store
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CashUsd => "Efectivo (USD)",
            PaymentMethod::Zelle => "Zelle",
            PaymentMethod::CashVes => "Efectivo (Bs)",
            PaymentMethod::PagoMovil => "Pago Móvil",
            PaymentMethod::Transfer => "Transferencia",
            PaymentMethod::PointOfSale => "Punto de Venta",
        }
    }

    /// Parses a stored label, tolerating case, spacing, and missing accents
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'á' => 'a',
                'é' => 'e',
                'í' => 'i',
                'ó' => 'o',
                'ú' => 'u',
                c => c,
            })
            .collect();

        match normalized.as_str() {
            "efectivo (usd)" | "efectivo usd" | "cash usd" => Some(PaymentMethod::CashUsd),
            "zelle" => Some(PaymentMethod::Zelle),
            "efectivo (bs)" | "efectivo bs" | "efectivo (ves)" => Some(PaymentMethod::CashVes),
            "pago movil" | "pagomovil" => Some(PaymentMethod::PagoMovil),
            "transferencia" | "transfer" => Some(PaymentMethod::Transfer),
            "punto de venta" | "pos" => Some(PaymentMethod::PointOfSale),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The inline first installment recorded on the order row itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentTerms {
    /// One amount on one rail
    Simple { amount: Money, method: PaymentMethod },
    /// A first installment split across both currencies
    Mixed { usd_amount: Money, ves_amount: Money },
}

impl InstallmentTerms {
    /// A single-rail first installment; the amount is denominated in the
    /// rail's currency
    pub fn simple(amount: Decimal, method: PaymentMethod) -> Self {
        InstallmentTerms::Simple {
            amount: Money::new(amount, method.currency()),
            method,
        }
    }

    /// A currency-mixed first installment
    pub fn mixed(usd_amount: Decimal, ves_amount: Decimal) -> Self {
        InstallmentTerms::Mixed {
            usd_amount: Money::usd(usd_amount),
            ves_amount: Money::ves(ves_amount),
        }
    }
}

/// How an order was paid at creation time
///
/// Exactly one variant applies per order. The legacy store spreads this
/// over nullable flag/amount columns; decoding into this enum happens once
/// at the data-access boundary so downstream logic never re-interprets
/// the flat fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentDescriptor {
    /// The full total received in USD at order time
    FullCash,
    /// One payment event split across both currencies
    MixedSingle {
        usd_amount: Money,
        ves_amount: Money,
        usd_method: PaymentMethod,
        ves_method: PaymentMethod,
    },
    /// An inline first installment; the balance arrives later as ledger rows
    Installment(InstallmentTerms),
    /// A VES-rail payment recorded with the total already converted to USD
    Other { method: PaymentMethod },
}

impl PaymentDescriptor {
    /// A currency-mixed single payment
    pub fn mixed_single(
        usd_amount: Decimal,
        ves_amount: Decimal,
        usd_method: PaymentMethod,
        ves_method: PaymentMethod,
    ) -> Self {
        PaymentDescriptor::MixedSingle {
            usd_amount: Money::usd(usd_amount),
            ves_amount: Money::ves(ves_amount),
            usd_method,
            ves_method,
        }
    }

    /// Returns true for orders sold on installment terms
    pub fn is_installment(&self) -> bool {
        matches!(self, PaymentDescriptor::Installment(_))
    }
}

/// Order lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Counted in income and debt aggregations
    Active,
    /// Excluded from every aggregation
    Cancelled,
}

/// A sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Externally-assigned identifier (gaps permitted)
    pub id: OrderId,
    /// Fiscal id of the buyer
    pub customer_id: CustomerId,
    /// Authoritative amount owed, in USD, fixed at creation
    pub total: Money,
    /// VES-per-USD snapshot taken when the order was created; `None` when
    /// the stored value was absent or unusable
    pub rate_at_order: Option<ExchangeRate>,
    /// How the order was paid at creation time
    pub payment: PaymentDescriptor,
    /// Lifecycle state
    pub status: OrderStatus,
    /// When the sale happened
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates an active order
    pub fn new(
        id: OrderId,
        customer_id: CustomerId,
        total_usd: Decimal,
        payment: PaymentDescriptor,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_id,
            total: Money::usd(total_usd),
            rate_at_order: None,
            payment,
            status: OrderStatus::Active,
            created_at,
        }
    }

    /// Sets the snapshot exchange rate
    pub fn with_rate(mut self, rate: ExchangeRate) -> Self {
        self.rate_at_order = Some(rate);
        self
    }

    /// Sets the lifecycle state
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }

    /// Applies an explicit reconciliation edit to the order total
    ///
    /// The total is otherwise fixed at creation; this is the one sanctioned
    /// mutation path, used when line-item recomputation detects drift.
    pub fn correct_total(&mut self, corrected: Money) -> Result<(), MoneyError> {
        corrected.ensure_currency(Currency::USD)?;
        if corrected.is_negative() {
            return Err(MoneyError::InvalidAmount(format!(
                "corrected total {} is negative",
                corrected
            )));
        }
        tracing::info!(order = %self.id, old = %self.total, new = %corrected, "order total corrected");
        self.total = corrected;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_method_labels_round_trip() {
        for method in [
            PaymentMethod::CashUsd,
            PaymentMethod::Zelle,
            PaymentMethod::CashVes,
            PaymentMethod::PagoMovil,
            PaymentMethod::Transfer,
            PaymentMethod::PointOfSale,
        ] {
            assert_eq!(PaymentMethod::from_label(method.label()), Some(method));
        }
    }

    #[test]
    fn test_method_label_parsing_is_lenient() {
        assert_eq!(
            PaymentMethod::from_label("  pago movil "),
            Some(PaymentMethod::PagoMovil)
        );
        assert_eq!(
            PaymentMethod::from_label("PAGO MÓVIL"),
            Some(PaymentMethod::PagoMovil)
        );
        assert_eq!(PaymentMethod::from_label("criptomoneda"), None);
    }

    #[test]
    fn test_simple_terms_follow_rail_currency() {
        let usd = InstallmentTerms::simple(dec!(30), PaymentMethod::CashUsd);
        let ves = InstallmentTerms::simple(dec!(1200), PaymentMethod::PagoMovil);

        match usd {
            InstallmentTerms::Simple { amount, .. } => {
                assert_eq!(amount.currency(), Currency::USD)
            }
            _ => panic!("expected simple terms"),
        }
        match ves {
            InstallmentTerms::Simple { amount, .. } => {
                assert_eq!(amount.currency(), Currency::VES)
            }
            _ => panic!("expected simple terms"),
        }
    }

    #[test]
    fn test_correct_total_rejects_bad_values() {
        let mut order = Order::new(
            OrderId::new(1),
            CustomerId::new("V-12345678"),
            dec!(100),
            PaymentDescriptor::FullCash,
            Utc::now(),
        );

        assert!(order.correct_total(Money::usd(dec!(-5))).is_err());
        assert!(order.correct_total(Money::ves(dec!(100))).is_err());

        order.correct_total(Money::usd(dec!(98.50))).unwrap();
        assert_eq!(order.total.amount(), dec!(98.50));
    }
}
