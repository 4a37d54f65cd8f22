//! Flat legacy records and snapshot decoding
//!
//! Records here mirror the legacy rows field for field: nullable amounts,
//! boolean variant flags, free-text method labels. `decode_order` is the
//! boundary that turns a flat row into the payment sum type; rows whose
//! fields belong to two variants at once, or to none cleanly, are rejected
//! with a per-row fault instead of poisoning the whole snapshot.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CustomerId, ExchangeRate, InstallmentId, ObservationId, OrderId, Timezone};
use domain_rates::{RateHistory, RateObservation};
use domain_sales::{
    InstallmentLedger, InstallmentPayment, InstallmentTerms, Order, OrderStatus,
    PaymentDescriptor, PaymentMethod, SalesError,
};

use crate::error::StoreError;

/// A raw order row as the legacy store keeps it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: i64,
    pub customer_tax_id: String,
    pub total_usd: Decimal,
    #[serde(default)]
    pub rate_at_order: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub cancelled: bool,

    // Variant flags and their nullable payload fields. At most one variant
    // may be populated; FullCash is the all-empty row.
    #[serde(default)]
    pub is_installment: bool,
    #[serde(default)]
    pub is_mixed_payment: bool,
    #[serde(default)]
    pub mixed_usd_amount: Option<Decimal>,
    #[serde(default)]
    pub mixed_ves_amount: Option<Decimal>,
    #[serde(default)]
    pub mixed_usd_method: Option<String>,
    #[serde(default)]
    pub mixed_ves_method: Option<String>,
    #[serde(default)]
    pub installment_kind: Option<String>,
    #[serde(default)]
    pub installment_amount: Option<Decimal>,
    #[serde(default)]
    pub installment_method: Option<String>,
    #[serde(default)]
    pub installment_usd_amount: Option<Decimal>,
    #[serde(default)]
    pub installment_ves_amount: Option<Decimal>,
    #[serde(default)]
    pub other_method: Option<String>,
}

/// A raw installment row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentRecord {
    pub id: i64,
    pub order_id: i64,
    #[serde(default)]
    pub usd_amount: Option<Decimal>,
    #[serde(default)]
    pub ves_amount: Option<Decimal>,
    #[serde(default)]
    pub rate_at_payment: Option<Decimal>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub voided: bool,
    pub paid_at: DateTime<Utc>,
}

/// A raw rate observation row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub value: Decimal,
    pub observed_at: DateTime<Utc>,
    #[serde(default)]
    pub source: Option<String>,
}

/// A full store snapshot as shipped to a reconciliation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub orders: Vec<OrderRecord>,
    #[serde(default)]
    pub installments: Vec<InstallmentRecord>,
    #[serde(default)]
    pub rates: Vec<RateRecord>,
}

impl Snapshot {
    /// Reads a snapshot from a JSON stream
    pub fn from_reader(reader: impl Read) -> Result<Self, StoreError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Reads a snapshot from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

/// A row that could not be decoded, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFault {
    /// Which table the row came from
    pub entity: String,
    /// The raw row id
    pub id: i64,
    pub reason: String,
}

/// A snapshot decoded into domain entities
#[derive(Debug)]
pub struct DecodedSnapshot {
    pub orders: Vec<Order>,
    pub ledger: InstallmentLedger,
    pub rates: RateHistory,
    /// Rows dropped during decoding; disclosed, never silently lost
    pub faults: Vec<SnapshotFault>,
}

/// Decodes a snapshot, collecting per-row faults
pub fn decode(snapshot: &Snapshot, timezone: Timezone) -> DecodedSnapshot {
    let mut orders = Vec::with_capacity(snapshot.orders.len());
    let mut payments = Vec::with_capacity(snapshot.installments.len());
    let mut observations = Vec::with_capacity(snapshot.rates.len());
    let mut faults = Vec::new();

    for record in &snapshot.orders {
        match decode_order(record) {
            Ok(order) => orders.push(order),
            Err(error) => {
                tracing::warn!(order = record.id, %error, "order row dropped");
                faults.push(SnapshotFault {
                    entity: "order".to_string(),
                    id: record.id,
                    reason: error.to_string(),
                });
            }
        }
    }

    for record in &snapshot.installments {
        match decode_installment(record) {
            Ok(payment) => payments.push(payment),
            Err(error) => {
                tracing::warn!(installment = record.id, %error, "installment row dropped");
                faults.push(SnapshotFault {
                    entity: "installment".to_string(),
                    id: record.id,
                    reason: error.to_string(),
                });
            }
        }
    }

    for record in &snapshot.rates {
        match ExchangeRate::new(record.value) {
            Ok(_) => {
                let mut observation = RateObservation::new(
                    ObservationId::new(record.id),
                    record.date,
                    record.value,
                    record.observed_at,
                );
                if let Some(source) = &record.source {
                    observation = observation.with_source(source.clone());
                }
                observations.push(observation);
            }
            Err(error) => {
                tracing::warn!(observation = record.id, %error, "rate row dropped");
                faults.push(SnapshotFault {
                    entity: "rate".to_string(),
                    id: record.id,
                    reason: error.to_string(),
                });
            }
        }
    }

    DecodedSnapshot {
        orders,
        ledger: InstallmentLedger::from_payments(payments),
        rates: RateHistory::from_observations(timezone, observations),
        faults,
    }
}

/// Decodes one flat order row into the payment sum type
///
/// This is the only place the nullable-field shape is interpreted; after
/// it, classification is a total match over the four variants.
pub fn decode_order(record: &OrderRecord) -> Result<Order, SalesError> {
    let id = OrderId::new(record.id);
    let inconsistent = |detail: String| SalesError::InconsistentPayment { order: id, detail };

    if record.total_usd < Decimal::ZERO {
        return Err(inconsistent(format!(
            "order total {} is negative",
            record.total_usd
        )));
    }
    check_variant_exclusivity(record, &inconsistent)?;

    let payment = if record.is_mixed_payment {
        let usd = required_amount(record.mixed_usd_amount, "mixed USD amount", &inconsistent)?;
        let ves = required_amount(record.mixed_ves_amount, "mixed VES amount", &inconsistent)?;
        let usd_method = parse_method(&record.mixed_usd_method, "mixed USD method", &inconsistent)?;
        let ves_method = parse_method(&record.mixed_ves_method, "mixed VES method", &inconsistent)?;
        PaymentDescriptor::mixed_single(usd, ves, usd_method, ves_method)
    } else if record.is_installment {
        match record.installment_kind.as_deref() {
            Some("mixed") => {
                let usd = required_amount(
                    record.installment_usd_amount,
                    "installment USD amount",
                    &inconsistent,
                )?;
                let ves = required_amount(
                    record.installment_ves_amount,
                    "installment VES amount",
                    &inconsistent,
                )?;
                PaymentDescriptor::Installment(InstallmentTerms::mixed(usd, ves))
            }
            // Old rows predate the kind column and are all simple.
            Some("simple") | None => {
                let amount = required_amount(
                    record.installment_amount,
                    "installment amount",
                    &inconsistent,
                )?;
                let method =
                    parse_method(&record.installment_method, "installment method", &inconsistent)?;
                PaymentDescriptor::Installment(InstallmentTerms::simple(amount, method))
            }
            Some(other) => {
                return Err(inconsistent(format!("unknown installment kind '{}'", other)))
            }
        }
    } else if record.other_method.is_some() {
        let method = parse_method(&record.other_method, "payment method", &inconsistent)?;
        PaymentDescriptor::Other { method }
    } else {
        PaymentDescriptor::FullCash
    };

    let mut order = Order::new(
        id,
        CustomerId::new(record.customer_tax_id.clone()),
        record.total_usd,
        payment,
        record.created_at,
    );
    // A zero or negative stored rate is as unusable as an absent one; it
    // surfaces as MissingRate only if a conversion actually needs it.
    if let Some(rate) = record.rate_at_order.and_then(|v| ExchangeRate::new(v).ok()) {
        order = order.with_rate(rate);
    }
    if record.cancelled {
        order = order.with_status(OrderStatus::Cancelled);
    }

    Ok(order)
}

/// Decodes one flat installment row
pub fn decode_installment(record: &InstallmentRecord) -> Result<InstallmentPayment, SalesError> {
    let order = OrderId::new(record.order_id);
    let inconsistent = |detail: String| SalesError::InconsistentPayment { order, detail };

    let usd = optional_amount(record.usd_amount, "installment USD amount", &inconsistent)?;
    let ves = optional_amount(record.ves_amount, "installment VES amount", &inconsistent)?;

    let mut payment = InstallmentPayment::new(
        InstallmentId::new(record.id),
        order,
        usd,
        ves,
        record.paid_at,
    );
    if let Some(rate) = record.rate_at_payment.and_then(|v| ExchangeRate::new(v).ok()) {
        payment = payment.with_rate(rate);
    }
    if let Some(method) = &record.method {
        payment = payment.with_method(method.clone());
    }
    if let Some(reference) = &record.reference {
        payment = payment.with_reference(reference.clone());
    }
    if record.voided {
        payment.void();
    }

    Ok(payment)
}

fn check_variant_exclusivity(
    record: &OrderRecord,
    inconsistent: &impl Fn(String) -> SalesError,
) -> Result<(), SalesError> {
    if record.is_installment && record.is_mixed_payment {
        return Err(inconsistent(
            "both installment and mixed-payment flags are set".to_string(),
        ));
    }

    let has_mixed_fields = record.mixed_usd_amount.is_some() || record.mixed_ves_amount.is_some();
    let has_installment_fields = record.installment_amount.is_some()
        || record.installment_usd_amount.is_some()
        || record.installment_ves_amount.is_some();

    if has_mixed_fields && !record.is_mixed_payment {
        return Err(inconsistent(
            "mixed-payment amounts present without the mixed-payment flag".to_string(),
        ));
    }
    if has_installment_fields && !record.is_installment {
        return Err(inconsistent(
            "installment amounts present without the installment flag".to_string(),
        ));
    }
    if record.other_method.is_some() && (record.is_installment || record.is_mixed_payment) {
        return Err(inconsistent(
            "other-rail method present alongside another variant".to_string(),
        ));
    }

    Ok(())
}

fn required_amount(
    value: Option<Decimal>,
    what: &str,
    inconsistent: &impl Fn(String) -> SalesError,
) -> Result<Decimal, SalesError> {
    let amount = value.ok_or_else(|| inconsistent(format!("{} is missing", what)))?;
    if amount < Decimal::ZERO {
        return Err(inconsistent(format!("{} {} is negative", what, amount)));
    }
    Ok(amount)
}

fn optional_amount(
    value: Option<Decimal>,
    what: &str,
    inconsistent: &impl Fn(String) -> SalesError,
) -> Result<Decimal, SalesError> {
    required_amount(Some(value.unwrap_or(Decimal::ZERO)), what, inconsistent)
}

fn parse_method(
    label: &Option<String>,
    what: &str,
    inconsistent: &impl Fn(String) -> SalesError,
) -> Result<PaymentMethod, SalesError> {
    let label = label
        .as_deref()
        .ok_or_else(|| inconsistent(format!("{} is missing", what)))?;
    PaymentMethod::from_label(label)
        .ok_or_else(|| inconsistent(format!("{} '{}' is not a known rail", what, label)))
}
