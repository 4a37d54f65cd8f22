//! Command implementations
//!
//! Each command loads the snapshot, decodes it once at the store boundary,
//! and drives the domain logic through the store ports. Results print as
//! JSON for the surrounding automation to consume.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use core_kernel::{DateRange, OrderId, Timezone};
use domain_rates::{RateHistory, RateObservationStore};
use domain_sales::{InstallmentLedger, InstallmentStore, OrderStore};
use domain_settlement::{DebtResolver, IncomeReportEngine};
use infra_store::{decode, MemoryStore, Snapshot};

use crate::config::CliConfig;

/// Submits a candidate rate to the history, persisting through the port
/// only when the dedup rule accepts it
pub fn record_rate(config: &CliConfig, snapshot_path: &str, value: Decimal) -> Result<()> {
    let (store, timezone) = load(config, snapshot_path)?;

    let mut history =
        RateHistory::from_observations(timezone, store.rate_observations()?);
    let outcome = history.record_observation(value, Utc::now())?;

    if outcome.inserted {
        if let Some(observation) = history.observations().last() {
            store.append_observation(observation.clone())?;
        }
        tracing::info!(rate = %outcome.rate, "rate observation stored");
    } else {
        tracing::info!(rate = %outcome.rate, "rate unchanged, nothing stored");
    }

    print_json(&outcome)
}

/// Prints the income report for a range of business days
pub fn income_report(
    config: &CliConfig,
    snapshot_path: &str,
    from: NaiveDate,
    to: Option<NaiveDate>,
) -> Result<()> {
    let (store, timezone) = load(config, snapshot_path)?;

    let orders = store.all_orders()?;
    let ledger = InstallmentLedger::from_payments(store.all_installments()?);
    let range = DateRange::new(from, to.unwrap_or(from))?;

    let report = IncomeReportEngine::new(&ledger, timezone).report_for(range, &orders);
    tracing::info!(
        orders = report.orders_included,
        excluded = report.excluded.len(),
        received = %report.total_received,
        "income report computed"
    );

    print_json(&report)
}

/// Prints outstanding balances for every customer owing anything
pub fn customer_debts(config: &CliConfig, snapshot_path: &str) -> Result<()> {
    let (store, _) = load(config, snapshot_path)?;

    let orders = store.all_orders()?;
    let ledger = InstallmentLedger::from_payments(store.all_installments()?);

    let debts = DebtResolver::new(&ledger).debts(&orders);
    tracing::info!(customers = debts.len(), "debt run computed");

    print_json(&debts)
}

/// Prints the settlement detail for one order
pub fn order_detail(config: &CliConfig, snapshot_path: &str, id: i64) -> Result<()> {
    let (store, _) = load(config, snapshot_path)?;

    let order_id = OrderId::new(id);
    let Some(order) = store.order(order_id)? else {
        bail!("order {} not found in the snapshot", order_id);
    };

    let ledger = InstallmentLedger::from_payments(store.installments_for(order_id)?);
    let settlement = DebtResolver::new(&ledger)
        .settle(&order)
        .with_context(|| format!("order {} cannot be settled", order_id))?;

    print_json(&settlement)
}

fn load(config: &CliConfig, snapshot_path: &str) -> Result<(MemoryStore, Timezone)> {
    let timezone = config.business_timezone()?;
    let snapshot = Snapshot::from_path(snapshot_path)
        .with_context(|| format!("cannot load snapshot from {}", snapshot_path))?;

    let decoded = decode(&snapshot, timezone);
    for fault in &decoded.faults {
        tracing::warn!(
            entity = %fault.entity,
            id = fault.id,
            reason = %fault.reason,
            "row dropped from snapshot"
        );
    }

    Ok((MemoryStore::from_decoded(&decoded), timezone))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
