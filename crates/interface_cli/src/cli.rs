//! Command-line interface definition

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::commands;
use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "ventas")]
#[command(about = "Reconciliation jobs for the dual-currency sales ledger")]
#[command(version)]
pub struct Cli {
    /// Path to the store snapshot JSON
    #[arg(short, long, env = "VENTAS_SNAPSHOT_PATH")]
    pub snapshot: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a freshly polled exchange rate
    ///
    /// Run on a fixed cadence by the scheduler. The observation is stored
    /// only when today has none yet or the value moved beyond the 0.01
    /// dedup tolerance, so repeated submissions of an unchanged rate are
    /// no-ops.
    RecordRate {
        /// Candidate rate, in VES per USD
        #[arg(short, long)]
        value: Decimal,
    },

    /// Income report over a range of business days
    IncomeReport {
        /// First day of the range
        #[arg(long)]
        from: NaiveDate,

        /// Last day of the range; omit for a single-day report
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Outstanding balances for every customer owing anything
    CustomerDebts,

    /// Settlement detail for one order
    Order {
        /// Order id
        #[arg(short, long)]
        id: i64,
    },
}

impl Cli {
    pub fn run(self, config: &CliConfig) -> Result<()> {
        let snapshot_path = self
            .snapshot
            .unwrap_or_else(|| config.snapshot_path.clone());

        match self.command {
            Commands::RecordRate { value } => commands::record_rate(config, &snapshot_path, value),
            Commands::IncomeReport { from, to } => {
                commands::income_report(config, &snapshot_path, from, to)
            }
            Commands::CustomerDebts => commands::customer_debts(config, &snapshot_path),
            Commands::Order { id } => commands::order_detail(config, &snapshot_path, id),
        }
    }
}
