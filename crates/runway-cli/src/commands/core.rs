//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_engine` - Shared utility to load transactions and config into an engine
//! - `parse_as_of` - Resolve the `--as-of` argument
//! - `print_json` - Pretty JSON output for `--json`
//! - `cmd_validate` - Check a transaction file

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use runway_core::{import::load_transactions, AnalyticsConfig, AnalyticsEngine, FileFormat};
use serde::Serialize;
use tracing::debug;

/// Where to load transactions and config from
pub struct LoadOptions {
    pub file: PathBuf,
    pub config: Option<PathBuf>,
    /// Forces transfer filtering on regardless of config
    pub hide_transfers: bool,
}

fn load_config(options: &LoadOptions) -> Result<AnalyticsConfig> {
    let mut config = AnalyticsConfig::load(options.config.as_deref())
        .context("Failed to load analytics config")?;
    if options.hide_transfers {
        config.filters.hide_transfers = true;
    }
    Ok(config)
}

/// Load the transaction file and build an engine over it
pub fn load_engine(options: &LoadOptions) -> Result<AnalyticsEngine> {
    let config = load_config(options)?;
    let transactions = load_transactions(&options.file)
        .with_context(|| format!("Failed to load transactions from {}", options.file.display()))?;

    debug!(count = transactions.len(), "Building analytics engine");
    AnalyticsEngine::new(transactions, config).context("Invalid analytics configuration")
}

/// Parse `--as-of` (YYYY-MM-DD or RFC 3339), defaulting to now
pub fn parse_as_of(as_of: Option<&str>) -> Result<DateTime<Utc>> {
    let Some(s) = as_of else {
        return Ok(Utc::now());
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .context("Invalid --as-of date (use YYYY-MM-DD or RFC 3339)")?;
    Ok(date
        .and_hms_opt(0, 0, 0)
        .context("Invalid --as-of date")?
        .and_utc())
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn cmd_validate(options: &LoadOptions) -> Result<()> {
    let format = FileFormat::from_path(&options.file)?;
    let engine = load_engine(options)?;
    let transactions = engine.transactions();

    let expenses = transactions.iter().filter(|t| t.is_expense()).count();
    let income = transactions.iter().filter(|t| t.is_income()).count();
    let first = transactions.iter().map(|t| t.date).min();
    let last = transactions.iter().map(|t| t.date).max();

    println!("✅ {} is valid", options.file.display());
    println!("   ─────────────────────────────");
    println!("   Format:        {}", format.as_str());
    println!("   Transactions:  {}", transactions.len());
    println!("   Expenses:      {}", expenses);
    println!("   Income:        {}", income);
    if let (Some(first), Some(last)) = (first, last) {
        println!("   Date range:    {} to {}", first, last);
    }
    if engine.config().filters.hide_transfers {
        println!("   Transfers:     hidden");
    }

    Ok(())
}
