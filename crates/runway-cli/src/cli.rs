//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Runway - Spending analytics and financial runway
#[derive(Parser)]
#[command(name = "runway")]
#[command(about = "Spending analytics and financial runway from your transactions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Transaction file (.json or .csv)
    #[arg(short, long, default_value = "transactions.json", global = true)]
    pub file: PathBuf,

    /// Analytics config file
    ///
    /// Defaults to ~/.local/share/runway/config/analytics.toml when present,
    /// otherwise the built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Drop "Transfer"/"Transfers" transactions before analysis
    #[arg(long, global = true)]
    pub hide_transfers: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show headline averages, last month and runway
    Dashboard {
        /// Savings snapshot JSON (enables runway)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Compute as of this date (YYYY-MM-DD or RFC 3339), defaults to now
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Generate analytics reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Load the transaction file and report what it contains
    Validate,
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Spending per month with its largest categories
    Monthly,

    /// Top categories across all months
    Categories {
        /// Number of categories to show (defaults to config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Rolling averages and trend per month
    Rolling {
        /// Track one category instead of the month total
        #[arg(long)]
        category: Option<String>,

        /// Months per window (defaults to config)
        #[arg(long)]
        window: Option<usize>,
    },

    /// Average monthly spending per season
    Seasonal,

    /// Category spending far from its usual level
    Anomalies {
        /// Deviation threshold in percent (defaults to config)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Income totals and spending rate
    Income,

    /// Latest month against the previous month and last year
    Compare,

    /// Per-month amounts for every category
    Timeseries,

    /// Overall statistics for the file
    Summary,
}
