//! Runway CLI - Spending analytics and financial runway
//!
//! Usage:
//!   runway --file tx.csv dashboard --snapshot savings.json   Headline stats and runway
//!   runway --file tx.csv report monthly                      Monthly spending
//!   runway --file tx.csv report anomalies --threshold 75     Unusual category spend
//!   runway --file tx.csv validate                            Check a transaction file

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let options = commands::LoadOptions {
        file: cli.file,
        config: cli.config,
        hide_transfers: cli.hide_transfers,
    };

    match cli.command {
        Commands::Dashboard { snapshot, as_of } => {
            let engine = commands::load_engine(&options)?;
            let as_of = commands::parse_as_of(as_of.as_deref())?;
            commands::cmd_dashboard(&engine, snapshot.as_deref(), as_of, cli.json)
        }
        Commands::Report { report_type } => {
            let engine = commands::load_engine(&options)?;
            match report_type {
                ReportType::Monthly => commands::cmd_report_monthly(&engine, cli.json),
                ReportType::Categories { limit } => {
                    commands::cmd_report_categories(&engine, limit, cli.json)
                }
                ReportType::Rolling { category, window } => {
                    commands::cmd_report_rolling(&engine, category.as_deref(), window, cli.json)
                }
                ReportType::Seasonal => commands::cmd_report_seasonal(&engine, cli.json),
                ReportType::Anomalies { threshold } => {
                    commands::cmd_report_anomalies(&engine, threshold, cli.json)
                }
                ReportType::Income => commands::cmd_report_income(&engine, cli.json),
                ReportType::Compare => commands::cmd_report_compare(&engine, cli.json),
                ReportType::Timeseries => commands::cmd_report_timeseries(&engine, cli.json),
                ReportType::Summary => commands::cmd_report_summary(&engine, cli.json),
            }
        }
        Commands::Validate => commands::cmd_validate(&options),
    }
}
