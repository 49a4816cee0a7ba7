//! Dashboard command implementation

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use runway_core::{import::load_snapshot, AnalyticsEngine, DashboardWindow};

use super::print_json;

pub fn cmd_dashboard(
    engine: &AnalyticsEngine,
    snapshot_path: Option<&Path>,
    as_of: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    let snapshot = snapshot_path
        .map(|path| {
            load_snapshot(path)
                .with_context(|| format!("Failed to load savings snapshot from {}", path.display()))
        })
        .transpose()?;

    let stats = engine.dashboard_stats(snapshot.as_ref(), as_of);

    if json {
        return print_json(&stats);
    }

    let basis = match stats.window {
        DashboardWindow::AllData => format!("all data, {} month(s)", stats.months_used_for_average),
        DashboardWindow::TrailingMonths => {
            format!("trailing {} months", stats.months_used_for_average)
        }
    };

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           🛫 Runway Dashboard           │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  As of:           {}", stats.last_data_refresh.format("%Y-%m-%d"));
    println!("  Averaged over:   {}", basis);
    println!();
    println!("  📈 Monthly Average");
    println!("     Income:       ${:>12.2}", stats.monthly_average_income);
    println!("     Expenses:     ${:>12.2}", stats.monthly_average_expenses);
    println!("     Savings:      ${:>12.2}", stats.monthly_average_savings);
    println!();
    println!("  🗓️  Last Month");
    println!("     Income:       ${:>12.2}", stats.last_month_income);
    println!("     Expenses:     ${:>12.2}", stats.last_month_expenses);
    println!("     Savings:      ${:>12.2}", stats.last_month_savings);
    println!();
    println!(
        "  💸 Annual Expense Projection: ${:.2}",
        stats.annual_expense_projection
    );

    match (stats.runway_months, stats.total_savings) {
        (Some(runway), Some(savings)) => {
            println!();
            println!(
                "  🛟 Runway: {} months (${:.2} as of {})",
                runway,
                savings,
                stats.savings_quarter.as_deref().unwrap_or("latest snapshot")
            );
        }
        _ if snapshot.is_some() => {
            println!();
            println!("  🛟 Runway: n/a (no expenses in the averaging window)");
        }
        _ => {
            println!();
            println!("  💡 Tip: Pass --snapshot savings.json to see your runway");
        }
    }
    println!();

    Ok(())
}
