//! Report command implementations

use anyhow::Result;
use runway_core::{AnalyticsEngine, Trend};

use super::{print_json, truncate};

pub fn cmd_report_monthly(engine: &AnalyticsEngine, json: bool) -> Result<()> {
    let months = engine.monthly_spending();
    if json {
        return print_json(&months);
    }

    println!();
    println!("📅 Monthly Spending");
    println!("   ─────────────────────────────────────────────────────────────");

    if months.is_empty() {
        println!("   No expenses found.");
        return Ok(());
    }

    println!(
        "   {:10} │ {:>10} │ {:>5} │ {}",
        "Month", "Total", "Count", "Top category"
    );
    println!("   ───────────┼────────────┼───────┼──────────────────────────");

    for month in &months {
        let top = month
            .categories
            .first()
            .map(|c| format!("{} ({:.1}%)", truncate(&c.category, 18), c.percentage))
            .unwrap_or_default();
        println!(
            "   {:10} │ {:>10.2} │ {:>5} │ {}",
            month.month_name, month.total, month.transaction_count, top
        );
    }

    Ok(())
}

pub fn cmd_report_categories(
    engine: &AnalyticsEngine,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let categories = engine.top_categories(limit);
    if json {
        return print_json(&categories);
    }

    println!();
    println!("🏷️  Top Categories");
    println!("   ─────────────────────────────────────────────────────────────");

    if categories.is_empty() {
        println!("   No expenses found.");
        return Ok(());
    }

    println!(
        "   {:25} │ {:>10} │ {:>6} │ {:>5} │ {:>8}",
        "Category", "Amount", "%", "Count", "Avg"
    );
    println!("   ──────────────────────────┼────────────┼────────┼───────┼──────────");

    for cat in &categories {
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5} │ {:>8.2}",
            truncate(&cat.category, 25),
            cat.amount,
            cat.percentage,
            cat.transaction_count,
            cat.average_transaction_amount
        );
    }

    Ok(())
}

pub fn cmd_report_rolling(
    engine: &AnalyticsEngine,
    category: Option<&str>,
    window: Option<usize>,
    json: bool,
) -> Result<()> {
    let metrics = engine.rolling_metrics(category, window)?;
    if json {
        return print_json(&metrics);
    }

    let window = window.unwrap_or(engine.config().rolling.window_size);

    println!();
    println!(
        "📈 Rolling {}-Month Average{}",
        window,
        category.map(|c| format!(" - {}", c)).unwrap_or_default()
    );
    println!("   ─────────────────────────────────────────────────────────────");

    if metrics.is_empty() {
        println!("   Not enough history for a {}-month window.", window);
        return Ok(());
    }

    println!(
        "   {:8} │ {:>10} │ {:>10} │ {:>8} │ Trend",
        "Month", "Average", "Current", "Change"
    );
    println!("   ─────────┼────────────┼────────────┼──────────┼───────────");

    for m in &metrics {
        let arrow = match m.trend {
            Trend::Increasing => "↑",
            Trend::Decreasing => "↓",
            Trend::Stable => "→",
        };
        println!(
            "   {:8} │ {:>10.2} │ {:>10.2} │ {:>+7.1}% │ {} {}",
            m.month_key, m.rolling_average, m.current_month, m.percentage_change, arrow, m.trend
        );
    }

    Ok(())
}

pub fn cmd_report_seasonal(engine: &AnalyticsEngine, json: bool) -> Result<()> {
    let patterns = engine.seasonal_patterns();
    if json {
        return print_json(&patterns);
    }

    println!();
    println!("🌦️  Seasonal Spending");
    println!("   ─────────────────────────────");

    for pattern in &patterns {
        println!(
            "   {:8} {:>12.2}/mo",
            pattern.season.as_str(),
            pattern.average_spending
        );
    }

    Ok(())
}

pub fn cmd_report_anomalies(
    engine: &AnalyticsEngine,
    threshold: Option<f64>,
    json: bool,
) -> Result<()> {
    let anomalies = engine.anomalies(threshold)?;
    if json {
        return print_json(&anomalies);
    }

    let threshold = threshold.unwrap_or(engine.config().anomalies.threshold_percent);

    println!();
    println!("⚠️  Spending Anomalies (> {:.0}% from average)", threshold);
    println!("   ─────────────────────────────────────────────────────────────");

    if anomalies.is_empty() {
        println!("   ✅ No anomalies found.");
        return Ok(());
    }

    println!(
        "   {:8} │ {:20} │ {:>10} │ {:>10} │ {:>8}",
        "Month", "Category", "Amount", "Average", "Change"
    );
    println!("   ─────────┼──────────────────────┼────────────┼────────────┼──────────");

    for a in &anomalies {
        println!(
            "   {:8} │ {:20} │ {:>10.2} │ {:>10.2} │ {:>+7.1}%",
            a.month_key,
            truncate(&a.category, 20),
            a.amount,
            a.average_amount,
            a.deviation_percentage
        );
    }

    Ok(())
}

pub fn cmd_report_income(engine: &AnalyticsEngine, json: bool) -> Result<()> {
    let summary = engine.income_summary();
    let rate = engine.spending_rate();
    if json {
        return print_json(&serde_json::json!({
            "income": summary,
            "spending_rate": rate,
        }));
    }

    println!();
    println!("💵 Income");
    println!("   ─────────────────────────────");

    if !rate.has_income_data {
        println!("   No income transactions found.");
        return Ok(());
    }

    println!("   Total income:        ${:.2}", summary.total_income);
    println!("   Average per month:   ${:.2}", summary.average_monthly_income);
    println!("   Transactions:        {}", summary.income_transaction_count);
    println!("   Spending rate:       {:.1}%", rate.spending_rate);
    println!("   Monthly rate:        {:.1}%", rate.monthly_spending_rate);
    println!();
    for (category, amount) in &summary.income_by_category {
        println!("   {:25} {:>12.2}", truncate(category, 25), amount);
    }

    Ok(())
}

pub fn cmd_report_compare(engine: &AnalyticsEngine, json: bool) -> Result<()> {
    let comparison = engine.month_comparison();
    if json {
        return print_json(&comparison);
    }

    println!();
    println!("🔀 Month Comparison");
    println!("   ─────────────────────────────");

    let Some(current) = &comparison.current_month else {
        println!("   No expenses found.");
        return Ok(());
    };

    println!("   {:20} ${:>10.2}", current.month_name, current.total);
    match &comparison.previous_month {
        Some(prev) => println!(
            "   vs {:17} ${:>10.2}  ({:+.1}%)",
            prev.month_name, prev.total, comparison.month_over_month_change
        ),
        None => println!("   No previous month."),
    }
    match &comparison.same_month_last_year {
        Some(last_year) => println!(
            "   vs {:17} ${:>10.2}  ({:+.1}%)",
            last_year.month_name, last_year.total, comparison.year_over_year_change
        ),
        None => println!("   No data for the same month last year."),
    }

    Ok(())
}

pub fn cmd_report_timeseries(engine: &AnalyticsEngine, json: bool) -> Result<()> {
    let series = engine.category_time_series();
    if json {
        return print_json(&series);
    }

    println!();
    println!("📊 Category Time Series");
    println!("   ─────────────────────────────────────────────────────────────");

    let Some(first) = series.first() else {
        println!("   No expenses found.");
        return Ok(());
    };

    let categories: Vec<&String> = first.categories.keys().collect();
    let header: Vec<String> = categories
        .iter()
        .map(|c| format!("{:>12}", truncate(c, 12)))
        .collect();
    println!("   {:8} │ {} │ {:>10}", "Month", header.join(" "), "Total");

    for point in &series {
        let cells: Vec<String> = point
            .categories
            .values()
            .map(|amount| format!("{:>12.2}", amount))
            .collect();
        println!(
            "   {:8} │ {} │ {:>10.2}",
            point.month_key,
            cells.join(" "),
            point.total
        );
    }

    Ok(())
}

pub fn cmd_report_summary(engine: &AnalyticsEngine, json: bool) -> Result<()> {
    let stats = engine.summary_stats();
    if json {
        return print_json(&stats);
    }

    println!();
    println!("📋 Summary");
    println!("   ─────────────────────────────");
    println!("   Expense transactions:  {}", stats.total_transactions);
    println!("   Total spending:        ${:.2}", stats.total_spending);
    println!("   Average per month:     ${:.2}", stats.average_monthly_spending);
    println!("   Average transaction:   ${:.2}", stats.average_transaction_amount);
    println!("   Months of data:        {}", stats.months_of_data);
    println!("   Categories:            {}", stats.categories_count);
    println!("   Accounts:              {}", stats.accounts_count);
    if stats.has_income_data {
        println!("   Income:                ${:.2}", stats.actual_income);
        println!("   Income per month:      ${:.2}", stats.average_monthly_income);
    }

    Ok(())
}
