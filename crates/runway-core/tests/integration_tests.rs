//! Integration tests for runway-core
//!
//! These tests exercise the full load → engine → report workflow.

use std::io::Write;

use chrono::{NaiveDate, TimeZone, Utc};
use runway_core::{
    analytics::filter_transfers,
    import::{parse_csv, parse_json},
    models::Transaction,
    AnalyticsConfig, AnalyticsEngine, DashboardWindow, SavingsSnapshot, Trend,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn debit(id: &str, on: NaiveDate, amount: f64, category: &str) -> Transaction {
    Transaction::new(id, on, amount, true)
        .unwrap()
        .with_category(category)
        .with_account("Checking")
}

fn credit(id: &str, on: NaiveDate, amount: f64, category: &str) -> Transaction {
    Transaction::new(id, on, amount, false)
        .unwrap()
        .with_category(category)
        .with_account("Checking")
}

/// A year of household data: rent, groceries, salary, one transfer out
/// and a December holiday splurge
fn household_csv() -> String {
    let mut csv = String::from("id,date,description,amount,category,account,is_debit\n");
    for month in 1..=12 {
        csv.push_str(&format!(
            "rent-{m},2024-{m:02}-01,Landlord,1500.00,Rent,Checking,true\n",
            m = month
        ));
        csv.push_str(&format!(
            "groc-{m},2024-{m:02}-10,Market,{amt:.2},Groceries,Visa,true\n",
            m = month,
            amt = 400.0 + month as f64 * 10.0
        ));
        csv.push_str(&format!(
            "pay-{m},2024-{m:02}-25,Payroll,4000.00,Salary,Checking,false\n",
            m = month
        ));
    }
    csv.push_str("xfer-1,2024-06-15,To savings,2000.00,Transfer,Checking,true\n");
    csv.push_str("gift-12,2024-12-20,Holiday gifts,1200.00,Gifts,Visa,true\n");
    csv
}

// =============================================================================
// Load → Engine Workflow
// =============================================================================

#[test]
fn test_full_csv_workflow() {
    let transactions = parse_csv(household_csv().as_bytes()).expect("Failed to parse CSV");
    assert_eq!(transactions.len(), 38);

    let mut config = AnalyticsConfig::default();
    config.filters.hide_transfers = true;
    let engine = AnalyticsEngine::new(transactions, config).expect("Failed to create engine");
    assert_eq!(engine.transactions().len(), 37);

    let months = engine.monthly_spending();
    assert_eq!(months.len(), 12);
    for month in &months {
        let sum: f64 = month.categories.iter().map(|c| c.amount).sum();
        assert!((sum - month.total).abs() < 1e-6);
        let pct: f64 = month.categories.iter().map(|c| c.percentage).sum();
        assert!((pct - 100.0).abs() < 1e-6);
    }

    // December has the gifts on top of rent and groceries
    let december = months.last().unwrap();
    assert_eq!(december.month_key, "2024-12");
    assert_eq!(december.categories.len(), 3);
    assert_eq!(december.categories[0].category, "Rent");

    let top = engine.top_categories(Some(2));
    assert_eq!(top[0].category, "Rent");
    assert_eq!(top[1].category, "Groceries");

    // December's gifts push the last month above its rolling average
    let rolling = engine.rolling_metrics(None, None).unwrap();
    assert_eq!(rolling.len(), 7);
    assert_eq!(rolling.last().unwrap().trend, Trend::Increasing);

    let summary = engine.income_summary();
    assert_eq!(summary.total_income, 48000.0);
    assert_eq!(summary.average_monthly_income, 4000.0);

    let seasonal = engine.seasonal_patterns();
    assert_eq!(seasonal.len(), 4);
    assert!(seasonal.iter().all(|s| s.average_spending > 0.0));
}

#[test]
fn test_dashboard_with_snapshot() {
    let transactions = parse_csv(household_csv().as_bytes()).unwrap();
    let engine = AnalyticsEngine::new(transactions, AnalyticsConfig::default()).unwrap();

    let snapshot = SavingsSnapshot {
        latest_net_asset_value: 50000.0,
        latest_quarter: "Q4 2024".to_string(),
        formatted_value: "$50,000".to_string(),
        total_entries: 8,
    };
    let as_of = Utc.with_ymd_and_hms(2025, 1, 5, 9, 0, 0).unwrap();
    let stats = engine.dashboard_stats(Some(&snapshot), as_of);

    assert_eq!(stats.window, DashboardWindow::AllData);
    assert_eq!(stats.months_used_for_average, 12);
    assert_eq!(stats.monthly_average_income, 4000.0);
    assert_eq!(
        stats.annual_expense_projection,
        stats.monthly_average_expenses * 12.0
    );
    assert!(stats.runway_months.is_some());
    assert_eq!(stats.savings_quarter.as_deref(), Some("Q4 2024"));

    // December: rent 1500, groceries 520, gifts 1200
    assert_eq!(stats.last_month_expenses, 3220.0);
    assert_eq!(stats.last_month_savings, 4000.0 - 3220.0);
    assert_eq!(stats.last_data_refresh, as_of);
}

#[test]
fn test_long_history_trailing_window() {
    // Two years of rent; the first year was pricier
    let mut transactions = Vec::new();
    for (i, (year, month)) in (2023..=2024)
        .flat_map(|y| (1..=12).map(move |m| (y, m)))
        .enumerate()
    {
        let amount = if year == 2023 { 3000.0 } else { 2000.0 };
        transactions.push(debit(&format!("rent-{}", i), date(year, month, 5), amount, "Rent"));
    }

    let engine = AnalyticsEngine::new(transactions, AnalyticsConfig::default()).unwrap();
    let as_of = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let stats = engine.dashboard_stats(
        Some(&SavingsSnapshot {
            latest_net_asset_value: 12000.0,
            latest_quarter: "Q4 2024".to_string(),
            formatted_value: String::new(),
            total_entries: 1,
        }),
        as_of,
    );

    assert_eq!(stats.window, DashboardWindow::TrailingMonths);
    assert_eq!(stats.monthly_average_expenses, 2000.0);
    assert_eq!(stats.runway_months, Some(6));
}

#[test]
fn test_anomalies_end_to_end() {
    let json = r#"[
        {"id": "i1", "date": "2024-01-10", "amount": 100.0, "category": "Insurance", "is_debit": true},
        {"id": "i2", "date": "2024-02-10", "amount": 100.0, "category": "Insurance", "is_debit": true},
        {"id": "i3", "date": "2024-03-10", "amount": 100.0, "category": "Insurance", "is_debit": true},
        {"id": "i4", "date": "2024-04-10", "amount": 1000.0, "category": "Insurance", "is_debit": true}
    ]"#;
    let engine =
        AnalyticsEngine::new(parse_json(json.as_bytes()).unwrap(), AnalyticsConfig::default())
            .unwrap();

    let anomalies = engine.anomalies(None).unwrap();
    assert_eq!(anomalies.len(), 4);
    assert_eq!(anomalies[0].month_key, "2024-04");
    assert!((anomalies[0].deviation_percentage - 207.69).abs() < 0.01);
    assert!((anomalies[3].deviation_percentage + 69.23).abs() < 0.01);

    // A looser threshold keeps only the spike
    assert_eq!(engine.anomalies(Some(100.0)).unwrap().len(), 1);
}

#[test]
fn test_rolling_baseline_from_config_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[rolling]\nanchor = \"preceding_current\"").unwrap();
    let config = AnalyticsConfig::load(Some(file.path())).unwrap();

    let amounts = [100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 200.0];
    let transactions: Vec<Transaction> = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| debit(&format!("m{}", i), date(2024, i as u32 + 1, 1), *amount, "Misc"))
        .collect();

    let engine = AnalyticsEngine::new(transactions, config).unwrap();
    let rolling = engine.rolling_metrics(None, None).unwrap();

    assert_eq!(rolling.len(), 1);
    assert_eq!(rolling[0].rolling_average, 100.0);
    assert_eq!(rolling[0].current_month, 200.0);
    assert!((rolling[0].percentage_change - 100.0).abs() < 1e-9);
    assert_eq!(rolling[0].trend, Trend::Increasing);
}

#[test]
fn test_recomputation_is_deterministic() {
    let transactions = parse_csv(household_csv().as_bytes()).unwrap();
    let a = AnalyticsEngine::new(transactions.clone(), AnalyticsConfig::default()).unwrap();
    let b = AnalyticsEngine::new(transactions, AnalyticsConfig::default()).unwrap();

    assert_eq!(a.monthly_spending(), b.monthly_spending());
    assert_eq!(a.anomalies(None).unwrap(), b.anomalies(None).unwrap());
    assert_eq!(
        serde_json::to_string(&a.category_time_series()).unwrap(),
        serde_json::to_string(&b.category_time_series()).unwrap()
    );
}

#[test]
fn test_transfer_filter_properties() {
    let transactions = vec![
        debit("1", date(2024, 1, 1), 10.0, "Groceries"),
        debit("2", date(2024, 1, 2), 20.0, "TRANSFER"),
        credit("3", date(2024, 1, 3), 20.0, "Transfers"),
    ];

    let hidden = filter_transfers(&transactions, true);
    assert!(hidden.iter().all(|t| {
        let c = t.category.to_lowercase();
        c != "transfer" && c != "transfers"
    }));
    assert_eq!(filter_transfers(&transactions, false), transactions);
}

#[test]
fn test_empty_collection_never_fails() {
    let engine = AnalyticsEngine::new(Vec::new(), AnalyticsConfig::default()).unwrap();

    assert!(engine.monthly_spending().is_empty());
    assert!(engine.rolling_metrics(None, None).unwrap().is_empty());
    assert!(engine.anomalies(None).unwrap().is_empty());
    assert_eq!(engine.spending_rate().spending_rate, 0.0);
    assert_eq!(engine.summary_stats().months_of_data, 0);

    let stats = engine.dashboard_stats(None, Utc::now());
    assert_eq!(stats.monthly_average_expenses, 0.0);
    assert!(stats.runway_months.is_none());
}
