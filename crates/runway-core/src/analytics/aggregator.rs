//! Monthly Aggregator
//!
//! Groups expense transactions by calendar month and by category within each
//! month. Income (credit) transactions are totalled separately so the income
//! figures never depend on the expense grouping.
//!
//! Grouping uses ordered maps and transactions are summed in input order, so
//! building twice from the same collection gives bit-identical results.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;

use crate::models::Transaction;

use super::percent_change;
use super::types::{
    CategoryAggregation, CategoryTimeSeriesPoint, MonthComparison, MonthlyAggregation,
    SummaryStats,
};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Display label for a month, e.g. "Jan 2024"
pub fn month_label(year: i32, month: u32) -> String {
    let abbreviation = MONTH_ABBREVIATIONS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???");
    format!("{} {}", abbreviation, year)
}

/// Sortable month key, e.g. "2024-01"
pub fn month_key(year: i32, month: u32) -> String {
    format!("{:04}-{:02}", year, month)
}

/// Aggregated view of one transaction collection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlyAggregator {
    months: Vec<MonthlyAggregation>,
    all_time_categories: Vec<CategoryAggregation>,
    total_expenses: f64,
    expense_count: usize,
    accounts_count: usize,
    total_income: f64,
    income_count: usize,
    income_by_category: BTreeMap<String, f64>,
}

impl MonthlyAggregator {
    /// Build the aggregation from a full transaction collection
    pub fn build(transactions: &[Transaction]) -> Self {
        let mut by_month: BTreeMap<(i32, u32), Vec<&Transaction>> = BTreeMap::new();
        let mut accounts = BTreeSet::new();
        let mut expenses = Vec::new();

        let mut total_income = 0.0;
        let mut income_count = 0;
        let mut income_by_category: BTreeMap<String, f64> = BTreeMap::new();

        for tx in transactions {
            if tx.is_expense() {
                by_month
                    .entry((tx.date.year(), tx.date.month()))
                    .or_default()
                    .push(tx);
                accounts.insert(tx.account.as_str());
                expenses.push(tx);
            } else if tx.is_income() {
                total_income += tx.amount;
                income_count += 1;
                *income_by_category.entry(tx.category.clone()).or_insert(0.0) += tx.amount;
            }
        }

        let months: Vec<MonthlyAggregation> = by_month
            .into_iter()
            .map(|((year, month), month_txs)| {
                let (total, categories) = aggregate_categories(&month_txs);
                MonthlyAggregation {
                    year,
                    month,
                    month_key: month_key(year, month),
                    month_name: month_label(year, month),
                    total,
                    transaction_count: month_txs.len(),
                    categories,
                }
            })
            .collect();

        let (total_expenses, all_time_categories) = aggregate_categories(&expenses);

        Self {
            months,
            all_time_categories,
            total_expenses,
            expense_count: expenses.len(),
            accounts_count: accounts.len(),
            total_income,
            income_count,
            income_by_category,
        }
    }

    /// Monthly aggregations, oldest first
    pub fn months(&self) -> &[MonthlyAggregation] {
        &self.months
    }

    /// Number of months with expense history
    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn total_expenses(&self) -> f64 {
        self.total_expenses
    }

    pub fn expense_count(&self) -> usize {
        self.expense_count
    }

    pub fn average_monthly_expenses(&self) -> f64 {
        if self.months.is_empty() {
            0.0
        } else {
            self.total_expenses / self.months.len() as f64
        }
    }

    pub fn total_income(&self) -> f64 {
        self.total_income
    }

    pub fn income_count(&self) -> usize {
        self.income_count
    }

    pub fn income_by_category(&self) -> &BTreeMap<String, f64> {
        &self.income_by_category
    }

    /// Total income divided by the months of *expense* history
    ///
    /// Months that only contain income do not count, so a few stray
    /// paychecks outside the spending history cannot inflate the average.
    pub fn average_monthly_income(&self) -> f64 {
        if self.months.is_empty() {
            0.0
        } else {
            self.total_income / self.months.len() as f64
        }
    }

    /// Largest categories across the whole collection
    pub fn top_categories(&self, limit: usize) -> Vec<CategoryAggregation> {
        self.all_time_categories
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Compare the most recent month with the previous one and with the same
    /// month a year earlier
    pub fn month_comparison(&self) -> MonthComparison {
        let Some(current) = self.months.last() else {
            return MonthComparison::default();
        };

        let previous = self
            .months
            .len()
            .checked_sub(2)
            .and_then(|i| self.months.get(i));

        let same_month_last_year = self
            .months
            .iter()
            .find(|m| m.year == current.year - 1 && m.month == current.month);

        MonthComparison {
            current_month: Some(current.clone()),
            previous_month: previous.cloned(),
            same_month_last_year: same_month_last_year.cloned(),
            month_over_month_change: previous
                .map(|p| percent_change(current.total, p.total))
                .unwrap_or(0.0),
            year_over_year_change: same_month_last_year
                .map(|p| percent_change(current.total, p.total))
                .unwrap_or(0.0),
        }
    }

    /// Per-month category amounts, with every category present in every month
    pub fn category_time_series(&self) -> Vec<CategoryTimeSeriesPoint> {
        let all_categories: BTreeSet<&str> = self
            .months
            .iter()
            .flat_map(|m| m.categories.iter().map(|c| c.category.as_str()))
            .collect();

        self.months
            .iter()
            .map(|month| {
                let mut categories: BTreeMap<String, f64> = all_categories
                    .iter()
                    .map(|c| (c.to_string(), 0.0))
                    .collect();
                for cat in &month.categories {
                    categories.insert(cat.category.clone(), cat.amount);
                }

                CategoryTimeSeriesPoint {
                    month_key: month.month_key.clone(),
                    month_name: month.month_name.clone(),
                    categories,
                    total: month.total,
                }
            })
            .collect()
    }

    pub fn summary_stats(&self) -> SummaryStats {
        SummaryStats {
            total_transactions: self.expense_count,
            total_spending: self.total_expenses,
            average_monthly_spending: self.average_monthly_expenses(),
            average_transaction_amount: if self.expense_count > 0 {
                self.total_expenses / self.expense_count as f64
            } else {
                0.0
            },
            months_of_data: self.months.len(),
            categories_count: self.all_time_categories.len(),
            accounts_count: self.accounts_count,
            actual_income: self.total_income,
            average_monthly_income: self.average_monthly_income(),
            has_income_data: self.income_count > 0,
        }
    }
}

/// Group transactions by category
///
/// Returns the overall total and the categories sorted by amount (largest
/// first, ties by name).
fn aggregate_categories(transactions: &[&Transaction]) -> (f64, Vec<CategoryAggregation>) {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    let mut total = 0.0;

    for tx in transactions {
        let entry = groups.entry(tx.category.as_str()).or_insert((0.0, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
        total += tx.amount;
    }

    let mut categories: Vec<CategoryAggregation> = groups
        .into_iter()
        .map(|(category, (amount, count))| CategoryAggregation {
            category: category.to_string(),
            amount,
            percentage: if total > 0.0 {
                (amount / total) * 100.0
            } else {
                0.0
            },
            transaction_count: count,
            average_transaction_amount: amount / count as f64,
        })
        .collect();

    // Stable sort keeps the name order from the BTreeMap for equal amounts
    categories.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    (total, categories)
}
