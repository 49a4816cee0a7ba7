//! Output types for the analytics engine

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Spending for one category, either within a month or across all time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregation {
    pub category: String,
    pub amount: f64,
    /// Share of the enclosing total (0 when that total is 0)
    pub percentage: f64,
    pub transaction_count: usize,
    pub average_transaction_amount: f64,
}

/// Expense totals for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregation {
    pub year: i32,
    pub month: u32,
    /// "YYYY-MM", sorts chronologically
    pub month_key: String,
    /// "Jan 2024"
    pub month_name: String,
    pub total: f64,
    pub transaction_count: usize,
    /// Sorted by amount, largest first
    pub categories: Vec<CategoryAggregation>,
}

impl MonthlyAggregation {
    /// Amount spent in a category this month (0 if absent)
    pub fn category_amount(&self, category: &str) -> f64 {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.amount)
            .unwrap_or(0.0)
    }
}

/// Direction of a month against its rolling average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Trend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increasing" => Ok(Trend::Increasing),
            "decreasing" => Ok(Trend::Decreasing),
            "stable" => Ok(Trend::Stable),
            _ => Err(format!("Unknown trend: {}", s)),
        }
    }
}

/// One month of a rolling-average series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingMetrics {
    pub month_key: String,
    pub rolling_average: f64,
    pub current_month: f64,
    pub percentage_change: f64,
    pub trend: Trend,
}

/// Meteorological seasons (northern hemisphere)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn all() -> &'static [Season] {
        &[Season::Spring, Season::Summer, Season::Fall, Season::Winter]
    }

    /// Month numbers belonging to this season
    pub fn months(&self) -> &'static [u32] {
        match self {
            Season::Spring => &[3, 4, 5],
            Season::Summer => &[6, 7, 8],
            Season::Fall => &[9, 10, 11],
            Season::Winter => &[12, 1, 2],
        }
    }

    /// Season a calendar month (1-12) falls in
    pub fn for_month(month: u32) -> Season {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Average monthly spending for a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPattern {
    pub season: Season,
    pub average_spending: f64,
    pub months: Vec<u32>,
}

/// A (month, category) observation far from the category's average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingAnomaly {
    pub month_key: String,
    pub month_name: String,
    pub category: String,
    pub amount: f64,
    /// Mean over the months in which the category appears
    pub average_amount: f64,
    /// Positive = above average
    pub deviation_percentage: f64,
}

/// Latest month compared with the previous one and the same month a year earlier
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthComparison {
    pub current_month: Option<MonthlyAggregation>,
    pub previous_month: Option<MonthlyAggregation>,
    pub same_month_last_year: Option<MonthlyAggregation>,
    pub month_over_month_change: f64,
    pub year_over_year_change: f64,
}

/// Income derived from credit transactions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub total_income: f64,
    /// Total income over the number of months with expense history
    pub average_monthly_income: f64,
    pub income_transaction_count: usize,
    pub income_by_category: BTreeMap<String, f64>,
}

/// Expenses as a share of actual income
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpendingRate {
    pub actual_income: f64,
    pub total_expenses: f64,
    /// Total expenses / total income * 100 (0 without income)
    pub spending_rate: f64,
    /// Average monthly expenses / average monthly income * 100
    pub monthly_spending_rate: f64,
    /// Distinguishes "0% spending rate" from "no income data"
    pub has_income_data: bool,
}

/// One month of the zero-filled category series used by stacked charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTimeSeriesPoint {
    pub month_key: String,
    pub month_name: String,
    pub categories: BTreeMap<String, f64>,
    pub total: f64,
}

/// Collection-wide summary figures
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of expense transactions
    pub total_transactions: usize,
    pub total_spending: f64,
    pub average_monthly_spending: f64,
    pub average_transaction_amount: f64,
    pub months_of_data: usize,
    pub categories_count: usize,
    pub accounts_count: usize,
    pub actual_income: f64,
    pub average_monthly_income: f64,
    pub has_income_data: bool,
}
