//! Domain models for Runway

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Category assigned when a transaction arrives without one
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A normalized financial transaction
///
/// `amount` is always a non-negative magnitude; direction lives only in
/// `is_debit`. Build through [`Transaction::new`] or `TryFrom<TransactionRecord>`
/// so the invariant holds; the analytics assume it and do not re-check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    /// Non-negative magnitude
    pub amount: f64,
    pub category: String,
    pub account: String,
    /// true = expense, false = income
    pub is_debit: bool,
}

impl Transaction {
    /// Create a transaction, rejecting negative or non-finite amounts
    pub fn new(id: impl Into<String>, date: NaiveDate, amount: f64, is_debit: bool) -> Result<Self> {
        let id = id.into();
        if !amount.is_finite() {
            return Err(Error::InvalidData(format!(
                "transaction {}: amount is not a finite number",
                id
            )));
        }
        if amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "transaction {}: amount must be non-negative, got {}",
                id, amount
            )));
        }

        Ok(Self {
            id,
            date,
            description: String::new(),
            amount,
            category: UNCATEGORIZED.to_string(),
            account: String::new(),
            is_debit,
        })
    }

    /// Set the category (blank falls back to "Uncategorized")
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = normalize_category(Some(category.into()));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    /// Debit with a positive amount
    pub fn is_expense(&self) -> bool {
        self.is_debit && self.amount > 0.0
    }

    /// Credit with a positive amount
    pub fn is_income(&self) -> bool {
        !self.is_debit && self.amount > 0.0
    }

    /// Money moved between the user's own accounts
    pub fn is_transfer(&self) -> bool {
        let category = self.category.to_lowercase();
        category == "transfer" || category == "transfers"
    }
}

/// Loose transaction shape accepted from files
///
/// When `is_debit` is absent the sign of `amount` decides direction
/// (negative = expense). When it is present a negative amount is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub is_debit: Option<bool>,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = Error;

    fn try_from(record: TransactionRecord) -> Result<Self> {
        let date = parse_transaction_date(&record.date).map_err(|e| {
            Error::InvalidData(format!("transaction {}: {}", record.id, e))
        })?;

        let (amount, is_debit) = match record.is_debit {
            Some(_) if record.amount < 0.0 => {
                return Err(Error::InvalidData(format!(
                    "transaction {}: negative amount {} with explicit is_debit",
                    record.id, record.amount
                )));
            }
            Some(is_debit) => (record.amount, is_debit),
            None => (record.amount.abs(), record.amount < 0.0),
        };

        let mut tx = Transaction::new(record.id, date, amount, is_debit)?
            .with_description(record.description)
            .with_account(record.account);
        tx.category = normalize_category(record.category);
        Ok(tx)
    }
}

/// Trim a category label, falling back to "Uncategorized" when blank
pub fn normalize_category(category: Option<String>) -> String {
    match category {
        Some(c) if !c.trim().is_empty() => c.trim().to_string(),
        _ => UNCATEGORIZED.to_string(),
    }
}

/// Parse a transaction date
///
/// Accepts `YYYY-MM-DD`, `DD/MM/YYYY` and RFC 3339 timestamps (the date as
/// written is kept, no timezone shift).
pub fn parse_transaction_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    if s.contains('/') {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
            return Ok(date);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(Error::InvalidData(format!("unparseable date: {:?}", s)))
}

/// Net-worth snapshot supplied by the savings tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsSnapshot {
    pub latest_net_asset_value: f64,
    /// Quarter label, e.g. "Q3 2024"
    pub latest_quarter: String,
    #[serde(default)]
    pub formatted_value: String,
    #[serde(default)]
    pub total_entries: usize,
}

/// Which branch of the averaging policy produced the dashboard figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardWindow {
    /// Data spans the window or less: every transaction, divided by the span
    AllData,
    /// Data spans more than the window: trailing months only
    TrailingMonths,
}

impl DashboardWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllData => "all_data",
            Self::TrailingMonths => "trailing_months",
        }
    }
}

impl std::fmt::Display for DashboardWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Headline dashboard statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub monthly_average_income: f64,
    pub monthly_average_expenses: f64,
    /// Income minus expenses
    pub monthly_average_savings: f64,
    pub last_month_income: f64,
    pub last_month_expenses: f64,
    pub last_month_savings: f64,
    /// Monthly average expenses times 12
    pub annual_expense_projection: f64,
    /// Months the net asset value covers at the average expense rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runway_months: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_savings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_quarter: Option<String>,
    /// Divisor used for the monthly averages
    pub months_used_for_average: u32,
    pub window: DashboardWindow,
    /// As-of timestamp of the computation
    pub last_data_refresh: DateTime<Utc>,
}
