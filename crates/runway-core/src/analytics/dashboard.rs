//! Dashboard Statistics Calculator
//!
//! Headline monthly averages with a two-branch window policy:
//!
//! - history spanning the window or less: every transaction, divided by the
//!   span in (30-day) months
//! - longer history: only transactions from the trailing window before the
//!   as-of date, divided by the window length
//!
//! The switch is discontinuous at the boundary. A collection spanning 12.1
//! months drops its oldest days from the average while one spanning 12.0
//! months keeps them.
//!
//! Last-month figures always come from the calendar month before the as-of
//! date and are taken from the whole collection. This calculator reads the
//! transactions directly and does not share the monthly aggregation cache.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{DashboardStats, DashboardWindow, SavingsSnapshot, Transaction};

/// Default averaging window, in months
pub const DEFAULT_WINDOW_MONTHS: u32 = 12;

/// Length of a "month" when measuring the span of a collection
const DAYS_PER_MONTH: i64 = 30;

/// Computes [`DashboardStats`] for a transaction collection
#[derive(Debug, Clone)]
pub struct DashboardCalculator {
    window_months: u32,
}

#[derive(Default)]
struct Totals {
    income: f64,
    expenses: f64,
}

impl Totals {
    fn add(&mut self, tx: &Transaction) {
        if tx.is_debit {
            self.expenses += tx.amount;
        } else if tx.amount > 0.0 {
            self.income += tx.amount;
        }
    }
}

impl DashboardCalculator {
    pub fn new() -> Self {
        Self {
            window_months: DEFAULT_WINDOW_MONTHS,
        }
    }

    pub fn with_window_months(window_months: u32) -> Result<Self> {
        if window_months == 0 {
            return Err(Error::InvalidArgument(
                "dashboard window must be at least 1 month".to_string(),
            ));
        }
        Ok(Self { window_months })
    }

    pub fn window_months(&self) -> u32 {
        self.window_months
    }

    /// Compute dashboard statistics as of `as_of`
    ///
    /// Runway, total savings and savings quarter are only filled in when a
    /// snapshot is given and average monthly expenses are positive.
    pub fn calculate(
        &self,
        transactions: &[Transaction],
        snapshot: Option<&SavingsSnapshot>,
        as_of: DateTime<Utc>,
    ) -> DashboardStats {
        let today = as_of.date_naive();

        let Some(span) = span_in_months(transactions) else {
            debug!("No transactions, dashboard figures are zero");
            return empty_stats(as_of);
        };

        let (window, divisor, averaged) = if span <= i64::from(self.window_months) {
            let mut totals = Totals::default();
            transactions.iter().for_each(|tx| totals.add(tx));
            (DashboardWindow::AllData, span as u32, totals)
        } else {
            let cutoff = today
                .checked_sub_months(Months::new(self.window_months))
                .unwrap_or(NaiveDate::MIN);
            let mut totals = Totals::default();
            transactions
                .iter()
                .filter(|tx| tx.date >= cutoff)
                .for_each(|tx| totals.add(tx));
            (DashboardWindow::TrailingMonths, self.window_months, totals)
        };

        debug!(
            span_months = span,
            window = %window,
            divisor,
            "Dashboard averaging window selected"
        );

        let monthly_average_income = averaged.income / f64::from(divisor);
        let monthly_average_expenses = averaged.expenses / f64::from(divisor);

        let last_month = last_month_totals(transactions, today);

        let mut stats = DashboardStats {
            monthly_average_income,
            monthly_average_expenses,
            monthly_average_savings: monthly_average_income - monthly_average_expenses,
            last_month_income: last_month.income,
            last_month_expenses: last_month.expenses,
            last_month_savings: last_month.income - last_month.expenses,
            annual_expense_projection: monthly_average_expenses * 12.0,
            runway_months: None,
            total_savings: None,
            savings_quarter: None,
            months_used_for_average: divisor,
            window,
            last_data_refresh: as_of,
        };

        if let Some(snapshot) = snapshot {
            if monthly_average_expenses > 0.0 {
                stats.runway_months =
                    Some((snapshot.latest_net_asset_value / monthly_average_expenses).round() as i64);
                stats.total_savings = Some(snapshot.latest_net_asset_value);
                stats.savings_quarter = Some(snapshot.latest_quarter.clone());
            }
        }

        stats
    }
}

impl Default for DashboardCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Span between the oldest and newest transaction in 30-day months,
/// rounded up, at least 1. `None` for an empty collection.
fn span_in_months(transactions: &[Transaction]) -> Option<i64> {
    let oldest = transactions.iter().map(|tx| tx.date).min()?;
    let newest = transactions.iter().map(|tx| tx.date).max()?;

    let days = (newest - oldest).num_days();
    let months = (days + DAYS_PER_MONTH - 1) / DAYS_PER_MONTH;
    Some(months.max(1))
}

/// Income and expenses for the calendar month before `today`
fn last_month_totals(transactions: &[Transaction], today: NaiveDate) -> Totals {
    let (year, month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };

    let mut totals = Totals::default();
    transactions
        .iter()
        .filter(|tx| tx.date.year() == year && tx.date.month() == month)
        .for_each(|tx| totals.add(tx));
    totals
}

fn empty_stats(as_of: DateTime<Utc>) -> DashboardStats {
    DashboardStats {
        monthly_average_income: 0.0,
        monthly_average_expenses: 0.0,
        monthly_average_savings: 0.0,
        last_month_income: 0.0,
        last_month_expenses: 0.0,
        last_month_savings: 0.0,
        annual_expense_projection: 0.0,
        runway_months: None,
        total_savings: None,
        savings_quarter: None,
        months_used_for_average: 0,
        window: DashboardWindow::AllData,
        last_data_refresh: as_of,
    }
}
