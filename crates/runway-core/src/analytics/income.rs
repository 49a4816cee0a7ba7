//! Income/Expense Summarizer

use super::aggregator::MonthlyAggregator;
use super::types::{IncomeSummary, SpendingRate};

/// Income totals drawn from the credit side of the collection
pub fn income_summary(aggregator: &MonthlyAggregator) -> IncomeSummary {
    IncomeSummary {
        total_income: aggregator.total_income(),
        average_monthly_income: aggregator.average_monthly_income(),
        income_transaction_count: aggregator.income_count(),
        income_by_category: aggregator.income_by_category().clone(),
    }
}

/// Expenses as a percentage of income, overall and per average month
pub fn spending_rate(aggregator: &MonthlyAggregator) -> SpendingRate {
    let actual_income = aggregator.total_income();
    let total_expenses = aggregator.total_expenses();
    let average_income = aggregator.average_monthly_income();

    SpendingRate {
        actual_income,
        total_expenses,
        spending_rate: ratio_percent(total_expenses, actual_income),
        monthly_spending_rate: ratio_percent(aggregator.average_monthly_expenses(), average_income),
        has_income_data: aggregator.income_count() > 0,
    }
}

fn ratio_percent(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        (numerator / denominator) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, expense, income};

    #[test]
    fn test_income_summary() {
        let txs = vec![
            expense("1", date(2024, 1, 5), 500.0, "Rent"),
            expense("2", date(2024, 2, 5), 500.0, "Rent"),
            income("3", date(2024, 1, 31), 2000.0, "Salary"),
            income("4", date(2024, 2, 15), 250.0, "Refunds"),
            income("5", date(2024, 2, 28), 2000.0, "Salary"),
        ];
        let summary = income_summary(&MonthlyAggregator::build(&txs));

        assert_eq!(summary.total_income, 4250.0);
        assert_eq!(summary.average_monthly_income, 2125.0);
        assert_eq!(summary.income_transaction_count, 3);
        assert_eq!(summary.income_by_category.get("Salary"), Some(&4000.0));
        assert_eq!(summary.income_by_category.get("Refunds"), Some(&250.0));
    }

    #[test]
    fn test_spending_rate() {
        let txs = vec![
            expense("1", date(2024, 1, 5), 750.0, "Rent"),
            income("2", date(2024, 1, 31), 1000.0, "Salary"),
        ];
        let rate = spending_rate(&MonthlyAggregator::build(&txs));

        assert!(rate.has_income_data);
        assert_eq!(rate.spending_rate, 75.0);
        assert_eq!(rate.monthly_spending_rate, 75.0);
    }

    #[test]
    fn test_no_income_gives_zero_rate() {
        let txs = vec![expense("1", date(2024, 1, 5), 750.0, "Rent")];
        let rate = spending_rate(&MonthlyAggregator::build(&txs));

        assert!(!rate.has_income_data);
        assert_eq!(rate.actual_income, 0.0);
        assert_eq!(rate.spending_rate, 0.0);
        assert_eq!(rate.monthly_spending_rate, 0.0);
    }

    #[test]
    fn test_income_without_expense_months() {
        // Income is counted but there are no expense months to average over
        let txs = vec![income("1", date(2024, 1, 31), 1000.0, "Salary")];
        let summary = income_summary(&MonthlyAggregator::build(&txs));

        assert_eq!(summary.total_income, 1000.0);
        assert_eq!(summary.average_monthly_income, 0.0);
    }
}
