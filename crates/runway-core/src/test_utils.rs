//! Test utilities for building transaction collections
//!
//! Compiled for unit tests and behind the `test-utils` feature so the CLI's
//! tests can share the same fixtures.

use chrono::NaiveDate;

use crate::models::Transaction;

/// Shorthand for a calendar date (panics on invalid input)
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// An expense transaction
pub fn expense(id: &str, on: NaiveDate, amount: f64, category: &str) -> Transaction {
    Transaction::new(id, on, amount, true)
        .expect("valid test amount")
        .with_category(category)
        .with_description(format!("{} purchase", category))
        .with_account("Checking")
}

/// An income transaction
pub fn income(id: &str, on: NaiveDate, amount: f64, category: &str) -> Transaction {
    Transaction::new(id, on, amount, false)
        .expect("valid test amount")
        .with_category(category)
        .with_description(format!("{} deposit", category))
        .with_account("Checking")
}

/// One expense per month in `category`, starting at `start` (year, month),
/// each dated the 15th
pub fn monthly_expenses(start: (i32, u32), amounts: &[f64], category: &str) -> Vec<Transaction> {
    let (mut year, mut month) = start;
    let mut transactions = Vec::with_capacity(amounts.len());

    for (i, amount) in amounts.iter().enumerate() {
        transactions.push(expense(
            &format!("{}-{}", category.to_lowercase(), i),
            date(year, month, 15),
            *amount,
            category,
        ));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    transactions
}
