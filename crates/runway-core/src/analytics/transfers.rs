//! Transfer Filter

use crate::models::Transaction;

/// Drop transfers between the user's own accounts when `hide` is set
pub fn filter_transfers(transactions: &[Transaction], hide: bool) -> Vec<Transaction> {
    if !hide {
        return transactions.to_vec();
    }

    transactions
        .iter()
        .filter(|tx| !tx.is_transfer())
        .cloned()
        .collect()
}
