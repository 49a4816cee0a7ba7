//! Aggregation Cache
//!
//! Memoizes [`MonthlyAggregator`] output for the last-seen transaction
//! collection. The collection is identified by a SHA-256 content fingerprint
//! or by a revision token the caller supplies; any key change triggers a full
//! rebuild.
//!
//! Rebuilds run outside the lock and the finished aggregation is swapped in
//! as one `Arc`, so readers see either the old aggregation or the new one,
//! never a partial build.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::Transaction;

use super::aggregator::MonthlyAggregator;

/// Identifies the collection an aggregation was built from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Hex SHA-256 over every transaction field the aggregation reads
    Fingerprint(String),
    /// Caller-managed version number
    Revision(u64),
}

impl CacheKey {
    /// Fingerprint a collection's content
    ///
    /// Order matters: the same transactions in a different order produce a
    /// different key (and a rebuild), which is safe.
    pub fn fingerprint(transactions: &[Transaction]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((transactions.len() as u64).to_le_bytes());

        for tx in transactions {
            hasher.update(tx.id.as_bytes());
            hasher.update([0u8]);
            hasher.update(tx.date.to_string().as_bytes());
            hasher.update(tx.amount.to_bits().to_le_bytes());
            hasher.update([tx.is_debit as u8]);
            hasher.update(tx.category.as_bytes());
            hasher.update([0u8]);
            hasher.update(tx.account.as_bytes());
            hasher.update([0u8]);
        }

        CacheKey::Fingerprint(hex::encode(hasher.finalize()))
    }
}

struct CachedAggregation {
    key: CacheKey,
    aggregator: Arc<MonthlyAggregator>,
}

/// Single-entry cache around the monthly aggregation
pub struct AggregationCache {
    entry: RwLock<Option<CachedAggregation>>,
    rebuilds: AtomicU64,
}

impl AggregationCache {
    pub fn new() -> Self {
        Self {
            entry: RwLock::new(None),
            rebuilds: AtomicU64::new(0),
        }
    }

    /// Aggregation for `transactions`, keyed by content fingerprint
    pub fn get_or_build(&self, transactions: &[Transaction]) -> Arc<MonthlyAggregator> {
        self.get_or_build_keyed(CacheKey::fingerprint(transactions), transactions)
    }

    /// Aggregation for `transactions`, keyed by a caller-supplied revision
    ///
    /// Skips fingerprinting. The caller must bump the revision whenever the
    /// collection changes.
    pub fn get_or_build_with_revision(
        &self,
        revision: u64,
        transactions: &[Transaction],
    ) -> Arc<MonthlyAggregator> {
        self.get_or_build_keyed(CacheKey::Revision(revision), transactions)
    }

    fn get_or_build_keyed(&self, key: CacheKey, transactions: &[Transaction]) -> Arc<MonthlyAggregator> {
        if let Some(hit) = self.lookup(&key) {
            debug!(key = ?key, "Aggregation cache hit");
            return hit;
        }

        let built = Arc::new(MonthlyAggregator::build(transactions));

        let mut entry = self.entry.write().unwrap_or_else(|e| e.into_inner());
        // Another caller may have finished the same build first
        if let Some(existing) = entry.as_ref().filter(|c| c.key == key) {
            return Arc::clone(&existing.aggregator);
        }

        debug!(
            key = ?key,
            transactions = transactions.len(),
            months = built.month_count(),
            "Rebuilt monthly aggregation"
        );
        *entry = Some(CachedAggregation {
            key,
            aggregator: Arc::clone(&built),
        });
        self.rebuilds.fetch_add(1, Ordering::SeqCst);

        built
    }

    fn lookup(&self, key: &CacheKey) -> Option<Arc<MonthlyAggregator>> {
        let entry = self.entry.read().unwrap_or_else(|e| e.into_inner());
        entry
            .as_ref()
            .filter(|c| &c.key == key)
            .map(|c| Arc::clone(&c.aggregator))
    }

    /// Drop the cached aggregation
    pub fn invalidate(&self) {
        let mut entry = self.entry.write().unwrap_or_else(|e| e.into_inner());
        *entry = None;
    }

    /// Number of rebuilds since creation
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::SeqCst)
    }
}

impl Default for AggregationCache {
    fn default() -> Self {
        Self::new()
    }
}
