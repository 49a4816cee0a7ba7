//! Analytics Engine
//!
//! Per-collection entry point. Owns the (transfer-filtered) transactions,
//! the configured calculators and an aggregation cache. Construct one engine
//! per transaction collection; nothing is shared between engines.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::models::{DashboardStats, SavingsSnapshot, Transaction};

use super::aggregator::MonthlyAggregator;
use super::anomalies::AnomalyDetector;
use super::cache::AggregationCache;
use super::dashboard::DashboardCalculator;
use super::income::{income_summary, spending_rate};
use super::rolling::RollingMetricsCalculator;
use super::seasonal::seasonal_patterns;
use super::transfers::filter_transfers;
use super::types::{
    CategoryAggregation, CategoryTimeSeriesPoint, IncomeSummary, MonthComparison,
    MonthlyAggregation, RollingMetrics, SeasonalPattern, SpendingAnomaly, SpendingRate,
    SummaryStats,
};

/// Analytics over one transaction collection
pub struct AnalyticsEngine {
    transactions: Vec<Transaction>,
    /// Bumped on every collection swap; keys the cache
    revision: u64,
    cache: AggregationCache,
    config: AnalyticsConfig,
    rolling: RollingMetricsCalculator,
    anomalies: AnomalyDetector,
    dashboard: DashboardCalculator,
}

impl AnalyticsEngine {
    /// Create an engine, dropping transfers first when the config says so
    pub fn new(transactions: Vec<Transaction>, config: AnalyticsConfig) -> Result<Self> {
        config.validate()?;

        let rolling = RollingMetricsCalculator::with_stable_band(
            config.rolling.window_size,
            config.rolling.stable_band_percent,
        )?
        .with_anchor(config.rolling.anchor);
        let anomalies = AnomalyDetector::with_threshold(config.anomalies.threshold_percent)?;
        let dashboard = DashboardCalculator::with_window_months(config.dashboard.window_months)?;

        let transactions = Self::prepare(transactions, &config);

        Ok(Self {
            transactions,
            revision: 0,
            cache: AggregationCache::new(),
            config,
            rolling,
            anomalies,
            dashboard,
        })
    }

    fn prepare(transactions: Vec<Transaction>, config: &AnalyticsConfig) -> Vec<Transaction> {
        if !config.filters.hide_transfers {
            return transactions;
        }
        let before = transactions.len();
        let filtered = filter_transfers(&transactions, true);
        debug!(
            dropped = before - filtered.len(),
            "Filtered transfer transactions"
        );
        filtered
    }

    /// Swap in a new collection; the next query rebuilds the aggregation
    pub fn replace_transactions(&mut self, transactions: Vec<Transaction>) {
        self.transactions = Self::prepare(transactions, &self.config);
        self.revision += 1;
    }

    /// The collection being analyzed, after transfer filtering
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Cached monthly aggregation for the current collection
    pub fn aggregation(&self) -> Arc<MonthlyAggregator> {
        self.cache
            .get_or_build_with_revision(self.revision, &self.transactions)
    }

    /// Number of times the aggregation has been built
    pub fn rebuild_count(&self) -> u64 {
        self.cache.rebuild_count()
    }

    /// Monthly aggregations, oldest first
    pub fn monthly_spending(&self) -> Vec<MonthlyAggregation> {
        self.aggregation().months().to_vec()
    }

    /// Top categories across the whole collection, `limit` or the configured count
    pub fn top_categories(&self, limit: Option<usize>) -> Vec<CategoryAggregation> {
        self.aggregation()
            .top_categories(limit.unwrap_or(self.config.reports.top_categories))
    }

    pub fn month_comparison(&self) -> MonthComparison {
        self.aggregation().month_comparison()
    }

    pub fn category_time_series(&self) -> Vec<CategoryTimeSeriesPoint> {
        self.aggregation().category_time_series()
    }

    pub fn summary_stats(&self) -> SummaryStats {
        self.aggregation().summary_stats()
    }

    /// Rolling metrics for the month totals or one category
    ///
    /// `window_size` overrides the configured window for this call.
    pub fn rolling_metrics(
        &self,
        category: Option<&str>,
        window_size: Option<usize>,
    ) -> Result<Vec<RollingMetrics>> {
        let aggregation = self.aggregation();
        match window_size {
            Some(window) => {
                let calculator = RollingMetricsCalculator::with_stable_band(
                    window,
                    self.config.rolling.stable_band_percent,
                )?
                .with_anchor(self.config.rolling.anchor);
                Ok(calculator.calculate(aggregation.months(), category))
            }
            None => Ok(self.rolling.calculate(aggregation.months(), category)),
        }
    }

    pub fn seasonal_patterns(&self) -> Vec<SeasonalPattern> {
        seasonal_patterns(self.aggregation().months())
    }

    /// Spending anomalies at the configured threshold or `threshold_percent`
    pub fn anomalies(&self, threshold_percent: Option<f64>) -> Result<Vec<SpendingAnomaly>> {
        let aggregation = self.aggregation();
        match threshold_percent {
            Some(threshold) => {
                Ok(AnomalyDetector::with_threshold(threshold)?.detect(aggregation.months()))
            }
            None => Ok(self.anomalies.detect(aggregation.months())),
        }
    }

    pub fn income_summary(&self) -> IncomeSummary {
        income_summary(&self.aggregation())
    }

    pub fn spending_rate(&self) -> SpendingRate {
        spending_rate(&self.aggregation())
    }

    /// Dashboard statistics as of `as_of`, with runway when a snapshot is given
    pub fn dashboard_stats(
        &self,
        snapshot: Option<&SavingsSnapshot>,
        as_of: DateTime<Utc>,
    ) -> DashboardStats {
        self.dashboard.calculate(&self.transactions, snapshot, as_of)
    }
}
