//! Runway Core Library
//!
//! Transaction analytics for the Runway personal finance tool:
//! - Canonical transaction model and savings snapshot
//! - Monthly/category aggregation with a content-keyed cache
//! - Rolling averages, seasonal patterns and anomaly detection
//! - Income summary and spending rate
//! - Dashboard statistics with a trailing-window policy and runway
//! - Loaders for normalized JSON/CSV transaction files
//! - TOML configuration with embedded defaults

pub mod analytics;
pub mod config;
pub mod error;
pub mod import;
pub mod models;

/// Test utilities for building transaction collections
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analytics::{
    AggregationCache, AnalyticsEngine, AnomalyDetector, CacheKey, CategoryAggregation,
    CategoryTimeSeriesPoint, DashboardCalculator, IncomeSummary, MonthComparison,
    MonthlyAggregation, MonthlyAggregator, RollingMetrics, RollingMetricsCalculator, Season,
    SeasonalPattern, SpendingAnomaly, SpendingRate, SummaryStats, Trend, WindowAnchor,
};
pub use config::AnalyticsConfig;
pub use error::{Error, Result};
pub use import::{load_snapshot, load_transactions, FileFormat};
pub use models::{
    DashboardStats, DashboardWindow, SavingsSnapshot, Transaction, TransactionRecord,
};
