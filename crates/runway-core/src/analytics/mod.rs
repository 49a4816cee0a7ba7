//! Transaction analytics
//!
//! Everything here is a pure function of a transaction collection:
//!
//! - **Monthly aggregation**: expenses grouped by month and category, cached
//!   per collection
//! - **Rolling metrics**: trailing averages with trend labels
//! - **Seasonal patterns**: average spending per season
//! - **Anomalies**: category spend far from its own average
//! - **Income summary**: income totals and spending rate
//! - **Dashboard**: headline averages, last month, runway
//!
//! [`AnalyticsEngine`] ties them together for one collection.

pub mod aggregator;
pub mod anomalies;
pub mod cache;
pub mod dashboard;
pub mod engine;
pub mod income;
pub mod rolling;
pub mod seasonal;
pub mod transfers;
pub mod types;

pub use aggregator::{month_key, month_label, MonthlyAggregator};
pub use anomalies::AnomalyDetector;
pub use cache::{AggregationCache, CacheKey};
pub use dashboard::DashboardCalculator;
pub use engine::AnalyticsEngine;
pub use income::{income_summary, spending_rate};
pub use rolling::{RollingMetricsCalculator, WindowAnchor};
pub use seasonal::seasonal_patterns;
pub use transfers::filter_transfers;
pub use types::*;

/// Percentage change of `current` relative to `base`, 0 when `base` is not positive
pub(crate) fn percent_change(current: f64, base: f64) -> f64 {
    if base > 0.0 {
        ((current - base) / base) * 100.0
    } else {
        0.0
    }
}
