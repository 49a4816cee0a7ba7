//! Anomaly Detector
//!
//! Flags (month, category) spend that deviates from the category's average
//! by more than a percentage threshold.
//!
//! The baseline is the mean over the months in which the category appears,
//! not over all months. Sparse categories (annual insurance, holidays) are
//! therefore compared only against their own occurrences and get flagged
//! more often than a zero-filled baseline would.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

use super::types::{MonthlyAggregation, SpendingAnomaly};

/// Default deviation threshold, in percent
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 50.0;

/// Detects spending anomalies in monthly aggregations
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    /// Minimum |deviation| (exclusive) to report
    threshold_percent: f64,
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self {
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
        }
    }

    pub fn with_threshold(threshold_percent: f64) -> Result<Self> {
        if !threshold_percent.is_finite() || threshold_percent < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "anomaly threshold must be a non-negative percentage, got {}",
                threshold_percent
            )));
        }
        Ok(Self { threshold_percent })
    }

    pub fn threshold_percent(&self) -> f64 {
        self.threshold_percent
    }

    /// Anomalies sorted by |deviation|, largest first
    pub fn detect(&self, months: &[MonthlyAggregation]) -> Vec<SpendingAnomaly> {
        let averages = category_averages(months);
        let mut anomalies = Vec::new();

        for month in months {
            for cat in &month.categories {
                let average = averages.get(cat.category.as_str()).copied().unwrap_or(0.0);
                if average == 0.0 {
                    continue;
                }

                let deviation_percentage = ((cat.amount - average) / average) * 100.0;
                if deviation_percentage.abs() > self.threshold_percent {
                    anomalies.push(SpendingAnomaly {
                        month_key: month.month_key.clone(),
                        month_name: month.month_name.clone(),
                        category: cat.category.clone(),
                        amount: cat.amount,
                        average_amount: average,
                        deviation_percentage,
                    });
                }
            }
        }

        anomalies.sort_by(|a, b| {
            b.deviation_percentage
                .abs()
                .partial_cmp(&a.deviation_percentage.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.month_key.cmp(&b.month_key))
                .then_with(|| a.category.cmp(&b.category))
        });

        anomalies
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean monthly amount per category over the months it appears in
fn category_averages(months: &[MonthlyAggregation]) -> BTreeMap<&str, f64> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for month in months {
        for cat in &month.categories {
            let entry = sums.entry(cat.category.as_str()).or_insert((0.0, 0));
            entry.0 += cat.amount;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(category, (total, count))| (category, total / count as f64))
        .collect()
}
