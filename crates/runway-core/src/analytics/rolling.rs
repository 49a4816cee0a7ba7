//! Rolling Metrics Calculator
//!
//! Trailing N-month averages of either total spending or one category,
//! with a trend label for each month once the window is full.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::percent_change;
use super::types::{MonthlyAggregation, RollingMetrics, Trend};

/// Default trailing window, in months
pub const DEFAULT_WINDOW_SIZE: usize = 6;

/// Default |change| (percent) still considered stable
pub const DEFAULT_STABLE_BAND_PERCENT: f64 = 5.0;

/// Where the averaging window sits relative to the month being scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowAnchor {
    /// The window ends at and includes the current month. First entry at
    /// index `window_size - 1`.
    #[default]
    IncludingCurrent,
    /// The window is the `window_size` months before the current month, so
    /// the current month is scored against a pure baseline. First entry at
    /// index `window_size`.
    PrecedingCurrent,
}

/// Calculates rolling averages over monthly aggregations
#[derive(Debug, Clone)]
pub struct RollingMetricsCalculator {
    /// Months in each window
    window_size: usize,
    /// Largest |percentage change| labelled stable
    stable_band_percent: f64,
    anchor: WindowAnchor,
}

impl RollingMetricsCalculator {
    pub fn new(window_size: usize) -> Result<Self> {
        Self::with_stable_band(window_size, DEFAULT_STABLE_BAND_PERCENT)
    }

    pub fn with_stable_band(window_size: usize, stable_band_percent: f64) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::InvalidArgument(
                "rolling window size must be at least 1".to_string(),
            ));
        }
        if !stable_band_percent.is_finite() || stable_band_percent < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "stable band must be a non-negative percentage, got {}",
                stable_band_percent
            )));
        }

        Ok(Self {
            window_size,
            stable_band_percent,
            anchor: WindowAnchor::default(),
        })
    }

    pub fn with_anchor(mut self, anchor: WindowAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One entry per month from the first full window onward
    ///
    /// With `category`, each month's value is that category's amount (0 where
    /// the category has no spending); otherwise the month total. Too few
    /// months for a full window yields an empty list.
    pub fn calculate(
        &self,
        months: &[MonthlyAggregation],
        category: Option<&str>,
    ) -> Vec<RollingMetrics> {
        let value_of = |month: &MonthlyAggregation| match category {
            Some(name) => month.category_amount(name),
            None => month.total,
        };

        let span = match self.anchor {
            WindowAnchor::IncludingCurrent => self.window_size,
            WindowAnchor::PrecedingCurrent => self.window_size.saturating_add(1),
        };

        months
            .windows(span)
            .filter_map(|slice| {
                let (current, window) = match self.anchor {
                    WindowAnchor::IncludingCurrent => (slice.last()?, slice),
                    WindowAnchor::PrecedingCurrent => slice.split_last()?,
                };

                let current_value = value_of(current);
                let rolling_sum: f64 = window.iter().map(value_of).sum();
                let rolling_average = rolling_sum / self.window_size as f64;
                let percentage_change = percent_change(current_value, rolling_average);

                Some(RollingMetrics {
                    month_key: current.month_key.clone(),
                    rolling_average,
                    current_month: current_value,
                    percentage_change,
                    trend: self.classify(percentage_change),
                })
            })
            .collect()
    }

    fn classify(&self, percentage_change: f64) -> Trend {
        if percentage_change.abs() <= self.stable_band_percent {
            Trend::Stable
        } else if percentage_change > 0.0 {
            Trend::Increasing
        } else {
            Trend::Decreasing
        }
    }
}

impl Default for RollingMetricsCalculator {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            stable_band_percent: DEFAULT_STABLE_BAND_PERCENT,
            anchor: WindowAnchor::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregator::MonthlyAggregator;
    use crate::test_utils::{date, expense, monthly_expenses};

    fn months_for(amounts: &[f64]) -> Vec<MonthlyAggregation> {
        MonthlyAggregator::build(&monthly_expenses((2024, 1), amounts, "Groceries"))
            .months()
            .to_vec()
    }

    const SPIKE: [f64; 7] = [100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 200.0];

    #[test]
    fn test_window_includes_current_month() {
        let metrics = RollingMetricsCalculator::default().calculate(&months_for(&SPIKE), None);

        // Seven months with a six-month window: windows end at months 6 and 7
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].month_key, "2024-06");
        assert_eq!(metrics[0].rolling_average, 100.0);
        assert_eq!(metrics[0].percentage_change, 0.0);
        assert_eq!(metrics[0].trend, Trend::Stable);

        let last = &metrics[1];
        assert_eq!(last.month_key, "2024-07");
        assert!((last.rolling_average - 700.0 / 6.0).abs() < 1e-9);
        assert_eq!(last.current_month, 200.0);
        assert_eq!(last.trend, Trend::Increasing);
    }

    #[test]
    fn test_preceding_window_scores_against_baseline() {
        let calc = RollingMetricsCalculator::new(6)
            .unwrap()
            .with_anchor(WindowAnchor::PrecedingCurrent);
        let metrics = calc.calculate(&months_for(&SPIKE), None);

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].month_key, "2024-07");
        assert_eq!(metrics[0].rolling_average, 100.0);
        assert_eq!(metrics[0].current_month, 200.0);
        assert!((metrics[0].percentage_change - 100.0).abs() < 1e-9);
        assert_eq!(metrics[0].trend, Trend::Increasing);
    }

    #[test]
    fn test_too_few_months_is_empty() {
        let months = months_for(&[100.0, 100.0, 100.0]);
        assert!(RollingMetricsCalculator::default()
            .calculate(&months, None)
            .is_empty());

        let preceding = RollingMetricsCalculator::new(3)
            .unwrap()
            .with_anchor(WindowAnchor::PrecedingCurrent);
        assert!(preceding.calculate(&months, None).is_empty());
    }

    #[test]
    fn test_huge_preceding_window_is_empty() {
        let calc = RollingMetricsCalculator::new(usize::MAX)
            .unwrap()
            .with_anchor(WindowAnchor::PrecedingCurrent);
        assert!(calc.calculate(&months_for(&SPIKE), None).is_empty());
    }

    #[test]
    fn test_invalid_arguments_rejected() {
        assert!(matches!(
            RollingMetricsCalculator::new(0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(RollingMetricsCalculator::with_stable_band(3, -1.0).is_err());
        assert!(RollingMetricsCalculator::with_stable_band(3, f64::NAN).is_err());
    }

    #[test]
    fn test_category_missing_months_count_as_zero() {
        let mut txs = monthly_expenses((2024, 1), &[100.0, 100.0, 100.0], "Rent");
        txs.push(expense("d1", date(2024, 1, 10), 30.0, "Dining"));
        txs.push(expense("d3", date(2024, 3, 10), 60.0, "Dining"));
        let agg = MonthlyAggregator::build(&txs);

        let calc = RollingMetricsCalculator::new(3).unwrap();
        let metrics = calc.calculate(agg.months(), Some("Dining"));

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].rolling_average, 30.0);
        assert_eq!(metrics[0].current_month, 60.0);
        assert!((metrics[0].percentage_change - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_average_gives_zero_change() {
        let months = months_for(&[10.0, 10.0]);
        let calc = RollingMetricsCalculator::new(2).unwrap();
        let metrics = calc.calculate(&months, Some("Nonexistent"));
        assert_eq!(metrics[0].percentage_change, 0.0);
        assert_eq!(metrics[0].trend, Trend::Stable);
    }

    #[test]
    fn test_stable_band_boundary() {
        let calc = RollingMetricsCalculator::default();
        assert_eq!(calc.classify(5.0), Trend::Stable);
        assert_eq!(calc.classify(-5.0), Trend::Stable);
        assert_eq!(calc.classify(5.01), Trend::Increasing);
        assert_eq!(calc.classify(-5.01), Trend::Decreasing);
    }
}
