//! Seasonal Analyzer

use super::types::{MonthlyAggregation, Season, SeasonalPattern};

/// Average monthly spending per season, in Spring, Summer, Fall, Winter order
///
/// A season with no months of history averages to 0.
pub fn seasonal_patterns(months: &[MonthlyAggregation]) -> Vec<SeasonalPattern> {
    Season::all()
        .iter()
        .map(|&season| {
            let (total, count) = months
                .iter()
                .filter(|m| Season::for_month(m.month) == season)
                .fold((0.0, 0usize), |(total, count), m| (total + m.total, count + 1));

            SeasonalPattern {
                season,
                average_spending: if count > 0 { total / count as f64 } else { 0.0 },
                months: season.months().to_vec(),
            }
        })
        .collect()
}
