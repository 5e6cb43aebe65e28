//! Seasonal pattern detection from calendar-month averages

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::series::ObservationSeries;

/// Minimum span (in days) between the first and last observation before
/// seasonal indices are computed at all
pub const MIN_SPAN_DAYS: i64 = 300;

/// Indices above this mark a peak month, below its inverse a low month
const PEAK_INDEX_FLOOR: f64 = 1.1;
const LOW_INDEX_CEILING: f64 = 0.9;

/// Result of seasonality detection
///
/// `seasonal_indices` maps calendar month (0 = January) to a multiplier
/// relative to the overall mean. Below the minimum span everything is
/// empty and `has_seasonality` is false.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonalityResult {
    /// Whether a measurable seasonal pattern was found
    pub has_seasonality: bool,
    /// Dispersion of the monthly indices (coefficient of variation)
    pub strength: f64,
    /// Month (0-11) to seasonal multiplier
    pub seasonal_indices: BTreeMap<u32, f64>,
    /// Months with the highest indices, strongest first
    pub peak_months: Vec<u32>,
    /// Months with the lowest indices, weakest first
    pub low_months: Vec<u32>,
}

impl SeasonalityResult {
    /// A result carrying no seasonal signal
    pub fn none() -> Self {
        Self::default()
    }

    /// Multiplier for a calendar month (0 = January), 1.0 when unknown
    pub fn index_for_month(&self, month0: u32) -> f64 {
        self.seasonal_indices.get(&month0).copied().unwrap_or(1.0)
    }
}

/// Detect seasonal patterns in a dated series.
///
/// Groups observations by calendar month across all years present and
/// derives each month's index as its mean divided by the overall mean.
/// Returns [`SeasonalityResult::none`] when the series spans fewer than
/// [`MIN_SPAN_DAYS`] days.
pub fn detect_seasonality(series: &ObservationSeries) -> SeasonalityResult {
    if series.span_days() < MIN_SPAN_DAYS {
        return SeasonalityResult::none();
    }

    let mut by_month: [Vec<f64>; 12] = Default::default();
    for obs in series.observations() {
        by_month[obs.date.month0() as usize].push(obs.value);
    }

    let overall = series.mean();
    let mut seasonal_indices = BTreeMap::new();
    for (month, values) in by_month.iter().enumerate() {
        let index = if !values.is_empty() && overall != 0.0 {
            values.iter().sum::<f64>() / values.len() as f64 / overall
        } else {
            1.0
        };
        seasonal_indices.insert(month as u32, index);
    }

    let indices: Vec<f64> = seasonal_indices.values().copied().collect();
    let index_mean = indices.iter().sum::<f64>() / indices.len() as f64;
    let index_var = indices
        .iter()
        .map(|i| (i - index_mean).powi(2))
        .sum::<f64>()
        / indices.len() as f64;
    let strength = if index_mean != 0.0 {
        index_var.sqrt() / index_mean
    } else {
        0.0
    };

    // Ranked by index, ties broken by earliest month
    let mut ranked: Vec<(u32, f64)> = seasonal_indices
        .iter()
        .map(|(m, i)| (*m, *i))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    let peak_months: Vec<u32> = ranked
        .iter()
        .take(3)
        .filter(|(_, index)| *index > PEAK_INDEX_FLOOR)
        .map(|(month, _)| *month)
        .collect();

    let mut ranked_low = ranked.clone();
    ranked_low.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    let low_months: Vec<u32> = ranked_low
        .iter()
        .take(3)
        .filter(|(_, index)| *index < LOW_INDEX_CEILING)
        .map(|(month, _)| *month)
        .collect();

    SeasonalityResult {
        has_seasonality: strength > 0.0,
        strength,
        seasonal_indices,
        peak_months,
        low_months,
    }
}
