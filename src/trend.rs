//! Trend analysis over dated value series

use serde::{Deserialize, Serialize};

use crate::series::ObservationSeries;

/// Direction of the detected trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Growing series
    Up,
    /// Shrinking series
    Down,
    /// No significant movement
    Stable,
}

/// Trailing simple moving averages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    /// Mean of the last 7 observations
    pub ma7: f64,
    /// Mean of the last 30 observations
    pub ma30: f64,
    /// Mean of the last 90 observations
    pub ma90: f64,
}

/// Result of trend analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendResult {
    /// Classified direction of the series
    pub direction: TrendDirection,
    /// Percentage change between the first and last third of the series
    pub growth_rate: f64,
    /// Trailing moving averages
    pub moving_averages: MovingAverages,
    /// Coefficient of variation of the series, as a percentage
    pub volatility: f64,
    /// Mean of all observation values
    pub average_value: f64,
}

/// Growth rates inside this band (in percent) classify as `Stable`
pub const STABLE_GROWTH_BAND: f64 = 5.0;

/// Analyze trend direction, growth, moving averages and volatility.
///
/// Never fails: sparse input degrades to zeroed metrics rather than an
/// error. A single observation yields that value as every moving average
/// with zero growth and volatility.
pub fn analyze_trend(series: &ObservationSeries) -> TrendResult {
    let values = series.values();
    if values.is_empty() {
        return TrendResult {
            direction: TrendDirection::Stable,
            growth_rate: 0.0,
            moving_averages: MovingAverages {
                ma7: 0.0,
                ma30: 0.0,
                ma90: 0.0,
            },
            volatility: 0.0,
            average_value: 0.0,
        };
    }

    let average = series.mean();
    let growth_rate = growth_rate(&values);

    let volatility = if average != 0.0 {
        series.std_dev() / average.abs() * 100.0
    } else {
        0.0
    };

    let direction = if growth_rate.abs() < STABLE_GROWTH_BAND {
        TrendDirection::Stable
    } else if growth_rate > 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };

    TrendResult {
        direction,
        growth_rate,
        moving_averages: MovingAverages {
            ma7: trailing_mean(&values, 7),
            ma30: trailing_mean(&values, 30),
            ma90: trailing_mean(&values, 90),
        },
        volatility,
        average_value: average,
    }
}

/// Mean of the last `window` values, or of the whole slice when shorter
fn trailing_mean(values: &[f64], window: usize) -> f64 {
    let n = values.len().min(window);
    if n == 0 {
        return 0.0;
    }
    values[values.len() - n..].iter().sum::<f64>() / n as f64
}

/// Percentage change between the mean of the first third and the mean of
/// the last third of the series. Short series fall back to a single-point
/// split rather than failing.
fn growth_rate(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let split = (values.len() / 3).max(1);
    let first: f64 = values[..split].iter().sum::<f64>() / split as f64;
    let last: f64 = values[values.len() - split..].iter().sum::<f64>() / split as f64;

    if first == 0.0 {
        return 0.0;
    }
    (last - first) / first.abs() * 100.0
}
