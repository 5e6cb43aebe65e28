//! Forecast generation over period-bucketed history

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::period::PeriodGranularity;
use crate::seasonality::SeasonalityResult;
use crate::series::ObservationSeries;

/// Window used by the moving-average and blended methods
const MA_WINDOW: usize = 3;

/// Per-step decay applied to the reported confidence
const CONFIDENCE_DECAY: f64 = 0.95;

/// Forecasting method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Mean of the trailing three periods
    #[default]
    MovingAverage,
    /// Linear extrapolation of the fitted trend
    Linear,
    /// Compound growth at the fitted trend rate
    Exponential,
    /// Baseline shaped by detected (or assumed) monthly pattern
    Seasonal,
    /// Blend of the linear and moving-average methods
    AiEnhanced,
}

/// A single forecasted period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// First day of the forecasted period
    pub date: NaiveDate,
    /// Predicted value, floored at zero
    pub predicted: f64,
    /// Lower confidence bound, floored at zero
    pub lower_bound: f64,
    /// Upper confidence bound
    pub upper_bound: f64,
    /// Confidence in this point, decaying with horizon
    pub confidence: f64,
}

/// Parameters shared by forecast generation and back-testing
#[derive(Debug, Clone)]
pub struct ForecastParams {
    /// Forecasting method
    pub method: ForecastMethod,
    /// Period granularity of history buckets and forecast steps
    pub granularity: PeriodGranularity,
    /// Number of future periods to forecast
    pub horizon_periods: usize,
    /// Confidence level for the interval bounds, in (0, 1)
    pub confidence_level: f64,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            method: ForecastMethod::default(),
            granularity: PeriodGranularity::default(),
            horizon_periods: 6,
            confidence_level: 0.95,
        }
    }
}

impl ForecastParams {
    /// Fail fast on malformed parameters
    pub fn validate(&self) -> Result<()> {
        if self.horizon_periods == 0 {
            return Err(ForecastError::InvalidParameter(
                "Horizon must be at least one period".to_string(),
            ));
        }
        if self.confidence_level <= 0.0 || self.confidence_level >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "Confidence level must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Baseline statistics a forecast extrapolates from
#[derive(Debug, Clone, Copy)]
pub(crate) struct Baseline {
    /// Mean period value
    pub base: f64,
    /// Fitted per-period trend slope
    pub slope: f64,
    /// Dispersion of the period values, drives interval width
    pub dispersion: f64,
}

impl Baseline {
    pub(crate) fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                base: 0.0,
                slope: 0.0,
                dispersion: 0.0,
            };
        }

        let base = values.iter().sum::<f64>() / values.len() as f64;
        let dispersion = {
            let variance = values.iter().map(|v| (v - base).powi(2)).sum::<f64>()
                / values.len() as f64;
            variance.sqrt()
        };

        Self {
            base,
            slope: regression_slope(values),
            dispersion,
        }
    }
}

/// Generate a forecast for `horizon_periods` future periods.
///
/// History is bucketed by the configured granularity, a baseline is fitted
/// over the bucket totals, and each future period extrapolates it with the
/// chosen method. When `seasonality.has_seasonality`, the baseline of every
/// step is multiplied by the seasonal index of the step's calendar month.
///
/// Interval half-width grows with the square root of the step index, so
/// interval width never shrinks along the horizon. Every prediction and
/// lower bound is floored at zero. An empty history forecasts zero for
/// every period.
pub fn generate_forecast(
    series: &ObservationSeries,
    params: &ForecastParams,
    seasonality: &SeasonalityResult,
) -> Result<Vec<ForecastPoint>> {
    params.validate()?;

    let buckets = series.aggregate_by_period(params.granularity);
    let values: Vec<f64> = buckets.iter().map(|b| b.total).collect();
    let anchor = buckets
        .last()
        .map(|b| b.start)
        .unwrap_or_else(|| params.granularity.period_start(Utc::now().date_naive()));

    Ok(forecast_from_values(
        &values,
        anchor,
        params,
        seasonality,
        Baseline::from_values(&values),
    ))
}

/// Extrapolate period values forward from `anchor`. The caller supplies the
/// baseline so paths with no history can substitute their own (e.g. a budget
/// allocation split into periods).
pub(crate) fn forecast_from_values(
    values: &[f64],
    anchor: NaiveDate,
    params: &ForecastParams,
    seasonality: &SeasonalityResult,
    baseline: Baseline,
) -> Vec<ForecastPoint> {
    let z = z_score(params.confidence_level);
    let n = values.len();
    let moving_avg = trailing_window_mean(values, baseline.base);

    let mut points = Vec::with_capacity(params.horizon_periods);
    let mut previous_width = 0.0_f64;

    for step in 0..params.horizon_periods {
        let date = params.granularity.add_periods(anchor, (step + 1) as u32);

        let mut predicted = match params.method {
            ForecastMethod::MovingAverage => moving_avg,
            ForecastMethod::Linear => baseline.base + baseline.slope * (n + step) as f64,
            ForecastMethod::Exponential => {
                compound_growth(baseline.base, baseline.slope, step)
            }
            ForecastMethod::Seasonal => {
                if seasonality.has_seasonality {
                    baseline.base
                } else {
                    // No detected pattern: assume a mild annual wave
                    let phase = date.month0() as f64 / 12.0 * std::f64::consts::TAU;
                    baseline.base * (1.0 + phase.sin() * 0.1)
                }
            }
            ForecastMethod::AiEnhanced => {
                let linear = baseline.base + baseline.slope * (n + step) as f64;
                linear * 0.4 + moving_avg * 0.6
            }
        };

        if seasonality.has_seasonality {
            predicted *= seasonality.index_for_month(date.month0());
        }
        predicted = predicted.max(0.0);

        let half_width = baseline.dispersion * z * ((step + 1) as f64).sqrt();
        let lower_bound = (predicted - half_width).max(0.0);
        let mut upper_bound = predicted + half_width;

        // The zero floor on the lower bound can narrow the interval; widen
        // the upper bound so the width stays non-decreasing along the horizon
        if upper_bound - lower_bound < previous_width {
            upper_bound = lower_bound + previous_width;
        }
        previous_width = upper_bound - lower_bound;

        points.push(ForecastPoint {
            date,
            predicted,
            lower_bound,
            upper_bound,
            confidence: params.confidence_level * CONFIDENCE_DECAY.powi(step as i32),
        });
    }

    points
}

/// Mean of the trailing [`MA_WINDOW`] values, falling back to `default`
fn trailing_window_mean(values: &[f64], default: f64) -> f64 {
    let window = values.len().min(MA_WINDOW);
    if window == 0 {
        return default;
    }
    values[values.len() - window..].iter().sum::<f64>() / window as f64
}

/// Compound the base value at the slope-implied growth rate
fn compound_growth(base: f64, slope: f64, step: usize) -> f64 {
    if base == 0.0 {
        return 0.0;
    }
    let grown = base * (1.0 + slope / base).powi((step + 1) as i32);
    if grown.is_finite() {
        grown
    } else {
        base
    }
}

/// Ordinary least squares slope over the value index
fn regression_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let nf = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, v)| i as f64 * v).sum();
    let sum_x2: f64 = (0..n).map(|i| (i * i) as f64).sum();

    let denominator = nf * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (nf * sum_xy - sum_x * sum_y) / denominator
}

/// Approximate z-score for common confidence levels
fn z_score(confidence_level: f64) -> f64 {
    match confidence_level {
        c if c >= 0.99 => 2.576,
        c if c >= 0.95 => 1.96,
        c if c >= 0.90 => 1.645,
        c if c >= 0.85 => 1.44,
        c if c >= 0.80 => 1.28,
        _ => 1.0,
    }
}
