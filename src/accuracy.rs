//! Forecast accuracy back-testing against held-out history

use serde::{Deserialize, Serialize};

use crate::forecast::{forecast_from_values, Baseline, ForecastParams};
use crate::seasonality::SeasonalityResult;
use crate::series::ObservationSeries;

/// Size of the held-out suffix used for back-testing
pub const HOLDOUT_PERIODS: usize = 3;

/// Qualitative accuracy band derived from MAPE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyBand {
    /// MAPE below 10
    High,
    /// MAPE below 20
    Medium,
    /// Everything else
    Low,
}

impl AccuracyBand {
    fn from_mape(mape: f64) -> Self {
        if mape < 10.0 {
            AccuracyBand::High
        } else if mape < 20.0 {
            AccuracyBand::Medium
        } else {
            AccuracyBand::Low
        }
    }
}

/// Error metrics from back-testing a forecast method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean absolute percentage error
    pub mape: f64,
    /// Root mean square error
    pub rmse: f64,
    /// Mean square error
    pub mse: f64,
    /// Qualitative band derived from MAPE
    pub accuracy: AccuracyBand,
}

/// Back-test the configured method against already-observed history.
///
/// History is bucketed by the configured granularity, the last
/// [`HOLDOUT_PERIODS`] buckets are held out, and the method is re-run over
/// the training prefix. Returns `None` unless at least one training bucket
/// remains ahead of the holdout; callers must treat that as "no accuracy",
/// not zero error.
pub fn evaluate_accuracy(
    series: &ObservationSeries,
    params: &ForecastParams,
) -> Option<AccuracyMetrics> {
    let buckets = series.aggregate_by_period(params.granularity);
    if buckets.len() <= HOLDOUT_PERIODS {
        return None;
    }

    let values: Vec<f64> = buckets.iter().map(|b| b.total).collect();
    let split = values.len() - HOLDOUT_PERIODS;
    let (train, holdout) = values.split_at(split);

    let backtest_params = ForecastParams {
        horizon_periods: HOLDOUT_PERIODS,
        ..params.clone()
    };
    let forecast = forecast_from_values(
        train,
        buckets[split - 1].start,
        &backtest_params,
        &SeasonalityResult::none(),
        Baseline::from_values(train),
    );

    let errors: Vec<f64> = forecast
        .iter()
        .zip(holdout.iter())
        .map(|(point, actual)| point.predicted - actual)
        .collect();

    let mse = errors.iter().map(|e| e * e).sum::<f64>() / errors.len() as f64;
    let rmse = mse.sqrt();

    let percent_errors: Vec<f64> = holdout
        .iter()
        .zip(errors.iter())
        .filter(|(actual, _)| **actual != 0.0)
        .map(|(actual, error)| (error / actual).abs() * 100.0)
        .collect();
    let mape = if percent_errors.is_empty() {
        0.0
    } else {
        percent_errors.iter().sum::<f64>() / percent_errors.len() as f64
    };

    Some(AccuracyMetrics {
        mape,
        rmse,
        mse,
        accuracy: AccuracyBand::from_mape(mape),
    })
}
