//! Statistical anomaly detection over dated value series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::series::ObservationSeries;

/// Minimum number of observations before any anomaly is reported
pub const MIN_BASELINE_POINTS: usize = 30;

/// Rolling window used to establish the locally expected value
const WINDOW: usize = 30;

/// Deviation scores above this threshold flag a point as anomalous
const FLAG_THRESHOLD: f64 = 2.0;

/// Upper bound on the flat-window pseudo z-score, keeping scores finite
/// and serializable
const PSEUDO_SCORE_CAP: f64 = 100.0;

/// Kind of anomalous movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Value far above the local expectation
    Spike,
    /// Value far below the local expectation
    Drop,
}

/// Severity band, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Map a deviation score to a severity band. Monotonic: a larger
    /// deviation never yields a lower severity.
    fn from_deviation(score: f64) -> Self {
        if score > 4.0 {
            Severity::Critical
        } else if score > 3.5 {
            Severity::High
        } else if score > 2.5 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// A statistically unusual point in a series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    /// Date of the anomalous observation
    pub date: NaiveDate,
    /// Spike or drop relative to the local expectation
    pub kind: AnomalyKind,
    /// Severity band derived from the deviation score
    pub severity: Severity,
    /// Rolling-window mean the point was compared against
    pub expected_value: f64,
    /// Observed value
    pub actual_value: f64,
    /// Absolute deviation in standard deviations from the window mean
    pub deviation_score: f64,
    /// Caller-supplied label of the series (e.g. "revenue")
    pub label: String,
}

/// Detect spikes and drops against a 30-point rolling baseline.
///
/// Returns an empty vector when the series holds fewer than
/// [`MIN_BASELINE_POINTS`] observations. When the rolling window is
/// perfectly flat, a pseudo z-score of four times the relative deviation
/// from the window mean stands in for the undefined z-score, capped so
/// scores stay finite even over an all-zero window.
pub fn detect_anomalies(series: &ObservationSeries, label: &str) -> Vec<Anomaly> {
    if series.len() < MIN_BASELINE_POINTS {
        return Vec::new();
    }

    let observations = series.observations();
    let values = series.values();
    let mut anomalies = Vec::new();

    for i in WINDOW..values.len() {
        let window = &values[i - WINDOW..i];
        let window_mean = window.iter().sum::<f64>() / WINDOW as f64;
        let window_var = window
            .iter()
            .map(|v| (v - window_mean).powi(2))
            .sum::<f64>()
            / WINDOW as f64;
        let window_std = window_var.sqrt();

        let (z_score, abs_z) = if window_std == 0.0 {
            let relative = if window_mean != 0.0 {
                (values[i] - window_mean).abs() / window_mean.abs()
            } else if values[i] != 0.0 {
                PSEUDO_SCORE_CAP
            } else {
                0.0
            };
            // 50% deviation from a flat window counts as two sigma
            let pseudo = (relative * 4.0).min(PSEUDO_SCORE_CAP);
            if values[i] >= window_mean {
                (pseudo, pseudo)
            } else {
                (-pseudo, pseudo)
            }
        } else {
            let z = (values[i] - window_mean) / window_std;
            (z, z.abs())
        };

        if abs_z > FLAG_THRESHOLD {
            anomalies.push(Anomaly {
                date: observations[i].date,
                kind: if z_score > 0.0 {
                    AnomalyKind::Spike
                } else {
                    AnomalyKind::Drop
                },
                severity: Severity::from_deviation(abs_z),
                expected_value: window_mean,
                actual_value: values[i],
                deviation_score: abs_z,
                label: label.to_string(),
            });
        }
    }

    anomalies
}
