//! What-if scenario analysis over a baseline forecast

use serde::{Deserialize, Serialize};

use crate::forecast::ForecastPoint;
use crate::period::PeriodGranularity;

/// Kind of scenario adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Multiplicative, `adjustment_value` in percent
    Percentage,
    /// Additive amount per affected period
    Fixed,
    /// Additive amount attributed to a named category; applied at the
    /// aggregate level when no line-item breakdown exists
    Category,
}

/// A single parameterized adjustment to the baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioAdjustment {
    pub kind: AdjustmentKind,
    /// Category the adjustment is attributed to, for `Category` kinds
    pub category: Option<String>,
    /// Percent for `Percentage`, amount otherwise
    pub adjustment_value: f64,
    /// When set, only forecast points whose period key matches exactly
    /// are affected
    pub effective_period: Option<String>,
    /// Free-form rationale supplied by the caller
    pub reason: Option<String>,
}

/// Base-vs-adjusted totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub base_total: f64,
    pub adjusted_total: f64,
    pub difference: f64,
    /// Percentage change implied by the adjustments before the zero floor,
    /// so an extreme negative request is reported at face value
    pub percentage_difference: f64,
}

/// Impact of the scenario on one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodImpact {
    pub period: String,
    pub impact: f64,
}

/// Total and per-period impact of the scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub total_impact: f64,
    pub period_impacts: Vec<PeriodImpact>,
}

/// Result of applying a scenario to a baseline forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// The adjustments, in application order
    pub adjustments: Vec<ScenarioAdjustment>,
    pub adjusted_predictions: Vec<ForecastPoint>,
    pub comparison: ScenarioComparison,
    pub impact_summary: ImpactSummary,
}

/// Apply scenario adjustments to a baseline forecast.
///
/// Adjustments compose by sequential application in the order given.
/// After all adjustments every prediction is floored at zero, even under
/// extreme negative percentages. Period-scoped adjustments match the
/// period key derived from each point's date at the given granularity.
pub fn apply_scenario(
    baseline: &[ForecastPoint],
    adjustments: &[ScenarioAdjustment],
    granularity: PeriodGranularity,
) -> ScenarioResult {
    let mut adjusted_predictions = Vec::with_capacity(baseline.len());
    let mut period_impacts = Vec::with_capacity(baseline.len());

    let mut base_total = 0.0;
    let mut raw_adjusted_total = 0.0;
    let mut adjusted_total = 0.0;

    for point in baseline {
        let period = granularity.label(point.date);
        let mut adjusted = point.predicted;

        for adjustment in adjustments {
            if let Some(effective) = &adjustment.effective_period {
                if *effective != period {
                    continue;
                }
            }
            match adjustment.kind {
                AdjustmentKind::Percentage => {
                    adjusted *= 1.0 + adjustment.adjustment_value / 100.0;
                }
                AdjustmentKind::Fixed | AdjustmentKind::Category => {
                    adjusted += adjustment.adjustment_value;
                }
            }
        }

        let floored = adjusted.max(0.0);

        // Scale the bounds with the prediction so the interval keeps its
        // relative width; a zero-predicted baseline carries no interval
        let (lower_bound, upper_bound) = if point.predicted > 0.0 {
            let ratio = floored / point.predicted;
            ((point.lower_bound * ratio).max(0.0), point.upper_bound * ratio)
        } else {
            (floored, floored)
        };

        base_total += point.predicted;
        raw_adjusted_total += adjusted;
        adjusted_total += floored;
        period_impacts.push(PeriodImpact {
            period,
            impact: floored - point.predicted,
        });

        adjusted_predictions.push(ForecastPoint {
            date: point.date,
            predicted: floored,
            lower_bound,
            upper_bound,
            confidence: point.confidence,
        });
    }

    let percentage_difference = if base_total != 0.0 {
        (raw_adjusted_total - base_total) / base_total * 100.0
    } else {
        0.0
    };

    ScenarioResult {
        adjustments: adjustments.to_vec(),
        adjusted_predictions,
        comparison: ScenarioComparison {
            base_total,
            adjusted_total,
            difference: adjusted_total - base_total,
            percentage_difference,
        },
        impact_summary: ImpactSummary {
            total_impact: adjusted_total - base_total,
            period_impacts,
        },
    }
}
