//! Budget spend forecasting against an allocation snapshot

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::accuracy::{evaluate_accuracy, AccuracyMetrics};
use crate::error::Result;
use crate::forecast::{forecast_from_values, Baseline, ForecastMethod, ForecastParams, ForecastPoint};
use crate::seasonality::SeasonalityResult;
use crate::series::ObservationSeries;

/// Dispersion assumed when no spend history exists, as a share of the base
const NO_HISTORY_DISPERSION: f64 = 0.2;

/// Predictions below this confidence count as low-confidence for risk
/// identification
const LOW_CONFIDENCE_FLOOR: f64 = 0.6;

/// Caller-supplied snapshot of the budget being forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    /// Display name of the budget
    pub name: String,
    /// Total allocated amount over the budget's life
    pub allocated_amount: f64,
    /// Amount already spent
    pub spent_amount: f64,
}

/// Aggregated view over the predicted spend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub total_predicted_spending: f64,
    pub total_budget_remaining: f64,
    /// Remaining allocation minus predicted spend
    pub projected_end_balance: f64,
    /// Predicted spend per period
    pub burn_rate: f64,
    /// Whole periods until the remaining allocation is exhausted at the
    /// current burn rate; `None` when nothing is being spent
    pub runway_periods: Option<u32>,
    pub projected_over_under: f64,
    /// Over/under as a percentage of the allocation
    pub over_under_percentage: f64,
}

/// Kind of identified forecast risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    Overspending,
    Underspending,
    Timing,
}

/// Likelihood band of an identified risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProbability {
    Low,
    Medium,
    High,
}

/// A risk identified from the forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRisk {
    pub kind: RiskKind,
    pub description: String,
    pub probability: RiskProbability,
    /// Monetary magnitude of the risk
    pub impact: f64,
    pub mitigation: String,
}

/// A budget spend forecast with summary, risks and assumptions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetForecast {
    pub budget_name: String,
    pub method: ForecastMethod,
    pub horizon_periods: usize,
    /// Number of historical period buckets the forecast is based on
    pub based_on_history: usize,
    pub predictions: Vec<ForecastPoint>,
    pub summary: ForecastSummary,
    /// Absent when fewer than the back-testing minimum of periods exist
    pub accuracy: Option<AccuracyMetrics>,
    pub assumptions: Vec<String>,
    pub risks: Vec<ForecastRisk>,
}

/// Forecast future spend for a budget.
///
/// Spend history is bucketed by the configured granularity. With no
/// history at all the forecast falls back to the allocation spread over
/// twelve months as its base value, with an assumed dispersion of
/// [`NO_HISTORY_DISPERSION`] of that base.
pub fn create_budget_forecast(
    budget: &BudgetSnapshot,
    history: &ObservationSeries,
    params: &ForecastParams,
    seasonality: &SeasonalityResult,
) -> Result<BudgetForecast> {
    params.validate()?;

    let buckets = history.aggregate_by_period(params.granularity);
    let values: Vec<f64> = buckets.iter().map(|b| b.total).collect();
    let based_on_history = values.len();

    let baseline = if values.is_empty() {
        let base = budget.allocated_amount / 12.0;
        Baseline {
            base,
            slope: 0.0,
            dispersion: base * NO_HISTORY_DISPERSION,
        }
    } else {
        Baseline::from_values(&values)
    };

    let anchor = buckets
        .last()
        .map(|b| b.start)
        .unwrap_or_else(|| params.granularity.period_start(Utc::now().date_naive()));
    let predictions = forecast_from_values(&values, anchor, params, seasonality, baseline);

    let summary = summarize(&predictions, budget);
    let accuracy = evaluate_accuracy(history, params);
    let risks = identify_risks(&predictions, &summary);
    let assumptions = assumptions(params.method, based_on_history);

    Ok(BudgetForecast {
        budget_name: budget.name.clone(),
        method: params.method,
        horizon_periods: params.horizon_periods,
        based_on_history,
        predictions,
        summary,
        accuracy,
        assumptions,
        risks,
    })
}

fn summarize(predictions: &[ForecastPoint], budget: &BudgetSnapshot) -> ForecastSummary {
    let total_predicted_spending: f64 = predictions.iter().map(|p| p.predicted).sum();
    let burn_rate = if predictions.is_empty() {
        0.0
    } else {
        total_predicted_spending / predictions.len() as f64
    };

    let total_budget_remaining = budget.allocated_amount - budget.spent_amount;
    let projected_end_balance = total_budget_remaining - total_predicted_spending;

    let runway_periods = if burn_rate > 0.0 {
        Some((total_budget_remaining / burn_rate).floor().max(0.0) as u32)
    } else {
        None
    };

    let over_under_percentage = if budget.allocated_amount > 0.0 {
        projected_end_balance / budget.allocated_amount * 100.0
    } else {
        0.0
    };

    ForecastSummary {
        total_predicted_spending,
        total_budget_remaining,
        projected_end_balance,
        burn_rate,
        runway_periods,
        projected_over_under: projected_end_balance,
        over_under_percentage,
    }
}

fn identify_risks(predictions: &[ForecastPoint], summary: &ForecastSummary) -> Vec<ForecastRisk> {
    let mut risks = Vec::new();

    if summary.projected_end_balance < 0.0 {
        risks.push(ForecastRisk {
            kind: RiskKind::Overspending,
            description: format!(
                "Projected to exceed budget by {:.2}",
                summary.projected_end_balance.abs()
            ),
            probability: if summary.over_under_percentage < -10.0 {
                RiskProbability::High
            } else {
                RiskProbability::Medium
            },
            impact: summary.projected_end_balance.abs(),
            mitigation: "Review discretionary spending and identify areas for cost reduction"
                .to_string(),
        });
    }

    if summary.over_under_percentage > 20.0 {
        risks.push(ForecastRisk {
            kind: RiskKind::Underspending,
            description: format!(
                "Projected {:.1}% underutilization may indicate delayed projects",
                summary.over_under_percentage
            ),
            probability: RiskProbability::Medium,
            impact: summary.projected_end_balance,
            mitigation: "Review project timelines and ensure planned activities are on track"
                .to_string(),
        });
    }

    let low_confidence = predictions
        .iter()
        .filter(|p| p.confidence < LOW_CONFIDENCE_FLOOR)
        .count();
    if low_confidence * 2 > predictions.len() {
        let interval_mass: f64 = predictions
            .iter()
            .map(|p| p.upper_bound - p.lower_bound)
            .sum();
        risks.push(ForecastRisk {
            kind: RiskKind::Timing,
            description: "Low confidence in predictions due to limited historical data"
                .to_string(),
            probability: RiskProbability::Medium,
            impact: interval_mass / 2.0,
            mitigation: "Continue tracking actuals to improve forecast accuracy".to_string(),
        });
    }

    if let Some(runway) = summary.runway_periods {
        if (runway as usize) < predictions.len() {
            risks.push(ForecastRisk {
                kind: RiskKind::Overspending,
                description: format!(
                    "At current burn rate, budget will be exhausted in {} periods",
                    runway
                ),
                probability: RiskProbability::High,
                impact: summary.total_predicted_spending - summary.total_budget_remaining,
                mitigation: "Immediate spending controls required or budget reallocation needed"
                    .to_string(),
            });
        }
    }

    risks
}

fn assumptions(method: ForecastMethod, based_on_history: usize) -> Vec<String> {
    let mut assumptions = vec![format!(
        "Forecast based on {} periods of historical data",
        based_on_history
    )];

    assumptions.push(
        match method {
            ForecastMethod::Linear => "Assumes spending follows a linear trend",
            ForecastMethod::Exponential => "Assumes exponential growth/decay pattern",
            ForecastMethod::MovingAverage => "Assumes recent spending patterns will continue",
            ForecastMethod::Seasonal => "Assumes seasonal variations in spending",
            ForecastMethod::AiEnhanced => {
                "Combines multiple forecasting methods for improved accuracy"
            }
        }
        .to_string(),
    );

    assumptions.push("No significant changes in business operations expected".to_string());
    assumptions.push("Inflation and price changes not explicitly modeled".to_string());

    assumptions
}
