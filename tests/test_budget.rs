use assert_approx_eq::assert_approx_eq;
use chrono::NaiveDate;
use fiscalcast::budget::{create_budget_forecast, BudgetSnapshot, RiskKind, RiskProbability};
use fiscalcast::forecast::{ForecastMethod, ForecastParams};
use fiscalcast::seasonality::SeasonalityResult;
use fiscalcast::{Observation, ObservationSeries, PeriodGranularity};

fn snapshot(allocated: f64, spent: f64) -> BudgetSnapshot {
    BudgetSnapshot {
        name: "Engineering".to_string(),
        allocated_amount: allocated,
        spent_amount: spent,
    }
}

fn monthly_spend(values: &[f64]) -> ObservationSeries {
    let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    ObservationSeries::new(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Observation::new(start + chrono::Months::new(i as u32), *v))
            .collect(),
    )
}

fn params(horizon: usize) -> ForecastParams {
    ForecastParams {
        method: ForecastMethod::MovingAverage,
        granularity: PeriodGranularity::Monthly,
        horizon_periods: horizon,
        confidence_level: 0.95,
    }
}

#[test]
fn test_no_history_spreads_allocation_over_a_year() {
    let forecast = create_budget_forecast(
        &snapshot(120_000.0, 0.0),
        &ObservationSeries::empty(),
        &params(12),
        &SeasonalityResult::none(),
    )
    .unwrap();

    assert_eq!(forecast.based_on_history, 0);
    assert!(forecast.accuracy.is_none());
    assert_eq!(forecast.predictions.len(), 12);
    for point in &forecast.predictions {
        assert_approx_eq!(point.predicted, 10_000.0, 1e-9);
        assert!(point.upper_bound > point.predicted);
    }
    assert_approx_eq!(forecast.summary.total_predicted_spending, 120_000.0, 1e-6);
    assert_approx_eq!(forecast.summary.burn_rate, 10_000.0, 1e-6);
    assert_eq!(forecast.summary.runway_periods, Some(12));
}

#[test]
fn test_steady_spend_projects_overspend() {
    let history = monthly_spend(&[2000.0; 6]);
    let forecast = create_budget_forecast(
        &snapshot(10_000.0, 9_000.0),
        &history,
        &params(6),
        &SeasonalityResult::none(),
    )
    .unwrap();

    assert_eq!(forecast.based_on_history, 6);
    assert_approx_eq!(forecast.summary.total_predicted_spending, 12_000.0, 1e-6);
    assert_approx_eq!(forecast.summary.total_budget_remaining, 1000.0, 1e-9);
    assert_approx_eq!(forecast.summary.projected_end_balance, -11_000.0, 1e-6);

    let overspend: Vec<_> = forecast
        .risks
        .iter()
        .filter(|r| r.kind == RiskKind::Overspending)
        .collect();
    assert!(!overspend.is_empty());
    // Deep overspend is reported as high probability
    assert!(overspend
        .iter()
        .any(|r| r.probability == RiskProbability::High));
    // One period of runway against a six-period horizon is its own risk
    assert!(overspend
        .iter()
        .any(|r| r.description.contains("exhausted")));
}

#[test]
fn test_light_spend_flags_underutilization() {
    let history = monthly_spend(&[1000.0; 6]);
    let forecast = create_budget_forecast(
        &snapshot(100_000.0, 0.0),
        &history,
        &params(6),
        &SeasonalityResult::none(),
    )
    .unwrap();

    assert_approx_eq!(forecast.summary.projected_end_balance, 94_000.0, 1e-6);
    assert!(forecast
        .risks
        .iter()
        .any(|r| r.kind == RiskKind::Underspending));
    assert!(forecast
        .risks
        .iter()
        .all(|r| r.kind != RiskKind::Overspending));
}

#[test]
fn test_zero_burn_has_no_runway() {
    let forecast = create_budget_forecast(
        &snapshot(0.0, 0.0),
        &ObservationSeries::empty(),
        &params(6),
        &SeasonalityResult::none(),
    )
    .unwrap();

    assert_approx_eq!(forecast.summary.burn_rate, 0.0, 1e-9);
    assert!(forecast.summary.runway_periods.is_none());
}

#[test]
fn test_accuracy_reported_with_enough_history() {
    let history = monthly_spend(&[2000.0; 9]);
    let forecast = create_budget_forecast(
        &snapshot(50_000.0, 0.0),
        &history,
        &params(6),
        &SeasonalityResult::none(),
    )
    .unwrap();

    let accuracy = forecast.accuracy.unwrap();
    assert_approx_eq!(accuracy.mape, 0.0, 1e-9);
}

#[test]
fn test_assumptions_describe_method_and_history() {
    let history = monthly_spend(&[2000.0; 4]);
    let forecast = create_budget_forecast(
        &snapshot(50_000.0, 0.0),
        &history,
        &params(6),
        &SeasonalityResult::none(),
    )
    .unwrap();

    assert!(forecast.assumptions[0].contains("4 periods"));
    assert!(forecast
        .assumptions
        .iter()
        .any(|a| a.contains("recent spending patterns")));
}

#[test]
fn test_rejects_invalid_params() {
    let result = create_budget_forecast(
        &snapshot(1000.0, 0.0),
        &ObservationSeries::empty(),
        &params(0),
        &SeasonalityResult::none(),
    );
    assert!(result.is_err());
}
