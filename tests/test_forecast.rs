use assert_approx_eq::assert_approx_eq;
use chrono::{Datelike, NaiveDate};
use fiscalcast::forecast::{generate_forecast, ForecastMethod, ForecastParams};
use fiscalcast::seasonality::{detect_seasonality, SeasonalityResult};
use fiscalcast::{ForecastError, Observation, ObservationSeries, PeriodGranularity};
use rstest::rstest;

fn monthly_series(start: NaiveDate, values: &[f64]) -> ObservationSeries {
    ObservationSeries::new(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Observation::new(start + chrono::Months::new(i as u32), *v))
            .collect(),
    )
}

fn params(method: ForecastMethod, horizon: usize) -> ForecastParams {
    ForecastParams {
        method,
        granularity: PeriodGranularity::Monthly,
        horizon_periods: horizon,
        confidence_level: 0.95,
    }
}

#[test]
fn test_rejects_zero_horizon() {
    let series = ObservationSeries::empty();
    let result = generate_forecast(
        &series,
        &params(ForecastMethod::MovingAverage, 0),
        &SeasonalityResult::none(),
    );
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[rstest]
#[case(0.0)]
#[case(1.0)]
#[case(1.5)]
#[case(-0.5)]
fn test_rejects_out_of_range_confidence(#[case] confidence: f64) {
    let series = ObservationSeries::empty();
    let mut p = params(ForecastMethod::MovingAverage, 6);
    p.confidence_level = confidence;
    let result = generate_forecast(&series, &p, &SeasonalityResult::none());
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_empty_history_forecasts_zero() {
    let forecast = generate_forecast(
        &ObservationSeries::empty(),
        &params(ForecastMethod::MovingAverage, 6),
        &SeasonalityResult::none(),
    )
    .unwrap();

    assert_eq!(forecast.len(), 6);
    for point in &forecast {
        assert_eq!(point.predicted, 0.0);
        assert_eq!(point.lower_bound, 0.0);
        assert_eq!(point.upper_bound, 0.0);
    }
}

#[test]
fn test_moving_average_tracks_trailing_mean() {
    let start = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
    let series = monthly_series(start, &[10_000.0, 10_500.0, 9_500.0]);
    let forecast = generate_forecast(
        &series,
        &params(ForecastMethod::MovingAverage, 6),
        &SeasonalityResult::none(),
    )
    .unwrap();

    assert_eq!(forecast.len(), 6);
    for point in &forecast {
        assert_approx_eq!(point.predicted, 10_000.0, 1e-6);
    }
}

#[test]
fn test_forecast_dates_step_by_period() {
    let start = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
    let series = monthly_series(start, &[100.0, 110.0, 120.0]);
    let forecast = generate_forecast(
        &series,
        &params(ForecastMethod::Linear, 3),
        &SeasonalityResult::none(),
    )
    .unwrap();

    // Anchored at the last bucket start (2025-11-01)
    assert_eq!(forecast[0].date, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
    assert_eq!(forecast[1].date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    assert_eq!(forecast[2].date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
}

#[test]
fn test_linear_method_extrapolates_growth() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let series = monthly_series(start, &[100.0, 200.0, 300.0, 400.0]);
    let forecast = generate_forecast(
        &series,
        &params(ForecastMethod::Linear, 4),
        &SeasonalityResult::none(),
    )
    .unwrap();

    assert!(forecast[3].predicted > forecast[0].predicted);
    assert!(forecast[0].predicted > 400.0);
}

#[rstest]
#[case(ForecastMethod::MovingAverage)]
#[case(ForecastMethod::Linear)]
#[case(ForecastMethod::Exponential)]
#[case(ForecastMethod::Seasonal)]
#[case(ForecastMethod::AiEnhanced)]
fn test_interval_width_never_shrinks(#[case] method: ForecastMethod) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let values: Vec<f64> = (0..18).map(|i| 1000.0 + (i % 5) as f64 * 120.0).collect();
    let series = monthly_series(start, &values);
    let forecast =
        generate_forecast(&series, &params(method, 12), &SeasonalityResult::none()).unwrap();

    let mut previous_width = 0.0;
    for point in &forecast {
        let width = point.upper_bound - point.lower_bound;
        assert!(width >= previous_width - 1e-9);
        previous_width = width;
    }
}

#[rstest]
#[case(ForecastMethod::MovingAverage)]
#[case(ForecastMethod::Linear)]
#[case(ForecastMethod::Exponential)]
#[case(ForecastMethod::Seasonal)]
#[case(ForecastMethod::AiEnhanced)]
fn test_bounds_bracket_prediction(#[case] method: ForecastMethod) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let values: Vec<f64> = (0..18).map(|i| 2000.0 - i as f64 * 90.0).collect();
    let series = monthly_series(start, &values);
    let forecast =
        generate_forecast(&series, &params(method, 12), &SeasonalityResult::none()).unwrap();

    for point in &forecast {
        assert!(point.upper_bound >= point.predicted);
        assert!(point.predicted >= point.lower_bound);
        assert!(point.lower_bound >= 0.0);
    }
}

#[test]
fn test_prediction_floors_at_zero_on_steep_decline() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let series = monthly_series(start, &[1000.0, 500.0, 100.0]);
    let forecast = generate_forecast(
        &series,
        &params(ForecastMethod::Linear, 6),
        &SeasonalityResult::none(),
    )
    .unwrap();

    for point in &forecast {
        assert!(point.predicted >= 0.0);
    }
    assert_eq!(forecast[5].predicted, 0.0);
}

#[test]
fn test_seasonal_indices_shift_forecast() {
    // Seasonality detected from a December-heavy history
    let mut observations = Vec::new();
    for year in [2024, 2025] {
        for month in 1..=12 {
            let value = if month == 12 { 300.0 } else { 100.0 };
            observations.push(Observation::new(
                NaiveDate::from_ymd_opt(year, month, 15).unwrap(),
                value,
            ));
        }
    }
    let history = ObservationSeries::new(observations);
    let seasonality = detect_seasonality(&history);
    assert!(seasonality.has_seasonality);

    let forecast = generate_forecast(
        &history,
        &params(ForecastMethod::MovingAverage, 12),
        &seasonality,
    )
    .unwrap();

    let december = forecast.iter().find(|p| p.date.month0() == 11).unwrap();
    let january = forecast.iter().find(|p| p.date.month0() == 0).unwrap();
    assert!(december.predicted > january.predicted);
}

#[test]
fn test_confidence_decays_with_horizon() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let series = monthly_series(start, &[100.0, 110.0, 105.0]);
    let forecast = generate_forecast(
        &series,
        &params(ForecastMethod::MovingAverage, 6),
        &SeasonalityResult::none(),
    )
    .unwrap();

    assert_approx_eq!(forecast[0].confidence, 0.95, 1e-9);
    for pair in forecast.windows(2) {
        assert!(pair[1].confidence < pair[0].confidence);
        assert!(pair[1].confidence > 0.0);
    }
}

#[test]
fn test_wider_confidence_level_widens_interval() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let series = monthly_series(start, &[100.0, 150.0, 90.0, 130.0]);

    let mut narrow = params(ForecastMethod::MovingAverage, 3);
    narrow.confidence_level = 0.80;
    let mut wide = params(ForecastMethod::MovingAverage, 3);
    wide.confidence_level = 0.99;

    let narrow_forecast =
        generate_forecast(&series, &narrow, &SeasonalityResult::none()).unwrap();
    let wide_forecast = generate_forecast(&series, &wide, &SeasonalityResult::none()).unwrap();

    for (n, w) in narrow_forecast.iter().zip(wide_forecast.iter()) {
        assert!(w.upper_bound - w.lower_bound > n.upper_bound - n.lower_bound);
    }
}

#[test]
fn test_forecast_is_deterministic() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let series = monthly_series(start, &[100.0, 150.0, 90.0, 130.0]);
    let p = params(ForecastMethod::AiEnhanced, 6);

    let first = generate_forecast(&series, &p, &SeasonalityResult::none()).unwrap();
    let second = generate_forecast(&series, &p, &SeasonalityResult::none()).unwrap();
    assert_eq!(first, second);
}
