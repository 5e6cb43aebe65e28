use assert_approx_eq::assert_approx_eq;
use chrono::NaiveDate;
use fiscalcast::trend::{analyze_trend, TrendDirection};
use fiscalcast::{Observation, ObservationSeries};

fn daily_series(values: &[f64]) -> ObservationSeries {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    ObservationSeries::new(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Observation::new(start + chrono::Days::new(i as u64), *v))
            .collect(),
    )
}

#[test]
fn test_increasing_series_trends_up() {
    let values: Vec<f64> = (0..10).map(|i| 100.0 + i as f64 * 10.0).collect();
    let trend = analyze_trend(&daily_series(&values));

    assert_eq!(trend.direction, TrendDirection::Up);
    assert!(trend.growth_rate > 0.0);
}

#[test]
fn test_decreasing_series_trends_down() {
    let values: Vec<f64> = (0..10).map(|i| 190.0 - i as f64 * 10.0).collect();
    let trend = analyze_trend(&daily_series(&values));

    assert_eq!(trend.direction, TrendDirection::Down);
    assert!(trend.growth_rate < 0.0);
}

#[test]
fn test_flat_series_is_stable_with_zero_volatility() {
    let trend = analyze_trend(&daily_series(&[50.0; 10]));

    assert_eq!(trend.direction, TrendDirection::Stable);
    assert_approx_eq!(trend.growth_rate, 0.0, 1e-9);
    assert_approx_eq!(trend.volatility, 0.0, 1e-9);
    assert_approx_eq!(trend.average_value, 50.0, 1e-9);
}

#[test]
fn test_moving_averages_use_trailing_windows() {
    // 100, 110, ..., 190
    let values: Vec<f64> = (0..10).map(|i| 100.0 + i as f64 * 10.0).collect();
    let trend = analyze_trend(&daily_series(&values));

    // Last 7 values run 130..190
    assert_approx_eq!(trend.moving_averages.ma7, 160.0, 1e-9);
    // Shorter than 30 and 90: whole series
    assert_approx_eq!(trend.moving_averages.ma30, 145.0, 1e-9);
    assert_approx_eq!(trend.moving_averages.ma90, 145.0, 1e-9);
}

#[test]
fn test_single_point_degrades_gracefully() {
    let trend = analyze_trend(&daily_series(&[42.0]));

    assert_eq!(trend.direction, TrendDirection::Stable);
    assert_approx_eq!(trend.growth_rate, 0.0, 1e-9);
    assert_approx_eq!(trend.moving_averages.ma7, 42.0, 1e-9);
    assert_approx_eq!(trend.moving_averages.ma30, 42.0, 1e-9);
}

#[test]
fn test_two_points_use_single_point_split() {
    let trend = analyze_trend(&daily_series(&[100.0, 200.0]));

    assert_eq!(trend.direction, TrendDirection::Up);
    assert_approx_eq!(trend.growth_rate, 100.0, 1e-9);
}

#[test]
fn test_empty_series_yields_zeroed_result() {
    let trend = analyze_trend(&ObservationSeries::empty());

    assert_eq!(trend.direction, TrendDirection::Stable);
    assert_approx_eq!(trend.growth_rate, 0.0, 1e-9);
    assert_approx_eq!(trend.average_value, 0.0, 1e-9);
    assert_approx_eq!(trend.volatility, 0.0, 1e-9);
}

#[test]
fn test_mild_drift_classifies_stable() {
    // Growth between first and last third stays under the 5% band
    let values: Vec<f64> = (0..9).map(|i| 1000.0 + i as f64).collect();
    let trend = analyze_trend(&daily_series(&values));

    assert_eq!(trend.direction, TrendDirection::Stable);
    assert!(trend.growth_rate.abs() < 5.0);
}

#[test]
fn test_unsorted_input_is_sorted_internally() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let series = ObservationSeries::new(vec![
        Observation::new(start + chrono::Days::new(2), 300.0),
        Observation::new(start, 100.0),
        Observation::new(start + chrono::Days::new(1), 200.0),
    ]);

    let trend = analyze_trend(&series);
    assert_eq!(trend.direction, TrendDirection::Up);
    assert_approx_eq!(trend.growth_rate, 200.0, 1e-9);
}
