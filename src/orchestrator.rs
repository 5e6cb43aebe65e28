//! Composite financial forecast orchestration

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accuracy::{evaluate_accuracy, AccuracyMetrics};
use crate::anomaly::{detect_anomalies, Anomaly};
use crate::cashflow::{project_cash_flow, CashFlowProjection};
use crate::error::Result;
use crate::forecast::{generate_forecast, ForecastMethod, ForecastParams, ForecastPoint};
use crate::insights::generate_insights;
use crate::period::PeriodGranularity;
use crate::seasonality::{detect_seasonality, SeasonalityResult};
use crate::series::{FlowKind, ObservationSeries};
use crate::trend::{analyze_trend, TrendResult};

/// Source of already-scoped, finalized historical observations.
///
/// Implementations own all I/O, scoping and filtering; by the time a
/// series reaches the engine it holds only posted/finalized records for
/// one scope.
pub trait HistorySource {
    /// Load the observation series for one flow direction
    fn load(&self, flow: FlowKind) -> Result<ObservationSeries>;
}

impl<F> HistorySource for F
where
    F: Fn(FlowKind) -> Result<ObservationSeries>,
{
    fn load(&self, flow: FlowKind) -> Result<ObservationSeries> {
        self(flow)
    }
}

/// Options accepted by the orchestrator, all with defaults
#[derive(Debug, Clone)]
pub struct ForecastOptions {
    /// Number of future periods to forecast (default 6)
    pub horizon_periods: usize,
    /// Period granularity (default monthly)
    pub granularity: PeriodGranularity,
    /// Confidence level for interval bounds (default 0.95)
    pub confidence_level: f64,
    /// Whether to run seasonality detection (default true)
    pub include_seasonality: bool,
    /// Whether to run anomaly detection (default true)
    pub include_anomalies: bool,
    /// Forecasting method (default moving average)
    pub method: ForecastMethod,
    /// Opening balance the cash flow projection is anchored at (default 0)
    pub initial_balance: f64,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            horizon_periods: 6,
            granularity: PeriodGranularity::Monthly,
            confidence_level: 0.95,
            include_seasonality: true,
            include_anomalies: true,
            method: ForecastMethod::MovingAverage,
            initial_balance: 0.0,
        }
    }
}

impl ForecastOptions {
    fn params(&self) -> ForecastParams {
        ForecastParams {
            method: self.method,
            granularity: self.granularity,
            horizon_periods: self.horizon_periods,
            confidence_level: self.confidence_level,
        }
    }
}

/// Full analysis of one flow direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowAnalysis {
    /// The historical observations the analysis ran over
    pub historical: ObservationSeries,
    pub forecast: Vec<ForecastPoint>,
    pub trend: TrendResult,
    pub seasonality: SeasonalityResult,
}

/// The composite forecast assembled by the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialForecast {
    pub horizon_periods: usize,
    /// Historical period buckets available to the forecast (larger flow)
    pub based_on_history: usize,
    pub revenue: FlowAnalysis,
    pub expenses: FlowAnalysis,
    pub cash_flow: CashFlowProjection,
    /// Anomalies across both flows, most recent first
    pub anomalies: Vec<Anomaly>,
    /// Absent when history is too short to back-test
    pub accuracy: Option<AccuracyMetrics>,
    pub insights: Vec<String>,
}

/// Run the full pipeline: trend and seasonality per flow, forecasts,
/// anomaly detection, accuracy back-testing, cash flow projection and
/// insight generation.
///
/// Every component is a pure function over the loaded series; the
/// pipeline is deterministic for identical inputs.
pub fn generate_financial_forecast<S: HistorySource>(
    source: &S,
    options: &ForecastOptions,
) -> Result<FinancialForecast> {
    let params = options.params();
    params.validate()?;

    let revenue_series = source.load(FlowKind::Inflow)?;
    let expense_series = source.load(FlowKind::Outflow)?;
    debug!(
        revenue_points = revenue_series.len(),
        expense_points = expense_series.len(),
        horizon = options.horizon_periods,
        "generating financial forecast"
    );

    let revenue = analyze_flow(&revenue_series, &params, options.include_seasonality)?;
    let expenses = analyze_flow(&expense_series, &params, options.include_seasonality)?;

    let mut anomalies = Vec::new();
    if options.include_anomalies {
        anomalies.extend(detect_anomalies(&revenue_series, "revenue"));
        anomalies.extend(detect_anomalies(&expense_series, "expense"));
        anomalies.sort_by(|a, b| b.date.cmp(&a.date));
    }

    let accuracy = evaluate_accuracy(&revenue_series, &params);

    let cash_flow = project_cash_flow(
        &revenue.forecast,
        &expenses.forecast,
        options.initial_balance,
        options.granularity,
    );

    let insights = generate_insights(
        &revenue.trend,
        &expenses.trend,
        &revenue.seasonality,
        &anomalies,
        &cash_flow,
    );

    let based_on_history = revenue_series
        .aggregate_by_period(options.granularity)
        .len()
        .max(expense_series.aggregate_by_period(options.granularity).len());

    Ok(FinancialForecast {
        horizon_periods: options.horizon_periods,
        based_on_history,
        revenue,
        expenses,
        cash_flow,
        anomalies,
        accuracy,
        insights,
    })
}

fn analyze_flow(
    series: &ObservationSeries,
    params: &ForecastParams,
    include_seasonality: bool,
) -> Result<FlowAnalysis> {
    let trend = analyze_trend(series);
    let seasonality = if include_seasonality {
        detect_seasonality(series)
    } else {
        SeasonalityResult::none()
    };
    let forecast = generate_forecast(series, params, &seasonality)?;

    Ok(FlowAnalysis {
        historical: series.clone(),
        forecast,
        trend,
        seasonality,
    })
}
