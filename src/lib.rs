//! # Fiscalcast
//!
//! A Rust library for financial forecasting, scenario analysis and cash
//! flow projection over dated monetary observations.
//!
//! ## Features
//!
//! - Trend analysis (moving averages, growth rate, volatility)
//! - Seasonal pattern detection from calendar-month averages
//! - Multi-period forecasting with widening confidence bounds
//! - Statistical anomaly detection (spikes and drops)
//! - Forecast accuracy back-testing (MAPE, RMSE, MSE)
//! - Cash flow projection with a running balance ledger
//! - What-if scenario analysis over a baseline forecast
//! - Budget spend forecasting with risk identification
//!
//! The engine is a pure, synchronous computation library: every component
//! is a deterministic function over immutable inputs with no I/O of its
//! own. Thin history degrades to explicitly empty or absent results
//! rather than errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fiscalcast::{
//!     generate_financial_forecast, FlowKind, ForecastOptions, Observation,
//!     ObservationSeries,
//! };
//!
//! # fn main() -> fiscalcast::Result<()> {
//! // History would normally come from a database, scoped and filtered
//! let source = |flow: FlowKind| -> fiscalcast::Result<ObservationSeries> {
//!     let base = match flow {
//!         FlowKind::Inflow => 12_000.0,
//!         FlowKind::Outflow => 9_000.0,
//!     };
//!     let observations = (0..12)
//!         .map(|month| {
//!             let date = NaiveDate::from_ymd_opt(2025, 1, 15)
//!                 .expect("valid date")
//!                 + chrono::Months::new(month);
//!             Observation::new(date, base + month as f64 * 100.0)
//!         })
//!         .collect();
//!     Ok(ObservationSeries::new(observations))
//! };
//!
//! let forecast = generate_financial_forecast(&source, &ForecastOptions::default())?;
//! assert_eq!(forecast.revenue.forecast.len(), 6);
//! # Ok(())
//! # }
//! ```

pub mod accuracy;
pub mod anomaly;
pub mod budget;
pub mod cashflow;
pub mod error;
pub mod forecast;
pub mod insights;
pub mod orchestrator;
pub mod period;
pub mod scenario;
pub mod seasonality;
pub mod series;
pub mod trend;

// Re-export commonly used types
pub use crate::accuracy::{evaluate_accuracy, AccuracyBand, AccuracyMetrics};
pub use crate::anomaly::{detect_anomalies, Anomaly, AnomalyKind, Severity};
pub use crate::budget::{create_budget_forecast, BudgetForecast, BudgetSnapshot};
pub use crate::cashflow::{project_cash_flow, CashCrunchRisk, CashFlowProjection};
pub use crate::error::{ForecastError, Result};
pub use crate::forecast::{generate_forecast, ForecastMethod, ForecastParams, ForecastPoint};
pub use crate::orchestrator::{
    generate_financial_forecast, FinancialForecast, FlowAnalysis, ForecastOptions, HistorySource,
};
pub use crate::period::PeriodGranularity;
pub use crate::scenario::{apply_scenario, AdjustmentKind, ScenarioAdjustment, ScenarioResult};
pub use crate::seasonality::{detect_seasonality, SeasonalityResult};
pub use crate::series::{FlowKind, Observation, ObservationSeries};
pub use crate::trend::{analyze_trend, TrendDirection, TrendResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
