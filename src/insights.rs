//! Insight strings derived mechanically from the numeric results

use crate::anomaly::{Anomaly, Severity};
use crate::cashflow::CashFlowProjection;
use crate::seasonality::SeasonalityResult;
use crate::trend::{TrendDirection, TrendResult};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Volatility (in percent) above which income diversification is suggested
const HIGH_VOLATILITY: f64 = 30.0;

/// Derive human-readable insight strings from the analysis results.
///
/// The text is generated, not configurable; each line follows directly
/// from one numeric observation.
pub fn generate_insights(
    revenue_trend: &TrendResult,
    expense_trend: &TrendResult,
    revenue_seasonality: &SeasonalityResult,
    anomalies: &[Anomaly],
    cash_flow: &CashFlowProjection,
) -> Vec<String> {
    let mut insights = Vec::new();

    match revenue_trend.direction {
        TrendDirection::Up => insights.push(format!(
            "Revenue is trending upward with {:.1}% growth rate. Current 30-day average: {:.2}",
            revenue_trend.growth_rate, revenue_trend.moving_averages.ma30
        )),
        TrendDirection::Down => insights.push(format!(
            "Warning: Revenue is declining at {:.1}% rate. Consider reviewing sales strategy.",
            revenue_trend.growth_rate.abs()
        )),
        TrendDirection::Stable => {}
    }

    if expense_trend.growth_rate > revenue_trend.growth_rate {
        insights.push(format!(
            "Expenses are growing faster than revenue ({:.1}% vs {:.1}%). Review cost structure.",
            expense_trend.growth_rate, revenue_trend.growth_rate
        ));
    }

    if revenue_trend.volatility > HIGH_VOLATILITY {
        insights.push(format!(
            "High revenue volatility detected ({:.1}%). Consider diversifying income streams.",
            revenue_trend.volatility
        ));
    }

    if revenue_seasonality.has_seasonality && !revenue_seasonality.peak_months.is_empty() {
        let names: Vec<&str> = revenue_seasonality
            .peak_months
            .iter()
            .filter_map(|m| MONTH_NAMES.get(*m as usize).copied())
            .collect();
        insights.push(format!(
            "Peak revenue months detected: {}. Plan inventory and staffing accordingly.",
            names.join(", ")
        ));
    }

    let negative_periods = cash_flow
        .points
        .iter()
        .filter(|p| p.net_cash_flow < 0.0)
        .count();
    if negative_periods > 0 {
        insights.push(format!(
            "Warning: Negative cash flow projected for {} period(s). Consider securing additional financing.",
            negative_periods
        ));
    }

    if let Some(last) = cash_flow.points.last() {
        if last.closing_balance > 0.0 {
            insights.push(format!(
                "Projected closing balance of {:.2} at the end of the forecast period.",
                last.closing_balance
            ));
        }
    }

    let significant = anomalies
        .iter()
        .filter(|a| a.severity >= Severity::High)
        .count();
    if significant > 0 {
        insights.push(format!(
            "{} significant anomaly(ies) detected in financial data. Review transactions for accuracy.",
            significant
        ));
    }

    insights
}
