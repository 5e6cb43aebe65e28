//! Cash flow projection from paired inflow and outflow forecasts

use serde::{Deserialize, Serialize};

use crate::forecast::ForecastPoint;
use crate::period::PeriodGranularity;
use crate::series::FlowKind;

/// Qualitative risk of the projected balance approaching or crossing zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashCrunchRisk {
    Low,
    Medium,
    High,
}

/// A named contribution to a period's flows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSource {
    /// Inflow or outflow
    pub kind: FlowKind,
    /// Human-readable source label
    pub label: String,
    /// Amount contributed in the period
    pub amount: f64,
    /// Share of the period's flows of the same kind, in percent
    pub percentage: f64,
}

/// One period of the projected cash ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowPoint {
    /// Textual period key
    pub period: String,
    /// Balance carried in from the previous period
    pub opening_balance: f64,
    /// Forecasted money coming in
    pub expected_inflows: f64,
    /// Forecasted money going out
    pub expected_outflows: f64,
    /// Inflows minus outflows
    pub net_cash_flow: f64,
    /// Opening balance plus net cash flow
    pub closing_balance: f64,
    /// Labeled contributions to the period's flows
    pub sources: Vec<FlowSource>,
}

/// Aggregated view over the projected horizon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowSummary {
    pub total_inflows: f64,
    pub total_outflows: f64,
    /// Total inflows minus total outflows
    pub net_position: f64,
    pub average_inflow: f64,
    pub average_outflow: f64,
    /// Period with the lowest projected closing balance
    pub lowest_balance_period: String,
    pub lowest_balance_amount: f64,
    pub cash_crunch_risk: CashCrunchRisk,
}

/// Full cash flow projection: the running ledger plus its summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowProjection {
    pub points: Vec<CashFlowPoint>,
    pub summary: CashFlowSummary,
}

/// Chain an income and an expense forecast into a running ledger.
///
/// The closing balance of each period is the opening balance of the next,
/// anchored at `initial_balance`. Risk is `High` when any closing balance
/// goes negative, `Medium` when the lowest balance is within one average
/// period's outflow of zero, `Low` otherwise.
pub fn project_cash_flow(
    inflows: &[ForecastPoint],
    outflows: &[ForecastPoint],
    initial_balance: f64,
    granularity: PeriodGranularity,
) -> CashFlowProjection {
    let horizon = inflows.len().max(outflows.len());
    let mut points = Vec::with_capacity(horizon);
    let mut balance = initial_balance;

    for i in 0..horizon {
        let inflow = inflows.get(i).map(|p| p.predicted).unwrap_or(0.0);
        let outflow = outflows.get(i).map(|p| p.predicted).unwrap_or(0.0);
        let date = inflows
            .get(i)
            .or_else(|| outflows.get(i))
            .map(|p| p.date)
            .unwrap_or_default();

        let mut sources = Vec::new();
        if inflow > 0.0 {
            sources.push(FlowSource {
                kind: FlowKind::Inflow,
                label: "projected revenue".to_string(),
                amount: inflow,
                percentage: 100.0,
            });
        }
        if outflow > 0.0 {
            sources.push(FlowSource {
                kind: FlowKind::Outflow,
                label: "projected expenses".to_string(),
                amount: outflow,
                percentage: 100.0,
            });
        }

        let net_cash_flow = inflow - outflow;
        let opening_balance = balance;
        let closing_balance = opening_balance + net_cash_flow;
        balance = closing_balance;

        points.push(CashFlowPoint {
            period: granularity.label(date),
            opening_balance,
            expected_inflows: inflow,
            expected_outflows: outflow,
            net_cash_flow,
            closing_balance,
            sources,
        });
    }

    let summary = summarize(&points, horizon);
    CashFlowProjection { points, summary }
}

fn summarize(points: &[CashFlowPoint], horizon: usize) -> CashFlowSummary {
    let total_inflows: f64 = points.iter().map(|p| p.expected_inflows).sum();
    let total_outflows: f64 = points.iter().map(|p| p.expected_outflows).sum();
    let average_inflow = if horizon > 0 {
        total_inflows / horizon as f64
    } else {
        0.0
    };
    let average_outflow = if horizon > 0 {
        total_outflows / horizon as f64
    } else {
        0.0
    };

    let lowest = points
        .iter()
        .min_by(|a, b| {
            a.closing_balance
                .partial_cmp(&b.closing_balance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    let (lowest_balance_period, lowest_balance_amount) = match lowest {
        Some(point) => (point.period.clone(), point.closing_balance),
        None => (String::new(), 0.0),
    };

    let cash_crunch_risk = if lowest_balance_amount < 0.0 {
        CashCrunchRisk::High
    } else if lowest_balance_amount < average_outflow {
        CashCrunchRisk::Medium
    } else {
        CashCrunchRisk::Low
    };

    CashFlowSummary {
        total_inflows,
        total_outflows,
        net_position: total_inflows - total_outflows,
        average_inflow,
        average_outflow,
        lowest_balance_period,
        lowest_balance_amount,
        cash_crunch_risk,
    }
}
