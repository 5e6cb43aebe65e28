//! Dated observation series handling

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::period::PeriodGranularity;

/// Direction of money movement relative to the scoped account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    /// Money coming in (revenue, income)
    Inflow,
    /// Money going out (expenses, spend)
    Outflow,
}

/// A single dated monetary observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date of the observation
    pub date: NaiveDate,
    /// Monetary amount
    pub value: f64,
}

impl Observation {
    /// Create a new observation
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// One aggregated period bucket of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// Textual period key, see [`PeriodGranularity::label`]
    pub label: String,
    /// First day of the period
    pub start: NaiveDate,
    /// Sum of observation values falling in the period
    pub total: f64,
}

/// An ordered series of dated observations
///
/// Input is sorted by date on construction; duplicate dates are tolerated
/// and summed when the series is aggregated into period buckets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationSeries {
    observations: Vec<Observation>,
}

impl ObservationSeries {
    /// Create a series, sorting by date ascending
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.date);
        Self { observations }
    }

    /// Create an empty series
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the observations in date order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Get the observation values in date order
    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Date of the most recent observation
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// Number of days between the first and last observation
    pub fn span_days(&self) -> i64 {
        match (self.observations.first(), self.observations.last()) {
            (Some(first), Some(last)) => (last.date - first.date).num_days(),
            _ => 0,
        }
    }

    /// Mean of the observation values, 0 for an empty series
    pub fn mean(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.observations.iter().map(|o| o.value).mean()
    }

    /// Population standard deviation of the values, 0 under two points
    pub fn std_dev(&self) -> f64 {
        if self.len() < 2 {
            return 0.0;
        }
        self.observations
            .iter()
            .map(|o| o.value)
            .population_variance()
            .sqrt()
    }

    /// Sum observations into chronologically ordered period buckets
    pub fn aggregate_by_period(&self, granularity: PeriodGranularity) -> Vec<PeriodBucket> {
        let mut buckets: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for obs in &self.observations {
            let start = granularity.period_start(obs.date);
            *buckets.entry(start).or_insert(0.0) += obs.value;
        }

        buckets
            .into_iter()
            .map(|(start, total)| PeriodBucket {
                label: granularity.label(start),
                start,
                total,
            })
            .collect()
    }
}
