//! Calendar period arithmetic for forecast horizons

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Granularity of a forecast period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodGranularity {
    /// Calendar weeks
    Weekly,
    /// Calendar months
    #[default]
    Monthly,
    /// Calendar quarters
    Quarterly,
    /// Calendar years
    Annual,
}

impl PeriodGranularity {
    /// Step a date forward by `count` periods
    pub fn add_periods(&self, date: NaiveDate, count: u32) -> NaiveDate {
        match self {
            PeriodGranularity::Weekly => date + Days::new(7 * count as u64),
            PeriodGranularity::Monthly => date + Months::new(count),
            PeriodGranularity::Quarterly => date + Months::new(3 * count),
            PeriodGranularity::Annual => date + Months::new(12 * count),
        }
    }

    /// First day of the period containing `date`
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            PeriodGranularity::Weekly => {
                date - Days::new(date.weekday().num_days_from_sunday() as u64)
            }
            PeriodGranularity::Monthly => date.with_day(1).unwrap_or(date),
            PeriodGranularity::Quarterly => {
                let month = date.month0() / 3 * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
            }
            PeriodGranularity::Annual => {
                NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
            }
        }
    }

    /// Last day of the period containing `date`
    pub fn period_end(&self, date: NaiveDate) -> NaiveDate {
        let start = self.period_start(date);
        match self {
            PeriodGranularity::Weekly => start + Days::new(6),
            PeriodGranularity::Monthly => start + Months::new(1) - Days::new(1),
            PeriodGranularity::Quarterly => start + Months::new(3) - Days::new(1),
            PeriodGranularity::Annual => {
                NaiveDate::from_ymd_opt(start.year(), 12, 31).unwrap_or(start)
            }
        }
    }

    /// Stable textual key for the period containing `date`
    ///
    /// Formats: `2025-W07`, `2025-03`, `2025-Q2`, `2025`.
    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            PeriodGranularity::Weekly => {
                format!("{}-W{:02}", date.year(), (date.day() + 6) / 7)
            }
            PeriodGranularity::Monthly => format!("{}-{:02}", date.year(), date.month()),
            PeriodGranularity::Quarterly => {
                format!("{}-Q{}", date.year(), (date.month() + 2) / 3)
            }
            PeriodGranularity::Annual => format!("{}", date.year()),
        }
    }
}
