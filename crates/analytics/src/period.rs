//! Period keys and the windows used for headline totals.
//!
//! Headline windows for `week` and `year` are rolling (trailing 7 / 365 days
//! ending at "now"); `month` is the calendar month. The trend chart buckets
//! by calendar instead (see [`crate::trend`]).

use core::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use larder_core::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Week,
    Month,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
        }
    }
}

impl core::fmt::Display for Granularity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            other => Err(DomainError::invalid_granularity(format!(
                "expected week, month or year (got {other:?})"
            ))),
        }
    }
}

/// A set of instants a record's `consumed_date` is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeriodWindow {
    /// `start < t <= end`
    Rolling {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    CalendarMonth { year: i32, month: u32 },
}

impl PeriodWindow {
    pub fn current(granularity: Granularity, now: DateTime<Utc>) -> Self {
        match granularity {
            Granularity::Week => Self::trailing(now, 7, 0),
            Granularity::Year => Self::trailing(now, 365, 0),
            Granularity::Month => Self::CalendarMonth {
                year: now.year(),
                month: now.month(),
            },
        }
    }

    /// The window immediately before [`Self::current`].
    pub fn previous(granularity: Granularity, now: DateTime<Utc>) -> Self {
        match granularity {
            Granularity::Week => Self::trailing(now, 7, 1),
            Granularity::Year => Self::trailing(now, 365, 1),
            Granularity::Month => {
                let (year, month) = if now.month() == 1 {
                    (now.year() - 1, 12)
                } else {
                    (now.year(), now.month() - 1)
                };
                Self::CalendarMonth { year, month }
            }
        }
    }

    /// The `periods_back`-th window of `days` days ending at `now`.
    fn trailing(now: DateTime<Utc>, days: i64, periods_back: i64) -> Self {
        let end = now - Duration::days(days * periods_back);
        Self::Rolling {
            start: end - Duration::days(days),
            end,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        match *self {
            PeriodWindow::Rolling { start, end } => at > start && at <= end,
            PeriodWindow::CalendarMonth { year, month } => at.year() == year && at.month() == month,
        }
    }
}
