//! Calendar-aligned trend buckets.
//!
//! - `week`: 7 daily buckets starting at the Monday on/before "now".
//! - `month`: 4 buckets of day-of-month ranges 1-7, 8-14, 15-21, 22-end.
//! - `year`: 12 calendar-month buckets of the current year.
//!
//! Records are matched by calendar date only. A record that falls in no
//! bucket is dropped silently.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use larder_core::Money;
use larder_ledger::ConsumptionRecord;

use crate::period::Granularity;
use crate::scale::axis_ceiling;
use crate::timing::TimingBreakdown;

/// Identity of a trend bucket, independent of any display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BucketKey {
    Day(Weekday),
    /// 1..=4
    MonthWeek(u8),
    /// 1..=12
    Month(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendBucket {
    pub key: BucketKey,
    /// First date covered (inclusive).
    pub start: NaiveDate,
    /// Last date covered (inclusive).
    pub end: NaiveDate,
    pub consumed: Money,
    pub wasted: Money,
    pub timing: TimingBreakdown,
}

impl TrendBucket {
    fn empty(key: BucketKey, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            key,
            start,
            end,
            consumed: Money::ZERO,
            wasted: Money::ZERO,
            timing: TimingBreakdown::default(),
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Stacked height: everything that left the kitchen in this bucket.
    pub fn total(&self) -> Money {
        self.consumed + self.wasted
    }

    fn add(&mut self, record: &ConsumptionRecord) {
        self.consumed += record.consumed_amount;
        self.wasted += record.wasted_amount;
        self.timing.record(record);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub buckets: Vec<TrendBucket>,
    /// Nice-number ceiling for the value axis.
    pub axis_max: f64,
}

impl TrendSeries {
    /// Bucket `records` (already filtered to the current period) for `today`.
    pub fn build<'a>(
        granularity: Granularity,
        today: NaiveDate,
        records: impl IntoIterator<Item = &'a ConsumptionRecord>,
    ) -> Self {
        let mut buckets = bucket_layout(granularity, today);
        let mut dropped = 0usize;

        for record in records {
            let date = record.consumed_date.date_naive();
            match buckets.iter_mut().find(|b| b.covers(date)) {
                Some(bucket) => bucket.add(record),
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::debug!(%granularity, dropped, "records outside every trend bucket");
        }

        let tallest = buckets
            .iter()
            .map(|b| b.total().to_f64())
            .fold(0.0, f64::max);

        Self {
            axis_max: axis_ceiling(granularity, tallest),
            buckets,
        }
    }
}

fn bucket_layout(granularity: Granularity, today: NaiveDate) -> Vec<TrendBucket> {
    match granularity {
        Granularity::Week => {
            let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
            (0..7)
                .map(|offset| {
                    let day = monday + Duration::days(offset);
                    TrendBucket::empty(BucketKey::Day(day.weekday()), day, day)
                })
                .collect()
        }
        Granularity::Month => {
            let first = today.with_day(1).unwrap_or(today);
            let last = last_day_of_month(today);
            [(1u8, 0i64, 6i64), (2, 7, 13), (3, 14, 20)]
                .into_iter()
                .map(|(n, from, to)| {
                    TrendBucket::empty(
                        BucketKey::MonthWeek(n),
                        first + Duration::days(from),
                        first + Duration::days(to),
                    )
                })
                .chain(core::iter::once(TrendBucket::empty(
                    BucketKey::MonthWeek(4),
                    first + Duration::days(21),
                    last,
                )))
                .collect()
        }
        Granularity::Year => (1..=12)
            .filter_map(|month| {
                let start = NaiveDate::from_ymd_opt(today.year(), month, 1)?;
                Some(TrendBucket::empty(
                    BucketKey::Month(month),
                    start,
                    last_day_of_month(start),
                ))
            })
            .collect(),
    }
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}
