//! Period report: the single read-only query over the ledger.
//!
//! Reports are pure functions of (records, granularity, now). Nothing is
//! cached between calls; each query is one O(n) pass per section.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use larder_core::{DomainResult, EngineConfig, Money, ValueObject};
use larder_ledger::ConsumptionRecord;

use crate::period::{Granularity, PeriodWindow};
use crate::ranking::{WasteSlice, rank_wasted};
use crate::timing::TimingBreakdown;
use crate::trend::TrendSeries;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub consumed: Money,
    pub wasted: Money,
    /// Sum of `total_cost`.
    pub spent: Money,
    pub record_count: usize,
}

impl ValueObject for PeriodTotals {}

impl PeriodTotals {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ConsumptionRecord>) -> Self {
        records.into_iter().fold(Self::default(), |mut acc, r| {
            acc.consumed += r.consumed_amount;
            acc.wasted += r.wasted_amount;
            acc.spent += r.total_cost;
            acc.record_count += 1;
            acc
        })
    }

    /// Wasted share of spend, in percent (0 when nothing was spent).
    pub fn waste_rate(&self) -> f64 {
        if self.spent.is_zero() {
            0.0
        } else {
            self.wasted.to_f64() / self.spent.to_f64() * 100.0
        }
    }
}

/// Current period minus previous period (signed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodDelta {
    pub consumed_diff: Money,
    pub wasted_diff: Money,
}

impl ValueObject for PeriodDelta {}

impl PeriodDelta {
    pub fn between(current: &PeriodTotals, previous: &PeriodTotals) -> Self {
        Self {
            consumed_diff: current.consumed - previous.consumed,
            wasted_diff: current.wasted - previous.wasted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    pub granularity: Granularity,
    pub generated_at: DateTime<Utc>,
    pub totals: PeriodTotals,
    pub previous_totals: PeriodTotals,
    pub previous_period_delta: PeriodDelta,
    pub trend_series: TrendSeries,
    /// Period-wide timing breakdown (headline window).
    pub timing_buckets: TimingBreakdown,
    pub top_wasted_items: Vec<WasteSlice>,
}

/// Builds period reports with the ranking knobs from [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct PeriodAggregator {
    top_wasted_limit: usize,
    other_threshold: Decimal,
}

impl Default for PeriodAggregator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl PeriodAggregator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            top_wasted_limit: config.top_wasted_limit,
            other_threshold: config.other_threshold,
        }
    }

    pub fn report(
        &self,
        records: &[ConsumptionRecord],
        granularity: Granularity,
        now: DateTime<Utc>,
    ) -> PeriodReport {
        let current_window = PeriodWindow::current(granularity, now);
        let previous_window = PeriodWindow::previous(granularity, now);

        let current: Vec<&ConsumptionRecord> = records
            .iter()
            .filter(|r| current_window.contains(r.consumed_date))
            .collect();

        let totals = PeriodTotals::from_records(current.iter().copied());
        let previous_totals = PeriodTotals::from_records(
            records
                .iter()
                .filter(|r| previous_window.contains(r.consumed_date)),
        );

        let mut timing_buckets = TimingBreakdown::default();
        for record in &current {
            timing_buckets.record(record);
        }

        let trend_series = TrendSeries::build(granularity, now.date_naive(), current.iter().copied());
        let top_wasted_items = rank_wasted(
            current.iter().copied(),
            totals.wasted,
            self.top_wasted_limit,
            self.other_threshold,
        );

        tracing::debug!(
            %granularity,
            ledger = records.len(),
            in_period = totals.record_count,
            previous = previous_totals.record_count,
            "period report computed"
        );

        PeriodReport {
            granularity,
            generated_at: now,
            totals,
            previous_totals,
            previous_period_delta: PeriodDelta::between(&totals, &previous_totals),
            trend_series,
            timing_buckets,
            top_wasted_items,
        }
    }

    /// [`Self::report`] keyed by `"week"`, `"month"` or `"year"`.
    pub fn report_by_key(
        &self,
        records: &[ConsumptionRecord],
        key: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<PeriodReport> {
        Ok(self.report(records, key.parse()?, now))
    }
}

/// Period report with default ranking settings.
pub fn get_period_report(
    records: &[ConsumptionRecord],
    granularity: Granularity,
    now: DateTime<Utc>,
) -> PeriodReport {
    PeriodAggregator::default().report(records, granularity, now)
}

/// [`get_period_report`] keyed by `"week"`, `"month"` or `"year"`.
pub fn get_period_report_by_key(
    records: &[ConsumptionRecord],
    key: &str,
    now: DateTime<Utc>,
) -> DomainResult<PeriodReport> {
    PeriodAggregator::default().report_by_key(records, key, now)
}
