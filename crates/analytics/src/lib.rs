//! `larder-analytics`: period aggregation over the consumption ledger.
//!
//! **Responsibility:** read-only analytics. This crate never mutates the
//! ledger or the item store; it only derives reports from a ledger snapshot.

pub mod period;
pub mod ranking;
pub mod report;
pub mod scale;
pub mod timing;
pub mod trend;

pub use period::{Granularity, PeriodWindow};
pub use ranking::{OTHER_LABEL, WasteSlice, rank_wasted};
pub use report::{
    PeriodAggregator, PeriodDelta, PeriodReport, PeriodTotals, get_period_report,
    get_period_report_by_key,
};
pub use scale::{axis_ceiling, nice_number};
pub use timing::{TimingBreakdown, TimingBucket};
pub use trend::{BucketKey, TrendBucket, TrendSeries};
