//! Top wasted items as a bounded, pie-ready distribution.
//!
//! Waste is grouped by item name and ranked descending (ties by name). The
//! first `limit` names are kept and the rest collapse into one "Other" entry
//! unless that remainder is rounding noise.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use larder_core::Money;
use larder_ledger::ConsumptionRecord;

pub const OTHER_LABEL: &str = "Other";

const FULL_CIRCLE: f64 = 360.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WasteSlice {
    pub name: String,
    pub value: Money,
    /// `round(value / period_wasted * 100)`
    pub percentage: u32,
    /// Degrees, clockwise from 0.
    pub start_angle: f64,
    pub end_angle: f64,
    pub is_other: bool,
}

impl WasteSlice {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Rank the wasted share of `records` (already filtered to one period).
///
/// `period_wasted` is the period's total waste and is the denominator for
/// percentages. Slices are laid out contiguously from 0 degrees in rank order,
/// sized by their share of the listed total, so they always close the circle.
pub fn rank_wasted<'a>(
    records: impl IntoIterator<Item = &'a ConsumptionRecord>,
    period_wasted: Money,
    limit: usize,
    other_threshold: Decimal,
) -> Vec<WasteSlice> {
    if period_wasted <= Money::ZERO {
        return Vec::new();
    }

    let mut by_name: BTreeMap<&str, Money> = BTreeMap::new();
    for record in records.into_iter().filter(|r| r.is_waste()) {
        *by_name.entry(record.name.as_str()).or_insert(Money::ZERO) += record.wasted_amount;
    }

    let mut ranked: Vec<(&str, Money)> = by_name.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let remainder: Money = ranked.iter().skip(limit).map(|(_, v)| *v).sum();
    let mut entries: Vec<(String, Money, bool)> = ranked
        .into_iter()
        .take(limit)
        .map(|(name, value)| (name.to_string(), value, false))
        .collect();
    if remainder.amount() > other_threshold {
        entries.push((OTHER_LABEL.to_string(), remainder, true));
    }

    let listed_total: f64 = entries.iter().map(|(_, v, _)| v.to_f64()).sum();
    let last = entries.len().saturating_sub(1);
    let mut cursor = 0.0;

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, (name, value, is_other))| {
            let start_angle = cursor;
            // Sweeps follow exact shares, not the rounded `percentage`, and the
            // last slice is pinned to 360 so the circle always closes.
            let end_angle = if idx == last {
                FULL_CIRCLE
            } else if listed_total > 0.0 {
                cursor + value.to_f64() / listed_total * FULL_CIRCLE
            } else {
                cursor
            };
            cursor = end_angle;

            WasteSlice {
                percentage: percentage_of(value, period_wasted),
                name,
                value,
                start_angle,
                end_angle,
                is_other,
            }
        })
        .collect()
}

fn percentage_of(value: Money, total: Money) -> u32 {
    if total.is_zero() {
        return 0;
    }
    (value.amount() / total.amount() * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}
