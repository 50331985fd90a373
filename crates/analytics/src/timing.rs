//! How close to expiry things were used, by cost.

use serde::{Deserialize, Serialize};

use larder_core::{Money, ValueObject};
use larder_ledger::ConsumptionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingBucket {
    /// Already past expiry (< 0 days left).
    Expired,
    /// 0 to 1 days left.
    CloseCall,
    /// 2 to 4 days left.
    Good,
    /// 5 or more days left.
    Fresh,
}

impl TimingBucket {
    /// Fractional days fall into the bucket of their whole-day floor.
    pub fn classify(days_until_expiry: f64) -> Self {
        if days_until_expiry < 0.0 {
            TimingBucket::Expired
        } else if days_until_expiry < 2.0 {
            TimingBucket::CloseCall
        } else if days_until_expiry < 5.0 {
            TimingBucket::Good
        } else {
            TimingBucket::Fresh
        }
    }
}

/// Total cost per timing bucket (stacked-bar segments).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingBreakdown {
    pub expired: Money,
    pub close_call: Money,
    pub good: Money,
    pub fresh: Money,
}

impl ValueObject for TimingBreakdown {}

impl TimingBreakdown {
    pub fn add(&mut self, bucket: TimingBucket, amount: Money) {
        let slot = match bucket {
            TimingBucket::Expired => &mut self.expired,
            TimingBucket::CloseCall => &mut self.close_call,
            TimingBucket::Good => &mut self.good,
            TimingBucket::Fresh => &mut self.fresh,
        };
        *slot += amount;
    }

    /// Classify a record's total cost by its shelf life at consumption.
    pub fn record(&mut self, record: &ConsumptionRecord) {
        self.add(
            TimingBucket::classify(record.days_until_expiry_at_consumption),
            record.total_cost,
        );
    }

    pub fn get(&self, bucket: TimingBucket) -> Money {
        match bucket {
            TimingBucket::Expired => self.expired,
            TimingBucket::CloseCall => self.close_call,
            TimingBucket::Good => self.good,
            TimingBucket::Fresh => self.fresh,
        }
    }

    pub fn total(&self) -> Money {
        self.expired + self.close_call + self.good + self.fresh
    }
}
