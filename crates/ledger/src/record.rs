use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{DomainError, DomainResult, Entity, ItemId, Money, RecordId};

/// One consumption or waste event (immutable once appended).
///
/// `consumed_amount + wasted_amount == total_cost` holds exactly; amounts are
/// fixed-point so there is no tolerance involved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub id: RecordId,
    /// Item the record was produced from, when known.
    pub item_id: Option<ItemId>,
    pub name: String,
    pub emoji: String,
    pub consumed_amount: Money,
    pub wasted_amount: Money,
    pub total_cost: Money,
    pub consumed_date: DateTime<Utc>,
    /// Negative when the item was already past expiry.
    pub days_until_expiry_at_consumption: f64,
    /// 0..=100
    pub percentage_consumed: f64,
}

impl ConsumptionRecord {
    /// Build a record whose total is the sum of its two shares.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        item_id: Option<ItemId>,
        name: impl Into<String>,
        emoji: impl Into<String>,
        consumed_amount: Money,
        wasted_amount: Money,
        consumed_date: DateTime<Utc>,
        days_until_expiry_at_consumption: f64,
        percentage_consumed: f64,
    ) -> Self {
        Self {
            id: RecordId::new(),
            item_id,
            name: name.into(),
            emoji: emoji.into(),
            consumed_amount,
            wasted_amount,
            total_cost: consumed_amount + wasted_amount,
            consumed_date,
            days_until_expiry_at_consumption,
            percentage_consumed,
        }
    }

    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    pub fn is_waste(&self) -> bool {
        self.wasted_amount > Money::ZERO
    }

    pub fn was_expired(&self) -> bool {
        self.days_until_expiry_at_consumption < 0.0
    }

    /// Check the record's own invariants.
    pub fn validate(&self) -> DomainResult<()> {
        if self.consumed_amount.is_negative() || self.wasted_amount.is_negative() {
            return Err(DomainError::invalid_record("amounts cannot be negative"));
        }
        if self.consumed_amount.exceeds_limit() || self.wasted_amount.exceeds_limit() {
            return Err(DomainError::invalid_record("amounts are out of range"));
        }
        if self.consumed_amount + self.wasted_amount != self.total_cost {
            return Err(DomainError::invalid_record(
                "consumed + wasted must equal total cost",
            ));
        }
        if !(0.0..=100.0).contains(&self.percentage_consumed) {
            return Err(DomainError::invalid_record(format!(
                "percentage consumed out of range: {}",
                self.percentage_consumed
            )));
        }
        if !self.days_until_expiry_at_consumption.is_finite() {
            return Err(DomainError::invalid_record("days until expiry must be finite"));
        }
        Ok(())
    }
}

impl Entity for ConsumptionRecord {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
