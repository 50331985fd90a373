//! Lifecycle engine: the only writer of the item store and the ledger.
//!
//! Per item: `sealed -> opened -> (quantity reduced) -> removed`, with an
//! orthogonal `active -> expired -> {revived | wasted}` track. Every operation
//! validates before it mutates, so an `Err` leaves store and ledger untouched.
//! Consume reads then writes `quantity`/`cost`; a multi-threaded host must
//! serialize calls into one engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use larder_core::{DomainError, DomainResult, EngineConfig, ItemId, Money};
use larder_ledger::{ConsumptionRecord, Ledger};

use crate::clock::{Clock, SystemClock};
use crate::item::{ExpiredItem, InventoryItem, ItemPatch, ItemStatus, StorageCategory};
use crate::merge::{AcquireOutcome, MergeDecision, MergeResolution, NewItem, PendingMerge};
use crate::store::ItemStore;

/// Result of a consume: the appended record and what is left of the item.
#[derive(Debug, Clone, PartialEq)]
pub struct Consumption {
    pub record: ConsumptionRecord,
    /// `None` when the last unit was used and the item was removed.
    pub remaining: Option<InventoryItem>,
}

/// How to resolve an expired item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiredDecision {
    Wasted,
    /// Back to the active set; `None` uses the configured default shelf life.
    Revive { extension_days: Option<f64> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpiredResolution {
    Wasted(ConsumptionRecord),
    Revived(InventoryItem),
}

#[derive(Debug, Clone)]
pub struct LifecycleEngine<C: Clock = SystemClock> {
    store: ItemStore,
    ledger: Ledger,
    clock: C,
    config: EngineConfig,
}

impl LifecycleEngine<SystemClock> {
    pub fn with_system_clock() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> LifecycleEngine<C> {
    pub fn new(clock: C) -> Self {
        Self::from_parts(ItemStore::new(), Ledger::new(), clock)
    }

    /// Resume from previously persisted collections.
    pub fn from_parts(store: ItemStore, ledger: Ledger, clock: C) -> Self {
        Self {
            store,
            ledger,
            clock,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Hand the collections back for persistence.
    pub fn into_parts(self) -> (ItemStore, Ledger) {
        (self.store, self.ledger)
    }

    /// Add a newly acquired, sealed item, unless it duplicates an active one.
    ///
    /// Duplicates are returned as [`AcquireOutcome::PendingDecision`] with
    /// nothing mutated; answer with [`Self::merge_decision`].
    pub fn acquire_item(&mut self, attrs: NewItem) -> DomainResult<AcquireOutcome> {
        let today = self.clock.today();
        let candidate = attrs.clone().into_item(today);
        candidate.validate()?;

        if let Some(existing) =
            self.store
                .find_duplicate(&attrs.name, attrs.category, attrs.barcode.as_deref())
        {
            tracing::info!(
                existing_id = %existing.id_typed(),
                name = %attrs.name,
                "acquire matched an existing item; merge decision required"
            );
            return Ok(AcquireOutcome::PendingDecision(PendingMerge {
                existing: existing.clone(),
                incoming: attrs,
            }));
        }

        let item = self.store.add(candidate)?.clone();
        tracing::info!(
            item_id = %item.id_typed(),
            name = %item.name(),
            quantity = item.quantity(),
            cost = %item.cost(),
            days_until_expiry = item.days_until_expiry(),
            "item acquired"
        );
        Ok(AcquireOutcome::NoConflict(item))
    }

    /// Apply the caller's answer to a duplicate found by [`Self::acquire_item`].
    pub fn merge_decision(
        &mut self,
        existing_id: ItemId,
        incoming: NewItem,
        decision: MergeDecision,
    ) -> DomainResult<MergeResolution> {
        let resolution = match decision {
            MergeDecision::Cancel => MergeResolution::Cancelled,
            MergeDecision::AddSeparate => {
                let candidate = incoming.into_item(self.clock.today());
                MergeResolution::AddedSeparately(self.store.add(candidate)?.clone())
            }
            MergeDecision::Combine => {
                let existing = self
                    .store
                    .get(existing_id)
                    .ok_or(DomainError::not_found(existing_id))?;
                incoming.clone().into_item(self.clock.today()).validate()?;
                let quantity = existing
                    .quantity()
                    .checked_add(incoming.quantity)
                    .ok_or_else(|| DomainError::invalid_item_state("combined quantity overflows"))?;
                let cost = existing
                    .cost()
                    .checked_add(incoming.cost)
                    .ok_or_else(|| DomainError::invalid_item_state("combined cost overflows"))?;

                let patch = ItemPatch {
                    quantity: Some(quantity),
                    cost: Some(cost),
                    ..ItemPatch::default()
                };
                MergeResolution::Combined(self.store.update(existing_id, patch)?.clone())
            }
        };

        tracing::info!(
            existing_id = %existing_id,
            ?decision,
            item_id = ?resolution.item().map(|i| i.id_typed()),
            "merge decision applied"
        );
        Ok(resolution)
    }

    /// Shorthand for [`Self::merge_decision`] on a pending acquire.
    pub fn resolve_pending(
        &mut self,
        pending: PendingMerge,
        decision: MergeDecision,
    ) -> DomainResult<MergeResolution> {
        let existing_id = pending.existing_id();
        self.merge_decision(existing_id, pending.incoming, decision)
    }

    /// `sealed -> opened`, optionally moving the item and resetting its shelf life.
    pub fn open_item(
        &mut self,
        id: ItemId,
        new_category: Option<StorageCategory>,
        new_expiry_days: Option<f64>,
    ) -> DomainResult<InventoryItem> {
        let item = self.store.get(id).ok_or(DomainError::not_found(id))?;
        if item.status() == ItemStatus::Opened {
            return Err(DomainError::invalid_item_state("item is already opened"));
        }

        let patch = ItemPatch {
            status: Some(ItemStatus::Opened),
            category: new_category,
            days_until_expiry: new_expiry_days,
            expiry_assessed_on: new_expiry_days.map(|_| self.clock.today()),
            ..ItemPatch::default()
        };
        let opened = self.store.update(id, patch)?.clone();

        tracing::info!(
            item_id = %id,
            category = ?opened.category(),
            days_until_expiry = opened.days_until_expiry(),
            "item opened"
        );
        Ok(opened)
    }

    /// Use `quantity_used` units, of which `percentage_used`% was eaten and the
    /// rest thrown away.
    ///
    /// The unit cost is taken before anything changes, and the remaining cost
    /// is re-based as `unit_cost * remaining_units` rather than subtracted.
    pub fn consume_item(
        &mut self,
        id: ItemId,
        quantity_used: u32,
        percentage_used: f64,
    ) -> DomainResult<Consumption> {
        let item = self.store.get(id).ok_or(DomainError::not_found(id))?;

        if quantity_used < 1 || quantity_used > item.quantity() {
            return Err(DomainError::invalid_consumption(format!(
                "quantity used must be between 1 and {} (got {quantity_used})",
                item.quantity()
            )));
        }
        if !(0.0..=100.0).contains(&percentage_used) {
            return Err(DomainError::invalid_consumption(format!(
                "percentage used must be between 0 and 100 (got {percentage_used})"
            )));
        }
        let percent = Decimal::from_f64(percentage_used).ok_or_else(|| {
            DomainError::invalid_consumption(format!("unrepresentable percentage {percentage_used}"))
        })?;

        let unit_cost = item
            .unit_cost()
            .ok_or_else(|| DomainError::invalid_item_state("item has no units"))?;
        let overflow = || DomainError::invalid_consumption("cost is out of range");
        let total = unit_cost.times(quantity_used).ok_or_else(overflow)?;
        let consumed = total.percent(percent).ok_or_else(overflow)?;
        let wasted = total - consumed;
        let remaining_units = item.quantity() - quantity_used;
        let remaining_cost = unit_cost.times(remaining_units).ok_or_else(overflow)?;

        let record = ConsumptionRecord::new(
            Some(id),
            item.name(),
            item.emoji(),
            consumed,
            wasted,
            self.clock.now(),
            item.days_until_expiry_on(self.clock.today()),
            percentage_used,
        );
        record.validate()?;

        let record = self.ledger.append(record)?.clone();

        let remaining = if remaining_units == 0 {
            self.store.remove(id)?;
            None
        } else {
            let patch = ItemPatch {
                quantity: Some(remaining_units),
                cost: Some(remaining_cost),
                ..ItemPatch::default()
            };
            Some(self.store.update(id, patch)?.clone())
        };

        tracing::info!(
            item_id = %id,
            quantity_used,
            percentage_used,
            consumed = %record.consumed_amount,
            wasted = %record.wasted_amount,
            remaining_units,
            "item consumed"
        );
        Ok(Consumption { record, remaining })
    }

    /// Move one item whose shelf life has run out into the expired set.
    pub fn expire_item(&mut self, id: ItemId) -> DomainResult<ExpiredItem> {
        let item = self.store.get(id).ok_or(DomainError::not_found(id))?;
        if !item.is_past_expiry() {
            return Err(DomainError::invalid_item_state(format!(
                "item has {} day(s) left and cannot expire yet",
                item.days_until_expiry()
            )));
        }

        let expired = self.store.move_to_expired(id)?.clone();
        tracing::info!(
            item_id = %id,
            expired_days = expired.expired_days(),
            "item expired"
        );
        Ok(expired)
    }

    /// Age every active item to `today` and expire those at or past zero days.
    ///
    /// Returns the newly expired items in store order.
    pub fn expire_check(&mut self, today: NaiveDate) -> DomainResult<Vec<ExpiredItem>> {
        let mut due: Vec<ItemId> = Vec::new();
        for item in self.store.items_mut() {
            item.age_to(today);
            if item.is_past_expiry() {
                due.push(item.id_typed());
            }
        }

        let mut expired = Vec::with_capacity(due.len());
        for id in due {
            expired.push(self.store.move_to_expired(id)?.clone());
        }

        tracing::debug!(
            %today,
            expired = expired.len(),
            active = self.store.items().len(),
            "expiry sweep complete"
        );
        Ok(expired)
    }

    /// Waste or revive an expired item.
    pub fn resolve_expired(
        &mut self,
        id: ItemId,
        decision: ExpiredDecision,
    ) -> DomainResult<ExpiredResolution> {
        let expired = self.store.get_expired(id).ok_or(DomainError::not_found(id))?;

        match decision {
            ExpiredDecision::Wasted => {
                let record = ConsumptionRecord::new(
                    Some(id),
                    expired.name(),
                    expired.emoji(),
                    Money::ZERO,
                    expired.cost(),
                    self.clock.now(),
                    // Subtracting from 0.0 keeps a same-day expiry at +0.0.
                    0.0 - f64::from(expired.expired_days()),
                    0.0,
                );
                record.validate()?;

                let record = self.ledger.append(record)?.clone();
                self.store.remove_expired(id)?;

                tracing::info!(
                    item_id = %id,
                    wasted = %record.wasted_amount,
                    "expired item wasted"
                );
                Ok(ExpiredResolution::Wasted(record))
            }
            ExpiredDecision::Revive { extension_days } => {
                let days = extension_days.unwrap_or(self.config.default_revive_days);
                let revived = self
                    .store
                    .revive_from_expired(id, days, self.clock.today())?
                    .clone();

                tracing::info!(item_id = %id, days_until_expiry = days, "expired item revived");
                Ok(ExpiredResolution::Revived(revived))
            }
        }
    }

    /// Edit an active item (name, category, cost corrections, ...).
    pub fn update_item(&mut self, id: ItemId, patch: ItemPatch) -> DomainResult<InventoryItem> {
        Ok(self.store.update(id, patch)?.clone())
    }

    /// Delete an active item without recording consumption or waste.
    pub fn remove_item(&mut self, id: ItemId) -> DomainResult<InventoryItem> {
        let removed = self.store.remove(id)?;
        tracing::info!(item_id = %id, name = %removed.name(), "item discarded");
        Ok(removed)
    }

    /// Active items inside the configured "expiring soon" horizon.
    pub fn expiring_soon(&self) -> Vec<&InventoryItem> {
        self.store.expiring_within(self.config.expiring_soon_days)
    }
}
