use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use larder_core::{DomainError, DomainResult, Entity, ItemId, Money};

/// Where an item is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageCategory {
    Fridge,
    Freezer,
    Pantry,
}

/// Packaging state lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Sealed,
    Opened,
}

/// An active tracked item.
///
/// `cost` covers all `quantity` units; `cost / quantity` is the unit cost every
/// partial operation works from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub(crate) id: ItemId,
    pub(crate) name: String,
    pub(crate) emoji: String,
    pub(crate) category: StorageCategory,
    pub(crate) status: ItemStatus,
    pub(crate) quantity: u32,
    pub(crate) cost: Money,
    pub(crate) days_until_expiry: f64,
    /// Date `days_until_expiry` was last measured against.
    pub(crate) expiry_assessed_on: NaiveDate,
    pub(crate) barcode: Option<String>,
}

impl InventoryItem {
    /// A sealed item. Validation happens when it enters the store.
    pub fn new(
        name: impl Into<String>,
        emoji: impl Into<String>,
        category: StorageCategory,
        quantity: u32,
        cost: Money,
        days_until_expiry: f64,
        assessed_on: NaiveDate,
    ) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            emoji: emoji.into(),
            category,
            status: ItemStatus::Sealed,
            quantity,
            cost,
            days_until_expiry,
            expiry_assessed_on: assessed_on,
            barcode: None,
        }
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn emoji(&self) -> &str {
        &self.emoji
    }

    pub fn category(&self) -> StorageCategory {
        self.category
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn cost(&self) -> Money {
        self.cost
    }

    pub fn days_until_expiry(&self) -> f64 {
        self.days_until_expiry
    }

    pub fn expiry_assessed_on(&self) -> NaiveDate {
        self.expiry_assessed_on
    }

    pub fn barcode(&self) -> Option<&str> {
        self.barcode.as_deref()
    }

    /// Cost of a single unit. `None` only for an invalid zero quantity.
    pub fn unit_cost(&self) -> Option<Money> {
        self.cost.per_unit(self.quantity)
    }

    pub fn is_past_expiry(&self) -> bool {
        self.days_until_expiry <= 0.0
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_item_state("name cannot be empty"));
        }
        if self.quantity < 1 {
            return Err(DomainError::invalid_item_state("quantity must be at least 1"));
        }
        check_cost(self.cost)?;
        if !self.days_until_expiry.is_finite() {
            return Err(DomainError::invalid_item_state(
                "days until expiry must be a finite number",
            ));
        }
        Ok(())
    }

    /// Remaining shelf life as seen on `today`, without touching the item.
    pub fn days_until_expiry_on(&self, today: NaiveDate) -> f64 {
        let elapsed = (today - self.expiry_assessed_on).num_days();
        if elapsed > 0 {
            self.days_until_expiry - elapsed as f64
        } else {
            self.days_until_expiry
        }
    }

    /// Move the expiry countdown forward to `today`. Never moves backwards.
    pub(crate) fn age_to(&mut self, today: NaiveDate) {
        if today > self.expiry_assessed_on {
            self.days_until_expiry = self.days_until_expiry_on(today);
            self.expiry_assessed_on = today;
        }
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// An item past expiry, waiting to be wasted or revived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiredItem {
    pub(crate) id: ItemId,
    pub(crate) name: String,
    pub(crate) emoji: String,
    pub(crate) cost: Money,
    pub(crate) expired_days: u32,
    pub(crate) quantity: u32,
    pub(crate) category: StorageCategory,
    pub(crate) status: ItemStatus,
    pub(crate) barcode: Option<String>,
}

impl ExpiredItem {
    /// `expired_days = round(-days_until_expiry)`; same-day expiry gives 0.
    pub(crate) fn from_item(item: InventoryItem) -> Self {
        let expired_days = (-item.days_until_expiry).round().max(0.0) as u32;
        Self {
            id: item.id,
            name: item.name,
            emoji: item.emoji,
            cost: item.cost,
            expired_days,
            quantity: item.quantity,
            category: item.category,
            status: item.status,
            barcode: item.barcode,
        }
    }

    /// Back to an active item with a fresh shelf life.
    pub(crate) fn revive(self, extension_days: f64, assessed_on: NaiveDate) -> InventoryItem {
        InventoryItem {
            id: self.id,
            name: self.name,
            emoji: self.emoji,
            category: self.category,
            status: self.status,
            quantity: self.quantity,
            cost: self.cost,
            days_until_expiry: extension_days,
            expiry_assessed_on: assessed_on,
            barcode: self.barcode,
        }
    }

    /// Structural checks for an entry loaded from outside the engine.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_item_state("name cannot be empty"));
        }
        if self.quantity < 1 {
            return Err(DomainError::invalid_item_state("quantity must be at least 1"));
        }
        check_cost(self.cost)
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn emoji(&self) -> &str {
        &self.emoji
    }

    pub fn cost(&self) -> Money {
        self.cost
    }

    pub fn expired_days(&self) -> u32 {
        self.expired_days
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn category(&self) -> StorageCategory {
        self.category
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn barcode(&self) -> Option<&str> {
        self.barcode.as_deref()
    }
}

impl Entity for ExpiredItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn check_cost(cost: Money) -> DomainResult<()> {
    if cost.is_negative() {
        return Err(DomainError::invalid_item_state("cost cannot be negative"));
    }
    if cost.exceeds_limit() {
        return Err(DomainError::invalid_item_state(format!("cost {cost} is out of range")));
    }
    Ok(())
}

/// Partial update of an active item. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub category: Option<StorageCategory>,
    pub status: Option<ItemStatus>,
    pub quantity: Option<u32>,
    pub cost: Option<Money>,
    pub days_until_expiry: Option<f64>,
    pub expiry_assessed_on: Option<NaiveDate>,
    /// `Some(None)` clears the barcode.
    pub barcode: Option<Option<String>>,
}

impl ItemPatch {
    pub(crate) fn apply_to(self, item: &mut InventoryItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(emoji) = self.emoji {
            item.emoji = emoji;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(cost) = self.cost {
            item.cost = cost;
        }
        if let Some(days) = self.days_until_expiry {
            item.days_until_expiry = days;
        }
        if let Some(date) = self.expiry_assessed_on {
            item.expiry_assessed_on = date;
        }
        if let Some(barcode) = self.barcode {
            item.barcode = barcode;
        }
    }
}
