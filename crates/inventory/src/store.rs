//! Canonical active/expired item collections.
//!
//! The store enforces structural invariants only (unique ids, quantity >= 1,
//! non-negative cost). Lifecycle rules live in [`crate::lifecycle`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use larder_core::{DomainError, DomainResult, ItemId, Money};

use crate::item::{ExpiredItem, InventoryItem, ItemPatch, StorageCategory};

/// Household-scale store: insertion-ordered vectors, linear lookups.
///
/// Deserializing goes through [`ItemStore::from_parts`], so a persisted store
/// that breaks an invariant is rejected on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoreParts")]
pub struct ItemStore {
    active: Vec<InventoryItem>,
    expired: Vec<ExpiredItem>,
}

/// Wire shape of [`ItemStore`] before validation.
#[derive(Deserialize)]
struct StoreParts {
    #[serde(default)]
    active: Vec<InventoryItem>,
    #[serde(default)]
    expired: Vec<ExpiredItem>,
}

impl TryFrom<StoreParts> for ItemStore {
    type Error = DomainError;

    fn try_from(parts: StoreParts) -> Result<Self, Self::Error> {
        ItemStore::from_parts(parts.active, parts.expired)
    }
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted collections, re-checking every invariant.
    pub fn from_parts(
        active: impl IntoIterator<Item = InventoryItem>,
        expired: impl IntoIterator<Item = ExpiredItem>,
    ) -> DomainResult<Self> {
        let mut store = Self::new();
        for item in active {
            store.add(item)?;
        }
        for item in expired {
            item.validate()?;
            if store.contains(&item.id) {
                return Err(DomainError::invalid_item_state(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
            store.expired.push(item);
        }
        Ok(store)
    }

    pub fn add(&mut self, item: InventoryItem) -> DomainResult<&InventoryItem> {
        item.validate()?;
        if self.contains(&item.id) {
            return Err(DomainError::invalid_item_state(format!(
                "duplicate item id {}",
                item.id
            )));
        }
        self.active.push(item);
        Ok(&self.active[self.active.len() - 1])
    }

    /// Apply `patch` to an active item. A patch that would break an invariant
    /// is rejected and the item is left unchanged.
    pub fn update(&mut self, id: ItemId, patch: ItemPatch) -> DomainResult<&InventoryItem> {
        let idx = self.active_index(id)?;
        let mut candidate = self.active[idx].clone();
        patch.apply_to(&mut candidate);
        candidate.validate()?;
        self.active[idx] = candidate;
        Ok(&self.active[idx])
    }

    pub fn remove(&mut self, id: ItemId) -> DomainResult<InventoryItem> {
        let idx = self.active_index(id)?;
        Ok(self.active.remove(idx))
    }

    pub fn move_to_expired(&mut self, id: ItemId) -> DomainResult<&ExpiredItem> {
        let idx = self.active_index(id)?;
        let item = self.active.remove(idx);
        self.expired.push(ExpiredItem::from_item(item));
        Ok(&self.expired[self.expired.len() - 1])
    }

    pub fn revive_from_expired(
        &mut self,
        id: ItemId,
        extension_days: f64,
        assessed_on: NaiveDate,
    ) -> DomainResult<&InventoryItem> {
        if !extension_days.is_finite() {
            return Err(DomainError::invalid_item_state(
                "extension days must be a finite number",
            ));
        }
        let idx = self.expired_index(id)?;
        let item = self.expired[idx].clone().revive(extension_days, assessed_on);
        item.validate()?;
        self.expired.remove(idx);
        self.active.push(item);
        Ok(&self.active[self.active.len() - 1])
    }

    /// Drop an expired item from the holding set.
    pub fn remove_expired(&mut self, id: ItemId) -> DomainResult<ExpiredItem> {
        let idx = self.expired_index(id)?;
        Ok(self.expired.remove(idx))
    }

    pub fn get(&self, id: ItemId) -> Option<&InventoryItem> {
        self.active.iter().find(|i| i.id == id)
    }

    pub fn get_expired(&self, id: ItemId) -> Option<&ExpiredItem> {
        self.expired.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.active.iter().any(|i| &i.id == id) || self.expired.iter().any(|i| &i.id == id)
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.active
    }

    pub fn expired_items(&self) -> &[ExpiredItem] {
        &self.expired
    }

    /// First active item that looks like the same product: matching barcode,
    /// or same normalized name in the same storage category.
    pub fn find_duplicate(
        &self,
        name: &str,
        category: StorageCategory,
        barcode: Option<&str>,
    ) -> Option<&InventoryItem> {
        let wanted_name = normalize_name(name);
        let wanted_barcode = barcode.map(str::trim).filter(|b| !b.is_empty());

        self.active.iter().find(|item| {
            let barcode_match = match (wanted_barcode, item.barcode().map(str::trim)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            };
            barcode_match || (item.category == category && normalize_name(&item.name) == wanted_name)
        })
    }

    /// Active items with `0 < days_until_expiry <= days`, soonest first.
    pub fn expiring_within(&self, days: f64) -> Vec<&InventoryItem> {
        let mut soon: Vec<&InventoryItem> = self
            .active
            .iter()
            .filter(|i| i.days_until_expiry > 0.0 && i.days_until_expiry <= days)
            .collect();
        soon.sort_by(|a, b| a.days_until_expiry.total_cmp(&b.days_until_expiry));
        soon
    }

    /// Total cost of everything currently active.
    pub fn inventory_value(&self) -> Money {
        self.active.iter().map(|i| i.cost).sum()
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut InventoryItem> {
        self.active.iter_mut()
    }

    fn active_index(&self, id: ItemId) -> DomainResult<usize> {
        self.active
            .iter()
            .position(|i| i.id == id)
            .ok_or(DomainError::not_found(id))
    }

    fn expired_index(&self, id: ItemId) -> DomainResult<usize> {
        self.expired
            .iter()
            .position(|i| i.id == id)
            .ok_or(DomainError::not_found(id))
    }
}

/// Lowercased, trimmed, inner whitespace collapsed.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemStatus;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn item(name: &str, category: StorageCategory, cents: i64, days: f64) -> InventoryItem {
        InventoryItem::new(name, "🍎", category, 1, Money::from_cents(cents), days, today())
    }

    #[test]
    fn add_rejects_duplicate_ids_and_invalid_items() {
        let mut store = ItemStore::new();
        let apple = item("Apple", StorageCategory::Pantry, 100, 4.0);
        store.add(apple.clone()).unwrap();

        assert!(matches!(store.add(apple), Err(DomainError::InvalidItemState(_))));

        let mut broken = item("Pear", StorageCategory::Pantry, 100, 4.0);
        broken.quantity = 0;
        assert!(store.add(broken).is_err());
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn update_rejects_zero_quantity_without_mutating() {
        let mut store = ItemStore::new();
        let id = store.add(item("Yogurt", StorageCategory::Fridge, 250, 3.0)).unwrap().id_typed();

        let err = store
            .update(id, ItemPatch { quantity: Some(0), ..ItemPatch::default() })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidItemState(_)));

        let err = store
            .update(id, ItemPatch { cost: Some(Money::from_cents(-5)), ..ItemPatch::default() })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidItemState(_)));

        let current = store.get(id).unwrap();
        assert_eq!(current.quantity(), 1);
        assert_eq!(current.cost(), Money::from_cents(250));
    }

    #[test]
    fn update_applies_valid_patch() {
        let mut store = ItemStore::new();
        let id = store.add(item("Cheese", StorageCategory::Fridge, 500, 10.0)).unwrap().id_typed();

        let updated = store
            .update(
                id,
                ItemPatch {
                    status: Some(ItemStatus::Opened),
                    quantity: Some(3),
                    ..ItemPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status(), ItemStatus::Opened);
        assert_eq!(updated.quantity(), 3);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut store = ItemStore::new();
        let ghost = ItemId::new();
        assert_eq!(store.remove(ghost).unwrap_err(), DomainError::ItemNotFound(ghost));
        assert!(store.move_to_expired(ghost).is_err());
        assert!(store.revive_from_expired(ghost, 3.0, today()).is_err());
    }

    #[test]
    fn expire_then_revive_round_trip() {
        let mut store = ItemStore::new();
        let id = store.add(item("Ham", StorageCategory::Fridge, 450, -2.2)).unwrap().id_typed();

        let expired = store.move_to_expired(id).unwrap();
        assert_eq!(expired.expired_days(), 2);
        assert!(store.get(id).is_none());
        assert!(store.get_expired(id).is_some());

        let revived = store.revive_from_expired(id, 3.0, today()).unwrap();
        assert_eq!(revived.days_until_expiry(), 3.0);
        assert_eq!(revived.cost(), Money::from_cents(450));
        assert!(store.expired_items().is_empty());
    }

    #[test]
    fn from_parts_rejects_malformed_expired_entry() {
        let mut spoiled = item("Ham", StorageCategory::Fridge, 450, -2.0);
        spoiled.quantity = 0;
        let err = ItemStore::from_parts(Vec::new(), vec![ExpiredItem::from_item(spoiled)]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidItemState(_)));

        let mut negative = item("Ham", StorageCategory::Fridge, 450, -2.0);
        negative.cost = Money::from_cents(-500);
        assert!(ItemStore::from_parts(Vec::new(), vec![ExpiredItem::from_item(negative)]).is_err());
    }

    #[test]
    fn from_parts_rejects_duplicate_active_ids() {
        let apple = item("Apple", StorageCategory::Pantry, 100, 4.0);
        let err = ItemStore::from_parts(vec![apple.clone(), apple], Vec::new()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidItemState(_)));
    }

    #[test]
    fn revive_refuses_an_entry_that_would_break_invariants() {
        let mut store = ItemStore::new();
        let mut spoiled = ExpiredItem::from_item(item("Ham", StorageCategory::Fridge, 450, -1.0));
        spoiled.quantity = 0;
        let id = spoiled.id_typed();
        store.expired.push(spoiled);

        let err = store.revive_from_expired(id, 3.0, today()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidItemState(_)));
        assert!(store.items().is_empty());
        assert!(store.get_expired(id).is_some());
    }

    #[test]
    fn deserializing_revalidates_every_entry() {
        let mut store = ItemStore::new();
        store.add(item("Rice", StorageCategory::Pantry, 300, 90.0)).unwrap();
        let json = serde_json::to_value(&store).unwrap();
        let loaded: ItemStore = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(loaded, store);

        let mut zero_quantity = json.clone();
        zero_quantity["active"][0]["quantity"] = 0.into();
        assert!(serde_json::from_value::<ItemStore>(zero_quantity).is_err());

        let mut negative_cost = json.clone();
        negative_cost["active"][0]["cost"] = "-5".into();
        assert!(serde_json::from_value::<ItemStore>(negative_cost).is_err());

        let mut duplicated = json;
        let entry = duplicated["active"][0].clone();
        duplicated["active"].as_array_mut().unwrap().push(entry);
        assert!(serde_json::from_value::<ItemStore>(duplicated).is_err());
    }

    #[test]
    fn duplicate_matches_normalized_name_within_category_or_barcode() {
        let mut store = ItemStore::new();
        store.add(item("Greek  Yogurt", StorageCategory::Fridge, 300, 5.0)).unwrap();
        store
            .add(item("Oats", StorageCategory::Pantry, 200, 90.0).with_barcode("5000"))
            .unwrap();

        assert!(store.find_duplicate(" greek yogurt ", StorageCategory::Fridge, None).is_some());
        assert!(store.find_duplicate("greek yogurt", StorageCategory::Freezer, None).is_none());
        let by_code = store.find_duplicate("Porridge", StorageCategory::Pantry, Some("5000"));
        assert_eq!(by_code.map(|i| i.name()), Some("Oats"));
        assert!(store.find_duplicate("Rice", StorageCategory::Pantry, Some("  ")).is_none());
    }

    #[test]
    fn expiring_within_sorts_soonest_first() {
        let mut store = ItemStore::new();
        store.add(item("Later", StorageCategory::Fridge, 100, 2.0)).unwrap();
        store.add(item("Sooner", StorageCategory::Fridge, 100, 0.5)).unwrap();
        store.add(item("Gone", StorageCategory::Fridge, 100, -1.0)).unwrap();
        store.add(item("Fine", StorageCategory::Fridge, 100, 9.0)).unwrap();

        let names: Vec<_> = store.expiring_within(2.0).iter().map(|i| i.name()).collect();
        assert_eq!(names, ["Sooner", "Later"]);
        assert_eq!(store.inventory_value(), Money::from_cents(400));
    }
}
