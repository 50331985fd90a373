//! Acquisition input and the duplicate-merge decision point.
//!
//! The engine never resolves a duplicate on its own: an acquire that matches
//! an existing item comes back as [`AcquireOutcome::PendingDecision`] and the
//! caller answers with a [`MergeDecision`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use larder_core::{DomainError, DomainResult, ItemId, Money};

use crate::item::{InventoryItem, StorageCategory};

/// Attributes of a newly acquired item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub emoji: String,
    pub category: StorageCategory,
    pub quantity: u32,
    /// Total cost for all `quantity` units.
    pub cost: Money,
    pub expiry_date: NaiveDate,
    pub barcode: Option<String>,
}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        emoji: impl Into<String>,
        category: StorageCategory,
        quantity: u32,
        cost: Money,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
            category,
            quantity,
            cost,
            expiry_date,
            barcode: None,
        }
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    /// Whole days from `today` to the expiry date; same day is 0.
    pub fn days_until_expiry(&self, today: NaiveDate) -> f64 {
        (self.expiry_date - today).num_days() as f64
    }

    pub(crate) fn into_item(self, today: NaiveDate) -> InventoryItem {
        let days = self.days_until_expiry(today);
        let item = InventoryItem::new(
            self.name,
            self.emoji,
            self.category,
            self.quantity,
            self.cost,
            days,
            today,
        );
        match self.barcode {
            Some(code) if !code.trim().is_empty() => item.with_barcode(code),
            _ => item,
        }
    }
}

/// Caller's answer to a pending duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeDecision {
    /// Sum quantity and cost into the existing item.
    Combine,
    /// Track the incoming item independently.
    AddSeparate,
    /// Do nothing.
    Cancel,
}

/// A duplicate waiting for a [`MergeDecision`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMerge {
    /// Snapshot of the matched item at acquire time.
    pub existing: InventoryItem,
    pub incoming: NewItem,
}

impl PendingMerge {
    pub fn existing_id(&self) -> ItemId {
        self.existing.id_typed()
    }
}

/// What a merge decision did.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeResolution {
    Combined(InventoryItem),
    AddedSeparately(InventoryItem),
    Cancelled,
}

impl MergeResolution {
    /// The item that was created or grown, if any.
    pub fn item(&self) -> Option<&InventoryItem> {
        match self {
            MergeResolution::Combined(item) | MergeResolution::AddedSeparately(item) => Some(item),
            MergeResolution::Cancelled => None,
        }
    }
}

/// Result of an acquire.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquireOutcome {
    /// No duplicate; the item was added.
    NoConflict(InventoryItem),
    /// A duplicate was found; nothing was mutated.
    PendingDecision(PendingMerge),
    /// A decision was applied.
    Resolved(MergeResolution),
}

impl AcquireOutcome {
    /// Turn a pending decision into [`DomainError::DuplicateDecisionRequired`]
    /// for callers that drive acquisition through `?`.
    pub fn require_no_conflict(self) -> DomainResult<InventoryItem> {
        match self {
            AcquireOutcome::NoConflict(item) => Ok(item),
            AcquireOutcome::PendingDecision(pending) => Err(DomainError::DuplicateDecisionRequired {
                existing: pending.existing_id(),
            }),
            AcquireOutcome::Resolved(resolution) => match resolution {
                MergeResolution::Combined(item) | MergeResolution::AddedSeparately(item) => Ok(item),
                MergeResolution::Cancelled => Err(DomainError::invalid_item_state(
                    "acquisition was cancelled",
                )),
            },
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AcquireOutcome::PendingDecision(_))
    }
}

impl From<MergeResolution> for AcquireOutcome {
    fn from(value: MergeResolution) -> Self {
        AcquireOutcome::Resolved(value)
    }
}
