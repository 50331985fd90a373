//! Domain error model.

use thiserror::Error;

use crate::id::ItemId;

/// Result type used across the engine.
pub type DomainResult<T> = Result<T, DomainError>;

/// Engine-level error.
///
/// Every variant is deterministic: operations are local computations, so none
/// of these are retried internally. Collaborators turn them into user-facing
/// messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed create/update (negative cost, zero quantity, duplicate id, ...).
    #[error("invalid item state: {0}")]
    InvalidItemState(String),

    /// Quantity or percentage out of range for a consumption.
    #[error("invalid consumption: {0}")]
    InvalidConsumption(String),

    /// The operation referenced an id that is not in the relevant set.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// An acquire matched an existing item and no merge decision was supplied.
    ///
    /// This is a control-flow signal, not a fault.
    #[error("duplicate of item {existing}; a merge decision is required")]
    DuplicateDecisionRequired { existing: ItemId },

    /// Unrecognized period key passed to the aggregation engine.
    #[error("invalid granularity: {0}")]
    InvalidGranularity(String),

    /// A ledger record violates its own invariants.
    #[error("invalid consumption record: {0}")]
    InvalidRecord(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_item_state(msg: impl Into<String>) -> Self {
        Self::InvalidItemState(msg.into())
    }

    pub fn invalid_consumption(msg: impl Into<String>) -> Self {
        Self::InvalidConsumption(msg.into())
    }

    pub fn invalid_granularity(msg: impl Into<String>) -> Self {
        Self::InvalidGranularity(msg.into())
    }

    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(id: ItemId) -> Self {
        Self::ItemNotFound(id)
    }

    /// True for the merge control-flow signal (as opposed to a genuine failure).
    pub fn is_decision_required(&self) -> bool {
        matches!(self, Self::DuplicateDecisionRequired { .. })
    }
}
