//! Inventory domain: item store and lifecycle engine.
//!
//! Deterministic domain logic only (no IO, no UI, no storage). The engine
//! owns its collections explicitly; callers persist them via `into_parts`.

pub mod clock;
pub mod item;
pub mod lifecycle;
pub mod merge;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use item::{ExpiredItem, InventoryItem, ItemPatch, ItemStatus, StorageCategory};
pub use lifecycle::{Consumption, ExpiredDecision, ExpiredResolution, LifecycleEngine};
pub use merge::{AcquireOutcome, MergeDecision, MergeResolution, NewItem, PendingMerge};
pub use store::{ItemStore, normalize_name};
