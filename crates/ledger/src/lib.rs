//! Consumption ledger (append-only history of consumption and waste).
//!
//! Pure domain logic only: no IO, no persistence concerns. Analytics read
//! from here; only the lifecycle engine writes.

pub mod ledger;
pub mod record;

pub use ledger::Ledger;
pub use record::ConsumptionRecord;
