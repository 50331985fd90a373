//! `larder-core`: foundation building blocks shared by every larder crate.
//!
//! This crate contains **pure domain** primitives (no storage, no UI concerns).

pub mod config;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use config::EngineConfig;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ItemId, RecordId};
pub use money::Money;
pub use value_object::ValueObject;
