//! Engine tunables.
//!
//! Defaults suit a single household. Chart headroom and fallback
//! scales are deliberately not configurable; they live with the axis code.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const ENV_REVIVE_DAYS: &str = "LARDER_REVIVE_DAYS";
pub const ENV_TOP_WASTED: &str = "LARDER_TOP_WASTED";
pub const ENV_OTHER_THRESHOLD: &str = "LARDER_OTHER_THRESHOLD";
pub const ENV_EXPIRING_SOON_DAYS: &str = "LARDER_EXPIRING_SOON_DAYS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shelf life granted to a revived expired item when the caller gives none.
    pub default_revive_days: f64,
    /// Number of named entries in the top-wasted ranking before "Other".
    pub top_wasted_limit: usize,
    /// Remainder waste at or below this amount is treated as rounding noise.
    pub other_threshold: Decimal,
    /// Horizon used by "expiring soon" store queries.
    pub expiring_soon_days: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_revive_days: 3.0,
            top_wasted_limit: 3,
            other_threshold: Decimal::new(1, 2),
            expiring_soon_days: 2.0,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `LARDER_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `LARDER_*` key.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            default_revive_days: read(&lookup, ENV_REVIVE_DAYS, defaults.default_revive_days),
            top_wasted_limit: read(&lookup, ENV_TOP_WASTED, defaults.top_wasted_limit),
            other_threshold: read(&lookup, ENV_OTHER_THRESHOLD, defaults.other_threshold),
            expiring_soon_days: read(&lookup, ENV_EXPIRING_SOON_DAYS, defaults.expiring_soon_days),
        }
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + core::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("{key}={raw:?} is not valid; using default {default:?}");
            default
        }),
    }
}
