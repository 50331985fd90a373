//! Currency amounts.
//!
//! Amounts are fixed-point decimals, never binary floats, so chains of partial
//! consumptions cannot drift. The engine is currency-agnostic: a `Money` is a
//! bare amount and formatting belongs to collaborators.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

const SHARE_DP: u32 = 10;

/// Largest amount (in whole currency units) an item or record may carry.
pub const MAX_WHOLE_UNITS: i64 = 1_000_000_000_000_000;

/// A signed currency amount.
///
/// Item costs are non-negative (enforced by the item store); differences
/// between periods may be negative.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Amount from an integer number of hundredths (e.g. `399` is `3.99`).
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Cost of one unit when this amount covers `quantity` units.
    ///
    /// Returns `None` for a zero quantity.
    pub fn per_unit(&self, quantity: u32) -> Option<Self> {
        self.0.checked_div(Decimal::from(quantity)).map(Self)
    }

    /// This (unit) amount multiplied by a unit count. `None` on overflow.
    pub fn times(&self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// `percent`% of this amount (`percent` in 0..=100 for consumption shares).
    ///
    /// The result is never finer than this amount's own scale (or
    /// `SHARE_DP`, whichever is larger), so `self - self.percent(p)` is exact.
    /// `None` on overflow.
    pub fn percent(&self, percent: Decimal) -> Option<Self> {
        let dp = self.0.scale().max(SHARE_DP);
        let share = self.0.checked_mul(percent)?.checked_div(Decimal::ONE_HUNDRED)?;
        Some(Self(
            share.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        ))
    }

    pub fn checked_add(&self, rhs: Money) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// True when the magnitude is above [`MAX_WHOLE_UNITS`].
    ///
    /// Item costs and ledger amounts are capped so that period sums over any
    /// realistic history stay far from `Decimal`'s range.
    pub fn exceeds_limit(&self) -> bool {
        self.0.abs() > Decimal::from(MAX_WHOLE_UNITS)
    }

    /// Rounded to two decimal places, midpoints away from zero.
    pub fn round_currency(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Lossy conversion for chart scaling and angle math.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0.normalize(), f)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
