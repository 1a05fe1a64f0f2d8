//! Purchase cost formulas: single level, bulk, and max affordable.
//!
//! Costs grow geometrically: `base × scaling^level`, floored to whole
//! currency. A bulk purchase of `n` levels uses the closed-form geometric sum
//! rather than adding levels one by one.

use super::catalog::{MasteryDefinition, UpgradeDefinition};
use crate::big::BigNum;

/// Upper bound for the doubling phase of `max_affordable`.
const MAX_SEARCH_QUANTITY: u64 = 1 << 62;

/// Base cost and growth of one purchasable track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pricing {
    base_cost: BigNum,
    scaling: f64,
}

impl Pricing {
    pub fn new(base_cost: BigNum, scaling: f64) -> Self {
        Self { base_cost, scaling }
    }

    pub fn for_upgrade(def: &UpgradeDefinition) -> Self {
        Self::new(def.base_cost, def.scaling)
    }

    pub fn for_mastery(def: &MasteryDefinition) -> Self {
        Self::new(def.base_cost, def.scaling)
    }

    /// Scale every price by `factor` (e.g. 0.9 for a 10% discount).
    pub fn discounted(self, factor: f64) -> Self {
        Self {
            base_cost: self.base_cost * BigNum::from_f64(factor),
            ..self
        }
    }

    /// Price of level `level + 1` before flooring.
    fn raw_unit_cost(&self, level: BigNum) -> BigNum {
        self.base_cost * BigNum::from_f64(self.scaling).pow_big(level)
    }

    /// Cost of the next single level when `level` are already owned.
    pub fn unit_cost(&self, level: BigNum) -> BigNum {
        self.raw_unit_cost(level).floor()
    }

    /// Cost of buying `quantity` levels starting at `level`. Zero for a zero
    /// quantity.
    pub fn bulk_cost(&self, level: BigNum, quantity: BigNum) -> BigNum {
        if quantity.is_zero() {
            return BigNum::ZERO;
        }
        let unit = self.raw_unit_cost(level);
        if self.scaling <= 1.0 {
            return (unit * quantity).floor();
        }
        let ratio = BigNum::from_f64(self.scaling);
        let series = ratio.pow_big(quantity).saturating_sub(BigNum::ONE)
            / BigNum::from_f64(self.scaling - 1.0);
        (unit * series).floor()
    }

    /// Largest `n` with `bulk_cost(level, n) <= budget`.
    pub fn max_affordable(&self, level: BigNum, budget: BigNum) -> BigNum {
        let one = BigNum::ONE;
        if self.bulk_cost(level, one) > budget {
            return BigNum::ZERO;
        }
        if self.scaling <= 1.0 {
            let unit = self.raw_unit_cost(level);
            if unit.is_zero() {
                return BigNum::MAX;
            }
            // Closed form, then step back if rounding pushed it over budget.
            // Past 2^53 subtracting one is a no-op, so the step doubles until
            // it moves `n`.
            let mut n = (budget / unit).floor();
            let mut step = one;
            while !n.is_zero() && self.bulk_cost(level, n) > budget {
                let next = n.saturating_sub(step);
                if next == n {
                    step = step * BigNum::from_u64(2);
                } else {
                    n = next;
                }
            }
            return n;
        }

        let fits = |n: u64| self.bulk_cost(level, BigNum::from_u64(n)) <= budget;

        // Grow an upper bound until it no longer fits.
        let mut hi: u64 = 1;
        while fits(hi) {
            if hi >= MAX_SEARCH_QUANTITY {
                return BigNum::from_u64(hi);
            }
            hi *= 2;
        }
        // Invariant: fits(lo) && !fits(hi).
        let mut lo = hi / 2;
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if fits(mid) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        BigNum::from_u64(lo)
    }
}

/// Cost of the next level of `def` with `level` owned.
pub fn unit_cost(def: &UpgradeDefinition, level: BigNum) -> BigNum {
    Pricing::for_upgrade(def).unit_cost(level)
}

pub fn bulk_cost(def: &UpgradeDefinition, level: BigNum, quantity: BigNum) -> BigNum {
    Pricing::for_upgrade(def).bulk_cost(level, quantity)
}

pub fn max_affordable(def: &UpgradeDefinition, level: BigNum, budget: BigNum) -> BigNum {
    Pricing::for_upgrade(def).max_affordable(level, budget)
}
