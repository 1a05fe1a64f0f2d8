//! Derived stats: click value, passive income, experience multiplier.
//!
//! Each stat is `(base + flat) × Π(multipliers)`, floored last. Flat
//! bonuses always land before any multiplier.

use super::catalog::{BoostTarget, Catalog, MasteryEffect, UpgradeEffect};
use super::config::EngineConfig;
use super::state::{ActiveBoost, MasteryLevels, PrestigeState, UpgradeLevels};
use crate::big::BigNum;

/// Accumulator following the flat → multiplier model.
#[derive(Clone, Debug, PartialEq)]
pub struct StatValue {
    pub base: BigNum,
    pub flat: BigNum,
    pub multipliers: Vec<BigNum>,
}

impl StatValue {
    pub fn with_base(base: BigNum) -> Self {
        Self {
            base,
            flat: BigNum::ZERO,
            multipliers: Vec::new(),
        }
    }

    pub fn add_flat(&mut self, value: BigNum) {
        self.flat += value;
    }

    pub fn add_multiplier(&mut self, value: BigNum) {
        self.multipliers.push(value);
    }

    /// `(base + flat) × Π multipliers`, unfloored.
    pub fn raw(&self) -> BigNum {
        let product: BigNum = self.multipliers.iter().copied().product();
        (self.base + self.flat) * product
    }

    /// Final integer-valued amount.
    pub fn compute(&self) -> BigNum {
        self.raw().floor()
    }
}

/// `Π value^level` over owned upgrades whose effect `select` picks out.
fn multiplicative(
    catalog: &Catalog,
    levels: &UpgradeLevels,
    select: impl Fn(&UpgradeEffect) -> Option<BigNum>,
) -> BigNum {
    catalog
        .upgrades
        .iter()
        .filter_map(|u| {
            let value = select(&u.effect)?;
            let level = levels.level(&u.id);
            (!level.is_zero()).then(|| value.pow_big(level))
        })
        .product()
}

/// Product of every click multiplier owned.
pub fn click_multiplier(catalog: &Catalog, levels: &UpgradeLevels) -> BigNum {
    multiplicative(catalog, levels, |e| match e {
        UpgradeEffect::ClickMultiplier(v) => Some(*v),
        _ => None,
    })
}

/// Sum of every passive income bonus owned.
pub fn passive_bonus(catalog: &Catalog, levels: &UpgradeLevels) -> BigNum {
    catalog
        .upgrades
        .iter()
        .filter_map(|u| match &u.effect {
            UpgradeEffect::PassiveIncome(v) => Some(*v * levels.level(&u.id)),
            _ => None,
        })
        .sum()
}

pub fn experience_multiplier(catalog: &Catalog, levels: &UpgradeLevels) -> BigNum {
    multiplicative(catalog, levels, |e| match e {
        UpgradeEffect::ExperienceBonus(v) => Some(*v),
        _ => None,
    })
}

/// Income bonus for standing on rank `rank_index`.
pub fn rank_bonus(config: &EngineConfig, rank_index: usize) -> BigNum {
    BigNum::from_f64(1.0 + config.ranks.rank_bonus_per_tier * rank_index as f64)
}

/// Legacy bonus from every prestige point ever earned.
pub fn prestige_bonus(config: &EngineConfig, prestige: &PrestigeState) -> BigNum {
    BigNum::ONE + BigNum::from_f64(config.prestige.bonus_per_point) * prestige.total_points
}

/// Product of mastery `GlobalMultiplier` levels.
pub fn mastery_multiplier(catalog: &Catalog, mastery: &MasteryLevels) -> BigNum {
    catalog
        .mastery
        .iter()
        .filter_map(|m| match m.effect {
            MasteryEffect::GlobalMultiplier(v) => {
                Some(BigNum::from_f64(v).pow(mastery.level(&m.id) as f64))
            }
            _ => None,
        })
        .product()
}

/// Cost factor from mastery `ItemDiscount` levels (1.0 when none owned).
pub fn mastery_discount(catalog: &Catalog, mastery: &MasteryLevels) -> f64 {
    catalog
        .mastery
        .iter()
        .filter_map(|m| match m.effect {
            MasteryEffect::ItemDiscount(v) => Some(v.powi(mastery.level(&m.id) as i32)),
            _ => None,
        })
        .product()
}

/// Currency granted at the start of each run.
pub fn starting_currency(catalog: &Catalog, mastery: &MasteryLevels) -> BigNum {
    catalog
        .mastery
        .iter()
        .filter_map(|m| match m.effect {
            MasteryEffect::StartingCurrency(v) => Some(v * BigNum::from(mastery.level(&m.id))),
            _ => None,
        })
        .sum()
}

/// Extra score per scoring click.
pub fn score_bonus(catalog: &Catalog, mastery: &MasteryLevels) -> BigNum {
    catalog
        .mastery
        .iter()
        .filter_map(|m| match m.effect {
            MasteryEffect::ScoreBonus(v) => Some(v * BigNum::from(mastery.level(&m.id))),
            _ => None,
        })
        .sum()
}

fn boost_multiplier(boosts: &[ActiveBoost], target: BoostTarget) -> BigNum {
    boosts
        .iter()
        .filter(|b| b.target == target)
        .map(|b| BigNum::from_f64(b.multiplier))
        .product()
}

/// Everything the click and passive stats are built from.
pub struct StatInputs<'a> {
    pub catalog: &'a Catalog,
    pub upgrades: &'a UpgradeLevels,
    pub prestige: &'a PrestigeState,
    pub boosts: &'a [ActiveBoost],
    pub rank_index: usize,
}

/// Multipliers shared by click value and passive income.
fn shared_multipliers(inputs: &StatInputs<'_>) -> [BigNum; 3] {
    let config = &inputs.catalog.config;
    [
        rank_bonus(config, inputs.rank_index),
        prestige_bonus(config, inputs.prestige),
        mastery_multiplier(inputs.catalog, &inputs.prestige.mastery),
    ]
}

pub fn click_stat(inputs: &StatInputs<'_>) -> StatValue {
    let mut stat = StatValue::with_base(BigNum::ONE);
    stat.add_multiplier(click_multiplier(inputs.catalog, inputs.upgrades));
    for m in shared_multipliers(inputs) {
        stat.add_multiplier(m);
    }
    stat.add_multiplier(boost_multiplier(inputs.boosts, BoostTarget::Click));
    stat
}

pub fn passive_stat(inputs: &StatInputs<'_>) -> StatValue {
    let mut stat = StatValue::with_base(BigNum::ZERO);
    stat.add_flat(passive_bonus(inputs.catalog, inputs.upgrades));
    for m in shared_multipliers(inputs) {
        stat.add_multiplier(m);
    }
    stat.add_multiplier(boost_multiplier(inputs.boosts, BoostTarget::Passive));
    stat
}
