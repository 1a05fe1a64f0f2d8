//! Season reset: eligibility, gain, the reset itself, and the permanent
//! mastery track bought with prestige points.

use super::catalog::{Catalog, MasteryDefinition};
use super::config::PrestigeConfig;
use super::cost::Pricing;
use super::state::{GameSnapshot, PrestigeState, UpgradeLevels};
use super::stats;
use crate::big::BigNum;

/// Whether a reset is allowed right now. Always computed from the snapshot.
pub fn can_prestige(snapshot: &GameSnapshot, config: &PrestigeConfig) -> bool {
    snapshot.run_earned >= config.min_earned || snapshot.score >= config.min_score
}

/// `floor(sqrt(run_earned / gain_divisor))`.
pub fn prestige_gain(run_earned: BigNum, config: &PrestigeConfig) -> BigNum {
    (run_earned / config.gain_divisor).sqrt().floor()
}

/// Currency needed this run for the gain to reach `points`.
pub fn earned_for_gain(points: BigNum, config: &PrestigeConfig) -> BigNum {
    points * points * config.gain_divisor
}

/// New snapshot after a season reset awarding `gain` points.
///
/// Everything bought with currency goes; prestige points, mastery levels and
/// all-run earnings stay. Derived stats are left for the caller to refresh.
pub fn reset(catalog: &Catalog, snapshot: &GameSnapshot, gain: BigNum) -> GameSnapshot {
    let old = &snapshot.prestige;
    let prestige = PrestigeState {
        points: old.points + gain,
        total_points: old.total_points + gain,
        count: old.count.saturating_add(1),
        mastery: old.mastery.clone(),
        earned_all_runs: old.earned_all_runs + snapshot.run_earned,
    };
    GameSnapshot {
        currency: stats::starting_currency(catalog, &prestige.mastery),
        run_earned: BigNum::ZERO,
        experience: BigNum::ZERO,
        score: BigNum::ZERO,
        upgrades: UpgradeLevels::for_catalog(catalog),
        boosts: Vec::new(),
        prestige,
        total_clicks: snapshot.total_clicks,
        elapsed_secs: snapshot.elapsed_secs,
        derived: snapshot.derived.clone(),
    }
}

/// Prestige-point cost of the next level of `def`.
pub fn mastery_cost(def: &MasteryDefinition, level: u32) -> BigNum {
    Pricing::for_mastery(def).unit_cost(BigNum::from(level))
}

pub fn is_mastery_maxed(def: &MasteryDefinition, prestige: &PrestigeState) -> bool {
    prestige.mastery.level(&def.id) >= def.max_level
}

pub fn can_buy_mastery(def: &MasteryDefinition, prestige: &PrestigeState) -> bool {
    !is_mastery_maxed(def, prestige)
        && prestige.points >= mastery_cost(def, prestige.mastery.level(&def.id))
}
