//! Game snapshot definitions.

use std::collections::BTreeMap;

use serde::Serialize;

use super::catalog::{BoostTarget, Catalog};
use crate::big::BigNum;

/// Levels owned per catalog id.
///
/// The key-set is fixed when the map is built from a catalog; writes to ids
/// outside it are refused, so a snapshot can never carry an upgrade the
/// catalog doesn't know about.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LevelMap<T> {
    levels: BTreeMap<String, T>,
}

impl<T: Copy + Default> LevelMap<T> {
    /// Every id at its default (zero) level.
    pub fn with_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            levels: ids.into_iter().map(|id| (id.to_string(), T::default())).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.levels.get(id).copied()
    }

    /// Level of `id`, or the default for ids outside the key-set.
    pub fn level(&self, id: &str) -> T {
        self.get(id).unwrap_or_default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.levels.contains_key(id)
    }

    /// Returns false (and changes nothing) for ids outside the key-set.
    pub fn set(&mut self, id: &str, value: T) -> bool {
        match self.levels.get_mut(id) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, T)> + '_ {
        self.levels.iter().map(|(id, level)| (id.as_str(), *level))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Per-run upgrade levels (integer-valued, unbounded).
pub type UpgradeLevels = LevelMap<BigNum>;
/// Permanent mastery levels (small, capped by `max_level`).
pub type MasteryLevels = LevelMap<u32>;

impl UpgradeLevels {
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self::with_ids(catalog.upgrades.iter().map(|u| u.id.as_str()))
    }

    /// Sum of all levels owned.
    pub fn total(&self) -> BigNum {
        self.levels.values().copied().sum()
    }
}

impl MasteryLevels {
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self::with_ids(catalog.mastery.iter().map(|m| m.id.as_str()))
    }
}

/// Progress that survives a season reset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrestigeState {
    /// Spendable prestige points.
    pub points: BigNum,
    /// All prestige points ever earned. Never reset, never decremented.
    pub total_points: BigNum,
    /// Number of resets performed ("season").
    pub count: u32,
    pub mastery: MasteryLevels,
    /// Currency earned across all finished runs.
    pub earned_all_runs: BigNum,
}

impl PrestigeState {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            points: BigNum::ZERO,
            total_points: BigNum::ZERO,
            count: 0,
            mastery: MasteryLevels::for_catalog(catalog),
            earned_all_runs: BigNum::ZERO,
        }
    }
}

/// A boost currently running.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActiveBoost {
    pub id: String,
    pub target: BoostTarget,
    pub multiplier: f64,
    pub seconds_left: u32,
}

/// Position on the rank ladder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankInfo {
    /// Index into the catalog's rank list.
    pub index: usize,
    pub name: String,
    /// 1-based division within the rank.
    pub division: u32,
    pub divisions: u32,
}

/// Values computed from the rest of the snapshot; never edited directly.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DerivedStats {
    pub click_value: BigNum,
    pub passive_income: BigNum,
    pub experience_multiplier: BigNum,
    pub level: u64,
    pub rank: RankInfo,
}

/// Full state of one player at one moment.
///
/// The engine treats snapshots as values: every action takes one by
/// reference and returns a new one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// Spendable currency.
    pub currency: BigNum,
    /// Currency earned this run (drives prestige gain).
    pub run_earned: BigNum,
    pub experience: BigNum,
    /// Cumulative score (LP) used for the rank ladder.
    pub score: BigNum,
    pub upgrades: UpgradeLevels,
    pub boosts: Vec<ActiveBoost>,
    pub prestige: PrestigeState,
    pub total_clicks: u64,
    pub elapsed_secs: u64,
    pub derived: DerivedStats,
}

impl GameSnapshot {
    /// Zeroed snapshot for `catalog`. Derived values are placeholders until
    /// the engine refreshes them.
    pub(crate) fn blank(catalog: &Catalog) -> Self {
        Self {
            currency: BigNum::ZERO,
            run_earned: BigNum::ZERO,
            experience: BigNum::ZERO,
            score: BigNum::ZERO,
            upgrades: UpgradeLevels::for_catalog(catalog),
            boosts: Vec::new(),
            prestige: PrestigeState::new(catalog),
            total_clicks: 0,
            elapsed_secs: 0,
            derived: DerivedStats {
                click_value: BigNum::ONE,
                passive_income: BigNum::ZERO,
                experience_multiplier: BigNum::ONE,
                level: 1,
                rank: RankInfo {
                    index: 0,
                    name: String::new(),
                    division: 1,
                    divisions: 1,
                },
            },
        }
    }

    pub fn level_of(&self, upgrade_id: &str) -> BigNum {
        self.upgrades.level(upgrade_id)
    }

    pub fn is_boost_active(&self, boost_id: &str) -> bool {
        self.boosts.iter().any(|b| b.id == boost_id)
    }
}
