//! Static game content: upgrades, rank ladder, mastery track and boosts.
//!
//! A `Catalog` is loaded once (built in code by a variant, or read from a
//! JSON document), validated, and never modified afterwards. Every formula
//! in the engine reads costs and effects from here, so display and purchase
//! logic can't drift apart.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::EngineConfig;
use crate::big::BigNum;

/// Reasons a catalog (or its config section) is rejected.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate id `{0}`")]
    DuplicateId(String),
    #[error("`{id}` has invalid cost scaling {scaling} (must be a finite number >= 1)")]
    InvalidScaling { id: String, scaling: f64 },
    #[error("`{0}` must have a positive base cost")]
    ZeroCost(String),
    #[error("`{id}` has invalid effect value: {reason}")]
    InvalidEffect { id: String, reason: String },
    #[error("rank ladder is empty")]
    EmptyLadder,
    #[error("rank `{0}` must have at least one division")]
    NoDivisions(String),
    #[error("rank `{0}` does not require more score than the rank before it")]
    ThresholdOrder(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Shop rarity band, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Starting,
    Basic,
    Epic,
    Legendary,
    Mythic,
}

/// What owning one level of a per-run upgrade does.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum UpgradeEffect {
    /// Click value × `value^level`.
    ClickMultiplier(BigNum),
    /// Passive income + `value × level` per second.
    PassiveIncome(BigNum),
    /// Experience per click × `value^level`.
    ExperienceBonus(BigNum),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tier: Tier,
    pub base_cost: BigNum,
    /// Cost growth per level owned.
    pub scaling: f64,
    pub effect: UpgradeEffect,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankDefinition {
    pub name: String,
    pub required_score: BigNum,
    pub divisions: u32,
}

/// Permanent effect bought with prestige points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MasteryEffect {
    /// Click value and passive income × `value^level`.
    GlobalMultiplier(f64),
    /// Currency granted at the start of every run, `value × level`.
    StartingCurrency(BigNum),
    /// Extra score per scoring click, `value × level`.
    ScoreBonus(BigNum),
    /// Per-run upgrade costs × `value^level` (value below 1).
    ItemDiscount(f64),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MasteryDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_cost: BigNum,
    pub scaling: f64,
    pub max_level: u32,
    pub effect: MasteryEffect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostTarget {
    Click,
    Passive,
}

/// Timed, run-scoped multiplier bought with currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoostDefinition {
    pub id: String,
    pub name: String,
    pub cost: BigNum,
    pub target: BoostTarget,
    pub multiplier: f64,
    pub duration_secs: u32,
}

/// Complete content and tuning of one game variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub name: String,
    pub currency_name: String,
    pub score_name: String,
    pub prestige_name: String,
    pub upgrades: Vec<UpgradeDefinition>,
    pub ranks: Vec<RankDefinition>,
    #[serde(default)]
    pub mastery: Vec<MasteryDefinition>,
    #[serde(default)]
    pub boosts: Vec<BoostDefinition>,
    #[serde(default)]
    pub config: EngineConfig,
}

fn check_scaling(id: &str, scaling: f64) -> Result<(), CatalogError> {
    if scaling.is_finite() && scaling >= 1.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidScaling {
            id: id.to_string(),
            scaling,
        })
    }
}

fn invalid_effect(id: &str, reason: &str) -> CatalogError {
    CatalogError::InvalidEffect {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

impl Catalog {
    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        log::info!(
            "loaded catalog `{}`: {} upgrades, {} ranks, {} mastery upgrades",
            catalog.name,
            catalog.upgrades.len(),
            catalog.ranks.len(),
            catalog.mastery.len()
        );
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = std::collections::BTreeSet::new();
        let ids = self
            .upgrades
            .iter()
            .map(|u| &u.id)
            .chain(self.mastery.iter().map(|m| &m.id))
            .chain(self.boosts.iter().map(|b| &b.id));
        for id in ids {
            if !seen.insert(id.as_str()) {
                return Err(CatalogError::DuplicateId(id.clone()));
            }
        }

        for u in &self.upgrades {
            check_scaling(&u.id, u.scaling)?;
            if u.base_cost.is_zero() {
                return Err(CatalogError::ZeroCost(u.id.clone()));
            }
            if let UpgradeEffect::ClickMultiplier(v) | UpgradeEffect::ExperienceBonus(v) = &u.effect {
                if *v < BigNum::ONE {
                    return Err(invalid_effect(&u.id, "multiplier must be at least 1"));
                }
            }
        }

        for m in &self.mastery {
            check_scaling(&m.id, m.scaling)?;
            if m.base_cost.is_zero() {
                return Err(CatalogError::ZeroCost(m.id.clone()));
            }
            match m.effect {
                MasteryEffect::GlobalMultiplier(v) if !(v.is_finite() && v >= 1.0) => {
                    return Err(invalid_effect(&m.id, "multiplier must be at least 1"));
                }
                MasteryEffect::ItemDiscount(v) if !(v > 0.0 && v <= 1.0) => {
                    return Err(invalid_effect(&m.id, "discount factor must be in (0, 1]"));
                }
                _ => {}
            }
        }

        for b in &self.boosts {
            if !(b.multiplier.is_finite() && b.multiplier >= 1.0) {
                return Err(invalid_effect(&b.id, "multiplier must be at least 1"));
            }
            if b.duration_secs == 0 {
                return Err(invalid_effect(&b.id, "duration must be positive"));
            }
        }

        if self.ranks.is_empty() {
            return Err(CatalogError::EmptyLadder);
        }
        for (i, rank) in self.ranks.iter().enumerate() {
            if rank.divisions == 0 {
                return Err(CatalogError::NoDivisions(rank.name.clone()));
            }
            if i > 0 && rank.required_score <= self.ranks[i - 1].required_score {
                return Err(CatalogError::ThresholdOrder(rank.name.clone()));
            }
        }

        if let Some(problem) = self.config.problem() {
            return Err(CatalogError::InvalidConfig(problem));
        }
        Ok(())
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDefinition> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn mastery_upgrade(&self, id: &str) -> Option<&MasteryDefinition> {
        self.mastery.iter().find(|m| m.id == id)
    }

    pub fn boost(&self, id: &str) -> Option<&BoostDefinition> {
        self.boosts.iter().find(|b| b.id == id)
    }
}
