//! Precinct: a police-themed clicker. Answer calls for budget, earn merit
//! toward promotion, and retire into a new career for Commendations.

use crate::big::BigNum;
use crate::engine::catalog::{
    BoostDefinition, BoostTarget, Catalog, MasteryDefinition, MasteryEffect, RankDefinition,
    Tier, UpgradeDefinition, UpgradeEffect,
};
use crate::engine::config::{EngineConfig, PrestigeConfig, RankConfig};

const GEAR_SCALING: f64 = 1.17;

fn gear(id: &str, name: &str, tier: Tier, base_cost: u64, effect: UpgradeEffect) -> UpgradeDefinition {
    UpgradeDefinition {
        id: id.into(),
        name: name.into(),
        description: String::new(),
        tier,
        base_cost: BigNum::from_u64(base_cost),
        scaling: GEAR_SCALING,
        effect,
    }
}

fn upgrades() -> Vec<UpgradeDefinition> {
    use Tier::*;
    use UpgradeEffect::*;
    let n = BigNum::from_u64;
    vec![
        gear("notebook", "Pocket Notebook", Starting, 10, ClickMultiplier(BigNum::from_f64(1.4))),
        gear("beat_partner", "Beat Partner", Starting, 30, PassiveIncome(n(1))),
        gear("radio", "Patrol Radio", Basic, 120, ClickMultiplier(n(2))),
        gear("academy_course", "Academy Course", Basic, 180, ExperienceBonus(n(2))),
        gear("squad_car", "Squad Car", Basic, 250, PassiveIncome(n(6))),
        gear("k9_unit", "K-9 Unit", Epic, 700, ClickMultiplier(n(3))),
        gear("dispatch_desk", "Dispatch Desk", Epic, 1_000, PassiveIncome(n(20))),
        gear("forensics_lab", "Forensics Lab", Legendary, 3_500, ClickMultiplier(n(5))),
        gear("task_force", "Task Force", Legendary, 5_000, PassiveIncome(n(70))),
        gear("swat_team", "SWAT Team", Mythic, 14_000, ClickMultiplier(n(8))),
        gear("city_contract", "City Contract", Mythic, 20_000, PassiveIncome(n(250))),
    ]
}

fn ranks() -> Vec<RankDefinition> {
    [
        ("Cadet", 0, 3),
        ("Officer", 300, 3),
        ("Detective", 900, 3),
        ("Sergeant", 1_800, 3),
        ("Lieutenant", 3_000, 2),
        ("Captain", 4_500, 2),
        ("Commander", 6_500, 1),
        ("Chief", 9_000, 1),
        ("Commissioner", 12_000, 1),
    ]
    .into_iter()
    .map(|(name, required, divisions)| RankDefinition {
        name: name.into(),
        required_score: BigNum::from_u64(required),
        divisions,
    })
    .collect()
}

fn mastery() -> Vec<MasteryDefinition> {
    let entry = |id: &str, name: &str, cost: u64, max_level: u32, effect| MasteryDefinition {
        id: id.into(),
        name: name.into(),
        description: String::new(),
        base_cost: BigNum::from_u64(cost),
        scaling: 1.6,
        max_level,
        effect,
    };
    vec![
        entry("veteran_instinct", "Veteran Instinct", 1, 25, MasteryEffect::GlobalMultiplier(1.08)),
        entry("pension_fund", "Pension Fund", 2, 10, MasteryEffect::StartingCurrency(BigNum::from_u64(250))),
        entry("citations", "Citations", 3, 5, MasteryEffect::ScoreBonus(BigNum::from_u64(2))),
        entry("procurement", "Procurement Office", 2, 8, MasteryEffect::ItemDiscount(0.93)),
    ]
}

fn boosts() -> Vec<BoostDefinition> {
    vec![
        BoostDefinition {
            id: "backup_call".into(),
            name: "Call for Backup".into(),
            cost: BigNum::from_u64(4_000),
            target: BoostTarget::Click,
            multiplier: 2.5,
            duration_secs: 45,
        },
        BoostDefinition {
            id: "overtime_shift".into(),
            name: "Overtime Shift".into(),
            cost: BigNum::from_u64(8_000),
            target: BoostTarget::Passive,
            multiplier: 2.0,
            duration_secs: 120,
        },
    ]
}

fn config() -> EngineConfig {
    EngineConfig {
        prestige: PrestigeConfig {
            min_earned: BigNum::from_u64(2_000),
            min_score: BigNum::from_u64(300),
            gain_divisor: BigNum::from_u64(75_000),
            bonus_per_point: 0.025,
        },
        ranks: RankConfig {
            rank_bonus_per_tier: 0.08,
            top_rank_span: BigNum::from_u64(3_000),
        },
        ..EngineConfig::default()
    }
}

pub fn catalog() -> Catalog {
    Catalog {
        name: "Precinct".into(),
        currency_name: "budget".into(),
        score_name: "merit".into(),
        prestige_name: "Commendations".into(),
        upgrades: upgrades(),
        ranks: ranks(),
        mastery: mastery(),
        boosts: boosts(),
        config: config(),
    }
}
