//! Rift: a League-themed clicker. Last-hit minions for gold, climb from Iron
//! to Challenger, and start a new season for Mastery points.

use crate::big::BigNum;
use crate::engine::catalog::{
    BoostDefinition, BoostTarget, Catalog, MasteryDefinition, MasteryEffect, RankDefinition,
    Tier, UpgradeDefinition, UpgradeEffect,
};
use crate::engine::config::EngineConfig;

/// Cost growth shared by every shop item.
const ITEM_SCALING: f64 = 1.15;

fn item(
    id: &str,
    name: &str,
    description: &str,
    tier: Tier,
    base_cost: u64,
    effect: UpgradeEffect,
) -> UpgradeDefinition {
    UpgradeDefinition {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        tier,
        base_cost: BigNum::from_u64(base_cost),
        scaling: ITEM_SCALING,
        effect,
    }
}

fn click(v: f64) -> UpgradeEffect {
    UpgradeEffect::ClickMultiplier(BigNum::from_f64(v))
}

fn passive(v: u64) -> UpgradeEffect {
    UpgradeEffect::PassiveIncome(BigNum::from_u64(v))
}

fn items() -> Vec<UpgradeDefinition> {
    use Tier::*;
    vec![
        item("dorans_blade", "Doran's Blade", "Increases gold per last-hit", Starting, 15, click(1.5)),
        item("dorans_ring", "Doran's Ring", "Provides passive gold generation", Starting, 25, passive(1)),
        item("long_sword", "Long Sword", "Significantly increases last-hit damage", Basic, 100, click(2.0)),
        item(
            "amplifying_tome",
            "Amplifying Tome",
            "Boosts experience gain",
            Basic,
            150,
            UpgradeEffect::ExperienceBonus(BigNum::from_u64(2)),
        ),
        item("rejuvenation_bead", "Rejuvenation Bead", "Steady passive income", Basic, 200, passive(5)),
        item("bf_sword", "B.F. Sword", "Massive damage increase", Epic, 500, click(3.0)),
        item("pickaxe", "Pickaxe", "Enhanced farming efficiency", Epic, 750, passive(15)),
        item("infinity_edge", "Infinity Edge", "Critical last-hit multiplier", Legendary, 2_000, click(5.0)),
        item(
            "blade_of_ruined_king",
            "Blade of the Ruined King",
            "Sustain and continuous income",
            Legendary,
            3_000,
            passive(50),
        ),
        item(
            "kraken_slayer",
            "Kraken Slayer",
            "Every third attack deals massive bonus gold",
            Mythic,
            10_000,
            click(10.0),
        ),
        item(
            "riftmaker",
            "Riftmaker",
            "Tears through the rift for massive passive income",
            Mythic,
            15_000,
            passive(200),
        ),
    ]
}

fn ranks() -> Vec<RankDefinition> {
    [
        ("Iron", 0, 4),
        ("Bronze", 400, 4),
        ("Silver", 800, 4),
        ("Gold", 1_200, 4),
        ("Platinum", 1_600, 4),
        ("Diamond", 2_000, 4),
        ("Master", 2_400, 1),
        ("Grandmaster", 2_700, 1),
        ("Challenger", 3_000, 1),
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
    let def = |id: &str, name: &str, description: &str, cost: u64, scaling: f64, max_level: u32, effect| {
        MasteryDefinition {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            base_cost: BigNum::from_u64(cost),
            scaling,
            max_level,
            effect,
        }
    };
    vec![
        def(
            "rift_mastery",
            "Rift Mastery",
            "+10% gold from every source per level",
            1,
            1.5,
            20,
            MasteryEffect::GlobalMultiplier(1.1),
        ),
        def(
            "starting_gold",
            "Starting Gold",
            "Begin each season with 100 more gold per level",
            2,
            1.5,
            10,
            MasteryEffect::StartingCurrency(BigNum::from_u64(100)),
        ),
        def(
            "climbers_focus",
            "Climber's Focus",
            "+1 LP per ranked last-hit per level",
            3,
            2.0,
            5,
            MasteryEffect::ScoreBonus(BigNum::ONE),
        ),
        def(
            "shop_discount",
            "Shop Discount",
            "Items cost 5% less per level",
            2,
            1.6,
            10,
            MasteryEffect::ItemDiscount(0.95),
        ),
    ]
}

fn boosts() -> Vec<BoostDefinition> {
    vec![
        BoostDefinition {
            id: "baron_buff".into(),
            name: "Hand of Baron".into(),
            cost: BigNum::from_u64(5_000),
            target: BoostTarget::Passive,
            multiplier: 2.0,
            duration_secs: 60,
        },
        BoostDefinition {
            id: "elixir_of_wrath".into(),
            name: "Elixir of Wrath".into(),
            cost: BigNum::from_u64(2_500),
            target: BoostTarget::Click,
            multiplier: 3.0,
            duration_secs: 30,
        },
    ]
}

pub fn catalog() -> Catalog {
    Catalog {
        name: "Rift".into(),
        currency_name: "gold".into(),
        score_name: "LP".into(),
        prestige_name: "Mastery Points".into(),
        upgrades: items(),
        ranks: ranks(),
        mastery: mastery(),
        boosts: boosts(),
        config: EngineConfig::default(),
    }
}
