//! Balance simulator: a greedy player clicking, buying by payback time and
//! resetting seasons.
//! Run with: cargo test simulate_ -- --nocapture

use super::actions::{Action, Outcome, Quantity};
use super::format::format_short;
use super::logic::Engine;
use super::state::{DerivedStats, GameSnapshot};
use crate::big::BigNum;
use crate::variants::{create_catalog, VariantChoice};

const CLICKS_PER_SECOND: u32 = 5;

/// Seconds of income an upgrade takes to pay for itself.
fn payback_seconds(engine: &Engine, snap: &GameSnapshot, id: &str) -> Option<f64> {
    let cost = engine.unit_cost(snap, id)?;
    if cost > snap.currency {
        return None;
    }
    let mut next = snap.clone();
    next.upgrades.set(id, snap.level_of(id) + BigNum::ONE);
    let before = engine.derive(snap);
    let after = engine.derive(&next);

    let clicks = f64::from(CLICKS_PER_SECOND);
    let income = |d: &DerivedStats| {
        d.passive_income.to_f64() + d.click_value.to_f64() * clicks
    };
    let gain = income(&after) - income(&before);
    if gain > 0.0 {
        Some(cost.to_f64() / gain)
    } else {
        // Experience items: buy only when nothing else pays back.
        Some(cost.to_f64() / income(&before).max(1.0) * 100.0)
    }
}

fn best_purchase(engine: &Engine, snap: &GameSnapshot) -> Option<String> {
    engine
        .catalog()
        .upgrades
        .iter()
        .filter_map(|u| Some((payback_seconds(engine, snap, &u.id)?, u.id.clone())))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, id)| id)
}

/// Spend prestige points on the cheapest mastery level available.
fn spend_mastery(engine: &Engine, mut snap: GameSnapshot) -> GameSnapshot {
    loop {
        let cheapest = engine
            .catalog()
            .mastery
            .iter()
            .filter_map(|m| {
                let cost = engine.mastery_cost(&snap, &m.id)?;
                (snap.prestige.mastery.level(&m.id) < m.max_level && cost <= snap.prestige.points)
                    .then(|| (cost, m.id.clone()))
            })
            .min_by(|a, b| a.0.cmp(&b.0));
        let Some((_, id)) = cheapest else {
            return snap;
        };
        snap = engine.apply(&snap, &Action::PurchaseMastery { id }).snapshot;
    }
}

fn report(engine: &Engine, snap: &GameSnapshot, second: u32, purchases: u32) {
    let d = &snap.derived;
    eprintln!("┌─── {}m{:02}s ─────────────────────────", second / 60, second % 60);
    eprintln!(
        "│ {}: {}  click: {}  passive: {}/s  purchases: {}",
        engine.catalog().currency_name,
        format_short(snap.currency),
        format_short(d.click_value),
        format_short(d.passive_income),
        purchases
    );
    eprintln!(
        "│ level {}  {} {} ({} {})  season {}  {}: {}",
        d.level,
        d.rank.name,
        d.rank.division,
        format_short(snap.score),
        engine.catalog().score_name,
        snap.prestige.count,
        engine.catalog().prestige_name,
        format_short(snap.prestige.total_points)
    );
    let owned: Vec<String> = snap
        .upgrades
        .iter()
        .filter(|(_, level)| !level.is_zero())
        .map(|(id, level)| format!("{}:{}", id, level))
        .collect();
    eprintln!("│ owned: {}", owned.join("  "));
    eprintln!("└────────────────────────────────────");
}

struct Summary {
    snapshot: GameSnapshot,
    purchases: u32,
    seasons: u32,
}

fn simulate(choice: VariantChoice, total_seconds: u32) -> Summary {
    let engine = match Engine::new(create_catalog(&choice)) {
        Ok(e) => e,
        Err(e) => panic!("built-in catalog rejected: {e}"),
    };
    let mut snap = engine.new_game();
    let mut purchases = 0;
    let mut seasons = 0;
    let report_times = [60, 300, 600, 1200, 1800, 3600];

    eprintln!("\n========================================");
    eprintln!("  {} balance simulator, {} min", engine.catalog().name, total_seconds / 60);
    eprintln!("========================================");

    for second in 1..=total_seconds {
        for _ in 0..CLICKS_PER_SECOND {
            snap = engine.apply(&snap, &Action::Click).snapshot;
        }
        snap = engine.apply(&snap, &Action::Tick { seconds: 1 }).snapshot;

        for _ in 0..10 {
            let Some(id) = best_purchase(&engine, &snap) else {
                break;
            };
            let step = engine.apply(&snap, &Action::Purchase { id, quantity: Quantity::One });
            if step.outcome.is_rejected() {
                break;
            }
            snap = step.snapshot;
            purchases += 1;
        }

        // 累計ポイントが倍以上になるならシーズンをリセットする
        let gain = engine.prestige_gain(&snap);
        if engine.can_prestige(&snap) && !gain.is_zero() && gain >= snap.prestige.total_points {
            let step = engine.apply(&snap, &Action::Prestige);
            if let Outcome::Prestiged { .. } = step.outcome {
                seasons += 1;
                snap = spend_mastery(&engine, step.snapshot);
            }
        }

        if report_times.contains(&second) {
            report(&engine, &snap, second, purchases);
        }
    }

    Summary {
        snapshot: snap,
        purchases,
        seasons,
    }
}

#[test]
fn simulate_rift_30min() {
    let summary = simulate(VariantChoice::Rift, 1800);
    let snap = &summary.snapshot;
    assert_eq!(snap.total_clicks, u64::from(CLICKS_PER_SECOND) * 1800);
    assert!(summary.purchases > 20, "only {} purchases", summary.purchases);
    assert!(summary.seasons >= 1, "never reset a season");
    assert!(!snap.prestige.total_points.is_zero());
}

#[test]
fn simulate_precinct_30min() {
    let summary = simulate(VariantChoice::Precinct, 1800);
    assert!(summary.purchases > 20, "only {} purchases", summary.purchases);
    assert!(summary.seasons >= 1, "never retired");
}
