//! Save document: `{ "version": u32, "game": { ... } }`.
//!
//! ## バージョニング
//!
//! - `SAVE_VERSION`: 現在の形式。フィールドを追加したら上げる。
//! - `MIN_COMPATIBLE_VERSION`: 読み込める最古の形式。フィールドの意味変更や
//!   削除といった破壊的変更のときだけ上げる。
//!
//! Loading never fails. Every field is read on its own: a missing field takes
//! its initial value, a malformed one is logged and takes its initial value.
//! Upgrade ids the catalog no longer has are dropped. A document that isn't
//! JSON, or is older than `MIN_COMPATIBLE_VERSION`, yields a fresh game.
//!
//! Flat camelCase documents written by the first browser build (`gold`,
//! `leaguePoints`, ...) are still accepted.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::catalog::Catalog;
use super::logic::Engine;
use super::state::{ActiveBoost, DerivedStats, GameSnapshot, LevelMap};
use crate::big::BigNum;

pub const SAVE_VERSION: u32 = 1;
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to serialize save: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Read a field, falling back to its default when the stored value is
/// malformed.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        log::warn!("save field reset to default: {}", e);
        T::default()
    }))
}

// ── Document shape ──────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct GameSave {
    #[serde(deserialize_with = "lenient")]
    currency: BigNum,
    #[serde(deserialize_with = "lenient")]
    run_earned: BigNum,
    #[serde(deserialize_with = "lenient")]
    experience: BigNum,
    #[serde(deserialize_with = "lenient")]
    score: BigNum,
    #[serde(deserialize_with = "lenient")]
    total_clicks: u64,
    #[serde(deserialize_with = "lenient")]
    elapsed_secs: u64,
    /// id → level. Values are read one by one.
    #[serde(deserialize_with = "lenient")]
    upgrades: BTreeMap<String, Value>,
    #[serde(deserialize_with = "lenient")]
    boosts: Vec<BoostSave>,
    #[serde(deserialize_with = "lenient")]
    prestige: PrestigeSave,
    /// Written for external readers; recomputed on load.
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    derived: Option<DerivedStats>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct BoostSave {
    id: String,
    seconds_left: u32,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct PrestigeSave {
    #[serde(deserialize_with = "lenient")]
    points: BigNum,
    #[serde(deserialize_with = "lenient")]
    total_points: BigNum,
    #[serde(deserialize_with = "lenient")]
    count: u32,
    #[serde(deserialize_with = "lenient")]
    mastery: BTreeMap<String, Value>,
    #[serde(deserialize_with = "lenient")]
    earned_all_runs: BigNum,
}

/// The flat document of the first browser build.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct LegacySave {
    #[serde(deserialize_with = "lenient")]
    gold: BigNum,
    #[serde(deserialize_with = "lenient")]
    experience: BigNum,
    #[serde(deserialize_with = "lenient")]
    total_gold_earned: BigNum,
    #[serde(deserialize_with = "lenient")]
    league_points: BigNum,
    #[serde(deserialize_with = "lenient")]
    upgrades: BTreeMap<String, Value>,
    #[serde(deserialize_with = "lenient")]
    mastery_points: BigNum,
    #[serde(deserialize_with = "lenient")]
    total_mastery_points: BigNum,
    #[serde(deserialize_with = "lenient")]
    season_count: u32,
    #[serde(deserialize_with = "lenient")]
    mastery_upgrades: BTreeMap<String, Value>,
}

// ── Extract ─────────────────────────────────────────────────────

fn level_values<T: Copy + Default + fmt::Display>(levels: &LevelMap<T>) -> BTreeMap<String, Value> {
    levels
        .iter()
        .map(|(id, level)| (id.to_string(), Value::String(level.to_string())))
        .collect()
}

fn extract_save(snapshot: &GameSnapshot) -> SaveData {
    let prestige = &snapshot.prestige;
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            currency: snapshot.currency,
            run_earned: snapshot.run_earned,
            experience: snapshot.experience,
            score: snapshot.score,
            total_clicks: snapshot.total_clicks,
            elapsed_secs: snapshot.elapsed_secs,
            upgrades: level_values(&snapshot.upgrades),
            boosts: snapshot
                .boosts
                .iter()
                .map(|b| BoostSave {
                    id: b.id.clone(),
                    seconds_left: b.seconds_left,
                })
                .collect(),
            prestige: PrestigeSave {
                points: prestige.points,
                total_points: prestige.total_points,
                count: prestige.count,
                mastery: level_values(&prestige.mastery),
                earned_all_runs: prestige.earned_all_runs,
            },
            derived: Some(snapshot.derived.clone()),
        },
    }
}

/// Serialize `snapshot` to the save document.
pub fn to_json(snapshot: &GameSnapshot) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&extract_save(snapshot))?)
}

// ── Apply ───────────────────────────────────────────────────────

/// Where a loaded snapshot came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    Saved,
    Legacy,
    /// Nothing usable was found; this is a new game.
    Fresh,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Loaded {
    pub snapshot: GameSnapshot,
    pub source: LoadSource,
}

/// Copy stored levels into `levels`, skipping ids it doesn't know.
fn restore_levels<T: Copy + Default>(
    levels: &mut LevelMap<T>,
    stored: &BTreeMap<String, Value>,
    read: impl Fn(&Value) -> Option<T>,
) {
    for (id, raw) in stored {
        if !levels.contains(id) {
            log::warn!("save has unknown id `{}`, dropping it", id);
            continue;
        }
        match read(raw) {
            Some(level) => {
                levels.set(id, level);
            }
            None => log::warn!("save has malformed level for `{}`: {}", id, raw),
        }
    }
}

fn read_level(raw: &Value) -> Option<BigNum> {
    serde_json::from_value::<BigNum>(raw.clone()).ok().map(|l| l.floor())
}

fn read_mastery_level(raw: &Value) -> Option<u32> {
    let level = read_level(raw)?;
    Some(level.to_u64_saturating().min(u64::from(u32::MAX)) as u32)
}

/// Cap mastery levels at each definition's `max_level`.
fn clamp_mastery(catalog: &Catalog, snapshot: &mut GameSnapshot) {
    for def in &catalog.mastery {
        let level = snapshot.prestige.mastery.level(&def.id);
        if level > def.max_level {
            log::warn!("mastery `{}` level {} above max {}, capping", def.id, level, def.max_level);
            snapshot.prestige.mastery.set(&def.id, def.max_level);
        }
    }
}

fn apply_save(engine: &Engine, save: &GameSave) -> GameSnapshot {
    let catalog = engine.catalog();
    let mut snapshot = GameSnapshot::blank(catalog);
    snapshot.currency = save.currency;
    snapshot.run_earned = save.run_earned;
    snapshot.experience = save.experience;
    snapshot.score = save.score;
    snapshot.total_clicks = save.total_clicks;
    snapshot.elapsed_secs = save.elapsed_secs;
    restore_levels(&mut snapshot.upgrades, &save.upgrades, read_level);

    for stored in &save.boosts {
        let Some(def) = catalog.boost(&stored.id) else {
            log::warn!("save has unknown boost `{}`, dropping it", stored.id);
            continue;
        };
        if stored.seconds_left == 0 || snapshot.is_boost_active(&def.id) {
            continue;
        }
        snapshot.boosts.push(ActiveBoost {
            id: def.id.clone(),
            target: def.target,
            multiplier: def.multiplier,
            seconds_left: stored.seconds_left.min(def.duration_secs),
        });
    }

    let prestige = &mut snapshot.prestige;
    prestige.points = save.prestige.points;
    prestige.total_points = save.prestige.total_points.max(save.prestige.points);
    prestige.count = save.prestige.count;
    prestige.earned_all_runs = save.prestige.earned_all_runs;
    restore_levels(&mut prestige.mastery, &save.prestige.mastery, read_mastery_level);
    clamp_mastery(catalog, &mut snapshot);

    engine.refresh(snapshot)
}

fn apply_legacy(engine: &Engine, save: &LegacySave) -> GameSnapshot {
    let catalog = engine.catalog();
    let mut snapshot = GameSnapshot::blank(catalog);
    snapshot.currency = save.gold;
    snapshot.run_earned = save.total_gold_earned;
    snapshot.experience = save.experience;
    snapshot.score = save.league_points.floor();
    restore_levels(&mut snapshot.upgrades, &save.upgrades, read_level);

    let prestige = &mut snapshot.prestige;
    prestige.points = save.mastery_points;
    prestige.total_points = save.total_mastery_points.max(save.mastery_points);
    prestige.count = save.season_count;
    restore_levels(&mut prestige.mastery, &save.mastery_upgrades, read_mastery_level);
    clamp_mastery(catalog, &mut snapshot);

    engine.refresh(snapshot)
}

fn fresh(engine: &Engine) -> Loaded {
    Loaded {
        snapshot: engine.new_game(),
        source: LoadSource::Fresh,
    }
}

/// Read a save document. Never fails; see the module docs for fallbacks.
pub fn from_json(engine: &Engine, json: &str) -> Loaded {
    let value: Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("save is not valid JSON, starting fresh: {}", e);
            return fresh(engine);
        }
    };
    let Some(object) = value.as_object() else {
        log::warn!("save is not a JSON object, starting fresh");
        return fresh(engine);
    };

    if !object.contains_key("version") && !object.contains_key("game") {
        return match serde_json::from_value::<LegacySave>(value) {
            Ok(legacy) => {
                log::info!("migrating legacy save");
                Loaded {
                    snapshot: apply_legacy(engine, &legacy),
                    source: LoadSource::Legacy,
                }
            }
            Err(e) => {
                log::warn!("unreadable legacy save, starting fresh: {}", e);
                fresh(engine)
            }
        };
    }

    let version = object.get("version").and_then(Value::as_u64).unwrap_or(0);
    if version < u64::from(MIN_COMPATIBLE_VERSION) {
        log::warn!(
            "save version too old (saved={}, min_compatible={}), starting fresh",
            version,
            MIN_COMPATIBLE_VERSION
        );
        return fresh(engine);
    }
    if version > u64::from(SAVE_VERSION) {
        log::warn!(
            "save is from a newer version (saved={}, current={}), reading known fields",
            version,
            SAVE_VERSION
        );
    }

    let game = object.get("game").cloned().unwrap_or(Value::Null);
    match serde_json::from_value::<GameSave>(game) {
        Ok(save) => Loaded {
            snapshot: apply_save(engine, &save),
            source: LoadSource::Saved,
        },
        Err(e) => {
            log::warn!("unreadable save body, starting fresh: {}", e);
            fresh(engine)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::actions::{Action, Quantity};
    use crate::variants::{create_catalog, VariantChoice};

    fn n(v: u64) -> BigNum {
        BigNum::from_u64(v)
    }

    fn engine() -> Engine {
        Engine::new(create_catalog(&VariantChoice::Rift)).unwrap()
    }

    fn played(engine: &Engine) -> GameSnapshot {
        let mut s = engine.new_game();
        s.currency = n(1_000_000);
        s.experience = n(777);
        s.score = n(1_234);
        s.run_earned = n(2_000_000);
        s.total_clicks = 99;
        s.upgrades.set("dorans_blade", n(12));
        s.upgrades.set("pickaxe", n(4));
        s.upgrades.set("amplifying_tome", n(2));
        s.prestige.points = n(3);
        s.prestige.total_points = n(8);
        s.prestige.count = 2;
        s.prestige.mastery.set("rift_mastery", 3);
        s.prestige.mastery.set("shop_discount", 1);
        let s = engine.refresh(s);
        engine
            .apply(&s, &Action::ActivateBoost { id: "baron_buff".into() })
            .snapshot
    }

    #[test]
    fn round_trip_restores_state_and_derived_stats() {
        let e = engine();
        let original = played(&e);
        let json = to_json(&original).unwrap();
        let loaded = from_json(&e, &json);
        assert_eq!(loaded.source, LoadSource::Saved);
        assert_eq!(loaded.snapshot, original);
        assert_eq!(loaded.snapshot.derived.click_value, original.derived.click_value);
        assert_eq!(loaded.snapshot.derived.passive_income, original.derived.passive_income);
    }

    #[test]
    fn huge_values_round_trip_exactly() {
        let e = engine();
        let mut s = e.new_game();
        s.currency = "1.2345678901234e9999".parse().unwrap();
        s.run_earned = BigNum::from_f64(0.1 + 0.2);
        s.upgrades.set("long_sword", "3e500".parse().unwrap());
        let s = e.refresh(s);
        let back = from_json(&e, &to_json(&s).unwrap()).snapshot;
        assert_eq!(back.currency, s.currency);
        assert_eq!(back.run_earned, s.run_earned);
        assert_eq!(back.level_of("long_sword"), s.level_of("long_sword"));
    }

    #[test]
    fn numbers_are_written_as_strings() {
        let e = engine();
        let json = to_json(&played(&e)).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["version"], SAVE_VERSION);
        assert_eq!(v["game"]["currency"], "995000");
        assert_eq!(v["game"]["upgrades"]["dorans_blade"], "12");
        assert!(v["game"]["derived"]["click_value"].is_string());
    }

    #[test]
    fn missing_fields_default() {
        let e = engine();
        let loaded = from_json(&e, r#"{"version":1,"game":{"currency":"500"}}"#);
        assert_eq!(loaded.source, LoadSource::Saved);
        assert_eq!(loaded.snapshot.currency, n(500));
        assert_eq!(loaded.snapshot.score, BigNum::ZERO);
        assert_eq!(loaded.snapshot.prestige.count, 0);
        assert_eq!(loaded.snapshot.derived.click_value, n(1));
    }

    #[test]
    fn malformed_fields_default_individually() {
        let e = engine();
        let json = r#"{"version":1,"game":{
            "currency": "not a number",
            "experience": "250",
            "score": -4,
            "total_clicks": "many",
            "upgrades": {"dorans_blade": "3", "long_sword": "x", "retired_item": "9"},
            "prestige": {"points": "2", "count": "two"}
        }}"#;
        let s = from_json(&e, json).snapshot;
        assert_eq!(s.currency, BigNum::ZERO);
        assert_eq!(s.experience, n(250));
        assert_eq!(s.score, BigNum::ZERO);
        assert_eq!(s.total_clicks, 0);
        assert_eq!(s.level_of("dorans_blade"), n(3));
        assert_eq!(s.level_of("long_sword"), BigNum::ZERO);
        assert!(!s.upgrades.contains("retired_item"));
        assert_eq!(s.prestige.points, n(2));
        assert_eq!(s.prestige.count, 0);
    }

    #[test]
    fn repeated_decimal_points_default_the_field() {
        let e = engine();
        let json = r#"{"version":1,"game":{
            "currency": "0.0.0",
            "score": "1.2.3",
            "experience": "40",
            "upgrades": {"dorans_blade": "00..", "long_sword": "2"}
        }}"#;
        let loaded = from_json(&e, json);
        assert_eq!(loaded.source, LoadSource::Saved);
        let s = loaded.snapshot;
        assert_eq!(s.currency, BigNum::ZERO);
        assert_eq!(s.score, BigNum::ZERO);
        assert_eq!(s.experience, n(40));
        assert_eq!(s.level_of("dorans_blade"), BigNum::ZERO);
        assert_eq!(s.level_of("long_sword"), n(2));
    }

    #[test]
    fn derived_values_in_document_are_ignored() {
        let e = engine();
        let json = r#"{"version":1,"game":{
            "upgrades": {"dorans_ring": "3"},
            "derived": {"click_value": "999999", "passive_income": "123"}
        }}"#;
        let s = from_json(&e, json).snapshot;
        assert_eq!(s.derived.click_value, n(1));
        assert_eq!(s.derived.passive_income, n(3));
    }

    #[test]
    fn garbage_and_old_versions_start_fresh() {
        let e = engine();
        for json in ["", "{", "[1,2]", "42", r#"{"version":0,"game":{"currency":"5"}}"#] {
            let loaded = from_json(&e, json);
            assert_eq!(loaded.source, LoadSource::Fresh, "{json}");
            assert_eq!(loaded.snapshot, e.new_game());
        }
    }

    #[test]
    fn newer_version_reads_known_fields() {
        let e = engine();
        let loaded = from_json(&e, r#"{"version":99,"game":{"currency":"7","shiny":true}}"#);
        assert_eq!(loaded.source, LoadSource::Saved);
        assert_eq!(loaded.snapshot.currency, n(7));
    }

    #[test]
    fn boosts_restore_and_unknown_ones_drop() {
        let e = engine();
        let json = r#"{"version":1,"game":{
            "boosts": [{"id":"baron_buff","seconds_left":12},{"id":"old_buff","seconds_left":5}]
        }}"#;
        let s = from_json(&e, json).snapshot;
        assert_eq!(s.boosts.len(), 1);
        assert_eq!(s.boosts[0].id, "baron_buff");
        assert_eq!(s.boosts[0].seconds_left, 12);
    }

    #[test]
    fn mastery_levels_are_capped() {
        let e = engine();
        let json = r#"{"version":1,"game":{"prestige":{"mastery":{"rift_mastery":"500"}}}}"#;
        let s = from_json(&e, json).snapshot;
        let max = e.catalog().mastery_upgrade("rift_mastery").unwrap().max_level;
        assert_eq!(s.prestige.mastery.level("rift_mastery"), max);
    }

    #[test]
    fn legacy_document_is_migrated() {
        let e = engine();
        let json = r#"{
            "gold": "1500",
            "experience": "640",
            "level": 7,
            "clickValue": "3",
            "goldPerSecond": "2",
            "totalGoldEarned": "9000",
            "rank": "Bronze",
            "division": 2,
            "leaguePoints": 520,
            "upgrades": {"dorans_blade": "2", "dorans_ring": "2"}
        }"#;
        let loaded = from_json(&e, json);
        assert_eq!(loaded.source, LoadSource::Legacy);
        let s = loaded.snapshot;
        assert_eq!(s.currency, n(1_500));
        assert_eq!(s.run_earned, n(9_000));
        assert_eq!(s.score, n(520));
        assert_eq!(s.derived.level, 7);
        assert_eq!(s.derived.rank.name, "Bronze");
        assert_eq!(s.derived.rank.division, 2);
        assert_eq!(s.derived.passive_income, n(2));
    }

    #[test]
    fn loaded_snapshot_keeps_playing() {
        let e = engine();
        let s = from_json(&e, &to_json(&played(&e)).unwrap()).snapshot;
        let step = e.apply(
            &s,
            &Action::Purchase {
                id: "long_sword".into(),
                quantity: Quantity::One,
            },
        );
        assert!(!step.outcome.is_rejected());
    }
}
