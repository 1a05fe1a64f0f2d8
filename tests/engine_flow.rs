//! End-to-end play through the public API with a catalog loaded from JSON.

use clicker_progression::{
    Action, BigNum, Catalog, CatalogError, Engine, LoadSource, Outcome, Quantity, Rejection,
    Session, VariantChoice,
};

const MEADOW: &str = r#"{
    "name": "Meadow",
    "currency_name": "seeds",
    "score_name": "petals",
    "prestige_name": "pollen",
    "upgrades": [
        { "id": "trowel", "name": "Trowel", "tier": "starting", "base_cost": 10,
          "scaling": 2.0, "effect": { "type": "click_multiplier", "value": 2 } },
        { "id": "sprinkler", "name": "Sprinkler", "tier": "basic", "base_cost": "20",
          "scaling": 1.5, "effect": { "type": "passive_income", "value": 3 } }
    ],
    "ranks": [
        { "name": "Sprout", "required_score": 0, "divisions": 1 },
        { "name": "Bloom", "required_score": 1000, "divisions": 1 }
    ],
    "mastery": [
        { "id": "deep_roots", "name": "Deep Roots", "base_cost": 2, "scaling": 2.0,
          "max_level": 3, "effect": { "type": "global_multiplier", "value": 1.5 } }
    ],
    "config": {
        "prestige": { "min_earned": 100, "min_score": 1000, "gain_divisor": 25,
                      "bonus_per_point": 0.5 },
        "score": { "xp_per_level": 1000, "score_unlock_level": 1000 },
        "ranks": { "rank_bonus_per_tier": 0.0, "top_rank_span": 20 }
    }
}"#;

fn n(v: u64) -> BigNum {
    BigNum::from_u64(v)
}

fn meadow() -> Engine {
    Engine::new(Catalog::from_json(MEADOW).unwrap()).unwrap()
}

fn click(session: &mut Session, times: u32) {
    for _ in 0..times {
        let outcome = session.dispatch(&Action::Click);
        assert!(matches!(outcome, Outcome::Clicked { .. }));
    }
}

fn buy(session: &mut Session, id: &str) -> Outcome {
    session.dispatch(&Action::Purchase {
        id: id.into(),
        quantity: Quantity::One,
    })
}

#[test]
fn full_season() {
    let mut s = Session::new(meadow());
    assert_eq!(s.snapshot().derived.rank.name, "Sprout");
    assert_eq!(s.snapshot().derived.click_value, n(1));

    click(&mut s, 10);
    assert_eq!(
        buy(&mut s, "trowel"),
        Outcome::Purchased {
            id: "trowel".into(),
            quantity: n(1),
            cost: n(10)
        }
    );
    assert_eq!(s.snapshot().derived.click_value, n(2));

    click(&mut s, 10);
    assert!(!buy(&mut s, "sprinkler").is_rejected());
    assert_eq!(s.snapshot().currency, BigNum::ZERO);
    assert_eq!(s.snapshot().derived.passive_income, n(3));

    let advance = s.advance_ticks(30);
    assert_eq!(advance.seconds, 3);
    assert_eq!(advance.earned, n(9));
    assert_eq!(s.snapshot().run_earned, n(39));

    assert_eq!(
        s.dispatch(&Action::Prestige),
        Outcome::Rejected {
            reason: Rejection::NotEligible
        }
    );

    click(&mut s, 31);
    assert_eq!(s.snapshot().run_earned, n(101));
    assert!(s.engine().can_prestige(s.snapshot()));
    // floor(sqrt(101 / 25))
    assert_eq!(s.engine().prestige_gain(s.snapshot()), n(2));

    // Save mid-run and resume into an identical session.
    let json = s.save().unwrap();
    let resumed = Session::resume(meadow(), &json);
    assert_eq!(resumed.load_source(), LoadSource::Saved);
    assert_eq!(resumed.snapshot(), s.snapshot());

    assert_eq!(
        s.dispatch(&Action::Prestige),
        Outcome::Prestiged {
            gain: n(2),
            season: 1
        }
    );
    let snap = s.snapshot();
    assert_eq!(snap.currency, BigNum::ZERO);
    assert_eq!(snap.run_earned, BigNum::ZERO);
    assert_eq!(snap.level_of("trowel"), BigNum::ZERO);
    assert_eq!(snap.prestige.points, n(2));
    assert_eq!(snap.prestige.earned_all_runs, n(101));
    // 1 + 0.5 × 2 lifetime points
    assert_eq!(snap.derived.click_value, n(2));
    assert_eq!(snap.derived.passive_income, BigNum::ZERO);

    assert_eq!(
        s.dispatch(&Action::PurchaseMastery {
            id: "deep_roots".into()
        }),
        Outcome::MasteryPurchased {
            id: "deep_roots".into(),
            level: 1,
            cost: n(2)
        }
    );
    assert_eq!(s.snapshot().derived.click_value, n(3));
    assert_eq!(
        s.dispatch(&Action::PurchaseMastery {
            id: "deep_roots".into()
        }),
        Outcome::Rejected {
            reason: Rejection::CannotAfford
        }
    );
}

#[test]
fn actions_arrive_as_json() {
    let engine = meadow();
    let mut snap = engine.new_game();
    for _ in 0..40 {
        snap = engine.apply(&snap, &Action::Click).snapshot;
    }
    let action: Action =
        serde_json::from_str(r#"{"action":"purchase","id":"trowel","quantity":"max"}"#).unwrap();
    let step = engine.apply(&snap, &action);
    // 10 + 20 fits in 40, the next level costs 40 more.
    assert_eq!(
        step.outcome,
        Outcome::Purchased {
            id: "trowel".into(),
            quantity: n(2),
            cost: n(30)
        }
    );
    let reported = serde_json::to_value(&step.outcome).unwrap();
    assert_eq!(reported["outcome"], "purchased");
}

#[test]
fn invalid_catalogs_are_rejected() {
    let doubled = MEADOW.replace("\"sprinkler\"", "\"trowel\"");
    assert!(matches!(
        Catalog::from_json(&doubled),
        Err(CatalogError::DuplicateId(id)) if id == "trowel"
    ));

    let flat = MEADOW.replace("\"scaling\": 1.5", "\"scaling\": 0.5");
    assert!(matches!(
        Catalog::from_json(&flat),
        Err(CatalogError::InvalidScaling { .. })
    ));

    assert!(matches!(
        Catalog::from_json("{ not json"),
        Err(CatalogError::Json(_))
    ));
}

#[test]
fn built_in_variants_survive_a_json_trip() {
    for choice in VariantChoice::all() {
        let catalog = clicker_progression::create_catalog(choice);
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
    }
}

#[test]
fn save_from_one_variant_ignores_foreign_items() {
    let mut rift = Session::for_variant(VariantChoice::Rift).unwrap();
    click(&mut rift, 30);
    assert!(!buy(&mut rift, "dorans_ring").is_rejected());
    let json = rift.save().unwrap();

    let precinct = Session::resume(
        Engine::new(clicker_progression::create_catalog(&VariantChoice::Precinct)).unwrap(),
        &json,
    );
    assert_eq!(precinct.load_source(), LoadSource::Saved);
    assert_eq!(precinct.snapshot().currency, rift.snapshot().currency);
    assert_eq!(precinct.snapshot().level_of("dorans_ring"), BigNum::ZERO);
}
