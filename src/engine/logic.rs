//! The reducer: `Engine::apply(&snapshot, action)` → next snapshot.
//!
//! Pure functions over immutable snapshots. Guard failures (unknown id,
//! cannot afford, not eligible...) hand back the input snapshot untouched
//! with an `Outcome::Rejected`; they are never errors.

use super::actions::{Action, Outcome, Quantity, Rejection, Step};
use super::catalog::{Catalog, CatalogError, UpgradeDefinition};
use super::cost::Pricing;
use super::rank::{self, RankProgress};
use super::state::{ActiveBoost, DerivedStats, GameSnapshot};
use super::{prestige, stats};
use crate::big::BigNum;

/// A validated catalog plus the operations that read it.
#[derive(Clone, Debug)]
pub struct Engine {
    catalog: Catalog,
}

impl Engine {
    pub fn new(catalog: Catalog) -> Result<Self, CatalogError> {
        catalog.validate()?;
        Ok(Self { catalog })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Snapshot for a brand-new player.
    pub fn new_game(&self) -> GameSnapshot {
        self.refresh(GameSnapshot::blank(&self.catalog))
    }

    // ── Derived values ──────────────────────────────────────────

    /// Recompute every derived field from the rest of the snapshot.
    pub fn derive(&self, snapshot: &GameSnapshot) -> DerivedStats {
        let config = &self.catalog.config;
        let rank = rank::resolve(&self.catalog.ranks, &config.ranks, snapshot.score);
        let inputs = stats::StatInputs {
            catalog: &self.catalog,
            upgrades: &snapshot.upgrades,
            prestige: &snapshot.prestige,
            boosts: &snapshot.boosts,
            rank_index: rank.index,
        };
        DerivedStats {
            click_value: stats::click_stat(&inputs).compute(),
            passive_income: stats::passive_stat(&inputs).compute(),
            experience_multiplier: stats::experience_multiplier(&self.catalog, &snapshot.upgrades),
            level: rank::level_from_experience(snapshot.experience, &config.score),
            rank,
        }
    }

    pub fn refresh(&self, mut snapshot: GameSnapshot) -> GameSnapshot {
        snapshot.derived = self.derive(&snapshot);
        snapshot
    }

    pub fn lp_needed_for_next(&self, snapshot: &GameSnapshot) -> Option<RankProgress> {
        let config = &self.catalog.config.ranks;
        rank::lp_needed_for_next(&self.catalog.ranks, config, snapshot.score)
    }

    // ── Costs ───────────────────────────────────────────────────

    /// Pricing of `def` with the player's mastery discount applied.
    fn pricing(&self, def: &UpgradeDefinition, snapshot: &GameSnapshot) -> Pricing {
        let discount = stats::mastery_discount(&self.catalog, &snapshot.prestige.mastery);
        Pricing::for_upgrade(def).discounted(discount)
    }

    /// Cost of the next level of upgrade `id`, or `None` for unknown ids.
    pub fn unit_cost(&self, snapshot: &GameSnapshot, id: &str) -> Option<BigNum> {
        let def = self.catalog.upgrade(id)?;
        Some(self.pricing(def, snapshot).unit_cost(snapshot.level_of(id)))
    }

    pub fn bulk_cost(&self, snapshot: &GameSnapshot, id: &str, quantity: BigNum) -> Option<BigNum> {
        let def = self.catalog.upgrade(id)?;
        Some(self.pricing(def, snapshot).bulk_cost(snapshot.level_of(id), quantity))
    }

    /// Most levels of `id` the current currency pays for.
    pub fn max_affordable(&self, snapshot: &GameSnapshot, id: &str) -> Option<BigNum> {
        let def = self.catalog.upgrade(id)?;
        Some(self.pricing(def, snapshot).max_affordable(snapshot.level_of(id), snapshot.currency))
    }

    /// Levels a `quantity` request resolves to, before affordability.
    fn resolve_quantity(
        &self,
        snapshot: &GameSnapshot,
        def: &UpgradeDefinition,
        quantity: Quantity,
    ) -> BigNum {
        match quantity {
            Quantity::One => BigNum::ONE,
            Quantity::Count(n) => BigNum::from_u64(n),
            Quantity::Max => self
                .pricing(def, snapshot)
                .max_affordable(snapshot.level_of(&def.id), snapshot.currency),
        }
    }

    pub fn can_afford(&self, snapshot: &GameSnapshot, id: &str, quantity: Quantity) -> bool {
        let Some(def) = self.catalog.upgrade(id) else {
            return false;
        };
        let n = self.resolve_quantity(snapshot, def, quantity);
        !n.is_zero()
            && self.pricing(def, snapshot).bulk_cost(snapshot.level_of(id), n) <= snapshot.currency
    }

    // ── Prestige ────────────────────────────────────────────────

    pub fn can_prestige(&self, snapshot: &GameSnapshot) -> bool {
        prestige::can_prestige(snapshot, &self.catalog.config.prestige)
    }

    /// Points a reset would award right now.
    pub fn prestige_gain(&self, snapshot: &GameSnapshot) -> BigNum {
        prestige::prestige_gain(snapshot.run_earned, &self.catalog.config.prestige)
    }

    pub fn mastery_cost(&self, snapshot: &GameSnapshot, id: &str) -> Option<BigNum> {
        let def = self.catalog.mastery_upgrade(id)?;
        Some(prestige::mastery_cost(def, snapshot.prestige.mastery.level(id)))
    }

    // ── Reducer ─────────────────────────────────────────────────

    /// Apply `action` to `snapshot`, returning the next snapshot.
    pub fn apply(&self, snapshot: &GameSnapshot, action: &Action) -> Step {
        let result = match action {
            Action::Click => Ok(self.click(snapshot)),
            Action::Tick { seconds } => Ok(self.tick(snapshot, *seconds)),
            Action::Purchase { id, quantity } => self.purchase(snapshot, id, *quantity),
            Action::ActivateBoost { id } => self.activate_boost(snapshot, id),
            Action::PurchaseMastery { id } => self.purchase_mastery(snapshot, id),
            Action::Prestige => self.prestige(snapshot),
        };
        match result {
            Ok((next, outcome)) => Step {
                snapshot: self.refresh(next),
                outcome,
            },
            Err(reason) => {
                log::debug!("{:?} rejected: {:?}", action, reason);
                Step {
                    snapshot: snapshot.clone(),
                    outcome: Outcome::rejected(reason),
                }
            }
        }
    }

    fn click(&self, snapshot: &GameSnapshot) -> (GameSnapshot, Outcome) {
        let config = &self.catalog.config.score;
        let derived = self.derive(snapshot);
        let mut next = snapshot.clone();

        let earned = derived.click_value;
        let experience = config.xp_per_click * derived.experience_multiplier;
        // Score unlocks on the level held before this click.
        let score = if derived.level >= config.score_unlock_level {
            config.score_per_click + stats::score_bonus(&self.catalog, &snapshot.prestige.mastery)
        } else {
            BigNum::ZERO
        };

        next.currency += earned;
        next.run_earned += earned;
        next.experience += experience;
        next.score += score;
        next.total_clicks = next.total_clicks.saturating_add(1);
        (
            next,
            Outcome::Clicked {
                earned,
                experience,
                score,
            },
        )
    }

    /// Passive income for `seconds`, split wherever a boost runs out so each
    /// second is paid at the multiplier active during it.
    fn tick(&self, snapshot: &GameSnapshot, seconds: u32) -> (GameSnapshot, Outcome) {
        let mut next = snapshot.clone();
        let mut earned = BigNum::ZERO;
        let mut expired = Vec::new();
        let mut remaining = seconds;

        while remaining > 0 {
            let segment = next
                .boosts
                .iter()
                .map(|b| b.seconds_left)
                .min()
                .map_or(remaining, |left| left.clamp(1, remaining));
            let income = self.derive(&next).passive_income;
            earned += income * BigNum::from(segment);

            for boost in &mut next.boosts {
                boost.seconds_left = boost.seconds_left.saturating_sub(segment);
            }
            next.boosts.retain(|b| {
                if b.seconds_left == 0 {
                    expired.push(b.id.clone());
                    false
                } else {
                    true
                }
            });
            remaining -= segment;
        }

        next.currency += earned;
        next.run_earned += earned;
        next.elapsed_secs = next.elapsed_secs.saturating_add(u64::from(seconds));
        if !expired.is_empty() {
            log::debug!("boosts expired: {:?}", expired);
        }
        (next, Outcome::Ticked { earned, expired })
    }

    fn purchase(
        &self,
        snapshot: &GameSnapshot,
        id: &str,
        quantity: Quantity,
    ) -> Result<(GameSnapshot, Outcome), Rejection> {
        let def = self
            .catalog
            .upgrade(id)
            .ok_or_else(|| Rejection::UnknownId(id.to_string()))?;
        if quantity == Quantity::Count(0) {
            return Err(Rejection::InvalidQuantity);
        }
        let n = self.resolve_quantity(snapshot, def, quantity);
        if n.is_zero() {
            return Err(Rejection::CannotAfford);
        }
        let level = snapshot.level_of(id);
        let cost = self.pricing(def, snapshot).bulk_cost(level, n);
        let currency = snapshot
            .currency
            .checked_sub(cost)
            .ok_or(Rejection::CannotAfford)?;

        let mut next = snapshot.clone();
        next.currency = currency;
        next.upgrades.set(id, level + n);
        log::debug!("bought {} × {} for {}", n, id, cost);
        Ok((
            next,
            Outcome::Purchased {
                id: id.to_string(),
                quantity: n,
                cost,
            },
        ))
    }

    fn activate_boost(
        &self,
        snapshot: &GameSnapshot,
        id: &str,
    ) -> Result<(GameSnapshot, Outcome), Rejection> {
        let def = self
            .catalog
            .boost(id)
            .ok_or_else(|| Rejection::UnknownId(id.to_string()))?;
        if snapshot.is_boost_active(id) {
            return Err(Rejection::BoostAlreadyActive);
        }
        let currency = snapshot
            .currency
            .checked_sub(def.cost)
            .ok_or(Rejection::CannotAfford)?;

        let mut next = snapshot.clone();
        next.currency = currency;
        next.boosts.push(ActiveBoost {
            id: def.id.clone(),
            target: def.target,
            multiplier: def.multiplier,
            seconds_left: def.duration_secs,
        });
        Ok((
            next,
            Outcome::BoostActivated {
                id: def.id.clone(),
                seconds: def.duration_secs,
            },
        ))
    }

    fn purchase_mastery(
        &self,
        snapshot: &GameSnapshot,
        id: &str,
    ) -> Result<(GameSnapshot, Outcome), Rejection> {
        let def = self
            .catalog
            .mastery_upgrade(id)
            .ok_or_else(|| Rejection::UnknownId(id.to_string()))?;
        if prestige::is_mastery_maxed(def, &snapshot.prestige) {
            return Err(Rejection::MaxLevel);
        }
        let level = snapshot.prestige.mastery.level(id);
        let cost = prestige::mastery_cost(def, level);
        let points = snapshot
            .prestige
            .points
            .checked_sub(cost)
            .ok_or(Rejection::CannotAfford)?;

        let mut next = snapshot.clone();
        next.prestige.points = points;
        next.prestige.mastery.set(id, level + 1);
        log::debug!("mastery {} → level {}", id, level + 1);
        Ok((
            next,
            Outcome::MasteryPurchased {
                id: id.to_string(),
                level: level + 1,
                cost,
            },
        ))
    }

    fn prestige(&self, snapshot: &GameSnapshot) -> Result<(GameSnapshot, Outcome), Rejection> {
        if !self.can_prestige(snapshot) {
            return Err(Rejection::NotEligible);
        }
        let gain = self.prestige_gain(snapshot);
        let next = prestige::reset(&self.catalog, snapshot, gain);
        let season = next.prestige.count;
        log::info!(
            "season reset #{}: +{} {} (run earned {})",
            season,
            gain,
            self.catalog.prestige_name,
            snapshot.run_earned
        );
        Ok((next, Outcome::Prestiged { gain, season }))
    }
}
