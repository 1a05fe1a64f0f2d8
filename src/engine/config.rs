//! Tuning values for the progression engine.
//!
//! Every threshold and rate that shapes the economy lives here rather than
//! in the formulas. A catalog document may carry its own `config` section;
//! missing keys fall back to the defaults below (the Rift values).

use serde::{Deserialize, Serialize};

use crate::big::BigNum;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub prestige: PrestigeConfig,
    pub score: ScoreConfig,
    pub ranks: RankConfig,
    pub session: SessionConfig,
}

/// Season reset eligibility and reward.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrestigeConfig {
    /// Currency earned this run that unlocks a reset.
    pub min_earned: BigNum,
    /// Score that unlocks a reset regardless of currency.
    pub min_score: BigNum,
    /// `gain = floor(sqrt(run_earned / gain_divisor))`.
    pub gain_divisor: BigNum,
    /// Income multiplier per prestige point ever earned.
    pub bonus_per_point: f64,
}

impl Default for PrestigeConfig {
    fn default() -> Self {
        Self {
            min_earned: BigNum::from_u64(1_000),
            min_score: BigNum::from_u64(100),
            gain_divisor: BigNum::from_u64(50_000),
            bonus_per_point: 0.02,
        }
    }
}

/// Experience, level and score (LP) accrual per click.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub xp_per_click: BigNum,
    pub xp_per_level: BigNum,
    /// Clicks start awarding score from this level on.
    pub score_unlock_level: u64,
    pub score_per_click: BigNum,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            xp_per_click: BigNum::ONE,
            xp_per_level: BigNum::from_u64(100),
            score_unlock_level: 5,
            score_per_click: BigNum::ONE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// Income bonus per rank above the first (`1 + per_tier × index`).
    pub rank_bonus_per_tier: f64,
    /// Score span of the highest rank, used to size its divisions.
    pub top_rank_span: BigNum,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            rank_bonus_per_tier: 0.1,
            top_rank_span: BigNum::from_u64(400),
        }
    }
}

/// Clock and autosave cadence for `Session`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ticks_per_sec: u32,
    /// Longest frame gap honoured; larger gaps (background tab) are clamped.
    pub max_frame_ms: f64,
    pub autosave_interval_secs: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ticks_per_sec: 10,
            max_frame_ms: 500.0,
            autosave_interval_secs: 5,
        }
    }
}

impl EngineConfig {
    /// Describe the first invalid value, if any.
    pub(crate) fn problem(&self) -> Option<String> {
        if self.prestige.gain_divisor.is_zero() {
            return Some("prestige.gain_divisor must be positive".into());
        }
        if !self.prestige.bonus_per_point.is_finite() || self.prestige.bonus_per_point < 0.0 {
            return Some("prestige.bonus_per_point must be a non-negative number".into());
        }
        if self.score.xp_per_level.is_zero() {
            return Some("score.xp_per_level must be positive".into());
        }
        if !self.ranks.rank_bonus_per_tier.is_finite() || self.ranks.rank_bonus_per_tier < 0.0 {
            return Some("ranks.rank_bonus_per_tier must be a non-negative number".into());
        }
        if self.ranks.top_rank_span.is_zero() {
            return Some("ranks.top_rank_span must be positive".into());
        }
        if self.session.ticks_per_sec == 0 {
            return Some("session.ticks_per_sec must be positive".into());
        }
        if self.session.max_frame_ms.is_nan() || self.session.max_frame_ms <= 0.0 {
            return Some("session.max_frame_ms must be positive".into());
        }
        None
    }
}
