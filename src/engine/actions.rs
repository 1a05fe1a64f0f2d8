//! Actions a caller can apply to a snapshot, and what came of them.

use serde::{Deserialize, Serialize};

use super::state::GameSnapshot;
use crate::big::BigNum;

/// How many levels a purchase asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    One,
    /// Exactly `n` levels. Zero is rejected as an invalid quantity.
    Count(u64),
    /// As many as the current currency affords.
    Max,
}

// ── Actions ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Click,
    /// Advance the clock by whole seconds of passive income.
    Tick { seconds: u32 },
    Purchase { id: String, quantity: Quantity },
    ActivateBoost { id: String },
    PurchaseMastery { id: String },
    Prestige,
}

// ── Outcomes ────────────────────────────────────────────────────

/// Why an action changed nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    UnknownId(String),
    CannotAfford,
    InvalidQuantity,
    MaxLevel,
    BoostAlreadyActive,
    NotEligible,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Clicked {
        earned: BigNum,
        experience: BigNum,
        score: BigNum,
    },
    Ticked {
        earned: BigNum,
        /// Boosts that ran out during this tick.
        expired: Vec<String>,
    },
    Purchased {
        id: String,
        quantity: BigNum,
        cost: BigNum,
    },
    BoostActivated {
        id: String,
        seconds: u32,
    },
    MasteryPurchased {
        id: String,
        level: u32,
        cost: BigNum,
    },
    Prestiged {
        gain: BigNum,
        season: u32,
    },
    Rejected { reason: Rejection },
}

impl Outcome {
    pub(crate) fn rejected(reason: Rejection) -> Self {
        Outcome::Rejected { reason }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected { .. })
    }
}

/// Result of one reducer call: the next snapshot and what happened.
///
/// On rejection `snapshot` equals the input.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub snapshot: GameSnapshot,
    pub outcome: Outcome,
}
