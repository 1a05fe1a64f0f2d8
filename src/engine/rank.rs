//! Rank ladder: score → (rank, division), and distance to the next step.

use super::catalog::RankDefinition;
use super::config::{RankConfig, ScoreConfig};
use super::state::RankInfo;
use crate::big::BigNum;

/// What the next step up the ladder costs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankProgress {
    /// Score still required.
    pub needed: BigNum,
    pub next_rank: usize,
    pub next_division: u32,
    /// True when the next step crosses into a new rank rather than a new
    /// division of the current one.
    pub is_rank_up: bool,
}

/// Score span covered by one division of `ranks[index]`.
///
/// Width is measured from this rank's own threshold to the next one. The top
/// rank has no successor threshold; `config.top_rank_span` stands in for its
/// width.
pub fn lp_per_division(ranks: &[RankDefinition], config: &RankConfig, index: usize) -> BigNum {
    let Some(rank) = ranks.get(index) else {
        return config.top_rank_span;
    };
    let span = match ranks.get(index + 1) {
        Some(next) => next.required_score.saturating_sub(rank.required_score),
        None => config.top_rank_span,
    };
    span / BigNum::from(rank.divisions.max(1))
}

/// Index of the highest rank whose threshold is at or below `score`.
fn rank_index(ranks: &[RankDefinition], score: BigNum) -> Option<usize> {
    ranks.iter().rposition(|r| r.required_score <= score)
}

/// 1-based division of `score` inside `ranks[index]`.
fn division_in(ranks: &[RankDefinition], config: &RankConfig, index: usize, score: BigNum) -> u32 {
    let rank = &ranks[index];
    if rank.divisions <= 1 {
        return 1;
    }
    let into_rank = score.saturating_sub(rank.required_score);
    let step = (into_rank / lp_per_division(ranks, config, index)).floor();
    let capped = step.to_u64_saturating().min(u64::from(rank.divisions - 1));
    capped as u32 + 1
}

/// Resolve `score` to a rank and division.
///
/// Scores under the lowest threshold sit at the first rank, division 1.
pub fn resolve(ranks: &[RankDefinition], config: &RankConfig, score: BigNum) -> RankInfo {
    let Some(first) = ranks.first() else {
        return RankInfo {
            index: 0,
            name: String::new(),
            division: 1,
            divisions: 1,
        };
    };
    match rank_index(ranks, score) {
        Some(index) => RankInfo {
            index,
            name: ranks[index].name.clone(),
            division: division_in(ranks, config, index, score),
            divisions: ranks[index].divisions,
        },
        None => RankInfo {
            index: 0,
            name: first.name.clone(),
            division: 1,
            divisions: first.divisions,
        },
    }
}

fn ceil(value: BigNum) -> BigNum {
    let floored = value.floor();
    if floored == value {
        floored
    } else {
        floored + BigNum::ONE
    }
}

/// Score needed to reach the next division (or the next rank from the last
/// division). `None` once the top of the ladder is reached.
pub fn lp_needed_for_next(
    ranks: &[RankDefinition],
    config: &RankConfig,
    score: BigNum,
) -> Option<RankProgress> {
    let first = ranks.first()?;
    let Some(index) = rank_index(ranks, score) else {
        return Some(RankProgress {
            needed: first.required_score.saturating_sub(score),
            next_rank: 0,
            next_division: 1,
            is_rank_up: true,
        });
    };

    let rank = &ranks[index];
    let division = division_in(ranks, config, index, score);
    if division < rank.divisions {
        let boundary =
            rank.required_score + lp_per_division(ranks, config, index) * BigNum::from(division);
        return Some(RankProgress {
            needed: ceil(boundary.saturating_sub(score)).max(BigNum::ONE),
            next_rank: index,
            next_division: division + 1,
            is_rank_up: false,
        });
    }

    let next = ranks.get(index + 1)?;
    Some(RankProgress {
        needed: next.required_score.saturating_sub(score),
        next_rank: index + 1,
        next_division: 1,
        is_rank_up: true,
    })
}

/// Player level: `floor(xp / xp_per_level) + 1`.
pub fn level_from_experience(experience: BigNum, config: &ScoreConfig) -> u64 {
    (experience / config.xp_per_level)
        .floor()
        .to_u64_saturating()
        .saturating_add(1)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn ladder() -> Vec<RankDefinition> {
        [(0, 4), (400, 4), (800, 4), (1200, 4), (1600, 1), (1700, 3)]
            .iter()
            .enumerate()
            .map(|(i, &(req, div))| RankDefinition {
                name: format!("R{i}"),
                required_score: BigNum::from_u64(req),
                divisions: div,
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_rank_is_monotonic(a in 0u64..5_000, b in 0u64..5_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let ranks = ladder();
            let cfg = RankConfig::default();
            let r_lo = resolve(&ranks, &cfg, BigNum::from_u64(lo));
            let r_hi = resolve(&ranks, &cfg, BigNum::from_u64(hi));
            prop_assert!((r_lo.index, r_lo.division) <= (r_hi.index, r_hi.division));
        }

        #[test]
        fn prop_division_within_bounds(score in 0u64..10_000) {
            let ranks = ladder();
            let info = resolve(&ranks, &RankConfig::default(), BigNum::from_u64(score));
            prop_assert!(info.division >= 1 && info.division <= info.divisions);
        }

        #[test]
        fn prop_needed_reaches_the_next_step(score in 0u64..1_700) {
            let ranks = ladder();
            let cfg = RankConfig::default();
            let before = resolve(&ranks, &cfg, BigNum::from_u64(score));
            if let Some(p) = lp_needed_for_next(&ranks, &cfg, BigNum::from_u64(score)) {
                let after = resolve(&ranks, &cfg, BigNum::from_u64(score) + p.needed);
                prop_assert_eq!((after.index, after.division), (p.next_rank, p.next_division));
                prop_assert!((after.index, after.division) > (before.index, before.division));
            }
        }
    }
}
