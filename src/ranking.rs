// 🏆 Ranking - score, sort and assign competition ranks
//
// Ranks are recomputed from the freshly scored list on every call.
// Nothing here reads or writes persisted state.

use crate::profile::Profile;
use crate::scoring::{score, ScoreWeights};
use std::cmp::Ordering;

// ============================================================================
// RANKED PROFILE
// ============================================================================

/// A profile annotated with its derived score and 1-based rank
#[derive(Debug, Clone, PartialEq)]
pub struct RankedProfile {
    pub profile: Profile,
    pub score: f64,
    pub rank: usize,
}

// ============================================================================
// TIERS
// ============================================================================

/// Coarse leaderboard bucket, used for display markers only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    First,
    Podium,
    Notable,
}

impl Tier {
    /// Tier for a rank; ranks beyond 10 have none
    pub fn for_rank(rank: usize) -> Option<Tier> {
        match rank {
            1 => Some(Tier::First),
            2..=3 => Some(Tier::Podium),
            4..=10 => Some(Tier::Notable),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tier::First => "first",
            Tier::Podium => "podium",
            Tier::Notable => "notable",
        }
    }

    pub fn marker(&self) -> &str {
        match self {
            Tier::First => "[*]",
            Tier::Podium => "[+]",
            Tier::Notable => "[.]",
        }
    }
}

// ============================================================================
// RANKER
// ============================================================================

/// Score every profile, sort descending and assign competition ranks.
///
/// The sort is stable: equal scores keep their insertion order. Tied scores
/// share the rank of the first entry of the tie and the next distinct score
/// skips ahead, so [100, 100, 50] ranks as [1, 1, 3].
pub fn rank(profiles: Vec<Profile>, weights: &ScoreWeights) -> Vec<RankedProfile> {
    let mut ranked: Vec<RankedProfile> = profiles
        .into_iter()
        .map(|profile| {
            let score = score(&profile, weights);
            RankedProfile {
                profile,
                score,
                rank: 0,
            }
        })
        .collect();

    ranked.sort_by(by_score_desc);

    let mut previous: Option<(f64, usize)> = None;
    for (position, entry) in ranked.iter_mut().enumerate() {
        entry.rank = match previous {
            Some((prev_score, prev_rank)) if prev_score == entry.score => prev_rank,
            _ => position + 1,
        };
        previous = Some((entry.score, entry.rank));
    }

    ranked
}

/// Descending by score; -0.0 and 0.0 compare equal so they keep insertion order
fn by_score_desc(a: &RankedProfile, b: &RankedProfile) -> Ordering {
    b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Income-only profile so score = income * 0.5
    fn with_score(name: &str, score: u64) -> Profile {
        Profile::new(name, score * 2, 0, 0, 0).unwrap()
    }

    fn ranks(ranked: &[RankedProfile]) -> Vec<usize> {
        ranked.iter().map(|r| r.rank).collect()
    }

    fn names(ranked: &[RankedProfile]) -> Vec<&str> {
        ranked.iter().map(|r| r.profile.name.as_str()).collect()
    }

    #[test]
    fn test_sorted_descending() {
        let profiles = vec![with_score("low", 10), with_score("high", 300), with_score("mid", 50)];
        let ranked = rank(profiles, &ScoreWeights::default());

        assert_eq!(names(&ranked), vec!["high", "mid", "low"]);
        assert_eq!(ranks(&ranked), vec![1, 2, 3]);
        assert!((ranked[0].score - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_dense_min_ties() {
        let profiles = vec![with_score("a", 100), with_score("b", 100), with_score("c", 50)];
        let ranked = rank(profiles, &ScoreWeights::default());

        assert_eq!(ranks(&ranked), vec![1, 1, 3]);
    }

    #[test]
    fn test_tie_in_the_middle() {
        let profiles = vec![
            with_score("a", 90),
            with_score("b", 70),
            with_score("c", 70),
            with_score("d", 70),
            with_score("e", 10),
        ];
        let ranked = rank(profiles, &ScoreWeights::default());

        assert_eq!(ranks(&ranked), vec![1, 2, 2, 2, 5]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let profiles = vec![with_score("first", 5), with_score("second", 5), with_score("third", 5)];
        let ranked = rank(profiles, &ScoreWeights::default());

        assert_eq!(names(&ranked), vec!["first", "second", "third"]);
        assert_eq!(ranks(&ranked), vec![1, 1, 1]);
    }

    #[test]
    fn test_reranking_is_stable() {
        let profiles = vec![
            with_score("a", 3),
            with_score("b", 9),
            with_score("c", 3),
            with_score("d", 1),
        ];
        let weights = ScoreWeights::default();

        let first = rank(profiles, &weights);
        let reloaded: Vec<Profile> = first.iter().map(|r| r.profile.clone()).collect();
        let second = rank(reloaded, &weights);

        assert_eq!(first, second);
    }

    #[test]
    fn test_negative_scores_rank_last() {
        let profiles = vec![
            Profile::new("debtor", 0, 0, 1000, 0).unwrap(),
            with_score("zero", 0),
        ];
        let ranked = rank(profiles, &ScoreWeights::default());

        assert_eq!(names(&ranked), vec!["zero", "debtor"]);
        assert!(ranked[1].score < 0.0);
    }

    #[test]
    fn test_signed_zero_scores_tie() {
        // Negative weights turn an all-zero profile into -0.0
        let weights = ScoreWeights {
            income: -1.0,
            assets: -1.0,
            investments: -1.0,
            debts: 1.0,
        };
        let ranked = rank(vec![Profile::new("zero", 0, 0, 0, 0).unwrap()], &weights);
        assert!(ranked[0].score == 0.0 && ranked[0].score.is_sign_negative());

        let entry = |name: &str, score: f64| RankedProfile {
            profile: Profile::new(name, 0, 0, 0, 0).unwrap(),
            score,
            rank: 0,
        };
        assert_eq!(by_score_desc(&entry("a", -0.0), &entry("b", 0.0)), Ordering::Equal);
        assert_eq!(by_score_desc(&entry("a", 0.0), &entry("b", -0.0)), Ordering::Equal);
        assert_eq!(by_score_desc(&entry("a", 1.0), &entry("b", 0.0)), Ordering::Less);
    }

    #[test]
    fn test_empty_collection() {
        assert!(rank(Vec::new(), &ScoreWeights::default()).is_empty());
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::for_rank(1), Some(Tier::First));
        assert_eq!(Tier::for_rank(2), Some(Tier::Podium));
        assert_eq!(Tier::for_rank(3), Some(Tier::Podium));
        assert_eq!(Tier::for_rank(4), Some(Tier::Notable));
        assert_eq!(Tier::for_rank(10), Some(Tier::Notable));
        assert_eq!(Tier::for_rank(11), None);
        assert_eq!(Tier::for_rank(0), None);
    }
}
