//! Core data model: contributions, quadratic results, pool allocations and
//! reward compositions.
//!
//! Every value here is constructed fresh per call from caller-supplied data.
//! Maps are ordered (`BTreeMap`) so that every sum runs in a fixed order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable contributor identity (e.g. a platform user id).
pub type ContributorId = String;

/// Opaque submission identifier.
pub type SubmissionId = String;

/// A non-negative amount in the round's single consistent unit.
pub type Amount = f64;

/// Pre-aggregated contributions toward one submission, keyed by contributor.
pub type ContributionMap = BTreeMap<ContributorId, Amount>;

/// Whether an amount may count toward a score, backer count or volume.
///
/// Only finite, strictly positive amounts count. Zero, negative, `NaN` and
/// infinite amounts are treated as if the entry were absent.
///
/// # Examples
///
/// ```
/// use qf_core::types::is_countable_amount;
/// assert!(is_countable_amount(0.5));
/// assert!(!is_countable_amount(0.0));
/// assert!(!is_countable_amount(-1.0));
/// assert!(!is_countable_amount(f64::NAN));
/// assert!(!is_countable_amount(f64::INFINITY));
/// ```
pub fn is_countable_amount(amount: Amount) -> bool {
    amount.is_finite() && amount > 0.0
}

/// Clamp an externally supplied figure to a finite, non-negative amount.
///
/// Used where bad input must not propagate but is not worth an error.
pub fn sanitize_amount(amount: Amount) -> Amount {
    if is_countable_amount(amount) { amount } else { 0.0 }
}

/// Add two non-negative amounts, saturating at `f64::MAX` instead of
/// overflowing to infinity.
///
/// ```
/// use qf_core::types::saturating_add;
/// assert_eq!(saturating_add(1.5, 2.0), 3.5);
/// assert_eq!(saturating_add(f64::MAX, f64::MAX), f64::MAX);
/// ```
pub fn saturating_add(a: Amount, b: Amount) -> Amount {
    (a + b).min(f64::MAX)
}

/// Per-submission quadratic funding result.
///
/// `score = (Σ √amount)²` over countable contributions; `contribution` is the
/// raw linear sum and `backers` the number of countable contributors.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuadraticResult {
    /// Quadratic score `(Σ √amount)²`.
    pub score: Amount,
    /// Contributors with a countable amount.
    pub backers: u64,
    /// Raw (non-quadratic) total raised.
    pub contribution: Amount,
}

impl QuadraticResult {
    /// The empty result: no backers, zero score and contribution.
    pub const EMPTY: Self = Self {
        score: 0.0,
        backers: 0,
        contribution: 0.0,
    };

    /// Funding gap `max(score − contribution, 0)`: the subsidy owed by
    /// capital-constrained quadratic funding.
    ///
    /// # Examples
    ///
    /// ```
    /// use qf_core::types::QuadraticResult;
    /// let r = QuadraticResult { score: 25.0, backers: 2, contribution: 13.0 };
    /// assert_eq!(r.gap(), 12.0);
    /// ```
    pub fn gap(&self) -> Amount {
        (sanitize_amount(self.score) - sanitize_amount(self.contribution)).max(0.0)
    }

    /// True when no contributor counted toward this result.
    pub fn is_empty(&self) -> bool {
        self.backers == 0
    }
}

/// Which allocation rule produced a [`MatchPoolOutput`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    /// Capital-constrained QF: pool split proportionally to each gap.
    GapProportional,
    /// Every gap was ~0: pool split proportionally to quadratic score.
    ScoreProportional,
    /// No submission had any support: pool split evenly.
    EvenSplit,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GapProportional => "gap-proportional",
            Self::ScoreProportional => "score-proportional",
            Self::EvenSplit => "even-split",
        };
        f.write_str(name)
    }
}

/// Result of distributing a matching pool across one round.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchPoolOutput {
    /// Match amount per submission present in the input.
    pub allocations: BTreeMap<SubmissionId, Amount>,
    /// The denominator actually used: gap sum, score sum, or 0 for the even split.
    pub total_score: f64,
    /// The rule that fired.
    pub tier: Tier,
    /// Per-submission share under [`Tier::EvenSplit`]; 0 otherwise.
    pub even_share: Amount,
    /// Number of shares the pool was divided into under [`Tier::EvenSplit`]; 0 otherwise.
    pub share_count: u64,
}

impl MatchPoolOutput {
    /// Match amount for a submission.
    ///
    /// Under the even split, submissions of the round that had no entry in
    /// the input are still entitled to one share. Under the proportional
    /// tiers, an unknown submission receives nothing.
    pub fn match_amount(&self, id: &str) -> Amount {
        match self.allocations.get(id) {
            Some(amount) => *amount,
            None if self.tier == Tier::EvenSplit => self.even_share,
            None => 0.0,
        }
    }

    /// Total paid out across the whole round, including even-split shares
    /// owed to submissions absent from `allocations`.
    pub fn total_allocated(&self) -> Amount {
        match self.tier {
            Tier::EvenSplit => self.even_share * self.share_count as f64,
            _ => self.allocations.values().sum(),
        }
    }

    /// Whether the allocation conserves `total_pool` within tolerance.
    pub fn is_conserved(&self, total_pool: Amount) -> bool {
        crate::constants::approx_eq(self.total_allocated(), total_pool)
    }
}

/// Externally computed AI-assessed reward for one submission.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AiReward {
    /// Current amount. Provisional while `pending` is set.
    pub amount: Amount,
    /// The AI assessment has not finished yet.
    #[serde(default)]
    pub pending: bool,
}

/// Display aggregates about who backed a submission.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BackerStats {
    /// Distinct backers, eligible or not.
    pub backers_count: u64,
    /// Backers whose contributions counted toward the score.
    pub eligible_backers_count: u64,
    /// Raw amount raised, eligible or not.
    pub volume: Amount,
}

impl BackerStats {
    /// Derive backer aggregates from the full and the eligible contribution maps.
    ///
    /// Only countable amounts are considered. `all` is expected to be a
    /// superset of `eligible`; if it is not, the counts are reported as-is
    /// and the caller's aggregator owns the discrepancy.
    pub fn from_contributions(all: &ContributionMap, eligible: &ContributionMap) -> Self {
        fn countable(m: &ContributionMap) -> impl Iterator<Item = Amount> + '_ {
            m.values().copied().filter(|a| is_countable_amount(*a))
        }

        Self {
            backers_count: countable(all).count() as u64,
            eligible_backers_count: countable(eligible).count() as u64,
            volume: countable(all).fold(0.0, saturating_add),
        }
    }
}

/// Final per-submission earnings: AI reward plus quadratic match.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RewardComposition {
    pub ai_reward: AiReward,
    /// The submission's match amount from the pool distribution.
    pub quadratic_reward: Amount,
    /// `ai_reward.amount + quadratic_reward`, whether or not the AI reward is pending.
    pub total_earnings: Amount,
    pub backers_count: u64,
    pub eligible_backers_count: u64,
    pub volume: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, f64)]) -> ContributionMap {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn gap_clamps_at_zero() {
        let r = QuadraticResult {
            score: 4.0,
            backers: 1,
            contribution: 4.0,
        };
        assert_eq!(r.gap(), 0.0);
        let r = QuadraticResult {
            score: 3.0,
            backers: 1,
            contribution: 4.0,
        };
        assert_eq!(r.gap(), 0.0);
    }

    #[test]
    fn gap_ignores_non_finite_fields() {
        let r = QuadraticResult {
            score: f64::NAN,
            backers: 2,
            contribution: 1.0,
        };
        assert_eq!(r.gap(), 0.0);
        let r = QuadraticResult {
            score: 9.0,
            backers: 2,
            contribution: f64::INFINITY,
        };
        assert_eq!(r.gap(), 9.0);
    }

    #[test]
    fn empty_result() {
        assert!(QuadraticResult::EMPTY.is_empty());
        assert_eq!(QuadraticResult::default(), QuadraticResult::EMPTY);
    }

    #[test]
    fn tier_display() {
        assert_eq!(Tier::GapProportional.to_string(), "gap-proportional");
        assert_eq!(Tier::ScoreProportional.to_string(), "score-proportional");
        assert_eq!(Tier::EvenSplit.to_string(), "even-split");
    }

    #[test]
    fn match_amount_unknown_submission_under_proportional_tier() {
        let out = MatchPoolOutput {
            allocations: [("a".to_string(), 100.0)].into_iter().collect(),
            total_score: 5.0,
            tier: Tier::GapProportional,
            even_share: 0.0,
            share_count: 0,
        };
        assert_eq!(out.match_amount("a"), 100.0);
        assert_eq!(out.match_amount("zzz"), 0.0);
        assert!(out.is_conserved(100.0));
    }

    #[test]
    fn match_amount_unknown_submission_under_even_split() {
        let out = MatchPoolOutput {
            allocations: [("a".to_string(), 25.0)].into_iter().collect(),
            total_score: 0.0,
            tier: Tier::EvenSplit,
            even_share: 25.0,
            share_count: 4,
        };
        assert_eq!(out.match_amount("not-listed"), 25.0);
        assert_eq!(out.total_allocated(), 100.0);
        assert!(out.is_conserved(100.0));
    }

    #[test]
    fn backer_stats_counts_only_countable_amounts() {
        let all = map(&[("a", 5.0), ("b", 0.0), ("c", -2.0), ("d", 3.0), ("e", f64::NAN)]);
        let eligible = map(&[("a", 5.0)]);
        let stats = BackerStats::from_contributions(&all, &eligible);
        assert_eq!(stats.backers_count, 2);
        assert_eq!(stats.eligible_backers_count, 1);
        assert_eq!(stats.volume, 8.0);
    }

    #[test]
    fn backer_stats_does_not_correct_inconsistent_maps() {
        let all = map(&[("a", 1.0)]);
        let eligible = map(&[("a", 1.0), ("b", 1.0)]);
        let stats = BackerStats::from_contributions(&all, &eligible);
        assert_eq!(stats.backers_count, 1);
        assert_eq!(stats.eligible_backers_count, 2);
    }

    #[test]
    fn serde_uses_camel_case() {
        let comp = RewardComposition {
            ai_reward: AiReward {
                amount: 1.0,
                pending: true,
            },
            quadratic_reward: 2.0,
            total_earnings: 3.0,
            backers_count: 4,
            eligible_backers_count: 3,
            volume: 10.0,
        };
        let json = serde_json::to_string(&comp).unwrap();
        assert!(json.contains("\"aiReward\""));
        assert!(json.contains("\"totalEarnings\""));
        assert!(json.contains("\"eligibleBackersCount\""));
        let back: RewardComposition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, comp);
    }

    #[test]
    fn ai_reward_pending_defaults_to_false() {
        let r: AiReward = serde_json::from_str(r#"{"amount": 12.5}"#).unwrap();
        assert_eq!(
            r,
            AiReward {
                amount: 12.5,
                pending: false
            }
        );
    }

    #[test]
    fn tier_serializes_camel_case() {
        let json = serde_json::to_string(&Tier::ScoreProportional).unwrap();
        assert_eq!(json, "\"scoreProportional\"");
    }

    // --- proptest ---

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn gap_never_negative(score in any::<f64>(), contribution in any::<f64>()) {
            let r = QuadraticResult { score, backers: 1, contribution };
            let gap = r.gap();
            prop_assert!(gap >= 0.0);
            prop_assert!(!gap.is_nan());
        }

        #[test]
        fn sanitized_amount_is_finite_non_negative(x in any::<f64>()) {
            let s = sanitize_amount(x);
            prop_assert!(s.is_finite());
            prop_assert!(s >= 0.0);
        }

        #[test]
        fn saturating_add_stays_finite(
            a in 0.0f64..=f64::MAX,
            b in 0.0f64..=f64::MAX,
        ) {
            let s = saturating_add(a, b);
            prop_assert!(s.is_finite());
            prop_assert!(s >= a.max(b));
        }
    }
}
