//! Trait interfaces for the matching-pool engine.
//!
//! These traits define the contracts between the engine and its callers:
//! - [`ScoreCalculator`] — contributions to quadratic score (qf-match implements)
//! - [`PoolDistributor`] — round-wide matching-pool split (qf-match implements)
//! - [`RewardComposer`] — AI reward + match into total earnings (qf-match implements)
//!
//! All three are pure: no I/O, no interior state, same output for the same input.

use std::collections::BTreeMap;

use crate::error::AllocationError;
use crate::types::{
    AiReward, Amount, BackerStats, ContributionMap, MatchPoolOutput, QuadraticResult,
    RewardComposition, SubmissionId,
};

/// Quadratic score computation for one submission's contributions.
pub trait ScoreCalculator: Send + Sync {
    /// Score a single submission.
    ///
    /// Entries whose amount is zero, negative or non-finite are skipped: they
    /// add nothing to the score, the backer count, or the contribution sum.
    fn compute_score(&self, contributions: &ContributionMap) -> QuadraticResult;

    /// Score every submission of a round independently.
    ///
    /// Default implementation: [`compute_score`](Self::compute_score) per entry.
    fn compute_all_scores(
        &self,
        submissions: &BTreeMap<SubmissionId, ContributionMap>,
    ) -> BTreeMap<SubmissionId, QuadraticResult> {
        submissions
            .iter()
            .map(|(id, contributions)| (id.clone(), self.compute_score(contributions)))
            .collect()
    }
}

/// Split of a fixed matching pool across a round's submissions.
pub trait PoolDistributor: Send + Sync {
    /// Allocate `total_pool` across `results`.
    ///
    /// `round_submission_count` is the number of submissions entitled to a
    /// share when the pool falls back to an even split; it may exceed
    /// `results.len()`. Fails only when `total_pool` is negative or non-finite.
    fn distribute(
        &self,
        results: &BTreeMap<SubmissionId, QuadraticResult>,
        round_submission_count: u64,
        total_pool: Amount,
    ) -> Result<MatchPoolOutput, AllocationError>;
}

/// Composition of an AI-assessed reward with a submission's pool match.
pub trait RewardComposer: Send + Sync {
    /// Combine the pieces into one figure per submission.
    ///
    /// Missing pieces are treated as zero (and a missing AI reward as not
    /// pending). Never fails.
    fn compose(
        &self,
        ai_reward: Option<AiReward>,
        match_amount: Option<Amount>,
        backer_stats: Option<BackerStats>,
    ) -> RewardComposition;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tier;

    // ------------------------------------------------------------------
    // Mock: ScoreCalculator that only counts entries
    // ------------------------------------------------------------------

    struct CountingCalculator;

    impl ScoreCalculator for CountingCalculator {
        fn compute_score(&self, contributions: &ContributionMap) -> QuadraticResult {
            QuadraticResult {
                score: 0.0,
                backers: contributions.len() as u64,
                contribution: 0.0,
            }
        }
    }

    // ------------------------------------------------------------------
    // Mock: PoolDistributor that hands everything to the first submission
    // ------------------------------------------------------------------

    struct WinnerTakesAll;

    impl PoolDistributor for WinnerTakesAll {
        fn distribute(
            &self,
            results: &BTreeMap<SubmissionId, QuadraticResult>,
            _round_submission_count: u64,
            total_pool: Amount,
        ) -> Result<MatchPoolOutput, AllocationError> {
            if total_pool < 0.0 {
                return Err(AllocationError::NegativePool(total_pool));
            }
            let allocations = results
                .keys()
                .enumerate()
                .map(|(i, id)| (id.clone(), if i == 0 { total_pool } else { 0.0 }))
                .collect();
            Ok(MatchPoolOutput {
                allocations,
                total_score: 0.0,
                tier: Tier::ScoreProportional,
                even_share: 0.0,
                share_count: 0,
            })
        }
    }

    #[test]
    fn compute_all_scores_default_scores_each_submission() {
        let mut round = BTreeMap::new();
        round.insert(
            "s1".to_string(),
            [("a".to_string(), 1.0), ("b".to_string(), 2.0)]
                .into_iter()
                .collect::<ContributionMap>(),
        );
        round.insert("s2".to_string(), ContributionMap::new());

        let scores = CountingCalculator.compute_all_scores(&round);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores["s1"].backers, 2);
        assert_eq!(scores["s2"].backers, 0);
    }

    #[test]
    fn traits_are_object_safe() {
        let calc: Box<dyn ScoreCalculator> = Box::new(CountingCalculator);
        let dist: Box<dyn PoolDistributor> = Box::new(WinnerTakesAll);

        let results = calc.compute_all_scores(&BTreeMap::new());
        assert!(results.is_empty());

        let out = dist.distribute(&results, 0, 10.0).unwrap();
        assert!(out.allocations.is_empty());
        assert!(dist.distribute(&results, 0, -1.0).is_err());
    }
}
