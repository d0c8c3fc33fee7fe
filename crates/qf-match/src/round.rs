//! Round pipeline: score every submission, distribute the pool once, then
//! compose each submission's earnings.
//!
//! The pipeline is the caller-side control flow packaged for convenience;
//! it keeps no state and performs no I/O. Inputs are expected to be a
//! consistent snapshot already filtered for eligibility.

use std::collections::BTreeMap;

use qf_core::error::RoundError;
use qf_core::traits::{PoolDistributor, RewardComposer, ScoreCalculator};
use qf_core::types::{
    AiReward, Amount, BackerStats, ContributionMap, QuadraticResult, RewardComposition,
    SubmissionId, Tier,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CqfDistributor, EarningsComposer, QuadraticScorer};

/// Contributions toward one submission.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    /// Contributions that passed eligibility rules; these drive the score.
    #[serde(default)]
    pub eligible: ContributionMap,
    /// Every contribution, eligible or not, for display aggregates.
    /// Defaults to `eligible` when absent.
    #[serde(default)]
    pub all: Option<ContributionMap>,
}

/// One funding round as supplied by the contribution source and round config.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RoundInput {
    /// Fixed matching-pool budget for the round.
    pub total_pool: Amount,
    /// Submissions entitled to an even-split share. Defaults to the number
    /// of listed submissions.
    #[serde(default)]
    pub round_submission_count: Option<u64>,
    pub submissions: BTreeMap<SubmissionId, SubmissionInput>,
    /// AI-assessed rewards, keyed by submission.
    #[serde(default)]
    pub ai_rewards: BTreeMap<SubmissionId, AiReward>,
}

impl RoundInput {
    /// The count used for the even-split fallback.
    pub fn effective_submission_count(&self) -> u64 {
        self.round_submission_count
            .unwrap_or(self.submissions.len() as u64)
    }
}

/// Per-submission outcome of a round.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundEntry {
    pub result: QuadraticResult,
    pub reward: RewardComposition,
}

/// Outcome of a whole round.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundReport {
    /// Allocation rule that fired.
    pub tier: Tier,
    /// Denominator used by the distributor.
    pub total_score: f64,
    pub total_pool: Amount,
    pub entries: BTreeMap<SubmissionId, RoundEntry>,
}

impl RoundReport {
    /// Sum of quadratic matches over listed submissions.
    pub fn total_matched(&self) -> Amount {
        self.entries.values().map(|e| e.reward.quadratic_reward).sum()
    }

    /// Sum of total earnings over listed submissions.
    pub fn total_earnings(&self) -> Amount {
        self.entries.values().map(|e| e.reward.total_earnings).sum()
    }
}

/// Run a round with the production engine.
///
/// # Examples
///
/// ```
/// use qf_match::round::{run_round, RoundInput, SubmissionInput};
/// use qf_core::types::Tier;
///
/// let mut input = RoundInput { total_pool: 100.0, ..Default::default() };
/// input.submissions.insert(
///     "a".into(),
///     SubmissionInput {
///         eligible: [("x".to_string(), 4.0), ("y".to_string(), 9.0)].into_iter().collect(),
///         all: None,
///     },
/// );
/// input.submissions.insert("b".into(), SubmissionInput::default());
///
/// let report = run_round(&input).unwrap();
/// assert_eq!(report.tier, Tier::GapProportional);
/// assert_eq!(report.entries["a"].reward.quadratic_reward, 100.0);
/// assert_eq!(report.entries["b"].reward.quadratic_reward, 0.0);
/// ```
pub fn run_round(input: &RoundInput) -> Result<RoundReport, RoundError> {
    run_round_with(
        &QuadraticScorer::new(),
        &CqfDistributor::new(),
        &EarningsComposer::new(),
        input,
    )
}

/// Run a round with caller-chosen engine components.
pub fn run_round_with(
    scorer: &dyn ScoreCalculator,
    distributor: &dyn PoolDistributor,
    composer: &dyn RewardComposer,
    input: &RoundInput,
) -> Result<RoundReport, RoundError> {
    if let Some(id) = input
        .ai_rewards
        .keys()
        .find(|id| !input.submissions.contains_key(*id))
    {
        return Err(RoundError::UnknownSubmission(id.clone()));
    }

    let eligible: BTreeMap<SubmissionId, ContributionMap> = input
        .submissions
        .iter()
        .map(|(id, s)| (id.clone(), s.eligible.clone()))
        .collect();
    let results = scorer.compute_all_scores(&eligible);

    let matched = distributor.distribute(
        &results,
        input.effective_submission_count(),
        input.total_pool,
    )?;

    let entries: BTreeMap<SubmissionId, RoundEntry> = input
        .submissions
        .iter()
        .map(|(id, s)| {
            let all = s.all.as_ref().unwrap_or(&s.eligible);
            let stats = BackerStats::from_contributions(all, &s.eligible);
            let reward = composer.compose(
                input.ai_rewards.get(id).copied(),
                Some(matched.match_amount(id)),
                Some(stats),
            );
            let result = results.get(id).copied().unwrap_or(QuadraticResult::EMPTY);
            (id.clone(), RoundEntry { result, reward })
        })
        .collect();

    debug!(
        tier = %matched.tier,
        submissions = entries.len(),
        total_pool = input.total_pool,
        "round complete"
    );

    Ok(RoundReport {
        tier: matched.tier,
        total_score: matched.total_score,
        total_pool: input.total_pool,
        entries,
    })
}
