//! Matching-pool distributor implementing the [`PoolDistributor`] trait.
//!
//! Capital-constrained quadratic funding with two fallbacks, tried in order:
//!
//! 1. [`Tier::GapProportional`]: `match[i] = gap[i] / Σ gap * pool`.
//! 2. [`Tier::ScoreProportional`]: `match[i] = score[i] / Σ score * pool`,
//!    used when every gap is ~0 (all single-backer submissions).
//! 3. [`Tier::EvenSplit`]: `pool / round_submission_count` each, used when
//!    nothing has any score.
//!
//! A tier is skipped when its denominator is at or below [`SCORE_EPSILON`].
//! The computation is two-pass: every submission's gap and score are
//! collected before any denominator is known.

use std::collections::BTreeMap;

use qf_core::constants::SCORE_EPSILON;
use qf_core::error::AllocationError;
use qf_core::traits::PoolDistributor;
use qf_core::types::{
    sanitize_amount, saturating_add, Amount, MatchPoolOutput, QuadraticResult, SubmissionId,
    Tier,
};
use tracing::debug;

/// The production capital-constrained QF distributor.
#[derive(Debug, Clone, Copy, Default)]
pub struct CqfDistributor;

impl CqfDistributor {
    /// Create a new CqfDistributor.
    pub fn new() -> Self {
        Self
    }
}

/// Pick the allocation rule for a round from its two candidate denominators.
///
/// # Examples
///
/// ```
/// use qf_core::types::Tier;
/// use qf_match::distributor::select_tier;
/// assert_eq!(select_tier(5.0, 13.0), Tier::GapProportional);
/// assert_eq!(select_tier(0.0, 400.0), Tier::ScoreProportional);
/// assert_eq!(select_tier(0.0, 0.0), Tier::EvenSplit);
/// ```
pub fn select_tier(total_gap: f64, total_score: f64) -> Tier {
    if total_gap > SCORE_EPSILON {
        Tier::GapProportional
    } else if total_score > SCORE_EPSILON {
        Tier::ScoreProportional
    } else {
        Tier::EvenSplit
    }
}

/// Reject pools that cannot be paid out as money.
fn validate_pool(total_pool: Amount) -> Result<(), AllocationError> {
    if !total_pool.is_finite() {
        return Err(AllocationError::NonFinitePool(total_pool));
    }
    if total_pool < 0.0 {
        return Err(AllocationError::NegativePool(total_pool));
    }
    Ok(())
}

/// Per-submission weights gathered in the first pass.
struct Weights<'a> {
    id: &'a SubmissionId,
    gap: f64,
    score: f64,
}

/// `weight(w) / Σ weight * total_pool` for every submission.
///
/// Weights are scaled by the largest one before summing, so the divisor is
/// at most `weights.len()` and stays finite for any finite weights.
fn proportional(
    weights: &[Weights<'_>],
    total_pool: Amount,
    weight: impl Fn(&Weights<'_>) -> f64,
) -> BTreeMap<SubmissionId, Amount> {
    let largest = weights.iter().map(&weight).fold(0.0, f64::max);
    if largest <= 0.0 {
        return weights.iter().map(|w| (w.id.clone(), 0.0)).collect();
    }
    let scaled_total: f64 = weights.iter().map(|w| weight(w) / largest).sum();
    weights
        .iter()
        .map(|w| (w.id.clone(), weight(w) / largest / scaled_total * total_pool))
        .collect()
}

impl PoolDistributor for CqfDistributor {
    fn distribute(
        &self,
        results: &BTreeMap<SubmissionId, QuadraticResult>,
        round_submission_count: u64,
        total_pool: Amount,
    ) -> Result<MatchPoolOutput, AllocationError> {
        validate_pool(total_pool)?;

        // Pass 1: gaps and scores, with bad externally supplied figures zeroed.
        let weights: Vec<Weights<'_>> = results
            .iter()
            .map(|(id, r)| Weights {
                id,
                gap: r.gap(),
                score: sanitize_amount(r.score),
            })
            .collect();

        let total_gap = weights.iter().map(|w| w.gap).fold(0.0, saturating_add);
        let total_score = weights.iter().map(|w| w.score).fold(0.0, saturating_add);
        let tier = select_tier(total_gap, total_score);

        // Pass 2: normalize against the chosen denominator.
        let output = match tier {
            Tier::GapProportional => MatchPoolOutput {
                allocations: proportional(&weights, total_pool, |w| w.gap),
                total_score: total_gap,
                tier,
                even_share: 0.0,
                share_count: 0,
            },
            Tier::ScoreProportional => MatchPoolOutput {
                allocations: proportional(&weights, total_pool, |w| w.score),
                total_score,
                tier,
                even_share: 0.0,
                share_count: 0,
            },
            Tier::EvenSplit => {
                // An advisory count below the number of results would
                // over-allocate; divide by whichever is larger.
                let share_count = if round_submission_count == 0 {
                    0
                } else {
                    round_submission_count.max(weights.len() as u64)
                };
                let even_share = if share_count == 0 {
                    0.0
                } else {
                    total_pool / share_count as f64
                };
                MatchPoolOutput {
                    allocations: weights
                        .iter()
                        .map(|w| (w.id.clone(), even_share))
                        .collect(),
                    total_score: 0.0,
                    tier,
                    even_share,
                    share_count,
                }
            }
        };

        debug!(
            %tier,
            denominator = output.total_score,
            total_pool,
            submissions = results.len(),
            round_submission_count,
            "distributed matching pool"
        );

        Ok(output)
    }
}
