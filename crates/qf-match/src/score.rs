//! Quadratic score calculator implementing the [`ScoreCalculator`] trait.
//!
//! `score = (Σ √amount)²` over countable contributions. Bad entries are
//! skipped one by one so a single corrupt record cannot poison a submission.
//! Sums saturate at `f64::MAX`, so valid but huge amounts never yield ∞.

use qf_core::traits::ScoreCalculator;
use qf_core::types::{is_countable_amount, saturating_add, ContributionMap, QuadraticResult};
use tracing::trace;

/// The production quadratic score calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticScorer;

impl QuadraticScorer {
    /// Create a new QuadraticScorer.
    pub fn new() -> Self {
        Self
    }
}

impl ScoreCalculator for QuadraticScorer {
    fn compute_score(&self, contributions: &ContributionMap) -> QuadraticResult {
        let mut sum_sqrt = 0.0_f64;
        let mut contribution = 0.0_f64;
        let mut backers = 0_u64;

        for (contributor, &amount) in contributions {
            if !is_countable_amount(amount) {
                trace!(%contributor, amount, "skipping uncountable contribution");
                continue;
            }
            // Square roots of finite amounts stay below 1.4e154, so this
            // sum cannot overflow for any realistic number of backers.
            sum_sqrt += amount.sqrt();
            contribution = saturating_add(contribution, amount);
            backers += 1;
        }

        // Rounding can land (Σ√a)² an ulp below Σa; Cauchy–Schwarz says it
        // never is, and a lone backer's score is exactly their amount.
        let score = if backers == 1 {
            contribution
        } else {
            (sum_sqrt * sum_sqrt).min(f64::MAX).max(contribution)
        };

        QuadraticResult {
            score,
            backers,
            contribution,
        }
    }
}
