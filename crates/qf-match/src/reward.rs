//! Reward composition: AI-assessed reward plus quadratic match.
//!
//! `total_earnings = ai_reward.amount + match_amount`, unconditionally. A
//! pending AI reward still contributes its current provisional amount;
//! callers re-compose once the assessment finishes.

use qf_core::traits::RewardComposer;
use qf_core::types::{
    sanitize_amount, saturating_add, AiReward, Amount, BackerStats, RewardComposition,
};

/// The production reward composer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarningsComposer;

impl EarningsComposer {
    /// Create a new EarningsComposer.
    pub fn new() -> Self {
        Self
    }
}

impl RewardComposer for EarningsComposer {
    fn compose(
        &self,
        ai_reward: Option<AiReward>,
        match_amount: Option<Amount>,
        backer_stats: Option<BackerStats>,
    ) -> RewardComposition {
        let ai_reward = ai_reward
            .map(|r| AiReward {
                amount: sanitize_amount(r.amount),
                pending: r.pending,
            })
            .unwrap_or_default();
        let quadratic_reward = match_amount.map(sanitize_amount).unwrap_or(0.0);
        // Eligible > total is passed through untouched; the aggregator owns it.
        let stats = backer_stats.unwrap_or_default();

        RewardComposition {
            ai_reward,
            quadratic_reward,
            total_earnings: saturating_add(ai_reward.amount, quadratic_reward),
            backers_count: stats.backers_count,
            eligible_backers_count: stats.eligible_backers_count,
            volume: sanitize_amount(stats.volume),
        }
    }
}
