//! Shared builders and proptest strategies for integration tests.

use std::collections::BTreeMap;

use proptest::prelude::*;
use qf_core::types::{AiReward, Amount, ContributionMap};
use qf_match::round::{RoundInput, SubmissionInput};

/// Contribution map from `(contributor, amount)` pairs.
pub fn contributions(entries: &[(&str, Amount)]) -> ContributionMap {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// `n` distinct contributors each giving `amount`.
pub fn uniform_backers(prefix: &str, n: usize, amount: Amount) -> ContributionMap {
    (0..n).map(|i| (format!("{prefix}-{i}"), amount)).collect()
}

/// Round with the given pool and eligible-only submissions.
pub fn round(total_pool: Amount, submissions: Vec<(&str, ContributionMap)>) -> RoundInput {
    RoundInput {
        total_pool,
        round_submission_count: None,
        submissions: submissions
            .into_iter()
            .map(|(id, eligible)| {
                (
                    id.to_string(),
                    SubmissionInput {
                        eligible,
                        all: None,
                    },
                )
            })
            .collect(),
        ai_rewards: BTreeMap::new(),
    }
}

/// A plausible contribution amount, including the occasional bad record.
pub fn arb_amount() -> impl Strategy<Value = Amount> {
    prop_oneof![
        8 => 0.01f64..5_000.0,
        1 => Just(0.0),
        1 => prop::sample::select(vec![-1.0, f64::NAN, f64::INFINITY]),
    ]
}

/// Contributions toward one submission.
pub fn arb_contributions() -> impl Strategy<Value = ContributionMap> {
    prop::collection::btree_map("u[0-9]{1,3}", arb_amount(), 0..25)
}

/// A whole round: 1–20 submissions, optional AI rewards, optional count padding.
pub fn arb_round() -> impl Strategy<Value = RoundInput> {
    (
        prop::collection::btree_map("s[0-9]{1,2}", arb_contributions(), 1..20),
        0.0f64..1_000_000.0,
        0u64..4,
        any::<bool>(),
    )
        .prop_map(|(subs, total_pool, padding, pending)| {
            let ai_rewards = subs
                .keys()
                .step_by(2)
                .map(|id| {
                    (
                        id.clone(),
                        AiReward {
                            amount: 10.0,
                            pending,
                        },
                    )
                })
                .collect();
            let count = subs.len() as u64 + padding;
            RoundInput {
                total_pool,
                round_submission_count: Some(count),
                submissions: subs
                    .into_iter()
                    .map(|(id, eligible)| {
                        (
                            id,
                            SubmissionInput {
                                eligible,
                                all: None,
                            },
                        )
                    })
                    .collect(),
                ai_rewards,
            }
        })
}
