//! # qf-match — Capital-constrained quadratic funding engine.
//!
//! All functions are pure: no I/O, no state kept between calls.
//!
//! This crate implements the round allocation pipeline:
//! - **Quadratic score**: `(Σ √amount)²` per submission, skipping zero,
//!   negative and non-finite entries.
//! - **Pool distribution**: a fixed pool is split by funding gap
//!   (`score − contribution`), falling back to score-proportional and then
//!   to an even split when the earlier denominator is ~0.
//! - **Reward composition**: AI-assessed reward plus quadratic match, with
//!   backer aggregates for display.
//! - **Round pipeline**: all three steps over one round's submissions.

pub mod distributor;
pub mod reward;
pub mod round;
pub mod score;

pub use distributor::CqfDistributor;
pub use reward::EarningsComposer;
pub use round::{run_round, RoundEntry, RoundInput, RoundReport, SubmissionInput};
pub use score::QuadraticScorer;
