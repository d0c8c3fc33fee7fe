//! Error types for the matching-pool engine.
//!
//! Per-contributor bad data never reaches these types: invalid entries are
//! excluded where they are read. Only round-level contract violations do.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("negative matching pool: {0}")] NegativePool(f64),
    #[error("non-finite matching pool: {0}")] NonFinitePool(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoundError {
    #[error(transparent)] Allocation(#[from] AllocationError),
    #[error("unknown submission: {0}")] UnknownSubmission(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            AllocationError::NegativePool(-5.0).to_string(),
            "negative matching pool: -5"
        );
        assert_eq!(
            RoundError::UnknownSubmission("s9".into()).to_string(),
            "unknown submission: s9"
        );
    }

    #[test]
    fn round_error_wraps_allocation_transparently() {
        let err: RoundError = AllocationError::NonFinitePool(f64::INFINITY).into();
        assert_eq!(err.to_string(), "non-finite matching pool: inf");
        assert_eq!(
            err,
            RoundError::Allocation(AllocationError::NonFinitePool(f64::INFINITY))
        );
    }
}
