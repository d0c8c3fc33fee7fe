//! # qf-core
//! Foundation types and traits for the quadratic matching-pool engine.

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
