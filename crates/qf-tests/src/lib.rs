//! Adversarial test suite for the quadratic matching-pool engine.
//!
//! This crate contains integration tests that try to break the allocation
//! invariants from a manipulator's perspective. Shared builders and
//! proptest strategies live in [`helpers`].

pub mod helpers;
