//! Utility functions.
//!
//! Dense matrix helpers shared by the projectors and the ADMM loop.

pub mod numerics;

pub use numerics::{frobenius_distance, marginal_violation, symmetrize, symmetrize_in_place};
