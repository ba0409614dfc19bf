//! Termination criteria for the ADMM loop.
//!
//! - Primal residual r = ‖Z − Y‖_F (consensus violation)
//! - Dual residual d = ρ‖Y_k − Y_{k−1}‖_F (iterate movement)
//!
//! Both are compared against the absolute threshold `tolerance * sqrt(n)`.

use crate::problem::{ClusterSettings, SolveStatus};

/// Residuals of one ADMM iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residuals {
    pub primal: f64,
    pub dual: f64,
}

/// Termination criteria.
#[derive(Debug, Clone)]
pub struct TerminationCriteria {
    /// Absolute residual threshold (tolerance * sqrt(n))
    pub threshold: f64,

    /// Maximum iterations
    pub max_iter: usize,
}

impl TerminationCriteria {
    pub fn new(settings: &ClusterSettings, n: usize) -> Self {
        Self {
            threshold: settings.tolerance * (n as f64).sqrt(),
            max_iter: settings.max_iter,
        }
    }

    /// Returns `Some(status)` if the solver should stop after `iter` iterations.
    pub fn check(&self, residuals: &Residuals, iter: usize) -> Option<SolveStatus> {
        if residuals.primal < self.threshold && residuals.dual < self.threshold {
            return Some(SolveStatus::Converged);
        }
        if iter >= self.max_iter {
            return Some(SolveStatus::MaxIters);
        }
        None
    }
}
