//! Solution path over a sequence of cluster counts.
//!
//! Counts are visited in the caller's order, never sorted. Each solve starts
//! from whatever the previous one left in the shared [`AdmmState`]; the first
//! starts from zero. A record of k therefore depends on every count requested
//! before it, but never on counts requested after it.

use nalgebra::DMatrix;

use crate::admm::solve::admm_solve_with_diagnostics;
use crate::admm::{AdmmState, DiagnosticsConfig};
use crate::error::ClusterResult;
use crate::problem::{ClusterProblem, ClusterSettings, SolutionPath, SolutionRecord};

/// Compute the solution path for `problem.nclust`.
///
/// Validates everything before allocating any solver state. A numeric
/// degeneracy in one solve aborts the remaining path: the shared warm-start
/// state is non-finite at that point, so later counts could not recover.
pub fn cluster_path(problem: &ClusterProblem, settings: &ClusterSettings) -> ClusterResult<SolutionPath> {
    settings.validate()?;
    problem.validate()?;

    let mut state = AdmmState::new(problem.dim());
    run_path(&problem.similarity, &problem.nclust, settings, &mut state)
}

/// Path driver on caller-owned state.
///
/// No validation is performed; `state` must be `n×n` with `n = rows(similarity)`.
/// On return `state` holds the iterates of the last solve, so a follow-up call
/// continues the warm start.
pub fn run_path(
    similarity: &DMatrix<f64>,
    nclust: &[usize],
    settings: &ClusterSettings,
    state: &mut AdmmState,
) -> ClusterResult<SolutionPath> {
    let diag = DiagnosticsConfig::from_env();
    let mut records = Vec::with_capacity(nclust.len());

    log::debug!(
        "solution path: n={} nclust={:?} rho={} tol={} maxiter={}",
        state.dim(),
        nclust,
        settings.admm_penalty,
        settings.tolerance,
        settings.max_iter
    );

    for &k in nclust {
        if settings.verbose > 0 {
            eprint!(".");
        }

        let info = admm_solve_with_diagnostics(similarity, state, k, settings, &diag)?;
        let clustmat = state.z().clone();
        let objective = similarity.dot(&clustmat);

        log::info!(
            "nclust={} status={} iters={} objective={:.6e} ({} ms)",
            k,
            info.status,
            info.iters,
            objective,
            info.solve_time_ms
        );
        if settings.verbose > 1 {
            eprint!("{}", info.iters);
        }

        records.push(SolutionRecord { nclust: k, clustmat, objective, info });
    }

    if settings.verbose > 0 {
        eprintln!();
    }

    Ok(SolutionPath { records })
}
