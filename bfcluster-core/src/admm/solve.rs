//! ADMM iteration for a single cluster count.
//!
//! Splits the relaxation into a Birkhoff block Z and a Fantope block Y tied by
//! the consensus constraint Z = Y with scaled dual U:
//!
//! ```text
//! Z ← Π_B(Y − U + S/ρ)
//! Y ← Π_F(Z + U, k)
//! U ← U + Z − Y
//! ```

use std::time::Instant;

use nalgebra::DMatrix;

use super::diagnostics::DiagnosticsConfig;
use super::perf::{PerfSection, PerfTimers};
use super::state::AdmmState;
use super::termination::{Residuals, TerminationCriteria};
use crate::error::{ClusterError, ClusterResult};
use crate::problem::{ClusterSettings, SolveInfo, SolveStatus};
use crate::sets::{BirkhoffPolytope, ConvexSet, Fantope};
use crate::util::frobenius_distance;

/// Run ADMM for target rank `nclust`, starting from (and updating) `state`.
///
/// Returns diagnostics with the number of iterations actually executed.
/// Reaching `max_iter` is reported through `SolveStatus::MaxIters`, not as an
/// error; the last Z in `state` is still the usable estimate. Fails only when
/// the Fantope projection meets non-finite values.
///
/// Arguments are assumed validated: `state` and `similarity` are n×n,
/// `2 <= nclust <= n`, settings positive.
pub fn admm_solve(
    similarity: &DMatrix<f64>,
    state: &mut AdmmState,
    nclust: usize,
    settings: &ClusterSettings,
) -> ClusterResult<SolveInfo> {
    let diag = DiagnosticsConfig::from_env();
    admm_solve_with_diagnostics(similarity, state, nclust, settings, &diag)
}

pub(crate) fn admm_solve_with_diagnostics(
    similarity: &DMatrix<f64>,
    state: &mut AdmmState,
    nclust: usize,
    settings: &ClusterSettings,
    diag: &DiagnosticsConfig,
) -> ClusterResult<SolveInfo> {
    let start = Instant::now();
    let n = state.dim();
    debug_assert_eq!(similarity.shape(), (n, n));

    let rho = settings.admm_penalty;
    let birkhoff = BirkhoffPolytope::with_tolerance(n, settings.birkhoff_tol, settings.birkhoff_max_iter);
    let fantope = Fantope::new(n, nclust);
    let criteria = TerminationCriteria::new(settings, n);
    let mut timers = PerfTimers::default();

    // V may be stale if the penalty changed since the last solve.
    state.refresh_v(similarity, rho);
    state.history.clear();

    let mut residuals = Residuals { primal: f64::INFINITY, dual: f64::INFINITY };
    let mut status = SolveStatus::MaxIters;
    let mut iters = 0usize;
    let mut birkhoff_capped = 0usize;

    for iter in 1..=criteria.max_iter {
        iters = iter;

        // Z-update: Y − U + S/ρ = Y − V
        let inner = {
            let _t = timers.scoped(PerfSection::Birkhoff);
            state.input.copy_from(&state.y);
            state.input -= &state.v;
            birkhoff
                .project_with(&state.input, &mut state.z, &mut state.birkhoff_ws)
                .map_err(|source| ClusterError::NumericDegeneracy { nclust, iteration: iter, source })?
        };
        if !inner.converged {
            birkhoff_capped += 1;
        }

        // Y-update
        {
            let _t = timers.scoped(PerfSection::Fantope);
            state.y_prev.copy_from(&state.y);
            state.input.copy_from(&state.z);
            state.input += &state.u;
            fantope
                .project_into(&state.input, &mut state.y)
                .map_err(|source| ClusterError::NumericDegeneracy { nclust, iteration: iter, source })?;
        }

        // Dual ascent on Z = Y
        {
            let _t = timers.scoped(PerfSection::DualUpdate);
            state.u += &state.z;
            state.u -= &state.y;
            state.refresh_v(similarity, rho);
        }

        {
            let _t = timers.scoped(PerfSection::Residuals);
            residuals = Residuals {
                primal: frobenius_distance(&state.z, &state.y),
                dual: rho * frobenius_distance(&state.y, &state.y_prev),
            };
            state.history.push(residuals);
        }

        log::trace!(
            "nclust={} iter {:4} primal_res={:.3e} dual_res={:.3e}",
            nclust,
            iter,
            residuals.primal,
            residuals.dual
        );
        if diag.should_log(iter) {
            if diag.birkhoff_detail {
                eprintln!(
                    "nclust={} iter {:4} primal_res={:.3e} dual_res={:.3e} threshold={:.3e} birkhoff_iters={} marginal={:.1e}",
                    nclust, iter, residuals.primal, residuals.dual, criteria.threshold, inner.iters, inner.violation,
                );
            } else {
                eprintln!(
                    "nclust={} iter {:4} primal_res={:.3e} dual_res={:.3e} threshold={:.3e}",
                    nclust, iter, residuals.primal, residuals.dual, criteria.threshold,
                );
            }
        }

        if let Some(s) = criteria.check(&residuals, iter) {
            status = s;
            break;
        }
    }

    if birkhoff_capped > 0 {
        log::debug!(
            "nclust={}: Birkhoff projection hit its sub-iteration cap in {} of {} iterations",
            nclust,
            birkhoff_capped,
            iters
        );
    }
    if status == SolveStatus::MaxIters {
        log::warn!(
            "nclust={}: no convergence in {} iterations (primal_res={:.3e}, dual_res={:.3e}, threshold={:.3e})",
            nclust,
            iters,
            residuals.primal,
            residuals.dual,
            criteria.threshold
        );
    }
    log::debug!(
        "nclust={} timing: total={:?} birkhoff={:?} fantope={:?} dual={:?} residuals={:?}",
        nclust,
        timers.total(),
        timers.birkhoff,
        timers.fantope,
        timers.dual_update,
        timers.residuals
    );

    Ok(SolveInfo {
        status,
        iters,
        primal_res: residuals.primal,
        dual_res: residuals.dual,
        solve_time_ms: start.elapsed().as_millis() as u64,
    })
}
