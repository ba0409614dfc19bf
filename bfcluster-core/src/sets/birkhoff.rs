//! Birkhoff polytope (doubly-stochastic matrices).
//!
//! The Euclidean projection is computed with Dykstra's alternating projection
//! between two convex sets whose intersection is the polytope:
//!
//! - the affine set A = { X : X 1 = 1, Xᵀ 1 = 1 }, projected in closed form by
//!   spreading each row and column deficit evenly (row/column normalization)
//! - the nonnegative orthant, projected by clipping negatives
//!
//! Dykstra's correction is only needed for the orthant, since corrections for
//! an affine set lie in its normal space and cancel.

use nalgebra::{DMatrix, DVector};

use super::traits::{check_shape, ConvexSet};
use crate::error::ProjectionError;
use crate::util::marginal_violation;

/// Birkhoff polytope of n×n matrices with the inner solver's stopping rule.
#[derive(Debug, Clone)]
pub struct BirkhoffPolytope {
    n: usize,
    tol: f64,
    max_iter: usize,
}

/// Outcome of one projection call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirkhoffInfo {
    /// Sub-iterations executed
    pub iters: usize,
    /// max |row/col sum − 1| of the returned matrix
    pub violation: f64,
    /// Whether `violation < tol` was reached before the cap
    pub converged: bool,
}

/// Scratch buffers reused across projection calls.
#[derive(Debug, Clone)]
pub struct BirkhoffWorkspace {
    affine: DMatrix<f64>,
    correction: DMatrix<f64>,
    best: DMatrix<f64>,
    row_sums: DVector<f64>,
    col_sums: DVector<f64>,
}

impl BirkhoffWorkspace {
    /// Allocate buffers for n×n operands.
    pub fn new(n: usize) -> Self {
        Self {
            affine: DMatrix::zeros(n, n),
            correction: DMatrix::zeros(n, n),
            best: DMatrix::zeros(n, n),
            row_sums: DVector::zeros(n),
            col_sums: DVector::zeros(n),
        }
    }

    fn dim(&self) -> usize {
        self.affine.nrows()
    }
}

impl BirkhoffPolytope {
    /// Default marginal tolerance of the inner iteration.
    pub const DEFAULT_TOL: f64 = 1e-9;

    /// Default sub-iteration cap.
    pub const DEFAULT_MAX_ITER: usize = 1000;

    /// Polytope of n×n doubly-stochastic matrices with default inner settings.
    pub fn new(n: usize) -> Self {
        Self::with_tolerance(n, Self::DEFAULT_TOL, Self::DEFAULT_MAX_ITER)
    }

    /// Polytope with explicit inner tolerance and sub-iteration cap.
    pub fn with_tolerance(n: usize, tol: f64, max_iter: usize) -> Self {
        Self { n, tol, max_iter: max_iter.max(1) }
    }

    /// Project `m` into `out` using caller-owned scratch space.
    ///
    /// Never fails on non-convergence: when the cap is hit, the iterate with
    /// the smallest marginal violation seen is returned and `converged` is false.
    /// Non-finite input is copied through unchanged so the caller can detect it.
    pub fn project_with(
        &self,
        m: &DMatrix<f64>,
        out: &mut DMatrix<f64>,
        ws: &mut BirkhoffWorkspace,
    ) -> Result<BirkhoffInfo, ProjectionError> {
        check_shape(self.n, m)?;
        check_shape(self.n, out)?;
        if ws.dim() != self.n {
            *ws = BirkhoffWorkspace::new(self.n);
        }

        out.copy_from(m);
        if m.iter().any(|v| !v.is_finite()) {
            return Ok(BirkhoffInfo { iters: 0, violation: f64::NAN, converged: false });
        }

        ws.correction.fill(0.0);
        let mut best_violation = f64::INFINITY;

        for iter in 1..=self.max_iter {
            affine_project(out, &mut ws.affine, &mut ws.row_sums, &mut ws.col_sums);

            // Orthant step with Dykstra correction
            for ((x, &a), c) in out
                .iter_mut()
                .zip(ws.affine.iter())
                .zip(ws.correction.iter_mut())
            {
                let shifted = a + *c;
                *x = shifted.max(0.0);
                *c = shifted - *x;
            }

            let violation = marginal_violation(out);
            if violation < self.tol {
                return Ok(BirkhoffInfo { iters: iter, violation, converged: true });
            }
            if violation < best_violation {
                best_violation = violation;
                ws.best.copy_from(out);
            }
        }

        out.copy_from(&ws.best);
        Ok(BirkhoffInfo {
            iters: self.max_iter,
            violation: best_violation,
            converged: false,
        })
    }
}

/// Closed-form projection onto { X : X 1 = 1, Xᵀ 1 = 1 }.
///
/// ```text
/// P(X)ᵢⱼ = Xᵢⱼ + (1 − rᵢ)/n + (1 − cⱼ)/n + (s − n)/n²
/// ```
///
/// with row sums r, column sums c and total s.
fn affine_project(
    x: &DMatrix<f64>,
    out: &mut DMatrix<f64>,
    row_sums: &mut DVector<f64>,
    col_sums: &mut DVector<f64>,
) {
    let n = x.nrows();
    let nf = n as f64;

    row_sums.fill(0.0);
    for (j, col) in x.column_iter().enumerate() {
        col_sums[j] = col.sum();
        for (i, &v) in col.iter().enumerate() {
            row_sums[i] += v;
        }
    }
    let total: f64 = col_sums.sum();
    let shift = (total - nf) / (nf * nf);

    for j in 0..n {
        let col_term = (1.0 - col_sums[j]) / nf + shift;
        for i in 0..n {
            out[(i, j)] = x[(i, j)] + (1.0 - row_sums[i]) / nf + col_term;
        }
    }
}

impl ConvexSet for BirkhoffPolytope {
    fn dim(&self) -> usize {
        self.n
    }

    fn project_into(&self, m: &DMatrix<f64>, out: &mut DMatrix<f64>) -> Result<(), ProjectionError> {
        let mut ws = BirkhoffWorkspace::new(self.n);
        self.project_with(m, out, &mut ws)?;
        Ok(())
    }

    fn contains(&self, m: &DMatrix<f64>, tol: f64) -> bool {
        if m.nrows() != self.n || m.ncols() != self.n {
            return false;
        }
        m.iter().all(|&v| v.is_finite() && v >= -tol) && marginal_violation(m) <= tol
    }
}
