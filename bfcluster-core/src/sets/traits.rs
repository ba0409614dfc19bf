//! Convex set trait definition.
//!
//! Every constraint set used by the ADMM splitting exposes the same two
//! operations: Euclidean (Frobenius) projection of an n×n matrix, and a
//! membership test up to a tolerance.

use nalgebra::DMatrix;

use crate::error::ProjectionError;

/// Closed convex subset of n×n real matrices.
///
/// # Coordinate Convention
///
/// All operands are dense column-major `DMatrix<f64>` of shape `dim() × dim()`.
/// Implementations must not assume the input is symmetric.
pub trait ConvexSet {
    /// Side length n of the matrices this set lives in.
    fn dim(&self) -> usize;

    /// Write the nearest point of the set to `m` into `out`.
    ///
    /// `out` must already have shape n×n; its previous contents are ignored.
    fn project_into(&self, m: &DMatrix<f64>, out: &mut DMatrix<f64>) -> Result<(), ProjectionError>;

    /// Allocating variant of [`ConvexSet::project_into`].
    fn project(&self, m: &DMatrix<f64>) -> Result<DMatrix<f64>, ProjectionError> {
        let n = self.dim();
        let mut out = DMatrix::zeros(n, n);
        self.project_into(m, &mut out)?;
        Ok(out)
    }

    /// Check membership with absolute tolerance `tol`.
    fn contains(&self, m: &DMatrix<f64>, tol: f64) -> bool;
}

pub(crate) fn check_shape(n: usize, m: &DMatrix<f64>) -> Result<(), ProjectionError> {
    if m.nrows() != n || m.ncols() != n {
        return Err(ProjectionError::DimensionMismatch {
            expected: n,
            rows: m.nrows(),
            cols: m.ncols(),
        });
    }
    Ok(())
}
