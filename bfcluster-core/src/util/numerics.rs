//! Numerical helpers on dense square matrices.

use nalgebra::DMatrix;

/// ‖A − B‖_F without allocating the difference.
#[inline]
pub fn frobenius_distance(a: &DMatrix<f64>, b: &DMatrix<f64>) -> f64 {
    debug_assert_eq!(a.shape(), b.shape());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Largest deviation of any row or column sum from 1.
pub fn marginal_violation(m: &DMatrix<f64>) -> f64 {
    let row_dev = m
        .row_iter()
        .map(|row| (row.sum() - 1.0).abs())
        .fold(0.0_f64, f64::max);
    let col_dev = m
        .column_iter()
        .map(|col| (col.sum() - 1.0).abs())
        .fold(0.0_f64, f64::max);
    row_dev.max(col_dev)
}

/// (M + Mᵀ) / 2
pub fn symmetrize(m: &DMatrix<f64>) -> DMatrix<f64> {
    assert_eq!(m.nrows(), m.ncols(), "symmetrize expects a square matrix");
    (m + m.transpose()) * 0.5
}

/// Replace M by (M + Mᵀ) / 2 without allocating.
pub fn symmetrize_in_place(m: &mut DMatrix<f64>) {
    let n = m.nrows();
    assert_eq!(n, m.ncols(), "symmetrize expects a square matrix");
    for j in 0..n {
        for i in (j + 1)..n {
            let avg = 0.5 * (m[(i, j)] + m[(j, i)]);
            m[(i, j)] = avg;
            m[(j, i)] = avg;
        }
    }
}
