//! Rank-k Fantope.
//!
//! F(k) = conv{ V Vᵀ : V ∈ ℝⁿˣᵏ, Vᵀ V = I } = { Y = Yᵀ : 0 ⪯ Y ⪯ I, tr(Y) = k }.
//!
//! Projection keeps the eigenvectors of the symmetrized input and replaces its
//! spectrum by the capped-simplex projection of the eigenvalues.

use nalgebra::linalg::SymmetricEigen;
use nalgebra::DMatrix;

use super::simplex::project_capped_simplex_into;
use super::traits::{check_shape, ConvexSet};
use crate::error::ProjectionError;
use crate::util::{symmetrize, symmetrize_in_place};

/// Fantope of n×n matrices with trace k.
#[derive(Debug, Clone)]
pub struct Fantope {
    n: usize,
    k: usize,
}

impl Fantope {
    /// Create the rank-k Fantope for n×n matrices.
    pub fn new(n: usize, k: usize) -> Self {
        Self { n, k }
    }
}

impl ConvexSet for Fantope {
    fn dim(&self) -> usize {
        self.n
    }

    fn project_into(&self, m: &DMatrix<f64>, out: &mut DMatrix<f64>) -> Result<(), ProjectionError> {
        check_shape(self.n, m)?;
        check_shape(self.n, out)?;
        if self.k > self.n {
            return Err(ProjectionError::RankOutOfRange { k: self.k as f64, n: self.n });
        }
        if m.iter().any(|v| !v.is_finite()) {
            return Err(ProjectionError::NonFinite { stage: "fantope input" });
        }

        // Floating-point drift leaves M slightly asymmetric; the eigen-solver
        // only reads one triangle, so symmetrize explicitly first.
        let eig = SymmetricEigen::new(symmetrize(m));
        if eig.eigenvalues.iter().any(|v| !v.is_finite())
            || eig.eigenvectors.iter().any(|v| !v.is_finite())
        {
            return Err(ProjectionError::NonFinite { stage: "eigen-decomposition" });
        }

        let mut theta = vec![0.0; self.n];
        project_capped_simplex_into(eig.eigenvalues.as_slice(), self.k as f64, &mut theta)?;

        // Y = V diag(θ) Vᵀ
        let mut scaled = eig.eigenvectors.clone();
        for (mut col, &t) in scaled.column_iter_mut().zip(theta.iter()) {
            col.scale_mut(t);
        }
        out.gemm(1.0, &scaled, &eig.eigenvectors.transpose(), 0.0);
        symmetrize_in_place(out);

        Ok(())
    }

    fn contains(&self, m: &DMatrix<f64>, tol: f64) -> bool {
        if m.nrows() != self.n || m.ncols() != self.n || m.iter().any(|v| !v.is_finite()) {
            return false;
        }
        let asym = m
            .iter()
            .zip(m.transpose().iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        if asym > tol {
            return false;
        }
        let eig = SymmetricEigen::new(symmetrize(m));
        let in_box = eig.eigenvalues.iter().all(|&l| l >= -tol && l <= 1.0 + tol);
        in_box && (eig.eigenvalues.sum() - self.k as f64).abs() <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::frobenius_distance;

    fn lcg_matrix(n: usize, seed: u64) -> DMatrix<f64> {
        let mut state = seed;
        DMatrix::from_fn(n, n, |_, _| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            2.0 * ((state >> 33) as f64) / (u32::MAX as f64) - 1.0
        })
    }

    fn sorted_eigenvalues(m: &DMatrix<f64>) -> Vec<f64> {
        let mut ev: Vec<f64> = SymmetricEigen::new(symmetrize(m)).eigenvalues.iter().copied().collect();
        ev.sort_by(|a, b| a.total_cmp(b));
        ev
    }

    #[test]
    fn test_projection_spectrum() {
        for k in 1..=5 {
            let set = Fantope::new(5, k);
            let y = set.project(&lcg_matrix(5, 42 + k as u64)).unwrap();
            assert!(set.contains(&y, 1e-9), "k={} y={}", k, y);
            let ev = sorted_eigenvalues(&y);
            assert!((ev.iter().sum::<f64>() - k as f64).abs() < 1e-9);
            assert!(ev[0] > -1e-9 && ev[4] < 1.0 + 1e-9);
        }
    }

    #[test]
    fn test_symmetrization_contract() {
        // The projection only sees (M + Mᵀ)/2
        let m = lcg_matrix(4, 9);
        let set = Fantope::new(4, 2);
        let from_raw = set.project(&m).unwrap();
        let from_sym = set.project(&symmetrize(&m)).unwrap();
        assert!(frobenius_distance(&from_raw, &from_sym) < 1e-10);
        assert_eq!(from_raw, from_raw.transpose());
    }

    #[test]
    fn test_orthogonal_projection_is_fixed() {
        // Projector onto span{e0 + e1, e2}: rank 2, eigenvalues {1, 1, 0}
        let mut p = DMatrix::zeros(3, 3);
        p[(0, 0)] = 0.5;
        p[(0, 1)] = 0.5;
        p[(1, 0)] = 0.5;
        p[(1, 1)] = 0.5;
        p[(2, 2)] = 1.0;
        let y = Fantope::new(3, 2).project(&p).unwrap();
        assert!(frobenius_distance(&y, &p) < 1e-10, "{}", y);
    }

    #[test]
    fn test_reconstructs_in_eigenbasis() {
        // M = Q diag(2, 0.5, -1) Qᵀ with Q a rotation mixing all three axes;
        // for k = 1 the capped simplex gives θ = (1, 0, 0), so Y = q₀ q₀ᵀ.
        let (c1, s1) = (0.6_f64, 0.8_f64);
        let (c2, s2) = (0.28_f64, 0.96_f64);
        let rx = DMatrix::from_row_slice(3, 3, &[1.0, 0.0, 0.0, 0.0, c1, -s1, 0.0, s1, c1]);
        let rz = DMatrix::from_row_slice(3, 3, &[c2, -s2, 0.0, s2, c2, 0.0, 0.0, 0.0, 1.0]);
        let q = &rz * &rx;
        let d = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![2.0, 0.5, -1.0]));
        let m = &q * d * q.transpose();

        let y = Fantope::new(3, 1).project(&m).unwrap();
        let q0 = q.column(0);
        let expected = q0 * q0.transpose();
        assert!(frobenius_distance(&y, &expected) < 1e-10, "{}", y);
    }

    #[test]
    fn test_full_rank_is_identity() {
        let y = Fantope::new(4, 4).project(&lcg_matrix(4, 3)).unwrap();
        assert!(frobenius_distance(&y, &DMatrix::identity(4, 4)) < 1e-10);
    }

    #[test]
    fn test_idempotent() {
        let set = Fantope::new(6, 3);
        let once = set.project(&lcg_matrix(6, 17)).unwrap();
        let twice = set.project(&once).unwrap();
        assert!(frobenius_distance(&once, &twice) < 1e-9);
    }

    #[test]
    fn test_non_finite_input() {
        let mut m = DMatrix::identity(3, 3);
        m[(2, 0)] = f64::INFINITY;
        let err = Fantope::new(3, 2).project(&m).unwrap_err();
        assert!(matches!(err, ProjectionError::NonFinite { .. }));
    }

    #[test]
    fn test_rank_out_of_range() {
        let err = Fantope::new(3, 4).project(&DMatrix::identity(3, 3)).unwrap_err();
        assert!(matches!(err, ProjectionError::RankOutOfRange { .. }));
    }

    #[test]
    fn test_contains_rejects() {
        let set = Fantope::new(3, 2);
        assert!(!set.contains(&DMatrix::identity(3, 3), 1e-9)); // trace 3
        let over = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![1.5, 0.5, 0.0]));
        assert!(!set.contains(&over, 1e-9)); // eigenvalue above 1
        let mut asym = DMatrix::identity(3, 3) * (2.0 / 3.0);
        asym[(0, 1)] = 0.1;
        assert!(!set.contains(&asym, 1e-9));
        assert!(set.contains(&(DMatrix::identity(3, 3) * (2.0 / 3.0)), 1e-9));
    }
}
