//! Problem data structures and validation.
//!
//! This module defines the clustering problem, the solver settings, and the
//! records returned along a solution path.

use std::fmt;
use std::str::FromStr;

use nalgebra::DMatrix;

use crate::error::{ClusterError, ClusterResult};

/// Birkhoff-Fantope clustering problem.
///
/// ```text
/// maximize    ⟨S, Z⟩
/// subject to  Z ≥ 0,  Z 1 = 1,  Zᵀ 1 = 1        (Birkhoff polytope)
///             0 ⪯ Z ⪯ I,  tr(Z) = k             (rank-k Fantope)
/// ```
///
/// solved once for every `k` in `nclust`, in the given order.
#[derive(Debug, Clone)]
pub struct ClusterProblem {
    /// Pairwise similarity matrix S (n × n, symmetric by contract)
    pub similarity: DMatrix<f64>,

    /// Requested cluster counts. Order is preserved; duplicates are allowed.
    pub nclust: Vec<usize>,
}

/// Solver settings and parameters.
#[derive(Debug, Clone)]
pub struct ClusterSettings {
    /// Maximum number of ADMM iterations per cluster count
    pub max_iter: usize,

    /// Convergence threshold; residuals are compared against `tolerance * sqrt(n)`
    pub tolerance: f64,

    /// ADMM penalty parameter ρ
    pub admm_penalty: f64,

    /// 0 = silent, 1 = one progress marker per cluster count, 2 = also iteration counts
    pub verbose: u8,

    /// Marginal tolerance of the inner Birkhoff projection
    pub birkhoff_tol: f64,

    /// Sub-iteration cap of the inner Birkhoff projection
    pub birkhoff_max_iter: usize,
}

fn env_override<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

impl Default for ClusterSettings {
    fn default() -> Self {
        // Malformed environment values fall back to the defaults
        Self {
            max_iter: env_override("BFCLUSTER_MAX_ITER").unwrap_or(100),
            tolerance: env_override("BFCLUSTER_TOLERANCE").unwrap_or(1e-2),
            admm_penalty: env_override("BFCLUSTER_ADMM_PENALTY").unwrap_or(100.0),
            verbose: env_override("BFCLUSTER_VERBOSE").unwrap_or(0),
            birkhoff_tol: 1e-9,
            birkhoff_max_iter: 1000,
        }
    }
}

impl ClusterSettings {
    /// Validate hyperparameters.
    pub fn validate(&self) -> ClusterResult<()> {
        if self.max_iter < 1 {
            return Err(ClusterError::validation("maxiter", "expected maxiter > 0"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ClusterError::validation(
                "tolerance",
                format!("expected tolerance > 0, got {}", self.tolerance),
            ));
        }
        if !(self.admm_penalty.is_finite() && self.admm_penalty > 0.0) {
            return Err(ClusterError::validation(
                "admm_penalty",
                format!("expected admm_penalty > 0, got {}", self.admm_penalty),
            ));
        }
        if self.verbose > 2 {
            return Err(ClusterError::validation(
                "verbose",
                format!("expected verbose in 0..=2, got {}", self.verbose),
            ));
        }
        if !(self.birkhoff_tol.is_finite() && self.birkhoff_tol > 0.0) {
            return Err(ClusterError::validation(
                "birkhoff_tol",
                format!("expected birkhoff_tol > 0, got {}", self.birkhoff_tol),
            ));
        }
        if self.birkhoff_max_iter < 1 {
            return Err(ClusterError::validation(
                "birkhoff_max_iter",
                "expected birkhoff_max_iter > 0",
            ));
        }
        Ok(())
    }
}

impl ClusterProblem {
    /// Create a problem from a similarity matrix and a sequence of cluster counts.
    pub fn new(similarity: DMatrix<f64>, nclust: Vec<usize>) -> Self {
        Self { similarity, nclust }
    }

    /// Number of points (rows of S)
    pub fn dim(&self) -> usize {
        self.similarity.nrows()
    }

    /// Validate matrix shape, entries, and requested cluster counts.
    pub fn validate(&self) -> ClusterResult<()> {
        let (rows, cols) = self.similarity.shape();
        if rows < 2 {
            return Err(ClusterError::validation(
                "S",
                format!("expected S to be a matrix with at least 2 rows, got {}", rows),
            ));
        }
        if rows != cols {
            return Err(ClusterError::validation(
                "S",
                format!("expected a square matrix, got {}x{}", rows, cols),
            ));
        }
        if let Some(idx) = self.similarity.iter().position(|v| !v.is_finite()) {
            return Err(ClusterError::validation(
                "S",
                format!("non-finite entry at ({}, {})", idx % rows, idx / rows),
            ));
        }

        if self.nclust.is_empty() {
            return Err(ClusterError::validation("nclust", "expected length of nclust > 0"));
        }
        if let Some(&k) = self.nclust.iter().find(|&&k| k < 2 || k > rows) {
            return Err(ClusterError::validation(
                "nclust",
                format!(
                    "expected integers between 2 and {} (the number of rows/columns of S), got {}",
                    rows, k
                ),
            ));
        }

        Ok(())
    }
}

/// Outcome of a single ADMM solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Primal and dual residuals cleared the tolerance
    Converged,

    /// Maximum iterations reached; the last iterate is still returned
    MaxIters,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Converged => write!(f, "Converged"),
            SolveStatus::MaxIters => write!(f, "MaxIters"),
        }
    }
}

/// Diagnostics of one ADMM solve.
#[derive(Debug, Clone, Copy)]
pub struct SolveInfo {
    /// Termination status
    pub status: SolveStatus,

    /// Number of ADMM iterations executed
    pub iters: usize,

    /// Final primal residual ‖Z − Y‖_F
    pub primal_res: f64,

    /// Final dual residual ρ‖Y_new − Y_old‖_F
    pub dual_res: f64,

    /// Wall-clock time of the solve (milliseconds)
    pub solve_time_ms: u64,
}

/// Result for one requested cluster count.
#[derive(Debug, Clone)]
pub struct SolutionRecord {
    /// Requested number of clusters
    pub nclust: usize,

    /// Normalized clustering matrix (independent copy of Z)
    pub clustmat: DMatrix<f64>,

    /// Objective value ⟨S, Z⟩
    pub objective: f64,

    /// Solve diagnostics
    pub info: SolveInfo,
}

impl SolutionRecord {
    /// Number of ADMM iterations used.
    pub fn iterations(&self) -> usize {
        self.info.iters
    }

    /// Whether the solve stopped on the residual test rather than `max_iter`.
    pub fn converged(&self) -> bool {
        self.info.status == SolveStatus::Converged
    }
}

/// Solution path: one record per requested cluster count, in request order.
#[derive(Debug, Clone, Default)]
pub struct SolutionPath {
    /// Records in the caller's order
    pub records: Vec<SolutionRecord>,
}

impl SolutionPath {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the path holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cluster counts of each estimate.
    pub fn nclust(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.nclust).collect()
    }

    /// Clustering matrix estimates.
    pub fn clustmat(&self) -> Vec<&DMatrix<f64>> {
        self.records.iter().map(|r| &r.clustmat).collect()
    }

    /// Objective values ⟨S, Z⟩ for each estimate.
    pub fn maxval(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.objective).collect()
    }

    /// ADMM iteration counts for each estimate.
    pub fn niter(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.info.iters).collect()
    }

    /// Iterate over records.
    pub fn iter(&self) -> std::slice::Iter<'_, SolutionRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a SolutionPath {
    type Item = &'a SolutionRecord;
    type IntoIter = std::slice::Iter<'a, SolutionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blocks() -> DMatrix<f64> {
        DMatrix::from_fn(4, 4, |i, j| if i / 2 == j / 2 { 1.0 } else { 0.0 })
    }

    fn settings() -> ClusterSettings {
        ClusterSettings {
            max_iter: 100,
            tolerance: 1e-2,
            admm_penalty: 100.0,
            verbose: 0,
            birkhoff_tol: 1e-9,
            birkhoff_max_iter: 1000,
        }
    }

    #[test]
    fn test_problem_validation() {
        assert!(ClusterProblem::new(two_blocks(), vec![2]).validate().is_ok());
        assert!(ClusterProblem::new(two_blocks(), vec![4, 2, 2, 3]).validate().is_ok());

        let err = ClusterProblem::new(two_blocks(), vec![1]).validate().unwrap_err();
        assert_eq!(err.argument(), Some("nclust"));
        let err = ClusterProblem::new(two_blocks(), vec![2, 5]).validate().unwrap_err();
        assert_eq!(err.argument(), Some("nclust"));
        let err = ClusterProblem::new(two_blocks(), vec![]).validate().unwrap_err();
        assert_eq!(err.argument(), Some("nclust"));
    }

    #[test]
    fn test_matrix_validation() {
        let err = ClusterProblem::new(DMatrix::zeros(1, 1), vec![2]).validate().unwrap_err();
        assert_eq!(err.argument(), Some("S"));

        let err = ClusterProblem::new(DMatrix::zeros(3, 4), vec![2]).validate().unwrap_err();
        assert_eq!(err.argument(), Some("S"));

        let mut s = two_blocks();
        s[(1, 2)] = f64::NAN;
        let err = ClusterProblem::new(s, vec![2]).validate().unwrap_err();
        assert_eq!(err.argument(), Some("S"));
        assert!(err.to_string().contains("(1, 2)"), "{}", err);
    }

    #[test]
    fn test_settings_validation() {
        assert!(settings().validate().is_ok());

        let cases: Vec<(ClusterSettings, &str)> = vec![
            (ClusterSettings { max_iter: 0, ..settings() }, "maxiter"),
            (ClusterSettings { tolerance: 0.0, ..settings() }, "tolerance"),
            (ClusterSettings { tolerance: f64::NAN, ..settings() }, "tolerance"),
            (ClusterSettings { admm_penalty: -1.0, ..settings() }, "admm_penalty"),
            (ClusterSettings { verbose: 3, ..settings() }, "verbose"),
            (ClusterSettings { birkhoff_tol: 0.0, ..settings() }, "birkhoff_tol"),
            (ClusterSettings { birkhoff_max_iter: 0, ..settings() }, "birkhoff_max_iter"),
        ];
        for (s, arg) in cases {
            let err = s.validate().unwrap_err();
            assert_eq!(err.argument(), Some(arg), "{}", err);
        }
    }

    #[test]
    fn test_path_accessors() {
        let info = SolveInfo {
            status: SolveStatus::Converged,
            iters: 7,
            primal_res: 0.0,
            dual_res: 0.0,
            solve_time_ms: 0,
        };
        let path = SolutionPath {
            records: vec![
                SolutionRecord { nclust: 3, clustmat: DMatrix::identity(3, 3), objective: 1.5, info },
                SolutionRecord {
                    nclust: 2,
                    clustmat: DMatrix::identity(3, 3),
                    objective: 0.5,
                    info: SolveInfo { status: SolveStatus::MaxIters, iters: 100, ..info },
                },
            ],
        };
        assert_eq!(path.nclust(), vec![3, 2]);
        assert_eq!(path.maxval(), vec![1.5, 0.5]);
        assert_eq!(path.niter(), vec![7, 100]);
        assert_eq!(path.clustmat().len(), 2);
        assert!(path.records[0].converged());
        assert!(!path.records[1].converged());
        assert_eq!(SolveStatus::MaxIters.to_string(), "MaxIters");
    }
}
