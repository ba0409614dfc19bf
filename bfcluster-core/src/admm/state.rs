use nalgebra::DMatrix;

use super::termination::Residuals;
use crate::sets::BirkhoffWorkspace;

/// Warm-start carrier of the ADMM iteration.
///
/// Owns the primal, consensus and dual iterates plus every scratch buffer the
/// iteration needs, so a solution path allocates once regardless of how many
/// cluster counts it visits. The path driver holds the only instance and lends
/// it to each solve by `&mut`.
#[derive(Debug, Clone)]
pub struct AdmmState {
    n: usize,

    /// Primal iterate Z (Birkhoff side)
    pub(crate) z: DMatrix<f64>,
    /// Consensus iterate Y (Fantope side)
    pub(crate) y: DMatrix<f64>,
    /// Scaled dual U, the running sum of Z − Y
    pub(crate) u: DMatrix<f64>,
    /// U − S/ρ, so the Birkhoff input is Y − V
    pub(crate) v: DMatrix<f64>,

    // Scratch (allocation-free hot loop)
    pub(crate) input: DMatrix<f64>,
    pub(crate) y_prev: DMatrix<f64>,
    pub(crate) birkhoff_ws: BirkhoffWorkspace,

    /// Residuals of every iteration of the most recent solve
    pub(crate) history: Vec<Residuals>,
}

impl AdmmState {
    /// Zero-initialized state for n×n problems.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            z: DMatrix::zeros(n, n),
            y: DMatrix::zeros(n, n),
            u: DMatrix::zeros(n, n),
            v: DMatrix::zeros(n, n),
            input: DMatrix::zeros(n, n),
            y_prev: DMatrix::zeros(n, n),
            birkhoff_ws: BirkhoffWorkspace::new(n),
            history: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    /// Current primal iterate Z.
    pub fn z(&self) -> &DMatrix<f64> {
        &self.z
    }

    /// Current consensus iterate Y.
    pub fn y(&self) -> &DMatrix<f64> {
        &self.y
    }

    /// Current scaled dual U.
    pub fn u(&self) -> &DMatrix<f64> {
        &self.u
    }

    /// Auxiliary V = U − S/ρ as of the last dual update.
    pub fn v(&self) -> &DMatrix<f64> {
        &self.v
    }

    /// Whether all iterates are still zero (no solve has run yet).
    pub fn is_cold(&self) -> bool {
        self.z.iter().chain(self.y.iter()).chain(self.u.iter()).all(|&x| x == 0.0)
    }

    /// Per-iteration (primal, dual) residuals of the last solve, oldest first.
    pub fn residual_history(&self) -> &[Residuals] {
        &self.history
    }

    /// Refresh V = U − S/ρ.
    pub(crate) fn refresh_v(&mut self, similarity: &DMatrix<f64>, rho: f64) {
        let inv_rho = 1.0 / rho;
        self.v.copy_from(&self.u);
        self.v.zip_apply(similarity, |v, s| *v -= inv_rho * s);
    }
}
