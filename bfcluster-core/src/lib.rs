//! bfcluster: Birkhoff-Fantope convex clustering
//!
//! Given a symmetric similarity matrix S, this library computes soft
//! co-membership matrices Z solving the convex relaxation
//!
//! ```text
//! maximize    ⟨S, Z⟩
//! subject to  Z doubly stochastic          (Birkhoff polytope)
//!             0 ⪯ Z ⪯ I,  tr(Z) = k        (rank-k Fantope)
//! ```
//!
//! for every cluster count k in a caller-supplied sequence.
//!
//! # Algorithm
//!
//! Each k is solved with **ADMM** on the consensus splitting Z = Y:
//!
//! - **Birkhoff step**: Dykstra alternating projection (row/column
//!   normalization and clipping) onto the doubly-stochastic matrices
//! - **Fantope step**: symmetric eigen-decomposition followed by a
//!   capped-simplex projection of the eigenvalues
//! - **Dual step**: scaled dual ascent on the consensus gap
//!
//! The solver state is warm-started along the path: the iterates left by one
//! k are the starting point of the next, in the order the caller gave.
//!
//! # Example
//!
//! ```no_run
//! use bfcluster_core::{cluster_path, ClusterProblem, ClusterSettings};
//! use nalgebra::DMatrix;
//!
//! // Two obvious groups {0, 1} and {2, 3}
//! let s = DMatrix::from_fn(4, 4, |i, j| if i / 2 == j / 2 { 1.0 } else { 0.0 });
//! let problem = ClusterProblem::new(s, vec![2, 3]);
//!
//! let path = cluster_path(&problem, &ClusterSettings::default())?;
//! for rec in &path {
//!     println!("k={} objective={} iters={}", rec.nclust, rec.objective, rec.iterations());
//! }
//! # Ok::<(), bfcluster_core::ClusterError>(())
//! ```

#![warn(clippy::all)]

pub mod admm;
pub mod error;
pub mod path;
pub mod problem;
pub mod sets;
pub mod util;

// Re-export main types
pub use admm::{admm_solve, AdmmState};
pub use error::{ClusterError, ClusterResult, ProjectionError};
pub use path::{cluster_path, run_path};
pub use problem::{
    ClusterProblem, ClusterSettings, SolutionPath, SolutionRecord, SolveInfo, SolveStatus,
};
pub use sets::{BirkhoffPolytope, ConvexSet, Fantope};
