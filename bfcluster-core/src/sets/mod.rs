//! Constraint sets of the Birkhoff-Fantope relaxation.
//!
//! This module provides Euclidean projections and membership tests for the
//! two convex sets the ADMM splitting alternates between, plus the capped
//! simplex projection used on eigenvalues.

pub mod birkhoff;
pub mod fantope;
pub mod simplex;
pub mod traits;

pub use birkhoff::{BirkhoffInfo, BirkhoffPolytope, BirkhoffWorkspace};
pub use fantope::Fantope;
pub use simplex::{capped_simplex_threshold, project_capped_simplex, project_capped_simplex_into};
pub use traits::ConvexSet;
