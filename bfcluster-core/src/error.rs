//! Error types for the clustering solver.

use thiserror::Error;

/// Errors raised by the projection operators.
#[derive(Error, Debug, Clone, PartialEq)]
#[allow(missing_docs)]  // Error variant fields are self-documenting
pub enum ProjectionError {
    /// Input or eigen-decomposition produced NaN/Inf.
    #[error("non-finite values in {stage}")]
    NonFinite { stage: &'static str },

    /// Operand shape does not match the projector.
    #[error("dimension mismatch: expected {expected}x{expected}, got {rows}x{cols}")]
    DimensionMismatch { expected: usize, rows: usize, cols: usize },

    /// Target rank outside [0, n].
    #[error("target rank {k} out of range for dimension {n}")]
    RankOutOfRange { k: f64, n: usize },
}

/// Errors that can occur while computing a solution path.
#[derive(Error, Debug)]
pub enum ClusterError {
    /// An argument failed validation. Nothing was computed.
    #[error("invalid argument `{arg}`: {reason}")]
    Validation {
        /// Name of the offending argument
        arg: &'static str,
        /// Human-readable explanation
        reason: String,
    },

    /// The eigen-decomposition hit non-finite values while solving for `nclust`.
    #[error("numeric degeneracy at nclust={nclust}, iteration {iteration}: {source}")]
    NumericDegeneracy {
        /// Cluster count being solved when the failure occurred
        nclust: usize,
        /// ADMM iteration (1-based) that failed
        iteration: usize,
        /// Underlying projection failure
        #[source]
        source: ProjectionError,
    },
}

impl ClusterError {
    pub(crate) fn validation(arg: &'static str, reason: impl Into<String>) -> Self {
        ClusterError::Validation { arg, reason: reason.into() }
    }

    /// Name of the argument that failed validation, if any.
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            ClusterError::Validation { arg, .. } => Some(arg),
            ClusterError::NumericDegeneracy { .. } => None,
        }
    }
}

/// Result type for clustering operations.
pub type ClusterResult<T> = Result<T, ClusterError>;
