//! Error type shared by the integrator and the sampler.

use thiserror::Error;

/// Errors raised before or during a run.
///
/// Rejected proposals are not errors; they show up as repeated rows in the chain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HmcError {
    /// A vector did not have the dimension fixed by the initial position.
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    /// The leapfrog step size must be finite and strictly positive.
    #[error("step size must be finite and positive, got {0}")]
    InvalidStepSize(f64),
    /// The simulated path length must be finite and strictly positive.
    #[error("path length must be finite and positive, got {0}")]
    InvalidPathLength(f64),
    /// The initial position has no coordinates.
    #[error("initial position must have at least one dimension")]
    EmptyPosition,
    /// A covariance matrix could not be inverted.
    #[error("covariance matrix is singular (determinant {0})")]
    SingularCovariance(f64),
}

pub type Result<T> = std::result::Result<T, HmcError>;
