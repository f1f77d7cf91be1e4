//! Scalar bounds and small vector helpers used by the integrator and the sampler.

use crate::error::{HmcError, Result};
use ndarray::{Array2, ArrayView1, LinalgScalar, ScalarOperand};
use num_traits::{Float, FromPrimitive};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::fmt::{Debug, Display};

/// Floating-point element type of positions and momenta (`f32` or `f64`).
pub trait Real:
    Float + FromPrimitive + LinalgScalar + ScalarOperand + Debug + Display + Send + Sync
{
    /// Converts a constant known to be representable, e.g. `0.5`.
    fn constant(x: f64) -> Self {
        Self::from_f64(x).unwrap_or_else(Self::nan)
    }

    /// Lossy conversion used for error payloads and log messages.
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl<T> Real for T where
    T: Float + FromPrimitive + LinalgScalar + ScalarOperand + Debug + Display + Send + Sync
{
}

/// Returns an error unless `found == expected`.
pub fn check_dim(context: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(HmcError::DimensionMismatch {
            context,
            expected,
            found,
        })
    }
}

/// Half the squared Euclidean norm, `0.5 * v·v`.
pub fn half_squared_norm<T: Real>(v: ArrayView1<T>) -> T {
    v.dot(&v) * T::constant(0.5)
}

/// Draws a `[rows, dim]` matrix of i.i.d. N(0, 1) values in row-major order.
pub fn standard_normal_matrix<T, R>(rows: usize, dim: usize, rng: &mut R) -> Array2<T>
where
    T: Real,
    R: Rng,
    StandardNormal: Distribution<T>,
{
    Array2::from_shape_simple_fn((rows, dim), || rng.sample(StandardNormal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_check_dim() {
        assert!(check_dim("momentum", 3, 3).is_ok());
        assert_eq!(
            check_dim("momentum", 3, 2),
            Err(HmcError::DimensionMismatch {
                context: "momentum",
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_half_squared_norm() {
        let v = array![1.0_f64, 2.0, 2.0];
        assert_abs_diff_eq!(half_squared_norm(v.view()), 4.5);
    }

    #[test]
    fn test_standard_normal_matrix_reproducible() {
        let a: Array2<f64> = standard_normal_matrix(4, 3, &mut SmallRng::seed_from_u64(7));
        let b: Array2<f64> = standard_normal_matrix(4, 3, &mut SmallRng::seed_from_u64(7));
        assert_eq!(a.dim(), (4, 3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_standard_normal_moments() {
        let m: Array2<f64> = standard_normal_matrix(20_000, 1, &mut SmallRng::seed_from_u64(1));
        let mean = m.mean().unwrap();
        let var = m.mapv(|x| (x - mean).powi(2)).mean().unwrap();
        assert_abs_diff_eq!(mean, 0.0, epsilon = 0.05);
        assert_abs_diff_eq!(var, 1.0, epsilon = 0.05);
    }
}
