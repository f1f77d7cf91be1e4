/*!
Target distributions for Hamiltonian Monte Carlo and the momentum log-density.

A target supplies the potential energy `V(q) = -log π(q)` (up to a constant) and its
gradient `dV/dq`. The two must agree: if the gradient is not the derivative of the
potential, the chain still runs but does not converge to `π`.

# Examples

```rust
use mini_hmc::distributions::{IsotropicGaussian, Target};
use ndarray::array;

let target = IsotropicGaussian::standard(2);
let q = array![1.0_f64, -1.0];
assert_eq!(target.neg_log_prob(q.view()), 1.0);
assert_eq!(target.grad_neg_log_prob(q.view()), q);
```

Loose functions can be wrapped with [`FnTarget`]:

```rust
use mini_hmc::distributions::{FnTarget, Target};
use ndarray::{array, Array1, ArrayView1};

let target = FnTarget::new(
    |q: ArrayView1<f64>| 0.5 * q.dot(&q),
    |q: ArrayView1<f64>| q.to_owned(),
);
let q: Array1<f64> = array![2.0];
assert_eq!(target.neg_log_prob(q.view()), 2.0);
```
*/

use crate::error::{HmcError, Result};
use crate::euclidean::{check_dim, half_squared_norm, Real};
use ndarray::{array, Array1, Array2, ArrayView1, ArrayView2};
use std::f64::consts::PI;

/// A continuous target distribution known through its potential energy and gradient.
pub trait Target<T: Real> {
    /// Potential energy `-log π(q)`, up to an additive constant.
    fn neg_log_prob(&self, q: ArrayView1<T>) -> T;

    /// Gradient of [`Target::neg_log_prob`] at `q`. Must have the same length as `q`.
    fn grad_neg_log_prob(&self, q: ArrayView1<T>) -> Array1<T>;

    /// The dimension this target is defined for, if it is fixed.
    fn dim(&self) -> Option<usize> {
        None
    }
}

impl<T: Real, G: Target<T> + ?Sized> Target<T> for &G {
    fn neg_log_prob(&self, q: ArrayView1<T>) -> T {
        (**self).neg_log_prob(q)
    }

    fn grad_neg_log_prob(&self, q: ArrayView1<T>) -> Array1<T> {
        (**self).grad_neg_log_prob(q)
    }

    fn dim(&self) -> Option<usize> {
        (**self).dim()
    }
}

/// Elementwise log-density of the standard normal, the momentum distribution.
///
/// The kinetic energy of a momentum `p` is `-Σ standard_normal_log_density(p)`, which
/// equals `0.5 * p·p` plus a constant.
pub fn standard_normal_log_density<T: Real>(p: ArrayView1<T>) -> Array1<T> {
    let half = T::constant(0.5);
    let log_norm = T::constant(0.5 * (2.0 * PI).ln());
    p.mapv(|x| -half * x * x - log_norm)
}

/// A target built from two closures: the potential and its gradient.
#[derive(Clone, Copy)]
pub struct FnTarget<F, G> {
    neg_log_prob: F,
    grad: G,
}

impl<F, G> FnTarget<F, G> {
    pub fn new<T>(neg_log_prob: F, grad: G) -> Self
    where
        T: Real,
        F: Fn(ArrayView1<T>) -> T,
        G: Fn(ArrayView1<T>) -> Array1<T>,
    {
        Self { neg_log_prob, grad }
    }
}

impl<T, F, G> Target<T> for FnTarget<F, G>
where
    T: Real,
    F: Fn(ArrayView1<T>) -> T,
    G: Fn(ArrayView1<T>) -> Array1<T>,
{
    fn neg_log_prob(&self, q: ArrayView1<T>) -> T {
        (self.neg_log_prob)(q)
    }

    fn grad_neg_log_prob(&self, q: ArrayView1<T>) -> Array1<T> {
        (self.grad)(q)
    }
}

/**
An isotropic Gaussian with mean `mean` and standard deviation `std` in every coordinate.

`V(q) = Σ (q - μ)² / (2σ²)`, so `dV/dq = (q - μ) / σ²`.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct IsotropicGaussian<T: Real> {
    pub mean: Array1<T>,
    pub std: T,
}

impl<T: Real> IsotropicGaussian<T> {
    pub fn new(mean: Array1<T>, std: T) -> Self {
        Self { mean, std }
    }

    /// The standard normal in `dim` dimensions.
    pub fn standard(dim: usize) -> Self {
        Self::new(Array1::zeros(dim), T::one())
    }
}

impl<T: Real> Target<T> for IsotropicGaussian<T> {
    fn neg_log_prob(&self, q: ArrayView1<T>) -> T {
        let diff = &q - &self.mean;
        half_squared_norm(diff.view()) / (self.std * self.std)
    }

    fn grad_neg_log_prob(&self, q: ArrayView1<T>) -> Array1<T> {
        (&q - &self.mean) / (self.std * self.std)
    }

    fn dim(&self) -> Option<usize> {
        Some(self.mean.len())
    }
}

/**
A 2D Gaussian with a full 2×2 covariance matrix.

The covariance is inverted once in [`Gaussian2D::new`].

# Examples

```rust
use mini_hmc::distributions::{Gaussian2D, Target};
use ndarray::array;

let target = Gaussian2D::new(array![0.0_f64, 0.0], array![[4.0, 2.0], [2.0, 3.0]]).unwrap();
let grad = target.grad_neg_log_prob(array![1.0_f64, 0.0].view());
assert!((grad[0] - 0.375).abs() < 1e-12);
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Gaussian2D<T: Real> {
    mean: Array1<T>,
    cov: Array2<T>,
    precision: Array2<T>,
}

impl<T: Real> Gaussian2D<T> {
    /// # Errors
    ///
    /// [`HmcError::DimensionMismatch`] unless `mean` has length 2 and `cov` is 2×2, and
    /// [`HmcError::SingularCovariance`] when the determinant is zero or not finite.
    pub fn new(mean: Array1<T>, cov: Array2<T>) -> Result<Self> {
        check_dim("mean", 2, mean.len())?;
        check_dim("covariance rows", 2, cov.nrows())?;
        check_dim("covariance columns", 2, cov.ncols())?;
        let (a, b, c, d) = (cov[(0, 0)], cov[(0, 1)], cov[(1, 0)], cov[(1, 1)]);
        let det = a * d - b * c;
        if !det.is_finite() || det == T::zero() {
            return Err(HmcError::SingularCovariance(det.as_f64()));
        }
        let precision = array![[d, -b], [-c, a]] / det;
        Ok(Self {
            mean,
            cov,
            precision,
        })
    }

    pub fn mean(&self) -> ArrayView1<T> {
        self.mean.view()
    }

    pub fn cov(&self) -> ArrayView2<T> {
        self.cov.view()
    }
}

impl<T: Real> Target<T> for Gaussian2D<T> {
    fn neg_log_prob(&self, q: ArrayView1<T>) -> T {
        let diff = &q - &self.mean;
        diff.dot(&self.precision.dot(&diff)) * T::constant(0.5)
    }

    fn grad_neg_log_prob(&self, q: ArrayView1<T>) -> Array1<T> {
        let diff = &q - &self.mean;
        self.precision.dot(&diff)
    }

    fn dim(&self) -> Option<usize> {
        Some(2)
    }
}

/// The Rosenbrock "banana": `V(x, y) = (a - x)² + b (y - x²)²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rosenbrock2D<T: Real> {
    pub a: T,
    pub b: T,
}

impl<T: Real> Target<T> for Rosenbrock2D<T> {
    fn neg_log_prob(&self, q: ArrayView1<T>) -> T {
        let (x, y) = (q[0], q[1]);
        let valley = y - x * x;
        (self.a - x) * (self.a - x) + self.b * valley * valley
    }

    fn grad_neg_log_prob(&self, q: ArrayView1<T>) -> Array1<T> {
        let (x, y) = (q[0], q[1]);
        let two = T::constant(2.0);
        let valley = y - x * x;
        array![
            -two * (self.a - x) - two * two * self.b * x * valley,
            two * self.b * valley
        ]
    }

    fn dim(&self) -> Option<usize> {
        Some(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Central finite differences of `target.neg_log_prob` at `q`.
    fn numeric_grad<G: Target<f64>>(target: &G, q: &Array1<f64>) -> Array1<f64> {
        let h = 1e-6;
        Array1::from_shape_fn(q.len(), |i| {
            let mut up = q.clone();
            let mut down = q.clone();
            up[i] += h;
            down[i] -= h;
            (target.neg_log_prob(up.view()) - target.neg_log_prob(down.view())) / (2.0 * h)
        })
    }

    #[test]
    fn test_standard_normal_log_density() {
        let lp = standard_normal_log_density(array![0.0_f64, 1.0, -2.0].view());
        assert_abs_diff_eq!(lp[0], -0.918_938_533_204_672_7, epsilon = 1e-12);
        assert_abs_diff_eq!(lp[1], -1.418_938_533_204_672_7, epsilon = 1e-12);
        assert_abs_diff_eq!(lp[2], -2.918_938_533_204_672_7, epsilon = 1e-12);
    }

    #[test]
    fn test_kinetic_energy_matches_half_norm() {
        let p = array![0.3_f64, -1.2, 2.5];
        let from_density = -standard_normal_log_density(p.view()).sum();
        let constant = 1.5 * (2.0 * PI).ln();
        assert_abs_diff_eq!(
            from_density - constant,
            half_squared_norm(p.view()),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_isotropic_gaussian() {
        let target = IsotropicGaussian::new(array![1.0_f64, -1.0], 2.0);
        let q = array![3.0, 1.0];
        assert_abs_diff_eq!(target.neg_log_prob(q.view()), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            target.grad_neg_log_prob(q.view()),
            array![0.5, 0.5],
            epsilon = 1e-12
        );
        assert_eq!(target.dim(), Some(2));
    }

    #[test]
    fn test_gaussian_2d_gradient() {
        let target = Gaussian2D::new(array![0.5_f64, -0.5], array![[4.0, 2.0], [2.0, 3.0]]).unwrap();
        let q = array![1.3, 0.7];
        assert_abs_diff_eq!(
            target.grad_neg_log_prob(q.view()),
            numeric_grad(&target, &q),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_gaussian_2d_rejects_bad_covariance() {
        let err = Gaussian2D::new(array![0.0_f64, 0.0], Array2::eye(3)).unwrap_err();
        assert_eq!(
            err,
            HmcError::DimensionMismatch {
                context: "covariance rows",
                expected: 2,
                found: 3
            }
        );
        let err = Gaussian2D::new(array![0.0_f64], Array2::eye(2)).unwrap_err();
        assert!(matches!(
            err,
            HmcError::DimensionMismatch { context: "mean", .. }
        ));
        let singular = Gaussian2D::new(array![0.0_f64, 0.0], array![[1.0, 2.0], [2.0, 4.0]]);
        assert_eq!(singular.unwrap_err(), HmcError::SingularCovariance(0.0));
    }

    #[test]
    fn test_rosenbrock_gradient() {
        let target = Rosenbrock2D { a: 1.0_f64, b: 100.0 };
        let q = array![0.4, -0.2];
        assert_abs_diff_eq!(
            target.grad_neg_log_prob(q.view()),
            numeric_grad(&target, &q),
            epsilon = 1e-4
        );
        assert_abs_diff_eq!(target.neg_log_prob(array![1.0, 1.0].view()), 0.0);
    }

    #[test]
    fn test_fn_target_and_reference() {
        let target = FnTarget::new(
            |q: ArrayView1<f64>| q.mapv(|x| x.powi(4)).sum(),
            |q: ArrayView1<f64>| q.mapv(|x| 4.0 * x.powi(3)),
        );
        let q = array![0.5, -1.5];
        assert_abs_diff_eq!(
            target.grad_neg_log_prob(q.view()),
            numeric_grad(&target, &q),
            epsilon = 1e-5
        );
        let by_ref = &target;
        assert_eq!(Target::<f64>::dim(&by_ref), None);
        assert_abs_diff_eq!(by_ref.neg_log_prob(q.view()), 0.0625 + 5.0625);
    }
}
