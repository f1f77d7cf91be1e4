//! Targets whose gradient comes from the `burn` autodiff backend.
//!
//! Write the log-density once with burn tensor operations and wrap it in
//! [`AutodiffTarget`]; the potential `-log π(q)` and its gradient are then derived by
//! backpropagation instead of being coded by hand.
//!
//! ```rust
//! use burn::backend::{Autodiff, NdArray};
//! use burn::tensor::Tensor;
//! use burn::tensor::backend::AutodiffBackend;
//! use mini_hmc::autodiff::{AutodiffTarget, GradientTarget};
//! use mini_hmc::distributions::Target;
//! use ndarray::array;
//!
//! struct StandardNormal;
//!
//! impl<B: AutodiffBackend> GradientTarget<B> for StandardNormal {
//!     fn log_prob_tensor(&self, theta: &Tensor<B, 1>) -> Tensor<B, 1> {
//!         (theta.clone() * theta.clone()).sum().mul_scalar(-0.5)
//!     }
//! }
//!
//! let target = AutodiffTarget::<_, Autodiff<NdArray>>::new(StandardNormal);
//! let grad: ndarray::Array1<f64> = target.grad_neg_log_prob(array![1.0, -2.0].view());
//! assert!((grad[1] + 2.0).abs() < 1e-5);
//! ```

use crate::distributions::Target;
use crate::euclidean::Real;
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{Element, ElementConversion};
use ndarray::{Array1, ArrayView1};
use std::marker::PhantomData;

/// A log-density expressed with burn tensors.
///
/// # Type Parameters
///
/// * `B`: The autodiff backend from the `burn` crate.
pub trait GradientTarget<B: AutodiffBackend> {
    /// Unnormalized log-density at `theta` (shape `[D]`), as a one-element tensor.
    fn log_prob_tensor(&self, theta: &Tensor<B, 1>) -> Tensor<B, 1>;
}

/// Adapts a [`GradientTarget`] to the [`Target`] interface used by the sampler.
#[derive(Debug, Clone)]
pub struct AutodiffTarget<G, B: AutodiffBackend> {
    pub inner: G,
    device: B::Device,
    _backend: PhantomData<B>,
}

impl<G, B> AutodiffTarget<G, B>
where
    G: GradientTarget<B>,
    B: AutodiffBackend,
{
    /// Wraps `inner`, evaluating on the backend's default device.
    pub fn new(inner: G) -> Self {
        Self::with_device(inner, B::Device::default())
    }

    pub fn with_device(inner: G, device: B::Device) -> Self {
        Self {
            inner,
            device,
            _backend: PhantomData,
        }
    }

    fn position_tensor<T: Real + Element>(&self, q: ArrayView1<T>) -> Tensor<B, 1> {
        let data = TensorData::new(q.to_vec(), [q.len()]).convert::<B::FloatElem>();
        Tensor::<B, 1>::from_data(data, &self.device)
    }
}

impl<T, G, B> Target<T> for AutodiffTarget<G, B>
where
    T: Real + Element,
    G: GradientTarget<B>,
    B: AutodiffBackend,
{
    fn neg_log_prob(&self, q: ArrayView1<T>) -> T {
        let logp = self.inner.log_prob_tensor(&self.position_tensor(q));
        -logp.into_scalar().elem::<T>()
    }

    fn grad_neg_log_prob(&self, q: ArrayView1<T>) -> Array1<T> {
        let position = self.position_tensor(q).require_grad();
        let logp = self.inner.log_prob_tensor(&position);
        let grads = logp.backward();
        match position.grad(&grads) {
            // A log-density that ignores `theta` has no gradient node.
            None => Array1::zeros(q.len()),
            Some(grad) => match grad.into_data().convert::<T>().to_vec::<T>() {
                Ok(values) => Array1::from_vec(values).mapv(|g| -g),
                // Unreadable gradients become NaN so the step is rejected.
                Err(_) => Array1::from_elem(q.len(), T::nan()),
            },
        }
    }
}
