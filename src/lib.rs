//! # mini-hmc
//!
//! Hamiltonian Monte Carlo built from two layers:
//!
//! - [`leapfrog`]: a symplectic, time-reversible integrator for Hamiltonian dynamics.
//! - [`hmc`]: the sampler, which proposes with the integrator and corrects the
//!   integration error with a Metropolis accept/reject step.
//!
//! Targets implement [`distributions::Target`] (potential energy and its gradient), or
//! are written with burn tensors and wrapped in [`autodiff::AutodiffTarget`].
//!
//! ```rust
//! use mini_hmc::distributions::IsotropicGaussian;
//! use mini_hmc::hmc::HamiltonianSampler;
//! use ndarray::array;
//!
//! let mut sampler = HamiltonianSampler::new(IsotropicGaussian::standard(1), array![0.0])
//!     .step_size(0.1)
//!     .set_seed(42);
//! let samples = sampler.run(1_000).unwrap();
//! assert_eq!(samples.nrows(), 1_000);
//! ```

pub mod autodiff;
pub mod distributions;
pub mod error;
pub mod euclidean;
pub mod hmc;
pub mod io;
pub mod leapfrog;
pub mod stats;

pub use error::HmcError;
pub use hmc::{sample, HamiltonianSampler};
