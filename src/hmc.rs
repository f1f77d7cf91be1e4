//! Hamiltonian (Hybrid) Monte Carlo.
//!
//! Each step draws a fresh standard-normal momentum, simulates Hamiltonian dynamics with the
//! leapfrog integrator and accepts the endpoint with probability `min(1, exp(H_start - H_new))`.
//! A rejected proposal repeats the current position, so the chain always grows by one row per
//! step.
//!
//! The random source is always explicit: [`sample`] takes any [`rand::Rng`], and
//! [`HamiltonianSampler`] owns a seedable [`SmallRng`].

use crate::distributions::{standard_normal_log_density, Target};
use crate::error::{HmcError, Result};
use crate::euclidean::{check_dim, standard_normal_matrix, Real};
use crate::leapfrog::{integrate, validate};
use crate::stats::{AcceptanceWindow, RunStats};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayView1};
use rand::distributions::Standard;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Default simulated time per proposal.
pub const DEFAULT_PATH_LENGTH: f64 = 1.0;
/// Default leapfrog step size.
pub const DEFAULT_STEP_SIZE: f64 = 0.5;

/// Total energy `V(q) + K(p)` of a phase-space point.
///
/// The kinetic term is the negative standard-normal log-density of `p`, summed over
/// coordinates.
pub fn hamiltonian<T, G>(target: &G, q: ArrayView1<T>, p: ArrayView1<T>) -> T
where
    T: Real,
    G: Target<T> + ?Sized,
{
    target.neg_log_prob(q) - standard_normal_log_density(p).sum()
}

/// Samples plus one accept flag per step.
struct Chain<T> {
    samples: Array2<T>,
    accepted: Vec<bool>,
}

fn check_start<T, G>(
    target: &G,
    initial_position: ArrayView1<T>,
    path_length: T,
    step_size: T,
) -> Result<()>
where
    T: Real,
    G: Target<T> + ?Sized,
{
    if initial_position.is_empty() {
        return Err(HmcError::EmptyPosition);
    }
    if let Some(dim) = target.dim() {
        check_dim("initial position", dim, initial_position.len())?;
    }
    validate(path_length, step_size)
}

fn run_chain<T, G, R, F>(
    n_samples: usize,
    target: &G,
    initial_position: ArrayView1<T>,
    path_length: T,
    step_size: T,
    rng: &mut R,
    mut on_step: F,
) -> Result<Chain<T>>
where
    T: Real,
    G: Target<T> + ?Sized,
    R: Rng,
    F: FnMut(bool),
    StandardNormal: Distribution<T>,
    Standard: Distribution<T>,
{
    check_start(target, initial_position, path_length, step_size)?;

    let dim = initial_position.len();
    // All momenta come first so the draw order is fixed for a given seed.
    let momenta: Array2<T> = standard_normal_matrix(n_samples, dim, rng);
    let mut samples = Array2::<T>::zeros((n_samples, dim));
    let mut accepted = Vec::with_capacity(n_samples);
    let mut current = initial_position.to_owned();

    for (i, momentum) in momenta.outer_iter().enumerate() {
        let (q_new, p_new) = integrate(current.view(), momentum, target, path_length, step_size)?;
        let h_start = hamiltonian(target, current.view(), momentum);
        let h_new = hamiltonian(target, q_new.view(), p_new.view());

        // NaN energies compare false and reject.
        let ln_u = rng.gen::<T>().ln();
        let accept = ln_u < h_start - h_new;
        trace!(
            "step {i}: H_start={} H_new={} accepted={accept}",
            h_start.as_f64(),
            h_new.as_f64()
        );

        if accept {
            current = q_new;
        }
        samples.row_mut(i).assign(&current);
        accepted.push(accept);
        on_step(accept);
    }

    Ok(Chain { samples, accepted })
}

/**
Draws `n_samples` positions from `target` with Hamiltonian Monte Carlo.

Returns a `[n_samples, D]` array whose row `i` is the state after step `i`; the initial
position itself is not included. `D` is fixed by `initial_position`.

All `n_samples × D` momenta are drawn from `rng` before the first step, followed by one
uniform per step for the accept test, so a seeded generator reproduces the chain exactly.

# Errors

- [`HmcError::EmptyPosition`] for a zero-dimensional start.
- [`HmcError::DimensionMismatch`] when the start disagrees with [`Target::dim`] or a
  gradient has the wrong length.
- [`HmcError::InvalidStepSize`] / [`HmcError::InvalidPathLength`] for non-positive or
  non-finite parameters.

A `step_size` equal to `path_length` is allowed; it yields a valid but poor proposal.

# Examples

```rust
use mini_hmc::distributions::IsotropicGaussian;
use mini_hmc::hmc::sample;
use ndarray::array;
use rand::rngs::SmallRng;
use rand::SeedableRng;

let target = IsotropicGaussian::standard(2);
let mut rng = SmallRng::seed_from_u64(42);
let samples = sample(100, &target, array![0.0, 0.0].view(), 1.0, 0.1, &mut rng).unwrap();
assert_eq!(samples.dim(), (100, 2));
```
*/
pub fn sample<T, G, R>(
    n_samples: usize,
    target: &G,
    initial_position: ArrayView1<T>,
    path_length: T,
    step_size: T,
    rng: &mut R,
) -> Result<Array2<T>>
where
    T: Real,
    G: Target<T> + ?Sized,
    R: Rng,
    StandardNormal: Distribution<T>,
    Standard: Distribution<T>,
{
    let chain = run_chain(
        n_samples,
        target,
        initial_position,
        path_length,
        step_size,
        rng,
        |_| {},
    )?;
    Ok(chain.samples)
}

/// A single-chain HMC sampler with its own seedable random number generator.
///
/// Successive runs continue from the last state of the previous run.
///
/// # Examples
///
/// ```rust
/// use mini_hmc::distributions::Rosenbrock2D;
/// use mini_hmc::hmc::HamiltonianSampler;
/// use ndarray::array;
///
/// let target = Rosenbrock2D { a: 1.0_f64, b: 5.0 };
/// let mut sampler = HamiltonianSampler::new(target, array![0.0, 0.0])
///     .path_length(0.5)
///     .step_size(0.05)
///     .set_seed(42);
/// let (samples, stats) = sampler.run_with_stats(200).unwrap();
/// assert_eq!(samples.nrows(), 200);
/// assert!(stats.acceptance_rate > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct HamiltonianSampler<T: Real, G> {
    /// The distribution being sampled.
    pub target: G,
    position: Array1<T>,
    path_length: T,
    step_size: T,
    rng: SmallRng,
}

impl<T, G> HamiltonianSampler<T, G>
where
    T: Real,
    G: Target<T>,
    StandardNormal: Distribution<T>,
    Standard: Distribution<T>,
{
    /// Creates a sampler starting at `initial_position` with the default path length (1.0)
    /// and step size (0.5). The generator is seeded from system entropy until
    /// [`HamiltonianSampler::set_seed`] is called.
    pub fn new(target: G, initial_position: Array1<T>) -> Self {
        Self {
            target,
            position: initial_position,
            path_length: T::constant(DEFAULT_PATH_LENGTH),
            step_size: T::constant(DEFAULT_STEP_SIZE),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Sets the simulated time per proposal.
    pub fn path_length(mut self, path_length: T) -> Self {
        self.path_length = path_length;
        self
    }

    /// Sets the leapfrog step size.
    pub fn step_size(mut self, step_size: T) -> Self {
        self.step_size = step_size;
        self
    }

    /// Reseeds the generator for reproducible runs.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Draws `n_samples` positions. See [`sample`].
    pub fn run(&mut self, n_samples: usize) -> Result<Array2<T>> {
        Ok(self.advance(n_samples, |_| {})?.samples)
    }

    /// Like [`HamiltonianSampler::run`] but also returns acceptance and moment summaries.
    pub fn run_with_stats(&mut self, n_samples: usize) -> Result<(Array2<T>, RunStats<T>)> {
        let chain = self.advance(n_samples, |_| {})?;
        Ok(Self::summarize(chain))
    }

    /// Like [`HamiltonianSampler::run_with_stats`] while drawing a progress bar whose
    /// message shows the acceptance rate over the last 100 steps.
    pub fn run_progress(&mut self, n_samples: usize) -> Result<(Array2<T>, RunStats<T>)> {
        let pb = ProgressBar::new(n_samples as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{prefix:8} {bar:40.cyan/blue} {pos}/{len} ({eta}) | {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
        );
        pb.set_prefix("HMC");

        let mut window = AcceptanceWindow::default();
        let chain = self.advance(n_samples, |accepted| {
            window.push(accepted);
            pb.set_message(format!("p(accept)≈{:.2}", window.rate()));
            pb.inc(1);
        });
        match chain {
            Ok(chain) => {
                pb.finish_with_message("Done!");
                Ok(Self::summarize(chain))
            }
            Err(err) => {
                pb.abandon_with_message(err.to_string());
                Err(err)
            }
        }
    }

    fn advance<F: FnMut(bool)>(&mut self, n_samples: usize, on_step: F) -> Result<Chain<T>> {
        let chain = run_chain(
            n_samples,
            &self.target,
            self.position.view(),
            self.path_length,
            self.step_size,
            &mut self.rng,
            on_step,
        )?;
        if let Some(last) = chain.samples.outer_iter().last() {
            self.position.assign(&last);
        }
        Ok(chain)
    }

    fn summarize(chain: Chain<T>) -> (Array2<T>, RunStats<T>) {
        let stats = RunStats::from_chain(chain.samples.view(), &chain.accepted);
        debug!("HMC run finished: {stats}");
        (chain.samples, stats)
    }

    /// The current state of the chain.
    pub fn position(&self) -> ArrayView1<'_, T> {
        self.position.view()
    }

    pub fn get_path_length(&self) -> T {
        self.path_length
    }

    pub fn get_step_size(&self) -> T {
        self.step_size
    }
}
