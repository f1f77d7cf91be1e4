//! Acceptance bookkeeping and summary statistics for a finished chain.

use crate::euclidean::Real;
use ndarray::{Array1, ArrayView2, Axis};
use std::collections::VecDeque;
use std::fmt;

/// Number of recent steps the progress bar averages over.
pub const DEFAULT_WINDOW: usize = 100;

/// Sliding-window estimate of the acceptance probability.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptanceWindow {
    capacity: usize,
    queue: VecDeque<bool>,
    n_accepted: usize,
}

impl AcceptanceWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            queue: VecDeque::with_capacity(capacity.max(1)),
            n_accepted: 0,
        }
    }

    /// Records one step, dropping the oldest once the window is full.
    pub fn push(&mut self, accepted: bool) {
        if self.queue.len() == self.capacity && self.queue.pop_front() == Some(true) {
            self.n_accepted -= 1;
        }
        self.queue.push_back(accepted);
        self.n_accepted += accepted as usize;
    }

    /// Fraction of accepted steps in the window, 0 when empty.
    pub fn rate(&self) -> f64 {
        if self.queue.is_empty() {
            0.0
        } else {
            self.n_accepted as f64 / self.queue.len() as f64
        }
    }
}

impl Default for AcceptanceWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Summary of one sampling run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats<T> {
    pub n_samples: usize,
    pub n_accepted: usize,
    pub acceptance_rate: f64,
    /// Per-dimension sample mean.
    pub mean: Array1<T>,
    /// Per-dimension unbiased sample variance; zero for fewer than two samples.
    pub variance: Array1<T>,
}

impl<T: Real> RunStats<T> {
    /// Builds the summary from a `[n_samples, D]` chain and its accept flags.
    pub fn from_chain(samples: ArrayView2<T>, accepted: &[bool]) -> Self {
        let (n_samples, dim) = samples.dim();
        let n_accepted = accepted.iter().filter(|&&a| a).count();
        let acceptance_rate = if accepted.is_empty() {
            0.0
        } else {
            n_accepted as f64 / accepted.len() as f64
        };
        let mean = samples
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(dim));
        let variance = if n_samples < 2 {
            Array1::zeros(dim)
        } else {
            samples.var_axis(Axis(0), T::one())
        };
        Self {
            n_samples,
            n_accepted,
            acceptance_rate,
            mean,
            variance,
        }
    }
}

impl<T: Real> fmt::Display for RunStats<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "samples={} accepted={} p(accept)={:.3} mean={} variance={}",
            self.n_samples, self.n_accepted, self.acceptance_rate, self.mean, self.variance
        )
    }
}
