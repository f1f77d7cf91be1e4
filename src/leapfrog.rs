//! Symplectic leapfrog (Störmer–Verlet) integration of Hamiltonian dynamics.
//!
//! With unit mass, `H(q, p) = V(q) + p·p / 2`, so `dq/dt = p` and `dp/dt = -dV/dq`.
//! [`integrate`] simulates these equations for `floor(path_length / step_size)` steps and
//! negates the final momentum, which makes the map an involution: feeding its output back
//! in returns the starting point up to rounding error.

use crate::distributions::Target;
use crate::error::{HmcError, Result};
use crate::euclidean::{check_dim, Real};
use ndarray::{Array1, ArrayView1};

/// Number of leapfrog steps, `floor(path_length / step_size)`.
pub fn n_steps<T: Real>(path_length: T, step_size: T) -> usize {
    (path_length / step_size).floor().to_usize().unwrap_or(0)
}

/// Rejects step sizes and path lengths that are not finite and strictly positive.
pub fn validate<T: Real>(path_length: T, step_size: T) -> Result<()> {
    if !(step_size.is_finite() && step_size > T::zero()) {
        return Err(HmcError::InvalidStepSize(step_size.as_f64()));
    }
    if !(path_length.is_finite() && path_length > T::zero()) {
        return Err(HmcError::InvalidPathLength(path_length.as_f64()));
    }
    Ok(())
}

/// Evaluates `dV/dq` at `q` and checks that it has the dimension of `q`.
fn gradient<T, G>(target: &G, q: &Array1<T>) -> Result<Array1<T>>
where
    T: Real,
    G: Target<T> + ?Sized,
{
    let grad = target.grad_neg_log_prob(q.view());
    check_dim("gradient", q.len(), grad.len())?;
    Ok(grad)
}

/**
Integrates Hamiltonian dynamics from `(q, p)` and returns `(q_new, -p_new)`.

The scheme is a half momentum step, `floor(L/ε) - 1` alternating full position and
momentum steps, a last full position step and a closing half momentum step. The gradient
is re-evaluated after every position update.

`q` and `p` are only read; the result is freshly allocated. When `floor(L/ε) < 2` no
interior steps run and the proposal is a single position step between two momentum
half-kicks. Non-finite gradients are not caught and propagate into the result.

# Errors

[`HmcError::DimensionMismatch`] if `q` does not match a target of fixed dimension, or if
`p` or any gradient differs in length from `q`, and
[`HmcError::InvalidStepSize`] / [`HmcError::InvalidPathLength`] for parameters that are
not finite and positive.

# Examples

```rust
use mini_hmc::distributions::IsotropicGaussian;
use mini_hmc::leapfrog::integrate;
use ndarray::array;

let target = IsotropicGaussian::standard(1);
let q = array![1.0_f64];
let p = array![0.0_f64];
let (q_new, p_new) = integrate(q.view(), p.view(), &target, 1.0, 0.1).unwrap();

// Integrating the output again returns to the start.
let (q_back, p_back) = integrate(q_new.view(), p_new.view(), &target, 1.0, 0.1).unwrap();
assert!((q_back[0] - q[0]).abs() < 1e-10);
assert!((p_back[0] - p[0]).abs() < 1e-10);
```
*/
pub fn integrate<T, G>(
    q: ArrayView1<T>,
    p: ArrayView1<T>,
    target: &G,
    path_length: T,
    step_size: T,
) -> Result<(Array1<T>, Array1<T>)>
where
    T: Real,
    G: Target<T> + ?Sized,
{
    validate(path_length, step_size)?;
    if let Some(dim) = target.dim() {
        check_dim("position", dim, q.len())?;
    }
    check_dim("momentum", q.len(), p.len())?;

    let half_step = step_size * T::constant(0.5);
    let mut q = q.to_owned();
    let mut p = p.to_owned();

    p.scaled_add(-half_step, &gradient(target, &q)?);
    for _ in 0..n_steps(path_length, step_size).saturating_sub(1) {
        q.scaled_add(step_size, &p);
        p.scaled_add(-step_size, &gradient(target, &q)?);
    }
    q.scaled_add(step_size, &p);
    p.scaled_add(-half_step, &gradient(target, &q)?);

    Ok((q, -p))
}
