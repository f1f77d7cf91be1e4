//! End-to-end checks of the HMC sampler on Gaussian targets.
//!
//! 1. `test_one_d_standard_normal`: a seeded 1D chain reproduces mean 0 and variance 1.
//! 2. `test_acceptance_rate`: a well-matched step size accepts most proposals.
//! 3. `test_reversibility_random_points`: the integrator retraces random phase-space points.

use approx::assert_abs_diff_eq;
use mini_hmc::distributions::{FnTarget, IsotropicGaussian, Rosenbrock2D, Target};
use mini_hmc::hmc::{sample, HamiltonianSampler};
use mini_hmc::leapfrog::integrate;
use ndarray::{array, Array1, ArrayView1, Axis};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

const SEED: u64 = 42;

#[test]
fn test_one_d_standard_normal() {
    // dV/dq = q, V(q) = q² / 2, supplied as loose functions.
    let target = FnTarget::new(
        |q: ArrayView1<f64>| 0.5 * q.dot(&q),
        |q: ArrayView1<f64>| q.to_owned(),
    );
    let mut rng = SmallRng::seed_from_u64(SEED);
    let samples = sample(1_000, &target, array![0.0].view(), 1.0, 0.1, &mut rng).unwrap();

    assert_eq!(samples.dim(), (1_000, 1));
    let mean = samples.mean().unwrap();
    let variance = samples.var_axis(Axis(0), 1.0)[0];
    assert!(mean.abs() < 0.15, "Mean deviation too large: {mean}");
    assert!(
        (variance - 1.0).abs() < 0.3,
        "Variance deviation too large: {variance}"
    );
}

#[test]
fn test_acceptance_rate() {
    let mut sampler =
        HamiltonianSampler::new(IsotropicGaussian::standard(2), array![1.0, -1.0]).set_seed(SEED);
    let (_, stats) = sampler.run_with_stats(2_000).unwrap();
    assert!(
        stats.acceptance_rate > 0.5,
        "Acceptance rate too low: {}",
        stats.acceptance_rate
    );
}

#[test]
fn test_chain_length_invariant() {
    let target = Rosenbrock2D { a: 1.0_f64, b: 20.0 };
    let mut rng = SmallRng::seed_from_u64(SEED);
    for (n, path_length, step_size) in [(1, 1.0, 0.5), (64, 0.3, 0.01), (10, 0.2, 0.2)] {
        let start = array![0.5, 0.5];
        let samples = sample(n, &target, start.view(), path_length, step_size, &mut rng).unwrap();
        assert_eq!(samples.dim(), (n, 2));
    }
}

#[test]
fn test_degenerate_step_equals_path() {
    let target = IsotropicGaussian::standard(1);
    let mut sampler = HamiltonianSampler::new(target, array![0.0])
        .path_length(0.5)
        .step_size(0.5)
        .set_seed(SEED);
    let samples = sampler.run(200).unwrap();
    assert_eq!(samples.nrows(), 200);
}

#[test]
fn test_reversibility_random_points() {
    let target = IsotropicGaussian::new(array![1.0, -2.0, 0.5, 0.0], 1.5);
    let mut rng = SmallRng::seed_from_u64(SEED);
    for _ in 0..20 {
        let q: Array1<f64> = (0..4).map(|_| StandardNormal.sample(&mut rng)).collect();
        let p: Array1<f64> = (0..4).map(|_| StandardNormal.sample(&mut rng)).collect();
        let (q_new, p_new) = integrate(q.view(), p.view(), &target, 2.0, 0.05).unwrap();
        let (q_back, p_back) = integrate(q_new.view(), p_new.view(), &target, 2.0, 0.05).unwrap();
        assert_abs_diff_eq!(q_back, q, epsilon = 1e-8);
        assert_abs_diff_eq!(p_back, p, epsilon = 1e-8);
    }
}

#[test]
fn test_shifted_gaussian_f32() {
    let target = IsotropicGaussian::new(array![2.0_f32, -3.0], 0.5);
    assert_eq!(target.dim(), Some(2));
    let mut sampler = HamiltonianSampler::new(target, array![0.0_f32, 0.0])
        .path_length(0.5)
        .step_size(0.05)
        .set_seed(SEED);
    // Burn-in run moves the chain into the bulk; the second run continues from there.
    sampler.run(200).unwrap();
    let (samples, stats) = sampler.run_with_stats(3_000).unwrap();
    assert_eq!(samples.dim(), (3_000, 2));
    assert_abs_diff_eq!(stats.mean, array![2.0, -3.0], epsilon = 0.1);
    assert_abs_diff_eq!(stats.variance, array![0.25, 0.25], epsilon = 0.1);
}
