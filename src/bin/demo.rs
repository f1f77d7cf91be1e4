//! Samples a correlated 2D Gaussian with HMC and prints summary statistics.

use mini_hmc::distributions::Gaussian2D;
use mini_hmc::hmc::HamiltonianSampler;
use ndarray::array;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    const N_SAMPLES: usize = 20_000;
    const BURNIN: usize = 1_000;
    const SEED: u64 = 42;

    let target = Gaussian2D::new(array![0.0, 0.0], array![[2.0, 1.0], [1.0, 2.0]])?;
    let mut sampler = HamiltonianSampler::new(target, array![10.0, 12.0])
        .path_length(1.5)
        .step_size(0.1)
        .set_seed(SEED);

    // The chain starts far from the mode; later runs continue from the last state.
    sampler.run(BURNIN)?;
    let (samples, stats) = sampler.run_progress(N_SAMPLES)?;
    println!("Generated {} samples", samples.nrows());
    println!("Acceptance rate: {:.3}", stats.acceptance_rate);
    println!("Mean: ({:.2}, {:.2})", stats.mean[0], stats.mean[1]);
    println!(
        "Variance: ({:.2}, {:.2})",
        stats.variance[0], stats.variance[1]
    );

    #[cfg(feature = "csv")]
    {
        mini_hmc::io::csv::save_csv(&samples, "/tmp/hmc_gaussian_2d.csv")?;
        println!("Saved samples to /tmp/hmc_gaussian_2d.csv");
    }

    Ok(())
}

#[test]
fn test_main() {
    main().expect("Expected main to not return an error.");
}
