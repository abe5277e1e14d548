//! Report, for every step of a configured cascade, how tight the upper limit
//! of its correlation is and how efficient rejection sampling is.
//!
//! Usage: `efficiency [config.toml] [samples]` (defaults `run.toml`,
//! `10000`).

use std::{ f64::consts::PI, path::PathBuf };
use anyhow::Context;
use angcorr::{
    config::RunConfig,
    distribution::Distribution,
    sampler::AngCorrRejectionSampler,
    sphere::SpherePointSampler,
};

const N_POINTS: usize = 10_000;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config_path: PathBuf
        = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("run.toml"));
    let samples: usize
        = args.next()
        .map(|s| s.parse::<usize>())
        .transpose()
        .context("number of samples must be a non-negative integer")?
        .unwrap_or(10_000);
    let config = RunConfig::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let sampler = config.build_sampler(0)?;
    let (theta, phi) = SpherePointSampler::default().sample(N_POINTS)?;

    println!("{:>4}  {:>10}  {:>10}  {:>10}  {:>10}  cascade", "step", "integral", "max", "limit", "efficiency");
    for k in 0..sampler.len() {
        let corr = sampler.correlation(k);
        let values: Vec<f64>
            = theta.iter().zip(phi.iter())
            .map(|(t, p)| corr.eval(*t, *p))
            .collect();
        let integral = 4.0 * PI / N_POINTS as f64 * values.iter().sum::<f64>();
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut rejection
            = AngCorrRejectionSampler::new(corr.clone(), config.stream_seed(k))
            .with_max_tries(config.max_tries);
        let efficiency = rejection.estimate_efficiency(samples);
        println!(
            "{:>4}  {:>10.6}  {:>10.6}  {:>10.6}  {:>10.6}  {}",
            k + 1, integral / (4.0 * PI), max, corr.upper_limit(), efficiency, corr.cascade(),
        );
    }

    Ok(())
}
