//! Evaluate the angular correlation of every step of a configured cascade on
//! a regular (θ, φ) grid.
//!
//! Usage: `tabulate [config.toml] [output.npz]`.
//!
//! The first step is evaluated with the configured orientation, later steps
//! in their own frames. Output arrays: `theta`, `phi`, `w[step, θ, φ]` and
//! `upper_limit[step]`.

use std::{ f64::consts::{ PI, TAU }, path::PathBuf };
use anyhow::Context;
use itertools::Itertools;
use log::info;
use ndarray as nd;
use angcorr::{
    write_npz,
    config::RunConfig,
    distribution::Distribution,
};

const N_THETA: usize = 181;
const N_PHI: usize = 361;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config_path: PathBuf
        = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("run.toml"));
    let outfile: PathBuf
        = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("correlation.npz"));
    let config = RunConfig::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let sampler = config.build_sampler(0)?;

    let theta: nd::Array1<f64> = nd::Array1::linspace(0.0, PI, N_THETA);
    let phi: nd::Array1<f64> = nd::Array1::linspace(0.0, TAU, N_PHI);
    let mut w: nd::Array3<f64> = nd::Array3::zeros((sampler.len(), N_THETA, N_PHI));
    let mut upper_limit: nd::Array1<f64> = nd::Array1::zeros(sampler.len());
    for (k, mut w_k) in w.outer_iter_mut().enumerate() {
        let corr = sampler.correlation(k);
        info!("step {}: {}", k + 1, corr.cascade());
        let euler = if k == 0 { config.orientation } else { [0.0; 3] };
        theta.iter().enumerate()
            .cartesian_product(phi.iter().enumerate())
            .for_each(|((i, &th), (j, &ph))| {
                w_k[[i, j]] = corr.eval_rotated(th, ph, euler);
            });
        upper_limit[k] = corr.upper_limit();
    }

    write_npz!(
        &outfile,
        arrays: {
            "theta" => &theta,
            "phi" => &phi,
            "w" => &w,
            "upper_limit" => &upper_limit,
        }
    )
    .with_context(|| format!("writing {}", outfile.display()))?;
    info!("wrote {}", outfile.display());

    Ok(())
}
