//! Write the deterministic spiral point set on the unit sphere.
//!
//! Usage: `sphere_points [n] [output.npz]` (defaults `1000`,
//! `sphere_points.npz`).

use std::path::PathBuf;
use anyhow::Context;
use log::info;
use angcorr::{
    write_npz,
    sphere::SpherePointSampler,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let n: usize
        = args.next()
        .map(|s| s.parse::<usize>())
        .transpose()
        .context("number of points must be a non-negative integer")?
        .unwrap_or(1000);
    let outfile: PathBuf
        = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("sphere_points.npz"));

    let sampler = SpherePointSampler::default();
    let (theta, phi) = sampler.sample(n)?;
    let xyz = sampler.sample_cartesian(n, 1.0)?;
    write_npz!(
        &outfile,
        arrays: {
            "theta" => &theta,
            "phi" => &phi,
            "xyz" => &xyz,
        }
    )
    .with_context(|| format!("writing {}", outfile.display()))?;
    info!("wrote {} points to {}", n, outfile.display());

    Ok(())
}
