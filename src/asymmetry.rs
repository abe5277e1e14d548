//! Scan the mixing ratios of selected transitions of a configured cascade and
//! write the polarization asymmetries at θ = 45° and 90°.
//!
//! Usage: `asymmetry [config.toml] [output.npz] [transition...]`, where the
//! transitions are counted from zero (default `0`). Output arrays:
//! `arctan_delta`, `asy_45` and `asy_90`.

use std::path::PathBuf;
use anyhow::Context;
use log::info;
use angcorr::{
    write_npz,
    angcorr::asymmetry_scan,
    config::RunConfig,
};

const N_DELTA_STEPS: usize = 101;
const ABS_DELTA_MAX: f64 = 100.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config_path: PathBuf
        = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("run.toml"));
    let outfile: PathBuf
        = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("asymmetry.npz"));
    let mut transitions: Vec<usize>
        = args.map(|s| s.parse::<usize>())
        .collect::<Result<_, _>>()
        .context("transitions must be given as non-negative integers")?;
    if transitions.is_empty() { transitions.push(0); }

    let config = RunConfig::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let cascade = config.parse_cascade()?;
    info!("scanning mixing ratios of transitions {:?} in {}", transitions, cascade);
    let scan = asymmetry_scan(&cascade, &transitions, N_DELTA_STEPS, ABS_DELTA_MAX)?;

    write_npz!(
        &outfile,
        arrays: {
            "arctan_delta" => &scan.arctan_deltas,
            "asy_45" => &scan.asy_45,
            "asy_90" => &scan.asy_90,
        }
    )
    .with_context(|| format!("writing {}", outfile.display()))?;
    info!("wrote {}", outfile.display());

    Ok(())
}
