//! Sample correlated photon directions for the cascade described by a TOML
//! run configuration and write them to an `.npz` archive.
//!
//! Usage: `sample_cascade [config.toml]` (default `run.toml`).

use std::path::PathBuf;
use anyhow::Context;
use log::{ info, warn };
use ndarray as nd;
use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use angcorr::{
    mkdir,
    write_npz,
    config::RunConfig,
    sampler::Emission,
};

#[derive(Clone, Debug, Default)]
struct StreamOutput {
    event: Vec<u64>,
    emissions: Vec<Emission>,
    failed: usize,
}

fn run_stream(config: &RunConfig, k: usize) -> anyhow::Result<StreamOutput> {
    let mut sampler = config.build_sampler(k)
        .with_context(|| format!("building sampler for stream {}", k))?;
    let mut output = StreamOutput::default();
    for i in 0..config.events {
        let event_id = (k * config.events + i) as u64;
        match sampler.sample_event() {
            Some(emissions) => {
                output.event.extend(std::iter::repeat(event_id).take(emissions.len()));
                output.emissions.extend(emissions);
            },
            None => { output.failed += 1; },
        }
    }
    info!("stream {} done: {} photons", k, output.emissions.len());
    Ok(output)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path: PathBuf
        = std::env::args().nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("run.toml"));
    let config = RunConfig::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    info!(
        "sampling {} x {} events of {}",
        config.streams, config.events, config.parse_cascade()?,
    );

    let outputs: Vec<StreamOutput>
        = (0..config.streams).into_par_iter()
        .map(|k| run_stream(&config, k))
        .collect::<anyhow::Result<_>>()?;

    let failed: usize = outputs.iter().map(|out| out.failed).sum();
    if failed > 0 {
        warn!("{} events dropped after exhausting max_tries = {}", failed, config.max_tries);
    }
    let event: nd::Array1<u64>
        = outputs.iter().flat_map(|out| out.event.iter().copied()).collect();
    let emissions: Vec<&Emission>
        = outputs.iter().flat_map(|out| out.emissions.iter()).collect();
    let transition: nd::Array1<u64>
        = emissions.iter().map(|e| e.transition as u64).collect();
    let energy: nd::Array1<f64> = emissions.iter().map(|e| e.energy).collect();
    let theta: nd::Array1<f64> = emissions.iter().map(|e| e.theta).collect();
    let phi: nd::Array1<f64> = emissions.iter().map(|e| e.phi).collect();

    if let Some(outdir) = config.output.parent() {
        if !outdir.as_os_str().is_empty() {
            mkdir!(outdir)
                .with_context(|| format!("creating {}", outdir.display()))?;
        }
    }
    write_npz!(
        &config.output,
        arrays: {
            "event" => &event,
            "transition" => &transition,
            "energy" => &energy,
            "theta" => &theta,
            "phi" => &phi,
        }
    )
    .with_context(|| format!("writing {}", config.output.display()))?;
    info!("wrote {} photons to {}", energy.len(), config.output.display());

    Ok(())
}
