//! Run configuration, read from TOML.
//!
//! ```toml
//! cascade = "0+ 1- [0.1] 2+ 0+"
//! energies = "1.0 2.0 MeV"        # or [1.0, 2.0], in MeV
//! seed = 42
//! streams = 4
//! events = 10000
//! max_tries = 1000
//! orientation = [0.0, 0.0, 0.0]
//! output = "events.npz"
//! ```
//!
//! Only `cascade` and `energies` are required.

use std::{ fs, path::{ Path, PathBuf } };
use serde::Deserialize;
use thiserror::Error;
use crate::{
    cascade::Cascade,
    notation::{ parse_cascade, parse_energies, NotationError },
    rotation::EulerAngles,
    sampler::{ CascadeSampler, SamplerError, MAX_TRIES },
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't read config file '{0}': {1}")]
    Io(PathBuf, std::io::Error),

    #[error("malformed config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Notation(#[from] NotationError),

    #[error("{0}")]
    Sampler(#[from] SamplerError),

    #[error("expected one energy per emitted photon ({expected}), got {got}")]
    EnergyCount { expected: usize, got: usize },

    #[error("number of streams must be positive")]
    NoStreams,
}
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Photon energies, either in notation with a unit or as numbers in MeV.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Energies {
    Notation(String),
    MeV(Vec<f64>),
}

fn def_streams() -> usize { 1 }

fn def_events() -> usize { 1000 }

fn def_max_tries() -> usize { MAX_TRIES }

fn def_output() -> PathBuf { PathBuf::from("events.npz") }

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Cascade in the notation of [`crate::notation`], starting with the
    /// state excited by the unobserved first transition.
    pub cascade: String,
    /// Energies of the emitted photons, one per transition after the first.
    pub energies: Energies,
    /// Master seed.
    #[serde(default)]
    pub seed: u64,
    /// Number of independent streams.
    #[serde(default = "def_streams")]
    pub streams: usize,
    /// Number of events per stream.
    #[serde(default = "def_events")]
    pub events: usize,
    #[serde(default = "def_max_tries")]
    pub max_tries: usize,
    /// Euler angles of the symmetry axis of the first correlation.
    #[serde(default)]
    pub orientation: EulerAngles,
    #[serde(default = "def_output")]
    pub output: PathBuf,
}

impl RunConfig {
    pub fn from_toml(s: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P>(path: P) -> ConfigResult<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml(&s)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.streams == 0 { return Err(ConfigError::NoStreams); }
        let expected = self.parse_cascade()?.len() - 1;
        let got = self.parse_energies()?.len();
        if got != expected {
            return Err(ConfigError::EnergyCount { expected, got });
        }
        Ok(())
    }

    pub fn parse_cascade(&self) -> ConfigResult<Cascade> {
        Ok(parse_cascade(&self.cascade)?)
    }

    /// Photon energies in MeV.
    pub fn parse_energies(&self) -> ConfigResult<Vec<f64>> {
        match &self.energies {
            Energies::Notation(s) => Ok(parse_energies(s)?),
            Energies::MeV(e) => Ok(e.clone()),
        }
    }

    /// Seed of stream `k`.
    pub fn stream_seed(&self, k: usize) -> u64 { self.seed.wrapping_add(k as u64) }

    /// Build the sampler for stream `k`.
    pub fn build_sampler(&self, k: usize) -> ConfigResult<CascadeSampler> {
        let cascade = self.parse_cascade()?;
        let energies = self.parse_energies()?;
        let sampler
            = CascadeSampler::new(&cascade, &energies, self.orientation, self.stream_seed(k))?
            .with_max_tries(self.max_tries);
        Ok(sampler)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = RunConfig::from_toml(r#"
            cascade = "0+ 1- [0.1] 2+ 0+"
            energies = "1.0 2.0 MeV"
        "#).unwrap();
        assert_eq!(config.seed, 0);
        assert_eq!(config.streams, 1);
        assert_eq!(config.events, 1000);
        assert_eq!(config.max_tries, 1000);
        assert_eq!(config.orientation, [0.0; 3]);
        assert_eq!(config.output, PathBuf::from("events.npz"));
        assert_eq!(config.parse_energies().unwrap(), vec![1.0, 2.0]);
        assert_eq!(config.stream_seed(3), 3);
    }

    #[test]
    fn full() {
        let config = RunConfig::from_toml(r#"
            cascade = "3/2- [-0.8] 5/2+ [0.8] 3/2"
            energies = [1.5]
            seed = 7
            streams = 4
            events = 10
            max_tries = 50
            orientation = [0.0, 1.5707963267948966, 0.0]
            output = "out/run.npz"
        "#).unwrap();
        assert_eq!(config.energies, Energies::MeV(vec![1.5]));
        assert_eq!(config.stream_seed(1), 8);
        let wrapped = RunConfig { seed: u64::MAX, ..config.clone() };
        assert_eq!(wrapped.stream_seed(1), 0);
        let mut sampler = config.build_sampler(2).unwrap();
        assert_eq!(sampler.len(), 1);
        assert!(sampler.correlation(0).is_polarized());
        let ev = sampler.sample_event().unwrap();
        assert_eq!(ev.len(), 1);
    }

    #[test]
    fn errors() {
        let res = RunConfig::from_toml(r#"
            cascade = "0+ 1- 2+ 0+"
            energies = "1.0 MeV"
        "#);
        assert!(matches!(res, Err(ConfigError::EnergyCount { expected: 2, got: 1 })));
        let res = RunConfig::from_toml(r#"
            cascade = "0+ 1-"
            energies = "1.0 MeV"
        "#);
        assert!(matches!(res, Err(ConfigError::Notation(NotationError::TooFewStates(2)))));
        let res = RunConfig::from_toml(r#"
            cascade = "0+ 1- 0+"
            energies = "1.0 MeV"
            streams = 0
        "#);
        assert!(matches!(res, Err(ConfigError::NoStreams)));
        let res = RunConfig::from_toml(r#"
            cascade = "0+ 1- 0+"
            energies = "1.0 MeV"
            colour = "blue"
        "#);
        assert!(matches!(res, Err(ConfigError::Toml(_))));
        let res = RunConfig::from_file("/nonexistent/run.toml");
        assert!(matches!(res, Err(ConfigError::Io(..))));
    }
}
