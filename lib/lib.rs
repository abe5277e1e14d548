#![allow(dead_code, non_snake_case, non_upper_case_globals)]

//! Angular correlations of gamma rays emitted in nuclear cascades, and
//! sampling of correlated photon directions.

pub mod utils;
pub mod spin;
#[cfg(test)]
mod quad;
pub mod legendre;
pub mod elliptic;
pub mod cascade;
pub mod coefficients;
pub mod distribution;
pub mod rotation;
pub mod angcorr;
pub mod sphere;
pub mod sampler;
pub mod notation;
pub mod config;
