//! Angular distributions of the first and last photon of a cascade.
//!
//! Both distributions are expansions in Legendre polynomials of even order
//! `ν <= ν_max`, normalized such that their integral over the full solid angle
//! is `4π`. The expansion coefficients are computed once on construction.

use std::f64::consts::PI;
use log::debug;
use crate::{
    cascade::Cascade,
    coefficients::{ alphav_coef, av_coef, uv_coef, CoefficientResult },
    legendre::{ legendre_p, legendre_p2 },
    spin::factorial,
};

/// A probability density on the unit sphere in terms of the polar angle
/// `theta` and the azimuthal angle `phi`.
pub trait Distribution {
    /// Evaluate the density.
    fn eval(&self, theta: f64, phi: f64) -> f64;

    /// Return a value that the density never exceeds, or [`NO_UPPER_LIMIT`].
    fn upper_limit(&self) -> f64;
}

/// Returned by [`Distribution::upper_limit`] when no finite bound is known.
pub const NO_UPPER_LIMIT: f64 = -1.0;

/// Bare functions `(θ, φ) -> W` carry no upper limit.
impl<F> Distribution for F
where F: Fn(f64, f64) -> f64
{
    fn eval(&self, theta: f64, phi: f64) -> f64 { self(theta, phi) }

    fn upper_limit(&self) -> f64 { NO_UPPER_LIMIT }
}

/// Direction-direction correlation between the first and the last photon of a
/// cascade, independent of the azimuthal angle.
#[derive(Clone, Debug, PartialEq)]
pub struct WDirDir {
    nu_max: u32,
    normalization: f64,
    // coefficient of P_ν at index ν / 2
    coefs: Vec<f64>,
}

impl WDirDir {
    pub fn new(cascade: &Cascade) -> Self {
        let nu_max = Self::find_nu_max(cascade);
        let coefs: Vec<f64>
            = (0..=nu_max).step_by(2)
            .map(|nu| {
                Self::observed_product(cascade, 2 * nu)
                    * Self::unobserved_product(cascade, 2 * nu)
            })
            .collect();
        let normalization: f64
            = cascade.steps().iter()
            .map(|(t, _)| (1.0 + t.delta * t.delta).recip())
            .product();
        debug!(
            "direction-direction correlation for {}: nu_max = {}, coefficients = {:?}",
            cascade, nu_max, coefs,
        );
        Self { nu_max, normalization, coefs }
    }

    // ν is bounded by twice every intermediate spin and by twice the larger
    // multipolarity of both observed transitions
    fn find_nu_max(cascade: &Cascade) -> u32 {
        let first = cascade.transition(0);
        let last = cascade.transition(cascade.len() - 1);
        let spin_bound: u32
            = cascade.intermediate_states()
            .map(|s| s.two_J)
            .min()
            .unwrap_or(0);
        spin_bound
            .min(first.two_L.max(first.two_Lp))
            .min(last.two_L.max(last.two_Lp))
    }

    fn first_av(cascade: &Cascade, two_nu: u32) -> f64 {
        let t = cascade.transition(0);
        av_coef(
            two_nu, t.two_L, t.two_Lp,
            cascade.initial().two_J, cascade.state(1).two_J,
            t.delta,
        )
    }

    fn last_av(cascade: &Cascade, two_nu: u32) -> f64 {
        let n = cascade.len();
        let t = cascade.transition(n - 1);
        av_coef(
            two_nu, t.two_L, t.two_Lp,
            cascade.state(n).two_J, cascade.state(n - 1).two_J,
            t.delta,
        )
    }

    fn observed_product(cascade: &Cascade, two_nu: u32) -> f64 {
        Self::first_av(cascade, two_nu) * Self::last_av(cascade, two_nu)
    }

    fn unobserved_product(cascade: &Cascade, two_nu: u32) -> f64 {
        (1..cascade.len() - 1)
            .map(|k| {
                let t = cascade.transition(k);
                uv_coef(
                    two_nu,
                    cascade.state(k).two_J,
                    t.two_L, t.two_Lp, t.delta,
                    cascade.state(k + 1).two_J,
                )
            })
            .product()
    }

    /// Largest expansion order `ν` (not doubled) that may contribute.
    pub fn nu_max(&self) -> u32 { self.nu_max }

    /// Product of `1 / (1 + δ^2)` over all transitions.
    pub fn normalization(&self) -> f64 { self.normalization }

    /// Unnormalized coefficients of `P_ν` for `ν = 0, 2, 4, ...`.
    pub fn expansion_coefficients(&self) -> &[f64] { &self.coefs }

    /// Evaluate the correlation at polar angle `theta`.
    pub fn eval_theta(&self, theta: f64) -> f64 {
        let x = theta.cos();
        self.normalization
            * self.coefs.iter().enumerate()
            .map(|(k, c)| c * legendre_p(2 * k as u32, x))
            .sum::<f64>()
    }
}

impl Distribution for WDirDir {
    fn eval(&self, theta: f64, _phi: f64) -> f64 { self.eval_theta(theta) }

    /// Since `|P_ν| <= 1` with equality at the poles, this is the maximum
    /// whenever all terms share a sign at one of them.
    fn upper_limit(&self) -> f64 {
        self.normalization * self.coefs.iter().map(|c| c.abs()).sum::<f64>()
    }
}

/// Polarization-direction correlation: the direction-direction correlation
/// plus a `cos(2φ)` term from the linear polarization of the first photon.
#[derive(Clone, Debug, PartialEq)]
pub struct WPolDir {
    dir_dir: WDirDir,
    // coefficient of P_ν^2 at index ν / 2 - 1
    pol_coefs: Vec<f64>,
    sign: f64,
}

impl WPolDir {
    pub fn new(cascade: &Cascade) -> CoefficientResult<Self> {
        let dir_dir = WDirDir::new(cascade);
        let first = cascade.transition(0);
        let pol_coefs: Vec<f64>
            = (2..=dir_dir.nu_max).step_by(2)
            .map(|nu| -> CoefficientResult<f64> {
                let two_nu = 2 * nu;
                let alphav = alphav_coef(
                    two_nu, first.two_L, first.two_Lp,
                    cascade.initial().two_J, cascade.state(1).two_J,
                    first.delta,
                )?;
                Ok(
                    alphav
                    * WDirDir::last_av(cascade, two_nu)
                    * WDirDir::unobserved_product(cascade, two_nu)
                )
            })
            .collect::<CoefficientResult<Vec<f64>>>()?;
        let sign = first.em_charp.sign();
        debug!(
            "polarization-direction correlation for {}: polarization coefficients = {:?}, sign = {}",
            cascade, pol_coefs, sign,
        );
        Ok(Self { dir_dir, pol_coefs, sign })
    }

    /// The azimuth-independent part.
    pub fn dir_dir(&self) -> &WDirDir { &self.dir_dir }

    /// Unnormalized coefficients of `P_ν^2` for `ν = 2, 4, ...`.
    pub fn polarization_coefficients(&self) -> &[f64] { &self.pol_coefs }

    /// `-1` if the secondary multipole of the first transition is magnetic,
    /// `+1` otherwise.
    pub fn polarization_sign(&self) -> f64 { self.sign }
}

impl Distribution for WPolDir {
    fn eval(&self, theta: f64, phi: f64) -> f64 {
        let x = theta.cos();
        let pol_sum: f64
            = self.pol_coefs.iter().enumerate()
            .map(|(k, e)| e * legendre_p2(2 * k as u32 + 2, x))
            .sum();
        self.dir_dir.eval_theta(theta)
            + self.sign * (2.0 * phi).cos() * self.dir_dir.normalization * pol_sum
    }

    /// Bounds each `|P_ν^2|` by `4 π^(-3/4) sqrt((ν + 2)! / (ν - 2)!)`, so the
    /// result is not attained in general.
    fn upper_limit(&self) -> f64 {
        let bound = |nu: u32| {
            4.0 / PI.powf(0.75) * (factorial(nu + 2) / factorial(nu - 2)).sqrt()
        };
        self.dir_dir.upper_limit()
            + self.dir_dir.normalization
            * self.pol_coefs.iter().enumerate()
            .map(|(k, e)| e.abs() * bound(2 * k as u32 + 2))
            .sum::<f64>()
    }
}
