//! Angular correlation of the first and last photon of a validated cascade,
//! optionally with the cascade's symmetry axis pointed in an arbitrary
//! direction.

use std::f64::consts::{ FRAC_PI_2, FRAC_PI_4 };
use log::debug;
use ndarray::{ self as nd, Dimension };
use thiserror::Error;
use crate::{
    cascade::{ Cascade, CascadeError, State, Transition },
    coefficients::CoefficientError,
    distribution::{ Distribution, WDirDir, WPolDir },
    rotation::{ EulerAngleRotation, EulerAngles },
};

#[derive(Debug, Error)]
pub enum AngCorrError {
    #[error("invalid cascade: {0}")]
    Cascade(#[from] CascadeError),

    #[error("coefficient error: {0}")]
    Coefficient(#[from] CoefficientError),

    #[error("no transition {index} in a cascade of {len} transitions")]
    NoSuchTransition { index: usize, len: usize },
}
pub type AngCorrResult<T> = Result<T, AngCorrError>;

/// The kind of correlation, fixed by whether the first transition carries
/// electromagnetic character.
#[derive(Clone, Debug, PartialEq)]
pub enum Correlation {
    DirDir(WDirDir),
    PolDir(WPolDir),
}

impl Correlation {
    fn for_cascade(cascade: &Cascade) -> AngCorrResult<Self> {
        if cascade.transition(0).em_char.is_known() {
            Ok(Self::PolDir(WPolDir::new(cascade)?))
        } else {
            Ok(Self::DirDir(WDirDir::new(cascade)))
        }
    }
}

impl Distribution for Correlation {
    fn eval(&self, theta: f64, phi: f64) -> f64 {
        match self {
            Self::DirDir(w) => w.eval(theta, phi),
            Self::PolDir(w) => w.eval(theta, phi),
        }
    }

    fn upper_limit(&self) -> f64 {
        match self {
            Self::DirDir(w) => w.upper_limit(),
            Self::PolDir(w) => w.upper_limit(),
        }
    }
}

/// A cascade together with its angular correlation.
#[derive(Clone, Debug, PartialEq)]
pub struct AngularCorrelation {
    cascade: Cascade,
    w: Correlation,
}

impl AngularCorrelation {
    /// Validate the cascade `initial -> steps...` and compute its correlation.
    pub fn new(initial: State, steps: Vec<(Transition, State)>)
        -> AngCorrResult<Self>
    {
        Self::from_cascade(Cascade::new(initial, steps)?)
    }

    pub fn from_cascade(cascade: Cascade) -> AngCorrResult<Self> {
        let w = Correlation::for_cascade(&cascade)?;
        debug!(
            "{} correlation for {}",
            if matches!(w, Correlation::PolDir(_)) { "pol-dir" } else { "dir-dir" },
            cascade,
        );
        Ok(Self { cascade, w })
    }

    pub fn cascade(&self) -> &Cascade { &self.cascade }

    pub fn correlation(&self) -> &Correlation { &self.w }

    /// `true` if the azimuth of the last photon relative to the polarization
    /// plane of the first matters.
    pub fn is_polarized(&self) -> bool { matches!(self.w, Correlation::PolDir(_)) }

    /// Evaluate the correlation with the cascade's symmetry axis rotated away
    /// from the z axis by the Euler angles `euler`.
    pub fn eval_rotated(&self, theta: f64, phi: f64, euler: EulerAngles) -> f64 {
        let (theta_c, phi_c) = EulerAngleRotation::rotate_back(theta, phi, euler);
        self.w.eval(theta_c, phi_c)
    }

    /// Polarization asymmetry at polar angle `theta`,
    /// ```text
    /// (W(θ, 0) - W(θ, π/2)) / (W(θ, 0) + W(θ, π/2))
    /// ```
    /// which vanishes for a direction-direction correlation.
    pub fn asymmetry(&self, theta: f64) -> f64 {
        let w_par = self.w.eval(theta, 0.0);
        let w_perp = self.w.eval(theta, FRAC_PI_2);
        (w_par - w_perp) / (w_par + w_perp)
    }
}

/// Polarization asymmetries at `θ = 45°` and `θ = 90°` over a grid of
/// mixing ratios.
///
/// `asy_45` and `asy_90` have one axis per scanned transition, each running
/// over `arctan_deltas`.
#[derive(Clone, Debug, PartialEq)]
pub struct AsymmetryScan {
    pub arctan_deltas: nd::Array1<f64>,
    pub asy_45: nd::ArrayD<f64>,
    pub asy_90: nd::ArrayD<f64>,
}

/// Scan the mixing ratios of the transitions `transitions` (counted from
/// zero) of `cascade` over `n_steps` values equally spaced in `arctan δ`
/// between `arctan(-abs_delta_max)` and `arctan(abs_delta_max)`, and compute
/// the polarization asymmetries at every grid point.
pub fn asymmetry_scan(
    cascade: &Cascade,
    transitions: &[usize],
    n_steps: usize,
    abs_delta_max: f64,
) -> AngCorrResult<AsymmetryScan>
{
    if let Some(&index) = transitions.iter().find(|k| **k >= cascade.len()) {
        return Err(AngCorrError::NoSuchTransition { index, len: cascade.len() });
    }
    let arctan_deltas: nd::Array1<f64>
        = nd::Array1::linspace(-abs_delta_max.atan(), abs_delta_max.atan(), n_steps);
    let shape = nd::IxDyn(&vec![n_steps; transitions.len()]);
    let mut asy_45: nd::ArrayD<f64> = nd::ArrayD::zeros(shape.clone());
    let mut asy_90: nd::ArrayD<f64> = nd::ArrayD::zeros(shape.clone());
    for idx in nd::indices(shape) {
        let mixed
            = transitions.iter().zip(idx.slice())
            .fold(cascade.clone(), |c, (&k, &i)| {
                c.with_mixing_ratio(k, arctan_deltas[i].tan())
            });
        let w = AngularCorrelation::from_cascade(mixed)?;
        asy_45[idx.slice()] = w.asymmetry(FRAC_PI_4);
        asy_90[idx.slice()] = w.asymmetry(FRAC_PI_2);
    }
    Ok(AsymmetryScan { arctan_deltas, asy_45, asy_90 })
}

impl Distribution for AngularCorrelation {
    fn eval(&self, theta: f64, phi: f64) -> f64 { self.w.eval(theta, phi) }

    fn upper_limit(&self) -> f64 { self.w.upper_limit() }
}
