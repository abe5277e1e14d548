//! Rejection sampling of photon directions, for single correlations and for
//! whole cascades.
//!
//! All samplers own a seeded [`StdRng`][rnd::StdRng], so that runs are
//! reproducible and independent samplers can be used from separate threads.

use std::f64::consts::{ FRAC_PI_2, TAU };
use log::{ debug, warn };
use rand::{ prelude as rnd, Rng, SeedableRng };
use thiserror::Error;
use crate::{
    angcorr::{ AngCorrError, AngularCorrelation },
    cascade::Cascade,
    distribution::Distribution,
    rotation::{ EulerAngleRotation, EulerAngles },
};

/// Default number of candidate directions tried before giving up.
pub const MAX_TRIES: usize = 1000;

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("{0}")]
    AngCorr(#[from] AngCorrError),

    #[error("cascade sampler needs one energy per emitted photon: expected {expected}, got {got}")]
    EnergyCount { expected: usize, got: usize },
}
pub type SamplerResult<T> = Result<T, SamplerError>;

/// Draws directions `(θ, φ)` from a density on the sphere by rejection from
/// the uniform distribution, given a value the density never exceeds.
#[derive(Clone, Debug)]
pub struct SphereRejectionSampler<D> {
    distribution: D,
    distribution_maximum: f64,
    rng: rnd::StdRng,
    max_tries: usize,
}

impl<D> SphereRejectionSampler<D>
where D: Distribution
{
    pub fn new(distribution: D, distribution_maximum: f64, seed: u64) -> Self {
        Self {
            distribution,
            distribution_maximum,
            rng: rnd::StdRng::seed_from_u64(seed),
            max_tries: MAX_TRIES,
        }
    }

    /// Use the distribution's own upper limit as the rejection bound.
    ///
    /// *Panics* if the distribution reports no finite upper limit.
    pub fn from_distribution(distribution: D, seed: u64) -> Self {
        let max = distribution.upper_limit();
        if max < 0.0 {
            panic!("SphereRejectionSampler::from_distribution: no finite upper limit");
        }
        Self::new(distribution, max, seed)
    }

    pub fn with_max_tries(mut self, max_tries: usize) -> Self {
        self.max_tries = max_tries;
        self
    }

    pub fn distribution(&self) -> &D { &self.distribution }

    pub fn distribution_maximum(&self) -> f64 { self.distribution_maximum }

    pub fn max_tries(&self) -> usize { self.max_tries }

    /// Sample a direction, returning the number of candidates drawn along
    /// with it, or `None` after `max_tries` rejections.
    pub fn try_sample(&mut self) -> Option<(usize, f64, f64)> {
        for i in 0..self.max_tries {
            let theta = (2.0 * self.rng.gen::<f64>() - 1.0).acos();
            let phi = TAU * self.rng.gen::<f64>();
            let w = self.distribution_maximum * self.rng.gen::<f64>();
            if w <= self.distribution.eval(theta, phi) {
                return Some((i + 1, theta, phi));
            }
        }
        warn!("rejection sampling gave up after {} tries", self.max_tries);
        None
    }

    /// Sample a direction, returning `(tries, θ, φ)`, or `(max_tries, 0, 0)`
    /// if every candidate was rejected.
    pub fn sample(&mut self) -> (usize, f64, f64) {
        self.try_sample().unwrap_or((self.max_tries, 0.0, 0.0))
    }

    /// Like [`Self::sample`], but discard the number of tries.
    pub fn sample_direction(&mut self) -> (f64, f64) {
        let (_, theta, phi) = self.sample();
        (theta, phi)
    }

    /// Estimate the fraction of accepted candidates from `n` samples, or
    /// return zero if `n == 0`.
    pub fn estimate_efficiency(&mut self, n: usize) -> f64 {
        let tries: usize = (0..n).map(|_| self.sample().0).sum();
        if tries == 0 { 0.0 } else { n as f64 / tries as f64 }
    }
}

/// Samples the direction of the last photon of a cascade, with the cascade's
/// symmetry axis given by Euler angles.
///
/// Directions are drawn in the cascade's own frame and then rotated.
#[derive(Clone, Debug)]
pub struct AngCorrRejectionSampler {
    sampler: SphereRejectionSampler<AngularCorrelation>,
    euler: EulerAngles,
}

impl AngCorrRejectionSampler {
    pub fn new(w: AngularCorrelation, seed: u64) -> Self {
        Self::with_orientation(w, [0.0; 3], seed)
    }

    pub fn with_orientation(w: AngularCorrelation, euler: EulerAngles, seed: u64)
        -> Self
    {
        let max = w.upper_limit();
        Self { sampler: SphereRejectionSampler::new(w, max, seed), euler }
    }

    pub fn with_max_tries(self, max_tries: usize) -> Self {
        Self { sampler: self.sampler.with_max_tries(max_tries), ..self }
    }

    pub fn correlation(&self) -> &AngularCorrelation { self.sampler.distribution() }

    pub fn orientation(&self) -> EulerAngles { self.euler }

    pub fn max_tries(&self) -> usize { self.sampler.max_tries() }

    /// Sample a direction in the frame where the symmetry axis points along
    /// `euler` instead of the configured orientation.
    pub fn try_sample_oriented(&mut self, euler: EulerAngles)
        -> Option<(usize, f64, f64)>
    {
        self.sampler.try_sample()
            .map(|(tries, theta, phi)| {
                let (theta, phi) = EulerAngleRotation::rotate(theta, phi, euler);
                (tries, theta, phi)
            })
    }

    pub fn try_sample(&mut self) -> Option<(usize, f64, f64)> {
        self.try_sample_oriented(self.euler)
    }

    /// Sample a direction, returning `(tries, θ, φ)`, or `(max_tries, 0, 0)`
    /// if every candidate was rejected.
    pub fn sample(&mut self) -> (usize, f64, f64) {
        self.try_sample().unwrap_or((self.sampler.max_tries(), 0.0, 0.0))
    }

    pub fn sample_direction(&mut self) -> (f64, f64) {
        let (_, theta, phi) = self.sample();
        (theta, phi)
    }

    pub fn estimate_efficiency(&mut self, n: usize) -> f64 {
        self.sampler.estimate_efficiency(n)
    }
}

/// A photon emitted in a cascade.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Emission {
    /// Index of the emitting transition, counting the excitation as 0.
    pub transition: usize,
    pub energy: f64,
    pub theta: f64,
    pub phi: f64,
}

#[derive(Clone, Debug)]
struct CascadeStep {
    sampler: AngCorrRejectionSampler,
    energy: f64,
}

/// Samples correlated directions of all photons of a cascade whose first
/// transition is the (unobserved) excitation of the initial state.
///
/// The photon of transition `k + 1` is drawn from the correlation of
/// transitions `k` and `k + 1`. For `k = 0` this is the correlation with the
/// excitation, oriented by the configured Euler angles and including
/// polarization if the excitation carries electromagnetic character. All
/// later correlations are direction-direction correlations about the
/// direction of the previous photon.
#[derive(Clone, Debug)]
pub struct CascadeSampler {
    steps: Vec<CascadeStep>,
    orientation: EulerAngles,
}

impl CascadeSampler {
    /// Build step samplers for `cascade`, one per emitted photon, with
    /// `energies[k]` the energy of the photon of transition `k + 1`. Photons
    /// with non-positive energy are sampled but not reported.
    ///
    /// The seed of each step is drawn from an engine seeded with `seed`.
    pub fn new(
        cascade: &Cascade,
        energies: &[f64],
        orientation: EulerAngles,
        seed: u64,
    ) -> SamplerResult<Self>
    {
        let nsteps = cascade.len() - 1;
        if energies.len() != nsteps {
            return Err(SamplerError::EnergyCount {
                expected: nsteps,
                got: energies.len(),
            });
        }
        let mut rng = rnd::StdRng::seed_from_u64(seed);
        let steps: Vec<CascadeStep>
            = energies.iter().enumerate()
            .map(|(k, &energy)| -> SamplerResult<CascadeStep> {
                let first
                    = if k == 0 {
                        *cascade.transition(0)
                    } else {
                        cascade.transition(k).without_characters()
                    };
                let w = AngularCorrelation::new(
                    *cascade.state(k),
                    vec![
                        (first, *cascade.state(k + 1)),
                        (*cascade.transition(k + 1), *cascade.state(k + 2)),
                    ],
                )?;
                debug!("cascade step {}: {} (energy {} MeV)", k + 1, w.cascade(), energy);
                let sampler = AngCorrRejectionSampler::new(w, rng.gen());
                Ok(CascadeStep { sampler, energy })
            })
            .collect::<SamplerResult<_>>()?;
        Ok(Self { steps, orientation })
    }

    pub fn with_max_tries(self, max_tries: usize) -> Self {
        let steps: Vec<CascadeStep>
            = self.steps.into_iter()
            .map(|CascadeStep { sampler, energy }| {
                CascadeStep { sampler: sampler.with_max_tries(max_tries), energy }
            })
            .collect();
        Self { steps, ..self }
    }

    /// Number of sampled photons, including those with non-positive energy.
    pub fn len(&self) -> usize { self.steps.len() }

    pub fn is_empty(&self) -> bool { self.steps.is_empty() }

    /// The correlation of step `k`.
    ///
    /// *Panics* if `k >= self.len()`.
    pub fn correlation(&self, k: usize) -> &AngularCorrelation {
        self.steps[k].sampler.correlation()
    }

    /// Sample one event, returning the emitted photons with positive energy,
    /// or `None` if any step exhausted its tries.
    pub fn sample_event(&mut self) -> Option<Vec<Emission>> {
        let mut euler = self.orientation;
        let mut emissions: Vec<Emission> = Vec::with_capacity(self.steps.len());
        for (k, step) in self.steps.iter_mut().enumerate() {
            let (_, theta, phi) = step.sampler.try_sample_oriented(euler)?;
            if step.energy > 0.0 {
                emissions.push(Emission {
                    transition: k + 1,
                    energy: step.energy,
                    theta,
                    phi,
                });
            }
            euler = [0.0, theta, FRAC_PI_2 - phi];
        }
        Some(emissions)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;
    use crate::{
        cascade::{
            EMCharacter::{ self, Electric, Magnetic },
            Parity::{ self, Negative, Positive },
            State,
            Transition,
        },
        sphere::SphereIntegrator,
    };

    fn dipole_cascade() -> AngularCorrelation {
        AngularCorrelation::new(
            State::spin(0),
            vec![
                (Transition::unpolarized(2, 4, 0.0).unwrap(), State::spin(2)),
                (Transition::unpolarized(2, 4, 0.0).unwrap(), State::spin(0)),
            ],
        ).unwrap()
    }

    #[test]
    fn uniform_sampling_accepts_everything() {
        let mut sampler = SphereRejectionSampler::new(|_: f64, _: f64| 1.0, 1.0, 5);
        for _ in 0..100 {
            let (tries, theta, phi) = sampler.sample();
            assert_eq!(tries, 1);
            assert!((0.0..=PI).contains(&theta));
            assert!((0.0..TAU).contains(&phi));
        }
        assert_eq!(sampler.estimate_efficiency(100), 1.0);
    }

    #[test]
    fn exhaustion_sentinel() {
        let mut sampler
            = SphereRejectionSampler::new(|_: f64, _: f64| -1.0, 1.0, 0)
            .with_max_tries(20);
        assert_eq!(sampler.sample(), (20, 0.0, 0.0));
        assert!(sampler.try_sample().is_none());
    }

    #[test]
    fn closures_have_no_upper_limit() {
        let f = |theta: f64, _: f64| theta.cos().powi(2);
        assert!(f.upper_limit() < 0.0);
    }

    #[test]
    fn reproducible_and_distributed() {
        let mut a = SphereRejectionSampler::from_distribution(dipole_cascade(), 17);
        let mut b = SphereRejectionSampler::from_distribution(dipole_cascade(), 17);
        let n = 20_000;
        let mut cos2_sum = 0.0;
        for _ in 0..n {
            let sa = a.sample();
            assert_eq!(sa, b.sample());
            cos2_sum += sa.1.cos().powi(2);
        }
        // <cos^2> = (1/3 + 1/5) / (1 + 1/3) = 0.4 under 1 + cos^2
        assert!((cos2_sum / n as f64 - 0.4).abs() < 0.01);
        // efficiency of 3/4 (1 + cos^2) under a bound of 3/2
        let eff = a.estimate_efficiency(n);
        assert!((eff - 2.0 / 3.0).abs() < 0.02);
    }

    #[test]
    fn oriented_sampling_follows_axis() {
        // axis along +x: <x^2> = 0.4, <z^2> = 0.3
        let mut sampler = AngCorrRejectionSampler::with_orientation(
            dipole_cascade(), [0.0, FRAC_PI_2, FRAC_PI_2], 3);
        let n = 20_000;
        let (mut x2, mut z2) = (0.0, 0.0);
        for _ in 0..n {
            let (theta, phi) = sampler.sample_direction();
            x2 += (theta.sin() * phi.cos()).powi(2);
            z2 += theta.cos().powi(2);
        }
        assert!((x2 / n as f64 - 0.4).abs() < 0.01);
        assert!((z2 / n as f64 - 0.3).abs() < 0.01);
    }

    fn polarized_dipole_cascade(em: EMCharacter, emp: EMCharacter, mid: Parity)
        -> AngularCorrelation
    {
        AngularCorrelation::new(
            State::new(0, Positive),
            vec![
                (Transition::new(em, 2, emp, 4, 0.0).unwrap(), State::new(2, mid)),
                (Transition::new(em, 2, emp, 4, 0.0).unwrap(), State::new(0, Positive)),
            ],
        ).unwrap()
    }

    #[test]
    fn polarized_sampling_follows_azimuth() {
        let integrator = SphereIntegrator::default();
        let n = 20_000;
        // <sin^2 θ cos 2φ> = ∓1/5 for E1 and M1 under 1 + P_2/2 ∓ 3/4 sin^2 θ cos 2φ
        for (w, closed_form) in [
            (polarized_dipole_cascade(Electric, Magnetic, Negative), -0.2),
            (polarized_dipole_cascade(Magnetic, Electric, Positive), 0.2),
        ] {
            let expected
                = integrator.integrate_full(
                    |t, p| w.eval(t, p) * t.sin().powi(2) * (2.0 * p).cos(),
                    10_000,
                )
                .unwrap() / (4.0 * PI);
            assert!((expected - closed_form).abs() < 5e-3);
            let mut sampler = AngCorrRejectionSampler::new(w, 23);
            let mean: f64
                = (0..n)
                .map(|_| {
                    let (theta, phi) = sampler.sample_direction();
                    theta.sin().powi(2) * (2.0 * phi).cos()
                })
                .sum::<f64>() / n as f64;
            assert!((mean - expected).abs() < 0.015);
        }
    }

    #[test]
    fn efficiency_of_no_samples() {
        let mut sampler = SphereRejectionSampler::new(|_: f64, _: f64| 1.0, 1.0, 0);
        assert_eq!(sampler.estimate_efficiency(0), 0.0);
    }

    fn four_level_cascade() -> Cascade {
        Cascade::new(
            State::new(0, Positive),
            vec![
                (Transition::unpolarized(2, 4, 0.0).unwrap(), State::spin(2)),
                (Transition::unpolarized(2, 4, 0.0).unwrap(), State::spin(4)),
                (Transition::unpolarized(4, 6, 0.0).unwrap(), State::spin(0)),
            ],
        ).unwrap()
    }

    #[test]
    fn cascade_energy_count() {
        let res = CascadeSampler::new(&four_level_cascade(), &[1.0], [0.0; 3], 0);
        assert!(matches!(res, Err(SamplerError::EnergyCount { expected: 2, got: 1 })));
    }

    #[test]
    fn cascade_events() {
        let cascade = four_level_cascade();
        let mut a = CascadeSampler::new(&cascade, &[1.2, 0.0], [0.0; 3], 99).unwrap();
        let mut b = CascadeSampler::new(&cascade, &[1.2, 0.0], [0.0; 3], 99).unwrap();
        assert_eq!(a.len(), 2);
        assert!(!a.correlation(1).is_polarized());
        for _ in 0..50 {
            let ev = a.sample_event().unwrap();
            assert_eq!(ev.len(), 1);
            assert_eq!(ev[0].transition, 1);
            assert_eq!(ev[0].energy, 1.2);
            assert_eq!(Some(ev), b.sample_event());
        }
    }

    #[test]
    fn cascade_exhaustion() {
        let mut sampler
            = CascadeSampler::new(&four_level_cascade(), &[1.0, 2.0], [0.0; 3], 1)
            .unwrap()
            .with_max_tries(0);
        assert!(sampler.sample_event().is_none());
    }
}
