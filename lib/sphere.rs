//! Deterministic, approximately uniform point sets on the unit sphere and
//! integration over them.
//!
//! The points lie on the spiral `φ = c θ` running from pole to pole, at equal
//! arc-length spacing `2π / c`. The constant `c` is chosen such that `n`
//! points exactly fill the spiral, whose total length `L(π, c)` is twice a
//! complete elliptic integral of the second kind with parameter `-c^2`.

use std::f64::consts::{ FRAC_PI_2, PI };
use log::debug;
use ndarray as nd;
use thiserror::Error;
use crate::elliptic::{ ellint_e, ellint_ec, ellint_kc };

#[derive(Debug, Error)]
pub enum SphereError {
    #[error("need at least two points on the sphere, got {0}")]
    TooFewPoints(usize),

    #[error("point index {0} out of range 1..={1}")]
    IndexOutOfRange(usize, usize),

    #[error("{0} did not converge after {1} iterations (last iterate: {2})")]
    NoConvergence(&'static str, usize, f64),
}
pub type SphereResult<T> = Result<T, SphereError>;

/// Places points on the spiral by Newton iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpherePointSampler {
    /// Absolute tolerance on successive Newton iterates.
    pub epsilon: f64,
    /// Maximum number of Newton iterations.
    pub max_iter: usize,
}

impl Default for SpherePointSampler {
    fn default() -> Self { Self { epsilon: 1e-8, max_iter: 10000 } }
}

impl SpherePointSampler {
    pub fn new(epsilon: f64, max_iter: usize) -> Self { Self { epsilon, max_iter } }

    /// Arc length of the spiral with constant `c` from the north pole down to
    /// polar angle `theta`.
    pub fn segment_length(&self, theta: f64, c: f64) -> f64 {
        let m = -c * c;
        if theta <= FRAC_PI_2 {
            ellint_e(theta, m)
        } else {
            2.0 * ellint_ec(m) - ellint_e(PI - theta, m)
        }
    }

    /// Approximate [`Self::segment_length`] by the length of a polyline
    /// through `n` equally spaced (in polar angle) points on the spiral.
    ///
    /// *Panics* if `n < 2`.
    pub fn segment_length_linear_interpolation(&self, theta: f64, c: f64, n: usize)
        -> f64
    {
        let theta_grid = nd::Array1::linspace(0.0, theta, n);
        let points = Self::spiral_points(&theta_grid, c, 1.0);
        points.outer_iter()
            .zip(points.outer_iter().skip(1))
            .map(|(a, b)| {
                let d = &b - &a;
                d.dot(&d).sqrt()
            })
            .sum()
    }

    /// Find the spiral constant `c` for `n` points, solving
    /// `c = 2 n π / L(π, c)` starting from `sqrt(n π)`.
    pub fn find_c(&self, n: usize) -> SphereResult<f64> {
        if n < 2 { return Err(SphereError::TooFewPoints(n)); }
        let n_pi = n as f64 * PI;
        let mut c = n_pi.sqrt();
        for _ in 0..self.max_iter {
            let m = -c * c;
            let e = ellint_ec(m);
            let k = ellint_kc(m);
            let c_next = c - (c * e - n_pi) / (2.0 * e - k);
            if (c_next - c).abs() < self.epsilon {
                debug!("spiral constant for {} points: c = {}", n, c_next);
                return Ok(c_next);
            }
            c = c_next;
        }
        Err(SphereError::NoConvergence("find_c", self.max_iter, c))
    }

    /// Find the polar angle of the `j`-th of `n` points (counting from 1) on
    /// the spiral with constant `c`, solving `L(Θ_j, c) = (2j - 1) π / c`.
    pub fn find_Theta_j(&self, j: usize, n: usize, c: f64) -> SphereResult<f64> {
        if n < 2 { return Err(SphereError::TooFewPoints(n)); }
        if j == 0 || j > n { return Err(SphereError::IndexOutOfRange(j, n)); }
        let target = (2 * j - 1) as f64 * PI / c;
        let mut theta
            = (1.0 - (2 * j - 1) as f64 / n as f64).clamp(-1.0, 1.0).acos();
        for _ in 0..self.max_iter {
            let slope = (1.0 + (c * theta.sin()).powi(2)).sqrt();
            let theta_next
                = (theta - (self.segment_length(theta, c) - target) / slope)
                .clamp(0.0, PI);
            if (theta_next - theta).abs() < self.epsilon {
                return Ok(theta_next);
            }
            theta = theta_next;
        }
        Err(SphereError::NoConvergence("find_Theta_j", self.max_iter, theta))
    }

    /// Sample `n` points, returning their polar angles `Θ_j` and azimuthal
    /// angles `c Θ_j`. Azimuths are not reduced modulo `2π`.
    pub fn sample(&self, n: usize)
        -> SphereResult<(nd::Array1<f64>, nd::Array1<f64>)>
    {
        let c = self.find_c(n)?;
        let theta: nd::Array1<f64>
            = (1..=n)
            .map(|j| self.find_Theta_j(j, n, c))
            .collect::<SphereResult<_>>()?;
        let phi = &theta * c;
        Ok((theta, phi))
    }

    /// Like [`Self::sample`], but return Cartesian coordinates on a sphere of
    /// radius `r` as an `n x 3` array.
    pub fn sample_cartesian(&self, n: usize, r: f64) -> SphereResult<nd::Array2<f64>> {
        let c = self.find_c(n)?;
        let theta: nd::Array1<f64>
            = (1..=n)
            .map(|j| self.find_Theta_j(j, n, c))
            .collect::<SphereResult<_>>()?;
        Ok(Self::spiral_points(&theta, c, r))
    }

    fn spiral_points(theta: &nd::Array1<f64>, c: f64, r: f64) -> nd::Array2<f64> {
        let mut points: nd::Array2<f64> = nd::Array2::zeros((theta.len(), 3));
        points.outer_iter_mut()
            .zip(theta.iter())
            .for_each(|(mut p, &t)| {
                let (st, ct) = t.sin_cos();
                let (sp, cp) = (c * t).sin_cos();
                p[0] = r * st * cp;
                p[1] = r * st * sp;
                p[2] = r * ct;
            });
        points
    }
}

/// Integrates functions over (parts of) the unit sphere by summing over a
/// spiral point set, each point standing for a solid angle of `4π / n`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SphereIntegrator {
    pub sampler: SpherePointSampler,
}

impl SphereIntegrator {
    pub fn new(sampler: SpherePointSampler) -> Self { Self { sampler } }

    /// Integrate `f(θ, φ)` over the region of the sphere where
    /// `domain(θ, φ)` is `true`, using `n` points.
    pub fn integrate<F, D>(&self, f: F, n: usize, domain: D) -> SphereResult<f64>
    where
        F: Fn(f64, f64) -> f64,
        D: Fn(f64, f64) -> bool,
    {
        let (theta, phi) = self.sampler.sample(n)?;
        let sum: f64
            = theta.iter().zip(phi.iter())
            .filter(|(t, p)| domain(**t, **p))
            .map(|(t, p)| f(*t, *p))
            .sum();
        Ok(4.0 * PI / n as f64 * sum)
    }

    /// Integrate `f(θ, φ)` over the full sphere using `n` points.
    pub fn integrate_full<F>(&self, f: F, n: usize) -> SphereResult<f64>
    where F: Fn(f64, f64) -> f64
    {
        self.integrate(f, n, |_, _| true)
    }
}
