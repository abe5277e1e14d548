//! Incomplete elliptic integrals of the first and second kind for an arbitrary
//! real parameter `m`.
//!
//! The integrals are defined as
//! ```text
//! F(φ|m) = ∫_0^φ (1 - m sin^2 t)^(-1/2) dt
//! E(φ|m) = ∫_0^φ (1 - m sin^2 t)^(1/2) dt
//! ```
//! For `0 <= m < 1` and `|φ| <= π/2` both are computed from Carlson's
//! symmetric forms `R_F` and `R_D`. Negative parameters are mapped into
//! `[0, 1)` by the imaginary-modulus transformation (DLMF 19.7.5), parameters
//! above one by the reciprocal-modulus transformation (DLMF 19.7.4), and
//! amplitudes outside `[-π/2, π/2]` by quasi-periodicity. For `m > 1` the
//! integrals are real only while `sqrt(m) |sin φ| <= 1`; outside of that range
//! `NaN` is returned.

use std::f64::consts::{ FRAC_PI_2, PI };

/// Carlson's symmetric elliptic integral of the first kind,
/// ```text
/// R_F(x, y, z) = 1/2 ∫_0^∞ [(t + x) (t + y) (t + z)]^(-1/2) dt
/// ```
///
/// All arguments must be non-negative with at most one of them zero.
pub fn carlson_rf(x: f64, y: f64, z: f64) -> f64 {
    const ERRTOL: f64 = 8e-4;
    let (mut x, mut y, mut z) = (x, y, z);
    let (mut dx, mut dy, mut dz): (f64, f64, f64);
    let mut ave: f64;
    loop {
        let (sx, sy, sz) = (x.sqrt(), y.sqrt(), z.sqrt());
        let lambda = sx * (sy + sz) + sy * sz;
        x = 0.25 * (x + lambda);
        y = 0.25 * (y + lambda);
        z = 0.25 * (z + lambda);
        ave = (x + y + z) / 3.0;
        dx = (ave - x) / ave;
        dy = (ave - y) / ave;
        dz = (ave - z) / ave;
        if dx.abs().max(dy.abs()).max(dz.abs()) <= ERRTOL { break; }
    }
    let e2 = dx * dy - dz * dz;
    let e3 = dx * dy * dz;
    (1.0 + (e2 / 24.0 - 0.1 - 3.0 / 44.0 * e3) * e2 + e3 / 14.0) / ave.sqrt()
}

/// Carlson's symmetric elliptic integral of the second kind,
/// ```text
/// R_D(x, y, z) = 3/2 ∫_0^∞ [(t + x) (t + y)]^(-1/2) (t + z)^(-3/2) dt
/// ```
///
/// `x` and `y` must be non-negative with at most one of them zero, and `z`
/// must be positive.
pub fn carlson_rd(x: f64, y: f64, z: f64) -> f64 {
    const ERRTOL: f64 = 5e-4;
    const C1: f64 = 3.0 / 14.0;
    const C2: f64 = 1.0 / 6.0;
    const C3: f64 = 9.0 / 22.0;
    const C4: f64 = 3.0 / 26.0;
    const C5: f64 = 0.25 * C3;
    const C6: f64 = 1.5 * C4;
    let (mut x, mut y, mut z) = (x, y, z);
    let (mut dx, mut dy, mut dz): (f64, f64, f64);
    let mut ave: f64;
    let mut sum: f64 = 0.0;
    let mut fac: f64 = 1.0;
    loop {
        let (sx, sy, sz) = (x.sqrt(), y.sqrt(), z.sqrt());
        let lambda = sx * (sy + sz) + sy * sz;
        sum += fac / (sz * (z + lambda));
        fac *= 0.25;
        x = 0.25 * (x + lambda);
        y = 0.25 * (y + lambda);
        z = 0.25 * (z + lambda);
        ave = 0.2 * (x + y + 3.0 * z);
        dx = (ave - x) / ave;
        dy = (ave - y) / ave;
        dz = (ave - z) / ave;
        if dx.abs().max(dy.abs()).max(dz.abs()) <= ERRTOL { break; }
    }
    let ea = dx * dy;
    let eb = dz * dz;
    let ec = ea - eb;
    let ed = ea - 6.0 * eb;
    let ee = ed + ec + ec;
    3.0 * sum
        + fac * (
            1.0
            + ed * (-C1 + C5 * ed - C6 * dz * ee)
            + dz * (C2 * ee + dz * (-C3 * ec + dz * C4 * ea))
        ) / (ave * ave.sqrt())
}

// |φ| <= π/2 and m <= 1 (m < 1 at φ = ±π/2)
fn carlson_f(phi: f64, m: f64) -> f64 {
    let (s, c) = phi.sin_cos();
    s * carlson_rf(c * c, 1.0 - m * s * s, 1.0)
}

fn carlson_e(phi: f64, m: f64) -> f64 {
    let (s, c) = phi.sin_cos();
    let y = 1.0 - m * s * s;
    s * carlson_rf(c * c, y, 1.0)
        - m / 3.0 * s.powi(3) * carlson_rd(c * c, y, 1.0)
}

// split φ = jπ + r with |r| <= π/2, j = 0 on the closed interval
fn reduce_amplitude(phi: f64) -> (f64, f64) {
    if phi.abs() <= FRAC_PI_2 { return (0.0, phi); }
    let j = (phi / PI).round();
    (j, phi - j * PI)
}

// parameters of the imaginary-modulus transformation for m < 0: returns
// (k'_1, k_1^2, θ) with sin θ = sin φ / (k'_1 sqrt(1 - m sin^2 φ))
fn imaginary_modulus(phi: f64, m: f64) -> (f64, f64, f64) {
    let n = -m;
    let kp = (1.0 + n).sqrt().recip();
    let k2 = n / (1.0 + n);
    let s = phi.sin();
    let sin_theta = (s / (kp * (1.0 + n * s * s).sqrt())).clamp(-1.0, 1.0);
    (kp, k2, sin_theta.asin())
}

/// Incomplete elliptic integral of the first kind `F(φ|m)`.
///
/// Diverges at `m = 1`, `φ = ±π/2`.
pub fn ellint_f(phi: f64, m: f64) -> f64 {
    let (j, r) = reduce_amplitude(phi);
    if j != 0.0 {
        return 2.0 * j * ellint_f(FRAC_PI_2, m) + ellint_f(r, m);
    }
    if m < 0.0 {
        let (kp, k2, theta) = imaginary_modulus(phi, m);
        kp * carlson_f(theta, k2)
    } else if m > 1.0 {
        let k = m.sqrt();
        let sin_beta = k * phi.sin();
        if sin_beta.abs() > 1.0 { return f64::NAN; }
        carlson_f(sin_beta.asin(), m.recip()) / k
    } else {
        carlson_f(phi, m)
    }
}

/// Incomplete elliptic integral of the second kind `E(φ|m)`.
pub fn ellint_e(phi: f64, m: f64) -> f64 {
    let (j, r) = reduce_amplitude(phi);
    if m == 1.0 {
        return 2.0 * j + r.sin();
    }
    if j != 0.0 {
        return 2.0 * j * ellint_e(FRAC_PI_2, m) + ellint_e(r, m);
    }
    if m < 0.0 {
        let (kp, k2, theta) = imaginary_modulus(phi, m);
        let (s, c) = theta.sin_cos();
        (carlson_e(theta, k2) - k2 * s * c / (1.0 - k2 * s * s).sqrt()) / kp
    } else if m > 1.0 {
        let k = m.sqrt();
        let sin_beta = k * phi.sin();
        if sin_beta.abs() > 1.0 { return f64::NAN; }
        let beta = sin_beta.asin();
        let mr = m.recip();
        k * carlson_e(beta, mr) + (1.0 - m) / k * carlson_f(beta, mr)
    } else {
        carlson_e(phi, m)
    }
}

/// Complete elliptic integral of the first kind `K(m) = F(π/2|m)`.
pub fn ellint_kc(m: f64) -> f64 { ellint_f(FRAC_PI_2, m) }

/// Complete elliptic integral of the second kind `E(m) = E(π/2|m)`.
pub fn ellint_ec(m: f64) -> f64 { ellint_e(FRAC_PI_2, m) }
