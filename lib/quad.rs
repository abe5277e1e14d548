//! One-dimensional quadrature used in tests to cross-check closed-form
//! integrals.

use ndarray as nd;
use rustc_hash::FxHashMap as HashMap;

/// Apply the trapezoidal rule to a 1D array sampled at even intervals `dx`.
///
/// Arrays with fewer than two elements integrate to zero.
pub fn trapz(y: &nd::Array1<f64>, dx: f64) -> f64 {
    let n: usize = y.len();
    if n < 2 { return 0.0; }
    dx * (0.5 * y[0] + y.slice(nd::s![1..n - 1]).sum() + 0.5 * y[n - 1])
}

/// Integrate `integrand` over `[a, b]` by Romberg's method.
///
/// Rows of the Romberg tableau are built from trapezoid estimates on
/// `2^n + 1` points for `n` up to `n_max` (default 20) until two successive
/// diagonal extrapolations agree to within `epsilon` (default `1e-12`).
/// Returns `None` if this never happens.
pub fn romberg<F>(
    integrand: F,
    a: f64,
    b: f64,
    n_max: Option<usize>,
    epsilon: Option<f64>,
) -> Option<f64>
where F: Fn(f64) -> f64
{
    let mut terms: HashMap<(usize, usize), f64> = HashMap::default();
    let n_max = n_max.unwrap_or(20);
    let epsilon = epsilon.unwrap_or(1e-12);
    let mut four_m: f64;
    let mut x: nd::Array1<f64>;
    let mut y: nd::Array1<f64>;
    for n in 0..=n_max {
        x = nd::Array1::linspace(a, b, 2_usize.pow(n as u32) + 1);
        y = x.mapv(&integrand);
        terms.insert((n, 0), trapz(&y, (b - a) / 2.0_f64.powi(n as i32)));
        for m in 1..=n {
            four_m = 4.0_f64.powi(m as i32);
            let extrap
                = (four_m * terms[&(n, m - 1)] - terms[&(n - 1, m - 1)])
                / (four_m - 1.0);
            terms.insert((n, m), extrap);
        }
        if n > 0 && (terms[&(n, n)] - terms[&(n, n - 1)]).abs() < epsilon {
            return Some(terms[&(n, n)]);
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn trapz_linear_is_exact() {
        let y: nd::Array1<f64> = nd::Array1::linspace(0.0, 1.0, 11);
        assert!((trapz(&y, 0.1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn romberg_sine() {
        let integ = romberg(f64::sin, 0.0, PI, None, None).unwrap();
        assert!((integ - 2.0).abs() < 1e-10);
    }

    #[test]
    fn romberg_gives_up() {
        assert!(romberg(|x| (1.0 / x).sin(), 1e-6, 1.0, Some(3), Some(1e-15))
            .is_none());
    }
}
