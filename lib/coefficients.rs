//! Coupling coefficients of gamma-gamma angular correlations.
//!
//! All spins, multipolarities, and expansion orders are given in halves, so
//! the order `ν = 2` is passed as `two_nu = 4`. Naming follows the usual
//! literature conventions: `j_n` is the spin of the state on the far side of
//! an observed transition and `j` the one shared with the rest of the cascade.

use thiserror::Error;
use crate::{
    cascade::EMCharacter,
    spin::{ factorial, phase, w3j, w3j_is_nonzero, w6j, w6j_is_nonzero },
};

#[derive(Debug, Error)]
pub enum CoefficientError {
    #[error("polarization coefficients are undefined for expansion order ν = {0} < 2")]
    OrderTooLow(u32),
}
pub type CoefficientResult<T> = Result<T, CoefficientError>;

/// Return `false` if `F_ν(L L' j_1 j)` vanishes by the selection rules of its
/// 3j and 6j factors.
pub fn f_coef_is_nonzero(two_nu: u32, two_L: u32, two_Lp: u32, two_j1: u32, two_j: u32)
    -> bool
{
    w3j_is_nonzero(two_L as i32, 2, two_Lp as i32, -2, two_nu as i32, 0)
        && w6j_is_nonzero(two_j, two_j, two_nu, two_Lp, two_L, two_j1)
}

/// F-coefficient of Ferentz and Rosenzweig,
/// ```text
/// F_ν(L L' j_1 j) = (-1)^(j_1 + j - 1) sqrt((2L + 1)(2L' + 1)(2j + 1)(2ν + 1))
///                   ( L  L' ν ) { j  j  ν  }
///                   ( 1 -1  0 ) { L' L  j_1 }
/// ```
pub fn f_coef(two_nu: u32, two_L: u32, two_Lp: u32, two_j1: u32, two_j: u32) -> f64 {
    if !f_coef_is_nonzero(two_nu, two_L, two_Lp, two_j1, two_j) { return 0.0; }
    let w3j_val = w3j(two_L as i32, 2, two_Lp as i32, -2, two_nu as i32, 0);
    if w3j_val == 0.0 { return 0.0; }
    let w6j_val = w6j(two_j, two_j, two_nu, two_Lp, two_L, two_j1);
    if w6j_val == 0.0 { return 0.0; }
    phase(i64::from(two_j1 + two_j) / 2 - 1)
        * f64::from(
            (two_L + 1) * (two_Lp + 1) * (two_j + 1) * (two_nu + 1)
        ).sqrt()
        * w3j_val
        * w6j_val
}

/// Contribution `A_ν` of a single observed, possibly mixed, transition
/// `j_n -> j` (or `j -> j_n`) to the expansion order `ν`.
pub fn av_coef(two_nu: u32, two_L: u32, two_Lp: u32, two_jn: u32, two_j: u32, delta: f64)
    -> f64
{
    f_coef(two_nu, two_L, two_L, two_jn, two_j)
        + 2.0 * delta * f_coef(two_nu, two_L, two_Lp, two_jn, two_j)
        + delta * delta * f_coef(two_nu, two_Lp, two_Lp, two_jn, two_j)
}

fn uv_single(two_nu: u32, two_j: u32, two_L: u32, two_jp: u32) -> f64 {
    phase(i64::from(two_j + two_L + two_jp) / 2)
        * f64::from((two_j + 1) * (two_jp + 1)).sqrt()
        * w6j(two_j, two_j, two_nu, two_jp, two_jp, two_L)
}

/// Deorientation coefficient `U_ν` of an unobserved transition `j -> j'`.
///
/// The mixing ratio enters only through the weight `δ^2` of the secondary
/// multipole; interference terms vanish when the radiation is not observed.
pub fn uv_coef(
    two_nu: u32,
    two_j: u32,
    two_L: u32,
    two_Lp: u32,
    delta: f64,
    two_jp: u32,
) -> f64
{
    uv_single(two_nu, two_j, two_L, two_jp)
        + delta * delta * uv_single(two_nu, two_j, two_Lp, two_jp)
}

/// Polarization coefficient `κ_ν(L L')` of Fagg and Hanna.
pub fn kappa_coef(two_nu: u32, two_L: u32, two_Lp: u32) -> CoefficientResult<f64> {
    let nu = two_nu / 2;
    if nu < 2 { return Err(CoefficientError::OrderTooLow(nu)); }
    // the literature form uses Clebsch-Gordan coefficients; their extra
    // factors cancel in the ratio
    if !w3j_is_nonzero(two_L as i32, 2, two_Lp as i32, -2, two_nu as i32, 0) {
        return Ok(0.0);
    }
    let num = w3j(two_L as i32, 2, two_Lp as i32, 2, two_nu as i32, -4);
    let den = w3j(two_L as i32, 2, two_Lp as i32, -2, two_nu as i32, 0);
    if den == 0.0 { return Ok(0.0); }
    Ok(-(factorial(nu - 2) / factorial(nu + 2)).sqrt() * num / den)
}

/// Polarization analogue `α_ν` of [`av_coef`] for the first transition of a
/// polarization-direction correlation.
pub fn alphav_coef(
    two_nu: u32,
    two_L: u32,
    two_Lp: u32,
    two_jn: u32,
    two_j: u32,
    delta: f64,
) -> CoefficientResult<f64>
{
    Ok(
        -kappa_coef(two_nu, two_L, two_L)?
            * f_coef(two_nu, two_L, two_L, two_jn, two_j)
        + 2.0 * delta * kappa_coef(two_nu, two_L, two_Lp)?
            * f_coef(two_nu, two_L, two_Lp, two_jn, two_j)
        + delta * delta * kappa_coef(two_nu, two_Lp, two_Lp)?
            * f_coef(two_nu, two_Lp, two_Lp, two_jn, two_j)
    )
}

/// Biedenharn's `E_ν` coefficient.
///
/// Equal to `±α_ν`, where the sign is that of the primary multipole's
/// electromagnetic character (`-` for magnetic).
#[allow(clippy::too_many_arguments)]
pub fn ev_coef(
    two_nu: u32,
    em: EMCharacter,
    two_L: u32,
    emp: EMCharacter,
    two_Lp: u32,
    two_jn: u32,
    two_j: u32,
    delta: f64,
) -> CoefficientResult<f64>
{
    let nu = two_nu / 2;
    if nu < 2 { return Err(CoefficientError::OrderTooLow(nu)); }
    let nu_f = f64::from(nu);
    let nu_term = nu_f * (nu_f + 1.0);
    let l = f64::from(two_L / 2);
    let lp = f64::from(two_Lp / 2);
    let pure = |l: f64| {
        nu_term * 2.0 * l * (l + 1.0) / (nu_term - 2.0 * l * (l + 1.0))
    };
    let sum
        = em.sign() * f_coef(two_nu, two_L, two_L, two_jn, two_j) * pure(l)
        + 2.0 * delta * emp.sign()
            * f_coef(two_nu, two_L, two_Lp, two_jn, two_j)
            * (lp - l) * (lp + l + 1.0)
        + delta * delta * emp.sign()
            * f_coef(two_nu, two_Lp, two_Lp, two_jn, two_j) * pure(lp);
    Ok(sum * factorial(nu - 2) / factorial(nu + 2))
}
