//! Angular-momentum coupling symbols and their selection rules.
//!
//! Every quantum number here is passed as a number of halves, i.e. twice its
//! true value, so that half-integer spins remain exact integers. A spin of 3/2
//! is passed as `3`, a multipolarity of 2 as `4`.

use wigner_symbols::{ ClebschGordan, Wigner3jm, Wigner6j };

/// Return `true` if the three total spins `tj1`, `tj2`, `tj3` (in halves) can
/// couple, i.e. if `|j1 - j2| <= j3 <= j1 + j2` and `j1 + j2 + j3` is an
/// integer.
pub fn triangle(tj1: u32, tj2: u32, tj3: u32) -> bool {
    let (a, b, c) = (i64::from(tj1), i64::from(tj2), i64::from(tj3));
    (a - b).abs() <= c && c <= a + b && (a + b + c) % 2 == 0
}

fn proj_ok(tj: i32, tm: i32) -> bool {
    tj >= 0 && tm.abs() <= tj && (tj + tm) % 2 == 0
}

/// Return `false` if the Wigner 3j symbol
/// ```text
/// ( j1 j2 j3 )
/// ( m1 m2 m3 )
/// ```
/// vanishes by an analytic selection rule.
pub fn w3j_is_nonzero(tj1: i32, tm1: i32, tj2: i32, tm2: i32, tj3: i32, tm3: i32)
    -> bool
{
    proj_ok(tj1, tm1)
        && proj_ok(tj2, tm2)
        && proj_ok(tj3, tm3)
        && tm1 + tm2 + tm3 == 0
        && triangle(tj1 as u32, tj2 as u32, tj3 as u32)
}

/// Return `false` if the Clebsch-Gordan coefficient `<j1 m1 j2 m2 | J M>`
/// vanishes by an analytic selection rule.
pub fn cg_is_nonzero(tj1: i32, tm1: i32, tj2: i32, tm2: i32, tj12: i32, tm12: i32)
    -> bool
{
    proj_ok(tj1, tm1)
        && proj_ok(tj2, tm2)
        && proj_ok(tj12, tm12)
        && tm1 + tm2 == tm12
        && triangle(tj1 as u32, tj2 as u32, tj12 as u32)
}

/// Return `false` if the Wigner 6j symbol
/// ```text
/// { j1 j2 j3 }
/// { J1 J2 J3 }
/// ```
/// vanishes because one of its four triads fails to couple.
pub fn w6j_is_nonzero(tj1: u32, tj2: u32, tj3: u32, tJ1: u32, tJ2: u32, tJ3: u32)
    -> bool
{
    triangle(tj1, tj2, tj3)
        && triangle(tj1, tJ2, tJ3)
        && triangle(tJ1, tj2, tJ3)
        && triangle(tJ1, tJ2, tj3)
}

/// Calculate the Wigner 3j symbol with columns `(j1, m1)..(j3, m3)`.
///
/// Symbols excluded by [`w3j_is_nonzero`] are returned as exactly zero without
/// evaluation.
pub fn w3j(tj1: i32, tm1: i32, tj2: i32, tm2: i32, tj3: i32, tm3: i32) -> f64 {
    if !w3j_is_nonzero(tj1, tm1, tj2, tm2, tj3, tm3) { return 0.0; }
    Wigner3jm { tj1, tm1, tj2, tm2, tj3, tm3 }
        .value()
        .into()
}

/// Calculate the Clebsch-Gordan coefficient for the angular momentum addition
/// `(j1, m1) + (j2, m2) = (j12, m12)`.
pub fn cg(tj1: i32, tm1: i32, tj2: i32, tm2: i32, tj12: i32, tm12: i32) -> f64 {
    if !cg_is_nonzero(tj1, tm1, tj2, tm2, tj12, tm12) { return 0.0; }
    ClebschGordan { tj1, tm1, tj2, tm2, tj12, tm12 }
        .value()
        .into()
}

/// Calculate the Wigner 6j symbol for total spins (by row) `j1..J3`.
pub fn w6j(tj1: u32, tj2: u32, tj3: u32, tJ1: u32, tJ2: u32, tJ3: u32) -> f64 {
    if !w6j_is_nonzero(tj1, tj2, tj3, tJ1, tJ2, tJ3) { return 0.0; }
    Wigner6j {
        tj1: tj1 as i32,
        tj2: tj2 as i32,
        tj3: tj3 as i32,
        tj4: tJ1 as i32,
        tj5: tJ2 as i32,
        tj6: tJ3 as i32,
    }
    .value()
    .into()
}

/// `(-1)^k` for an integer `k`.
pub fn phase(k: i64) -> f64 {
    if k.rem_euclid(2) == 0 { 1.0 } else { -1.0 }
}

/// `n!` as a float.
pub fn factorial(n: u32) -> f64 {
    (2..=n).fold(1.0, |acc, k| acc * f64::from(k))
}

/// Format a total spin given in halves, e.g. `"2"` or `"3/2"`.
pub fn fmt_spin(tj: u32) -> String {
    if tj % 2 == 0 { format!("{}", tj / 2) } else { format!("{}/2", tj) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn triangle_rule() {
        assert!(triangle(2, 2, 4));
        assert!(triangle(2, 2, 0));
        assert!(!triangle(2, 2, 6));
        assert!(triangle(3, 1, 2));
        // integer and half-integer spins cannot couple to an integer
        assert!(!triangle(0, 1, 2));
    }

    #[test]
    fn known_symbols() {
        // (1 1 0; 0 0 0) = -1/sqrt(3)
        assert!((w3j(2, 0, 2, 0, 0, 0) + 1.0 / 3.0_f64.sqrt()).abs() < 1e-12);
        // <1/2 1/2 1/2 -1/2 | 1 0> = 1/sqrt(2)
        assert!((cg(1, 1, 1, -1, 2, 0) - 0.5_f64.sqrt()).abs() < 1e-12);
        // {1 1 1; 1 1 1} = 1/6
        assert!((w6j(2, 2, 2, 2, 2, 2) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn selection_rules_short_circuit() {
        assert_eq!(w3j(2, 2, 2, 2, 4, 0), 0.0);
        assert_eq!(w3j(2, 4, 2, -2, 4, -2), 0.0);
        assert_eq!(w6j(2, 2, 8, 2, 2, 2), 0.0);
        assert!(!cg_is_nonzero(2, 2, 2, 0, 4, 0));
    }

    #[test]
    fn formatting() {
        assert_eq!(fmt_spin(0), "0");
        assert_eq!(fmt_spin(4), "2");
        assert_eq!(fmt_spin(7), "7/2");
        assert_eq!(factorial(0), 1.0);
        assert_eq!(factorial(5), 120.0);
        assert_eq!(phase(-3), -1.0);
        assert_eq!(phase(4), 1.0);
    }
}
