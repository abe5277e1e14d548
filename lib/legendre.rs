//! Legendre polynomials needed by the angular distributions.

use num_traits::Float;

/// Ordinary Legendre polynomial `P_l(x)`, by Bonnet's recursion.
pub fn legendre_p<T>(l: u32, x: T) -> T
where T: Float
{
    let one = T::one();
    if l == 0 { return one; }
    let mut p_prev = one;
    let mut p = x;
    for k in 2..=l {
        let k = T::from(k).unwrap_or_else(T::nan);
        let p_next = ((k + k - one) * x * p - (k - one) * p_prev) / k;
        p_prev = p;
        p = p_next;
    }
    p
}

/// Associated Legendre polynomial `P_l^2(x)` for `l >= 2`, with
/// `P_2^2(x) = 3 (1 - x^2)`.
///
/// Returns zero for `l < 2`.
pub fn legendre_p2<T>(l: u32, x: T) -> T
where T: Float
{
    let c = |n: u32| T::from(n).unwrap_or_else(T::nan);
    if l < 2 { return T::zero(); }
    let mut p_prev = c(3) * (T::one() - x * x);
    if l == 2 { return p_prev; }
    let mut p = c(5) * x * p_prev;
    for k in 4..=l {
        let p_next
            = (x * c(2 * k - 1) * p - c(k + 1) * p_prev) / c(k - 2);
        p_prev = p;
        p = p_next;
    }
    p
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn low_orders() {
        for k in 0..=20 {
            let x = -1.0 + 0.1 * k as f64;
            assert_eq!(legendre_p(0, x), 1.0);
            assert!((legendre_p(1, x) - x).abs() < 1e-14);
            assert!((legendre_p(2, x) - 0.5 * (3.0 * x * x - 1.0)).abs() < 1e-14);
            assert!(
                (legendre_p(4, x)
                    - (35.0 * x.powi(4) - 30.0 * x * x + 3.0) / 8.0).abs()
                < 1e-13
            );
            assert!(
                (legendre_p2(3, x) - 15.0 * x * (1.0 - x * x)).abs() < 1e-13
            );
            assert!(
                (legendre_p2(4, x)
                    - 7.5 * (7.0 * x * x - 1.0) * (1.0 - x * x)).abs()
                < 1e-12
            );
        }
    }

    #[test]
    fn endpoints() {
        for l in 0..12 {
            assert!((legendre_p(l, 1.0_f64) - 1.0).abs() < 1e-12);
            assert_eq!(legendre_p2(l, 1.0_f64), 0.0);
        }
        assert_eq!(legendre_p2(1, 0.3_f64), 0.0);
    }
}
