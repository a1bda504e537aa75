// SPDX-License-Identifier: AGPL-3.0-only

//! Bracketed scalar root finding (Brent's method).
//!
//! Combines bisection, secant, and inverse quadratic interpolation
//! (Brent 1973, ch. 4; the classical `zbrent` formulation). The residual
//! is any `Fn(R) -> R`; the caller supplies a bracket with a sign change.
//! A missing sign change is an ordinary [`EosError::NoSignChange`] value
//! (no panics, no exceptions), so grid sweeps can skip a bad cell and keep
//! going.

use crate::error::EosError;
use crate::real::Real;
use crate::tolerances::{BRENT_MAX_ITER, BRENT_XTOL};

/// Find a root of `f` in [a, b].
///
/// Converges once the bracket width falls below
/// `2 ε |b| + BRENT_XTOL / 2` (relative + absolute).
///
/// # Errors
///
/// [`EosError::NoSignChange`] if f(a) and f(b) have the same sign;
/// [`EosError::MaxIterations`] if the iteration budget is exhausted
/// (does not occur for continuous residuals and valid brackets).
pub fn brent<R: Real, F: Fn(R) -> R>(f: F, a: R, b: R) -> Result<R, EosError> {
    let two = R::of(2.0);
    let half = R::of(0.5);

    let mut a = a;
    let mut b = b;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa == R::zero() {
        return Ok(a);
    }
    if fb == R::zero() {
        return Ok(b);
    }
    if (fa > R::zero()) == (fb > R::zero()) {
        return Err(EosError::NoSignChange {
            lo: a.to_f64().unwrap_or(f64::NAN),
            hi: b.to_f64().unwrap_or(f64::NAN),
        });
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..BRENT_MAX_ITER {
        if (fb > R::zero()) == (fc > R::zero()) {
            // rename so the root stays bracketed by [b, c]
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = two * R::epsilon() * b.abs() + half * R::of(BRENT_XTOL);
        let xm = half * (c - b);
        if xm.abs() <= tol1 || fb == R::zero() {
            return Ok(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // attempt secant / inverse quadratic interpolation
            let s = fb / fa;
            let (mut p, mut q);
            if a == c {
                p = two * xm * s;
                q = R::one() - s;
            } else {
                let qq = fa / fc;
                let r = fb / fc;
                p = s * (two * xm * qq * (qq - r) - (b - a) * (r - R::one()));
                q = (qq - R::one()) * (r - R::one()) * (s - R::one());
            }
            if p > R::zero() {
                q = -q;
            }
            p = p.abs();
            let min1 = R::of(3.0) * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if two * p < min1.min(min2) {
                // interpolation accepted
                e = d;
                d = p / q;
            } else {
                // interpolation too wild; bisect
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b = b + d;
        } else {
            b = b + if xm > R::zero() { tol1 } else { -tol1 };
        }
        fb = f(b);
    }

    Err(EosError::MaxIterations { iters: BRENT_MAX_ITER })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_with_double_root() {
        // f(x) = (x+3)(x-1)²; over [-4, 4/3] the sign change sits at -3,
        // with a double root at x = 1 a valid landing spot as well
        let f = |x: f64| (x + 3.0) * (x - 1.0) * (x - 1.0);
        let r = brent(f, -4.0, 4.0 / 3.0).expect("valid bracket");
        assert!(
            (r + 3.0).abs() < 1e-10 || (r - 1.0).abs() < 1e-10,
            "root = {r}"
        );
        assert!(f(r).abs() < 1e-8);
    }

    #[test]
    fn simple_root_to_machine_precision() {
        let r = brent(|x: f64| x * x - 2.0, 0.0, 2.0).expect("valid bracket");
        assert!((r - 2.0f64.sqrt()).abs() < 1e-14, "root = {r}");
    }

    #[test]
    fn endpoint_root_returned_directly() {
        let r = brent(|x: f64| x - 1.0, 1.0, 5.0).expect("endpoint root");
        assert_eq!(r, 1.0);
    }

    #[test]
    fn missing_sign_change_is_an_error() {
        let err = brent(|x: f64| x * x + 1.0, -1.0, 1.0).unwrap_err();
        assert!(matches!(err, EosError::NoSignChange { lo, hi } if lo == -1.0 && hi == 1.0));
    }

    #[test]
    fn steep_exponential_residual() {
        // shape of the charge-neutrality residual: exponential in η
        let target = 1.0e20f64;
        let f = |eta: f64| target - eta.exp();
        let r = brent(f, 0.0, 100.0).expect("valid bracket");
        assert!((r - target.ln()).abs() < 1e-12, "root = {r}");
    }

    #[test]
    fn wide_bracket_converges() {
        // brackets in η can span ~1e10; iteration budget must cover it
        let f = |x: f64| x - 12_345.678;
        let r = brent(f, -150.0, 1.0e10).expect("valid bracket");
        assert!((r - 12_345.678).abs() < 1e-5, "root = {r}");
    }

    #[test]
    fn deterministic_across_calls() {
        let f = |x: f64| x.cos() - x;
        let a = brent(f, 0.0, 1.0).unwrap();
        let b = brent(f, 0.0, 1.0).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
