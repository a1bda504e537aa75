// SPDX-License-Identifier: AGPL-3.0-only

//! Finite-difference oracle for validating analytic derivatives.
//!
//! Centered stencils of 4th/6th/8th order plus Ridders' polynomial
//! extrapolation (`adaptive_diff`, `adaptive_diff2`), which shrinks the
//! step geometrically and returns both the best estimate and an error
//! estimate. These difference an *arbitrary closure*, so every physical
//! quantity in the crate, each exposed as a pure function of its inputs,
//! can be wrapped and checked. Tests and validation binaries only; the
//! EOS itself never differences anything.

use crate::real::Real;

/// Centered 4th-order first derivative.
pub fn fourth_order_diff<R: Real, F: Fn(R) -> R>(f: F, x0: R, h: R) -> R {
    let two = R::of(2.0);
    let eight = R::of(8.0);
    (f(x0 - two * h) - eight * f(x0 - h) + eight * f(x0 + h) - f(x0 + two * h))
        / (R::of(12.0) * h)
}

/// Centered 6th-order first derivative.
pub fn sixth_order_diff<R: Real, F: Fn(R) -> R>(f: F, x0: R, h: R) -> R {
    let two = R::of(2.0);
    let three = R::of(3.0);
    (-f(x0 - three * h) + R::of(9.0) * f(x0 - two * h) - R::of(45.0) * f(x0 - h)
        + R::of(45.0) * f(x0 + h)
        - R::of(9.0) * f(x0 + two * h)
        + f(x0 + three * h))
        / (R::of(60.0) * h)
}

/// Centered 8th-order first derivative.
pub fn eighth_order_diff<R: Real, F: Fn(R) -> R>(f: F, x0: R, h: R) -> R {
    let two = R::of(2.0);
    let three = R::of(3.0);
    let four = R::of(4.0);
    (R::of(3.0) * f(x0 - four * h) - R::of(32.0) * f(x0 - three * h)
        + R::of(168.0) * f(x0 - two * h)
        - R::of(672.0) * f(x0 - h)
        + R::of(672.0) * f(x0 + h)
        - R::of(168.0) * f(x0 + two * h)
        + R::of(32.0) * f(x0 + three * h)
        - R::of(3.0) * f(x0 + four * h))
        / (R::of(840.0) * h)
}

const NTAB: usize = 10;

/// Ridders extrapolation over a shrinking-step tableau.
///
/// `base(hh)` supplies the centered estimate at step `hh`; the Neville
/// table extrapolates h → 0 and tracks the best error estimate.
fn ridders<R: Real>(mut base: impl FnMut(R) -> R, h: R) -> (R, R) {
    let con = R::of(1.4);
    let con2 = con * con;
    let safe = R::of(2.0);

    let mut a = [[R::zero(); NTAB]; NTAB];
    let mut hh = h;
    a[0][0] = base(hh);
    let mut ans = a[0][0];
    let mut err = R::max_value();

    for i in 1..NTAB {
        hh = hh / con;
        a[0][i] = base(hh);
        let mut fac = con2;
        for j in 1..=i {
            a[j][i] = (a[j - 1][i] * fac - a[j - 1][i - 1]) / (fac - R::one());
            fac = con2 * fac;
            let errt = (a[j][i] - a[j - 1][i])
                .abs()
                .max((a[j][i] - a[j - 1][i - 1]).abs());
            if errt <= err {
                err = errt;
                ans = a[j][i];
            }
        }
        if (a[i][i] - a[i - 1][i - 1]).abs() >= safe * err {
            break;
        }
    }
    (ans, err)
}

/// Adaptive first derivative: (estimate, error estimate).
///
/// `h` is the initial step; it should be large enough that f changes
/// over it (the tableau only ever shrinks it).
pub fn adaptive_diff<R: Real, F: Fn(R) -> R>(f: F, x0: R, h: R) -> (R, R) {
    let two = R::of(2.0);
    ridders(|hh| (f(x0 + hh) - f(x0 - hh)) / (two * hh), h)
}

/// Adaptive second derivative: (estimate, error estimate).
pub fn adaptive_diff2<R: Real, F: Fn(R) -> R>(f: F, x0: R, h: R) -> (R, R) {
    let two = R::of(2.0);
    let f0 = f(x0);
    ridders(|hh| (f(x0 + hh) - two * f0 + f(x0 - hh)) / (hh * hh), h)
}

#[cfg(test)]
mod tests {
    use super::*;

    // the traditional awkward test function: poles near the evaluation
    // point keep the stencils honest
    fn f1(x: f64) -> f64 {
        x.exp() / (x.sin() - x * x)
    }

    fn df1(x: f64) -> f64 {
        let sqrt2 = std::f64::consts::SQRT_2;
        let pi = std::f64::consts::PI;
        x.exp() * (-x * x + 2.0 * x - sqrt2 * (x + 0.25 * pi).cos())
            / (x * x - x.sin()).powi(2)
    }

    #[test]
    fn stencil_orders_improve() {
        let (x0, h) = (1.0, 1.0e-3);
        let exact = df1(x0);
        let e4 = ((fourth_order_diff(f1, x0, h) - exact) / exact).abs();
        let e6 = ((sixth_order_diff(f1, x0, h) - exact) / exact).abs();
        assert!(e4 < 1.0e-8, "4th order: {e4:e}");
        assert!(e6 < e4, "6th ({e6:e}) should beat 4th ({e4:e})");
        let e8 = ((eighth_order_diff(f1, x0, h) - exact) / exact).abs();
        assert!(e8 < 1.0e-11, "8th order: {e8:e}");
    }

    #[test]
    fn adaptive_first_derivative() {
        let (got, err) = adaptive_diff(f1, 1.0, 1.0e-3);
        let exact = df1(1.0);
        assert!(((got - exact) / exact).abs() < 1.0e-9, "{got} vs {exact}");
        assert!(err < 1.0e-4 * exact.abs(), "reported err = {err:e}");
    }

    #[test]
    fn adaptive_second_derivative_of_exponential() {
        // f = e^{2x}: f'' = 4 e^{2x}
        let (got, _) = adaptive_diff2(|x: f64| (2.0 * x).exp(), 0.3, 0.05);
        let exact = 4.0 * (0.6f64).exp();
        assert!(((got - exact) / exact).abs() < 1.0e-7, "{got} vs {exact}");
    }

    #[test]
    fn adaptive_handles_scaled_arguments() {
        // derivative of e^x at x = 50 with a proportional step, the way
        // the EOS sweeps use it
        let x0 = 50.0f64;
        let (got, _) = adaptive_diff(|x: f64| x.exp(), x0, 0.05 * x0);
        let exact = x0.exp();
        assert!(((got - exact) / exact).abs() < 1.0e-9);
    }

    #[test]
    fn error_estimate_brackets_true_error() {
        let (got, err) = adaptive_diff(|x: f64| x.sin(), 0.7, 1.0e-2);
        let exact = 0.7f64.cos();
        assert!((got - exact).abs() <= err.max(1.0e-13) * 10.0);
    }
}
