// SPDX-License-Identifier: AGPL-3.0-only

//! Gauss-Legendre and Gauss-Laguerre rules for the Fermi-integral panels.
//!
//! Nodes and weights are generated at working precision by Newton
//! iteration on the classical three-term recurrences (the same
//! construction the project's reference generator uses), rather than
//! baked-in tables, so a wider `Real` gets correspondingly better rules
//! for free.
//!
//! The Laguerre weights returned here are *folded* with e^{+x}: they
//! approximate ∫₀^∞ ψ(t) dt ≈ Σ wᵢ ψ(xᵢ) directly for integrands that
//! already carry their own exponential decay, which the Fermi tail does.

use crate::real::Real;
use crate::tolerances::NODE_NEWTON_MAX_ITER;

/// P_n(z) and P_{n-1}(z) by the Legendre three-term recurrence.
fn legendre_pair<R: Real>(n: usize, z: R) -> (R, R) {
    let mut p1 = R::one();
    let mut p2 = R::zero();
    for j in 0..n {
        let p3 = p2;
        p2 = p1;
        let jf = R::of(j as f64);
        p1 = ((R::of(2.0) * jf + R::one()) * z * p2 - jf * p3) / (jf + R::one());
    }
    (p1, p2)
}

/// L_n(z) and L_{n-1}(z) by the Laguerre three-term recurrence (α = 0).
fn laguerre_pair<R: Real>(n: usize, z: R) -> (R, R) {
    let mut p1 = R::one();
    let mut p2 = R::zero();
    for j in 0..n {
        let p3 = p2;
        p2 = p1;
        let jf = R::of(j as f64);
        p1 = ((R::of(2.0) * jf + R::one() - z) * p2 - jf * p3) / (jf + R::one());
    }
    (p1, p2)
}

/// n-point Gauss-Legendre nodes and weights on [-1, 1], ascending.
#[must_use]
pub fn gauss_legendre<R: Real>(n: usize) -> (Vec<R>, Vec<R>) {
    assert!(n >= 2, "Gauss-Legendre needs at least 2 nodes");
    let mut x = vec![R::zero(); n];
    let mut w = vec![R::zero(); n];
    let nf = R::of(n as f64);
    let pi = R::of(std::f64::consts::PI);

    for i in 0..n.div_ceil(2) {
        // asymptotic root guess (A&S 22.16.6), then Newton
        let mut z = (pi * (R::of(i as f64) + R::of(0.75)) / (nf + R::of(0.5))).cos();
        for _ in 0..NODE_NEWTON_MAX_ITER {
            let (p1, p2) = legendre_pair(n, z);
            let pp = nf * (z * p1 - p2) / (z * z - R::one());
            let dz = p1 / pp;
            z = z - dz;
            if dz.abs() <= R::epsilon() * z.abs().max(R::one()) {
                break;
            }
        }
        // recompute the derivative at the settled root for the weight
        let (p1, p2) = legendre_pair(n, z);
        let pp = nf * (z * p1 - p2) / (z * z - R::one());

        x[i] = -z;
        x[n - 1 - i] = z;
        let wi = R::of(2.0) / ((R::one() - z * z) * pp * pp);
        w[i] = wi;
        w[n - 1 - i] = wi;
    }
    (x, w)
}

/// n-point Gauss-Laguerre nodes on [0, ∞) with e^{+x}-folded weights.
#[must_use]
pub fn gauss_laguerre<R: Real>(n: usize) -> (Vec<R>, Vec<R>) {
    assert!(n >= 2, "Gauss-Laguerre needs at least 2 nodes");
    let mut x = vec![R::zero(); n];
    let mut w = vec![R::zero(); n];
    let nf = R::of(n as f64);

    let mut z = R::zero();
    for i in 0..n {
        // root guesses march upward from the previous nodes (NR §4.5)
        if i == 0 {
            z = R::of(3.0) / (R::one() + R::of(2.4) * nf);
        } else if i == 1 {
            z = z + R::of(15.0) / (R::one() + R::of(2.5) * nf);
        } else {
            let ai = R::of((i - 1) as f64);
            z = z + ((R::one() + R::of(2.55) * ai) / (R::of(1.9) * ai)) * (z - x[i - 2]);
        }
        for _ in 0..NODE_NEWTON_MAX_ITER {
            let (p1, p2) = laguerre_pair(n, z);
            let pp = nf * (p1 - p2) / z;
            let dz = p1 / pp;
            z = z - dz;
            if dz.abs() <= R::epsilon() * z.abs().max(R::one()) {
                break;
            }
        }
        let (p1, p2) = laguerre_pair(n, z);
        let pp = nf * (p1 - p2) / z;

        x[i] = z;
        // unfolded weight (α = 0): w = -1/(L'_n · n · L_{n-1}); fold e^{+z}
        w[i] = -z.exp() / (pp * nf * p2);
    }
    (x, w)
}

/// Affine map of a [-1, 1] rule onto [a, b].
#[must_use]
pub fn map_to_interval<R: Real>(a: R, b: R, x: &[R], w: &[R]) -> Vec<(R, R)> {
    let half = R::of(0.5);
    let mid = half * (a + b);
    let rad = half * (b - a);
    x.iter()
        .zip(w.iter())
        .map(|(&xi, &wi)| (mid + rad * xi, rad * wi))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gl_integrate(n: usize, f: impl Fn(f64) -> f64) -> f64 {
        let (x, w) = gauss_legendre::<f64>(n);
        x.iter().zip(w.iter()).map(|(&xi, &wi)| wi * f(xi)).sum()
    }

    #[test]
    fn legendre_weights_sum_to_two() {
        for n in [2, 5, 20, 100] {
            let (_, w) = gauss_legendre::<f64>(n);
            let s: f64 = w.iter().sum();
            assert!((s - 2.0).abs() < 1e-13, "n = {n}: Σw = {s}");
        }
    }

    #[test]
    fn legendre_nodes_symmetric_and_sorted() {
        let (x, _) = gauss_legendre::<f64>(21);
        for i in 1..x.len() {
            assert!(x[i] > x[i - 1]);
        }
        for i in 0..x.len() {
            assert!((x[i] + x[x.len() - 1 - i]).abs() < 1e-15);
        }
    }

    #[test]
    fn legendre_exact_for_polynomials() {
        // a 20-node rule is exact through degree 39
        let v = gl_integrate(20, |x| x.powi(8));
        assert!((v - 2.0 / 9.0).abs() < 1e-14, "∫x⁸ = {v}");
        let odd = gl_integrate(20, |x| x.powi(7));
        assert!(odd.abs() < 1e-15);
    }

    #[test]
    fn mapped_interval_integrates_cubic() {
        let (x, w) = gauss_legendre::<f64>(10);
        let v: f64 = map_to_interval(0.0, 2.0, &x, &w)
            .into_iter()
            .map(|(xi, wi)| wi * xi * xi * xi)
            .sum();
        assert!((v - 4.0).abs() < 1e-13, "∫₀² x³ = {v}");
    }

    #[test]
    fn laguerre_reproduces_exponential_moments() {
        let (x, w) = gauss_laguerre::<f64>(40);
        // folded weights: ∫₀^∞ x^m e^{-x} dx = m!
        for (m, fact) in [(0, 1.0), (1, 1.0), (3, 6.0), (5, 120.0)] {
            let v: f64 = x
                .iter()
                .zip(w.iter())
                .map(|(&xi, &wi)| wi * xi.powi(m) * (-xi).exp())
                .sum();
            assert!((v / fact - 1.0).abs() < 1e-12, "m = {m}: {v}");
        }
    }

    #[test]
    fn laguerre_handles_faster_decay() {
        // ∫₀^∞ e^{-2x} dx = 1/2; not a Laguerre polynomial case, so this
        // probes genuine convergence of the folded rule
        let (x, w) = gauss_laguerre::<f64>(100);
        let v: f64 = x
            .iter()
            .zip(w.iter())
            .map(|(&xi, &wi)| wi * (-2.0 * xi).exp())
            .sum();
        assert!((v - 0.5).abs() < 1e-10, "{v}");
    }

    #[test]
    fn laguerre_nodes_positive_ascending() {
        let (x, w) = gauss_laguerre::<f64>(100);
        assert!(x[0] > 0.0);
        for i in 1..x.len() {
            assert!(x[i] > x[i - 1]);
        }
        assert!(w.iter().all(|&wi| wi.is_finite() && wi > 0.0));
    }
}
