// SPDX-License-Identifier: AGPL-3.0-only

//! Generalized Fermi-Dirac integrals with analytic derivative propagation.
//!
//! F_k(η, β) = ∫₀^∞ x^k √(1 + βx/2) / (e^{x-η} + 1) dx
//!
//! for k ∈ {-1/2, 1/2, 3/2, 5/2}, degeneracy parameter η, and relativity
//! parameter β ∝ kT/m_e c². Partial derivatives in η and β up to third
//! order are obtained by integrating the *symbolically differentiated*
//! integrand with the identical panel/node layout, never by differencing
//! F, so F and every partial share a single quadrature truncation error
//! and stay mutually consistent to machine precision.
//!
//! Domain split per `BreakPoints` (Aparicio 1998): [0,s1] under the x = z²
//! substitution (absorbs the x^k endpoint singularity, k = -1/2 included),
//! [s1,s2] and [s2,s3] plain Gauss-Legendre, [s3,∞) Gauss-Laguerre with
//! e^{+x}-folded weights riding the integrand's own exponential decay.
//!
//! References: Gong, Zejda, Däppen & Aparicio, Comput. Phys. Commun. 136,
//! 294 (2001); Aparicio, ApJS 117, 627 (1998).

use crate::breakpoints::BreakPoints;
use crate::quadrature::{gauss_laguerre, gauss_legendre, map_to_interval};
use crate::real::Real;
use crate::tolerances::QUADRATURE_POINTS;

/// Occupation factor 1/(e^t + 1), branch-safe against overflow of e^t.
#[inline]
fn fermi_factor<R: Real>(t: R) -> R {
    if t > R::zero() {
        let e = (-t).exp();
        e / (R::one() + e)
    } else {
        R::one() / (R::one() + t.exp())
    }
}

/// One generalized Fermi-Dirac integral and its η/β partials.
///
/// Construct with (k, η, β), then call [`evaluate`](Self::evaluate); the
/// value and the partials up to the requested order are then fixed. Fields
/// beyond the requested order stay zero. Re-evaluation at a different
/// order simply recomputes everything.
#[derive(Debug, Clone, Copy)]
pub struct FermiIntegral<R> {
    /// Index k of the integral.
    pub k: R,
    /// Degeneracy parameter.
    pub eta: R,
    /// Relativity parameter (≥ 0).
    pub beta: R,

    /// F_k(η, β). Non-negative for all valid inputs.
    pub f: R,
    /// ∂F/∂η
    pub df_deta: R,
    /// ∂F/∂β
    pub df_dbeta: R,
    /// ∂²F/∂η²
    pub d2f_deta2: R,
    /// ∂²F/∂η∂β
    pub d2f_detadbeta: R,
    /// ∂²F/∂β²
    pub d2f_dbeta2: R,
    /// ∂³F/∂η³
    pub d3f_deta3: R,
    /// ∂³F/∂η²∂β
    pub d3f_deta2dbeta: R,
    /// ∂³F/∂η∂β²
    pub d3f_detadbeta2: R,
    /// ∂³F/∂β³
    pub d3f_dbeta3: R,
}

impl<R: Real> FermiIntegral<R> {
    #[must_use]
    pub fn new(k: R, eta: R, beta: R) -> Self {
        let z = R::zero();
        Self {
            k,
            eta,
            beta,
            f: z,
            df_deta: z,
            df_dbeta: z,
            d2f_deta2: z,
            d2f_detadbeta: z,
            d2f_dbeta2: z,
            d3f_deta3: z,
            d3f_deta2dbeta: z,
            d3f_detadbeta2: z,
            d3f_dbeta3: z,
        }
    }

    /// Convenience: construct and evaluate in one step.
    #[must_use]
    pub fn evaluated(k: R, eta: R, beta: R, order: usize) -> Self {
        let mut fi = Self::new(k, eta, beta);
        fi.evaluate(order);
        fi
    }

    /// Evaluate F (order 0) and its partials up to `order` (≤ 3).
    ///
    /// # Panics
    ///
    /// Panics if `order > 3`.
    pub fn evaluate(&mut self, order: usize) {
        assert!(order <= 3, "derivative order must be 0..=3");

        let (s1, s2, s3) = BreakPoints::for_eta(self.eta).get_points(self.eta);
        let (gx, gw) = gauss_legendre::<R>(QUADRATURE_POINTS);
        let (lx, lw) = gauss_laguerre::<R>(QUADRATURE_POINTS);

        let k = self.k;
        let eta = self.eta;
        let beta = self.beta;

        let mut acc = [R::zero(); 10];
        let mut add = |x: R, w: R| {
            let fd = fermi_factor(x - eta);
            let sq = (R::one() + R::of(0.5) * beta * x).sqrt();
            let xk = x.powf(k);

            acc[0] += w * xk * sq * fd;
            if order >= 1 {
                let fd1 = fd * (R::one() - fd);
                let q1 = xk * x / (R::of(4.0) * sq);
                acc[1] += w * xk * sq * fd1;
                acc[2] += w * q1 * fd;
                if order >= 2 {
                    let fd2 = fd1 * (R::one() - R::of(2.0) * fd);
                    let q2 = xk * x * x / (R::of(16.0) * sq * sq * sq);
                    acc[3] += w * xk * sq * fd2;
                    acc[4] += w * q1 * fd1;
                    acc[5] += -w * q2 * fd;
                    if order >= 3 {
                        let fd3 =
                            fd1 * (R::one() - R::of(6.0) * fd + R::of(6.0) * fd * fd);
                        let q3 = R::of(3.0) * xk * x * x * x
                            / (R::of(64.0) * sq * sq * sq * sq * sq);
                        acc[6] += w * xk * sq * fd3;
                        acc[7] += w * q1 * fd2;
                        acc[8] += -w * q2 * fd1;
                        acc[9] += w * q3 * fd;
                    }
                }
            }
        };

        // [0, s1] under x = z²: dx = 2z dz removes the x^k singularity
        for (z, w) in map_to_interval(R::zero(), s1.sqrt(), &gx, &gw) {
            add(z * z, R::of(2.0) * z * w);
        }
        // [s1, s2] and [s2, s3]
        for (x, w) in map_to_interval(s1, s2, &gx, &gw) {
            add(x, w);
        }
        for (x, w) in map_to_interval(s2, s3, &gx, &gw) {
            add(x, w);
        }
        // [s3, ∞): folded Laguerre, x = s3 + t
        for (&t, &w) in lx.iter().zip(lw.iter()) {
            add(s3 + t, w);
        }

        self.f = acc[0];
        self.df_deta = acc[1];
        self.df_dbeta = acc[2];
        self.d2f_deta2 = acc[3];
        self.d2f_detadbeta = acc[4];
        self.d2f_dbeta2 = acc[5];
        self.d3f_deta3 = acc[6];
        self.d3f_deta2dbeta = acc[7];
        self.d3f_detadbeta2 = acc[8];
        self.d3f_dbeta3 = acc[9];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerances::{FERMI_DERIV1_REL, FERMI_VALUE_REL};

    #[test]
    fn occupation_factor_branches() {
        assert!((fermi_factor(0.0f64) - 0.5).abs() < 1e-15);
        // deep tail: e^t overflows, the branch must not
        assert_eq!(fermi_factor(800.0f64), 0.0);
        assert_eq!(fermi_factor(-800.0f64), 1.0);
        let a = fermi_factor(3.0f64);
        let b = fermi_factor(-3.0f64);
        assert!((a + b - 1.0).abs() < 1e-15, "f(t) + f(-t) = 1");
    }

    #[test]
    fn nondegenerate_limit_is_maxwell_boltzmann() {
        // η ≪ 0, β = 0: F_k → Γ(k+1) e^η
        let fi = FermiIntegral::evaluated(0.5f64, -50.0, 0.0, 1);
        let gamma_3_2 = 0.886_226_925_452_758;
        let expect = gamma_3_2 * (-50.0f64).exp();
        assert!(f64::rel_error(fi.f, expect) < 1e-12, "F = {:e}", fi.f);
        // in the same limit ∂F/∂η = F
        assert!(f64::rel_error(fi.df_deta, fi.f) < 1e-12);
    }

    #[test]
    fn reference_spot_value_moderate_degeneracy() {
        // Gong et al. cross-check: k = 1/2, η = 1, β = 10
        let fi = FermiIntegral::evaluated(0.5f64, 1.0, 10.0, 2);
        assert!(f64::rel_error(fi.f, 4.309_312_153_061_272_4) < FERMI_VALUE_REL);
        assert!(f64::rel_error(fi.df_deta, 3.090_991_756_275_642_4) < FERMI_DERIV1_REL);
        assert!(f64::rel_error(fi.df_dbeta, 0.190_029_587_621_341_78) < FERMI_DERIV1_REL);
    }

    #[test]
    fn non_negative_across_the_domain() {
        for k in [-0.5f64, 0.5, 1.5, 2.5] {
            for eta in [-100.0f64, -10.0, 0.0, 10.0, 100.0, 1.0e4] {
                for beta in [1.0e-7f64, 1.0e-3, 1.0, 100.0] {
                    let fi = FermiIntegral::evaluated(k, eta, beta, 0);
                    assert!(
                        fi.f >= 0.0,
                        "F_{k}({eta}, {beta}) = {} must be ≥ 0",
                        fi.f
                    );
                }
            }
        }
    }

    #[test]
    fn value_unchanged_by_derivative_order() {
        // the F accumulation path is identical for every order, so the
        // value must match bit for bit
        let f0 = FermiIntegral::evaluated(1.5f64, 30.0, 0.7, 0);
        let f3 = FermiIntegral::evaluated(1.5f64, 30.0, 0.7, 3);
        assert_eq!(f0.f.to_bits(), f3.f.to_bits());
    }

    #[test]
    fn monotone_in_eta() {
        let mut prev = 0.0f64;
        for eta in [-20.0f64, -5.0, 0.0, 5.0, 20.0, 80.0] {
            let fi = FermiIntegral::evaluated(0.5f64, eta, 1.0, 0);
            assert!(fi.f > prev, "F must grow with η");
            prev = fi.f;
        }
    }

    #[test]
    fn beta_second_derivative_is_negative() {
        // ∂²√(1+βx/2)/∂β² < 0 pointwise, so the integral is too
        for eta in [-10.0f64, 5.0, 200.0] {
            let fi = FermiIntegral::evaluated(0.5f64, eta, 2.0, 2);
            assert!(fi.d2f_dbeta2 < 0.0);
        }
    }

    #[test]
    #[should_panic(expected = "order must be 0..=3")]
    fn order_four_rejected() {
        let mut fi = FermiIntegral::new(0.5f64, 0.0, 1.0);
        fi.evaluate(4);
    }
}
