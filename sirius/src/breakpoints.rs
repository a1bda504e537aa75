// SPDX-License-Identifier: AGPL-3.0-only

//! Quadrature-domain split points for the generalized Fermi-Dirac integrand.
//!
//! The integrand x^k √(1 + βx/2) / (e^{x-η} + 1) has its action near x ≈ 0
//! when η ≪ 0 and a sharp step at x ≈ η when η ≫ 0. Following Aparicio
//! (ApJS 117, 627 (1998)), three breakpoints (s1, s2, s3) partition
//! [0, ∞) into four panels whose positions track the step through a fitted
//! pivot variable ξ(η). Placing s2 just below the step and s3 just above it
//! is what lets fixed-node Gauss panels hold near-machine accuracy across
//! η ∈ [-100, 10⁴] and beyond.
//!
//! The pivot has two asymptotic branches: a softplus form that saturates
//! correctly for non-degenerate η, and its linear degenerate limit, which
//! must be used directly once the softplus argument would overflow.

use crate::real::Real;

// Aparicio (1998) Table 1 fit coefficients.
const D: f64 = 3.3609;
const SIGMA: f64 = 9.1186e-2;
const A1: f64 = 6.7774;
const B1: f64 = 1.1418;
const C1: f64 = 2.9826;
const A2: f64 = 3.7601;
const B2: f64 = 9.3719e-2;
const C2: f64 = 2.1063e-2;
const D2: f64 = 3.1084e1;
const E2: f64 = 1.0056;
const A3: f64 = 7.5669;
const B3: f64 = 1.1695;
const C3: f64 = 7.5416e-1;
const D3: f64 = 6.6558;
const E3: f64 = -1.2819e-1;

/// Softplus argument above which ξ is numerically indistinguishable from
/// its linear limit (e^{-50} ≪ ε for every supported precision).
const DEGENERATE_SWITCH: f64 = 50.0;

/// Which asymptotic branch of the pivot ξ(η) applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// η below the step-dominated range: ξ = ln(1 + e^{σ(η-D)}) / σ.
    NonDegenerate,
    /// Strongly degenerate: ξ = η - D (the softplus would overflow).
    Degenerate,
}

impl Regime {
    /// Select the branch that is exact and overflow-free for this η.
    #[must_use]
    pub fn for_eta<R: Real>(eta: R) -> Self {
        if R::of(SIGMA) * (eta - R::of(D)) <= R::of(DEGENERATE_SWITCH) {
            Self::NonDegenerate
        } else {
            Self::Degenerate
        }
    }
}

/// Breakpoint generator for one integrand regime.
#[derive(Debug, Clone, Copy)]
pub struct BreakPoints {
    regime: Regime,
}

impl BreakPoints {
    #[must_use]
    pub const fn new(regime: Regime) -> Self {
        Self { regime }
    }

    /// Generator with the regime inferred from η.
    #[must_use]
    pub fn for_eta<R: Real>(eta: R) -> Self {
        Self::new(Regime::for_eta(eta))
    }

    /// Ordered split points (s1 ≤ s2 ≤ s3) of [0, ∞) for this η.
    ///
    /// Total for all real η: s1 > 0 always, and for η ≫ 0 the step at
    /// x = η lies inside (s2, s3).
    #[must_use]
    pub fn get_points<R: Real>(&self, eta: R) -> (R, R, R) {
        let xi = match self.regime {
            Regime::NonDegenerate => {
                (R::of(SIGMA) * (eta - R::of(D))).exp().ln_1p() / R::of(SIGMA)
            }
            Regime::Degenerate => eta - R::of(D),
        };
        let xi2 = xi * xi;

        let x1 = (R::of(A1) + R::of(B1) * xi + R::of(C1) * xi2) / (R::one() + R::of(C1) * xi);
        let x2 = (R::of(A2) + R::of(B2) * xi + R::of(C2) * R::of(D2) * xi2)
            / (R::one() + R::of(E2) * xi + R::of(C2) * xi2);
        let x3 = (R::of(A3) + R::of(B3) * xi + R::of(C3) * R::of(D3) * xi2)
            / (R::one() + R::of(E3) * xi + R::of(C3) * xi2);

        (x1 - x2, x1, x1 + x3)
    }
}
