// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized tolerances and solver configuration, with justification.
//!
//! Every threshold used by the solvers, tests, and validation binaries is
//! defined here with its origin and rationale. No ad-hoc magic numbers in
//! algorithm code.
//!
//! # Tolerance categories
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Machine precision | IEEE 754 f64 roundoff in quadrature sums | 1e-12 spot values |
//! | Cancellation | loss of significance in derivative integrands | 1e-8 for ∂²F/∂η² |
//! | Oracle-limited | Ridders finite differencing bottoms out near 1e-8 | 1e-5 FD sweeps |
//! | Physical identity | Maxwell relations across the table domain | 1e-6 |

// ═══════════════════════════════════════════════════════════════════
// Quadrature configuration
// ═══════════════════════════════════════════════════════════════════

/// Gauss nodes per quadrature panel (and for the Laguerre tail).
///
/// The integrand is analytic on every panel, so Gauss-Legendre converges
/// geometrically and 100 nodes land far below f64 roundoff. 100 also keeps
/// the largest Laguerre node (~374) small enough that the e^{+x}-folded
/// weights stay inside f64 range; 200 nodes would overflow them.
/// Recorded in the table metadata footer.
pub const QUADRATURE_POINTS: usize = 100;

/// Newton iteration cap for node finding. Gauss nodes converge in < 10
/// iterations from the asymptotic guesses; 100 is a runaway backstop.
pub const NODE_NEWTON_MAX_ITER: usize = 100;

// ═══════════════════════════════════════════════════════════════════
// Root finding
// ═══════════════════════════════════════════════════════════════════

/// Brent iteration cap. With bracket widths up to ~1e10 in η, bisection
/// alone needs ~90 halvings to reach f64 resolution; 150 leaves margin
/// for the interpolation steps.
pub const BRENT_MAX_ITER: usize = 150;

/// Additive term of the Brent bracket-width tolerance. The η root enters
/// exponentials, so absolute accuracy below ~1e-14 buys nothing; the
/// relative part (2ε|b|) dominates for large η.
pub const BRENT_XTOL: f64 = 1e-14;

// ═══════════════════════════════════════════════════════════════════
// Degeneracy-parameter bracket (see bounds.rs for the sign argument)
// ═══════════════════════════════════════════════════════════════════

/// Additive safety margin on both bracket ends, in units of η. The
/// asymptotic inversions are accurate to O(1) in their own regimes and
/// wrong by at most a few tens between regimes; 50 swamps that.
pub const ETA_BRACKET_MARGIN: f64 = 50.0;

/// Multiplicative headroom on the degenerate estimate. In the relativistic
/// degenerate limit n ∝ η³, so doubling η overshoots the target density by
/// 8×, a guaranteed sign change at the upper end.
pub const ETA_UPPER_FACTOR: f64 = 2.0;

// ═══════════════════════════════════════════════════════════════════
// Fermi-integral accuracy (f64 build)
// ═══════════════════════════════════════════════════════════════════

/// Spot-value relative tolerance for F against the Gong et al. cross-check
/// values. ~400 positive quadrature terms accumulate ≲ 1e-14 relative
/// roundoff; 1e-12 leaves two digits of margin.
pub const FERMI_VALUE_REL: f64 = 1e-12;

/// First-derivative spot values. Same accumulation argument, slightly
/// looser because ∂F/∂η can sit orders below F at strong degeneracy.
pub const FERMI_DERIV1_REL: f64 = 1e-10;

/// Second-derivative spot values. ∂²F/∂η² integrates a signed spike at the
/// Fermi surface; cancellation leaves |∂²F/∂η²| ≪ F and the relative error
/// inflates by that ratio.
pub const FERMI_DERIV2_REL: f64 = 1e-8;

/// Worst cancellation cases (η ≳ 100 where |∂²F/∂η²|/F ≲ 1e-8): the
/// original suite relaxed these spots even in extended precision.
pub const FERMI_CANCELLATION_REL: f64 = 1e-4;

// ═══════════════════════════════════════════════════════════════════
// Finite-difference oracle agreement
// ═══════════════════════════════════════════════════════════════════

/// Analytic-vs-Ridders agreement for first/second derivatives.
///
/// Central differencing of an f64 function cannot beat ~ε^{2/3} ≈ 1e-11
/// and degrades to ~1e-8 for second derivatives; the analytic values are
/// better than the oracle. This bound catches chain-rule blunders (which
/// show up at O(1)), not roundoff.
pub const FD_AGREEMENT_REL: f64 = 1e-5;

/// Third-derivative sweeps difference an already-differentiated field and
/// inherit its noise; an order looser.
pub const FD_AGREEMENT3_REL: f64 = 1e-4;

/// Relative step handed to the adaptive differencer (it shrinks from
/// there). Matches the original harness.
pub const FD_PROBE_STEP: f64 = 0.01;

// ═══════════════════════════════════════════════════════════════════
// EOS-level identities
// ═══════════════════════════════════════════════════════════════════

/// Round-trip tolerance: n⁻(η*) − n⁺(η*) must reproduce ρYₑN_A to the
/// Brent bracket resolution amplified by ∂n/∂η ~ n.
pub const ETA_ROUND_TRIP_REL: f64 = 1e-12;

/// Maxwell-relation residuals across the representative (ρ,T) grid.
pub const MAXWELL_REL: f64 = 1e-6;

/// Positron contribution below which all positron fields are treated as
/// identically zero by tests and validation sweeps (relative-error checks
/// would otherwise divide by an underflowed denominator). The original used
/// 1e-500 under extended precision; this is the f64 analogue, just above
/// the subnormal range.
pub const POSITRON_NEGLIGIBLE: f64 = 1e-300;

// ═══════════════════════════════════════════════════════════════════
// Degeneracy-limited accuracy (f64 build)
// ═══════════════════════════════════════════════════════════════════

/// η above which thermal (entropy / specific-heat) quantities are
/// unmeasurable in f64.
///
/// At strong degeneracy the thermal quantities cancel to O((kT/E_F)ⁿ):
/// entropy comes from E + p - μn, heat capacity from competing chain
/// terms. Measured on the spec's (ρ, T) grid, the Maxwell 2/3 residual
/// grows like ~3e-3 ε η³: under 1e-6 up to η ≈ 1e4, 0.2 by η ≈ 6e5.
/// Past this limit sweeps skip entropy and T-derivative checks; resolving
/// that corner of the table is what wider `Real` types are for.
pub const DEGENERACY_FD_LIMIT: f64 = 1.0e4;

/// Minimum signal-to-noise for a finite-difference check to be meaningful.
///
/// A centered difference of a probe field f over step h resolves a
/// derivative only if |deriv|·h^order stands above the f64 noise ε|f| of
/// the probe itself. Pair-dominated states are the extreme case: ρ barely
/// moves any quantity there (the pair sea swamps the net charge), and a
/// ρ-difference returns pure roundoff. Measured error tracks ~3/SNR, so
/// 1e8 keeps checked sweeps three orders under `FD_AGREEMENT_REL`.
pub const FD_SNR_MIN: f64 = 1.0e8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::assertions_on_constants)] // constants sanity check
    fn tolerance_ordering() {
        assert!(FERMI_VALUE_REL < FERMI_DERIV1_REL);
        assert!(FERMI_DERIV1_REL < FERMI_DERIV2_REL);
        assert!(FERMI_DERIV2_REL < FERMI_CANCELLATION_REL);
        assert!(FD_AGREEMENT_REL < FD_AGREEMENT3_REL);
    }

    #[test]
    #[allow(clippy::assertions_on_constants)] // constants sanity check
    fn solver_config_sensible() {
        assert!(BRENT_MAX_ITER >= 100, "η brackets span ~1e10; need ≥100 halvings");
        assert!(QUADRATURE_POINTS >= 20, "Aparicio panels need ≥20 nodes");
        assert!(QUADRATURE_POINTS <= 180, "Laguerre folded weights overflow past ~180 nodes");
        assert!(ETA_BRACKET_MARGIN > 10.0);
        assert!(ETA_UPPER_FACTOR > 1.0);
    }

    #[test]
    #[allow(clippy::assertions_on_constants)] // constants sanity check
    fn degeneracy_limit_is_where_thermal_residuals_cross_the_floor() {
        // ~3e-3 ε η³ reaches MAXWELL_REL near η = 1e4
        let residual_at_limit = 3.0e-3 * f64::EPSILON * DEGENERACY_FD_LIMIT.powi(3);
        assert!(residual_at_limit < MAXWELL_REL);
        assert!(residual_at_limit > 0.1 * MAXWELL_REL);
    }

    #[test]
    #[allow(clippy::assertions_on_constants)] // constants sanity check
    fn all_tolerances_positive() {
        for t in [
            BRENT_XTOL,
            FERMI_VALUE_REL,
            FERMI_DERIV1_REL,
            FERMI_DERIV2_REL,
            FERMI_CANCELLATION_REL,
            FD_AGREEMENT_REL,
            FD_AGREEMENT3_REL,
            FD_PROBE_STEP,
            ETA_ROUND_TRIP_REL,
            MAXWELL_REL,
            POSITRON_NEGLIGIBLE,
        ] {
            assert!(t > 0.0);
        }
    }
}
