// SPDX-License-Identifier: AGPL-3.0-only

//! Analytic bracket for the degeneracy-parameter solve.
//!
//! The charge-neutrality residual r(η) = n_target - (n⁻(η,β) - n⁺(η,β))
//! is strictly decreasing in η at fixed β: n⁻ grows with η while n⁺,
//! evaluated at η̃ = -η - 2/β, shrinks. A bracket therefore only needs
//! r > 0 at its lower end and r < 0 at its upper end, and both ends can
//! be placed from closed-form asymptotics: no integral evaluations, O(1)
//! per EOS call.
//!
//! Lower end: inverting the Maxwell-Boltzmann limit
//! n ≈ n_coeff β^{3/2} Γ(3/2) e^η gives η_nd; below min(η_nd, 0) minus the
//! margin, n⁻ has fallen well under the target while n⁺ has only grown,
//! so r > 0 there. Upper end: inverting the zero-temperature degenerate
//! limit n = n_coeff/(3√2) x_F³ gives the Fermi momentum x_F and
//! η_deg = (√(1+x_F²) - 1)/β; since n ∝ η³ at relativistic degeneracy,
//! doubling η_deg overshoots n_target by ~8×, forcing r < 0. The additive
//! margin covers the intermediate-regime error of both inversions.

use crate::constants::Constants;
use crate::real::Real;
use crate::tolerances::{ETA_BRACKET_MARGIN, ETA_UPPER_FACTOR};

/// Γ(3/2) = √π/2.
const GAMMA_3_2: f64 = 0.886_226_925_452_758;

/// Bracket [η_min, η_max] guaranteed to straddle the root of the
/// charge-neutrality residual for net electron density ρYₑN_A at
/// temperature T.
#[must_use]
pub fn get_eta_bounds<R: Real>(rho_ye: R, temp: R, c: &Constants<R>) -> (R, R) {
    let beta = c.dbeta_dt * temp;
    let n_target = rho_ye * c.n_a;
    let margin = R::of(ETA_BRACKET_MARGIN);

    // Maxwell-Boltzmann inversion (valid for η ≪ 0, harmless elsewhere
    // because it only ever pushes the lower end further down)
    let eta_nd = (n_target / (c.n_coeff * R::of(GAMMA_3_2))).ln()
        - R::of(1.5) * beta.ln();

    // zero-temperature degenerate inversion: n = n_coeff/(3√2) · x_F³
    let x_f = (R::of(3.0) * R::of(2.0).sqrt() * n_target / c.n_coeff)
        .powf(R::one() / R::of(3.0));
    let eta_deg = ((R::one() + x_f * x_f).sqrt() - R::one()) / beta;

    let eta_min = eta_nd.min(R::zero()) - margin;
    let eta_max = R::of(ETA_UPPER_FACTOR) * eta_deg + margin;
    (eta_min, eta_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::electron_positron::{n_e_constraint, n_p_constraint};

    fn residual(eta: f64, rho_ye: f64, temp: f64, c: &Constants<f64>) -> f64 {
        let beta = c.dbeta_dt * temp;
        rho_ye * c.n_a - (n_e_constraint(eta, beta, c) - n_p_constraint(eta, beta, c))
    }

    #[test]
    fn bracket_is_ordered() {
        let c = Constants::cgs();
        for (rho_ye, temp) in [(1.0e-12f64, 1.0e3), (2.0e4, 2.0e6), (1.0e9, 1.0e10)] {
            let (lo, hi) = get_eta_bounds(rho_ye, temp, &c);
            assert!(lo < hi, "({rho_ye}, {temp}): [{lo}, {hi}]");
            assert!(lo.is_finite() && hi.is_finite());
        }
    }

    #[test]
    fn residual_changes_sign_across_bracket() {
        let c = Constants::cgs();
        // spans non-degenerate, pair-dominated, and degenerate corners
        for rho_ye in [1.0e-10, 1.0e-2, 1.0e2, 1.0e6, 1.0e9, 1.0e12] {
            for temp in [1.0e3, 1.0e5, 1.0e7, 1.0e9, 1.0e11] {
                let (lo, hi) = get_eta_bounds(rho_ye, temp, &c);
                let r_lo = residual(lo, rho_ye, temp, &c);
                let r_hi = residual(hi, rho_ye, temp, &c);
                assert!(
                    r_lo > 0.0,
                    "rho_ye = {rho_ye:e}, T = {temp:e}: r(η_min = {lo}) = {r_lo:e}"
                );
                assert!(
                    r_hi < 0.0,
                    "rho_ye = {rho_ye:e}, T = {temp:e}: r(η_max = {hi}) = {r_hi:e}"
                );
            }
        }
    }

    #[test]
    fn degenerate_upper_bound_tracks_fermi_energy() {
        let c = Constants::cgs();
        // cold dense matter: η_max must scale up with density
        let (_, hi_a) = get_eta_bounds(1.0e6, 1.0e5, &c);
        let (_, hi_b) = get_eta_bounds(1.0e9, 1.0e5, &c);
        assert!(hi_b > hi_a * 5.0, "hi({:e}) vs hi({:e})", hi_b, hi_a);
    }
}
