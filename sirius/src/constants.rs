// SPDX-License-Identifier: AGPL-3.0-only

//! Physical constants (CGS) and the derived EOS coefficients.
//!
//! Modeled as an immutable value injected into the solvers rather than
//! module-level globals, so a caller can substitute a different constant
//! set (older CODATA, natural units) without recompiling the core.
//!
//! All derived quantities are computed in `R` arithmetic from the exact
//! CODATA 2018 base values, so a wider `Real` loses nothing to an
//! intermediate `f64` rounding beyond the base values themselves.

use crate::real::Real;

/// CODATA 2018 electron mass (g).
pub const M_ELECTRON: f64 = 9.109_383_701_5e-28;
/// Speed of light (cm/s), exact.
pub const C_LIGHT: f64 = 2.997_924_58e10;
/// Planck constant (erg s), exact since the 2019 SI redefinition.
pub const H_PLANCK: f64 = 6.626_070_15e-27;
/// Boltzmann constant (erg/K), exact.
pub const K_BOLTZMANN: f64 = 1.380_649e-16;
/// Avogadro constant (1/mol), exact.
pub const N_AVOGADRO: f64 = 6.022_140_76e23;

/// Constant set for the electron-positron EOS, in CGS.
///
/// The `*_coeff` members are the prefactors of the Fermi-integral
/// expressions for number density, pressure, and kinetic energy density
/// (Timmes & Swesty, ApJS 126, 501 (2000), §2):
///
/// ```text
///   n± = n_coeff β^{3/2} [F_{1/2} + β F_{3/2}]          (1/cm³)
///   p± = p_coeff β^{5/2} [F_{3/2} + (β/2) F_{5/2}]      (erg/cm³)
///   E± = e_coeff β^{5/2} [F_{3/2} + β F_{5/2}]          (erg/cm³)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Constants<R> {
    /// Electron mass (g).
    pub m_e: R,
    /// Speed of light (cm/s).
    pub c: R,
    /// Planck constant (erg s).
    pub h: R,
    /// Boltzmann constant (erg/K).
    pub k_b: R,
    /// Avogadro constant (1/mol).
    pub n_a: R,
    /// Electron rest energy m_e c² (erg).
    pub mec2: R,
    /// dβ/dT = k_B / (m_e c²) (1/K); β = dbeta_dt · T.
    pub dbeta_dt: R,
    /// Compton wavelength h / (m_e c) (cm).
    pub lambda_c: R,
    /// 8√2 π (m_e c / h)³ (1/cm³).
    pub n_coeff: R,
    /// (2/3) n_coeff m_e c² (erg/cm³).
    pub p_coeff: R,
    /// n_coeff m_e c² (erg/cm³).
    pub e_coeff: R,
}

impl<R: Real> Constants<R> {
    /// CODATA 2018 constants in CGS.
    #[must_use]
    pub fn cgs() -> Self {
        let m_e = R::of(M_ELECTRON);
        let c = R::of(C_LIGHT);
        let h = R::of(H_PLANCK);
        let k_b = R::of(K_BOLTZMANN);
        let n_a = R::of(N_AVOGADRO);

        let mec2 = m_e * c * c;
        let lambda_c = h / (m_e * c);
        let pi = R::of(std::f64::consts::PI);
        let sqrt2 = R::of(2.0).sqrt();
        let n_coeff = R::of(8.0) * sqrt2 * pi / (lambda_c * lambda_c * lambda_c);
        let p_coeff = R::of(2.0) / R::of(3.0) * n_coeff * mec2;
        let e_coeff = n_coeff * mec2;

        Self {
            m_e,
            c,
            h,
            k_b,
            n_a,
            mec2,
            dbeta_dt: k_b / mec2,
            lambda_c,
            n_coeff,
            p_coeff,
            e_coeff,
        }
    }
}

impl<R: Real> Default for Constants<R> {
    fn default() -> Self {
        Self::cgs()
    }
}
