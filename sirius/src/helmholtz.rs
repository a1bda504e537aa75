// SPDX-License-Identifier: AGPL-3.0-only

//! Helmholtz free-energy block of the EOS table.
//!
//! F = e - T s per gram, with the nine derivative entries the tabulated
//! interpolant needs (Timmes & Swesty 2000, Table 1). The high-order
//! entries come from the thermodynamic identities
//!
//! ```text
//!   ∂F/∂ρ|_T = p/ρ²          ∂F/∂T|_ρ = -s
//! ```
//!
//! so the third and fourth F-derivatives reduce to pressure and entropy
//! derivatives the state already carries; nothing here differentiates
//! anything numerically.

use std::fmt;

use crate::electron_positron::{ElectronPositronEOS, EOSState};
use crate::error::EosError;
use crate::real::Real;

/// Specific free energy and the table's nine derivative entries.
#[derive(Debug, Clone, Copy)]
pub struct Helmholtz<R> {
    /// F = e - T s (erg/g)
    pub f: R,
    /// ∂F/∂ρ = p/ρ²
    pub df_drho: R,
    /// ∂F/∂T = -s
    pub df_dt: R,
    /// ∂²F/∂ρ²
    pub d2f_drho2: R,
    /// ∂²F/∂T²
    pub d2f_dt2: R,
    /// ∂²F/∂ρ∂T
    pub d2f_drhodt: R,
    /// ∂³F/∂ρ²∂T
    pub d3f_drho2dt: R,
    /// ∂³F/∂ρ∂T²
    pub d3f_drhodt2: R,
    /// ∂⁴F/∂ρ²∂T²
    pub d4f_drho2dt2: R,
}

impl<R: Real> Helmholtz<R> {
    /// Build the free-energy block from a solved state.
    #[must_use]
    pub fn from_state(st: &EOSState<R>) -> Self {
        let rho = st.rho;
        let rho2 = rho * rho;
        let two = R::of(2.0);
        Self {
            f: st.e - st.temp * st.s,
            df_drho: st.p / rho2,
            df_dt: -st.s,
            d2f_drho2: (st.dp_drho - two * st.p / rho) / rho2,
            d2f_dt2: -st.ds_dt,
            d2f_drhodt: st.dp_dt / rho2,
            d3f_drho2dt: (st.d2p_drhodt - two * st.dp_dt / rho) / rho2,
            d3f_drhodt2: st.d2p_dt2 / rho2,
            d4f_drho2dt2: (st.d3p_drhodt2 - two * st.d2p_dt2 / rho) / rho2,
        }
    }
}

impl<R: Real> fmt::Display for Helmholtz<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "F = {:e}", self.f)?;
        writeln!(f, "  dF/drho = {:e}   dF/dT = {:e}", self.df_drho, self.df_dt)?;
        writeln!(
            f,
            "  d2F/drho2 = {:e}   d2F/dT2 = {:e}   d2F/drhodT = {:e}",
            self.d2f_drho2, self.d2f_dt2, self.d2f_drhodt
        )?;
        write!(
            f,
            "  d3F/drho2dT = {:e}   d3F/drhodT2 = {:e}   d4F/drho2dT2 = {:e}",
            self.d3f_drho2dt, self.d3f_drhodt2, self.d4f_drho2dt2
        )
    }
}

impl<R: Real> ElectronPositronEOS<R> {
    /// Solve the state and derive the free-energy block.
    ///
    /// # Errors
    ///
    /// Same conditions as [`pe_state`](Self::pe_state).
    pub fn helmholtz_terms(
        &self,
        rho: R,
        temp: R,
        ye: R,
    ) -> Result<(Helmholtz<R>, EOSState<R>), EosError> {
        let st = self.pe_state(rho, temp, ye)?;
        Ok((Helmholtz::from_state(&st), st))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difference::adaptive_diff;
    use crate::tolerances::FD_AGREEMENT_REL;

    #[test]
    fn free_energy_identities_hold_exactly() {
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        let (helm, st) = eos.helmholtz_terms(1.0e5, 1.0e8, 0.5).expect("state");
        assert_eq!(helm.df_dt, -st.s);
        assert_eq!(helm.df_drho, st.p / (st.rho * st.rho));
        assert_eq!(helm.f, st.e - st.temp * st.s);
    }

    #[test]
    fn df_drho_matches_differenced_f() {
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        let (rho, temp, ye) = (1.0e2, 1.0e6, 0.5);
        let (helm, _) = eos.helmholtz_terms(rho, temp, ye).expect("state");
        let (fd, _) = adaptive_diff(
            |r| {
                let (h, _) = eos.helmholtz_terms(r, temp, ye).expect("state");
                h.f
            },
            rho,
            0.01 * rho,
        );
        assert!(
            f64::rel_error(helm.df_drho, fd) < FD_AGREEMENT_REL,
            "analytic {:e} vs fd {fd:e}",
            helm.df_drho
        );
    }

    #[test]
    fn df_dt_matches_differenced_f() {
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        let (rho, temp, ye) = (1.0e5, 1.0e8, 0.5);
        let (helm, _) = eos.helmholtz_terms(rho, temp, ye).expect("state");
        let (fd, _) = adaptive_diff(
            |t| {
                let (h, _) = eos.helmholtz_terms(rho, t, ye).expect("state");
                h.f
            },
            temp,
            0.01 * temp,
        );
        assert!(
            f64::rel_error(helm.df_dt, fd) < FD_AGREEMENT_REL,
            "analytic {:e} vs fd {fd:e}",
            helm.df_dt
        );
    }
}
