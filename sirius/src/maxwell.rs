// SPDX-License-Identifier: AGPL-3.0-only

//! Maxwell-relation residuals.
//!
//! Thermodynamic consistency of (p, e, s) and their analytic derivatives:
//!
//! ```text
//!   1.  p = ρ² ∂e/∂ρ|_T + T ∂p/∂T|_ρ
//!   2.  ∂e/∂T|_ρ = T ∂s/∂T|_ρ
//!   3.  -∂s/∂ρ|_T = (1/ρ²) ∂p/∂T|_ρ
//! ```
//!
//! Each check returns (scale, relative error), where `scale` is the
//! left-hand side the error is measured against. A chain-rule slip in
//! the derivative machinery breaks these at O(1); quadrature truncation
//! leaves them at roundoff.

use crate::electron_positron::ElectronPositronEOS;
use crate::error::EosError;
use crate::real::Real;

/// p = ρ² ∂e/∂ρ|_T + T ∂p/∂T|_ρ.
///
/// # Errors
///
/// Propagates any `pe_state` failure.
pub fn maxwell_1<R: Real>(
    eos: &ElectronPositronEOS<R>,
    rho: R,
    temp: R,
    ye: R,
) -> Result<(R, R), EosError> {
    let st = eos.pe_state(rho, temp, ye)?;
    let rhs = rho * rho * st.de_drho + temp * st.dp_dt;
    Ok((st.p, R::rel_error(rhs, st.p)))
}

/// ∂e/∂T|_ρ = T ∂s/∂T|_ρ.
///
/// # Errors
///
/// Propagates any `pe_state` failure.
pub fn maxwell_2<R: Real>(
    eos: &ElectronPositronEOS<R>,
    rho: R,
    temp: R,
    ye: R,
) -> Result<(R, R), EosError> {
    let st = eos.pe_state(rho, temp, ye)?;
    let rhs = temp * st.ds_dt;
    Ok((st.de_dt, R::rel_error(rhs, st.de_dt)))
}

/// -∂s/∂ρ|_T = (1/ρ²) ∂p/∂T|_ρ.
///
/// # Errors
///
/// Propagates any `pe_state` failure.
pub fn maxwell_3<R: Real>(
    eos: &ElectronPositronEOS<R>,
    rho: R,
    temp: R,
    ye: R,
) -> Result<(R, R), EosError> {
    let st = eos.pe_state(rho, temp, ye)?;
    let rhs = st.dp_dt / (rho * rho);
    Ok((st.ds_drho, R::rel_error(rhs, -st.ds_drho)))
}
