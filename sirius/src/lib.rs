// SPDX-License-Identifier: AGPL-3.0-only

//! whiteDwarf sirius — degenerate relativistic electron-positron EOS
//!
//! Thermodynamic state (n, p, e, s) of an electron-positron gas with all
//! (ρ, T) partial derivatives through third order, built on generalized
//! Fermi-Dirac integrals with analytic derivative propagation and an
//! implicit charge-neutrality solve for the degeneracy parameter η.
//! Intended as an EOS building block for stellar and supernova codes
//! (Timmes & Swesty, ApJS 126, 501 (2000) conventions and table format).
//!
//! ## Active modules
//!   - `fermi` / `breakpoints` / `quadrature` — F_k(η, β) and its partials
//!   - `brent` / `bounds` — bracketed η solve for charge neutrality
//!   - `jet` — third-order derivative propagation and implicit chain
//!   - `electron_positron` — `pe_state(ρ, T, Yₑ)` → full state
//!   - `helmholtz` / `maxwell` — free-energy block, consistency residuals
//!   - `table` — rayon-parallel (ρ, T) grid sweep and table writer
//!   - `difference` / `validation` — finite-difference oracle and harness
//!
//! ## Validation binaries
//!   - `validate_fermi` — reference spot values + FD sweep of F_k partials
//!   - `validate_eos_derivs` — FD sweep of every EOSState derivative field
//!   - `validate_maxwell` — Maxwell relations across the table domain
//!
//! ## Drivers
//!   - `pe_state` — single-point state dump
//!   - `generate_table` — full four-block table + JSON provenance sidecar
//!   - `generate_etas` — η over a (ρYₑ, T) grid

pub mod bounds;
pub mod breakpoints;
pub mod brent;
pub mod constants;
pub mod difference;
pub mod electron_positron;
pub mod error;
pub mod fermi;
pub mod helmholtz;
pub mod jet;
pub mod maxwell;
pub mod quadrature;
pub mod real;
pub mod table;
pub mod tolerances;
pub mod validation;

pub use constants::Constants;
pub use electron_positron::{ElectronPositronEOS, EOSState};
pub use error::EosError;
pub use fermi::FermiIntegral;
pub use real::Real;
