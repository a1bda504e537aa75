// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for the EOS solvers.
//!
//! Bracket failures are ordinary values here, not panics or exceptions, so
//! table-generation workers can flag a bad grid cell and keep sweeping
//! (failures never cross a parallel-region boundary as unwinds). Diagnostic
//! payloads are carried as `f64` regardless of the working `Real` so the
//! error type stays object-safe and printable everywhere.

use std::fmt;

/// Errors surfaced by the degeneracy solve and table generation.
#[derive(Debug, Clone, PartialEq)]
pub enum EosError {
    /// An input (ρ, T, or Yₑ) was zero, negative, or non-finite.
    InvalidInput {
        /// Which input was rejected.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The residual does not change sign over the supplied bracket.
    NoSignChange {
        /// Lower bracket endpoint.
        lo: f64,
        /// Upper bracket endpoint.
        hi: f64,
    },

    /// Brent failed to converge within the iteration budget.
    MaxIterations {
        /// Iterations performed.
        iters: usize,
    },

    /// The η solve failed for a specific (ρ, T) state; wraps the root-finder
    /// failure with the physical coordinates for per-cell diagnostics.
    EtaSolve {
        /// Mass density (g/cm³).
        rho: f64,
        /// Temperature (K).
        temp: f64,
        /// Underlying root-finder failure.
        cause: Box<EosError>,
    },

    /// Table output could not be written.
    TableIo(String),
}

impl fmt::Display for EosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { name, value } => {
                write!(f, "invalid input: {name} = {value} (must be finite and positive)")
            }
            Self::NoSignChange { lo, hi } => {
                write!(f, "no sign change over bracket [{lo:e}, {hi:e}]")
            }
            Self::MaxIterations { iters } => {
                write!(f, "root finder did not converge in {iters} iterations")
            }
            Self::EtaSolve { rho, temp, cause } => {
                write!(f, "eta solve failed at rho = {rho:e}, T = {temp:e}: {cause}")
            }
            Self::TableIo(msg) => write!(f, "table output failed: {msg}"),
        }
    }
}

impl std::error::Error for EosError {}

impl From<std::io::Error> for EosError {
    fn from(e: std::io::Error) -> Self {
        Self::TableIo(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_input() {
        let err = EosError::InvalidInput { name: "rho", value: 0.0 };
        assert!(err.to_string().contains("rho"));
        assert!(err.to_string().contains("finite"));
    }

    #[test]
    fn display_eta_solve_includes_coordinates_and_cause() {
        let err = EosError::EtaSolve {
            rho: 1.0e9,
            temp: 1.0e4,
            cause: Box::new(EosError::NoSignChange { lo: -150.0, hi: 2000.0 }),
        };
        let msg = err.to_string();
        assert!(msg.contains("1e9"));
        assert!(msg.contains("sign change"));
    }

    #[test]
    fn error_trait_object() {
        let err: &dyn std::error::Error = &EosError::MaxIterations { iters: 100 };
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: EosError = io.into();
        assert!(matches!(err, EosError::TableIo(_)));
    }
}
