// SPDX-License-Identifier: AGPL-3.0-only

//! Validation harness and named derivative-accessor tables.
//!
//! Validation binaries follow one pattern: explicit checks against
//! documented tolerances, a per-check ✓/✗ line, and exit code 0/1. The
//! harness accumulates the checks; [`DerivCheck`] tables map every
//! derivative field of [`EOSState`] to the lower-order field it should be
//! the finite difference of, so one generic runner can sweep all of them:
//! an accessor-function table instead of raw member pointers.

use std::process;

use crate::difference::{adaptive_diff, adaptive_diff2};
use crate::electron_positron::{ElectronPositronEOS, EOSState};
use crate::error::EosError;
use crate::real::Real;
use crate::tolerances::FD_PROBE_STEP;

/// A single validation check with result tracking.
#[derive(Debug, Clone)]
pub struct Check {
    /// Human-readable label.
    pub label: String,
    /// Whether this check passed.
    pub passed: bool,
    /// Observed value.
    pub observed: f64,
    /// Expected value or threshold.
    pub expected: f64,
    /// Tolerance used.
    pub tolerance: f64,
}

/// Accumulates validation checks and produces a summary with exit code.
#[derive(Debug, Default)]
#[must_use]
pub struct ValidationHarness {
    /// Name of the validation binary.
    pub name: String,
    /// All checks performed.
    pub checks: Vec<Check>,
}

impl ValidationHarness {
    /// Create a new harness for a named validation binary.
    #[must_use = "validation harness must be used to run checks"]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            checks: Vec::new(),
        }
    }

    /// |observed - expected| < tolerance.
    pub fn check_abs(&mut self, label: &str, observed: f64, expected: f64, tolerance: f64) {
        self.push(label, (observed - expected).abs() < tolerance, observed, expected, tolerance);
    }

    /// |observed - expected| / |expected| < tolerance (absolute when
    /// expected is zero).
    pub fn check_rel(&mut self, label: &str, observed: f64, expected: f64, tolerance: f64) {
        let passed = f64::rel_error(observed, expected) < tolerance;
        self.push(label, passed, observed, expected, tolerance);
    }

    /// observed < threshold.
    pub fn check_upper(&mut self, label: &str, observed: f64, threshold: f64) {
        self.push(label, observed < threshold, observed, threshold, threshold);
    }

    /// Boolean pass/fail.
    pub fn check_bool(&mut self, label: &str, passed: bool) {
        self.push(label, passed, f64::from(u8::from(passed)), 1.0, 0.0);
    }

    fn push(&mut self, label: &str, passed: bool, observed: f64, expected: f64, tolerance: f64) {
        if !passed {
            println!("  ✗ {label}: observed = {observed:.6e}, expected = {expected:.6e}");
        }
        self.checks.push(Check {
            label: label.to_string(),
            passed,
            observed,
            expected,
            tolerance,
        });
    }

    /// Number of checks that passed.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Whether all checks passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Print summary and exit 0 (all passed) or 1.
    pub fn finish(&self) -> ! {
        println!();
        println!(
            "═══ {} validation: {}/{} checks passed ═══",
            self.name,
            self.passed_count(),
            self.checks.len()
        );
        if self.all_passed() {
            println!("ALL CHECKS PASSED");
            process::exit(0);
        }
        let failed: Vec<&str> = self
            .checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.label.as_str())
            .collect();
        println!("FAILED CHECKS: {}", failed.join(", "));
        process::exit(1);
    }
}

/// Which input variable a derivative check differences over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffVar {
    /// Difference over ρ at fixed T.
    Rho,
    /// Difference over T at fixed ρ.
    Temp,
}

/// One analytic-derivative check: `analytic` should equal the
/// `order`-th finite difference of `probe` with respect to `var`.
#[derive(Debug, Clone, Copy)]
pub struct DerivCheck<R: 'static> {
    /// Field name as printed in reports.
    pub name: &'static str,
    /// Accessor for the analytic derivative under test.
    pub analytic: fn(&EOSState<R>) -> R,
    /// Accessor for the field to difference.
    pub probe: fn(&EOSState<R>) -> R,
    /// Differencing variable.
    pub var: DiffVar,
    /// Differencing order (1 or 2).
    pub order: u8,
    /// Positron-only quantity: skipped when n⁺ is negligible.
    pub positron: bool,
}

/// Outcome of one derivative comparison.
#[derive(Debug, Clone, Copy)]
pub struct DerivComparison<R> {
    /// The analytic derivative under test.
    pub analytic: R,
    /// The finite-difference estimate.
    pub differenced: R,
    /// |differenced - analytic| / |analytic|.
    pub rel_err: R,
    /// |analytic| h^order / (ε |probe|): how far the differenced signal
    /// stands above the probe field's own f64 roundoff. Below
    /// `FD_SNR_MIN` the comparison measures noise, not the derivative
    /// (pair-dominated states make ρ-derivatives arbitrarily flat).
    pub signal_to_noise: R,
}

/// Evaluate one check at (ρ, T, Yₑ).
///
/// # Errors
///
/// Propagates a failed solve at the base point. Perturbed probe points
/// share the base point's validity.
pub fn run_deriv_check<R: Real>(
    eos: &ElectronPositronEOS<R>,
    check: &DerivCheck<R>,
    rho: R,
    temp: R,
    ye: R,
) -> Result<DerivComparison<R>, EosError> {
    let st = eos.pe_state(rho, temp, ye)?;
    let analytic = (check.analytic)(&st);
    let probe_base = (check.probe)(&st);

    let step = R::of(FD_PROBE_STEP);
    let (x0, h) = match check.var {
        DiffVar::Rho => (rho, step * rho),
        DiffVar::Temp => (temp, step * temp),
    };
    let probe = |x: R| -> R {
        let st = match check.var {
            DiffVar::Rho => eos.pe_state(x, temp, ye),
            DiffVar::Temp => eos.pe_state(rho, x, ye),
        }
        .expect("perturbed probe state");
        (check.probe)(&st)
    };
    let (fd, signal) = match check.order {
        1 => (adaptive_diff(probe, x0, h).0, analytic.abs() * h),
        2 => (adaptive_diff2(probe, x0, h).0, analytic.abs() * h * h),
        o => unreachable!("derivative check order {o}"),
    };
    let signal_to_noise = if probe_base == R::zero() {
        R::infinity()
    } else {
        signal / (R::epsilon() * probe_base.abs())
    };
    Ok(DerivComparison {
        analytic,
        differenced: fd,
        rel_err: R::rel_error(fd, analytic),
        signal_to_noise,
    })
}

macro_rules! deriv_checks {
    ($( $name:literal : $analytic:ident <- $probe:ident, $var:ident, $order:literal, $pos:literal; )*) => {
        vec![ $( DerivCheck {
            name: $name,
            analytic: |s| s.$analytic,
            probe: |s| s.$probe,
            var: DiffVar::$var,
            order: $order,
            positron: $pos,
        }, )* ]
    };
}

/// All η-derivative checks.
#[must_use]
pub fn eta_checks<R: Real>() -> Vec<DerivCheck<R>> {
    deriv_checks![
        "∂η/∂ρ": deta_drho <- eta, Rho, 1, false;
        "∂η/∂T": deta_dt <- eta, Temp, 1, false;
        "∂²η/∂ρ²": d2eta_drho2 <- eta, Rho, 2, false;
        "∂²η/∂ρ∂T": d2eta_drhodt <- deta_dt, Rho, 1, false;
        "∂²η/∂T²": d2eta_dt2 <- eta, Temp, 2, false;
    ]
}

/// All number-density derivative checks (n⁻, n⁺, n).
#[must_use]
pub fn number_density_checks<R: Real>() -> Vec<DerivCheck<R>> {
    deriv_checks![
        "∂n⁻/∂ρ": dne_drho <- n_e, Rho, 1, false;
        "∂n⁻/∂T": dne_dt <- n_e, Temp, 1, false;
        "∂²n⁻/∂ρ²": d2ne_drho2 <- n_e, Rho, 2, false;
        "∂²n⁻/∂ρ∂T": d2ne_drhodt <- dne_dt, Rho, 1, false;
        "∂²n⁻/∂T²": d2ne_dt2 <- n_e, Temp, 2, false;
        "∂³n⁻/∂ρ³": d3ne_drho3 <- dne_drho, Rho, 2, false;
        "∂³n⁻/∂ρ²∂T": d3ne_drho2dt <- dne_dt, Rho, 2, false;
        "∂³n⁻/∂ρ∂T²": d3ne_drhodt2 <- d2ne_dt2, Rho, 1, false;
        "∂³n⁻/∂T³": d3ne_dt3 <- dne_dt, Temp, 2, false;
        "∂n⁺/∂ρ": dnp_drho <- n_pos, Rho, 1, true;
        "∂n⁺/∂T": dnp_dt <- n_pos, Temp, 1, true;
        "∂²n⁺/∂ρ²": d2np_drho2 <- n_pos, Rho, 2, true;
        "∂²n⁺/∂ρ∂T": d2np_drhodt <- dnp_dt, Rho, 1, true;
        "∂²n⁺/∂T²": d2np_dt2 <- n_pos, Temp, 2, true;
        "∂³n⁺/∂ρ³": d3np_drho3 <- dnp_drho, Rho, 2, true;
        "∂³n⁺/∂ρ²∂T": d3np_drho2dt <- dnp_dt, Rho, 2, true;
        "∂³n⁺/∂ρ∂T²": d3np_drhodt2 <- d2np_dt2, Rho, 1, true;
        "∂³n⁺/∂T³": d3np_dt3 <- dnp_dt, Temp, 2, true;
        "∂n/∂ρ": dn_drho <- n, Rho, 1, false;
        "∂n/∂T": dn_dt <- n, Temp, 1, false;
        "∂²n/∂ρ²": d2n_drho2 <- n, Rho, 2, false;
        "∂²n/∂ρ∂T": d2n_drhodt <- dn_dt, Rho, 1, false;
        "∂²n/∂T²": d2n_dt2 <- n, Temp, 2, false;
        "∂³n/∂ρ³": d3n_drho3 <- dn_drho, Rho, 2, false;
        "∂³n/∂ρ²∂T": d3n_drho2dt <- dn_dt, Rho, 2, false;
        "∂³n/∂ρ∂T²": d3n_drhodt2 <- d2n_dt2, Rho, 1, false;
        "∂³n/∂T³": d3n_dt3 <- dn_dt, Temp, 2, false;
    ]
}

/// All specific-energy derivative checks (e⁻, e⁺, e).
#[must_use]
pub fn energy_checks<R: Real>() -> Vec<DerivCheck<R>> {
    deriv_checks![
        "∂e⁻/∂ρ": dee_drho <- e_e, Rho, 1, false;
        "∂e⁻/∂T": dee_dt <- e_e, Temp, 1, false;
        "∂²e⁻/∂ρ²": d2ee_drho2 <- e_e, Rho, 2, false;
        "∂²e⁻/∂ρ∂T": d2ee_drhodt <- dee_dt, Rho, 1, false;
        "∂²e⁻/∂T²": d2ee_dt2 <- e_e, Temp, 2, false;
        "∂³e⁻/∂ρ³": d3ee_drho3 <- dee_drho, Rho, 2, false;
        "∂³e⁻/∂ρ²∂T": d3ee_drho2dt <- dee_dt, Rho, 2, false;
        "∂³e⁻/∂ρ∂T²": d3ee_drhodt2 <- d2ee_dt2, Rho, 1, false;
        "∂³e⁻/∂T³": d3ee_dt3 <- dee_dt, Temp, 2, false;
        "∂e⁺/∂ρ": dep_drho <- e_pos, Rho, 1, true;
        "∂e⁺/∂T": dep_dt <- e_pos, Temp, 1, true;
        "∂²e⁺/∂ρ²": d2ep_drho2 <- e_pos, Rho, 2, true;
        "∂²e⁺/∂ρ∂T": d2ep_drhodt <- dep_dt, Rho, 1, true;
        "∂²e⁺/∂T²": d2ep_dt2 <- e_pos, Temp, 2, true;
        "∂³e⁺/∂ρ³": d3ep_drho3 <- dep_drho, Rho, 2, true;
        "∂³e⁺/∂ρ²∂T": d3ep_drho2dt <- dep_dt, Rho, 2, true;
        "∂³e⁺/∂ρ∂T²": d3ep_drhodt2 <- d2ep_dt2, Rho, 1, true;
        "∂³e⁺/∂T³": d3ep_dt3 <- dep_dt, Temp, 2, true;
        "∂e/∂ρ": de_drho <- e, Rho, 1, false;
        "∂e/∂T": de_dt <- e, Temp, 1, false;
        "∂²e/∂ρ²": d2e_drho2 <- e, Rho, 2, false;
        "∂²e/∂ρ∂T": d2e_drhodt <- de_dt, Rho, 1, false;
        "∂²e/∂T²": d2e_dt2 <- e, Temp, 2, false;
        "∂³e/∂ρ³": d3e_drho3 <- de_drho, Rho, 2, false;
        "∂³e/∂ρ²∂T": d3e_drho2dt <- de_dt, Rho, 2, false;
        "∂³e/∂ρ∂T²": d3e_drhodt2 <- d2e_dt2, Rho, 1, false;
        "∂³e/∂T³": d3e_dt3 <- de_dt, Temp, 2, false;
    ]
}

/// All specific-entropy derivative checks (s⁻, s⁺, s).
#[must_use]
pub fn entropy_checks<R: Real>() -> Vec<DerivCheck<R>> {
    deriv_checks![
        "∂s⁻/∂ρ": dse_drho <- s_e, Rho, 1, false;
        "∂s⁻/∂T": dse_dt <- s_e, Temp, 1, false;
        "∂²s⁻/∂ρ²": d2se_drho2 <- s_e, Rho, 2, false;
        "∂²s⁻/∂ρ∂T": d2se_drhodt <- dse_dt, Rho, 1, false;
        "∂²s⁻/∂T²": d2se_dt2 <- s_e, Temp, 2, false;
        "∂³s⁻/∂ρ³": d3se_drho3 <- dse_drho, Rho, 2, false;
        "∂³s⁻/∂ρ²∂T": d3se_drho2dt <- dse_dt, Rho, 2, false;
        "∂³s⁻/∂ρ∂T²": d3se_drhodt2 <- d2se_dt2, Rho, 1, false;
        "∂³s⁻/∂T³": d3se_dt3 <- dse_dt, Temp, 2, false;
        "∂s⁺/∂ρ": dsp_drho <- s_pos, Rho, 1, true;
        "∂s⁺/∂T": dsp_dt <- s_pos, Temp, 1, true;
        "∂²s⁺/∂ρ²": d2sp_drho2 <- s_pos, Rho, 2, true;
        "∂²s⁺/∂ρ∂T": d2sp_drhodt <- dsp_dt, Rho, 1, true;
        "∂²s⁺/∂T²": d2sp_dt2 <- s_pos, Temp, 2, true;
        "∂³s⁺/∂ρ³": d3sp_drho3 <- dsp_drho, Rho, 2, true;
        "∂³s⁺/∂ρ²∂T": d3sp_drho2dt <- dsp_dt, Rho, 2, true;
        "∂³s⁺/∂ρ∂T²": d3sp_drhodt2 <- d2sp_dt2, Rho, 1, true;
        "∂³s⁺/∂T³": d3sp_dt3 <- dsp_dt, Temp, 2, true;
        "∂s/∂ρ": ds_drho <- s, Rho, 1, false;
        "∂s/∂T": ds_dt <- s, Temp, 1, false;
        "∂²s/∂ρ²": d2s_drho2 <- s, Rho, 2, false;
        "∂²s/∂ρ∂T": d2s_drhodt <- ds_dt, Rho, 1, false;
        "∂²s/∂T²": d2s_dt2 <- s, Temp, 2, false;
        "∂³s/∂ρ³": d3s_drho3 <- ds_drho, Rho, 2, false;
        "∂³s/∂ρ²∂T": d3s_drho2dt <- ds_dt, Rho, 2, false;
        "∂³s/∂ρ∂T²": d3s_drhodt2 <- d2s_dt2, Rho, 1, false;
        "∂³s/∂T³": d3s_dt3 <- ds_dt, Temp, 2, false;
    ]
}

/// All pressure derivative checks (p⁻, p⁺, p).
#[must_use]
pub fn pressure_checks<R: Real>() -> Vec<DerivCheck<R>> {
    deriv_checks![
        "∂p⁻/∂ρ": dpe_drho <- p_e, Rho, 1, false;
        "∂p⁻/∂T": dpe_dt <- p_e, Temp, 1, false;
        "∂²p⁻/∂ρ²": d2pe_drho2 <- p_e, Rho, 2, false;
        "∂²p⁻/∂ρ∂T": d2pe_drhodt <- dpe_dt, Rho, 1, false;
        "∂²p⁻/∂T²": d2pe_dt2 <- p_e, Temp, 2, false;
        "∂³p⁻/∂ρ³": d3pe_drho3 <- dpe_drho, Rho, 2, false;
        "∂³p⁻/∂ρ²∂T": d3pe_drho2dt <- dpe_dt, Rho, 2, false;
        "∂³p⁻/∂ρ∂T²": d3pe_drhodt2 <- d2pe_dt2, Rho, 1, false;
        "∂³p⁻/∂T³": d3pe_dt3 <- dpe_dt, Temp, 2, false;
        "∂p⁺/∂ρ": dpp_drho <- p_pos, Rho, 1, true;
        "∂p⁺/∂T": dpp_dt <- p_pos, Temp, 1, true;
        "∂²p⁺/∂ρ²": d2pp_drho2 <- p_pos, Rho, 2, true;
        "∂²p⁺/∂ρ∂T": d2pp_drhodt <- dpp_dt, Rho, 1, true;
        "∂²p⁺/∂T²": d2pp_dt2 <- p_pos, Temp, 2, true;
        "∂³p⁺/∂ρ³": d3pp_drho3 <- dpp_drho, Rho, 2, true;
        "∂³p⁺/∂ρ²∂T": d3pp_drho2dt <- dpp_dt, Rho, 2, true;
        "∂³p⁺/∂ρ∂T²": d3pp_drhodt2 <- d2pp_dt2, Rho, 1, true;
        "∂³p⁺/∂T³": d3pp_dt3 <- dpp_dt, Temp, 2, true;
        "∂p/∂ρ": dp_drho <- p, Rho, 1, false;
        "∂p/∂T": dp_dt <- p, Temp, 1, false;
        "∂²p/∂ρ²": d2p_drho2 <- p, Rho, 2, false;
        "∂²p/∂ρ∂T": d2p_drhodt <- dp_dt, Rho, 1, false;
        "∂²p/∂T²": d2p_dt2 <- p, Temp, 2, false;
        "∂³p/∂ρ³": d3p_drho3 <- dp_drho, Rho, 2, false;
        "∂³p/∂ρ²∂T": d3p_drho2dt <- dp_dt, Rho, 2, false;
        "∂³p/∂ρ∂T²": d3p_drhodt2 <- d2p_dt2, Rho, 1, false;
        "∂³p/∂T³": d3p_dt3 <- dp_dt, Temp, 2, false;
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harness_tracks_pass_fail() {
        let mut h = ValidationHarness::new("test");
        h.check_abs("exact", 1.0, 1.0, 1e-10);
        h.check_rel("close", 1.0001, 1.0, 1e-3);
        h.check_upper("far", 2.0, 1.0);
        assert_eq!(h.passed_count(), 2);
        assert!(!h.all_passed());
    }

    #[test]
    fn relative_check_handles_zero_expected() {
        let mut h = ValidationHarness::new("test");
        h.check_rel("near_zero", 1e-15, 0.0, 1e-10);
        assert!(h.checks[0].passed);
    }

    #[test]
    fn check_bool_false_counts_as_failure() {
        let mut h = ValidationHarness::new("test");
        h.check_bool("fail", false);
        assert_eq!(h.passed_count(), 0);
    }

    #[test]
    fn accessor_tables_cover_all_derivative_fields() {
        // 9 derivative fields × 3 species per thermodynamic family
        assert_eq!(number_density_checks::<f64>().len(), 27);
        assert_eq!(energy_checks::<f64>().len(), 27);
        assert_eq!(entropy_checks::<f64>().len(), 27);
        assert_eq!(pressure_checks::<f64>().len(), 27);
        assert_eq!(eta_checks::<f64>().len(), 5);
    }

    #[test]
    fn accessors_read_the_right_fields() {
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        let st = eos.pe_state(1.0e5, 1.0e8, 0.5).expect("state");
        let checks = pressure_checks::<f64>();
        let dp = checks.iter().find(|c| c.name == "∂p/∂ρ").expect("present");
        assert_eq!((dp.analytic)(&st), st.dp_drho);
        assert_eq!((dp.probe)(&st), st.p);
    }

    #[test]
    fn run_check_confirms_a_first_derivative() {
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        let checks = eta_checks::<f64>();
        let c = checks.iter().find(|c| c.name == "∂η/∂ρ").expect("present");
        let cmp = run_deriv_check(&eos, c, 1.0e5, 1.0e8, 0.5).expect("solve");
        assert!(cmp.signal_to_noise > crate::tolerances::FD_SNR_MIN);
        assert!(
            cmp.rel_err < crate::tolerances::FD_AGREEMENT_REL,
            "rel = {:e}",
            cmp.rel_err
        );
    }

    #[test]
    fn snr_flags_pair_dominated_rho_derivatives() {
        // hot and dilute: the pair sea swamps the net charge and ρ barely
        // moves the pressure, so the FD comparison must be flagged
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        let checks = pressure_checks::<f64>();
        let c = checks.iter().find(|c| c.name == "∂p/∂ρ").expect("present");
        let cmp = run_deriv_check(&eos, c, 1.0e-2, 5.0e9, 0.5).expect("solve");
        assert!(
            cmp.signal_to_noise < crate::tolerances::FD_SNR_MIN,
            "snr = {:e}",
            cmp.signal_to_noise
        );
    }
}
