// SPDX-License-Identifier: AGPL-3.0-only

//! Finite-difference sweep of every EOSState derivative field.
//!
//! Every analytic derivative the state exposes is compared against a
//! Ridders difference of its lower-order counterpart at each point of
//! the representative (ρ, T) grid, using the named accessor tables for
//! the η, n, e, s, and p families, electron/positron/total. Two kinds of
//! point are skipped as unmeasurable rather than checked vacuously:
//! positron checks where n⁺ has underflowed, and temperature-derivative /
//! entropy checks past the f64 degeneracy limit (see `tolerances`).

use whitedwarf_sirius::tolerances::{
    DEGENERACY_FD_LIMIT, FD_AGREEMENT3_REL, FD_AGREEMENT_REL, FD_SNR_MIN, POSITRON_NEGLIGIBLE,
};
use whitedwarf_sirius::validation::{
    energy_checks, entropy_checks, eta_checks, number_density_checks, pressure_checks,
    run_deriv_check, DerivCheck, ValidationHarness,
};
use whitedwarf_sirius::ElectronPositronEOS;

const TEMPS: [f64; 4] = [1.0e4, 1.0e6, 1.0e8, 5.0e9];
const RHOS: [f64; 5] = [1.0e-2, 1.0e2, 1.0e5, 1.0e7, 5.0e9];
const YE: f64 = 0.5;

fn sweep(
    harness: &mut ValidationHarness,
    eos: &ElectronPositronEOS<f64>,
    family: &str,
    thermal: bool,
    checks: &[DerivCheck<f64>],
) {
    println!("── {family} ──");
    let mut skipped = 0usize;
    for temp in TEMPS {
        for rho in RHOS {
            let st = eos.pe_state(rho, temp, YE).expect("grid state");
            for check in checks {
                if check.positron && st.n_pos < POSITRON_NEGLIGIBLE {
                    continue;
                }
                // past the f64 degeneracy limit, T-derivatives and anything
                // entropy-flavored are roundoff, not signal
                if st.eta > DEGENERACY_FD_LIMIT && (thermal || check.name.contains("∂T")) {
                    skipped += 1;
                    continue;
                }
                // the third-order sweep differences already-noisy fields
                let tol = if check.name.contains('³') {
                    FD_AGREEMENT3_REL
                } else {
                    FD_AGREEMENT_REL
                };
                let cmp = run_deriv_check(eos, check, rho, temp, YE).expect("grid state");
                if cmp.signal_to_noise < FD_SNR_MIN {
                    skipped += 1;
                    continue;
                }
                harness.check_upper(
                    &format!("{} (ρ={rho:.1e}, T={temp:.1e})", check.name),
                    cmp.rel_err,
                    tol,
                );
            }
        }
    }
    if skipped > 0 {
        println!("  ({skipped} f64-unmeasurable checks skipped)");
    }
}

fn main() {
    println!("═══════════════════════════════════════════════════════════");
    println!("  EOSState derivative validation (analytic vs differenced)");
    println!("═══════════════════════════════════════════════════════════\n");

    let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
    let mut harness = ValidationHarness::new("eos_derivatives");

    sweep(&mut harness, &eos, "degeneracy parameter η", false, &eta_checks());
    sweep(&mut harness, &eos, "number density", false, &number_density_checks());
    sweep(&mut harness, &eos, "specific energy", false, &energy_checks());
    sweep(&mut harness, &eos, "specific entropy", true, &entropy_checks());
    sweep(&mut harness, &eos, "pressure", false, &pressure_checks());

    harness.finish();
}
