// SPDX-License-Identifier: AGPL-3.0-only

//! Solve η over a wide (ρYₑ, T) grid and print the result table.
//!
//! Covers 24 decades of net electron density against temperatures from
//! 1e3 K to 1e12 K, the full span a stellar table generator might
//! request. A cell whose bracket fails is reported and printed as NaN;
//! the sweep continues.

use whitedwarf_sirius::ElectronPositronEOS;

const TEMPS: [f64; 19] = [
    1.0e3, 3.0e3, 1.0e4, 3.0e4, 1.0e5, 3.0e5, 1.0e6, 3.0e6, 1.0e7, 3.0e7, 1.0e8, 3.0e8, 1.0e9,
    3.0e9, 1.0e10, 3.0e10, 1.0e11, 3.0e11, 1.0e12,
];

const RHO_YES: [f64; 25] = [
    1.0e-12, 1.0e-11, 1.0e-10, 1.0e-9, 1.0e-8, 1.0e-7, 1.0e-6, 1.0e-5, 1.0e-4, 1.0e-3, 1.0e-2,
    1.0e-1, 1.0e0, 1.0e1, 1.0e2, 1.0e3, 1.0e4, 1.0e5, 1.0e6, 1.0e7, 1.0e8, 1.0e9, 1.0e10, 1.0e11,
    1.0e12,
];

fn main() {
    let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
    let ye = 1.0;

    print!("{:>10}", "rho*Ye");
    for temp in TEMPS {
        print!(" {temp:>12.3e}");
    }
    println!();

    for rho_ye in RHO_YES {
        print!("{rho_ye:>10.1e}");
        for temp in TEMPS {
            match eos.solve_eta(rho_ye, temp, ye) {
                Ok(eta) => print!(" {eta:>12.6e}"),
                Err(e) => {
                    eprintln!("bounds failed for rho = {rho_ye:8.3e}, T = {temp:8.3e}: {e}");
                    print!(" {:>12}", "NaN");
                }
            }
        }
        println!();
    }
}
