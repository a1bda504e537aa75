// SPDX-License-Identifier: AGPL-3.0-only

//! Single-point EOS driver: print the full state at one (ρ, T, Yₑ).
//!
//! Run: cargo run --release --bin `pe_state` -- --rho=1e4 --temp=1e7 --ye=0.5

use whitedwarf_sirius::ElectronPositronEOS;

struct CliArgs {
    rho: f64,
    temp: f64,
    ye: f64,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let get = |prefix: &str| -> Option<f64> {
        args.iter()
            .find(|a| a.starts_with(prefix))
            .and_then(|a| a[prefix.len()..].parse().ok())
    };
    CliArgs {
        rho: get("--rho=").unwrap_or(1.0e4),
        temp: get("--temp=").unwrap_or(1.0e7),
        ye: get("--ye=").unwrap_or(0.5),
    }
}

fn main() {
    let cli = parse_args();
    let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();

    match eos.pe_state(cli.rho, cli.temp, cli.ye) {
        Ok(state) => println!("{state}"),
        Err(e) => {
            eprintln!("pe_state failed: {e}");
            std::process::exit(1);
        }
    }
}
