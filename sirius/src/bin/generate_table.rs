// SPDX-License-Identifier: AGPL-3.0-only

//! Generate the four-block EOS table in the Timmes & Swesty (2000) layout.
//!
//! Defaults reproduce the reference grid (841 × 321 over
//! ρ ∈ [1e-10, 1e11], T ∈ [1e3, 1e11], Yₑ = 1); the flags shrink it for
//! spot runs.
//!
//! Run: cargo run --release --bin `generate_table` --
//!        [--rho-pts=841] [--t-pts=321] [--ye=1.0] [--out=helm_table.dat]

use std::path::PathBuf;
use std::time::Instant;

use whitedwarf_sirius::table::{generate, TableSpec};
use whitedwarf_sirius::tolerances::QUADRATURE_POINTS;
use whitedwarf_sirius::ElectronPositronEOS;

struct CliArgs {
    spec: TableSpec,
    out: PathBuf,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let get = |prefix: &str| -> Option<String> {
        args.iter()
            .find(|a| a.starts_with(prefix))
            .map(|a| a[prefix.len()..].to_string())
    };

    let mut spec = TableSpec::default();
    if let Some(n) = get("--rho-pts=").and_then(|s| s.parse().ok()) {
        spec.rho_pts = n;
    }
    if let Some(n) = get("--t-pts=").and_then(|s| s.parse().ok()) {
        spec.t_pts = n;
    }
    if let Some(y) = get("--ye=").and_then(|s| s.parse().ok()) {
        spec.ye = y;
    }
    let out = get("--out=").map_or_else(
        || PathBuf::from(format!("helm_table_p64_q{QUADRATURE_POINTS}.dat")),
        PathBuf::from,
    );
    CliArgs { spec, out }
}

fn main() {
    let cli = parse_args();
    let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();

    println!("EOS table sweep");
    println!("  grid:          {} x {} (rho x T)", cli.spec.rho_pts, cli.spec.t_pts);
    println!("  rho:           [{:e}, {:e}] g/cm^3", cli.spec.rho_lo, cli.spec.rho_hi);
    println!("  T:             [{:e}, {:e}] K", cli.spec.t_lo, cli.spec.t_hi);
    println!("  Ye:            {}", cli.spec.ye);
    println!("  quad points:   {QUADRATURE_POINTS}");
    println!("  rayon threads: {}", rayon::current_num_threads());

    let start = Instant::now();
    let table = generate(&eos, &cli.spec);
    let elapsed = start.elapsed().as_secs_f64();
    println!(
        "  swept {} cells in {elapsed:.1} s ({} failed)",
        table.len(),
        table.failures.len()
    );

    if let Err(e) = table.write_text(&cli.out) {
        eprintln!("writing {} failed: {e}", cli.out.display());
        std::process::exit(1);
    }
    let sidecar = cli.out.with_extension("json");
    if let Err(e) = table.write_provenance(&sidecar) {
        eprintln!("writing {} failed: {e}", sidecar.display());
        std::process::exit(1);
    }
    println!("  wrote {} and {}", cli.out.display(), sidecar.display());
}
