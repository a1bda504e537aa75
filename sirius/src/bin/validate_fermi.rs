// SPDX-License-Identifier: AGPL-3.0-only

//! Validate the generalized Fermi-Dirac integral evaluator.
//!
//! Part 1: spot values for F and its (η, β) partials against the
//! cross-check table computed with the Gong et al. (2001) reference code,
//! at f64-appropriate tolerances.
//!
//! Part 2: finite-difference sweep. Every analytic partial must agree
//! with a Ridders difference of the next-lower-order evaluation across
//! η ∈ [-70, 1e4], β ∈ [1e-7, 100].

use whitedwarf_sirius::difference::adaptive_diff;
use whitedwarf_sirius::tolerances::{
    FD_AGREEMENT3_REL, FD_AGREEMENT_REL, FERMI_CANCELLATION_REL, FERMI_DERIV1_REL,
    FERMI_DERIV2_REL, FERMI_VALUE_REL,
};
use whitedwarf_sirius::validation::ValidationHarness;
use whitedwarf_sirius::{FermiIntegral, Real};

struct SpotCase {
    k: f64,
    eta: f64,
    beta: f64,
    /// F, ∂F/∂η, ∂F/∂β, ∂²F/∂η², ∂²F/∂η∂β, ∂²F/∂β²
    expected: [f64; 6],
    /// relative tolerance for ∂²F/∂η² (the cancellation-prone entry)
    deta2_tol: f64,
}

#[rustfmt::skip]
fn spot_cases() -> Vec<SpotCase> {
    vec![
        SpotCase { k: 0.5, eta: -100.0, beta: 0.0, deta2_tol: FERMI_DERIV2_REL, expected: [
            3.296_831_494_679_612_4e-44, 3.296_831_494_679_613_9e-44, 1.236_311_810_504_854_8e-44,
            3.296_831_494_679_612_9e-44, 1.236_311_810_504_855_6e-44, -7.726_948_815_655_345_5e-45] },
        SpotCase { k: 0.5, eta: -50.0, beta: 1.0, deta2_tol: FERMI_DERIV2_REL, expected: [
            2.231_438_639_706_210_4e-22, 2.231_438_639_706_210_8e-22, 4.451_361_618_846_085_2e-23,
            2.231_438_639_706_209_9e-22, 4.451_361_618_846_087_0e-23, -1.069_656_677_587_767_3e-23] },
        SpotCase { k: 0.5, eta: 1.0, beta: 10.0, deta2_tol: FERMI_DERIV2_REL, expected: [
            4.309_312_153_061_272_4, 3.090_991_756_275_642_4, 1.900_295_876_213_417_8e-1,
            1.679_658_525_843_407_8, 1.397_796_648_958_652_4e-1, -8.481_669_674_226_123_6e-3] },
        SpotCase { k: 0.5, eta: 500.0, beta: 100.0, deta2_tol: FERMI_CANCELLATION_REL, expected: [
            8.839_304_593_689_143_7e5, 3.535_604_615_903_746_0e3, 4.419_298_817_791_752_3e3,
            7.071_067_813_282_581_9, 1.767_731_598_687_944_2e1, -2.209_472_736_636_386_6e1] },
        SpotCase { k: -0.5, eta: -100.0, beta: 100.0, deta2_tol: FERMI_DERIV2_REL, expected: [
            2.781_674_273_106_366_6e-43, 2.781_674_273_106_367_8e-43, 1.265_397_071_738_543_6e-45,
            2.781_674_273_106_367_4e-43, 1.265_397_071_738_544_4e-45, -5.952_864_448_967_230_6e-48] },
        SpotCase { k: -0.5, eta: -50.0, beta: 0.0, deta2_tol: FERMI_DERIV2_REL, expected: [
            3.418_620_095_457_075_0e-22, 3.418_620_095_457_074_1e-22, 4.273_275_119_321_341_4e-23,
            3.418_620_095_457_073_6e-22, 4.273_275_119_321_345_0e-23, -1.602_478_169_745_502_8e-23] },
        SpotCase { k: -0.5, eta: 100.0, beta: 100.0, deta2_tol: FERMI_CANCELLATION_REL, expected: [
            7.078_777_660_822_745_5e2, 7.071_775_116_211_132_9, 3.532_386_052_871_842_3,
            -7.077_354_418_461_023_8e-6, 3.535_180_289_143_134_7e-2, -1.763_398_673_723_983_9e-2] },
        SpotCase { k: 1.5, eta: -75.0, beta: 10.0, deta2_tol: FERMI_DERIV2_REL, expected: [
            1.255_397_990_463_645_3e-32, 1.255_397_990_463_644_7e-32, 5.723_033_800_223_592_5e-34,
            1.255_397_990_463_645_3e-32, 5.723_033_800_223_596_8e-34, -2.621_233_279_919_937_9e-35] },
        SpotCase { k: 1.5, eta: -20.0, beta: 100.0, deta2_tol: FERMI_DERIV2_REL, expected: [
            2.929_415_967_090_493_5e-8, 2.929_415_966_332_043_3e-8, 1.450_271_236_333_599_6e-10,
            2.929_415_964_815_143_0e-8, 1.450_271_235_961_748_5e-10, -7.180_491_748_569_179_3e-13] },
        SpotCase { k: 1.5, eta: 40.0, beta: 1.0e4, deta2_tol: FERMI_DERIV2_REL, expected: [
            1.517_805_287_269_035_1e6, 1.133_699_966_388_611_9e5, 7.588_969_751_771_107_0e1,
            5.656_861_320_560_188_7e3, 5.668_471_547_742_522_7, -3.794_456_533_881_336_1e-3] },
        SpotCase { k: 2.5, eta: -55.0, beta: 15.0, deta2_tol: FERMI_DERIV2_REL, expected: [
            2.182_136_730_524_318_3e-23, 2.182_136_730_524_318_0e-23, 6.967_143_780_813_856_0e-25,
            2.182_136_730_524_318_6e-23, 6.967_143_780_813_858_7e-25, -2.226_177_180_831_271_1e-26] },
        SpotCase { k: 2.5, eta: 10.0, beta: 1.0e-4, deta2_tol: FERMI_DERIV2_REL, expected: [
            1.034_907_385_435_160_7e3, 3.357_659_222_310_709_3e2, 2.231_052_413_057_082_0e3,
            8.007_113_460_296_260_1e1, 9.050_977_777_790_246_8e2, -5.201_174_138_118_468_4e3] },
        SpotCase { k: 2.5, eta: 100.0, beta: 1.0, deta2_tol: FERMI_DERIV2_REL, expected: [
            1.794_677_186_947_611_3e7, 7.148_430_555_609_187_6e5, 8.740_888_892_892_900_9e6,
            2.136_125_014_566_810_6e4, 3.504_178_010_777_813_0e5, -4.257_540_402_143_972_9e6] },
    ]
}

fn main() {
    println!("═══════════════════════════════════════════════════════════");
    println!("  Fermi-Dirac integral validation");
    println!("  Reference: Gong et al., Comput. Phys. Commun. 136, 294");
    println!("═══════════════════════════════════════════════════════════\n");

    let mut harness = ValidationHarness::new("fermi_integrals");

    println!("── Spot values ──");
    for case in spot_cases() {
        let fi = FermiIntegral::evaluated(case.k, case.eta, case.beta, 2);
        let got = [
            fi.f,
            fi.df_deta,
            fi.df_dbeta,
            fi.d2f_deta2,
            fi.d2f_detadbeta,
            fi.d2f_dbeta2,
        ];
        let tols = [
            FERMI_VALUE_REL,
            FERMI_DERIV1_REL,
            FERMI_DERIV1_REL,
            case.deta2_tol,
            FERMI_DERIV2_REL,
            FERMI_DERIV2_REL,
        ];
        let names = ["F", "dF/dη", "dF/dβ", "d²F/dη²", "d²F/dη∂β", "d²F/dβ²"];
        for i in 0..6 {
            harness.check_rel(
                &format!(
                    "{} (k={:+.1}, η={:.6e}, β={:.6e})",
                    names[i], case.k, case.eta, case.beta
                ),
                got[i],
                case.expected[i],
                tols[i],
            );
        }
    }

    println!("\n── Finite-difference sweep: first and second partials ──");
    for k in [-0.5, 0.5, 1.5, 2.5] {
        for eta in [-70.0f64, 0.0, 50.0, 500.0, 1.0e4] {
            for beta in [1.0e-7, 1.0e-3, 30.0, 100.0] {
                let fi = FermiIntegral::evaluated(k, eta, beta, 2);
                let h_eta = if eta == 0.0 { 0.05 } else { 0.05 * eta.abs() };
                let h_beta = 0.05 * beta;
                let tag = format!("(k={k:+.1}, η={eta:.3e}, β={beta:.3e})");

                let (fd, _) =
                    adaptive_diff(|e| FermiIntegral::evaluated(k, e, beta, 0).f, eta, h_eta);
                harness.check_upper(
                    &format!("dF/dη FD {tag}"),
                    f64::rel_error(fi.df_deta, fd),
                    FD_AGREEMENT_REL,
                );

                let (fd, _) =
                    adaptive_diff(|b| FermiIntegral::evaluated(k, eta, b, 0).f, beta, h_beta);
                harness.check_upper(
                    &format!("dF/dβ FD {tag}"),
                    f64::rel_error(fi.df_dbeta, fd),
                    FD_AGREEMENT_REL,
                );

                // second partials: difference the analytic first partials
                let (fd, _) = adaptive_diff(
                    |e| FermiIntegral::evaluated(k, e, beta, 1).df_deta,
                    eta,
                    h_eta,
                );
                harness.check_upper(
                    &format!("d²F/dη² FD {tag}"),
                    f64::rel_error(fi.d2f_deta2, fd),
                    FD_AGREEMENT_REL,
                );

                let (fd, _) = adaptive_diff(
                    |b| FermiIntegral::evaluated(k, eta, b, 1).df_deta,
                    beta,
                    h_beta,
                );
                harness.check_upper(
                    &format!("d²F/dη∂β FD {tag}"),
                    f64::rel_error(fi.d2f_detadbeta, fd),
                    FD_AGREEMENT_REL,
                );

                let (fd, _) = adaptive_diff(
                    |b| FermiIntegral::evaluated(k, eta, b, 1).df_dbeta,
                    beta,
                    h_beta,
                );
                harness.check_upper(
                    &format!("d²F/dβ² FD {tag}"),
                    f64::rel_error(fi.d2f_dbeta2, fd),
                    FD_AGREEMENT_REL,
                );
            }
        }
    }

    println!("\n── Finite-difference sweep: third partials ──");
    for k in [-0.5, 0.5, 1.5, 2.5] {
        for eta in [-10.0f64, 5.0, 100.0] {
            for beta in [0.1, 10.0] {
                let fi = FermiIntegral::evaluated(k, eta, beta, 3);
                let h_eta = 0.05 * eta.abs();
                let h_beta = 0.05 * beta;
                let tag = format!("(k={k:+.1}, η={eta:.3e}, β={beta:.3e})");

                let (fd, _) = adaptive_diff(
                    |e| FermiIntegral::evaluated(k, e, beta, 2).d2f_deta2,
                    eta,
                    h_eta,
                );
                harness.check_upper(
                    &format!("d³F/dη³ FD {tag}"),
                    f64::rel_error(fi.d3f_deta3, fd),
                    FD_AGREEMENT3_REL,
                );

                let (fd, _) = adaptive_diff(
                    |b| FermiIntegral::evaluated(k, eta, b, 2).d2f_deta2,
                    beta,
                    h_beta,
                );
                harness.check_upper(
                    &format!("d³F/dη²∂β FD {tag}"),
                    f64::rel_error(fi.d3f_deta2dbeta, fd),
                    FD_AGREEMENT3_REL,
                );

                let (fd, _) = adaptive_diff(
                    |b| FermiIntegral::evaluated(k, eta, b, 2).d2f_detadbeta,
                    beta,
                    h_beta,
                );
                harness.check_upper(
                    &format!("d³F/dη∂β² FD {tag}"),
                    f64::rel_error(fi.d3f_detadbeta2, fd),
                    FD_AGREEMENT3_REL,
                );

                let (fd, _) = adaptive_diff(
                    |b| FermiIntegral::evaluated(k, eta, b, 2).d2f_dbeta2,
                    beta,
                    h_beta,
                );
                harness.check_upper(
                    &format!("d³F/dβ³ FD {tag}"),
                    f64::rel_error(fi.d3f_dbeta3, fd),
                    FD_AGREEMENT3_REL,
                );
            }
        }
    }

    harness.finish();
}
