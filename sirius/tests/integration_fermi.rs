// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: Fermi-Dirac integral evaluator against reference
//! values and its own finite-difference oracle.

use whitedwarf_sirius::difference::{adaptive_diff, adaptive_diff2};
use whitedwarf_sirius::tolerances::{
    FD_AGREEMENT_REL, FERMI_DERIV1_REL, FERMI_DERIV2_REL, FERMI_VALUE_REL,
};
use whitedwarf_sirius::{FermiIntegral, Real};

#[test]
fn reference_values_nondegenerate() {
    // k = 1/2, η = -50, β = 1 (Gong et al. cross-check)
    let fi = FermiIntegral::evaluated(0.5f64, -50.0, 1.0, 2);
    assert!(f64::rel_error(fi.f, 2.231_438_639_706_210_4e-22) < FERMI_VALUE_REL);
    assert!(f64::rel_error(fi.df_deta, 2.231_438_639_706_210_8e-22) < FERMI_DERIV1_REL);
    assert!(f64::rel_error(fi.df_dbeta, 4.451_361_618_846_085_2e-23) < FERMI_DERIV1_REL);
    assert!(f64::rel_error(fi.d2f_dbeta2, -1.069_656_677_587_767_3e-23) < FERMI_DERIV2_REL);
}

#[test]
fn reference_values_relativistic_degenerate() {
    // k = 3/2, η = 40, β = 1e4
    let fi = FermiIntegral::evaluated(1.5f64, 40.0, 1.0e4, 2);
    assert!(f64::rel_error(fi.f, 1.517_805_287_269_035_1e6) < FERMI_VALUE_REL);
    assert!(f64::rel_error(fi.df_deta, 1.133_699_966_388_611_9e5) < FERMI_DERIV1_REL);
    assert!(f64::rel_error(fi.d2f_deta2, 5.656_861_320_560_188_7e3) < FERMI_DERIV2_REL);
}

#[test]
fn reference_values_near_nonrelativistic() {
    // k = 5/2, η = 10, β = 1e-4: stiff β → 0 corner
    let fi = FermiIntegral::evaluated(2.5f64, 10.0, 1.0e-4, 2);
    assert!(f64::rel_error(fi.f, 1.034_907_385_435_160_7e3) < FERMI_VALUE_REL);
    assert!(f64::rel_error(fi.df_dbeta, 2.231_052_413_057_082_0e3) < FERMI_DERIV1_REL);
    assert!(f64::rel_error(fi.d2f_dbeta2, -5.201_174_138_118_468_4e3) < FERMI_DERIV2_REL);
}

#[test]
fn reference_values_negative_half_order() {
    // k = -1/2: endpoint singularity exercised
    let fi = FermiIntegral::evaluated(-0.5f64, -100.0, 100.0, 2);
    assert!(f64::rel_error(fi.f, 2.781_674_273_106_366_6e-43) < FERMI_VALUE_REL);
    assert!(f64::rel_error(fi.df_dbeta, 1.265_397_071_738_543_6e-45) < FERMI_DERIV1_REL);
}

#[test]
fn non_negative_over_the_full_test_grid() {
    for k in [-0.5f64, 0.5, 1.5, 2.5] {
        for eta in [-100.0f64, -70.0, 0.0, 50.0, 500.0, 1.0e4] {
            for beta in [1.0e-7f64, 1.0e-3, 30.0, 100.0] {
                let fi = FermiIntegral::evaluated(k, eta, beta, 3);
                assert!(fi.f >= 0.0, "F_{k}({eta}, {beta}) = {}", fi.f);
                // occupation derivative integrand is positive too
                assert!(fi.df_deta >= 0.0, "dF/dη must be ≥ 0");
            }
        }
    }
}

#[test]
fn eta_derivatives_match_oracle_at_extreme_degeneracy() {
    // η = 1e4: the Fermi step must stay resolved by the moving panels
    let (k, eta, beta) = (0.5f64, 1.0e4, 30.0);
    let fi = FermiIntegral::evaluated(k, eta, beta, 2);
    let h = 0.05 * eta;
    let (fd, _) = adaptive_diff(|e| FermiIntegral::evaluated(k, e, beta, 0).f, eta, h);
    assert!(
        f64::rel_error(fi.df_deta, fd) < FD_AGREEMENT_REL,
        "analytic {:e} vs fd {fd:e}",
        fi.df_deta
    );
}

#[test]
fn beta_derivatives_match_oracle_near_beta_zero() {
    // β = 1e-7: overflow/stiffness guard region
    let (k, eta, beta) = (1.5f64, 5.0, 1.0e-7);
    let fi = FermiIntegral::evaluated(k, eta, beta, 2);
    let (fd, _) = adaptive_diff(|b| FermiIntegral::evaluated(k, eta, b, 0).f, beta, 0.05 * beta);
    assert!(
        f64::rel_error(fi.df_dbeta, fd) < FD_AGREEMENT_REL,
        "analytic {:e} vs fd {fd:e}",
        fi.df_dbeta
    );
}

#[test]
fn second_derivative_consistent_both_ways() {
    // d²F/dη² must match both a second difference of F and a first
    // difference of dF/dη
    let (k, eta, beta) = (0.5f64, 3.0, 2.0);
    let fi = FermiIntegral::evaluated(k, eta, beta, 2);
    let h = 0.05 * eta;
    let (fd2, _) = adaptive_diff2(|e| FermiIntegral::evaluated(k, e, beta, 0).f, eta, h);
    let (fd1, _) = adaptive_diff(|e| FermiIntegral::evaluated(k, e, beta, 1).df_deta, eta, h);
    assert!(f64::rel_error(fi.d2f_deta2, fd2) < FD_AGREEMENT_REL, "{fd2:e}");
    assert!(f64::rel_error(fi.d2f_deta2, fd1) < FD_AGREEMENT_REL, "{fd1:e}");
}

#[test]
fn third_derivatives_match_oracle() {
    let (k, eta, beta) = (1.5f64, 5.0, 0.5);
    let fi = FermiIntegral::evaluated(k, eta, beta, 3);
    let (fd, _) = adaptive_diff(
        |e| FermiIntegral::evaluated(k, e, beta, 2).d2f_deta2,
        eta,
        0.05 * eta,
    );
    assert!(
        f64::rel_error(fi.d3f_deta3, fd) < FD_AGREEMENT_REL,
        "analytic {:e} vs fd {fd:e}",
        fi.d3f_deta3
    );
    let (fd, _) = adaptive_diff(
        |b| FermiIntegral::evaluated(k, eta, b, 2).d2f_dbeta2,
        beta,
        0.05 * beta,
    );
    assert!(
        f64::rel_error(fi.d3f_dbeta3, fd) < FD_AGREEMENT_REL,
        "analytic {:e} vs fd {fd:e}",
        fi.d3f_dbeta3
    );
}

#[test]
fn evaluation_is_deterministic() {
    let a = FermiIntegral::evaluated(0.5f64, 12.0, 3.0, 3);
    let b = FermiIntegral::evaluated(0.5f64, 12.0, 3.0, 3);
    assert_eq!(a.f.to_bits(), b.f.to_bits());
    assert_eq!(a.d3f_dbeta3.to_bits(), b.d3f_dbeta3.to_bits());
}
