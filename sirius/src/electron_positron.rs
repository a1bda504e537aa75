// SPDX-License-Identifier: AGPL-3.0-only

//! Electron-positron EOS: the degeneracy-parameter solve and the full
//! thermodynamic state with (ρ, T) derivatives through third order.
//!
//! Charge neutrality fixes the electron degeneracy parameter η implicitly:
//!
//! ```text
//!   n⁻(η, β) - n⁺(η, β) = ρ Yₑ N_A,      η̃ = -η - 2/β
//! ```
//!
//! with both densities built from F_{1/2} and F_{3/2}. After Brent solves
//! the constraint, the state quantities are assembled as jets ([`Jet3`])
//! in (η, β) from the integrals' analytic partials, the η(ρ,T) jet is
//! recovered by recursive implicit differentiation of the constraint, and
//! every quantity is pushed to (ρ, T) by composition. Pressure, energy,
//! and entropy follow Timmes & Swesty (ApJS 126, 501 (2000)) conventions:
//! electron energy excludes rest mass, positron energy carries the 2 m_e c²
//! pair creation cost, entropies come from σ = (E + p - μ n)/T with the
//! kinetic chemical potentials μ⁻ = η k_B T and μ⁺ = η̃ k_B T.

use std::fmt;

use crate::bounds::get_eta_bounds;
use crate::brent::brent;
use crate::constants::Constants;
use crate::error::EosError;
use crate::fermi::FermiIntegral;
use crate::jet::{implicit_inner, Jet3};
use crate::real::Real;

/// Electron number density n⁻(η, β) (1/cm³).
#[must_use]
pub fn n_e_constraint<R: Real>(eta: R, beta: R, c: &Constants<R>) -> R {
    let f12 = FermiIntegral::evaluated(R::of(0.5), eta, beta, 0);
    let f32 = FermiIntegral::evaluated(R::of(1.5), eta, beta, 0);
    c.n_coeff * beta.powf(R::of(1.5)) * (f12.f + beta * f32.f)
}

/// Positron number density n⁺(η, β) (1/cm³), via η̃ = -η - 2/β.
#[must_use]
pub fn n_p_constraint<R: Real>(eta: R, beta: R, c: &Constants<R>) -> R {
    let eta_tilde = -eta - R::of(2.0) / beta;
    let f12 = FermiIntegral::evaluated(R::of(0.5), eta_tilde, beta, 0);
    let f32 = FermiIntegral::evaluated(R::of(1.5), eta_tilde, beta, 0);
    c.n_coeff * beta.powf(R::of(1.5)) * (f12.f + beta * f32.f)
}

/// Partials of one species' number density with respect to (η, β).
#[derive(Debug, Clone, Copy)]
pub struct NumberDensityDerivatives<R> {
    /// n (1/cm³)
    pub n: R,
    /// ∂n/∂η
    pub deta: R,
    /// ∂n/∂β
    pub dbeta: R,
    /// ∂²n/∂η²
    pub deta2: R,
    /// ∂²n/∂η∂β
    pub detadbeta: R,
    /// ∂²n/∂β²
    pub dbeta2: R,
}

/// Copy a Fermi integral's partial table into jet form over its own
/// evaluation variables.
fn phase_jet<R: Real>(fi: &FermiIntegral<R>) -> Jet3<R> {
    Jet3 {
        v: fi.f,
        da: fi.df_deta,
        db: fi.df_dbeta,
        daa: fi.d2f_deta2,
        dab: fi.d2f_detadbeta,
        dbb: fi.d2f_dbeta2,
        daaa: fi.d3f_deta3,
        daab: fi.d3f_deta2dbeta,
        dabb: fi.d3f_detadbeta2,
        dbbb: fi.d3f_dbeta3,
    }
}

/// Jet of η̃ = -η - 2/β over (η, β).
fn eta_tilde_jet<R: Real>(eta: R, beta: R) -> Jet3<R> {
    let b2 = beta * beta;
    let mut j = Jet3::constant(-eta - R::of(2.0) / beta);
    j.da = -R::one();
    j.db = R::of(2.0) / b2;
    j.dbb = -R::of(4.0) / (b2 * beta);
    j.dbbb = R::of(12.0) / (b2 * b2);
    j
}

/// Re-express a positron integral's partial table, tabulated over (η̃, β),
/// as a jet over (η, β).
fn positron_phase_jet<R: Real>(fi: &FermiIntegral<R>, eta: R, beta: R) -> Jet3<R> {
    let raw = phase_jet(fi);
    let eta_t = eta_tilde_jet(eta, beta);
    let beta_j = Jet3::var_b(beta);
    Jet3::compose(&raw, &eta_t, &beta_j)
}

/// n = n_coeff β^{3/2} (F_{1/2} + β F_{3/2}) as a jet in (η, β).
fn number_density_jet<R: Real>(f12: &Jet3<R>, f32: &Jet3<R>, beta: R, c: &Constants<R>) -> Jet3<R> {
    let beta_j = Jet3::var_b(beta);
    (f12.add(&beta_j.mul(f32)))
        .mul(&beta_j.powf(R::of(1.5)))
        .scale(c.n_coeff)
}

/// p = p_coeff β^{5/2} (F_{3/2} + (β/2) F_{5/2}) as a jet in (η, β).
fn pressure_jet<R: Real>(f32: &Jet3<R>, f52: &Jet3<R>, beta: R, c: &Constants<R>) -> Jet3<R> {
    let beta_j = Jet3::var_b(beta);
    (f32.add(&beta_j.mul(f52).scale(R::of(0.5))))
        .mul(&beta_j.powf(R::of(2.5)))
        .scale(c.p_coeff)
}

/// Kinetic energy density E = e_coeff β^{5/2} (F_{3/2} + β F_{5/2}) as a
/// jet in (η, β) (erg/cm³).
fn energy_density_jet<R: Real>(f32: &Jet3<R>, f52: &Jet3<R>, beta: R, c: &Constants<R>) -> Jet3<R> {
    let beta_j = Jet3::var_b(beta);
    (f32.add(&beta_j.mul(f52)))
        .mul(&beta_j.powf(R::of(2.5)))
        .scale(c.e_coeff)
}

/// Number-density derivative bundles for electrons and positrons.
///
/// `f12`/`f32` are evaluated at η, `f12_pos`/`f32_pos` at η̃; all four must
/// be evaluated to derivative order ≥ 2. This is the canonical bundle
/// interface; the integrals themselves are not exposed downstream.
#[must_use]
pub fn n_derivs<R: Real>(
    beta: R,
    f12: &FermiIntegral<R>,
    f32: &FermiIntegral<R>,
    f12_pos: &FermiIntegral<R>,
    f32_pos: &FermiIntegral<R>,
    c: &Constants<R>,
) -> (NumberDensityDerivatives<R>, NumberDensityDerivatives<R>) {
    let eta = f12.eta;
    let ne = number_density_jet(&phase_jet(f12), &phase_jet(f32), beta, c);
    let np = number_density_jet(
        &positron_phase_jet(f12_pos, eta, beta),
        &positron_phase_jet(f32_pos, eta, beta),
        beta,
        c,
    );
    let bundle = |j: &Jet3<R>| NumberDensityDerivatives {
        n: j.v,
        deta: j.da,
        dbeta: j.db,
        deta2: j.daa,
        detadbeta: j.dab,
        dbeta2: j.dbb,
    };
    (bundle(&ne), bundle(&np))
}

/// Full thermodynamic state at one (ρ, T, Yₑ).
///
/// Specific energies/entropies are per gram; pressures erg/cm³; number
/// densities 1/cm³. `_e` fields are the electron contribution, `_pos` the
/// positron contribution, bare names the sum. Derivative fields follow
/// `d<order><quantity>_d<variables>` with `rho` = ρ and `t` = T.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub struct EOSState<R> {
    pub rho: R,
    pub temp: R,
    pub ye: R,

    pub eta: R,
    pub beta: R,
    pub deta_drho: R,
    pub deta_dt: R,
    pub d2eta_drho2: R,
    pub d2eta_drhodt: R,
    pub d2eta_dt2: R,

    // number densities
    pub n_e: R,
    pub dne_drho: R,
    pub dne_dt: R,
    pub d2ne_drho2: R,
    pub d2ne_drhodt: R,
    pub d2ne_dt2: R,
    pub d3ne_drho3: R,
    pub d3ne_drho2dt: R,
    pub d3ne_drhodt2: R,
    pub d3ne_dt3: R,

    pub n_pos: R,
    pub dnp_drho: R,
    pub dnp_dt: R,
    pub d2np_drho2: R,
    pub d2np_drhodt: R,
    pub d2np_dt2: R,
    pub d3np_drho3: R,
    pub d3np_drho2dt: R,
    pub d3np_drhodt2: R,
    pub d3np_dt3: R,

    pub n: R,
    pub dn_drho: R,
    pub dn_dt: R,
    pub d2n_drho2: R,
    pub d2n_drhodt: R,
    pub d2n_dt2: R,
    pub d3n_drho3: R,
    pub d3n_drho2dt: R,
    pub d3n_drhodt2: R,
    pub d3n_dt3: R,

    // specific internal energies
    pub e_e: R,
    pub dee_drho: R,
    pub dee_dt: R,
    pub d2ee_drho2: R,
    pub d2ee_drhodt: R,
    pub d2ee_dt2: R,
    pub d3ee_drho3: R,
    pub d3ee_drho2dt: R,
    pub d3ee_drhodt2: R,
    pub d3ee_dt3: R,

    pub e_pos: R,
    pub dep_drho: R,
    pub dep_dt: R,
    pub d2ep_drho2: R,
    pub d2ep_drhodt: R,
    pub d2ep_dt2: R,
    pub d3ep_drho3: R,
    pub d3ep_drho2dt: R,
    pub d3ep_drhodt2: R,
    pub d3ep_dt3: R,

    pub e: R,
    pub de_drho: R,
    pub de_dt: R,
    pub d2e_drho2: R,
    pub d2e_drhodt: R,
    pub d2e_dt2: R,
    pub d3e_drho3: R,
    pub d3e_drho2dt: R,
    pub d3e_drhodt2: R,
    pub d3e_dt3: R,

    // specific entropies
    pub s_e: R,
    pub dse_drho: R,
    pub dse_dt: R,
    pub d2se_drho2: R,
    pub d2se_drhodt: R,
    pub d2se_dt2: R,
    pub d3se_drho3: R,
    pub d3se_drho2dt: R,
    pub d3se_drhodt2: R,
    pub d3se_dt3: R,

    pub s_pos: R,
    pub dsp_drho: R,
    pub dsp_dt: R,
    pub d2sp_drho2: R,
    pub d2sp_drhodt: R,
    pub d2sp_dt2: R,
    pub d3sp_drho3: R,
    pub d3sp_drho2dt: R,
    pub d3sp_drhodt2: R,
    pub d3sp_dt3: R,

    pub s: R,
    pub ds_drho: R,
    pub ds_dt: R,
    pub d2s_drho2: R,
    pub d2s_drhodt: R,
    pub d2s_dt2: R,
    pub d3s_drho3: R,
    pub d3s_drho2dt: R,
    pub d3s_drhodt2: R,
    pub d3s_dt3: R,

    // pressures
    pub p_e: R,
    pub dpe_drho: R,
    pub dpe_dt: R,
    pub d2pe_drho2: R,
    pub d2pe_drhodt: R,
    pub d2pe_dt2: R,
    pub d3pe_drho3: R,
    pub d3pe_drho2dt: R,
    pub d3pe_drhodt2: R,
    pub d3pe_dt3: R,

    pub p_pos: R,
    pub dpp_drho: R,
    pub dpp_dt: R,
    pub d2pp_drho2: R,
    pub d2pp_drhodt: R,
    pub d2pp_dt2: R,
    pub d3pp_drho3: R,
    pub d3pp_drho2dt: R,
    pub d3pp_drhodt2: R,
    pub d3pp_dt3: R,

    pub p: R,
    pub dp_drho: R,
    pub dp_dt: R,
    pub d2p_drho2: R,
    pub d2p_drhodt: R,
    pub d2p_dt2: R,
    pub d3p_drho3: R,
    pub d3p_drho2dt: R,
    pub d3p_drhodt2: R,
    pub d3p_dt3: R,
}

impl<R: Real> EOSState<R> {
    fn zeroed() -> Self {
        let z = R::zero();
        Self {
            rho: z, temp: z, ye: z,
            eta: z, beta: z,
            deta_drho: z, deta_dt: z, d2eta_drho2: z, d2eta_drhodt: z, d2eta_dt2: z,
            n_e: z, dne_drho: z, dne_dt: z, d2ne_drho2: z, d2ne_drhodt: z, d2ne_dt2: z,
            d3ne_drho3: z, d3ne_drho2dt: z, d3ne_drhodt2: z, d3ne_dt3: z,
            n_pos: z, dnp_drho: z, dnp_dt: z, d2np_drho2: z, d2np_drhodt: z, d2np_dt2: z,
            d3np_drho3: z, d3np_drho2dt: z, d3np_drhodt2: z, d3np_dt3: z,
            n: z, dn_drho: z, dn_dt: z, d2n_drho2: z, d2n_drhodt: z, d2n_dt2: z,
            d3n_drho3: z, d3n_drho2dt: z, d3n_drhodt2: z, d3n_dt3: z,
            e_e: z, dee_drho: z, dee_dt: z, d2ee_drho2: z, d2ee_drhodt: z, d2ee_dt2: z,
            d3ee_drho3: z, d3ee_drho2dt: z, d3ee_drhodt2: z, d3ee_dt3: z,
            e_pos: z, dep_drho: z, dep_dt: z, d2ep_drho2: z, d2ep_drhodt: z, d2ep_dt2: z,
            d3ep_drho3: z, d3ep_drho2dt: z, d3ep_drhodt2: z, d3ep_dt3: z,
            e: z, de_drho: z, de_dt: z, d2e_drho2: z, d2e_drhodt: z, d2e_dt2: z,
            d3e_drho3: z, d3e_drho2dt: z, d3e_drhodt2: z, d3e_dt3: z,
            s_e: z, dse_drho: z, dse_dt: z, d2se_drho2: z, d2se_drhodt: z, d2se_dt2: z,
            d3se_drho3: z, d3se_drho2dt: z, d3se_drhodt2: z, d3se_dt3: z,
            s_pos: z, dsp_drho: z, dsp_dt: z, d2sp_drho2: z, d2sp_drhodt: z, d2sp_dt2: z,
            d3sp_drho3: z, d3sp_drho2dt: z, d3sp_drhodt2: z, d3sp_dt3: z,
            s: z, ds_drho: z, ds_dt: z, d2s_drho2: z, d2s_drhodt: z, d2s_dt2: z,
            d3s_drho3: z, d3s_drho2dt: z, d3s_drhodt2: z, d3s_dt3: z,
            p_e: z, dpe_drho: z, dpe_dt: z, d2pe_drho2: z, d2pe_drhodt: z, d2pe_dt2: z,
            d3pe_drho3: z, d3pe_drho2dt: z, d3pe_drhodt2: z, d3pe_dt3: z,
            p_pos: z, dpp_drho: z, dpp_dt: z, d2pp_drho2: z, d2pp_drhodt: z, d2pp_dt2: z,
            d3pp_drho3: z, d3pp_drho2dt: z, d3pp_drhodt2: z, d3pp_dt3: z,
            p: z, dp_drho: z, dp_dt: z, d2p_drho2: z, d2p_drhodt: z, d2p_dt2: z,
            d3p_drho3: z, d3p_drho2dt: z, d3p_drhodt2: z, d3p_dt3: z,
        }
    }
}

impl<R: Real> fmt::Display for EOSState<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "state at rho = {:e}, T = {:e}, Ye = {}", self.rho, self.temp, self.ye)?;
        writeln!(f, "  eta = {:.16e}   beta = {:.16e}", self.eta, self.beta)?;
        writeln!(f, "  deta/drho = {:e}   deta/dT = {:e}", self.deta_drho, self.deta_dt)?;
        writeln!(f)?;
        writeln!(f, "  {:<10} {:>24} {:>24} {:>24}", "", "electron", "positron", "total")?;
        writeln!(f, "  {:<10} {:>24e} {:>24e} {:>24e}", "n", self.n_e, self.n_pos, self.n)?;
        writeln!(f, "  {:<10} {:>24e} {:>24e} {:>24e}", "p", self.p_e, self.p_pos, self.p)?;
        writeln!(f, "  {:<10} {:>24e} {:>24e} {:>24e}", "e", self.e_e, self.e_pos, self.e)?;
        writeln!(f, "  {:<10} {:>24e} {:>24e} {:>24e}", "s", self.s_e, self.s_pos, self.s)?;
        writeln!(f)?;
        writeln!(f, "  dp/drho = {:e}   dp/dT = {:e}", self.dp_drho, self.dp_dt)?;
        writeln!(f, "  de/drho = {:e}   de/dT = {:e}", self.de_drho, self.de_dt)?;
        write!(f, "  ds/drho = {:e}   ds/dT = {:e}", self.ds_drho, self.ds_dt)
    }
}

/// The EOS itself: pure per call, no state beyond the injected constants.
#[derive(Debug, Clone, Copy)]
pub struct ElectronPositronEOS<R> {
    constants: Constants<R>,
}

impl<R: Real> Default for ElectronPositronEOS<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Real> ElectronPositronEOS<R> {
    /// EOS with CODATA 2018 CGS constants.
    #[must_use]
    pub fn new() -> Self {
        Self { constants: Constants::cgs() }
    }

    /// EOS with a caller-supplied constant set.
    #[must_use]
    pub const fn with_constants(constants: Constants<R>) -> Self {
        Self { constants }
    }

    /// The injected constant set.
    #[must_use]
    pub const fn constants(&self) -> &Constants<R> {
        &self.constants
    }

    fn validate(name: &'static str, x: R) -> Result<(), EosError> {
        if x.is_finite() && x > R::zero() {
            Ok(())
        } else {
            Err(EosError::InvalidInput {
                name,
                value: x.to_f64().unwrap_or(f64::NAN),
            })
        }
    }

    /// Solve the charge-neutrality constraint for η at (ρ, T, Yₑ).
    ///
    /// # Errors
    ///
    /// `InvalidInput` for non-finite or non-positive inputs; `EtaSolve`
    /// wrapping the root-finder failure if the bracket is bad (possible
    /// only outside the validated (ρ, T) domain).
    pub fn solve_eta(&self, rho: R, temp: R, ye: R) -> Result<R, EosError> {
        Self::validate("rho", rho)?;
        Self::validate("temp", temp)?;
        Self::validate("ye", ye)?;

        let c = &self.constants;
        let beta = c.dbeta_dt * temp;
        let n_target = rho * ye * c.n_a;
        let (lo, hi) = get_eta_bounds(rho * ye, temp, c);

        brent(
            |eta| n_target - (n_e_constraint(eta, beta, c) - n_p_constraint(eta, beta, c)),
            lo,
            hi,
        )
        .map_err(|cause| EosError::EtaSolve {
            rho: rho.to_f64().unwrap_or(f64::NAN),
            temp: temp.to_f64().unwrap_or(f64::NAN),
            cause: Box::new(cause),
        })
    }

    /// Full state with all (ρ, T) derivatives through third order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`solve_eta`](Self::solve_eta).
    pub fn pe_state(&self, rho: R, temp: R, ye: R) -> Result<EOSState<R>, EosError> {
        let eta = self.solve_eta(rho, temp, ye)?;
        let c = &self.constants;
        let beta = c.dbeta_dt * temp;
        let eta_tilde = -eta - R::of(2.0) / beta;

        // six integral evaluations carry everything downstream
        let f12 = FermiIntegral::evaluated(R::of(0.5), eta, beta, 3);
        let f32 = FermiIntegral::evaluated(R::of(1.5), eta, beta, 3);
        let f52 = FermiIntegral::evaluated(R::of(2.5), eta, beta, 3);
        let f12_p = FermiIntegral::evaluated(R::of(0.5), eta_tilde, beta, 3);
        let f32_p = FermiIntegral::evaluated(R::of(1.5), eta_tilde, beta, 3);
        let f52_p = FermiIntegral::evaluated(R::of(2.5), eta_tilde, beta, 3);

        // jets over (η, β)
        let f12_j = phase_jet(&f12);
        let f32_j = phase_jet(&f32);
        let f52_j = phase_jet(&f52);
        let f12_pj = positron_phase_jet(&f12_p, eta, beta);
        let f32_pj = positron_phase_jet(&f32_p, eta, beta);
        let f52_pj = positron_phase_jet(&f52_p, eta, beta);

        let ne_ph = number_density_jet(&f12_j, &f32_j, beta, c);
        let np_ph = number_density_jet(&f12_pj, &f32_pj, beta, c);
        let pe_ph = pressure_jet(&f32_j, &f52_j, beta, c);
        let pp_ph = pressure_jet(&f32_pj, &f52_pj, beta, c);
        let ee_ph = energy_density_jet(&f32_j, &f52_j, beta, c);
        let ep_ph = energy_density_jet(&f32_pj, &f52_pj, beta, c);

        // implicit η(ρ, T) from the constraint N(η, β) = ρ Yₑ N_A
        let rho_j = Jet3::var_a(rho);
        let t_j = Jet3::var_b(temp);
        let beta_rt = t_j.scale(c.dbeta_dt);
        let target = rho_j.scale(ye * c.n_a);
        let big_n = ne_ph.sub(&np_ph);
        let eta_rt = implicit_inner(&big_n, &beta_rt, &target, eta);

        // push every phase quantity down to (ρ, T)
        let lower = |ph: &Jet3<R>| Jet3::compose(ph, &eta_rt, &beta_rt);
        let ne = lower(&ne_ph);
        let np = lower(&np_ph);
        let pe = lower(&pe_ph);
        let pp = lower(&pp_ph);
        let ee_den = lower(&ee_ph);
        let ep_den = lower(&ep_ph);

        // specific energies; positrons carry the pair rest-mass cost
        let e_e = ee_den.div(&rho_j);
        let e_p = (ep_den.add(&np.scale(R::of(2.0) * c.mec2))).div(&rho_j);

        // σ = (E + p - μ n)/T, per gram
        let kt = t_j.scale(c.k_b);
        let eta_tilde_rt = eta_rt.scale(-R::one()).sub(&beta_rt.recip().scale(R::of(2.0)));
        let rho_t = rho_j.mul(&t_j);
        let s_e = ee_den
            .add(&pe)
            .sub(&kt.mul(&eta_rt).mul(&ne))
            .div(&rho_t);
        let s_p = ep_den
            .add(&pp)
            .sub(&kt.mul(&eta_tilde_rt).mul(&np))
            .div(&rho_t);

        let n_tot = ne.add(&np);
        let p_tot = pe.add(&pp);
        let e_tot = e_e.add(&e_p);
        let s_tot = s_e.add(&s_p);

        let mut st = EOSState::zeroed();
        st.rho = rho;
        st.temp = temp;
        st.ye = ye;
        st.eta = eta;
        st.beta = beta;
        st.deta_drho = eta_rt.da;
        st.deta_dt = eta_rt.db;
        st.d2eta_drho2 = eta_rt.daa;
        st.d2eta_drhodt = eta_rt.dab;
        st.d2eta_dt2 = eta_rt.dbb;

        st.n_e = ne.v;
        st.dne_drho = ne.da;
        st.dne_dt = ne.db;
        st.d2ne_drho2 = ne.daa;
        st.d2ne_drhodt = ne.dab;
        st.d2ne_dt2 = ne.dbb;
        st.d3ne_drho3 = ne.daaa;
        st.d3ne_drho2dt = ne.daab;
        st.d3ne_drhodt2 = ne.dabb;
        st.d3ne_dt3 = ne.dbbb;

        st.n_pos = np.v;
        st.dnp_drho = np.da;
        st.dnp_dt = np.db;
        st.d2np_drho2 = np.daa;
        st.d2np_drhodt = np.dab;
        st.d2np_dt2 = np.dbb;
        st.d3np_drho3 = np.daaa;
        st.d3np_drho2dt = np.daab;
        st.d3np_drhodt2 = np.dabb;
        st.d3np_dt3 = np.dbbb;

        st.n = n_tot.v;
        st.dn_drho = n_tot.da;
        st.dn_dt = n_tot.db;
        st.d2n_drho2 = n_tot.daa;
        st.d2n_drhodt = n_tot.dab;
        st.d2n_dt2 = n_tot.dbb;
        st.d3n_drho3 = n_tot.daaa;
        st.d3n_drho2dt = n_tot.daab;
        st.d3n_drhodt2 = n_tot.dabb;
        st.d3n_dt3 = n_tot.dbbb;

        st.e_e = e_e.v;
        st.dee_drho = e_e.da;
        st.dee_dt = e_e.db;
        st.d2ee_drho2 = e_e.daa;
        st.d2ee_drhodt = e_e.dab;
        st.d2ee_dt2 = e_e.dbb;
        st.d3ee_drho3 = e_e.daaa;
        st.d3ee_drho2dt = e_e.daab;
        st.d3ee_drhodt2 = e_e.dabb;
        st.d3ee_dt3 = e_e.dbbb;

        st.e_pos = e_p.v;
        st.dep_drho = e_p.da;
        st.dep_dt = e_p.db;
        st.d2ep_drho2 = e_p.daa;
        st.d2ep_drhodt = e_p.dab;
        st.d2ep_dt2 = e_p.dbb;
        st.d3ep_drho3 = e_p.daaa;
        st.d3ep_drho2dt = e_p.daab;
        st.d3ep_drhodt2 = e_p.dabb;
        st.d3ep_dt3 = e_p.dbbb;

        st.e = e_tot.v;
        st.de_drho = e_tot.da;
        st.de_dt = e_tot.db;
        st.d2e_drho2 = e_tot.daa;
        st.d2e_drhodt = e_tot.dab;
        st.d2e_dt2 = e_tot.dbb;
        st.d3e_drho3 = e_tot.daaa;
        st.d3e_drho2dt = e_tot.daab;
        st.d3e_drhodt2 = e_tot.dabb;
        st.d3e_dt3 = e_tot.dbbb;

        st.s_e = s_e.v;
        st.dse_drho = s_e.da;
        st.dse_dt = s_e.db;
        st.d2se_drho2 = s_e.daa;
        st.d2se_drhodt = s_e.dab;
        st.d2se_dt2 = s_e.dbb;
        st.d3se_drho3 = s_e.daaa;
        st.d3se_drho2dt = s_e.daab;
        st.d3se_drhodt2 = s_e.dabb;
        st.d3se_dt3 = s_e.dbbb;

        st.s_pos = s_p.v;
        st.dsp_drho = s_p.da;
        st.dsp_dt = s_p.db;
        st.d2sp_drho2 = s_p.daa;
        st.d2sp_drhodt = s_p.dab;
        st.d2sp_dt2 = s_p.dbb;
        st.d3sp_drho3 = s_p.daaa;
        st.d3sp_drho2dt = s_p.daab;
        st.d3sp_drhodt2 = s_p.dabb;
        st.d3sp_dt3 = s_p.dbbb;

        st.s = s_tot.v;
        st.ds_drho = s_tot.da;
        st.ds_dt = s_tot.db;
        st.d2s_drho2 = s_tot.daa;
        st.d2s_drhodt = s_tot.dab;
        st.d2s_dt2 = s_tot.dbb;
        st.d3s_drho3 = s_tot.daaa;
        st.d3s_drho2dt = s_tot.daab;
        st.d3s_drhodt2 = s_tot.dabb;
        st.d3s_dt3 = s_tot.dbbb;

        st.p_e = pe.v;
        st.dpe_drho = pe.da;
        st.dpe_dt = pe.db;
        st.d2pe_drho2 = pe.daa;
        st.d2pe_drhodt = pe.dab;
        st.d2pe_dt2 = pe.dbb;
        st.d3pe_drho3 = pe.daaa;
        st.d3pe_drho2dt = pe.daab;
        st.d3pe_drhodt2 = pe.dabb;
        st.d3pe_dt3 = pe.dbbb;

        st.p_pos = pp.v;
        st.dpp_drho = pp.da;
        st.dpp_dt = pp.db;
        st.d2pp_drho2 = pp.daa;
        st.d2pp_drhodt = pp.dab;
        st.d2pp_dt2 = pp.dbb;
        st.d3pp_drho3 = pp.daaa;
        st.d3pp_drho2dt = pp.daab;
        st.d3pp_drhodt2 = pp.dabb;
        st.d3pp_dt3 = pp.dbbb;

        st.p = p_tot.v;
        st.dp_drho = p_tot.da;
        st.dp_dt = p_tot.db;
        st.d2p_drho2 = p_tot.daa;
        st.d2p_drhodt = p_tot.dab;
        st.d2p_dt2 = p_tot.dbb;
        st.d3p_drho3 = p_tot.daaa;
        st.d3p_drho2dt = p_tot.daab;
        st.d3p_drhodt2 = p_tot.dabb;
        st.d3p_dt3 = p_tot.dbbb;

        Ok(st)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difference::adaptive_diff;
    use crate::tolerances::{ETA_ROUND_TRIP_REL, FD_AGREEMENT_REL};

    #[test]
    fn eta_round_trip_recovers_target_density() {
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        let c = eos.constants();
        for (rho, temp) in [(1.0e-2, 1.0e6), (1.0e5, 1.0e8), (5.0e9, 5.0e9)] {
            let ye = 0.5;
            let eta = eos.solve_eta(rho, temp, ye).expect("solve");
            let beta = c.dbeta_dt * temp;
            let net = n_e_constraint(eta, beta, c) - n_p_constraint(eta, beta, c);
            let target = rho * ye * c.n_a;
            assert!(
                f64::rel_error(net, target) < ETA_ROUND_TRIP_REL,
                "rho = {rho:e}, T = {temp:e}: net = {net:e}, target = {target:e}"
            );
        }
    }

    #[test]
    fn invalid_inputs_rejected_before_solving() {
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        for (rho, temp, ye) in [
            (0.0, 1.0e7, 0.5),
            (-1.0, 1.0e7, 0.5),
            (1.0e4, 0.0, 0.5),
            (1.0e4, f64::NAN, 0.5),
            (1.0e4, 1.0e7, 0.0),
            (f64::INFINITY, 1.0e7, 0.5),
        ] {
            let err = eos.pe_state(rho, temp, ye).unwrap_err();
            assert!(
                matches!(err, EosError::InvalidInput { .. }),
                "({rho}, {temp}, {ye}): {err}"
            );
        }
    }

    #[test]
    fn pe_state_is_bit_identical_across_calls() {
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        let a = eos.pe_state(1.0e4, 1.0e7, 0.5).expect("state");
        let b = eos.pe_state(1.0e4, 1.0e7, 0.5).expect("state");
        assert_eq!(a.eta.to_bits(), b.eta.to_bits());
        assert_eq!(a.p.to_bits(), b.p.to_bits());
        assert_eq!(a.d3s_dt3.to_bits(), b.d3s_dt3.to_bits());
        assert_eq!(a.d2eta_drhodt.to_bits(), b.d2eta_drhodt.to_bits());
    }

    #[test]
    fn deep_degeneracy_zeroes_every_positron_field() {
        // cold dense matter: η̃ ≈ -(η + 2/β) is hugely negative
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        let st = eos.pe_state(1.0e7, 1.0e4, 0.5).expect("state");
        assert_eq!(st.n_pos, 0.0);
        assert_eq!(st.p_pos, 0.0);
        assert_eq!(st.e_pos, 0.0);
        assert_eq!(st.s_pos, 0.0);
        assert_eq!(st.dnp_drho, 0.0);
        assert_eq!(st.d3pp_dt3, 0.0);
        // and the totals reduce to the electron parts
        assert_eq!(st.p, st.p_e);
        assert_eq!(st.s, st.s_e);
    }

    #[test]
    fn number_density_matches_analytic_count() {
        // fully ionized: n⁻ - n⁺ = ρ Yₑ N_A, and with no positrons
        // n = n⁻ exactly
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        let st = eos.pe_state(1.0e7, 1.0e4, 0.5).expect("state");
        let expect = 1.0e7 * 0.5 * crate::constants::N_AVOGADRO;
        assert!(f64::rel_error(st.n, expect) < 1.0e-12);
        assert!((st.dn_drho / (0.5 * crate::constants::N_AVOGADRO) - 1.0).abs() < 1.0e-10);
    }

    #[test]
    fn n_derivs_bundle_agrees_with_finite_differences() {
        let c: Constants<f64> = Constants::cgs();
        for (eta, beta) in [(-5.0, 0.1), (10.0, 1.0), (50.0, 0.01)] {
            let eta_tilde = -eta - 2.0 / beta;
            let f12 = FermiIntegral::evaluated(0.5, eta, beta, 2);
            let f32 = FermiIntegral::evaluated(1.5, eta, beta, 2);
            let f12_p = FermiIntegral::evaluated(0.5, eta_tilde, beta, 2);
            let f32_p = FermiIntegral::evaluated(1.5, eta_tilde, beta, 2);
            let (dn_e, _) = n_derivs(beta, &f12, &f32, &f12_p, &f32_p, &c);

            assert!(f64::rel_error(dn_e.n, n_e_constraint(eta, beta, &c)) < 1e-14);

            let h = 0.05 * eta.abs().max(1.0);
            let (fd, _) = adaptive_diff(|x| n_e_constraint(x, beta, &c), eta, h);
            assert!(
                f64::rel_error(dn_e.deta, fd) < FD_AGREEMENT_REL,
                "eta = {eta}, beta = {beta}: analytic {:e} vs fd {fd:e}",
                dn_e.deta
            );

            let hb = 0.05 * beta;
            let (fd_b, _) = adaptive_diff(|x| n_e_constraint(eta, x, &c), beta, hb);
            assert!(
                f64::rel_error(dn_e.dbeta, fd_b) < FD_AGREEMENT_REL,
                "eta = {eta}, beta = {beta}: analytic {:e} vs fd {fd_b:e}",
                dn_e.dbeta
            );
        }
    }

    #[test]
    fn eta_derivatives_agree_with_finite_differences() {
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        let (rho, temp, ye) = (1.0e5, 1.0e8, 0.5);
        let st = eos.pe_state(rho, temp, ye).expect("state");

        let (fd_rho, _) = adaptive_diff(
            |r| eos.pe_state(r, temp, ye).expect("state").eta,
            rho,
            0.01 * rho,
        );
        assert!(
            f64::rel_error(st.deta_drho, fd_rho) < FD_AGREEMENT_REL,
            "deta/drho {:e} vs {fd_rho:e}",
            st.deta_drho
        );

        let (fd_t, _) = adaptive_diff(
            |t| eos.pe_state(rho, t, ye).expect("state").eta,
            temp,
            0.01 * temp,
        );
        assert!(
            f64::rel_error(st.deta_dt, fd_t) < FD_AGREEMENT_REL,
            "deta/dT {:e} vs {fd_t:e}",
            st.deta_dt
        );
    }

    #[test]
    fn pressure_positive_and_dominated_by_electrons_when_cold() {
        let eos: ElectronPositronEOS<f64> = ElectronPositronEOS::new();
        let st = eos.pe_state(1.0e2, 1.0e6, 0.5).expect("state");
        assert!(st.p > 0.0);
        assert!(st.p_e > st.p_pos);
        assert!(st.s > 0.0);
    }
}
