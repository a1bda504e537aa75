// SPDX-License-Identifier: AGPL-3.0-only

//! Third-order bivariate derivative propagation.
//!
//! A [`Jet3`] carries a value together with all partial derivatives up to
//! third order with respect to an ordered pair of independent variables
//! (a, b): (ρ, T) on the outside of the EOS, (η, β) inside the Fermi
//! algebra. Arithmetic on jets is exact truncated-Taylor arithmetic
//! (Leibniz products, chain-rule composition), so a thermodynamic formula
//! written once in jets yields every derivative the table needs with no
//! hand-expanded chain rules to get wrong.
//!
//! Two composition operations close the algebra:
//!
//! - [`lift`](Jet3::lift): univariate outer function f(u) given
//!   f, f′, f″, f‴ at u (powers, reciprocals, anything scalar);
//! - [`compose`](Jet3::compose): bivariate outer function f(u, v) whose
//!   own partial table is a `Jet3` over (u, v); this is how a Fermi
//!   integral tabulated in (η, β) becomes a function of (ρ, T), and how
//!   positron integrals tabulated in (η̃, β) become functions of (η, β).
//!
//! [`implicit_inner`] inverts a composition: given N(η, β) and the target
//! jet of the constraint N(η(ρ,T), β(T)) = n_target(ρ), it solves for the
//! η jet slot by slot in increasing derivative order: each slot enters
//! the composed derivative linearly through ∂N/∂η, which is the
//! implicit-function theorem applied recursively.

use crate::real::Real;

/// Value and partials to third order in two variables (a, b).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jet3<R> {
    pub v: R,
    pub da: R,
    pub db: R,
    pub daa: R,
    pub dab: R,
    pub dbb: R,
    pub daaa: R,
    pub daab: R,
    pub dabb: R,
    pub dbbb: R,
}

impl<R: Real> Jet3<R> {
    /// A constant: value only, all derivatives zero.
    #[must_use]
    pub fn constant(v: R) -> Self {
        Self {
            v,
            da: R::zero(),
            db: R::zero(),
            daa: R::zero(),
            dab: R::zero(),
            dbb: R::zero(),
            daaa: R::zero(),
            daab: R::zero(),
            dabb: R::zero(),
            dbbb: R::zero(),
        }
    }

    /// The first independent variable: v = x, ∂/∂a = 1.
    #[must_use]
    pub fn var_a(x: R) -> Self {
        let mut j = Self::constant(x);
        j.da = R::one();
        j
    }

    /// The second independent variable: v = x, ∂/∂b = 1.
    #[must_use]
    pub fn var_b(x: R) -> Self {
        let mut j = Self::constant(x);
        j.db = R::one();
        j
    }

    /// Multiply every component by a constant.
    #[must_use]
    pub fn scale(&self, c: R) -> Self {
        Self {
            v: self.v * c,
            da: self.da * c,
            db: self.db * c,
            daa: self.daa * c,
            dab: self.dab * c,
            dbb: self.dbb * c,
            daaa: self.daaa * c,
            daab: self.daab * c,
            dabb: self.dabb * c,
            dbbb: self.dbbb * c,
        }
    }

    /// Leibniz product to third order.
    #[must_use]
    pub fn mul(&self, g: &Self) -> Self {
        let f = self;
        let two = R::of(2.0);
        let three = R::of(3.0);
        Self {
            v: f.v * g.v,
            da: f.da * g.v + f.v * g.da,
            db: f.db * g.v + f.v * g.db,
            daa: f.daa * g.v + two * f.da * g.da + f.v * g.daa,
            dab: f.dab * g.v + f.da * g.db + f.db * g.da + f.v * g.dab,
            dbb: f.dbb * g.v + two * f.db * g.db + f.v * g.dbb,
            daaa: f.daaa * g.v + three * f.daa * g.da + three * f.da * g.daa + f.v * g.daaa,
            daab: f.daab * g.v
                + f.daa * g.db
                + two * f.dab * g.da
                + two * f.da * g.dab
                + f.db * g.daa
                + f.v * g.daab,
            dabb: f.dabb * g.v
                + f.dbb * g.da
                + two * f.dab * g.db
                + two * f.db * g.dab
                + f.da * g.dbb
                + f.v * g.dabb,
            dbbb: f.dbbb * g.v + three * f.dbb * g.db + three * f.db * g.dbb + f.v * g.dbbb,
        }
    }

    /// Componentwise sum.
    #[must_use]
    pub fn add(&self, g: &Self) -> Self {
        Self {
            v: self.v + g.v,
            da: self.da + g.da,
            db: self.db + g.db,
            daa: self.daa + g.daa,
            dab: self.dab + g.dab,
            dbb: self.dbb + g.dbb,
            daaa: self.daaa + g.daaa,
            daab: self.daab + g.daab,
            dabb: self.dabb + g.dabb,
            dbbb: self.dbbb + g.dbbb,
        }
    }

    /// Componentwise difference.
    #[must_use]
    pub fn sub(&self, g: &Self) -> Self {
        self.add(&g.scale(-R::one()))
    }

    /// Univariate chain rule: outer scalar function with derivatives
    /// `d = [f, f′, f″, f‴]` evaluated at `self.v`.
    #[must_use]
    pub fn lift(&self, d: [R; 4]) -> Self {
        let u = self;
        let [f0, f1, f2, f3] = d;
        let two = R::of(2.0);
        let three = R::of(3.0);
        Self {
            v: f0,
            da: f1 * u.da,
            db: f1 * u.db,
            daa: f2 * u.da * u.da + f1 * u.daa,
            dab: f2 * u.da * u.db + f1 * u.dab,
            dbb: f2 * u.db * u.db + f1 * u.dbb,
            daaa: f3 * u.da * u.da * u.da + three * f2 * u.daa * u.da + f1 * u.daaa,
            daab: f3 * u.da * u.da * u.db
                + f2 * (u.daa * u.db + two * u.dab * u.da)
                + f1 * u.daab,
            dabb: f3 * u.da * u.db * u.db
                + f2 * (two * u.dab * u.db + u.dbb * u.da)
                + f1 * u.dabb,
            dbbb: f3 * u.db * u.db * u.db + three * f2 * u.dbb * u.db + f1 * u.dbbb,
        }
    }

    /// Reciprocal 1/self. `self.v` must be nonzero.
    #[must_use]
    pub fn recip(&self) -> Self {
        let y = self.v;
        let inv = R::one() / y;
        let inv2 = inv * inv;
        self.lift([
            inv,
            -inv2,
            R::of(2.0) * inv2 * inv,
            -R::of(6.0) * inv2 * inv2,
        ])
    }

    /// Quotient self / g.
    #[must_use]
    pub fn div(&self, g: &Self) -> Self {
        self.mul(&g.recip())
    }

    /// Real power self^p. `self.v` must be positive.
    #[must_use]
    pub fn powf(&self, p: R) -> Self {
        let y = self.v;
        let f0 = y.powf(p);
        let f1 = p * y.powf(p - R::one());
        let f2 = p * (p - R::one()) * y.powf(p - R::of(2.0));
        let f3 = p * (p - R::one()) * (p - R::of(2.0)) * y.powf(p - R::of(3.0));
        self.lift([f0, f1, f2, f3])
    }

    /// Bivariate chain rule: `outer` is the partial table of f over its
    /// own arguments (u, v); `u` and `v` are jets over (a, b). Returns
    /// the jet of f(u(a,b), v(a,b)) over (a, b). `outer.v` is taken as
    /// the function value (its (u, v) evaluation point is implicit).
    #[must_use]
    pub fn compose(outer: &Self, u: &Self, v: &Self) -> Self {
        let f = outer;
        let two = R::of(2.0);
        let three = R::of(3.0);

        let g_v = f.v;
        let g_a = f.da * u.da + f.db * v.da;
        let g_b = f.da * u.db + f.db * v.db;

        // second order: f₁₁ uₓu_y + f₁₂(uₓv_y + u_yvₓ) + f₂₂ vₓv_y + f₁uₓ_y + f₂vₓ_y
        let g_aa = f.daa * u.da * u.da
            + two * f.dab * u.da * v.da
            + f.dbb * v.da * v.da
            + f.da * u.daa
            + f.db * v.daa;
        let g_ab = f.daa * u.da * u.db
            + f.dab * (u.da * v.db + u.db * v.da)
            + f.dbb * v.da * v.db
            + f.da * u.dab
            + f.db * v.dab;
        let g_bb = f.daa * u.db * u.db
            + two * f.dab * u.db * v.db
            + f.dbb * v.db * v.db
            + f.da * u.dbb
            + f.db * v.dbb;

        // third order, index multiset {a,a,a}
        let g_aaa = f.daaa * u.da * u.da * u.da
            + three * f.daab * u.da * u.da * v.da
            + three * f.dabb * u.da * v.da * v.da
            + f.dbbb * v.da * v.da * v.da
            + three * f.daa * u.daa * u.da
            + three * f.dab * (u.daa * v.da + v.daa * u.da)
            + three * f.dbb * v.daa * v.da
            + f.da * u.daaa
            + f.db * v.daaa;

        // {a,a,b}
        let g_aab = f.daaa * u.da * u.da * u.db
            + f.daab * (u.da * u.da * v.db + two * u.da * u.db * v.da)
            + f.dabb * (two * u.da * v.da * v.db + u.db * v.da * v.da)
            + f.dbbb * v.da * v.da * v.db
            + f.daa * (u.daa * u.db + two * u.dab * u.da)
            + f.dab
                * (u.daa * v.db + two * u.dab * v.da + v.daa * u.db + two * v.dab * u.da)
            + f.dbb * (v.daa * v.db + two * v.dab * v.da)
            + f.da * u.daab
            + f.db * v.daab;

        // {a,b,b}
        let g_abb = f.daaa * u.da * u.db * u.db
            + f.daab * (two * u.da * u.db * v.db + u.db * u.db * v.da)
            + f.dabb * (u.da * v.db * v.db + two * u.db * v.da * v.db)
            + f.dbbb * v.da * v.db * v.db
            + f.daa * (two * u.dab * u.db + u.dbb * u.da)
            + f.dab
                * (two * u.dab * v.db + u.dbb * v.da + two * v.dab * u.db + v.dbb * u.da)
            + f.dbb * (two * v.dab * v.db + v.dbb * v.da)
            + f.da * u.dabb
            + f.db * v.dabb;

        // {b,b,b}
        let g_bbb = f.daaa * u.db * u.db * u.db
            + three * f.daab * u.db * u.db * v.db
            + three * f.dabb * u.db * v.db * v.db
            + f.dbbb * v.db * v.db * v.db
            + three * f.daa * u.dbb * u.db
            + three * f.dab * (u.dbb * v.db + v.dbb * u.db)
            + three * f.dbb * v.dbb * v.db
            + f.da * u.dbbb
            + f.db * v.dbbb;

        Self {
            v: g_v,
            da: g_a,
            db: g_b,
            daa: g_aa,
            dab: g_ab,
            dbb: g_bb,
            daaa: g_aaa,
            daab: g_aab,
            dabb: g_abb,
            dbbb: g_bbb,
        }
    }
}

impl<R: Real> std::ops::Add for Jet3<R> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Jet3::add(&self, &rhs)
    }
}

impl<R: Real> std::ops::Sub for Jet3<R> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Jet3::sub(&self, &rhs)
    }
}

impl<R: Real> std::ops::Mul for Jet3<R> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Jet3::mul(&self, &rhs)
    }
}

impl<R: Real> std::ops::Div for Jet3<R> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Jet3::div(&self, &rhs)
    }
}

impl<R: Real> std::ops::Neg for Jet3<R> {
    type Output = Self;
    fn neg(self) -> Self {
        self.scale(-R::one())
    }
}

/// Solve N(η(a,b), β(a,b)) = target for the jet of η.
///
/// `n_table` is the partial table of N over (η, β); `beta` and `target`
/// are jets over (a, b); `eta0` is the already-solved root value. Each
/// derivative slot of η appears linearly in the corresponding slot of the
/// composed jet, with coefficient ∂N/∂η, so the slots resolve one at a
/// time in increasing order. ∂N/∂η must be nonzero (physically: n is
/// strictly monotone in η at fixed β).
#[must_use]
pub fn implicit_inner<R: Real>(
    n_table: &Jet3<R>,
    beta: &Jet3<R>,
    target: &Jet3<R>,
    eta0: R,
) -> Jet3<R> {
    let n_eta = n_table.da;
    debug_assert!(n_eta != R::zero(), "residual must be monotone in eta");
    let mut eta = Jet3::constant(eta0);

    eta.da = (target.da - Jet3::compose(n_table, &eta, beta).da) / n_eta;
    eta.db = (target.db - Jet3::compose(n_table, &eta, beta).db) / n_eta;
    eta.daa = (target.daa - Jet3::compose(n_table, &eta, beta).daa) / n_eta;
    eta.dab = (target.dab - Jet3::compose(n_table, &eta, beta).dab) / n_eta;
    eta.dbb = (target.dbb - Jet3::compose(n_table, &eta, beta).dbb) / n_eta;
    eta.daaa = (target.daaa - Jet3::compose(n_table, &eta, beta).daaa) / n_eta;
    eta.daab = (target.daab - Jet3::compose(n_table, &eta, beta).daab) / n_eta;
    eta.dabb = (target.dabb - Jet3::compose(n_table, &eta, beta).dabb) / n_eta;
    eta.dbbb = (target.dbbb - Jet3::compose(n_table, &eta, beta).dbbb) / n_eta;
    eta
}
