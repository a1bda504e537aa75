// SPDX-License-Identifier: AGPL-3.0-only

//! Numeric abstraction for the EOS core.
//!
//! Every algorithm in this crate is generic over [`Real`] so that a wider
//! float (double-double, binary128, ...) can be substituted without touching
//! algorithm code. The operation set is deliberately minimal: field
//! arithmetic, comparisons, `exp`/`ln`/`sqrt`/`powf` and friends from
//! [`num_traits::Float`], plus conversion from an `f64` literal.
//!
//! `f64` is the precision shipped and tested here. A wider type only has to
//! implement `Float` + `FromPrimitive` and the formatting/marker traits
//! below; the blanket impl picks it up.

use std::fmt::{Debug, Display, LowerExp};
use std::ops::AddAssign;

use num_traits::{Float, FromPrimitive};

/// Minimal numeric contract for the EOS core.
///
/// `Send + Sync` is required so grid sweeps can fan out across rayon
/// workers; `LowerExp` so table cells can be written in scientific notation.
pub trait Real:
    Float + FromPrimitive + AddAssign + Display + LowerExp + Debug + Send + Sync + 'static
{
    /// Convert an `f64` literal into this type.
    ///
    /// Literal constants in algorithm code are all representable in `f64`,
    /// so the conversion cannot fail for any sensible `Real`.
    #[inline]
    fn of(x: f64) -> Self {
        Self::from_f64(x).expect("f64 literal must be representable in Real")
    }

    /// Relative error |got - want| / |want|, falling back to absolute
    /// error when `want` is zero. Shared by tests and validation binaries.
    #[inline]
    fn rel_error(got: Self, want: Self) -> Self {
        let diff = (got - want).abs();
        if want == Self::zero() {
            diff
        } else {
            diff / want.abs()
        }
    }
}

impl<T> Real for T where
    T: Float + FromPrimitive + AddAssign + Display + LowerExp + Debug + Send + Sync + 'static
{
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_conversion_is_exact_for_f64() {
        assert_eq!(f64::of(2.5), 2.5);
        assert_eq!(f64::of(-1.0e-300), -1.0e-300);
    }

    #[test]
    fn rel_error_handles_zero_reference() {
        assert_eq!(f64::rel_error(1.0e-12, 0.0), 1.0e-12);
        let e = f64::rel_error(1.01, 1.0);
        assert!((e - 0.01).abs() < 1e-12);
    }
}
