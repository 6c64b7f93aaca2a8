use std::{
    fmt::{Debug, Display},
    iter::Sum,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use rust_decimal::{Decimal, MathematicalOps, prelude::ToPrimitive};

/// Numeric track an indicator computes on.
///
/// Implemented for [`f64`] (fast track) and [`Decimal`] (exact track). Every
/// indicator is written once against this trait, so both tracks share the
/// same windowing, replace and edge-case rules.
///
/// # Example
///
/// ```
/// use streamta::{Num, Sma, SmaConfig};
/// use rust_decimal_macros::dec;
/// use std::num::NonZero;
///
/// let config = SmaConfig::new(NonZero::new(2).unwrap());
///
/// let mut fast: Sma = Sma::new(config);
/// let mut exact: Sma<rust_decimal::Decimal> = Sma::new(config);
///
/// fast.add(1.5);
/// exact.add(dec!(1.5));
///
/// assert_eq!(fast.add(2.5), Some(2.0));
/// assert_eq!(exact.add(dec!(2.5)), Some(dec!(2)));
/// ```
pub trait Num:
    Copy
    + PartialEq
    + PartialOrd
    + Debug
    + Display
    + Default
    + FromStr<Err: Display>
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + Sum
    + 'static
{
    const ZERO: Self;
    const ONE: Self;
    const HUNDRED: Self;

    /// Converts a count (interval, index, weight).
    fn from_usize(n: usize) -> Self;

    /// Converts an exact config parameter into this track.
    fn from_decimal(value: Decimal) -> Self;

    /// Lossy conversion for reporting and cross-track comparison.
    fn to_f64(self) -> f64;

    fn abs(self) -> Self;

    /// Square root; negative inputs (rounding artefacts of a variance) yield zero.
    fn sqrt(self) -> Self;

    /// Division that returns `None` instead of an undefined quotient.
    fn checked_div(self, rhs: Self) -> Option<Self>;

    #[inline]
    #[must_use]
    fn max(self, other: Self) -> Self {
        if other > self { other } else { self }
    }

    #[inline]
    #[must_use]
    fn min(self, other: Self) -> Self {
        if other < self { other } else { self }
    }

    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl Num for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const HUNDRED: Self = 100.0;

    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn from_usize(n: usize) -> Self {
        n as f64
    }

    #[inline]
    fn from_decimal(value: Decimal) -> Self {
        ToPrimitive::to_f64(&value).unwrap_or(f64::NAN)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        if self > 0.0 { f64::sqrt(self) } else { 0.0 }
    }

    #[inline]
    fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs == 0.0 {
            return None;
        }

        let quotient = self / rhs;
        quotient.is_finite().then_some(quotient)
    }
}

impl Num for Decimal {
    const ZERO: Self = Decimal::ZERO;
    const ONE: Self = Decimal::ONE;
    const HUNDRED: Self = Decimal::ONE_HUNDRED;

    #[inline]
    fn from_usize(n: usize) -> Self {
        Decimal::from(n)
    }

    #[inline]
    fn from_decimal(value: Decimal) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        ToPrimitive::to_f64(&self).unwrap_or(f64::NAN)
    }

    #[inline]
    fn abs(self) -> Self {
        Decimal::abs(&self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        if self > Decimal::ZERO {
            MathematicalOps::sqrt(&self).unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    }

    #[inline]
    fn checked_div(self, rhs: Self) -> Option<Self> {
        Decimal::checked_div(self, rhs)
    }
}
