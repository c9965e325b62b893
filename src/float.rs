//! Scalar type used for every node, joint and force quantity.

use core::ops::{Add, Div, Mul, Neg, Sub};

/// `f32` or `f64`.
///
/// Transcendentals route through `libm` so nothing here needs `std`.
pub trait Float:
    Copy
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Default
    + core::fmt::Debug
    + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    fn half() -> Self;
    fn two() -> Self;
    fn pi() -> Self;
    /// Stand-in for an unbounded maximum joint distance.
    fn infinity() -> Self;

    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn abs(self) -> Self;
    /// Halves round away from zero.
    fn round(self) -> Self;
    fn floor(self) -> Self;
    fn is_finite(self) -> bool;

    fn from_f32(v: f32) -> Self;
    /// Rounds to nearest for `f32`.
    fn from_f64(v: f64) -> Self;
    fn from_usize(v: usize) -> Self;
    /// Truncates. Negative values and NaN give `0`.
    fn to_usize(self) -> usize;
    /// Truncates and saturates at the `i64` bounds.
    fn to_i64(self) -> i64;

    fn min(self, other: Self) -> Self {
        if other < self { other } else { self }
    }

    fn max(self, other: Self) -> Self {
        if other > self { other } else { self }
    }

    fn is_near_zero(self, epsilon: Self) -> bool {
        self.abs() < epsilon
    }
}

macro_rules! impl_float {
    ($t:ident, $sqrt:ident, $sin:ident, $cos:ident, $abs:ident, $round:ident, $floor:ident) => {
        impl Float for $t {
            #[inline]
            fn zero() -> Self {
                0.0
            }
            #[inline]
            fn one() -> Self {
                1.0
            }
            #[inline]
            fn half() -> Self {
                0.5
            }
            #[inline]
            fn two() -> Self {
                2.0
            }
            #[inline]
            fn pi() -> Self {
                core::$t::consts::PI
            }
            #[inline]
            fn infinity() -> Self {
                $t::INFINITY
            }
            #[inline]
            fn sqrt(self) -> Self {
                libm::$sqrt(self)
            }
            #[inline]
            fn sin(self) -> Self {
                libm::$sin(self)
            }
            #[inline]
            fn cos(self) -> Self {
                libm::$cos(self)
            }
            #[inline]
            fn abs(self) -> Self {
                libm::$abs(self)
            }
            #[inline]
            fn round(self) -> Self {
                libm::$round(self)
            }
            #[inline]
            fn floor(self) -> Self {
                libm::$floor(self)
            }
            #[inline]
            fn is_finite(self) -> bool {
                $t::is_finite(self)
            }
            #[inline]
            fn from_f32(v: f32) -> Self {
                v as $t
            }
            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }
            #[inline]
            fn from_usize(v: usize) -> Self {
                v as $t
            }
            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
            #[inline]
            fn to_i64(self) -> i64 {
                self as i64
            }
        }
    };
}

impl_float!(f32, sqrtf, sinf, cosf, fabsf, roundf, floorf);
impl_float!(f64, sqrt, sin, cos, fabs, round, floor);
