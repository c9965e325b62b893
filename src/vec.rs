//! Vector math for node positions, velocities and forces.

use crate::float::Float;
use core::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Lengths below this are treated as zero when normalising.
const NORMALIZE_EPSILON: f32 = 1e-10;

/// Vector operations the solver needs.
///
/// `Node`, `Joint` and `SoftBody` are generic over this trait. Topology
/// builders and the pressure model use [`Vec3`] directly.
pub trait Vec:
    Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + PartialEq
    + Default
    + core::fmt::Debug
    + 'static
{
    type Scalar: Float;

    fn zero() -> Self;
    fn dot(self, other: Self) -> Self::Scalar;
    fn scale(self, s: Self::Scalar) -> Self;

    fn length_sq(self) -> Self::Scalar {
        self.dot(self)
    }

    fn length(self) -> Self::Scalar {
        self.length_sq().sqrt()
    }

    /// Unit vector in the same direction, or zero for a (near) zero vector.
    /// Coincident nodes therefore get no direction instead of NaN.
    fn normalize(self) -> Self {
        let len = self.length();
        if len.is_near_zero(Self::Scalar::from_f32(NORMALIZE_EPSILON)) {
            return Self::zero();
        }
        self.scale(Self::Scalar::one() / len)
    }

    fn distance(self, other: Self) -> Self::Scalar {
        (self - other).length()
    }

    fn distance_sq(self, other: Self) -> Self::Scalar {
        (self - other).length_sq()
    }
}

/// Point or direction in 3D. `+Y` is up for every builder in this crate.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Vec3<F> {
    pub const fn new(x: F, y: F, z: F) -> Self {
        Vec3 { x, y, z }
    }

    /// `(0, 1, 0)`.
    pub fn up() -> Self {
        Vec3::new(F::zero(), F::one(), F::zero())
    }

    /// `(0, y, 0)`, handy for vertical offsets.
    pub fn vertical(y: F) -> Self {
        Self::up() * y
    }

    fn map2(self, other: Self, f: impl Fn(F, F) -> F) -> Self {
        Vec3::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z))
    }
}

impl<F: Float> Add for Vec3<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a + b)
    }
}

impl<F: Float> Sub for Vec3<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.map2(rhs, |a, b| a - b)
    }
}

impl<F: Float> AddAssign for Vec3<F> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<F: Float> Mul<F> for Vec3<F> {
    type Output = Self;
    fn mul(self, s: F) -> Self {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

impl<F: Float> Neg for Vec3<F> {
    type Output = Self;
    fn neg(self) -> Self {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl<F: Float> Vec for Vec3<F> {
    type Scalar = F;

    fn zero() -> Self {
        Vec3::new(F::zero(), F::zero(), F::zero())
    }

    fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    fn scale(self, s: F) -> Self {
        self * s
    }
}
