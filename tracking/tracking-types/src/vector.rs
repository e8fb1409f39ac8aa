//! Three-component vectors in device millimeters.
//!
//! [`Vector3`] is the minimal vector type the tracking model needs: arithmetic,
//! norms, normalization, angles and the pitch/yaw/roll helpers used by hands
//! and pointables. It is not a general linear algebra type; convert to
//! `nalgebra::Vector3<f64>` for anything heavier.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A double-precision `(x, y, z)` triple.
///
/// Operations return new vectors; the `*_assign` variants mutate in place and
/// return `&mut Self` for chaining.
///
/// # Example
///
/// ```
/// use tracking_types::Vector3;
///
/// let v = Vector3::new(3.0, 4.0, 0.0);
/// assert!((v.magnitude() - 5.0).abs() < 1e-12);
/// assert!(!Vector3::invalid().is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector3 {
    /// X component (right of the device).
    pub x: f64,
    /// Y component (up from the device).
    pub y: f64,
    /// Z component (toward the user).
    pub z: f64,
}

impl Vector3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// Unit x axis.
    pub const X_AXIS: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit y axis.
    pub const Y_AXIS: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit z axis.
    pub const Z_AXIS: Self = Self::new(0.0, 0.0, 1.0);
    /// Unit vector pointing left, `(-1, 0, 0)`.
    pub const LEFT: Self = Self::new(-1.0, 0.0, 0.0);
    /// Unit vector pointing right, `(1, 0, 0)`.
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector pointing down, `(0, -1, 0)`.
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);
    /// Unit vector pointing up, `(0, 1, 0)`.
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector pointing away from the user, `(0, 0, -1)`.
    pub const FORWARD: Self = Self::new(0.0, 0.0, -1.0);
    /// Unit vector pointing toward the user, `(0, 0, 1)`.
    pub const BACKWARD: Self = Self::new(0.0, 0.0, 1.0);
    /// Canonical invalid vector (all components `NaN`).
    pub const INVALID: Self = Self::new(f64::NAN, f64::NAN, f64::NAN);

    /// Creates a vector from components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns the zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Returns the canonical invalid vector.
    #[must_use]
    pub const fn invalid() -> Self {
        Self::INVALID
    }

    /// Creates a vector from a `[x, y, z]` array.
    #[must_use]
    pub const fn from_array(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    /// Returns the components as `[x, y, z]`.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// True iff every component is finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Component-wise sum.
    #[must_use]
    pub fn plus(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Adds `other` in place.
    pub fn plus_assign(&mut self, other: Self) -> &mut Self {
        *self = self.plus(other);
        self
    }

    /// Component-wise difference.
    #[must_use]
    pub fn minus(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Subtracts `other` in place.
    pub fn minus_assign(&mut self, other: Self) -> &mut Self {
        *self = self.minus(other);
        self
    }

    /// Scales by `scalar`.
    #[must_use]
    pub fn multiply(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }

    /// Scales in place.
    pub fn multiply_assign(&mut self, scalar: f64) -> &mut Self {
        *self = self.multiply(scalar);
        self
    }

    /// Divides by `scalar`.
    #[must_use]
    pub fn divide(self, scalar: f64) -> Self {
        Self::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }

    /// Divides in place.
    pub fn divide_assign(&mut self, scalar: f64) -> &mut Self {
        *self = self.divide(scalar);
        self
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x.mul_add(other.x, self.y.mul_add(other.y, self.z * other.z))
    }

    /// Cross product.
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y.mul_add(other.z, -(self.z * other.y)),
            self.z.mul_add(other.x, -(self.x * other.z)),
            self.x.mul_add(other.y, -(self.y * other.x)),
        )
    }

    /// Squared length, without the square root.
    #[must_use]
    pub fn magnitude_squared(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Returns the unit vector in the same direction.
    ///
    /// A zero (or non-positive squared length) vector yields the zero vector
    /// instead of dividing by zero.
    #[must_use]
    pub fn normalized(self) -> Self {
        let denom = self.magnitude_squared();
        if denom <= 0.0 || denom.is_nan() {
            return Self::ZERO;
        }
        self.divide(denom.sqrt())
    }

    /// Angle between two vectors in radians, in `[0, π]`.
    ///
    /// Returns 0 when either vector has zero length.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f64 {
        let denom = self.magnitude_squared() * other.magnitude_squared();
        if denom <= 0.0 || denom.is_nan() {
            return 0.0;
        }
        let cos = self.dot(other) / denom.sqrt();
        if cos.is_nan() {
            return 0.0;
        }
        cos.clamp(-1.0, 1.0).acos()
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        self.minus(other).magnitude()
    }

    /// Pitch: angle around the x axis, `atan2(y, -z)`.
    #[must_use]
    pub fn pitch(self) -> f64 {
        self.y.atan2(-self.z)
    }

    /// Yaw: angle around the y axis, `atan2(x, -z)`.
    #[must_use]
    pub fn yaw(self) -> f64 {
        self.x.atan2(-self.z)
    }

    /// Roll: angle around the z axis, `atan2(x, -y)`.
    #[must_use]
    pub fn roll(self) -> f64 {
        self.x.atan2(-self.y)
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::INVALID
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.plus(rhs)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.minus(rhs)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.multiply(rhs)
    }
}

impl Div<f64> for Vector3 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        self.divide(rhs)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        self.multiply(-1.0)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(a: [f64; 3]) -> Self {
        Self::from_array(a)
    }
}

impl From<nalgebra::Vector3<f64>> for Vector3 {
    fn from(v: nalgebra::Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for nalgebra::Vector3<f64> {
    fn from(v: Vector3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
