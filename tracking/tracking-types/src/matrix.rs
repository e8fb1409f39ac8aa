//! Basis + origin transformation matrices.

use crate::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 3x3 basis with an optional translation origin.
///
/// The bases are the columns of the linear part: a direction `v` maps to
/// `x_basis * v.x + y_basis * v.y + z_basis * v.z`. Rotation matrices read
/// off the wire carry no origin, which is distinct from an explicit zero
/// origin (see [`Matrix::multiply`]).
///
/// # Example
///
/// ```
/// use tracking_types::{Matrix, Vector3};
///
/// let m = Matrix::identity();
/// let p = Vector3::new(1.0, 2.0, 3.0);
/// assert_eq!(m.transform_point(p), p);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix {
    /// First basis vector.
    pub x_basis: Vector3,
    /// Second basis vector.
    pub y_basis: Vector3,
    /// Third basis vector.
    pub z_basis: Vector3,
    /// Translation, if this matrix has one.
    pub origin: Option<Vector3>,
}

impl Matrix {
    /// The identity matrix with a zero origin.
    pub const IDENTITY: Self = Self {
        x_basis: Vector3::X_AXIS,
        y_basis: Vector3::Y_AXIS,
        z_basis: Vector3::Z_AXIS,
        origin: Some(Vector3::ZERO),
    };

    /// Creates a matrix from bases and an origin.
    #[must_use]
    pub const fn new(x_basis: Vector3, y_basis: Vector3, z_basis: Vector3, origin: Vector3) -> Self {
        Self {
            x_basis,
            y_basis,
            z_basis,
            origin: Some(origin),
        }
    }

    /// Creates a pure basis (no origin).
    #[must_use]
    pub const fn from_basis(x_basis: Vector3, y_basis: Vector3, z_basis: Vector3) -> Self {
        Self {
            x_basis,
            y_basis,
            z_basis,
            origin: None,
        }
    }

    /// Builds a matrix from the wire's 3x3 array-of-arrays. Entry `i` becomes
    /// the `i`-th basis vector; no origin is set.
    #[must_use]
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self::from_basis(
            Vector3::from_array(rows[0]),
            Vector3::from_array(rows[1]),
            Vector3::from_array(rows[2]),
        )
    }

    /// Returns the identity matrix.
    #[must_use]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Creates a rotation of `angle` radians about `axis` (zero origin).
    #[must_use]
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.set_rotation(axis, angle);
        m
    }

    /// True iff all three bases are valid and the origin, if any, is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.x_basis.is_valid()
            && self.y_basis.is_valid()
            && self.z_basis.is_valid()
            && self.origin.is_none_or(|o| o.is_valid())
    }

    /// Overwrites the bases with a rotation of `angle` radians about `axis`.
    ///
    /// The bases take the rows of the right-handed rotation matrix, so
    /// [`Self::transform_direction`] turns vectors clockwise about `axis` when
    /// viewed from its tip: a quarter turn about +Z maps +X to -Y. The origin
    /// is left untouched.
    pub fn set_rotation(&mut self, axis: Vector3, angle: f64) {
        let a = axis.normalized();
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        self.x_basis = Vector3::new(
            (a.x * a.x).mul_add(t, c),
            (a.x * a.y).mul_add(t, -(a.z * s)),
            (a.x * a.z).mul_add(t, a.y * s),
        );
        self.y_basis = Vector3::new(
            (a.y * a.x).mul_add(t, a.z * s),
            (a.y * a.y).mul_add(t, c),
            (a.y * a.z).mul_add(t, -(a.x * s)),
        );
        self.z_basis = Vector3::new(
            (a.z * a.x).mul_add(t, -(a.y * s)),
            (a.z * a.y).mul_add(t, a.x * s),
            (a.z * a.z).mul_add(t, c),
        );
    }

    /// Rotates and scales `v` by the bases, ignoring the origin.
    #[must_use]
    pub fn transform_direction(&self, v: Vector3) -> Vector3 {
        self.x_basis * v.x + self.y_basis * v.y + self.z_basis * v.z
    }

    /// Rotates and scales `v`, then translates by the origin (if any).
    #[must_use]
    pub fn transform_point(&self, v: Vector3) -> Vector3 {
        let d = self.transform_direction(v);
        match self.origin {
            Some(o) => o + d,
            None => d,
        }
    }

    /// Composes `other` then `self`.
    ///
    /// The bases of `other` pass through [`Self::transform_direction`]. The
    /// result's origin is `self.transform_point(other.origin)` when both
    /// matrices have an origin; otherwise `self.origin` is carried unchanged.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        let origin = match (self.origin, other.origin) {
            (Some(_), Some(o)) => Some(self.transform_point(o)),
            (own, _) => own,
        };
        Self {
            x_basis: self.transform_direction(other.x_basis),
            y_basis: self.transform_direction(other.y_basis),
            z_basis: self.transform_direction(other.z_basis),
            origin,
        }
    }

    /// Returns the basis transpose, without an origin.
    #[must_use]
    pub const fn transpose(&self) -> Self {
        Self::from_basis(
            Vector3::new(self.x_basis.x, self.y_basis.x, self.z_basis.x),
            Vector3::new(self.x_basis.y, self.y_basis.y, self.z_basis.y),
            Vector3::new(self.x_basis.z, self.y_basis.z, self.z_basis.z),
        )
    }

    /// Inverse of a rotation + translation matrix.
    ///
    /// Only meaningful when the bases are orthonormal. The origin, if present,
    /// becomes `transpose.transform_direction(-origin)`.
    #[must_use]
    pub fn rigid_inverse(&self) -> Self {
        let mut inv = self.transpose();
        inv.origin = self.origin.map(|o| inv.transform_direction(-o));
        inv
    }

    /// Column-major 4x4 array (`[x_basis, 0, y_basis, 0, z_basis, 0, origin, 1]`).
    #[must_use]
    pub fn to_array(&self) -> [f64; 16] {
        let o = self.origin.unwrap_or(Vector3::ZERO);
        [
            self.x_basis.x,
            self.x_basis.y,
            self.x_basis.z,
            0.0,
            self.y_basis.x,
            self.y_basis.y,
            self.y_basis.z,
            0.0,
            self.z_basis.x,
            self.z_basis.y,
            self.z_basis.z,
            0.0,
            o.x,
            o.y,
            o.z,
            1.0,
        ]
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Matrix> for nalgebra::Matrix4<f64> {
    fn from(m: Matrix) -> Self {
        Self::from_column_slice(&m.to_array())
    }
}
