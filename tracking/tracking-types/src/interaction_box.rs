//! The calibrated interaction volume.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Vector3;
use crate::error::{Result, TrackingError};

/// Axis-aligned box above the device used to normalize positions to a unit
/// cube.
///
/// # Example
///
/// ```
/// use tracking_types::{InteractionBox, Vector3};
///
/// let ib = InteractionBox::new(Vector3::new(0.0, 200.0, 0.0), 200.0, 200.0, 100.0);
/// let n = ib.normalize_point(Vector3::new(0.0, 200.0, 0.0), true);
/// assert_eq!(n, Vector3::new(0.5, 0.5, 0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InteractionBox {
    /// Box center in millimeters.
    pub center: Vector3,
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
    /// Extent along z.
    pub depth: f64,
}

impl InteractionBox {
    /// The invalid box.
    pub const INVALID: Self = Self {
        center: Vector3::INVALID,
        width: 0.0,
        height: 0.0,
        depth: 0.0,
    };

    /// Creates a box without validation.
    #[must_use]
    pub const fn new(center: Vector3, width: f64, height: f64, depth: f64) -> Self {
        Self {
            center,
            width,
            height,
            depth,
        }
    }

    /// Creates a box, rejecting non-finite centers and non-positive extents.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::InvalidGeometry`] if the result would not be
    /// valid.
    pub fn try_new(center: Vector3, width: f64, height: f64, depth: f64) -> Result<Self> {
        let ib = Self::new(center, width, height, depth);
        if ib.is_valid() {
            Ok(ib)
        } else {
            Err(TrackingError::invalid_geometry(format!(
                "interaction box center {center} size {width}x{height}x{depth}"
            )))
        }
    }

    /// Creates a box from the wire's `center` and `size` arrays.
    #[must_use]
    pub const fn from_arrays(center: [f64; 3], size: [f64; 3]) -> Self {
        Self::new(Vector3::from_array(center), size[0], size[1], size[2])
    }

    /// True iff the center is valid and all extents are positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.center.is_valid() && self.width > 0.0 && self.height > 0.0 && self.depth > 0.0
    }

    /// Extents as a vector.
    #[must_use]
    pub const fn size(&self) -> Vector3 {
        Vector3::new(self.width, self.height, self.depth)
    }

    /// Maps a device position into the unit cube, `[0, 1]` per axis when inside
    /// the box. With `clamp`, results are clamped into `[0, 1]`.
    ///
    /// Returns [`Vector3::INVALID`] when the box is not valid.
    #[must_use]
    pub fn normalize_point(&self, position: Vector3, clamp: bool) -> Vector3 {
        if !self.is_valid() {
            return Vector3::INVALID;
        }
        let map = |p: f64, c: f64, s: f64| {
            let v = (p - c) / s + 0.5;
            if clamp { v.clamp(0.0, 1.0) } else { v }
        };
        Vector3::new(
            map(position.x, self.center.x, self.width),
            map(position.y, self.center.y, self.height),
            map(position.z, self.center.z, self.depth),
        )
    }

    /// Inverse of [`Self::normalize_point`] without clamping.
    ///
    /// Returns [`Vector3::INVALID`] when the box is not valid.
    #[must_use]
    pub fn denormalize_point(&self, normalized: Vector3) -> Vector3 {
        if !self.is_valid() {
            return Vector3::INVALID;
        }
        Vector3::new(
            (normalized.x - 0.5).mul_add(self.width, self.center.x),
            (normalized.y - 0.5).mul_add(self.height, self.center.y),
            (normalized.z - 0.5).mul_add(self.depth, self.center.z),
        )
    }
}

impl Default for InteractionBox {
    fn default() -> Self {
        Self::INVALID
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> InteractionBox {
        InteractionBox::new(Vector3::new(0.0, 200.0, 0.0), 235.0, 235.0, 147.0)
    }

    #[test]
    fn validity() {
        assert!(sample().is_valid());
        assert!(!InteractionBox::default().is_valid());
        assert!(!InteractionBox::new(Vector3::ZERO, 1.0, 0.0, 1.0).is_valid());
        assert!(InteractionBox::try_new(Vector3::ZERO, 1.0, -1.0, 1.0).is_err());
        assert!(InteractionBox::try_new(Vector3::ZERO, 1.0, 1.0, 1.0).is_ok());
    }

    #[test]
    fn normalize_corners() {
        let ib = sample();
        let low = ib.normalize_point(Vector3::new(-117.5, 82.5, -73.5), false);
        assert_relative_eq!(low.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(low.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(low.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn normalize_clamps() {
        let ib = sample();
        let far = Vector3::new(1000.0, -1000.0, 0.0);
        let raw = ib.normalize_point(far, false);
        assert!(raw.x > 1.0 && raw.y < 0.0);
        let clamped = ib.normalize_point(far, true);
        assert_eq!(clamped.x, 1.0);
        assert_eq!(clamped.y, 0.0);
        assert_relative_eq!(clamped.z, 0.5);
    }

    #[test]
    fn invalid_box_maps_to_invalid() {
        let p = Vector3::new(12.0, 250.0, -30.0);
        let flat = InteractionBox::new(Vector3::ZERO, 235.0, 0.0, 147.0);
        for ib in [InteractionBox::default(), flat] {
            assert!(!ib.normalize_point(p, false).is_valid());
            assert!(!ib.normalize_point(p, true).is_valid());
            assert!(!ib.denormalize_point(Vector3::new(0.5, 0.5, 0.5)).is_valid());
        }
    }

    #[test]
    fn denormalize_inverts_normalize() {
        let ib = sample();
        let p = Vector3::new(12.0, 250.0, -30.0);
        let back = ib.denormalize_point(ib.normalize_point(p, false));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-9);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-9);
    }
}
