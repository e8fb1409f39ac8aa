//! Relative motion between two transform-bearing snapshots.
//!
//! Frames and hands carry the device's incremental rotation, log-scale and
//! translation. These functions compare a subject against a reference
//! (`since`) and fall back to a neutral value (zero vector, angle 0, identity,
//! scale 1) whenever the inputs are missing or invalid. They never panic.
//!
//! Conventions:
//!
//! - the rotation matrix since a reference is
//!   `since.rotation * transpose(subject.rotation)`;
//! - the rotation angle is `acos((trace - 1) / 2)` of that matrix, in `[0, π]`;
//! - the rotation axis is the small-angle approximation built from the
//!   off-diagonal differences of the two rotations, normalized.

use crate::{Matrix, Vector3};

/// Something with per-frame motion factors.
pub trait Motion {
    /// Rotation since the previous frame.
    fn motion_rotation(&self) -> Option<&Matrix>;

    /// Log scale since the previous frame.
    fn motion_scale(&self) -> Option<f64>;

    /// Translation since the previous frame.
    fn motion_translation(&self) -> Option<Vector3>;

    /// Whether the snapshot holds real tracking data.
    fn motion_valid(&self) -> bool;
}

/// Axis of rotation between `subject` and `since`.
///
/// Zero vector when either rotation is missing.
#[must_use]
pub fn rotation_axis<S: Motion + ?Sized>(subject: &S, since: Option<&S>) -> Vector3 {
    let (Some(own), Some(other)) = (
        subject.motion_rotation(),
        since.and_then(Motion::motion_rotation),
    ) else {
        return Vector3::ZERO;
    };
    if !other.is_valid() {
        return Vector3::ZERO;
    }
    Vector3::new(
        own.z_basis.y - other.y_basis.z,
        own.x_basis.z - other.z_basis.x,
        own.y_basis.x - other.x_basis.y,
    )
    .normalized()
}

/// Rotation matrix between `subject` and `since`; identity when either
/// rotation is missing.
#[must_use]
pub fn rotation_matrix<S: Motion + ?Sized>(subject: &S, since: Option<&S>) -> Matrix {
    match (
        subject.motion_rotation(),
        since.and_then(Motion::motion_rotation),
    ) {
        (Some(own), Some(other)) => other.multiply(&own.transpose()),
        _ => Matrix::identity(),
    }
}

/// Rotation angle in radians between `subject` and `since`.
///
/// Without `axis` the result is in `[0, π]`. With `axis`, the angle is scaled
/// by the dot product of the rotation axis and the normalized `axis`. Zero when
/// either side is missing or invalid.
#[must_use]
pub fn rotation_angle<S: Motion + ?Sized>(
    subject: &S,
    since: Option<&S>,
    axis: Option<Vector3>,
) -> f64 {
    let Some(reference) = since else {
        return 0.0;
    };
    if !subject.motion_valid() || !reference.motion_valid() {
        return 0.0;
    }
    let rot = rotation_matrix(subject, since);
    let cs = (rot.x_basis.x + rot.y_basis.y + rot.z_basis.z - 1.0) * 0.5;
    let angle = if cs.is_nan() {
        0.0
    } else {
        cs.clamp(-1.0, 1.0).acos()
    };
    match axis {
        Some(a) => angle * rotation_axis(subject, since).dot(a.normalized()),
        None => angle,
    }
}

/// Scale factor `exp(subject.scale - since.scale)`; 1 when either scale is
/// missing.
#[must_use]
pub fn scale_factor<S: Motion + ?Sized>(subject: &S, since: Option<&S>) -> f64 {
    match (subject.motion_scale(), since.and_then(Motion::motion_scale)) {
        (Some(own), Some(other)) => (own - other).exp(),
        _ => 1.0,
    }
}

/// Translation `subject.t - since.t`; zero when either translation is missing.
#[must_use]
pub fn translation<S: Motion + ?Sized>(subject: &S, since: Option<&S>) -> Vector3 {
    match (
        subject.motion_translation(),
        since.and_then(Motion::motion_translation),
    ) {
        (Some(own), Some(other)) => own - other,
        _ => Vector3::ZERO,
    }
}
