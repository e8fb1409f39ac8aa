//! Tracked hands.

use std::fmt;
use std::ops::Deref;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::motion::{self, Motion};
use crate::{Frame, Matrix, PointableRef, Vector3};

/// Chirality reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HandType {
    /// Left hand.
    Left,
    /// Right hand.
    Right,
    /// Not reported.
    #[default]
    Unknown,
}

impl HandType {
    /// Maps the wire string (`"left"` / `"right"`).
    #[must_use]
    pub fn from_wire(s: &str) -> Self {
        match s {
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Unknown,
        }
    }
}

/// A tracked hand.
///
/// The finger/tool/pointable lists are indices into the owning frame; use
/// [`HandRef`] (from [`Frame::hand`]) to walk them.
///
/// Two hands are equal when both are valid and share an id.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hand {
    /// Tracking id, stable while the hand stays in view.
    pub id: i64,
    /// Left or right.
    pub hand_type: HandType,
    /// Unit vector from palm toward fingers.
    pub direction: Vector3,
    /// Unit vector out of the palm.
    pub palm_normal: Vector3,
    /// Palm center in millimeters.
    pub palm_position: Vector3,
    /// Smoothed palm center.
    pub stabilized_palm_position: Vector3,
    /// Palm velocity in millimeters per second.
    pub palm_velocity: Vector3,
    /// Center of the sphere fit to the hand's curvature.
    pub sphere_center: Vector3,
    /// Radius of that sphere.
    pub sphere_radius: f64,
    /// Rotation since the previous frame.
    pub rotation: Option<Matrix>,
    /// Log scale since the previous frame.
    pub scale_factor_number: Option<f64>,
    /// Translation since the previous frame.
    pub translation_vector: Option<Vector3>,
    /// Seconds this hand has been visible.
    pub time_visible: f64,
    /// Tracking confidence in `[0, 1]`.
    pub confidence: f64,
    /// Fist closure in `[0, 1]`.
    pub grab_strength: f64,
    /// Thumb-to-finger pinch in `[0, 1]`.
    pub pinch_strength: f64,
    pub(crate) pointable_indices: Vec<usize>,
    pub(crate) finger_indices: Vec<usize>,
    pub(crate) tool_indices: Vec<usize>,
}

pub(crate) static INVALID_HAND: Hand = Hand::invalid();

impl Hand {
    /// Creates an empty hand with the given id.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Self::invalid()
        }
    }

    /// The invalid hand.
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            id: 0,
            hand_type: HandType::Unknown,
            direction: Vector3::INVALID,
            palm_normal: Vector3::INVALID,
            palm_position: Vector3::INVALID,
            stabilized_palm_position: Vector3::INVALID,
            palm_velocity: Vector3::INVALID,
            sphere_center: Vector3::INVALID,
            sphere_radius: 0.0,
            rotation: None,
            scale_factor_number: None,
            translation_vector: None,
            time_visible: 0.0,
            confidence: 0.0,
            grab_strength: 0.0,
            pinch_strength: 0.0,
            pointable_indices: Vec::new(),
            finger_indices: Vec::new(),
            tool_indices: Vec::new(),
        }
    }

    /// True iff direction, palm normal, palm position, palm velocity and
    /// sphere center are all valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.direction.is_valid()
            && self.palm_normal.is_valid()
            && self.palm_position.is_valid()
            && self.palm_velocity.is_valid()
            && self.sphere_center.is_valid()
    }

    /// Pitch of the hand direction.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.direction.pitch()
    }

    /// Yaw of the hand direction.
    #[must_use]
    pub fn yaw(&self) -> f64 {
        self.direction.yaw()
    }

    /// Roll of the palm normal.
    #[must_use]
    pub fn roll(&self) -> f64 {
        self.palm_normal.roll()
    }

    /// Indices of this hand's pointables within the owning frame.
    #[must_use]
    pub fn pointable_indices(&self) -> &[usize] {
        &self.pointable_indices
    }

    /// Rotation axis since the same hand in `since`.
    #[must_use]
    pub fn rotation_axis(&self, since: &Frame) -> Vector3 {
        motion::rotation_axis(self, Some(since.hand(self.id).get()))
    }

    /// Rotation angle since the same hand in `since`, optionally projected
    /// onto `axis`.
    #[must_use]
    pub fn rotation_angle(&self, since: &Frame, axis: Option<Vector3>) -> f64 {
        motion::rotation_angle(self, Some(since.hand(self.id).get()), axis)
    }

    /// Rotation matrix since the same hand in `since`.
    #[must_use]
    pub fn rotation_matrix(&self, since: &Frame) -> Matrix {
        motion::rotation_matrix(self, Some(since.hand(self.id).get()))
    }

    /// Scale factor since the same hand in `since`.
    #[must_use]
    pub fn scale_factor(&self, since: &Frame) -> f64 {
        motion::scale_factor(self, Some(since.hand(self.id).get()))
    }

    /// Translation since the same hand in `since`.
    #[must_use]
    pub fn translation(&self, since: &Frame) -> Vector3 {
        motion::translation(self, Some(since.hand(self.id).get()))
    }
}

impl PartialEq for Hand {
    fn eq(&self, other: &Self) -> bool {
        self.is_valid() && other.is_valid() && self.id == other.id
    }
}

impl Motion for Hand {
    fn motion_rotation(&self) -> Option<&Matrix> {
        self.rotation.as_ref()
    }

    fn motion_scale(&self) -> Option<f64> {
        self.scale_factor_number
    }

    fn motion_translation(&self) -> Option<Vector3> {
        self.translation_vector
    }

    fn motion_valid(&self) -> bool {
        self.is_valid()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(
                f,
                "Hand [ id:{} | palm velocity:{} | sphere center:{} ]",
                self.id, self.palm_velocity, self.sphere_center
            )
        } else {
            write!(f, "invalid Hand")
        }
    }
}

/// A hand borrowed together with the frame that owns it.
#[derive(Debug, Clone, Copy)]
pub struct HandRef<'f> {
    frame: &'f Frame,
    hand: &'f Hand,
}

impl<'f> HandRef<'f> {
    pub(crate) const fn new(frame: &'f Frame, hand: &'f Hand) -> Self {
        Self { frame, hand }
    }

    /// The owning frame.
    #[must_use]
    pub const fn frame(&self) -> &'f Frame {
        self.frame
    }

    /// The underlying hand.
    #[must_use]
    pub const fn get(&self) -> &'f Hand {
        self.hand
    }

    fn resolve(&self, indices: &'f [usize]) -> impl Iterator<Item = PointableRef<'f>> + use<'f> {
        let frame = self.frame;
        indices.iter().map(move |&i| frame.pointable_at(i))
    }

    /// All fingers and tools attached to this hand, in attachment order.
    pub fn pointables(&self) -> impl Iterator<Item = PointableRef<'f>> + use<'f> {
        self.resolve(&self.hand.pointable_indices)
    }

    /// Fingers attached to this hand.
    pub fn fingers(&self) -> impl Iterator<Item = PointableRef<'f>> + use<'f> {
        self.resolve(&self.hand.finger_indices)
    }

    /// Tools attached to this hand.
    pub fn tools(&self) -> impl Iterator<Item = PointableRef<'f>> + use<'f> {
        self.resolve(&self.hand.tool_indices)
    }

    /// This hand's pointable with `id`, or the invalid pointable.
    #[must_use]
    pub fn pointable(&self, id: i64) -> PointableRef<'f> {
        self.pointables()
            .find(|p| p.id == id)
            .unwrap_or_else(|| self.frame.invalid_pointable())
    }

    /// This hand's finger with `id`, or the invalid pointable.
    #[must_use]
    pub fn finger(&self, id: i64) -> PointableRef<'f> {
        self.fingers()
            .find(|p| p.id == id)
            .unwrap_or_else(|| self.frame.invalid_pointable())
    }

    /// This hand's tool with `id`, or the invalid pointable.
    #[must_use]
    pub fn tool(&self, id: i64) -> PointableRef<'f> {
        self.tools()
            .find(|p| p.id == id)
            .unwrap_or_else(|| self.frame.invalid_pointable())
    }
}

/// Same hand of the same frame instance.
impl PartialEq for HandRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.frame, other.frame) && self.hand == other.hand
    }
}

impl Deref for HandRef<'_> {
    type Target = Hand;

    fn deref(&self) -> &Hand {
        self.hand
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tracked_hand(id: i64) -> Hand {
        let mut hand = Hand::new(id);
        hand.direction = Vector3::FORWARD;
        hand.palm_normal = Vector3::DOWN;
        hand.palm_position = Vector3::new(0.0, 200.0, 0.0);
        hand.palm_velocity = Vector3::ZERO;
        hand.sphere_center = Vector3::new(0.0, 210.0, -10.0);
        hand
    }

    #[test]
    fn validity() {
        assert!(tracked_hand(1).is_valid());
        assert!(!Hand::new(1).is_valid());
        assert!(!Hand::invalid().is_valid());
    }

    #[test]
    fn orientation_angles() {
        let hand = tracked_hand(1);
        assert_relative_eq!(hand.pitch(), 0.0);
        assert_relative_eq!(hand.yaw(), 0.0);
        assert_relative_eq!(hand.roll(), 0.0);
    }

    #[test]
    fn hand_type_from_wire() {
        assert_eq!(HandType::from_wire("left"), HandType::Left);
        assert_eq!(HandType::from_wire("right"), HandType::Right);
        assert_eq!(HandType::from_wire(""), HandType::Unknown);
    }

    #[test]
    fn kinematics_against_frame_with_same_hand() {
        let mut now = tracked_hand(5);
        now.scale_factor_number = Some(0.5);
        now.translation_vector = Some(Vector3::new(10.0, 0.0, 0.0));
        now.rotation = Some(Matrix::from_axis_angle(Vector3::Y_AXIS, 0.25).transpose());

        let mut then = tracked_hand(5);
        then.scale_factor_number = Some(0.25);
        then.translation_vector = Some(Vector3::new(4.0, 0.0, 0.0));
        then.rotation = Some(Matrix::identity());

        let mut since = Frame::new();
        since.id = 1;
        since.push_hand(then);

        assert_relative_eq!(now.scale_factor(&since), 0.25_f64.exp());
        assert_eq!(now.translation(&since), Vector3::new(6.0, 0.0, 0.0));
        assert_relative_eq!(now.rotation_angle(&since, None), 0.25, epsilon = 1e-9);
    }

    #[test]
    fn kinematics_when_hand_missing_from_since() {
        let mut now = tracked_hand(5);
        now.scale_factor_number = Some(0.5);
        now.translation_vector = Some(Vector3::new(10.0, 0.0, 0.0));
        now.rotation = Some(Matrix::identity());

        let since = Frame::new();
        assert_eq!(now.scale_factor(&since), 1.0);
        assert_eq!(now.translation(&since), Vector3::ZERO);
        assert_eq!(now.rotation_angle(&since, None), 0.0);
        assert_eq!(now.rotation_axis(&since), Vector3::ZERO);
        assert_eq!(now.rotation_matrix(&since), Matrix::identity());
    }
}
