//! Fingers, tools and finger bones.

use std::fmt;
use std::ops::Deref;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackingError};
use crate::{Frame, HandRef, Matrix, Vector3};

/// Proximity of a pointable to the virtual touch plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TouchZone {
    /// Outside the touch volume.
    #[default]
    None,
    /// Close to, but not past, the touch plane.
    Hovering,
    /// Past the touch plane.
    Touching,
}

impl TouchZone {
    /// Maps the wire string; anything unrecognized is [`TouchZone::None`].
    #[must_use]
    pub fn from_wire(s: &str) -> Self {
        match s {
            "hovering" => Self::Hovering,
            "touching" => Self::Touching,
            _ => Self::None,
        }
    }
}

/// Anatomical finger name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FingerType {
    /// Thumb.
    Thumb,
    /// Index finger.
    Index,
    /// Middle finger.
    Middle,
    /// Ring finger.
    Ring,
    /// Pinky.
    Pinky,
}

impl FingerType {
    /// Returns a lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }
}

impl TryFrom<i64> for FingerType {
    type Error = TrackingError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::Thumb),
            1 => Ok(Self::Index),
            2 => Ok(Self::Middle),
            3 => Ok(Self::Ring),
            4 => Ok(Self::Pinky),
            other => Err(TrackingError::unknown_code("finger type", other)),
        }
    }
}

/// Anatomical bone name, ordered base to tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoneType {
    /// Bone inside the palm.
    Metacarpal,
    /// Bone nearest the palm.
    Proximal,
    /// Middle bone (absent on the thumb, reported with zero length).
    Intermediate,
    /// Bone at the finger tip.
    Distal,
}

/// One rigid finger segment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bone {
    /// Anatomical type.
    pub bone_type: BoneType,
    /// Joint nearest the wrist.
    pub prev_joint: Vector3,
    /// Joint nearest the tip.
    pub next_joint: Vector3,
    /// Distance between the joints, in millimeters.
    pub length: f64,
    /// Average width, in millimeters.
    pub width: f64,
    /// Orientation; the negated z basis points along the bone.
    pub basis: Matrix,
}

impl Bone {
    /// Creates a bone between two joints. Length is the joint distance.
    #[must_use]
    pub fn new(
        bone_type: BoneType,
        prev_joint: Vector3,
        next_joint: Vector3,
        width: f64,
        basis: Matrix,
    ) -> Self {
        let length = if prev_joint.is_valid() && next_joint.is_valid() {
            prev_joint.distance_to(next_joint)
        } else {
            0.0
        };
        Self {
            bone_type,
            prev_joint,
            next_joint,
            length,
            width,
            basis,
        }
    }

    const fn invalid(bone_type: BoneType) -> Self {
        Self {
            bone_type,
            prev_joint: Vector3::INVALID,
            next_joint: Vector3::INVALID,
            length: 0.0,
            width: 0.0,
            basis: Matrix::IDENTITY,
        }
    }

    /// True iff both joints are valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.prev_joint.is_valid() && self.next_joint.is_valid()
    }

    /// Unit direction from base to tip.
    #[must_use]
    pub fn direction(&self) -> Vector3 {
        -self.basis.z_basis
    }

    /// Midpoint of the two joints.
    #[must_use]
    pub fn center(&self) -> Vector3 {
        (self.prev_joint + self.next_joint) * 0.5
    }
}

/// Finger-only data carried by a [`Pointable`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Finger {
    /// Anatomical finger, when reported.
    pub finger_type: Option<FingerType>,
    /// Distal interphalangeal joint.
    pub dip_position: Vector3,
    /// Proximal interphalangeal joint.
    pub pip_position: Vector3,
    /// Metacarpophalangeal (knuckle) joint.
    pub mcp_position: Vector3,
    /// Carpometacarpal joint.
    pub carp_position: Vector3,
    /// Tip of the distal bone.
    pub btip_position: Vector3,
    /// Metacarpal, proximal, intermediate and distal bones.
    pub bones: [Bone; 4],
}

impl Finger {
    /// Creates finger data with unknown joints.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            finger_type: None,
            dip_position: Vector3::INVALID,
            pip_position: Vector3::INVALID,
            mcp_position: Vector3::INVALID,
            carp_position: Vector3::INVALID,
            btip_position: Vector3::INVALID,
            bones: [
                Bone::invalid(BoneType::Metacarpal),
                Bone::invalid(BoneType::Proximal),
                Bone::invalid(BoneType::Intermediate),
                Bone::invalid(BoneType::Distal),
            ],
        }
    }

    /// Rebuilds the four bones from the joint positions and per-bone bases.
    pub fn rebuild_bones(&mut self, width: f64, bases: [Matrix; 4]) {
        let joints = self.positions();
        let types = [
            BoneType::Metacarpal,
            BoneType::Proximal,
            BoneType::Intermediate,
            BoneType::Distal,
        ];
        for (i, bone_type) in types.into_iter().enumerate() {
            self.bones[i] = Bone::new(bone_type, joints[i], joints[i + 1], width, bases[i]);
        }
    }

    /// Joint positions from carpal to bone tip.
    #[must_use]
    pub const fn positions(&self) -> [Vector3; 5] {
        [
            self.carp_position,
            self.mcp_position,
            self.pip_position,
            self.dip_position,
            self.btip_position,
        ]
    }

    /// Returns the bone of the given type.
    #[must_use]
    pub fn bone(&self, bone_type: BoneType) -> &Bone {
        &self.bones[bone_type as usize]
    }
}

impl Default for Finger {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a pointable is a finger or a tool.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PointableKind {
    /// A finger, with its joints and bones.
    Finger(Box<Finger>),
    /// A tool (pen, stick, ...).
    Tool,
}

/// A tracked finger or tool.
///
/// Two pointables are equal when both are valid and share an id.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pointable {
    /// Tracking id, stable while the pointable stays in view.
    pub id: i64,
    /// Id of the owning hand as reported by the device.
    pub hand_id: Option<i64>,
    /// Unit direction the pointable points toward.
    pub direction: Vector3,
    /// Tip position in millimeters.
    pub tip_position: Vector3,
    /// Smoothed tip position.
    pub stabilized_tip_position: Vector3,
    /// Tip velocity in millimeters per second.
    pub tip_velocity: Vector3,
    /// Visible length in millimeters.
    pub length: f64,
    /// Width in millimeters (tools only).
    pub width: f64,
    /// Touch-plane classification.
    pub touch_zone: TouchZone,
    /// Normalized distance to the touch plane, in `[-1, 1]`.
    pub touch_distance: f64,
    /// Seconds this pointable has been visible.
    pub time_visible: f64,
    /// Finger or tool; `None` only for the invalid sentinel.
    pub kind: Option<PointableKind>,
    pub(crate) hand_index: Option<usize>,
}

pub(crate) static INVALID_POINTABLE: Pointable = Pointable::invalid();

impl Pointable {
    /// Creates an empty pointable of the given kind.
    #[must_use]
    pub fn new(id: i64, kind: PointableKind) -> Self {
        Self {
            id,
            kind: Some(kind),
            ..Self::invalid()
        }
    }

    /// The invalid pointable.
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            id: 0,
            hand_id: None,
            direction: Vector3::INVALID,
            tip_position: Vector3::INVALID,
            stabilized_tip_position: Vector3::INVALID,
            tip_velocity: Vector3::INVALID,
            length: 0.0,
            width: 0.0,
            touch_zone: TouchZone::None,
            touch_distance: 0.0,
            time_visible: 0.0,
            kind: None,
            hand_index: None,
        }
    }

    /// True iff direction, tip position and tip velocity are all valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.direction.is_valid() && self.tip_position.is_valid() && self.tip_velocity.is_valid()
    }

    /// True for fingers.
    #[must_use]
    pub const fn is_finger(&self) -> bool {
        matches!(self.kind, Some(PointableKind::Finger(_)))
    }

    /// True for tools.
    #[must_use]
    pub const fn is_tool(&self) -> bool {
        matches!(self.kind, Some(PointableKind::Tool))
    }

    /// Finger data, if this is a finger.
    #[must_use]
    pub fn finger(&self) -> Option<&Finger> {
        match &self.kind {
            Some(PointableKind::Finger(f)) => Some(f),
            _ => None,
        }
    }

    /// Mutable finger data, if this is a finger.
    pub fn finger_mut(&mut self) -> Option<&mut Finger> {
        match &mut self.kind {
            Some(PointableKind::Finger(f)) => Some(f),
            _ => None,
        }
    }

    /// Index of the owning hand within the owning frame, once attached.
    #[must_use]
    pub const fn hand_index(&self) -> Option<usize> {
        self.hand_index
    }
}

impl PartialEq for Pointable {
    fn eq(&self, other: &Self) -> bool {
        self.is_valid() && other.is_valid() && self.id == other.id
    }
}

impl fmt::Display for Pointable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            Some(PointableKind::Finger(_)) => "Finger",
            Some(PointableKind::Tool) => "Tool",
            None => "Pointable",
        };
        if self.is_valid() {
            write!(
                f,
                "{kind} [ id:{} | length:{}mm | width:{}mm | direction:{} ]",
                self.id, self.length, self.width, self.direction
            )
        } else {
            write!(f, "Invalid {kind}")
        }
    }
}

/// A pointable borrowed together with the frame that owns it.
#[derive(Debug, Clone, Copy)]
pub struct PointableRef<'f> {
    frame: &'f Frame,
    pointable: &'f Pointable,
}

impl<'f> PointableRef<'f> {
    pub(crate) const fn new(frame: &'f Frame, pointable: &'f Pointable) -> Self {
        Self { frame, pointable }
    }

    /// The owning frame.
    #[must_use]
    pub const fn frame(&self) -> &'f Frame {
        self.frame
    }

    /// The underlying pointable.
    #[must_use]
    pub const fn get(&self) -> &'f Pointable {
        self.pointable
    }

    /// The owning hand, or the invalid hand when unattached.
    #[must_use]
    pub fn hand(&self) -> HandRef<'f> {
        self.frame.hand_at(self.pointable.hand_index)
    }
}

/// Same pointable of the same frame instance.
impl PartialEq for PointableRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.frame, other.frame) && self.pointable == other.pointable
    }
}

impl Deref for PointableRef<'_> {
    type Target = Pointable;

    fn deref(&self) -> &Pointable {
        self.pointable
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn touch_zone_from_wire() {
        assert_eq!(TouchZone::from_wire("hovering"), TouchZone::Hovering);
        assert_eq!(TouchZone::from_wire("touching"), TouchZone::Touching);
        assert_eq!(TouchZone::from_wire("none"), TouchZone::None);
        assert_eq!(TouchZone::from_wire("bogus"), TouchZone::None);
    }

    #[test]
    fn finger_type_codes() {
        assert_eq!(FingerType::try_from(0).unwrap(), FingerType::Thumb);
        assert_eq!(FingerType::try_from(4).unwrap(), FingerType::Pinky);
        assert!(FingerType::try_from(5).is_err());
        assert_eq!(FingerType::Ring.name(), "ring");
    }

    #[test]
    fn finger_and_tool_flags() {
        let finger = Pointable::new(1, PointableKind::Finger(Box::default()));
        assert!(finger.is_finger());
        assert!(!finger.is_tool());
        assert!(finger.finger().is_some());

        let tool = Pointable::new(2, PointableKind::Tool);
        assert!(tool.is_tool());
        assert!(!tool.is_finger());
        assert!(tool.finger().is_none());

        let invalid = Pointable::invalid();
        assert!(!invalid.is_finger() && !invalid.is_tool());
        assert!(!invalid.is_valid());
    }

    #[test]
    fn pointable_validity() {
        let mut p = Pointable::new(3, PointableKind::Tool);
        p.direction = Vector3::FORWARD;
        p.tip_position = Vector3::new(0.0, 100.0, 0.0);
        assert!(!p.is_valid());
        p.tip_velocity = Vector3::ZERO;
        assert!(p.is_valid());
    }

    #[test]
    fn bones_from_joints() {
        let mut finger = Finger::new();
        finger.carp_position = Vector3::new(0.0, 0.0, 0.0);
        finger.mcp_position = Vector3::new(0.0, 0.0, -40.0);
        finger.pip_position = Vector3::new(0.0, 0.0, -70.0);
        finger.dip_position = Vector3::new(0.0, 0.0, -90.0);
        finger.btip_position = Vector3::new(0.0, 0.0, -105.0);
        finger.rebuild_bones(18.0, [Matrix::identity(); 4]);

        let proximal = finger.bone(BoneType::Proximal);
        assert!(proximal.is_valid());
        assert_relative_eq!(proximal.length, 30.0);
        assert_relative_eq!(proximal.width, 18.0);
        assert_eq!(proximal.center(), Vector3::new(0.0, 0.0, -55.0));
        assert_eq!(proximal.direction(), Vector3::FORWARD);
        assert_relative_eq!(finger.bone(BoneType::Distal).length, 15.0);
    }

    #[test]
    fn bone_without_joints_is_invalid() {
        let finger = Finger::new();
        assert!(!finger.bone(BoneType::Metacarpal).is_valid());
        assert_eq!(finger.bone(BoneType::Metacarpal).length, 0.0);
    }
}
