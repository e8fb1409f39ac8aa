//! One tracking snapshot and the arena that owns its entities.
//!
//! A [`Frame`] owns every hand, pointable and gesture decoded from one device
//! message. Cross-references between them are indices into the frame's own
//! vectors, resolved while the frame is being built:
//!
//! 1. hands are pushed first ([`Frame::push_hand`]);
//! 2. pointables are attached next and wired to the first hand with a matching
//!    id ([`Frame::attach_pointable`]);
//! 3. gestures are attached last, resolving their hand and pointable ids
//!    against what is already in the frame ([`Frame::attach_gesture`]).
//!
//! Lookups by id scan linearly and take the first match. Misses return views
//! over static invalid sentinels, so callers can always chain and then check
//! `is_valid()`.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::gesture::INVALID_GESTURE;
use crate::hand::INVALID_HAND;
use crate::motion::{self, Motion};
use crate::pointable::INVALID_POINTABLE;
use crate::{
    Gesture, GestureKind, GestureRef, Hand, HandRef, InteractionBox, Matrix, Pointable,
    PointableRef, Vector3,
};

/// A snapshot of everything the device tracked at one instant.
///
/// The frame-level rotation, scale and translation are the device's
/// incremental motion since the *previous* frame, not a cumulative pose.
///
/// Two frames are equal when both are valid and share an id.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Frame id, increasing along the device stream. Zero means unset.
    pub id: u64,
    /// Microseconds since the device service started.
    pub timestamp: u64,
    /// Instantaneous frame rate reported by the device.
    pub current_frames_per_second: f64,
    /// Calibrated interaction volume.
    pub interaction_box: InteractionBox,
    /// Rotation since the previous frame.
    pub rotation: Option<Matrix>,
    /// Log scale since the previous frame.
    pub scale_factor_number: Option<f64>,
    /// Translation since the previous frame.
    pub translation_vector: Option<Vector3>,
    hands: Vec<Hand>,
    pointables: Vec<Pointable>,
    finger_indices: Vec<usize>,
    tool_indices: Vec<usize>,
    gestures: Vec<Gesture>,
}

pub(crate) static INVALID_FRAME: Frame = Frame::invalid();

impl Frame {
    /// Creates an empty, not yet valid frame.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            id: 0,
            timestamp: 0,
            current_frames_per_second: 0.0,
            interaction_box: InteractionBox::INVALID,
            rotation: None,
            scale_factor_number: None,
            translation_vector: None,
            hands: Vec::new(),
            pointables: Vec::new(),
            finger_indices: Vec::new(),
            tool_indices: Vec::new(),
            gestures: Vec::new(),
        }
    }

    /// An owned invalid frame.
    #[must_use]
    pub const fn invalid() -> Self {
        Self::new()
    }

    /// The shared invalid frame returned by history misses.
    #[must_use]
    pub fn invalid_ref() -> &'static Self {
        &INVALID_FRAME
    }

    /// A frame is valid once it has an id.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.id != 0
    }

    /// Timestamp in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp as f64 / 1_000_000.0
    }

    // ---------------------------------------------------------------------
    // Building
    // ---------------------------------------------------------------------

    /// Appends a hand and returns its index.
    ///
    /// Any pointable indices the hand already carries are discarded; they are
    /// filled in by [`Self::attach_pointable`].
    pub fn push_hand(&mut self, mut hand: Hand) -> usize {
        hand.pointable_indices.clear();
        hand.finger_indices.clear();
        hand.tool_indices.clear();
        self.hands.push(hand);
        self.hands.len() - 1
    }

    /// Appends a pointable, wiring it to the first hand whose id matches
    /// `pointable.hand_id`. Returns the pointable's index.
    pub fn attach_pointable(&mut self, mut pointable: Pointable) -> usize {
        let index = self.pointables.len();
        let is_tool = pointable.is_tool();
        let is_finger = pointable.is_finger();

        pointable.hand_index = pointable
            .hand_id
            .and_then(|hid| self.hands.iter().position(|h| h.id == hid));

        if let Some(hi) = pointable.hand_index {
            let hand = &mut self.hands[hi];
            hand.pointable_indices.push(index);
            if is_tool {
                hand.tool_indices.push(index);
            } else if is_finger {
                hand.finger_indices.push(index);
            }
        }
        if is_tool {
            self.tool_indices.push(index);
        } else if is_finger {
            self.finger_indices.push(index);
        }
        self.pointables.push(pointable);
        index
    }

    /// Appends a gesture, resolving its references against this frame.
    ///
    /// Each hand id yields a slot (`None` when no hand matches). Pointable ids
    /// that match nothing are dropped. A circle gesture's primary pointable is
    /// the first pointable that resolved. Returns the gesture's index.
    pub fn attach_gesture(
        &mut self,
        mut gesture: Gesture,
        hand_ids: &[i64],
        pointable_ids: &[i64],
    ) -> usize {
        gesture.hand_indices = hand_ids
            .iter()
            .map(|&hid| self.hands.iter().position(|h| h.id == hid))
            .collect();
        gesture.pointable_indices = pointable_ids
            .iter()
            .filter_map(|&pid| self.pointables.iter().position(|p| p.id == pid))
            .collect();

        if let Some(GestureKind::Circle(circle)) = gesture.kind.as_mut() {
            circle.pointable_index = gesture.pointable_indices.first().copied();
        }

        self.gestures.push(gesture);
        self.gestures.len() - 1
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub(crate) fn hand_at(&self, index: Option<usize>) -> HandRef<'_> {
        let hand = index.and_then(|i| self.hands.get(i)).unwrap_or(&INVALID_HAND);
        HandRef::new(self, hand)
    }

    pub(crate) fn pointable_at(&self, index: usize) -> PointableRef<'_> {
        let p = self.pointables.get(index).unwrap_or(&INVALID_POINTABLE);
        PointableRef::new(self, p)
    }

    pub(crate) fn invalid_pointable(&self) -> PointableRef<'_> {
        PointableRef::new(self, &INVALID_POINTABLE)
    }

    /// Number of hands.
    #[must_use]
    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }

    /// Number of pointables.
    #[must_use]
    pub fn pointable_count(&self) -> usize {
        self.pointables.len()
    }

    /// Hands in decode order.
    pub fn hands(&self) -> impl Iterator<Item = HandRef<'_>> {
        self.hands.iter().map(move |h| HandRef::new(self, h))
    }

    /// Fingers and tools in decode order.
    pub fn pointables(&self) -> impl Iterator<Item = PointableRef<'_>> {
        self.pointables.iter().map(move |p| PointableRef::new(self, p))
    }

    /// Fingers in decode order.
    pub fn fingers(&self) -> impl Iterator<Item = PointableRef<'_>> {
        self.finger_indices.iter().map(move |&i| self.pointable_at(i))
    }

    /// Tools in decode order.
    pub fn tools(&self) -> impl Iterator<Item = PointableRef<'_>> {
        self.tool_indices.iter().map(move |&i| self.pointable_at(i))
    }

    /// This frame's own gestures, in decode order.
    pub fn gestures(&self) -> impl Iterator<Item = GestureRef<'_>> {
        self.gestures.iter().map(move |g| GestureRef::new(self, g))
    }

    /// Number of gestures in this frame.
    #[must_use]
    pub fn gesture_count(&self) -> usize {
        self.gestures.len()
    }

    /// Hand with `id`, or the invalid hand.
    #[must_use]
    pub fn hand(&self, id: i64) -> HandRef<'_> {
        self.hand_at(self.hands.iter().position(|h| h.id == id))
    }

    /// Pointable with `id`, or the invalid pointable.
    #[must_use]
    pub fn pointable(&self, id: i64) -> PointableRef<'_> {
        self.pointables()
            .find(|p| p.id == id)
            .unwrap_or_else(|| self.invalid_pointable())
    }

    /// Finger with `id`, or the invalid pointable.
    #[must_use]
    pub fn finger(&self, id: i64) -> PointableRef<'_> {
        self.fingers()
            .find(|p| p.id == id)
            .unwrap_or_else(|| self.invalid_pointable())
    }

    /// Tool with `id`, or the invalid pointable.
    #[must_use]
    pub fn tool(&self, id: i64) -> PointableRef<'_> {
        self.tools()
            .find(|p| p.id == id)
            .unwrap_or_else(|| self.invalid_pointable())
    }

    /// Gesture with `id`, or the invalid gesture.
    #[must_use]
    pub fn gesture(&self, id: i64) -> GestureRef<'_> {
        let g = self
            .gestures
            .iter()
            .find(|g| g.id == id)
            .unwrap_or(&INVALID_GESTURE);
        GestureRef::new(self, g)
    }

    // ---------------------------------------------------------------------
    // Motion since another frame
    // ---------------------------------------------------------------------

    /// Rotation axis since `since`.
    #[must_use]
    pub fn rotation_axis(&self, since: &Self) -> Vector3 {
        motion::rotation_axis(self, Some(since))
    }

    /// Rotation angle since `since`, optionally projected onto `axis`.
    #[must_use]
    pub fn rotation_angle(&self, since: &Self, axis: Option<Vector3>) -> f64 {
        motion::rotation_angle(self, Some(since), axis)
    }

    /// Rotation matrix since `since`.
    #[must_use]
    pub fn rotation_matrix(&self, since: &Self) -> Matrix {
        motion::rotation_matrix(self, Some(since))
    }

    /// Scale factor since `since`.
    #[must_use]
    pub fn scale_factor(&self, since: &Self) -> f64 {
        motion::scale_factor(self, Some(since))
    }

    /// Translation since `since`.
    #[must_use]
    pub fn translation(&self, since: &Self) -> Vector3 {
        motion::translation(self, Some(since))
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.is_valid() && other.is_valid() && self.id == other.id
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Motion for Frame {
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

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame [ id:{} | timestamp:{} | Hand count:({}) | Pointable count:({}) | Gesture count:({}) ]",
            self.id,
            self.timestamp,
            self.hands.len(),
            self.pointables.len(),
            self.gestures.len()
        )
    }
}
