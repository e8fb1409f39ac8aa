//! Gestures recognized by the device.
//!
//! Classification happens upstream; a [`Gesture`] only carries what the device
//! reported, with hand and pointable references resolved against the frame it
//! arrived in.

use std::fmt;
use std::ops::Deref;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Frame, HandRef, PointableRef, Vector3};

/// Lifecycle stage of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GestureState {
    /// Unrecognized or missing state.
    #[default]
    Invalid,
    /// First frame of the gesture.
    Start,
    /// Gesture in progress.
    Update,
    /// Last frame of the gesture.
    Stop,
}

impl GestureState {
    /// Maps the wire string; anything unrecognized is [`GestureState::Invalid`].
    #[must_use]
    pub fn from_wire(s: &str) -> Self {
        match s {
            "start" => Self::Start,
            "update" => Self::Update,
            "stop" => Self::Stop,
            _ => Self::Invalid,
        }
    }
}

/// Gesture discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GestureType {
    /// The invalid gesture.
    Invalid,
    /// Straight-line movement.
    Swipe,
    /// Circular movement.
    Circle,
    /// Forward tap toward the screen.
    ScreenTap,
    /// Downward tap, like pressing a key.
    KeyTap,
}

impl GestureType {
    /// Maps the wire `type` string. Returns `None` for unknown strings.
    #[must_use]
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "circle" => Some(Self::Circle),
            "swipe" => Some(Self::Swipe),
            "screenTap" => Some(Self::ScreenTap),
            "keyTap" => Some(Self::KeyTap),
            _ => None,
        }
    }

    /// Wire name of this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Swipe => "swipe",
            Self::Circle => "circle",
            Self::ScreenTap => "screenTap",
            Self::KeyTap => "keyTap",
        }
    }
}

/// A circular finger movement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CircleGesture {
    /// Circle center in millimeters.
    pub center: Vector3,
    /// Unit normal of the circle plane.
    pub normal: Vector3,
    /// Number of revolutions so far.
    pub progress: f64,
    /// Radius in millimeters.
    pub radius: f64,
    /// Index of the pointable drawing the circle, within the owning frame.
    pub pointable_index: Option<usize>,
}

/// A straight-line movement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwipeGesture {
    /// Where the swipe began.
    pub start_position: Vector3,
    /// Current position.
    pub position: Vector3,
    /// Unit direction of travel.
    pub direction: Vector3,
    /// Speed in millimeters per second.
    pub speed: f64,
}

/// A tap motion (screen tap or key tap).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TapGesture {
    /// Tap position.
    pub position: Vector3,
    /// Tap direction.
    pub direction: Vector3,
    /// Completion in `[0, 1]`.
    pub progress: f64,
}

/// Per-type gesture data.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GestureKind {
    /// Circle.
    Circle(CircleGesture),
    /// Swipe.
    Swipe(SwipeGesture),
    /// Screen tap.
    ScreenTap(TapGesture),
    /// Key tap.
    KeyTap(TapGesture),
}

/// A recognized gesture.
///
/// Two gestures are equal when both are valid and share an id.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gesture {
    /// Gesture id, shared by every frame the gesture spans.
    pub id: i64,
    /// Lifecycle stage.
    pub state: GestureState,
    /// Elapsed time in microseconds.
    pub duration: u64,
    /// Elapsed time in seconds.
    pub duration_seconds: f64,
    /// Type-specific data; `None` only for the invalid sentinel.
    pub kind: Option<GestureKind>,
    pub(crate) hand_indices: Vec<Option<usize>>,
    pub(crate) pointable_indices: Vec<usize>,
}

pub(crate) static INVALID_GESTURE: Gesture = Gesture::invalid();

impl Gesture {
    /// Creates a gesture of the given kind.
    #[must_use]
    pub fn new(id: i64, kind: GestureKind) -> Self {
        Self {
            id,
            kind: Some(kind),
            ..Self::invalid()
        }
    }

    /// The invalid gesture.
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            id: 0,
            state: GestureState::Invalid,
            duration: 0,
            duration_seconds: 0.0,
            kind: None,
            hand_indices: Vec::new(),
            pointable_indices: Vec::new(),
        }
    }

    /// Sets the duration from microseconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn set_duration(&mut self, micros: u64) {
        self.duration = micros;
        self.duration_seconds = micros as f64 / 1_000_000.0;
    }

    /// A gesture is valid once it has a non-zero duration.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.duration_seconds > 0.0
    }

    /// Discriminator derived from [`Self::kind`].
    #[must_use]
    pub const fn gesture_type(&self) -> GestureType {
        match self.kind {
            Some(GestureKind::Circle(_)) => GestureType::Circle,
            Some(GestureKind::Swipe(_)) => GestureType::Swipe,
            Some(GestureKind::ScreenTap(_)) => GestureType::ScreenTap,
            Some(GestureKind::KeyTap(_)) => GestureType::KeyTap,
            None => GestureType::Invalid,
        }
    }
}

impl PartialEq for Gesture {
    fn eq(&self, other: &Self) -> bool {
        self.is_valid() && other.is_valid() && self.id == other.id
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gesture [ id:{} | state:{:?} | type:{} | duration:{} ]",
            self.id,
            self.state,
            self.gesture_type().name(),
            self.duration
        )
    }
}

/// A gesture borrowed together with the frame that owns it.
#[derive(Debug, Clone, Copy)]
pub struct GestureRef<'f> {
    frame: &'f Frame,
    gesture: &'f Gesture,
}

impl<'f> GestureRef<'f> {
    pub(crate) const fn new(frame: &'f Frame, gesture: &'f Gesture) -> Self {
        Self { frame, gesture }
    }

    /// The owning frame.
    #[must_use]
    pub const fn frame(&self) -> &'f Frame {
        self.frame
    }

    /// The underlying gesture.
    #[must_use]
    pub const fn get(&self) -> &'f Gesture {
        self.gesture
    }

    /// Hands involved, in wire order. Ids that did not resolve yield `None`.
    pub fn hands(&self) -> impl Iterator<Item = Option<HandRef<'f>>> + use<'f> {
        let frame = self.frame;
        self.gesture
            .hand_indices
            .iter()
            .map(move |slot| slot.map(|i| frame.hand_at(Some(i))))
    }

    /// Pointables involved, in wire order. Unresolved ids are omitted.
    pub fn pointables(&self) -> impl Iterator<Item = PointableRef<'f>> + use<'f> {
        let frame = self.frame;
        self.gesture
            .pointable_indices
            .iter()
            .map(move |&i| frame.pointable_at(i))
    }

    /// The primary pointable of a circle gesture.
    #[must_use]
    pub fn pointable(&self) -> Option<PointableRef<'f>> {
        match self.gesture.kind {
            Some(GestureKind::Circle(c)) => c.pointable_index.map(|i| self.frame.pointable_at(i)),
            _ => None,
        }
    }
}

/// Same gesture of the same frame instance.
impl PartialEq for GestureRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.frame, other.frame) && self.gesture == other.gesture
    }
}

impl Deref for GestureRef<'_> {
    type Target = Gesture;

    fn deref(&self) -> &Gesture {
        self.gesture
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn swipe() -> GestureKind {
        GestureKind::Swipe(SwipeGesture {
            start_position: Vector3::ZERO,
            position: Vector3::new(50.0, 0.0, 0.0),
            direction: Vector3::RIGHT,
            speed: 900.0,
        })
    }

    #[test]
    fn state_from_wire() {
        assert_eq!(GestureState::from_wire("start"), GestureState::Start);
        assert_eq!(GestureState::from_wire("update"), GestureState::Update);
        assert_eq!(GestureState::from_wire("stop"), GestureState::Stop);
        assert_eq!(GestureState::from_wire("paused"), GestureState::Invalid);
    }

    #[test]
    fn type_from_wire() {
        assert_eq!(GestureType::from_wire("circle"), Some(GestureType::Circle));
        assert_eq!(GestureType::from_wire("screenTap"), Some(GestureType::ScreenTap));
        assert_eq!(GestureType::from_wire("keyTap"), Some(GestureType::KeyTap));
        assert_eq!(GestureType::from_wire("pinch"), None);
    }

    #[test]
    fn duration_seconds() {
        let mut g = Gesture::new(9, swipe());
        assert!(!g.is_valid());
        g.set_duration(250_000);
        assert_eq!(g.duration_seconds, 0.25);
        assert!(g.is_valid());
    }

    #[test]
    fn type_follows_kind() {
        assert_eq!(Gesture::new(1, swipe()).gesture_type(), GestureType::Swipe);
        assert_eq!(Gesture::invalid().gesture_type(), GestureType::Invalid);
        let tap = TapGesture {
            position: Vector3::ZERO,
            direction: Vector3::DOWN,
            progress: 1.0,
        };
        assert_eq!(
            Gesture::new(2, GestureKind::KeyTap(tap)).gesture_type(),
            GestureType::KeyTap
        );
    }

    #[test]
    fn display_names_type() {
        let text = Gesture::new(4, swipe()).to_string();
        assert!(text.contains("id:4"));
        assert!(text.contains("swipe"));
    }
}
