//! Builds [`Frame`]s from parsed device messages.
//!
//! Decoding runs in a fixed order because later stages resolve ids against
//! earlier ones: hands, frame id and rate, interaction box, pointables (wired
//! to hands), gestures (wired to hands and pointables), frame motion, and
//! finally the timestamp.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace, warn};
use tracking_types::{
    CircleGesture, Finger, FingerType, Frame, Gesture, GestureKind, GestureState, Hand,
    HandType, InteractionBox, Matrix, Pointable, PointableKind, SwipeGesture, TapGesture, TouchZone,
    Vector3,
};

use crate::config::{DecoderConfig, UnknownGesturePolicy};
use crate::error::{Result, StreamError};
use crate::wire::{Vec3, WireFrame, WireGesture, WireHand, WirePointable};

/// Returns true if `message` is a frame update (it carries both an `id` and a
/// `timestamp`).
#[must_use]
pub fn is_frame_message(message: &Value) -> bool {
    let present = |key| message.get(key).is_some_and(|v: &Value| !v.is_null());
    present("id") && present("timestamp")
}

fn vec3(v: Option<Vec3>) -> Vector3 {
    v.map_or(Vector3::INVALID, Vector3::from_array)
}

/// Decodes device messages into frames.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tracking_stream::FrameDecoder;
///
/// let decoder = FrameDecoder::default();
/// let frame = decoder
///     .decode(&json!({"id": 3, "timestamp": 100, "hands": [{"id": 1}]}))
///     .unwrap()
///     .unwrap();
/// assert_eq!(frame.id, 3);
/// assert_eq!(frame.hand(1).id, 1);
///
/// // Not a frame update: ignored.
/// assert!(decoder.decode(&json!({"version": 6})).unwrap().is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder {
    config: DecoderConfig,
}

impl FrameDecoder {
    /// Creates a decoder with the given configuration.
    #[must_use]
    pub const fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// The decoder configuration.
    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes one message.
    ///
    /// Returns `Ok(None)` for messages that are not frame updates.
    ///
    /// # Errors
    ///
    /// - [`StreamError::Json`] if the frame's top-level fields do not match
    ///   the wire schema.
    /// - [`StreamError::UnknownGestureType`] under
    ///   [`UnknownGesturePolicy::Abort`].
    /// - [`StreamError::MalformedEntity`] when `skip_malformed` is off and an
    ///   entity fails to decode.
    pub fn decode(&self, message: &Value) -> Result<Option<Frame>> {
        if !is_frame_message(message) {
            trace!("ignoring non-frame message");
            return Ok(None);
        }
        let wire = WireFrame::deserialize(message)?;
        let mut frame = Frame::new();

        for (index, entry) in wire.hands.iter().flatten().enumerate() {
            if let Some(hand) = self.entity::<WireHand>("hand", index, entry)? {
                frame.push_hand(build_hand(hand));
            }
        }

        frame.id = wire.id.unwrap_or(0);
        frame.current_frames_per_second = wire.current_frames_per_second.unwrap_or(0.0);

        if let Some(ib) = wire.interaction_box {
            frame.interaction_box = InteractionBox::from_arrays(ib.center, ib.size);
        }

        for (index, entry) in wire.pointables.iter().flatten().enumerate() {
            if let Some(p) = self.entity::<WirePointable>("pointable", index, entry)? {
                frame.attach_pointable(build_pointable(p));
            }
        }

        for (index, entry) in wire.gestures.iter().flatten().enumerate() {
            let Some(g) = self.entity::<WireGesture>("gesture", index, entry)? else {
                continue;
            };
            let Some(kind) = gesture_kind(&g) else {
                match self.config.unknown_gesture {
                    UnknownGesturePolicy::Abort => {
                        return Err(StreamError::unknown_gesture_type(g.gesture_type));
                    }
                    UnknownGesturePolicy::Skip => {
                        warn!(gesture_type = %g.gesture_type, index, "skipping unknown gesture type");
                        continue;
                    }
                }
            };
            let (gesture, hand_ids, pointable_ids) = build_gesture(g, kind);
            frame.attach_gesture(gesture, &hand_ids, &pointable_ids);
        }

        if let Some(r) = wire.r {
            frame.rotation = Some(Matrix::from_rows(r));
        }
        frame.scale_factor_number = wire.s;
        if let Some(t) = wire.t {
            frame.translation_vector = Some(Vector3::from_array(t));
        }

        frame.timestamp = wire.timestamp.unwrap_or(0);

        debug!(
            id = frame.id,
            timestamp = frame.timestamp,
            hands = frame.hand_count(),
            pointables = frame.pointable_count(),
            gestures = frame.gesture_count(),
            "decoded frame"
        );
        Ok(Some(frame))
    }

    /// Parses and decodes one text message.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Json`] if `text` is not JSON, plus everything
    /// [`Self::decode`] returns.
    pub fn decode_str(&self, text: &str) -> Result<Option<Frame>> {
        let value: Value = serde_json::from_str(text)?;
        self.decode(&value)
    }

    fn entity<T: for<'de> Deserialize<'de>>(
        &self,
        kind: &'static str,
        index: usize,
        entry: &Value,
    ) -> Result<Option<T>> {
        match T::deserialize(entry) {
            Ok(v) => Ok(Some(v)),
            Err(e) if self.config.skip_malformed => {
                warn!(kind, index, error = %e, "skipping malformed entity");
                Ok(None)
            }
            Err(e) => Err(StreamError::malformed(kind, index, e.to_string())),
        }
    }
}

fn build_hand(w: WireHand) -> Hand {
    let mut hand = Hand::new(w.id);
    hand.hand_type = w.hand_type.as_deref().map_or(HandType::Unknown, HandType::from_wire);
    hand.direction = vec3(w.direction);
    hand.palm_normal = vec3(w.palm_normal);
    hand.palm_position = vec3(w.palm_position);
    hand.stabilized_palm_position = vec3(w.stabilized_palm_position);
    hand.palm_velocity = vec3(w.palm_velocity);
    hand.sphere_center = vec3(w.sphere_center);
    hand.sphere_radius = w.sphere_radius.unwrap_or(0.0);
    hand.rotation = w.r.map(Matrix::from_rows);
    hand.scale_factor_number = w.s;
    hand.translation_vector = w.t.map(Vector3::from_array);
    hand.time_visible = w.time_visible.unwrap_or(0.0);
    hand.confidence = w.confidence.unwrap_or(0.0);
    hand.grab_strength = w.grab_strength.unwrap_or(0.0);
    hand.pinch_strength = w.pinch_strength.unwrap_or(0.0);
    trace!(id = hand.id, "decoded hand");
    hand
}

fn build_finger(w: &WirePointable) -> Finger {
    let mut finger = Finger::new();
    finger.finger_type = w.finger_type.and_then(|code| match FingerType::try_from(code) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!(id = w.id, error = %e, "ignoring finger type");
            None
        }
    });
    finger.dip_position = vec3(w.dip_position);
    finger.pip_position = vec3(w.pip_position);
    finger.mcp_position = vec3(w.mcp_position);
    finger.carp_position = vec3(w.carp_position);
    finger.btip_position = vec3(w.btip_position);
    let bases = w
        .bases
        .map_or([Matrix::identity(); 4], |b| b.map(Matrix::from_rows));
    finger.rebuild_bones(w.width.unwrap_or(0.0), bases);
    finger
}

fn build_pointable(w: WirePointable) -> Pointable {
    let kind = if w.tool {
        PointableKind::Tool
    } else {
        PointableKind::Finger(Box::new(build_finger(&w)))
    };
    let mut p = Pointable::new(w.id, kind);
    p.hand_id = w.hand_id;
    p.length = w.length.unwrap_or(0.0);
    if w.tool {
        p.width = w.width.unwrap_or(0.0);
    }
    p.direction = vec3(w.direction);
    p.tip_position = vec3(w.tip_position);
    p.stabilized_tip_position = vec3(w.stabilized_tip_position);
    p.tip_velocity = vec3(w.tip_velocity);
    p.touch_distance = w.touch_distance.unwrap_or(0.0);
    p.touch_zone = w.touch_zone.as_deref().map_or(TouchZone::None, TouchZone::from_wire);
    p.time_visible = w.time_visible.unwrap_or(0.0);
    trace!(id = p.id, tool = w.tool, hand_id = ?p.hand_id, "decoded pointable");
    p
}

/// Type-specific payload for the wire `type` string, or `None` if unknown.
fn gesture_kind(w: &WireGesture) -> Option<GestureKind> {
    let tap = || TapGesture {
        position: vec3(w.position),
        direction: vec3(w.direction),
        progress: w.progress.unwrap_or(0.0),
    };
    let kind = match w.gesture_type.as_str() {
        "circle" => GestureKind::Circle(CircleGesture {
            center: vec3(w.center),
            normal: vec3(w.normal),
            progress: w.progress.unwrap_or(0.0),
            radius: w.radius.unwrap_or(0.0),
            pointable_index: None,
        }),
        "swipe" => GestureKind::Swipe(SwipeGesture {
            start_position: vec3(w.start_position),
            position: vec3(w.position),
            direction: vec3(w.direction),
            speed: w.speed.unwrap_or(0.0),
        }),
        "screenTap" => GestureKind::ScreenTap(tap()),
        "keyTap" => GestureKind::KeyTap(tap()),
        _ => return None,
    };
    Some(kind)
}

fn build_gesture(w: WireGesture, kind: GestureKind) -> (Gesture, Vec<i64>, Vec<i64>) {
    let mut gesture = Gesture::new(w.id, kind);
    gesture.set_duration(w.duration.unwrap_or(0));
    gesture.state = w.state.as_deref().map_or(GestureState::Invalid, GestureState::from_wire);
    trace!(id = gesture.id, gesture_type = gesture.gesture_type().name(), "decoded gesture");
    (gesture, w.hand_ids, w.pointable_ids)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;
    use tracking_types::{BoneType, GestureType};

    fn decode(message: &Value) -> Frame {
        FrameDecoder::default().decode(message).unwrap().unwrap()
    }

    #[test]
    fn ignores_messages_without_frame_markers() {
        let decoder = FrameDecoder::default();
        assert!(decoder.decode(&json!({"id": 1})).unwrap().is_none());
        assert!(decoder.decode(&json!({"timestamp": null})).unwrap().is_none());
        assert!(decoder.decode(&json!({"timestamp": 5})).unwrap().is_none());
        assert!(decoder.decode(&json!({"id": null, "timestamp": 5})).unwrap().is_none());
        assert!(decoder.decode(&json!([1, 2, 3])).unwrap().is_none());
    }

    #[test]
    fn minimal_frame_uses_defaults() {
        let frame = decode(&json!({"id": 5, "timestamp": 99}));
        assert_eq!(frame.id, 5);
        assert_eq!(frame.timestamp, 99);
        assert_eq!(frame.hand_count(), 0);
        assert!(frame.rotation.is_none());
        assert!(frame.scale_factor_number.is_none());
        assert!(frame.translation_vector.is_none());
        assert!(!frame.interaction_box.is_valid());
    }

    #[test]
    fn frame_motion_fields() {
        let frame = decode(&json!({
            "id": 1,
            "timestamp": 1,
            "currentFramesPerSecond": 110.5,
            "r": [[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            "s": 0.25,
            "t": [1.0, 2.0, 3.0],
            "interactionBox": {"center": [0.0, 200.0, 0.0], "size": [235.0, 235.0, 147.0]}
        }));
        assert_eq!(frame.current_frames_per_second, 110.5);
        let r = frame.rotation.unwrap();
        assert_eq!(r.x_basis, Vector3::new(0.0, 1.0, 0.0));
        assert!(r.origin.is_none());
        assert_eq!(frame.scale_factor_number, Some(0.25));
        assert_eq!(frame.translation_vector, Some(Vector3::new(1.0, 2.0, 3.0)));
        assert!(frame.interaction_box.is_valid());
        assert_eq!(frame.interaction_box.depth, 147.0);
    }

    #[test]
    fn hand_fields() {
        let frame = decode(&json!({
            "id": 1,
            "timestamp": 1,
            "hands": [{
                "id": 4,
                "type": "left",
                "direction": [0.0, 0.0, -1.0],
                "palmNormal": [0.0, -1.0, 0.0],
                "palmPosition": [1.0, 2.0, 3.0],
                "stabilizedPalmPosition": [1.5, 2.0, 3.0],
                "palmVelocity": [0.0, 10.0, 0.0],
                "sphereCenter": [0.0, 0.0, 0.0],
                "sphereRadius": 55.0,
                "timeVisible": 2.5,
                "grabStrength": 0.75
            }]
        }));
        let hand = frame.hand(4);
        assert!(hand.is_valid());
        assert_eq!(hand.hand_type, HandType::Left);
        assert_eq!(hand.stabilized_palm_position, Vector3::new(1.5, 2.0, 3.0));
        assert_eq!(hand.sphere_radius, 55.0);
        assert_eq!(hand.time_visible, 2.5);
        assert_eq!(hand.grab_strength, 0.75);
        assert!(hand.rotation.is_none());
    }

    #[test]
    fn tool_width_and_touch_zone() {
        let frame = decode(&json!({
            "id": 1,
            "timestamp": 1,
            "pointables": [
                {"id": 1, "tool": true, "width": 6.0, "touchZone": "touching", "touchDistance": -0.5},
                {"id": 2, "tool": false, "width": 16.0, "touchZone": "none"}
            ]
        }));
        let tool = frame.tool(1);
        assert!(tool.is_tool());
        assert_eq!(tool.width, 6.0);
        assert_eq!(tool.touch_zone, TouchZone::Touching);
        assert_eq!(tool.touch_distance, -0.5);

        let finger = frame.finger(2);
        assert!(finger.is_finger());
        assert_eq!(finger.width, 0.0);
        assert_eq!(finger.touch_zone, TouchZone::None);
    }

    #[test]
    fn finger_joints_and_bones() {
        let frame = decode(&json!({
            "id": 1,
            "timestamp": 1,
            "pointables": [{
                "id": 10,
                "type": 1,
                "width": 17.0,
                "carpPosition": [0.0, 0.0, 0.0],
                "mcpPosition": [0.0, 0.0, -60.0],
                "pipPosition": [0.0, 0.0, -100.0],
                "dipPosition": [0.0, 0.0, -125.0],
                "btipPosition": [0.0, 0.0, -140.0]
            }]
        }));
        let p = frame.finger(10);
        let finger = p.finger().unwrap();
        assert_eq!(finger.finger_type, Some(FingerType::Index));
        assert_relative_eq!(finger.bone(BoneType::Metacarpal).length, 60.0);
        assert_relative_eq!(finger.bone(BoneType::Intermediate).length, 25.0);
        assert_relative_eq!(finger.bone(BoneType::Distal).width, 17.0);
    }

    #[test]
    fn unknown_finger_type_is_dropped() {
        let frame = decode(&json!({
            "id": 1,
            "timestamp": 1,
            "pointables": [{"id": 10, "type": 9}]
        }));
        assert!(frame.finger(10).finger().unwrap().finger_type.is_none());
    }

    #[test]
    fn gesture_kinds() {
        let frame = decode(&json!({
            "id": 1,
            "timestamp": 1,
            "gestures": [
                {"id": 1, "type": "circle", "state": "start", "duration": 500_000,
                 "center": [0.0, 0.0, 0.0], "normal": [0.0, 0.0, 1.0], "progress": 0.5, "radius": 30.0},
                {"id": 2, "type": "swipe", "state": "update", "duration": 10,
                 "startPosition": [0.0, 0.0, 0.0], "position": [40.0, 0.0, 0.0],
                 "direction": [1.0, 0.0, 0.0], "speed": 800.0},
                {"id": 3, "type": "screenTap", "state": "stop", "progress": 1.0},
                {"id": 4, "type": "keyTap", "state": "bogus"}
            ]
        }));
        let circle = frame.gesture(1);
        assert_eq!(circle.gesture_type(), GestureType::Circle);
        assert_eq!(circle.state, GestureState::Start);
        assert_eq!(circle.duration_seconds, 0.5);
        assert!(circle.is_valid());

        match frame.gesture(2).kind {
            Some(GestureKind::Swipe(s)) => assert_eq!(s.speed, 800.0),
            ref other => panic!("expected swipe, got {other:?}"),
        }
        assert_eq!(frame.gesture(3).gesture_type(), GestureType::ScreenTap);
        assert_eq!(frame.gesture(3).state, GestureState::Stop);
        assert_eq!(frame.gesture(4).gesture_type(), GestureType::KeyTap);
        assert_eq!(frame.gesture(4).state, GestureState::Invalid);
        assert!(!frame.gesture(4).is_valid());
    }

    #[test]
    fn unknown_gesture_aborts_by_default() {
        let message = json!({
            "id": 1,
            "timestamp": 1,
            "gestures": [{"id": 1, "type": "pinch"}]
        });
        let err = FrameDecoder::default().decode(&message).unwrap_err();
        assert!(matches!(err, StreamError::UnknownGestureType(ref t) if t == "pinch"));
    }

    #[test]
    fn unknown_gesture_skipped_when_lenient() {
        let message = json!({
            "id": 1,
            "timestamp": 1,
            "gestures": [
                {"id": 1, "type": "pinch"},
                {"id": 2, "type": "keyTap", "duration": 1}
            ]
        });
        let frame = FrameDecoder::new(DecoderConfig::lenient())
            .decode(&message)
            .unwrap()
            .unwrap();
        assert_eq!(frame.gesture_count(), 1);
        assert_eq!(frame.gesture(2).gesture_type(), GestureType::KeyTap);
    }

    #[test]
    fn every_known_type_keeps_its_wire_name() {
        for (id, name) in (1..).zip(["circle", "swipe", "screenTap", "keyTap"]) {
            let frame = decode(&json!({
                "id": 1,
                "timestamp": 1,
                "gestures": [{"id": id, "type": name, "duration": 1}]
            }));
            let gesture = frame.gesture(id);
            assert!(gesture.is_valid());
            assert_eq!(gesture.gesture_type().name(), name);
            assert_eq!(GestureType::from_wire(name), Some(gesture.gesture_type()));
        }
        let err = FrameDecoder::default()
            .decode(&json!({
                "id": 1,
                "timestamp": 1,
                "gestures": [{"id": 1, "type": "invalid"}]
            }))
            .unwrap_err();
        assert!(matches!(err, StreamError::UnknownGestureType(ref t) if t == "invalid"));
    }

    #[test]
    fn malformed_entity_skipped_or_fatal() {
        let message = json!({
            "id": 1,
            "timestamp": 1,
            "hands": [{"id": 1, "direction": [0.0]}, {"id": 2}]
        });
        let frame = decode(&message);
        assert_eq!(frame.hand_count(), 1);
        assert_eq!(frame.hand(2).id, 2);

        let err = FrameDecoder::new(DecoderConfig::strict())
            .decode(&message)
            .unwrap_err();
        assert!(matches!(err, StreamError::MalformedEntity { kind: "hand", index: 0, .. }));
    }

    #[test]
    fn malformed_top_level_is_an_error() {
        let err = FrameDecoder::default()
            .decode(&json!({"id": 1, "timestamp": 1, "r": [[1.0]]}))
            .unwrap_err();
        assert!(matches!(err, StreamError::Json(_)));
    }

    #[test]
    fn decode_str() {
        let decoder = FrameDecoder::default();
        let frame = decoder.decode_str(r#"{"id": 2, "timestamp": 3}"#).unwrap().unwrap();
        assert_eq!(frame.id, 2);
        assert!(decoder.decode_str("not json").is_err());
    }
}
