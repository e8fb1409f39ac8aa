//! Bounded store of recently decoded frames.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;
use tracking_types::{Frame, GestureRef};

use crate::config::DEFAULT_HISTORY_CAPACITY;

/// The most recent frames, newest first.
///
/// Index 0 is always the frame pushed last. Once `capacity` frames are
/// stored, each push drops the oldest one.
///
/// # Example
///
/// ```
/// use tracking_stream::FrameHistory;
/// use tracking_types::Frame;
///
/// let mut history = FrameHistory::new(2);
/// for id in 1..=3 {
///     let mut frame = Frame::new();
///     frame.id = id;
///     history.push(frame);
/// }
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.get(0).id, 3);
/// assert_eq!(history.get(1).id, 2);
/// assert!(!history.get(2).is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct FrameHistory {
    /// Maximum number of frames.
    capacity: usize,

    /// Frames, newest at the front.
    frames: VecDeque<Frame>,
}

impl Default for FrameHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl FrameHistory {
    /// Creates an empty history holding at most `capacity` frames (at least 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            frames: VecDeque::with_capacity(capacity.clamp(1, 1024)),
        }
    }

    /// Returns the capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of stored frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if no frame has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns true if the history is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    /// Removes all frames.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Stores `frame` as the newest entry, dropping the oldest if full.
    pub fn push(&mut self, frame: Frame) {
        if self.is_full() {
            self.frames.pop_back();
        }
        debug!(id = frame.id, timestamp = frame.timestamp, "frame stored");
        self.frames.push_front(frame);
    }

    /// The frame `offset` pushes ago (0 is the newest).
    ///
    /// Returns the invalid frame sentinel when `offset` is out of range.
    #[must_use]
    pub fn get(&self, offset: usize) -> &Frame {
        self.frames.get(offset).unwrap_or(Frame::invalid_ref())
    }

    /// The newest frame, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Frame> {
        self.frames.front()
    }

    /// The oldest stored frame, if any.
    #[must_use]
    pub fn oldest(&self) -> Option<&Frame> {
        self.frames.back()
    }

    /// Iterates newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Finds a stored frame by id.
    #[must_use]
    pub fn find(&self, id: u64) -> Option<&Frame> {
        self.frames.iter().find(|f| f.id == id)
    }

    /// Gestures from `frame` back through `since`, newest frame first.
    ///
    /// The walk starts at the stored frame whose id matches `frame` (the
    /// newest entry if there is none) and ends after the frame whose id
    /// matches `since`, or at the oldest stored frame. Within a frame,
    /// gestures keep their decoded order. With no `since`, only `frame`'s own
    /// gestures are returned.
    #[must_use]
    pub fn gestures_since<'h>(
        &'h self,
        frame: &'h Frame,
        since: Option<&Frame>,
    ) -> Vec<GestureRef<'h>> {
        let Some(since) = since else {
            return frame.gestures().collect();
        };

        let start = self.frames.iter().position(|f| f.id == frame.id).unwrap_or(0);
        let mut gestures = Vec::new();
        for stored in self.frames.iter().skip(start) {
            gestures.extend(stored.gestures());
            if stored.id == since.id {
                break;
            }
        }
        gestures
    }

    /// Computes statistics about the stored frames.
    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        let newest = self.latest().map(|f| f.timestamp);
        let oldest = self.oldest().map(|f| f.timestamp);
        HistoryStats {
            count: self.len(),
            capacity: self.capacity,
            oldest_timestamp: oldest,
            newest_timestamp: newest,
            time_span: match (oldest, newest) {
                (Some(o), Some(n)) if self.len() >= 2 => Some(n.saturating_sub(o)),
                _ => None,
            },
        }
    }
}

/// Statistics about a [`FrameHistory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Number of stored frames.
    pub count: usize,

    /// History capacity.
    pub capacity: usize,

    /// Timestamp of the oldest frame, in microseconds.
    pub oldest_timestamp: Option<u64>,

    /// Timestamp of the newest frame, in microseconds.
    pub newest_timestamp: Option<u64>,

    /// Newest minus oldest timestamp, with at least two frames stored.
    pub time_span: Option<u64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use tracking_types::{
        CircleGesture, Gesture, GestureKind, GestureType, SwipeGesture, Vector3,
    };

    fn frame(id: u64) -> Frame {
        let mut f = Frame::new();
        f.id = id;
        f.timestamp = id * 1000;
        f
    }

    fn circle(id: i64) -> Gesture {
        Gesture::new(
            id,
            GestureKind::Circle(CircleGesture {
                center: Vector3::ZERO,
                normal: Vector3::Z_AXIS,
                progress: 1.0,
                radius: 10.0,
                pointable_index: None,
            }),
        )
    }

    fn swipe(id: i64) -> Gesture {
        Gesture::new(
            id,
            GestureKind::Swipe(SwipeGesture {
                start_position: Vector3::ZERO,
                position: Vector3::X_AXIS,
                direction: Vector3::X_AXIS,
                speed: 100.0,
            }),
        )
    }

    #[test]
    fn min_capacity() {
        assert_eq!(FrameHistory::new(0).capacity(), 1);
        assert_eq!(FrameHistory::default().capacity(), 60);
    }

    #[test]
    fn keeps_sixty_newest() {
        let mut history = FrameHistory::default();
        for id in 1..=100 {
            history.push(frame(id));
        }
        assert_eq!(history.len(), 60);
        assert!(history.is_full());
        assert_eq!(history.get(0).id, 100);
        assert_eq!(history.get(1).id, 99);
        assert_eq!(history.get(59).id, 41);
        assert_eq!(history.oldest().unwrap().id, 41);
    }

    #[test]
    fn miss_returns_invalid_frame() {
        let mut history = FrameHistory::default();
        assert!(!history.get(0).is_valid());
        history.push(frame(1));
        assert!(history.get(0).is_valid());
        assert!(!history.get(1).is_valid());
        assert!(!history.get(60).is_valid());
    }

    #[test]
    fn iter_and_find() {
        let mut history = FrameHistory::new(5);
        for id in 1..=3 {
            history.push(frame(id));
        }
        let ids: Vec<u64> = history.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(history.find(2).unwrap().timestamp, 2000);
        assert!(history.find(9).is_none());

        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }

    #[test]
    fn gestures_since_newest_first() {
        let a = frame(1);
        let mut b = frame(2);
        b.attach_gesture(circle(10), &[], &[]);
        let mut c = frame(3);
        c.attach_gesture(swipe(20), &[], &[]);

        let mut history = FrameHistory::default();
        history.push(a.clone());
        history.push(b);
        history.push(c);

        let latest = history.get(0);
        let ids: Vec<i64> = history
            .gestures_since(latest, Some(&a))
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![20, 10]);

        let types: Vec<GestureType> = history
            .gestures_since(latest, Some(&a))
            .iter()
            .map(|g| g.gesture_type())
            .collect();
        assert_eq!(types, vec![GestureType::Swipe, GestureType::Circle]);
    }

    #[test]
    fn gestures_since_stops_at_reference() {
        let mut history = FrameHistory::default();
        for id in 1..=4 {
            let mut f = frame(id);
            f.attach_gesture(circle(i64::try_from(id).unwrap() * 10), &[], &[]);
            history.push(f);
        }

        let ids: Vec<i64> = history
            .gestures_since(history.get(0), Some(history.get(2)))
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![40, 30, 20]);

        // Starting from an older frame skips the newer ones.
        let ids: Vec<i64> = history
            .gestures_since(history.get(1), Some(history.get(3)))
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![30, 20, 10]);
    }

    #[test]
    fn gestures_since_unknown_reference_runs_to_oldest() {
        let mut history = FrameHistory::new(3);
        for id in 1..=3 {
            let mut f = frame(id);
            f.attach_gesture(swipe(i64::try_from(id).unwrap()), &[], &[]);
            history.push(f);
        }
        let ids: Vec<i64> = history
            .gestures_since(history.get(0), Some(&frame(99)))
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn gestures_without_reference_are_own() {
        let mut f = frame(1);
        f.attach_gesture(swipe(5), &[], &[]);
        let mut history = FrameHistory::default();
        history.push(frame(2));
        history.push(f);
        let gestures = history.gestures_since(history.get(0), None);
        assert_eq!(gestures.len(), 1);
        assert_eq!(gestures[0].id, 5);
    }

    #[test]
    fn stats() {
        let mut history = FrameHistory::new(10);
        assert_eq!(history.stats().time_span, None);

        history.push(frame(1));
        let stats = history.stats();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.time_span, None);

        history.push(frame(4));
        let stats = history.stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.capacity, 10);
        assert_eq!(stats.oldest_timestamp, Some(1000));
        assert_eq!(stats.newest_timestamp, Some(4000));
        assert_eq!(stats.time_span, Some(3000));
    }
}
