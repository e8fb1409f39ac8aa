//! Typed tracking data for a hand-tracking peripheral.
//!
//! This crate provides the per-frame object graph produced by the device
//! service: hands, fingers and tools, finger bones, gestures, the interaction
//! box, and the minimal geometry they are built from.
//!
//! # Layer 0 Crate
//!
//! This crate does no I/O. Decoding device messages and keeping frame history
//! live in `tracking-stream`.
//!
//! # Types
//!
//! - [`Vector3`], [`Matrix`] - geometry primitives
//! - [`Frame`] - one snapshot; owns its hands, pointables and gestures
//! - [`Hand`], [`Pointable`] (finger or tool), [`Bone`], [`Gesture`]
//! - [`InteractionBox`] - normalizes positions into a unit cube
//!
//! # Ownership
//!
//! Entities never reference other frames. A pointable's hand and a gesture's
//! hands/pointables are indices into the owning frame, exposed through the
//! borrowed views [`HandRef`], [`PointableRef`] and [`GestureRef`].
//!
//! # Relative motion
//!
//! [`Frame`] and [`Hand`] expose `rotation_axis`, `rotation_angle`,
//! `rotation_matrix`, `scale_factor` and `translation` against a reference
//! frame. See [`motion`] for the conventions and fallback values.
//!
//! # Example
//!
//! ```
//! use tracking_types::{Frame, Hand, Pointable, PointableKind, Vector3};
//!
//! let mut frame = Frame::new();
//! frame.id = 42;
//! frame.push_hand(Hand::new(7));
//!
//! let mut tool = Pointable::new(1, PointableKind::Tool);
//! tool.hand_id = Some(7);
//! frame.attach_pointable(tool);
//!
//! assert_eq!(frame.hand(7).tools().count(), 1);
//! assert_eq!(frame.tool(1).hand().id, 7);
//! assert!(!frame.hand(8).is_valid());
//! ```
//!
//! # Quality Standards
//!
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod frame;
mod gesture;
mod hand;
mod interaction_box;
mod matrix;
pub mod motion;
mod pointable;
mod vector;

pub use error::{Result, TrackingError};
pub use frame::Frame;
pub use gesture::{
    CircleGesture, Gesture, GestureKind, GestureRef, GestureState, GestureType, SwipeGesture,
    TapGesture,
};
pub use hand::{Hand, HandRef, HandType};
pub use interaction_box::InteractionBox;
pub use matrix::Matrix;
pub use motion::Motion;
pub use pointable::{
    Bone, BoneType, Finger, FingerType, Pointable, PointableKind, PointableRef, TouchZone,
};
pub use vector::Vector3;
