//! Frame decoding and history for a hand-tracking peripheral.
//!
//! The device service streams JSON messages over a local WebSocket. This
//! crate turns them into [`tracking_types::Frame`]s and keeps the recent ones:
//!
//! # Decoding
//!
//! - [`FrameDecoder`] - builds a frame from one parsed message
//! - [`DecoderConfig`] - how unknown gestures and malformed entries are handled
//!
//! # History
//!
//! - [`FrameHistory`] - bounded, newest-first store of decoded frames
//!
//! # Connection
//!
//! - [`Controller`] - owns decoder and history, notifies [`ControllerListener`]s
//! - [`ControlMessage`] - outbound focus and gesture switch messages
//!
//! # Layer 0 Crate
//!
//! No socket handling lives here. A transport hands inbound text to
//! [`Controller::handle_text`] and sends the strings the controller returns.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tracking_stream::Controller;
//!
//! let mut controller = Controller::default();
//! controller.handle_message(&json!({
//!     "id": 42,
//!     "timestamp": 1000,
//!     "hands": [{"id": 7}],
//!     "pointables": [{"id": 1, "tool": false, "handId": 7}]
//! }))?;
//!
//! let frame = controller.frame(0);
//! assert_eq!(frame.id, 42);
//! assert_eq!(frame.finger(1).hand().id, 7);
//! # Ok::<(), tracking_stream::StreamError>(())
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

mod config;
mod controller;
mod decoder;
mod error;
mod history;
mod protocol;
mod wire;

// Re-export configuration types
pub use config::{
    ControllerConfig, DEFAULT_HISTORY_CAPACITY, DEFAULT_PORT, DecoderConfig, UnknownGesturePolicy,
};

// Re-export decoding types
pub use decoder::{FrameDecoder, is_frame_message};

// Re-export history types
pub use history::{FrameHistory, HistoryStats};

// Re-export connection types
pub use controller::{Controller, ControllerListener};
pub use protocol::{ControlMessage, Inbound};

// Re-export error types
pub use error::{Result, StreamError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        ControlMessage, Controller, ControllerConfig, ControllerListener, DecoderConfig,
        FrameDecoder, FrameHistory, StreamError, UnknownGesturePolicy,
    };
    pub use tracking_types::{Frame, Gesture, Hand, Matrix, Pointable, Vector3};
}
