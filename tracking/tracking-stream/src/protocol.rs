//! Messages exchanged with the device service, apart from frame payloads.
//!
//! The transport sends [`ControlMessage`]s as text and hands every inbound
//! text message to the controller, which sorts it with [`Inbound::classify`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decoder::is_frame_message;
use crate::error::Result;

/// Outbound control messages.
///
/// # Example
///
/// ```
/// use tracking_stream::ControlMessage;
///
/// assert_eq!(ControlMessage::focus().to_json().unwrap(), r#"{"focused":true}"#);
/// assert_eq!(
///     ControlMessage::enable_gestures(false).to_json().unwrap(),
///     r#"{"enableGestures":false}"#
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlMessage {
    /// Tells the service this client wants frames.
    Focus {
        /// Always `true` for the handshake.
        focused: bool,
    },
    /// Turns gesture recognition on or off.
    EnableGestures {
        /// Whether gestures are reported.
        #[serde(rename = "enableGestures")]
        enable_gestures: bool,
    },
}

impl ControlMessage {
    /// The one-time focus handshake.
    #[must_use]
    pub const fn focus() -> Self {
        Self::Focus { focused: true }
    }

    /// Enable or disable gesture reporting.
    #[must_use]
    pub const fn enable_gestures(enabled: bool) -> Self {
        Self::EnableGestures {
            enable_gestures: enabled,
        }
    }

    /// Serializes the message for the transport.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Json`](crate::StreamError::Json) if
    /// serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// What an inbound message is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// Protocol version announcement, sent once after connecting.
    Version(u64),
    /// A frame update.
    Frame,
    /// Anything else; ignored.
    Other,
}

impl Inbound {
    /// Sorts a parsed message.
    #[must_use]
    pub fn classify(message: &Value) -> Self {
        if is_frame_message(message) {
            return Self::Frame;
        }
        match message.get("version").and_then(Value::as_u64) {
            Some(v) => Self::Version(v),
            None => Self::Other,
        }
    }
}
