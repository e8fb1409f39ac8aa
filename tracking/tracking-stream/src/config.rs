//! Configuration for decoding and for the controller.
//!
//! # Presets
//!
//! - [`DecoderConfig::default()`] - abort a message on an unknown gesture type,
//!   skip individually malformed entities
//! - [`DecoderConfig::lenient()`] - skip unknown gestures too
//! - [`DecoderConfig::strict()`] - any malformed entity fails the message
//!
//! # Example
//!
//! ```
//! use tracking_stream::{ControllerConfig, DecoderConfig, UnknownGesturePolicy};
//!
//! let config = ControllerConfig::default()
//!     .with_gestures(true)
//!     .with_decoder(DecoderConfig::lenient());
//!
//! assert_eq!(config.endpoint_url(), "ws://127.0.0.1:6437/");
//! assert_eq!(config.decoder.unknown_gesture, UnknownGesturePolicy::Skip);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, StreamError};

/// Default number of frames kept in history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 60;

/// Default port of the device service's WebSocket.
pub const DEFAULT_PORT: u16 = 6437;

/// What to do with a gesture whose `type` is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownGesturePolicy {
    /// Fail the whole message; no frame is produced.
    #[default]
    Abort,
    /// Drop that gesture, log it, and keep decoding.
    Skip,
}

/// Controls how strictly device messages are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Handling of unknown gesture types.
    pub unknown_gesture: UnknownGesturePolicy,
    /// Drop a hand/pointable/gesture entry that does not match the wire
    /// schema instead of failing the message.
    pub skip_malformed: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            unknown_gesture: UnknownGesturePolicy::Abort,
            skip_malformed: true,
        }
    }
}

impl DecoderConfig {
    /// Never fail a message because of a single entity.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            unknown_gesture: UnknownGesturePolicy::Skip,
            skip_malformed: true,
        }
    }

    /// Fail on anything unexpected.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            unknown_gesture: UnknownGesturePolicy::Abort,
            skip_malformed: false,
        }
    }

    /// Set the unknown gesture policy.
    #[must_use]
    pub fn with_unknown_gesture(mut self, policy: UnknownGesturePolicy) -> Self {
        self.unknown_gesture = policy;
        self
    }
}

/// Settings for a [`Controller`](crate::Controller).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Host of the device service.
    pub host: String,
    /// Port of the device service.
    pub port: u16,
    /// Ask the device to report gestures once connected.
    pub enable_gestures: bool,
    /// Frames kept in history (at least 1).
    pub history_capacity: usize,
    /// Decoder settings.
    pub decoder: DecoderConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            enable_gestures: false,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            decoder: DecoderConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// WebSocket URL for the transport to connect to.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!("ws://{}:{}/", self.host, self.port)
    }

    /// Set the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enable or disable gesture reporting.
    #[must_use]
    pub fn with_gestures(mut self, enabled: bool) -> Self {
        self.enable_gestures = enabled;
        self
    }

    /// Set the history capacity.
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the decoder configuration.
    #[must_use]
    pub fn with_decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    /// Parses a configuration from JSON. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails
    /// [`Self::validate`].
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the endpoint is usable.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidConfig`] for an empty host or port 0.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(StreamError::invalid_config("host must not be empty"));
        }
        if self.port == 0 {
            return Err(StreamError::invalid_config("port must be non-zero"));
        }
        Ok(())
    }
}
