//! Message handling for one connection to the device service.
//!
//! The [`Controller`] owns everything a connection accumulates: decoder,
//! frame history, protocol version and registered listeners. It performs no
//! I/O. A transport feeds it inbound text with [`Controller::handle_text`]
//! and sends whatever strings it returns from [`Controller::connect`] and
//! the `*_message` helpers.

use serde_json::Value;
use tracing::{debug, trace, warn};
use tracking_types::Frame;

use crate::config::ControllerConfig;
use crate::decoder::FrameDecoder;
use crate::error::Result;
use crate::history::FrameHistory;
use crate::protocol::{ControlMessage, Inbound};

/// Receives controller notifications. Every method defaults to a no-op.
pub trait ControllerListener {
    /// The service announced its protocol version.
    fn on_init(&mut self, _version: u64) {}

    /// The transport connected.
    fn on_connect(&mut self) {}

    /// The transport disconnected.
    fn on_disconnect(&mut self) {}

    /// The controller is shutting down.
    fn on_exit(&mut self) {}

    /// A frame was decoded and stored as the newest history entry.
    fn on_frame(&mut self, _frame: &Frame) {}
}

/// Turns device messages into frames and notifies listeners.
///
/// # Example
///
/// ```
/// use tracking_stream::{Controller, ControllerConfig};
///
/// let mut controller = Controller::new(ControllerConfig::default().with_gestures(true))?;
/// let outbound = controller.connect()?;
/// assert_eq!(outbound, [r#"{"focused":true}"#, r#"{"enableGestures":true}"#]);
///
/// controller.handle_text(r#"{"version": 6}"#)?;
/// assert_eq!(controller.protocol_version(), Some(6));
///
/// let frame = controller.handle_text(r#"{"id": 1, "timestamp": 10}"#)?;
/// assert_eq!(frame.map(|f| f.id), Some(1));
/// assert_eq!(controller.frame(0).id, 1);
/// # Ok::<(), tracking_stream::StreamError>(())
/// ```
pub struct Controller {
    config: ControllerConfig,
    decoder: FrameDecoder,
    history: FrameHistory,
    listeners: Vec<Box<dyn ControllerListener>>,
    protocol_version: Option<u64>,
    connected: bool,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.config)
            .field("history_len", &self.history.len())
            .field("listeners", &self.listeners.len())
            .field("protocol_version", &self.protocol_version)
            .field("connected", &self.connected)
            .finish_non_exhaustive()
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::with_config(ControllerConfig::default())
    }
}

impl Controller {
    /// Creates a controller after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidConfig`](crate::StreamError::InvalidConfig)
    /// if the configuration is rejected by [`ControllerConfig::validate`].
    pub fn new(config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: ControllerConfig) -> Self {
        Self {
            decoder: FrameDecoder::new(config.decoder),
            history: FrameHistory::new(config.history_capacity),
            config,
            listeners: Vec::new(),
            protocol_version: None,
            connected: false,
        }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Registers a listener. Listeners are notified in registration order.
    pub fn add_listener(&mut self, listener: Box<dyn ControllerListener>) {
        debug!(total = self.listeners.len() + 1, "registering listener");
        self.listeners.push(listener);
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Marks the transport connected and notifies listeners.
    ///
    /// Returns the messages the transport must send right away: the focus
    /// handshake, then the gesture switch when gestures are enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if a control message fails to serialize.
    pub fn connect(&mut self) -> Result<Vec<String>> {
        let mut outbound = vec![self.focus_message()?];
        if self.config.enable_gestures {
            outbound.push(self.enable_gestures_message(true)?);
        }
        self.connected = true;
        debug!(endpoint = %self.config.endpoint_url(), "connected");
        for listener in &mut self.listeners {
            listener.on_connect();
        }
        Ok(outbound)
    }

    /// Marks the transport disconnected and notifies listeners.
    ///
    /// Does nothing if not connected.
    pub fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        self.connected = false;
        self.protocol_version = None;
        debug!("disconnected");
        for listener in &mut self.listeners {
            listener.on_disconnect();
        }
    }

    /// Disconnects if needed, then notifies listeners of shutdown.
    pub fn exit(&mut self) {
        self.disconnect();
        for listener in &mut self.listeners {
            listener.on_exit();
        }
    }

    /// Whether [`Self::connect`] was called without a later disconnect.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Protocol version announced by the service, once received.
    #[must_use]
    pub const fn protocol_version(&self) -> Option<u64> {
        self.protocol_version
    }

    /// Parses and handles one inbound text message.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Json`](crate::StreamError::Json) if `text` is
    /// not JSON, plus everything [`Self::handle_message`] returns.
    pub fn handle_text(&mut self, text: &str) -> Result<Option<&Frame>> {
        let message: Value = serde_json::from_str(text)?;
        self.handle_message(&message)
    }

    /// Handles one parsed inbound message.
    ///
    /// A version announcement is recorded and fires `on_init`. A frame update
    /// is decoded, stored as the newest history entry, and delivered to
    /// `on_frame`; the stored frame is returned. Anything else is ignored.
    ///
    /// # Errors
    ///
    /// Returns the decoder's error if the frame cannot be decoded. Nothing is
    /// stored or delivered in that case.
    pub fn handle_message(&mut self, message: &Value) -> Result<Option<&Frame>> {
        match Inbound::classify(message) {
            Inbound::Version(version) => {
                debug!(version, "protocol version");
                self.protocol_version = Some(version);
                for listener in &mut self.listeners {
                    listener.on_init(version);
                }
                Ok(None)
            }
            Inbound::Other => {
                trace!("ignoring message");
                Ok(None)
            }
            Inbound::Frame => {
                let Some(frame) = self.decoder.decode(message)? else {
                    return Ok(None);
                };
                if !frame.is_valid() {
                    warn!(timestamp = frame.timestamp, "dropping frame without id");
                    return Ok(None);
                }
                self.history.push(frame);
                let latest = self.history.get(0);
                for listener in &mut self.listeners {
                    listener.on_frame(latest);
                }
                Ok(Some(latest))
            }
        }
    }

    /// The frame `offset` messages ago (0 is the newest).
    ///
    /// Returns the invalid frame sentinel when out of range.
    #[must_use]
    pub fn frame(&self, offset: usize) -> &Frame {
        self.history.get(offset)
    }

    /// The frame history.
    #[must_use]
    pub const fn history(&self) -> &FrameHistory {
        &self.history
    }

    /// Serialized focus handshake.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn focus_message(&self) -> Result<String> {
        ControlMessage::focus().to_json()
    }

    /// Serialized gesture switch. Also records the setting in the
    /// configuration so a reconnect repeats it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn enable_gestures_message(&mut self, enabled: bool) -> Result<String> {
        self.config.enable_gestures = enabled;
        ControlMessage::enable_gestures(enabled).to_json()
    }
}
