//! Error types for tracking-stream crate.

use thiserror::Error;

/// Errors that can occur while decoding device messages or configuring a
/// controller.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The message is not valid JSON or does not match the wire schema.
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// A gesture carried a `type` outside the known set.
    #[error("unknown gesture type: {0}")]
    UnknownGestureType(String),

    /// One hand, pointable or gesture entry could not be decoded.
    #[error("malformed {kind} at index {index}: {reason}")]
    MalformedEntity {
        /// Entity kind (`hand`, `pointable`, `gesture`).
        kind: &'static str,
        /// Position in the message's array.
        index: usize,
        /// Why decoding failed.
        reason: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StreamError {
    /// Creates an unknown gesture type error.
    #[must_use]
    pub fn unknown_gesture_type(name: impl Into<String>) -> Self {
        Self::UnknownGestureType(name.into())
    }

    /// Creates a malformed entity error.
    #[must_use]
    pub fn malformed(kind: &'static str, index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedEntity {
            kind,
            index,
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

/// Result type for tracking-stream operations.
pub type Result<T> = std::result::Result<T, StreamError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn error_unknown_gesture_type() {
        let err = StreamError::unknown_gesture_type("pinch");
        assert!(err.to_string().contains("unknown gesture type"));
        assert!(err.to_string().contains("pinch"));
    }

    #[test]
    fn error_malformed() {
        let err = StreamError::malformed("hand", 2, "missing id");
        let msg = err.to_string();
        assert!(msg.contains("hand"));
        assert!(msg.contains('2'));
        assert!(msg.contains("missing id"));
    }

    #[test]
    fn error_invalid_config() {
        let err = StreamError::invalid_config("port must be non-zero");
        assert!(err.to_string().contains("invalid configuration"));
    }

    #[test]
    fn error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StreamError = json_err.into();
        assert!(err.to_string().contains("malformed message"));
    }
}
