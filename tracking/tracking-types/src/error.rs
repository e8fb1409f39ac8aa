//! Error types for tracking data.

use thiserror::Error;

/// Errors that can occur when constructing tracking data.
///
/// Degenerate geometry at query time never errors; these cover checked
/// constructors and code conversions only.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Geometry that cannot describe a real volume or direction.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Numeric code outside a known enumeration.
    #[error("unknown {kind} code: {code}")]
    UnknownCode {
        /// Which enumeration was being decoded.
        kind: &'static str,
        /// The offending code.
        code: i64,
    },
}

impl TrackingError {
    /// Creates an invalid geometry error.
    #[must_use]
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry(reason.into())
    }

    /// Creates an unknown code error.
    #[must_use]
    pub const fn unknown_code(kind: &'static str, code: i64) -> Self {
        Self::UnknownCode { kind, code }
    }
}

/// Result type for tracking data operations.
pub type Result<T> = std::result::Result<T, TrackingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_geometry() {
        let err = TrackingError::invalid_geometry("zero width");
        let msg = format!("{err}");
        assert!(msg.contains("invalid geometry"));
        assert!(msg.contains("zero width"));
    }

    #[test]
    fn error_unknown_code() {
        let err = TrackingError::unknown_code("finger type", 7);
        let msg = format!("{err}");
        assert!(msg.contains("finger type"));
        assert!(msg.contains('7'));
    }
}
