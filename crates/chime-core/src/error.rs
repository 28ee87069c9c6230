//! Error types shared by every transport implementation.

use thiserror::Error;

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors returned by [`Transport`](crate::Transport) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The platform rejected the request.
    #[error("http error {status}: {message}")]
    Http {
        /// Status code returned by the platform.
        status: u16,
        /// Error message returned by the platform.
        message: String,
    },

    /// The target message or channel does not exist (any more).
    #[error("not found: {0}")]
    NotFound(String),

    /// The bot lacks the permission for this operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The connection to the platform is gone.
    #[error("transport closed")]
    Closed,

    /// Anything else.
    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Creates an HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a forbidden error.
    pub fn forbidden(what: impl Into<String>) -> Self {
        Self::Forbidden(what.into())
    }

    /// Creates a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` for errors the platform reported over HTTP.
    ///
    /// Cleanup swallows these; anything else is still only logged.
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::NotFound(_) | Self::Forbidden(_))
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            TransportError::http(404, "Unknown Message").to_string(),
            "http error 404: Unknown Message"
        );
        assert_eq!(TransportError::Closed.to_string(), "transport closed");
    }

    #[test]
    fn test_http_classification() {
        assert!(TransportError::http(500, "boom").is_http());
        assert!(TransportError::not_found("message").is_http());
        assert!(TransportError::forbidden("reactions").is_http());
        assert!(!TransportError::Closed.is_http());
        assert!(!TransportError::other("x").is_http());
    }
}
