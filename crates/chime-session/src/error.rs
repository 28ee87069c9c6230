//! Error types for the session core.

use std::time::Duration;

use chime_core::TransportError;
use thiserror::Error;

/// A trigger could not be registered.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// A command pattern is not a valid regular expression.
    #[error("invalid command pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why it was rejected.
        #[source]
        source: regex::Error,
    },
}

/// Signals that a page index does not exist.
///
/// Page sources return this for out-of-range indices; the paginator treats
/// it as "stay where you are".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("page {index} does not exist")]
pub struct InvalidPage {
    /// The requested zero-based index.
    pub index: usize,
}

/// Errors that end a session run.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No event arrived within the configured window.
    #[error("the session timed out after {0:?} while waiting for a response")]
    Timeout(Duration),

    /// A platform call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A trigger table was misconfigured.
    #[error(transparent)]
    Trigger(#[from] TriggerError),

    /// `start` was called on a session that already ran.
    #[error("session has already been started")]
    AlreadyStarted,

    /// The session message is needed but has not been sent yet.
    #[error("session message has not been sent yet")]
    NotStarted,

    /// A page source had nothing to show.
    #[error(transparent)]
    InvalidPage(#[from] InvalidPage),

    /// A handler gave up.
    #[error("handler failed: {0}")]
    Handler(String),
}

impl SessionError {
    /// Creates a handler error.
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }

    /// Returns `true` for [`SessionError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for trigger registration.
pub type TriggerResult<T> = Result<T, TriggerError>;
