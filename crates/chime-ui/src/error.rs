//! Error types for the UI helpers.

use chime_session::SessionError;
use thiserror::Error;

/// Errors from building or running a selection.
#[derive(Debug, Error)]
pub enum SelectError {
    /// There is nothing to choose from.
    #[error("a selection needs at least one choice")]
    Empty,

    /// Some choices have buttons and some do not.
    #[error("either all choices must have a button or none of them")]
    MixedButtons,

    /// A choice pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}' for choice '{label}': {source}")]
    InvalidPattern {
        /// Label of the offending choice.
        label: String,
        /// The rejected pattern.
        pattern: String,
        /// Why it was rejected.
        #[source]
        source: regex::Error,
    },

    /// The selection session failed while running.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Result type for selections.
pub type SelectResult<T> = Result<T, SelectError>;
