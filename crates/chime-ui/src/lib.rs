//! # Chime UI
//!
//! Ready-made interactions built on [`chime_session`].
//!
//! | Helper | Returns | Input |
//! |--------|---------|-------|
//! | [`prompt`] | the reply text | the author's next message |
//! | [`select`] / [`Selector`] | the picked value | reactions, or a number / pattern |
//! | [`confirm`] / [`Confirmation`] | `true` or `false` | reactions, or `yes` / `no` |
//! | [`Paginator`] | the paginator itself | previous / stop / next reactions |
//!
//! Selections and pagination are ordinary sessions: they run through
//! [`Interaction`](chime_session::Interaction), honour [`SessionOptions`]
//! and tear down the same way as hand-written sessions.
//!
//! [`SessionOptions`]: chime_session::SessionOptions

mod error;
mod prompt;

pub mod paginator;
pub mod select;

#[cfg(test)]
mod testing;

pub use error::{SelectError, SelectResult};
pub use paginator::{
    IterSource, NavigationEmojis, PageSource, Paginate, Paginator, StreamSource, VecSource,
    navigation,
};
pub use prompt::prompt;
pub use select::{Choice, Confirmation, Selector, confirm, select};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        Choice, PageSource, Paginator, SelectError, Selector, VecSource, confirm, prompt, select,
    };
}
