//! Handler shapes.
//!
//! Handlers are plain functions over the session value. Because the returned
//! future borrows both the session and its context, they are written as
//! `fn` items with an explicit lifetime:
//!
//! ```rust,ignore
//! fn next<'a>(
//!     pager: &'a mut Pager,
//!     ctx: &'a SessionContext<Pager>,
//!     _event: ReactionEvent,
//! ) -> BoxFuture<'a, SessionResult<()>> {
//!     Box::pin(async move { pager.turn(ctx, 1).await })
//! }
//! ```

use std::sync::Arc;

pub use futures::future::BoxFuture;

use chime_core::{IncomingMessage, ReactionEvent};

use crate::context::SessionContext;
use crate::error::SessionResult;

/// What a command handler receives: the message and its capture groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInput {
    /// The message that matched.
    pub message: IncomingMessage,
    /// Capture groups of the pattern, excluding the whole match. Groups that
    /// did not participate are `None`.
    pub groups: Vec<Option<String>>,
}

impl CommandInput {
    /// Returns capture group `index` (zero-based, whole match excluded).
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|group| group.as_deref())
    }
}

/// A type-erased reaction handler.
pub type ButtonFn<S> = Arc<
    dyn for<'a> Fn(&'a mut S, &'a SessionContext<S>, ReactionEvent) -> BoxFuture<'a, SessionResult<()>>
        + Send
        + Sync,
>;

/// A type-erased text command handler.
pub type CommandFn<S> = Arc<
    dyn for<'a> Fn(&'a mut S, &'a SessionContext<S>, CommandInput) -> BoxFuture<'a, SessionResult<()>>
        + Send
        + Sync,
>;

/// Anything usable as a reaction handler.
pub trait ButtonHandler<S>:
    for<'a> Fn(&'a mut S, &'a SessionContext<S>, ReactionEvent) -> BoxFuture<'a, SessionResult<()>>
    + Send
    + Sync
    + 'static
{
}

impl<S, F> ButtonHandler<S> for F where
    F: for<'a> Fn(&'a mut S, &'a SessionContext<S>, ReactionEvent) -> BoxFuture<'a, SessionResult<()>>
        + Send
        + Sync
        + 'static
{
}

/// Anything usable as a text command handler.
pub trait CommandHandler<S>:
    for<'a> Fn(&'a mut S, &'a SessionContext<S>, CommandInput) -> BoxFuture<'a, SessionResult<()>>
    + Send
    + Sync
    + 'static
{
}

impl<S, F> CommandHandler<S> for F where
    F: for<'a> Fn(&'a mut S, &'a SessionContext<S>, CommandInput) -> BoxFuture<'a, SessionResult<()>>
        + Send
        + Sync
        + 'static
{
}
