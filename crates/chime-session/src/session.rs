//! The [`Session`] trait.

use std::time::Duration;

use async_trait::async_trait;
use chime_core::{MessageRef, Payload};

use crate::context::SessionContext;
use crate::error::{SessionError, SessionResult};
use crate::registry::RegistryBuilder;

/// An interactive exchange driven by reactions and text commands.
///
/// Implementors declare their class triggers in [`declare`](Self::declare)
/// and provide the first message; [`Interaction`](crate::Interaction) runs
/// the rest.
///
/// # Example
///
/// ```rust,ignore
/// struct Counter {
///     count: u32,
/// }
///
/// fn bump<'a>(
///     counter: &'a mut Counter,
///     ctx: &'a SessionContext<Counter>,
///     _event: ReactionEvent,
/// ) -> BoxFuture<'a, SessionResult<()>> {
///     Box::pin(async move {
///         counter.count += 1;
///         ctx.edit(format!("count: {}", counter.count)).await
///     })
/// }
///
/// #[async_trait]
/// impl Session for Counter {
///     fn declare(builder: RegistryBuilder<Self>) -> RegistryBuilder<Self> {
///         builder.button("\u{2795}", bump)
///     }
///
///     async fn initial_message(&mut self) -> SessionResult<Payload> {
///         Ok("count: 0".into())
///     }
/// }
/// ```
#[async_trait]
pub trait Session: Send + Sized + 'static {
    /// Declares the class-level triggers of this type.
    ///
    /// Called once per type; the result is cached.
    fn declare(builder: RegistryBuilder<Self>) -> RegistryBuilder<Self> {
        builder
    }

    /// Runs before the initial message is sent.
    ///
    /// May adjust the instance trigger table through `ctx.triggers()`.
    async fn setup(&mut self, _ctx: &SessionContext<Self>) -> SessionResult<()> {
        Ok(())
    }

    /// Builds the first message of the session.
    async fn initial_message(&mut self) -> SessionResult<Payload>;

    /// Sends the first message and returns its identity.
    ///
    /// Override this instead of [`initial_message`](Self::initial_message)
    /// when sending needs custom behaviour.
    async fn send_initial_message(&mut self, ctx: &SessionContext<Self>) -> SessionResult<MessageRef> {
        let payload = self.initial_message().await?;
        ctx.send(payload).await
    }

    /// Called when no event arrived within `timeout`. The session ends
    /// either way; returning `Ok` makes the timeout non-fatal.
    async fn handle_timeout(
        &mut self,
        _ctx: &SessionContext<Self>,
        timeout: Duration,
    ) -> SessionResult<()> {
        Err(SessionError::Timeout(timeout))
    }
}
