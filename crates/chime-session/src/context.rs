//! What handlers see of their session.

use std::fmt;
use std::sync::OnceLock;

use chime_core::{BoxedTransport, ChannelId, Context, MessageRef, Payload, Transport, UserId};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::error::{SessionError, SessionResult};
use crate::router::Job;
use crate::table::TriggerHandle;

/// Requests the end of a session.
///
/// Stopping is cooperative: a stop marker is queued behind the jobs already
/// waiting, and the loop ends when it reaches the marker.
pub struct StopHandle<S> {
    queue: UnboundedSender<Job<S>>,
}

impl<S> StopHandle<S> {
    pub(crate) fn new(queue: UnboundedSender<Job<S>>) -> Self {
        Self { queue }
    }

    /// Queues the stop marker. Returns `false` if the session already ended.
    pub fn stop(&self) -> bool {
        self.queue.send(Job::Stop).is_ok()
    }
}

impl<S> Clone for StopHandle<S> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
        }
    }
}

impl<S> fmt::Debug for StopHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopHandle")
            .field("closed", &self.queue.is_closed())
            .finish()
    }
}

/// The context handed to session hooks and handlers.
pub struct SessionContext<S> {
    invocation: Context,
    message: OnceLock<MessageRef>,
    triggers: TriggerHandle<S>,
    stop: StopHandle<S>,
}

impl<S> SessionContext<S> {
    pub(crate) fn new(invocation: Context, triggers: TriggerHandle<S>, stop: StopHandle<S>) -> Self {
        Self {
            invocation,
            message: OnceLock::new(),
            triggers,
            stop,
        }
    }

    pub(crate) fn bind(&self, message: MessageRef) {
        if self.message.set(message).is_err() {
            debug!(%message, "Session message already bound");
        }
    }

    /// The invocation this session was started from.
    pub fn invocation(&self) -> &Context {
        &self.invocation
    }

    /// The platform transport.
    pub fn transport(&self) -> &BoxedTransport {
        self.invocation.transport()
    }

    /// Channel the session runs in.
    pub fn channel_id(&self) -> ChannelId {
        self.invocation.channel_id()
    }

    /// User who started the session.
    pub fn author_id(&self) -> UserId {
        self.invocation.author_id()
    }

    /// The session message, once it has been sent.
    pub fn message(&self) -> Option<MessageRef> {
        self.message.get().copied()
    }

    /// This instance's trigger table.
    pub fn triggers(&self) -> &TriggerHandle<S> {
        &self.triggers
    }

    /// Asks the session to stop after the jobs already queued.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// A handle that can stop the session from elsewhere.
    pub fn stop_handle(&self) -> StopHandle<S> {
        self.stop.clone()
    }

    /// Sends a new message into the session channel.
    pub async fn send(&self, payload: impl Into<Payload>) -> SessionResult<MessageRef> {
        Ok(self
            .transport()
            .send(self.channel_id(), &payload.into())
            .await?)
    }

    /// Replaces the content of the session message.
    pub async fn edit(&self, payload: impl Into<Payload>) -> SessionResult<()> {
        let message = self.message().ok_or(SessionError::NotStarted)?;
        Ok(self.transport().edit(message, &payload.into()).await?)
    }
}

impl<S> fmt::Debug for SessionContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("channel_id", &self.channel_id())
            .field("author_id", &self.author_id())
            .field("message", &self.message())
            .finish_non_exhaustive()
    }
}
