//! Invocation context.

use std::fmt;
use std::sync::Arc;

use crate::error::TransportResult;
use crate::foundation::{ChannelId, MessageRef, Payload, UserId};
use crate::integration::feed::{BoxedFeed, EventFeed};
use crate::integration::transport::{BoxedTransport, Transport};

/// Where a session was invoked from: who asked, in which channel, and the
/// platform handles needed to answer.
#[derive(Clone)]
pub struct Context {
    transport: BoxedTransport,
    feed: BoxedFeed,
    channel_id: ChannelId,
    author_id: UserId,
}

impl Context {
    /// Creates a context for `author` in `channel`.
    pub fn new(
        transport: BoxedTransport,
        feed: BoxedFeed,
        channel_id: impl Into<ChannelId>,
        author_id: impl Into<UserId>,
    ) -> Self {
        Self {
            transport,
            feed,
            channel_id: channel_id.into(),
            author_id: author_id.into(),
        }
    }

    /// Returns the transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Returns the event feed.
    pub fn feed(&self) -> &Arc<dyn EventFeed> {
        &self.feed
    }

    /// Channel the invocation happened in.
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// User who invoked.
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Returns a copy of this context for another author.
    pub fn with_author(&self, author_id: impl Into<UserId>) -> Self {
        Self {
            author_id: author_id.into(),
            ..self.clone()
        }
    }

    /// Sends a message into the invocation channel.
    pub async fn send(&self, payload: impl Into<Payload>) -> TransportResult<MessageRef> {
        self.transport.send(self.channel_id, &payload.into()).await
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("channel_id", &self.channel_id)
            .field("author_id", &self.author_id)
            .finish_non_exhaustive()
    }
}
