//! The outbound side of the platform.
//!
//! A [`Transport`] is whatever can post, edit and delete messages and manage
//! reactions on them. The session layer never talks to the network itself;
//! adapters implement this trait and sessions call into it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportResult;
use crate::foundation::{ChannelId, EmojiKey, MessageRef, Payload};

/// Outbound platform operations used by sessions.
///
/// # Example
///
/// ```rust,ignore
/// use chime_core::{ChannelId, EmojiKey, MessageRef, Payload, Transport, TransportResult};
///
/// struct LogTransport;
///
/// #[async_trait::async_trait]
/// impl Transport for LogTransport {
///     async fn send(&self, channel: ChannelId, payload: &Payload) -> TransportResult<MessageRef> {
///         println!("{channel}: {:?}", payload.content);
///         Ok(MessageRef::new(channel, 1))
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Posts a new message and returns its identity.
    async fn send(&self, channel: ChannelId, payload: &Payload) -> TransportResult<MessageRef>;

    /// Replaces the content of an existing message.
    async fn edit(&self, message: MessageRef, payload: &Payload) -> TransportResult<()>;

    /// Deletes a message.
    async fn delete(&self, message: MessageRef) -> TransportResult<()>;

    /// Adds a reaction from the bot to a message.
    async fn add_reaction(&self, message: MessageRef, emoji: &EmojiKey) -> TransportResult<()>;

    /// Removes every reaction from a message.
    async fn clear_reactions(&self, message: MessageRef) -> TransportResult<()>;

    /// Whether the bot may add reactions in `channel`.
    ///
    /// Used to decide between reaction buttons and text input when a caller
    /// leaves the choice open.
    fn can_add_reactions(&self, _channel: ChannelId) -> bool {
        true
    }
}

/// A shared, type-erased transport.
pub type BoxedTransport = Arc<dyn Transport>;
