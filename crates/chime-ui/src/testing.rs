//! Shared fixtures for the crate's tests.

use std::sync::Arc;

use chime_core::testing::RecordingTransport;
use chime_core::{
    Context, EmojiKey, EventHub, GatewayEvent, IncomingMessage, MessageDeleted, MessageRef,
    ReactionEmoji, ReactionEvent,
};

pub(crate) const CHANNEL: u64 = 10;
pub(crate) const AUTHOR: u64 = 1;

/// A recording transport and an event hub wired into a context.
pub(crate) struct Harness {
    pub(crate) transport: Arc<RecordingTransport>,
    pub(crate) hub: Arc<EventHub>,
    pub(crate) ctx: Context,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_transport(RecordingTransport::new())
    }

    /// A harness whose channel does not allow reactions.
    pub(crate) fn text_only() -> Self {
        Self::with_transport(RecordingTransport::without_reactions())
    }

    fn with_transport(transport: RecordingTransport) -> Self {
        let transport = Arc::new(transport);
        let hub = Arc::new(EventHub::new());
        let ctx = Context::new(transport.clone(), hub.clone(), CHANNEL, AUTHOR);
        Self {
            transport,
            hub,
            ctx,
        }
    }

    /// Waits until at least `listeners` listeners are subscribed.
    pub(crate) async fn subscribed(&self, listeners: usize) {
        while self.hub.len() < listeners {
            tokio::task::yield_now().await;
        }
    }

    /// Waits until a session has sent its message and subscribed.
    pub(crate) async fn started(&self) -> MessageRef {
        loop {
            if self.hub.len() >= 4 {
                if let Some(message) = self.transport.last_message() {
                    return message;
                }
            }
            tokio::task::yield_now().await;
        }
    }

    pub(crate) fn say(&self, author: u64, content: &str) {
        self.say_in(CHANNEL, author, content);
    }

    pub(crate) fn say_in(&self, channel: u64, author: u64, content: &str) {
        self.hub
            .dispatch(&IncomingMessage::new(900, channel, author, content).into());
    }

    pub(crate) fn react(&self, message: MessageRef, user: u64, emoji: &str) {
        let emoji = match EmojiKey::parse(emoji) {
            EmojiKey::Custom(id) => ReactionEmoji::custom(id, "custom"),
            EmojiKey::Unicode(text) => ReactionEmoji::unicode(text),
        };
        let event = ReactionEvent::new(message.message_id, message.channel_id, user, emoji);
        self.hub.dispatch(&GatewayEvent::ReactionAdd(event));
    }

    pub(crate) fn delete(&self, message: MessageRef) {
        self.hub
            .dispatch(&MessageDeleted::new(message.message_id, message.channel_id).into());
    }
}
