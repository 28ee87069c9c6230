//! Platform events consumed by sessions.
//!
//! Only the four raw events an interactive session reacts to are modelled:
//!
//! | Kind | Type | Fired when |
//! |------|------|------------|
//! | [`EventKind::MessageCreate`] | [`IncomingMessage`] | a user posts a message |
//! | [`EventKind::ReactionAdd`] | [`ReactionEvent`] | a user presses a reaction |
//! | [`EventKind::ReactionRemove`] | [`ReactionEvent`] | a user releases a reaction |
//! | [`EventKind::MessageDelete`] | [`MessageDeleted`] | a message is deleted |
//!
//! Adapters translate their gateway payloads into [`GatewayEvent`]s and hand
//! them to an [`EventHub`](crate::EventHub).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::emoji::ReactionEmoji;
use super::ids::{ChannelId, MessageId, UserId};

/// The four event kinds a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A message was created.
    MessageCreate,
    /// A reaction was added to a message.
    ReactionAdd,
    /// A reaction was removed from a message.
    ReactionRemove,
    /// A message was deleted.
    MessageDelete,
}

impl EventKind {
    /// All kinds, in the order sessions subscribe to them.
    pub const ALL: [EventKind; 4] = [
        EventKind::MessageCreate,
        EventKind::ReactionAdd,
        EventKind::ReactionRemove,
        EventKind::MessageDelete,
    ];

    /// Returns the event name as used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MessageCreate => "message_create",
            Self::ReactionAdd => "reaction_add",
            Self::ReactionRemove => "reaction_remove",
            Self::MessageDelete => "message_delete",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message posted by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Id of the new message.
    pub message_id: MessageId,
    /// Channel the message was posted in.
    pub channel_id: ChannelId,
    /// Author of the message.
    pub author_id: UserId,
    /// Raw text content.
    #[serde(default)]
    pub content: String,
}

impl IncomingMessage {
    /// Creates a message event.
    pub fn new(
        message_id: impl Into<MessageId>,
        channel_id: impl Into<ChannelId>,
        author_id: impl Into<UserId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            channel_id: channel_id.into(),
            author_id: author_id.into(),
            content: content.into(),
        }
    }
}

/// A reaction being pressed or released on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// The message that was reacted on.
    pub message_id: MessageId,
    /// Channel containing the message.
    pub channel_id: ChannelId,
    /// The user who reacted.
    pub user_id: UserId,
    /// The emoji used.
    pub emoji: ReactionEmoji,
}

impl ReactionEvent {
    /// Creates a reaction event.
    pub fn new(
        message_id: impl Into<MessageId>,
        channel_id: impl Into<ChannelId>,
        user_id: impl Into<UserId>,
        emoji: ReactionEmoji,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            channel_id: channel_id.into(),
            user_id: user_id.into(),
            emoji,
        }
    }
}

/// A message was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDeleted {
    /// Id of the deleted message.
    pub message_id: MessageId,
    /// Channel the message was in.
    pub channel_id: ChannelId,
}

impl MessageDeleted {
    /// Creates a deletion event.
    pub fn new(message_id: impl Into<MessageId>, channel_id: impl Into<ChannelId>) -> Self {
        Self {
            message_id: message_id.into(),
            channel_id: channel_id.into(),
        }
    }
}

/// Any raw event delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// See [`IncomingMessage`].
    MessageCreate(IncomingMessage),
    /// See [`ReactionEvent`].
    ReactionAdd(ReactionEvent),
    /// See [`ReactionEvent`].
    ReactionRemove(ReactionEvent),
    /// See [`MessageDeleted`].
    MessageDelete(MessageDeleted),
}

impl GatewayEvent {
    /// Returns the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MessageCreate(_) => EventKind::MessageCreate,
            Self::ReactionAdd(_) => EventKind::ReactionAdd,
            Self::ReactionRemove(_) => EventKind::ReactionRemove,
            Self::MessageDelete(_) => EventKind::MessageDelete,
        }
    }

    /// Returns the channel the event happened in.
    pub fn channel_id(&self) -> ChannelId {
        match self {
            Self::MessageCreate(e) => e.channel_id,
            Self::ReactionAdd(e) | Self::ReactionRemove(e) => e.channel_id,
            Self::MessageDelete(e) => e.channel_id,
        }
    }
}

impl From<IncomingMessage> for GatewayEvent {
    fn from(event: IncomingMessage) -> Self {
        Self::MessageCreate(event)
    }
}

impl From<MessageDeleted> for GatewayEvent {
    fn from(event: MessageDeleted) -> Self {
        Self::MessageDelete(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_event_kind() {
        let event = GatewayEvent::from(IncomingMessage::new(1, 2, 3, "hi"));
        assert_eq!(event.kind(), EventKind::MessageCreate);
        assert_eq!(event.channel_id(), ChannelId(2));

        let event = GatewayEvent::ReactionRemove(ReactionEvent::new(
            1,
            2,
            3,
            ReactionEmoji::unicode("\u{2705}"),
        ));
        assert_eq!(event.kind(), EventKind::ReactionRemove);
        assert_eq!(event.kind().to_string(), "reaction_remove");
    }

    #[test]
    fn test_gateway_event_from_json() {
        let json = r#"{
            "type": "reaction_add",
            "message_id": 10,
            "channel_id": 20,
            "user_id": 30,
            "emoji": { "id": 40, "name": "blob" }
        }"#;
        let event: GatewayEvent = serde_json::from_str(json).unwrap();
        let GatewayEvent::ReactionAdd(reaction) = event else {
            panic!("expected a reaction event");
        };
        assert_eq!(reaction.user_id, UserId(30));
        assert!(!reaction.emoji.animated);
    }
}
