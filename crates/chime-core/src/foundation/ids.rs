//! Platform identifiers.
//!
//! Every platform object the session layer cares about is identified by a
//! 64-bit snowflake. Each kind of id gets its own newtype so that a channel id
//! can never be compared against a message id by accident.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw snowflake value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

snowflake! {
    /// Identifies a channel (guild text channel, DM, thread, ...).
    ChannelId
}

snowflake! {
    /// Identifies a single message.
    MessageId
}

snowflake! {
    /// Identifies a user.
    UserId
}

snowflake! {
    /// Identifies a custom (platform-uploaded) emoji.
    EmojiId
}

/// Identity of a message that has been sent: the channel it lives in and its id.
///
/// Sessions compare events against this by value, never by object identity,
/// because the platform hands out a fresh object for every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    /// Channel containing the message.
    pub channel_id: ChannelId,
    /// The message itself.
    pub message_id: MessageId,
}

impl MessageRef {
    /// Creates a message reference.
    pub fn new(channel_id: impl Into<ChannelId>, message_id: impl Into<MessageId>) -> Self {
        Self {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
        }
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel_id, self.message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&ChannelId(42)).unwrap();
        assert_eq!(json, "42");

        let id: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(id, UserId(7));
    }

    #[test]
    fn test_message_ref_display() {
        let message = MessageRef::new(1, 2);
        assert_eq!(message.to_string(), "1/2");
        assert_eq!(message.channel_id.get(), 1);
    }
}
