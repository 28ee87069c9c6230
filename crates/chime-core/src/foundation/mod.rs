//! Foundation layer - Platform data model.
//!
//! This module contains the plain data the session layer works with:
//! - Snowflake identifiers for channels, messages, users and emoji
//! - Canonical emoji keys used to address buttons
//! - The four raw events sessions listen to
//! - Outbound message payloads

pub mod emoji;
pub mod event;
pub mod ids;
pub mod payload;

pub use emoji::{EmojiKey, ReactionEmoji};
pub use event::{EventKind, GatewayEvent, IncomingMessage, MessageDeleted, ReactionEvent};
pub use ids::{ChannelId, EmojiId, MessageId, MessageRef, UserId};
pub use payload::{Attachment, Embed, EmbedField, Payload};
