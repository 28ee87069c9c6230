//! # Chime Core
//!
//! The platform model and contracts of the Chime interaction layer.
//!
//! This crate provides the building blocks every other Chime crate relies
//! on. It knows nothing about sessions; it only describes the platform.
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! Plain data:
//! - **Identifiers**: [`ChannelId`], [`MessageId`], [`UserId`], [`EmojiId`], [`MessageRef`]
//! - **Emoji**: canonical button keys ([`EmojiKey`]) and reaction payloads ([`ReactionEmoji`])
//! - **Events**: [`IncomingMessage`], [`ReactionEvent`], [`MessageDeleted`], [`GatewayEvent`]
//! - **Payloads**: outbound message content ([`Payload`], [`Embed`], [`Attachment`])
//!
//! ### Integration Layer
//!
//! Contracts with the platform:
//! - **Outbound**: [`Transport`]
//! - **Inbound**: [`EventFeed`], [`Listener`] and the in-process [`EventHub`]
//! - **Invocation**: [`Context`]
//!
//! ## Event Flow
//!
//! ```text
//! ┌─────────────┐     ┌──────────┐     ┌───────────┐
//! │   Adapter   │────▶│ EventHub │────▶│ Listener  │
//! │  (gateway)  │     │  (core)  │────▶│ Listener  │
//! └─────────────┘     └──────────┘     └───────────┘
//!        ▲                                   │
//!        └──────────── Transport ◀───────────┘
//! ```

// Architectural layers
pub mod error;
pub mod foundation;
pub mod integration;

#[cfg(feature = "testing")]
pub mod testing;

// Re-export foundation types
pub use foundation::{
    Attachment, ChannelId, Embed, EmbedField, EmojiId, EmojiKey, EventKind, GatewayEvent,
    IncomingMessage, MessageDeleted, MessageId, MessageRef, Payload, ReactionEmoji,
    ReactionEvent, UserId,
};

// Re-export integration types
pub use integration::{
    BoxedFeed, BoxedTransport, Context, EventFeed, EventHub, Listener, ListenerId, Transport,
};

pub use error::{TransportError, TransportResult};

/// Prelude for common imports.
pub mod prelude {
    pub use super::error::{TransportError, TransportResult};
    pub use super::foundation::*;
    pub use super::integration::{Context, EventFeed, EventHub, Listener, Transport};
}
