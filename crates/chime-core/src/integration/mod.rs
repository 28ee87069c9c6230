//! Integration layer - Contracts with the platform.
//!
//! This module contains the interfaces sessions use to reach the outside:
//! - [`Transport`] for outbound operations
//! - [`EventFeed`] and [`Listener`] for inbound events
//! - [`EventHub`], an in-process feed
//! - [`Context`], the invocation a session starts from

pub mod context;
pub mod feed;
pub mod transport;

pub use context::Context;
pub use feed::{BoxedFeed, EventFeed, EventHub, Listener, ListenerId};
pub use transport::{BoxedTransport, Transport};
