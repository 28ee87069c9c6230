//! # Chime
//!
//! Synchronous-feeling interactive sessions for chat bots.
//!
//! ## Overview
//!
//! A command handler usually answers once and is done. Chime lets it hold a
//! conversation instead: send a message, react to button presses and replies
//! on that message, and return a result when the user is finished, all from
//! a single `async fn`.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐     ┌──────────┐     ┌─────────────────────────────────────┐
//! │  Adapter  │────▶│ EventHub │────▶│ Session "pages"  (router + loop)    │──▶ Transport
//! │ (gateway) │     │          │────▶│ Session "select" (router + loop)    │──▶ Transport
//! └───────────┘     └──────────┘     └─────────────────────────────────────┘
//! ```
//!
//! - **Core** ([`core`]): ids, emoji keys, events, payloads and the
//!   `Transport` / `EventFeed` contracts
//! - **Session** ([`session`]): trigger tables, the event router and the
//!   session loop
//! - **UI** ([`ui`]): prompts, selectors, confirmations and paginators
//! - **Runtime** ([`runtime`]): configuration and logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chime::prelude::*;
//!
//! async fn on_pick(ctx: Context) -> anyhow::Result<()> {
//!     let choice = select(
//!         &ctx,
//!         "Pick a colour",
//!         ["red", "green", "blue"],
//!         None,
//!         SessionOptions::new().timeout(Duration::from_secs(60)),
//!     )
//!     .await?;
//!
//!     if let Some(colour) = choice {
//!         ctx.send(format!("You picked {colour}")).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output
//! - `testing`: the recording transport from `chime_core::testing`

pub use chime_core as core;
pub use chime_runtime as runtime;
pub use chime_session as session;
pub use chime_ui as ui;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use chime::prelude::*;
/// ```
pub mod prelude {
    pub use std::time::Duration;

    // Platform model
    pub use chime_core::{
        ChannelId, Context, Embed, EmojiKey, EventHub, GatewayEvent, MessageRef, Payload,
        Transport, UserId,
    };

    // Writing sessions
    pub use chime_session::{
        AllowedUsers, BoxFuture, CommandInput, Interaction, RegistryBuilder, Session,
        SessionContext, SessionError, SessionOptions, SessionResult,
    };

    // Ready-made interactions
    pub use chime_ui::{
        Choice, Confirmation, PageSource, Paginator, SelectError, Selector, VecSource, confirm,
        prompt, select,
    };

    // Configuration and logging
    pub use chime_runtime::{ChimeConfig, ConfigLoader, LoggingBuilder};
}
