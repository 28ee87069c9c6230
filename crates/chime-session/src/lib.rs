//! # Chime Session
//!
//! The session dispatch core.
//!
//! A session ties one sent message to a queue of jobs. Platform events are
//! matched against the session's triggers by an event router and queued;
//! a single loop runs the queued handlers one after another until the
//! session stops, times out or a handler fails. Teardown always runs.
//!
//! ## Components
//!
//! - **Trigger Registry** ([`Registry`], [`RegistryBuilder`]): class-level
//!   button, unbutton and command tables, merged from layers and cached per type
//! - **Instance Trigger Table** ([`TriggerTable`], [`TriggerHandle`]): a
//!   copy-on-write overlay for per-instance changes
//! - **Event Router**: filters raw events and enqueues jobs
//! - **Session Loop and Lifecycle** ([`Interaction`]): sequential execution,
//!   timeouts and guaranteed teardown
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────┐     ┌────────┐     ┌───────┐     ┌──────────────┐
//! │ EventHub │────▶│ Router │────▶│ Queue │────▶│ Session loop │
//! └──────────┘     └────────┘     └───────┘     └──────────────┘
//!                      │ filter + match              │ one job at a time
//!                      ▼                             ▼
//!                 TriggerTable                   handlers
//! ```

mod context;
mod error;
mod handler;
mod interaction;
mod registry;
mod router;
mod session;
mod table;
mod users;

#[cfg(test)]
mod testing;

pub use context::{SessionContext, StopHandle};
pub use error::{InvalidPage, SessionError, SessionResult, TriggerError, TriggerResult};
pub use handler::{BoxFuture, ButtonFn, ButtonHandler, CommandFn, CommandHandler, CommandInput};
pub use interaction::{Interaction, Phase};
pub use registry::{Registry, RegistryBuilder};
pub use session::Session;
pub use table::{TableKind, TriggerHandle, TriggerTable};
pub use users::{AllowedUsers, SessionOptions};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        AllowedUsers, BoxFuture, CommandInput, Interaction, RegistryBuilder, Session,
        SessionContext, SessionError, SessionOptions, SessionResult,
    };
}
