//! Chime Runtime - configuration and logging for chime applications.
//!
//! This crate provides:
//! - Layered configuration (`ChimeConfig`) from defaults, config files and
//!   `CHIME_*` environment variables
//! - Conversion of that configuration into session options, paginator
//!   buttons and confirmation emojis
//! - Logging setup on top of `tracing-subscriber`
//!
//! ```ignore
//! use chime_runtime::{config::load_config, logging};
//! use chime_ui::Paginator;
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//!
//! let paginator = Paginator::chunked(lines, 10).with_emojis(config.paginator.to_emojis());
//! paginator.run(&ctx, config.session.to_options()).await?;
//! ```

pub mod config;
pub mod logging;

pub use config::{
    ChimeConfig, ConfigError, ConfigLoader, ConfigResult, LoggingConfig, Profile, load_config,
    load_config_from_file,
};
pub use logging::{LoggingBuilder, SpanEvents};

// Re-export tracing for use by applications
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
