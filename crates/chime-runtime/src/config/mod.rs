//! Configuration for chime applications.
//!
//! Settings are layered from defaults, TOML (or YAML) files and `CHIME_*`
//! environment variables, then checked by [`validate_config`].

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    ChimeConfig, ConfirmConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, PaginatorConfig,
    SessionConfig, SpanEventConfig,
};
pub use validation::validate_config;
