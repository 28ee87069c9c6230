//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chime_session::{AllowedUsers, SessionOptions};
use chime_ui::NavigationEmojis;
use chime_ui::paginator::{NEXT_EMOJI, PREVIOUS_EMOJI, STOP_EMOJI};
use chime_ui::select::DEFAULT_CONFIRM_EMOJIS;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChimeConfig {
    /// Logging setup.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Defaults for every session.
    #[serde(default)]
    pub session: SessionConfig,

    /// Paginator buttons.
    #[serde(default)]
    pub paginator: PaginatorConfig,

    /// Confirmation buttons.
    #[serde(default)]
    pub confirm: ConfirmConfig,
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Names accepted in configuration files.
    pub const NAMES: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    #[cfg(feature = "json-log")]
    Json,
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global level.
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Include thread ids.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include file names and line numbers.
    #[serde(default)]
    pub file_location: bool,

    /// Log file for [`LogOutput::File`].
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Per-target levels, e.g. `chime_session = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            span_events: SpanEventConfig::default(),
            thread_ids: false,
            file_location: false,
            file_path: None,
            filters: HashMap::new(),
        }
    }
}

// =============================================================================
// Sessions
// =============================================================================

/// Defaults applied to every session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds to wait for the next event. Absent means wait forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Delete the session message when done instead of clearing reactions.
    #[serde(default)]
    pub delete_after: bool,

    /// Let anyone interact instead of only the invoking user.
    #[serde(default)]
    pub everyone: bool,
}

impl SessionConfig {
    /// Converts to session options.
    pub fn to_options(&self) -> SessionOptions {
        let mut options = SessionOptions::new().delete_after(self.delete_after);
        if let Some(secs) = self.timeout_secs {
            options = options.timeout(Duration::from_secs(secs));
        }
        if self.everyone {
            options = options.allowed_users(AllowedUsers::Everyone);
        }
        options
    }
}

/// Navigation emojis of paginators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatorConfig {
    #[serde(default = "default_previous")]
    pub previous: String,
    #[serde(default = "default_stop")]
    pub stop: String,
    #[serde(default = "default_next")]
    pub next: String,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            previous: default_previous(),
            stop: default_stop(),
            next: default_next(),
        }
    }
}

impl PaginatorConfig {
    pub fn to_emojis(&self) -> NavigationEmojis {
        NavigationEmojis::new(&self.previous, &self.stop, &self.next)
    }
}

fn default_previous() -> String {
    PREVIOUS_EMOJI.to_string()
}

fn default_stop() -> String {
    STOP_EMOJI.to_string()
}

fn default_next() -> String {
    NEXT_EMOJI.to_string()
}

/// Yes/no emojis of confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmConfig {
    #[serde(default = "default_confirm_emojis")]
    pub emojis: Vec<String>,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            emojis: default_confirm_emojis(),
        }
    }
}

impl ConfirmConfig {
    /// The `[yes, no]` pair, if exactly two emojis are configured.
    pub fn emojis(&self) -> Option<[&str; 2]> {
        match self.emojis.as_slice() {
            [yes, no] => Some([yes.as_str(), no.as_str()]),
            _ => None,
        }
    }
}

fn default_confirm_emojis() -> Vec<String> {
    DEFAULT_CONFIRM_EMOJIS.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_to_options() {
        let config = SessionConfig {
            timeout_secs: Some(90),
            delete_after: true,
            everyone: true,
        };
        let options = config.to_options();
        assert_eq!(options.timeout, Some(Duration::from_secs(90)));
        assert!(options.delete_after);
        assert_eq!(options.allowed_users, Some(AllowedUsers::Everyone));

        let options = SessionConfig::default().to_options();
        assert_eq!(options, SessionOptions::new());
    }

    #[test]
    fn test_confirm_emojis_pair() {
        assert_eq!(
            ConfirmConfig::default().emojis(),
            Some(["\u{2705}", "\u{274C}"])
        );
        let three = ConfirmConfig {
            emojis: vec!["a".into(), "b".into(), "c".into()],
        };
        assert_eq!(three.emojis(), None);
    }

    #[test]
    fn test_paginator_defaults() {
        assert_eq!(PaginatorConfig::default().to_emojis(), NavigationEmojis::default());
    }
}
