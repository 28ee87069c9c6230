//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{
    ChimeConfig, ConfirmConfig, LogLevel, LogOutput, LoggingConfig, PaginatorConfig,
};

/// Validates the entire configuration.
pub fn validate_config(config: &ChimeConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;

    if config.session.timeout_secs == Some(0) {
        return Err(ConfigError::validation(
            "Session timeout must be greater than 0; omit it to wait forever",
        ));
    }

    validate_paginator_config(&config.paginator)?;
    validate_confirm_config(&config.confirm)?;
    Ok(())
}

/// Validates per-target log filters.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    for (target, level) in &logging.filters {
        if target.is_empty() {
            return Err(ConfigError::validation("Log filter target cannot be empty"));
        }
        if !LogLevel::NAMES.contains(&level.to_lowercase().as_str()) {
            return Err(ConfigError::validation(format!(
                "Invalid log level for '{target}': {level}. Valid values are: {:?}",
                LogLevel::NAMES
            )));
        }
    }

    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.file_path is required when logging.output is \"file\"",
        ));
    }

    Ok(())
}

fn validate_paginator_config(paginator: &PaginatorConfig) -> ConfigResult<()> {
    let buttons = [
        ("previous", &paginator.previous),
        ("stop", &paginator.stop),
        ("next", &paginator.next),
    ];
    for (name, emoji) in buttons {
        if emoji.trim().is_empty() {
            return Err(ConfigError::validation(format!(
                "Paginator {name} emoji cannot be empty"
            )));
        }
    }

    if paginator.previous == paginator.next
        || paginator.previous == paginator.stop
        || paginator.stop == paginator.next
    {
        return Err(ConfigError::validation("Paginator emojis must be distinct"));
    }

    Ok(())
}

fn validate_confirm_config(confirm: &ConfirmConfig) -> ConfigResult<()> {
    let Some([yes, no]) = confirm.emojis() else {
        return Err(ConfigError::validation(format!(
            "Confirmation needs exactly 2 emojis, got {}",
            confirm.emojis.len()
        )));
    };

    if yes.trim().is_empty() || no.trim().is_empty() {
        return Err(ConfigError::validation("Confirmation emojis cannot be empty"));
    }
    if yes == no {
        return Err(ConfigError::validation("Confirmation emojis must differ"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ChimeConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = ChimeConfig::default();
        config.session.timeout_secs = Some(0);
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation { .. })
        ));

        config.session.timeout_secs = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_filter_level() {
        let mut config = ChimeConfig::default();
        config
            .logging
            .filters
            .insert("chime_session".into(), "DEBUG".into());
        assert!(validate_config(&config).is_ok());

        config
            .logging
            .filters
            .insert("chime_ui".into(), "loud".into());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("chime_ui"));
    }

    #[test]
    fn test_file_output_needs_path() {
        let mut config = ChimeConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("logs/chime.log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_paginator_emojis() {
        let mut config = ChimeConfig::default();
        config.paginator.stop = " ".into();
        assert!(validate_config(&config).is_err());

        let mut config = ChimeConfig::default();
        config.paginator.next = config.paginator.previous.clone();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_confirm_emojis() {
        let mut config = ChimeConfig::default();
        config.confirm.emojis = vec!["\u{2705}".into()];
        assert!(validate_config(&config).is_err());

        config.confirm.emojis = vec!["a".into(), "a".into()];
        assert!(validate_config(&config).is_err());

        config.confirm.emojis = vec!["<:yes:1>".into(), "<:no:2>".into()];
        assert!(validate_config(&config).is_ok());
    }
}
