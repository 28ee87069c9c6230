//! Configuration loader using figment.
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: enables TOML configuration files (`chime.toml`, `config.toml`)
//! - `yaml-config`: enables YAML configuration files (`chime.yaml`, `chime.yml`, etc.)
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Profile-specific config file (`chime.{profile}.toml` / `chime.{profile}.yaml`)
//! 3. Main config file (`chime.toml` / `chime.yaml`)
//! 4. Environment variables (`CHIME_*`)
//! 5. Programmatic overrides
//!
//! # Environment Variable Mapping
//!
//! Environment variables use the `CHIME_` prefix with `__` as separator:
//!
//! - `CHIME_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `CHIME_SESSION__TIMEOUT_SECS=60` → `session.timeout_secs = 60`
//! - `CHIME_PAGINATOR__STOP=🛑` → `paginator.stop = "🛑"`
//!
//! # Example
//!
//! ```rust,ignore
//! use chime_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .load()?;
//!
//! let options = config.session.to_options();
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::ChimeConfig;
use super::validation::validate_config;

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name; unknown names become [`Profile::Custom`].
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            _ => Self::Custom(name.to_string()),
        }
    }

    /// Reads `CHIME_PROFILE`, defaulting to Development.
    pub fn from_env() -> Self {
        std::env::var("CHIME_PROFILE")
            .map(|name| Self::parse(&name))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    /// Programmatic overrides.
    figment: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds current directory to search paths.
    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    /// Adds user config directory to search paths.
    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(config_dir) => self.search_path(config_dir.join("chime")),
            None => self,
        }
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: ChimeConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads, validates and returns the configuration.
    pub fn load(self) -> ConfigResult<ChimeConfig> {
        let profile = self.profile.clone();
        let figment = self.build_figment()?;

        let config: ChimeConfig = figment
            .extract()
            .map_err(|e| ConfigError::parse(format!("Failed to extract configuration: {e}")))?;
        validate_config(&config)?;

        debug!(
            profile = %profile,
            logging_level = %config.logging.level,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Layers defaults, the config file, env and overrides.
    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(ChimeConfig::default()));

        let base = match self.config_file.take() {
            Some(path) if path.exists() => Some(path),
            Some(path) => return Err(ConfigError::FileNotFound(path)),
            None => self.find_config_file(),
        };

        match base {
            Some(base) => {
                if let Some(variant) = self.profile_variant(&base).filter(|p| p.exists()) {
                    debug!(path = %variant.display(), "Loading profile-specific config");
                    figment = merge_config_file(figment, &variant)?;
                }
                info!(path = %base.display(), "Loading configuration file");
                figment = merge_config_file(figment, &base)?;
            }
            None => warn!("No configuration file found, using defaults"),
        }

        if self.load_env {
            trace!("Loading environment variables with CHIME_ prefix");
            figment = figment.merge(Env::prefixed("CHIME_").split("__"));
        }

        let overrides = std::mem::take(&mut self.figment);
        Ok(figment.merge(overrides))
    }

    /// Directories searched when no explicit file is set.
    fn search_dirs(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join("chime")))
            .collect()
    }

    /// First existing `dir/name` over [`FILE_NAMES`], directories first.
    fn find_config_file(&self) -> Option<PathBuf> {
        self.search_dirs().into_iter().find_map(|dir| {
            FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
        })
    }

    /// `chime.toml` → `chime.{profile}.toml`.
    fn profile_variant(&self, base: &Path) -> Option<PathBuf> {
        let stem = base.file_stem()?.to_str()?;
        let ext = base.extension()?.to_str()?;
        Some(base.with_file_name(format!("{stem}.{}.{ext}", self.profile.as_str())))
    }
}

/// Config file names, in lookup order.
const FILE_NAMES: &[&str] = &[
    #[cfg(feature = "toml-config")]
    "chime.toml",
    #[cfg(feature = "toml-config")]
    "config.toml",
    #[cfg(feature = "yaml-config")]
    "chime.yaml",
    #[cfg(feature = "yaml-config")]
    "chime.yml",
    #[cfg(feature = "yaml-config")]
    "config.yaml",
    #[cfg(feature = "yaml-config")]
    "config.yml",
];

/// Merges one file, picking the provider from its extension.
fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    match path.extension().and_then(|ext| ext.to_str()) {
        #[cfg(feature = "toml-config")]
        Some("toml") => Ok(figment.merge(Toml::file(path))),
        #[cfg(feature = "yaml-config")]
        Some("yaml" | "yml") => Ok(figment.merge(Yaml::file(path))),
        other => Err(ConfigError::parse(format!(
            "Unsupported configuration file format: {}",
            other.unwrap_or("<none>")
        ))),
    }
}

/// Loads the configuration from the default locations.
pub fn load_config() -> ConfigResult<ChimeConfig> {
    ConfigLoader::new().load()
}

/// Loads the configuration from `path`, with environment overrides.
pub fn load_config_from_file(path: impl AsRef<Path>) -> ConfigResult<ChimeConfig> {
    ConfigLoader::new().file(path).load()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;

    use figment::Jail;

    #[test]
    fn test_default_config() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config, ChimeConfig::default());
            assert_eq!(config.logging.level.as_str(), "info");
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_then_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "chime.toml",
                r#"
                [logging]
                level = "debug"

                [session]
                timeout_secs = 30
                delete_after = false
                "#,
            )?;
            jail.set_env("CHIME_SESSION__DELETE_AFTER", "true");

            let mut overrides = ChimeConfig::default();
            overrides.session.timeout_secs = Some(45);
            overrides.session.delete_after = true;

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.session.timeout_secs, Some(30));
            assert!(config.session.delete_after);

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .merge(overrides)
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.session.timeout_secs, Some(45));
            Ok(())
        });
    }

    #[test]
    fn test_profile_file_is_merged_under_base_file() {
        Jail::expect_with(|jail| {
            jail.create_file("chime.production.toml", "[paginator]\nstop = \"x\"\nnext = \"n\"")?;
            jail.create_file("chime.toml", "[paginator]\nnext = \">\"")?;

            let config = ConfigLoader::new()
                .profile("prod")
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.paginator.stop, "x");
            assert_eq!(config.paginator.next, ">");
            Ok(())
        });
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::new()
            .file("/definitely/not/here/chime.toml")
            .without_env()
            .load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("chime.toml", "[session]\ntimeout_secs = 0")?;
            let result = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load();
            assert!(matches!(result, Err(ConfigError::Validation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_profile_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("CHIME_PROFILE", "production");
            assert_eq!(Profile::from_env(), Profile::Production);
            jail.set_env("CHIME_PROFILE", "staging");
            assert_eq!(Profile::from_env(), Profile::Custom("staging".into()));
            Ok(())
        });
    }
}
