//! `bookstore.toml` loading.
//!
//! A file holds `[database]` and `[logging]` tables; both may be omitted.
//! After parsing, a non-empty `DATABASE_URL` replaces `database.url`.
//!
//! # Example
//!
//! ```no_run
//! use bookstore::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("bookstore.toml")?;
//!     config.init_logging(0);
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::database::DatabaseConfig;
use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding `database.url`.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// Settings for one CLI run.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Database location and pool settings.
    pub database: DatabaseConfig,

    /// Log level and format for stderr.
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse and validate TOML text. No environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or a value fails
    /// validation.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file and apply environment overrides.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ReadFile`] when the file is unreadable, otherwise the
    /// errors of [`Config::parse_toml`].
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse_toml(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be loaded.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }
        debug!(path = %path.display(), "No config file, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(url) = std::env::var(DATABASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
        {
            self.database.url = Some(url);
        }
    }

    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        let invalid = |field: &'static str, reason: String| -> Result<()> {
            Err(ConfigError::InvalidValue { field, reason }.into())
        };

        if self.database.pool_size == 0 {
            return invalid("database.pool_size", "must be at least 1".into());
        }
        if matches!(self.database.url.as_deref(), Some(url) if url.trim().is_empty()) {
            return invalid("database.url", "must not be empty".into());
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return invalid("logging.format", format!("expected one of {}", LOG_FORMATS.join(", ")));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "logging.level" }.into());
        }
        Ok(())
    }

    /// Install the tracing subscriber; each `-v` raises the level.
    pub fn init_logging(&self, verbose: u8) {
        self.logging.init(verbose);
    }
}
