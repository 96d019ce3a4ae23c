//! `[logging]` settings and the stderr subscriber.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// The `[logging]` table: an `EnvFilter` directive and `pretty` or `json`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Filter directive for this config at the given `-v` count.
    ///
    /// One `-v` raises the level to `debug`, two or more to `trace`.
    #[must_use]
    pub fn directive(&self, verbose: u8) -> String {
        match verbose {
            0 => self.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }

    /// Initialize the tracing subscriber on stderr.
    ///
    /// `RUST_LOG` takes precedence over the configured level. A subscriber
    /// that is already installed is left in place.
    pub fn init(&self, verbose: u8) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.directive(verbose)));

        let installed = match self.format.as_str() {
            "json" => fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
            _ => fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
        };
        if installed.is_err() {
            tracing::debug!("Tracing subscriber already installed");
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}
