//! Database connection settings.

use std::time::Duration;

use serde::Deserialize;

use crate::adapter::outbound::sqlite::ConnectionOptions;

/// `[database]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database path or URL.
    ///
    /// `None` means the default under the bookstore home directory.
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// How long a connection waits on a locked database, in milliseconds.
    pub busy_timeout_ms: u64,
    /// Log every SQL statement at debug level.
    pub log_queries: bool,
}

impl DatabaseConfig {
    /// Pool settings derived from this section.
    #[must_use]
    pub fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            pool_size: self.pool_size,
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
            log_queries: self.log_queries,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: 5,
            busy_timeout_ms: 5_000,
            log_queries: false,
        }
    }
}
