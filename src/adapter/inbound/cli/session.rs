//! Opening the bookstore database for a command.

use tracing::debug;

use super::paths;
use crate::adapter::outbound::sqlite::{create_pool, SqliteBookstore};
use crate::error::{Error, Result};
use crate::infrastructure::config::Config;

/// Database URL after config, environment and flag overrides.
#[must_use]
pub fn database_url(config: &Config) -> String {
    config
        .database
        .url
        .clone()
        .unwrap_or_else(|| paths::default_database().to_string_lossy().into_owned())
}

/// Open a pool, creating the database file if needed.
///
/// # Errors
/// Returns an error if the pool cannot be built.
pub fn open(config: &Config) -> Result<SqliteBookstore> {
    let url = database_url(config);
    debug!(database = %url, "Opening database");
    let pool = create_pool(&url, config.database.connection_options())?;
    Ok(SqliteBookstore::new(pool))
}

/// Open a pool on a database that must already exist.
///
/// # Errors
/// Returns [`Error::NotFound`] when the database file is missing.
pub fn open_existing(config: &Config) -> Result<SqliteBookstore> {
    let url = database_url(config);
    if let Some(file) = paths::database_file(&url) {
        if !file.exists() {
            return Err(Error::NotFound {
                entity: "database",
                key: format!("{} (run `bookstore db setup` first)", file.display()),
            });
        }
    }
    open(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_url_wins_over_default() {
        let mut config = Config::default();
        assert!(database_url(&config).ends_with("bookstore.db"));
        config.database.url = Some("/tmp/shop.db".into());
        assert_eq!(database_url(&config), "/tmp/shop.db");
    }

    #[test]
    fn missing_database_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.database.url = Some(dir.path().join("absent.db").to_string_lossy().into_owned());
        let err = open_existing(&config).err().unwrap();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("db setup"));
    }
}
