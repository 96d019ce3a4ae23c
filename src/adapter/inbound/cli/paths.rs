//! Where bookstore keeps its files when no flag says otherwise.
//!
//! All data lives under `~/.bookstore/`:
//! - `~/.bookstore/config.toml` - main configuration
//! - `~/.bookstore/bookstore.db` - SQLite database

use std::path::PathBuf;

/// Returns the bookstore home directory (`~/.bookstore/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bookstore")
}

/// Returns the default config file path (`~/.bookstore/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default database path (`~/.bookstore/bookstore.db`).
pub fn default_database() -> PathBuf {
    home_dir().join("bookstore.db")
}

/// Filesystem path behind a SQLite database URL, if it names a file.
pub fn database_file(url: &str) -> Option<PathBuf> {
    if url == ":memory:" || url.starts_with("file:") {
        return None;
    }
    Some(PathBuf::from(url.strip_prefix("sqlite://").unwrap_or(url)))
}
