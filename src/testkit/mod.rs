//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`config`] - Configurations pointing at a temporary database.
//! - [`TempDb`] - A migrated SQLite file that disappears on drop.

pub mod config;

use std::path::{Path, PathBuf};

use diesel::SqliteConnection;

use crate::adapter::outbound::sqlite::{
    create_pool, run_migrations, seed, ConnectionOptions, SqliteBookstore,
};
use crate::adapter::outbound::sqlite::database::connection::DbConnection;
use crate::error::Result;

/// Temporary SQLite database for tests.
pub struct TempDb {
    // Held so the directory outlives the pool.
    _dir: tempfile::TempDir,
    path: PathBuf,
    store: SqliteBookstore,
}

impl TempDb {
    /// A migrated database with no rows.
    ///
    /// # Errors
    /// Returns an error if the pool or the migrations fail.
    pub fn empty() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bookstore.db");
        let pool = create_pool(&path.to_string_lossy(), ConnectionOptions::default())?;
        run_migrations(&pool)?;
        Ok(Self {
            _dir: dir,
            path,
            store: SqliteBookstore::new(pool),
        })
    }

    /// A migrated database holding the sample bookstore.
    ///
    /// # Errors
    /// Returns an error if creating or seeding the database fails.
    pub fn seeded() -> Result<Self> {
        let db = Self::empty()?;
        let mut conn = db.conn()?;
        seed::seed(&mut conn)?;
        Ok(db)
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The database file path as a connection URL.
    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn store(&self) -> &SqliteBookstore {
        &self.store
    }

    /// Check out a connection.
    ///
    /// # Errors
    /// Returns an error if the pool is exhausted.
    pub fn conn(&self) -> Result<DbConnection> {
        self.store.conn()
    }

    /// Run `f` on a fresh connection.
    ///
    /// # Errors
    /// Returns whatever `f` fails with.
    pub fn with_conn<T>(&self, f: impl FnOnce(&mut SqliteConnection) -> Result<T>) -> Result<T> {
        let mut conn = self.conn()?;
        f(&mut conn)
    }
}
