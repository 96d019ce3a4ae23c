//! Opening the SQLite file.
//!
//! Every pooled connection gets foreign keys and a busy timeout before use.

use std::path::Path;
use std::time::Duration;

use diesel::connection::{Instrumentation, InstrumentationEvent};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// The bookstore schema, compiled in from `migrations/`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// r2d2 pool of SQLite connections.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Type alias for a connection checked out of [`DbPool`].
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Settings applied when building a pool and on every acquired connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionOptions {
    /// Maximum number of pooled connections.
    pub pool_size: u32,
    /// How long SQLite waits on a locked database.
    pub busy_timeout: Duration,
    /// Emit every statement as a `bookstore::sql` debug event.
    pub log_queries: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            pool_size: 5,
            busy_timeout: Duration::from_millis(5000),
            log_queries: false,
        }
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        configure_sqlite_connection(conn, self.busy_timeout)
            .map_err(diesel::r2d2::Error::QueryError)?;
        if self.log_queries {
            conn.set_instrumentation(SqlTracer);
        }
        Ok(())
    }
}

/// Forwards executed statements to `tracing`.
#[derive(Debug, Clone, Copy)]
struct SqlTracer;

impl Instrumentation for SqlTracer {
    fn on_connection_event(&mut self, event: InstrumentationEvent<'_>) {
        if let InstrumentationEvent::StartQuery { query, .. } = event {
            debug!(target: "bookstore::sql", query = %query, "query");
        }
    }
}

/// Build a pool over `database_url`, creating its directory if needed.
///
/// # Errors
/// Fails when the directory cannot be created or r2d2 cannot open the
/// initial connections.
pub fn create_pool(database_url: &str, options: ConnectionOptions) -> Result<DbPool> {
    prepare_database_path(database_url)?;
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(options.pool_size)
        .connection_customizer(Box::new(options))
        .build(manager)?;
    debug!(database_url, pool_size = options.pool_size, "Connection pool ready");
    Ok(pool)
}

/// Apply pragmas every connection needs.
///
/// SQLite leaves foreign key enforcement off per connection; cascading
/// deletes of order items depend on it being on.
///
/// # Errors
/// Returns an error if a pragma fails to apply.
pub fn configure_sqlite_connection(
    conn: &mut SqliteConnection,
    busy_timeout: Duration,
) -> QueryResult<()> {
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(conn)?;
    diesel::sql_query(format!("PRAGMA busy_timeout = {}", busy_timeout.as_millis()))
        .execute(conn)?;
    Ok(())
}

/// Create the parent directory of a file-backed database.
fn prepare_database_path(database_url: &str) -> Result<()> {
    if database_url == ":memory:" || database_url.starts_with("file:") {
        return Ok(());
    }
    let path = database_url.strip_prefix("sqlite://").unwrap_or(database_url);
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Bring the schema up to date, returning the versions just applied.
///
/// # Errors
/// [`Error::Migration`] when a migration script fails.
pub fn run_migrations(pool: &DbPool) -> Result<Vec<String>> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Migration(e.to_string()))?
        .into_iter()
        .map(|version| version.to_string())
        .collect::<Vec<_>>();
    if applied.is_empty() {
        debug!("Schema up to date");
    } else {
        info!(count = applied.len(), "Applied migrations");
    }
    Ok(applied)
}

/// Round-trip a trivial query and return the SQLite library version.
///
/// # Errors
/// Returns an error if no connection can be acquired or the query fails.
pub fn ping(pool: &DbPool) -> Result<String> {
    let mut conn = pool.get()?;
    crate::adapter::outbound::sqlite::raw::sqlite_version(&mut conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::sql_types::Text;

    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct PragmaValue {
        #[diesel(sql_type = diesel::sql_types::Integer)]
        value: i32,
    }

    fn temp_pool(dir: &tempfile::TempDir) -> DbPool {
        let url = dir.path().join("bookstore.db");
        create_pool(&url.to_string_lossy(), ConnectionOptions::default()).unwrap()
    }

    #[test]
    fn create_pool_with_memory_db() {
        let pool = create_pool(":memory:", ConnectionOptions::default());
        assert!(pool.is_ok());
    }

    #[test]
    fn create_pool_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bookstore.db");
        let pool = create_pool(&path.to_string_lossy(), ConnectionOptions::default());
        assert!(pool.is_ok());
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn run_migrations_creates_tables() {
        let dir = tempfile::tempdir().unwrap();
        let pool = temp_pool(&dir);
        let applied = run_migrations(&pool).unwrap();
        assert_eq!(applied.len(), 1);

        let mut conn = pool.get().unwrap();
        let tables: Vec<String> = diesel::sql_query(
            "SELECT name FROM sqlite_master WHERE type='table' \
             AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' \
             ORDER BY name",
        )
        .load::<TableName>(&mut conn)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();

        assert_eq!(
            tables,
            ["authors", "books", "categories", "customers", "order_items", "orders", "reviews"]
        );
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let pool = temp_pool(&dir);
        run_migrations(&pool).unwrap();
        assert!(run_migrations(&pool).unwrap().is_empty());
    }

    #[test]
    fn acquired_connections_enforce_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let pool = temp_pool(&dir);
        let mut conn = pool.get().unwrap();
        let row: PragmaValue =
            diesel::sql_query("SELECT foreign_keys AS value FROM pragma_foreign_keys")
                .get_result(&mut conn)
                .unwrap();
        assert_eq!(row.value, 1);
    }

    #[test]
    fn ping_reports_sqlite_version() {
        let dir = tempfile::tempdir().unwrap();
        let pool = temp_pool(&dir);
        let version = ping(&pool).unwrap();
        assert!(version.starts_with('3'), "unexpected version {version}");
    }
}
