//! Pool-backed entry point to the bookstore database.
//!
//! Query functions in the sibling modules take a `&mut SqliteConnection` so
//! they compose inside one transaction. [`SqliteBookstore`] owns the pool,
//! hands out connections, and runs the concurrent table counts.

use std::fmt;

use diesel::prelude::*;
use futures_util::future::try_join_all;
use tracing::debug;

use super::database::connection::{DbConnection, DbPool};
use super::database::schema::{authors, books, categories, customers, orders, reviews};
use crate::domain::TableCounts;
use crate::error::{Error, Result};

/// Tables that can be counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Authors,
    Books,
    Categories,
    Customers,
    Orders,
    Reviews,
}

impl Table {
    /// Every table, in display order.
    pub const ALL: [Table; 6] = [
        Table::Authors,
        Table::Books,
        Table::Categories,
        Table::Customers,
        Table::Orders,
        Table::Reviews,
    ];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Authors => "Authors",
            Self::Books => "Books",
            Self::Categories => "Categories",
            Self::Customers => "Customers",
            Self::Orders => "Orders",
            Self::Reviews => "Reviews",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Count the rows of one table.
///
/// # Errors
/// Returns an error if the query fails.
pub fn count(conn: &mut SqliteConnection, table: Table) -> QueryResult<i64> {
    match table {
        Table::Authors => authors::table.count().get_result(conn),
        Table::Books => books::table.count().get_result(conn),
        Table::Categories => categories::table.count().get_result(conn),
        Table::Customers => customers::table.count().get_result(conn),
        Table::Orders => orders::table.count().get_result(conn),
        Table::Reviews => reviews::table.count().get_result(conn),
    }
}

/// SQLite-backed bookstore handle.
#[derive(Clone)]
pub struct SqliteBookstore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteBookstore {
    /// Create a bookstore handle over the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Check a connection out of the pool.
    ///
    /// # Errors
    /// Returns an error if no connection becomes available.
    pub fn conn(&self) -> Result<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Run `f` inside a transaction that commits when it returns `Ok`.
    ///
    /// # Errors
    /// Returns whatever `f` fails with, after rolling back.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T>,
    {
        let mut pooled = self.conn()?;
        let conn: &mut SqliteConnection = &mut pooled;
        conn.transaction(f)
    }

    /// Run `f` inside a transaction that is always rolled back.
    ///
    /// The value `f` produced is returned; none of its writes persist.
    ///
    /// # Errors
    /// Returns whatever `f` fails with.
    pub fn rolled_back<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T>,
    {
        let mut conn = self.conn()?;
        rolled_back(&mut conn, f)
    }

    /// Count one table on a pooled connection.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn count(&self, table: Table) -> Result<i64> {
        let mut conn = self.conn()?;
        Ok(count(&mut conn, table)?)
    }

    /// Count several tables concurrently.
    ///
    /// Each count runs on its own pooled connection in a blocking task; the
    /// call returns once every count has finished, in the order requested.
    ///
    /// # Errors
    /// Returns the first failure among the counts.
    pub async fn count_tables(&self, tables: &[Table]) -> Result<Vec<(Table, i64)>> {
        let tasks = tables.iter().copied().map(|table| {
            let store = self.clone();
            tokio::task::spawn_blocking(move || store.count(table).map(|n| (table, n)))
        });

        let counts = try_join_all(tasks)
            .await?
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        debug!(tables = counts.len(), "Counted tables");
        Ok(counts)
    }

    /// Count every table concurrently.
    ///
    /// # Errors
    /// Returns the first failure among the counts.
    pub async fn table_counts(&self) -> Result<TableCounts> {
        let mut counts = TableCounts::default();
        for (table, n) in self.count_tables(&Table::ALL).await? {
            match table {
                Table::Authors => counts.authors = n,
                Table::Books => counts.books = n,
                Table::Categories => counts.categories = n,
                Table::Customers => counts.customers = n,
                Table::Orders => counts.orders = n,
                Table::Reviews => counts.reviews = n,
            }
        }
        Ok(counts)
    }
}

/// Run `f` in a transaction on `conn` and roll it back afterwards.
///
/// # Errors
/// Returns whatever `f` fails with.
pub fn rolled_back<T, F>(conn: &mut SqliteConnection, f: F) -> Result<T>
where
    F: FnOnce(&mut SqliteConnection) -> Result<T>,
{
    let mut outcome = None;
    let result = conn.transaction::<(), Error, _>(|conn| {
        outcome = Some(f(conn)?);
        Err(diesel::result::Error::RollbackTransaction.into())
    });
    match result {
        Err(Error::Database(diesel::result::Error::RollbackTransaction)) | Ok(()) => {
            outcome.ok_or_else(|| Error::Validation("transaction produced no value".into()))
        }
        Err(err) => Err(err),
    }
}

/// Build a `LIKE` pattern matching values that contain `term`.
///
/// `%`, `_` and the escape character itself are escaped with `\`, so the
/// pattern must be used with `.escape('\\')`.
#[must_use]
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
