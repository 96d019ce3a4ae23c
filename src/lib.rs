//! Bookstore - guided lessons for querying a relational database through
//! the Diesel ORM.
//!
//! The crate is laid out as ports and adapters:
//!
//! - [`domain`] - Entities, money, and the statistics reduced from loaded rows
//! - [`adapter::outbound::sqlite`] - Schema, migrations, seed data and every
//!   query, written against a borrowed `SqliteConnection`
//! - [`application::exercise`] - The practice exercises and their checker
//! - [`adapter::inbound::cli`] - The lesson transcripts behind the `bookstore`
//!   binary
//! - [`infrastructure::config`] - TOML configuration and logging setup
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use bookstore::adapter::outbound::sqlite::{create_pool, ConnectionOptions, SqliteBookstore};
//!
//! # async fn demo() -> bookstore::error::Result<()> {
//! let pool = create_pool("bookstore.db", ConnectionOptions::default())?;
//! let store = SqliteBookstore::new(pool);
//! let counts = store.table_counts().await?;
//! println!("{} books", counts.books);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
