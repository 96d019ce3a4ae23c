//! SQLite persistence adapter.
//!
//! Entity query modules take a borrowed `SqliteConnection` so callers can
//! compose them inside one transaction; [`store::SqliteBookstore`] owns the
//! pool.

pub mod author;
pub mod book;
pub mod category;
pub mod customer;
pub mod database;
pub mod order;
pub mod raw;
pub mod review;
pub mod seed;
pub mod store;

pub use database::connection::{create_pool, ping, run_migrations, ConnectionOptions, DbPool};
pub use store::{SqliteBookstore, Table};
