//! Handler for `bookstore overview`.

use super::output;
use crate::adapter::outbound::sqlite::{book, ping, SqliteBookstore};
use crate::error::Result;

/// Lessons listed at the end of the overview.
pub const LESSONS: [(&str, &str); 4] = [
    ("lesson basics", "Connecting and simple queries"),
    ("lesson crud", "Create, read, update and delete"),
    ("lesson relations", "Includes, relation filters, aggregates"),
    ("lesson raw-sql", "Hand-written SQL on the same connection"),
];

/// Test the connection, count every table and show a few books.
///
/// # Errors
/// Returns the first failing query.
pub async fn execute(store: &SqliteBookstore) -> Result<()> {
    output::header("Welcome to the Diesel bookstore lessons!");

    output::section("Testing database connection...");
    let version = ping(store.pool())?;
    output::success(&format!("Connected (SQLite {version})"));

    output::section("Database summary");
    let counts = store.table_counts().await?;
    for (label, count) in counts.labelled() {
        output::field(label, count);
    }

    output::section("Sample books");
    let mut conn = store.conn()?;
    for sample in book::samples(&mut conn, 5)? {
        output::item(format!(
            "{} by {} [{}] ${:.2}",
            output::highlight(&sample.title),
            sample.author_label(),
            sample.category_label(),
            sample.price
        ));
    }

    output::section("Available lessons");
    for (command, summary) in LESSONS {
        output::item(format!("bookstore {command:<18} {}", output::muted(summary)));
    }
    Ok(())
}
