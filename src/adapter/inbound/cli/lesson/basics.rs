//! Lesson 1: connecting and simple queries.

use super::super::output;
use crate::adapter::outbound::sqlite::{author, book, ping, SqliteBookstore, Table};
use crate::error::Result;

/// ISBN looked up at the end of the lesson.
pub const LOOKUP_ISBN: &str = "978-0451524935";

/// Run the basics lesson.
///
/// # Errors
/// Returns the first failing query.
pub async fn run(store: &SqliteBookstore) -> Result<()> {
    output::header("Lesson 1: Diesel basics");

    output::section("1. Connecting to the database");
    let version = ping(store.pool())?;
    output::success(&format!("Connected to SQLite {version}"));
    let mut conn = store.conn()?;
    output::section("2. All authors, by name");
    for found in author::list_by_name(&mut conn)? {
        output::item(format!("{} (born {})", found.name, found.birth_year_label()));
    }

    output::section("3. First author matching \"Rowling\"");
    match author::find_by_name_containing(&mut conn, "Rowling")? {
        Some(found) => {
            output::field("Name", &found.name);
            output::field("Email", found.email.as_deref().unwrap_or("-"));
            output::field("Bio", found.bio.as_deref().unwrap_or("-"));
        }
        None => output::warning("No author matches \"Rowling\""),
    }

    output::section("4. First 5 books, by title");
    for listing in book::list_by_title(&mut conn, 5, 0)? {
        output::item(format!("{} - ${:.2}", listing.title, listing.price));
    }

    // The counts check out their own connections.
    drop(conn);
    output::section("5. Counting records concurrently");
    let counts = store
        .count_tables(&[Table::Authors, Table::Books, Table::Customers, Table::Orders])
        .await?;
    for (table, count) in counts {
        output::field(table.label(), count);
    }

    output::section(&format!("6. Book with ISBN {LOOKUP_ISBN}"));
    let mut conn = store.conn()?;
    match book::stock_by_isbn(&mut conn, LOOKUP_ISBN)? {
        Some(found) => {
            output::field("Title", &found.title);
            output::field("Price", format!("${:.2}", found.price));
            output::field("In stock", found.stock_quantity);
        }
        None => output::warning(&format!("No book with ISBN {LOOKUP_ISBN}")),
    }

    output::success("Basics lesson complete");
    Ok(())
}
