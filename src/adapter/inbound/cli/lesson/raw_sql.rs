//! Lesson 4: hand-written SQL.
//!
//! The same questions as the earlier lessons, asked with `sql_query` and
//! bound parameters instead of the query builder.

use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use super::super::output;
use crate::adapter::outbound::sqlite::{customer, raw, SqliteBookstore};
use crate::domain::money::round_cents;
use crate::domain::NewCustomer;
use crate::error::Result;

/// Title whose price the lesson raises.
pub const REPRICED_TITLE: &str = "1984";

/// Category created and dropped again by the lesson.
pub const TEMPORARY_CATEGORY: &str = "Temporary";

#[derive(Tabled, Serialize)]
struct PriceReportLine {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Books")]
    books: i64,
    #[tabled(rename = "Avg price")]
    average_price: String,
}

/// Run the raw SQL lesson.
///
/// # Errors
/// Returns the first failing statement.
pub fn run(store: &SqliteBookstore) -> Result<()> {
    output::header("Lesson 4: Raw SQL");
    let mut conn = store.conn()?;

    output::section("1. Server version");
    output::field("SQLite", raw::sqlite_version(&mut conn)?);

    output::section("2. Tables");
    for table in raw::list_tables(&mut conn)? {
        output::item(table);
    }

    output::section("3. Category price report (LEFT JOIN + GROUP BY)");
    let report: Vec<PriceReportLine> = raw::category_price_report(&mut conn)?
        .into_iter()
        .map(|row| PriceReportLine {
            average_price: row
                .avg_price
                .map(|_| format!("${:.2}", row.average_price()))
                .unwrap_or_else(|| "-".to_string()),
            category: row.name,
            books: row.book_count,
        })
        .collect();
    output::table(&report);

    output::section(&format!("4. Raise the price of {REPRICED_TITLE} by 10%"));
    match raw::find_priced_title(&mut conn, REPRICED_TITLE)? {
        Some(before) => {
            let raised = round_cents(before.price() * Decimal::new(110, 2));
            let after = raw::update_price(&mut conn, before.id, raised)?;
            output::field("Before", format!("${:.2}", before.price()));
            output::field("After", format!("${:.2}", after.price()));
        }
        None => output::warning(&format!("{REPRICED_TITLE} is not in the catalog")),
    }

    output::section("5. A temporary category");
    match raw::insert_category(&mut conn, TEMPORARY_CATEGORY, "Created by the raw SQL lesson")? {
        Some(created) => output::success(&format!("Created {} (ID: {})", created.name, created.id)),
        None => output::warning(&format!("{TEMPORARY_CATEGORY} already existed")),
    }
    if let Some(deleted) = raw::delete_category(&mut conn, TEMPORARY_CATEGORY)? {
        output::success(&format!("Deleted {} (ID: {})", deleted.name, deleted.id));
    }
    output::note("Remaining categories:");
    for name in raw::category_names(&mut conn)? {
        output::item(name);
    }

    output::section("6. Batch insert, skipping existing emails");
    let batch = [
        NewCustomer::new("Frank", "Miller", "frank@example.com", "555-0106"),
        NewCustomer::new("Grace", "Lee", "grace@example.com", "555-0107"),
        NewCustomer::new("Henry", "Wilson", "henry@example.com", "555-0108"),
    ];
    let inserted = raw::insert_customers(&mut conn, &batch)?;
    output::success(&format!("Inserted {inserted} of {} customers", batch.len()));

    output::section("7. Most recent customers");
    for recent in customer::recent(&mut conn, 5)? {
        output::item(format!("{} <{}>", recent.full_name(), recent.email));
    }

    output::success("Raw SQL lesson complete");
    Ok(())
}
