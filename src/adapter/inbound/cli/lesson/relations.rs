//! Lesson 3: relations.
//!
//! Loading related rows, filtering through a relation, aggregating over
//! related collections, and writing a parent with its children in one
//! transaction.

use diesel::SqliteConnection;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

use super::super::output;
use crate::adapter::outbound::sqlite::{author, book, category, customer, order, SqliteBookstore};
use crate::domain::stats::CategorySummary;
use crate::domain::{OrderLine, OrderStatus};
use crate::error::Result;

#[derive(Tabled, Serialize)]
struct CategoryStatsRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Books")]
    books: usize,
    #[tabled(rename = "Avg price")]
    average_price: String,
}

impl From<&CategorySummary> for CategoryStatsRow {
    fn from(summary: &CategorySummary) -> Self {
        Self {
            category: summary.name.clone(),
            books: summary.book_count,
            average_price: summary
                .average_price
                .map(|price| format!("${price:.2}"))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Run the relations lesson.
///
/// # Errors
/// Returns the first failing query.
pub fn run(store: &SqliteBookstore) -> Result<()> {
    output::header("Lesson 3: Relations");
    let mut conn = store.conn()?;

    include_relations(&mut conn)?;
    filter_by_relations(&mut conn)?;
    aggregate_relations(&mut conn)?;
    create_connected(&mut conn)?;

    output::section("Key takeaways");
    output::success("belonging_to + grouped_by loads children for many parents");
    output::success("Joins filter parents by their related rows");
    output::success("GROUP BY with count() for per-parent totals");
    output::success("A transaction writes an order and its items together");
    Ok(())
}

fn include_relations(conn: &mut SqliteConnection) -> Result<()> {
    output::section("Authors with their books");
    for entry in author::with_books(conn, 3)? {
        output::item(&entry.author.name);
        if entry.books.is_empty() {
            output::sub_item("No books yet");
        }
        for listing in &entry.books {
            output::sub_item(format!("{} - ${:.2}", listing.title, listing.price));
        }
    }

    output::section("Orders with customer and book details");
    for details in order::with_details(conn, 3)? {
        output::item(format!(
            "Order #{} by {}",
            details.order.id,
            details.customer_label()
        ));
        output::sub_item(format!(
            "Status: {} | Total: ${:.2}",
            details.order.status, details.order.total_amount
        ));
        for line in &details.items {
            output::sub_item(format!("- {} (qty: {})", line.title_label(), line.quantity));
        }
    }
    Ok(())
}

fn filter_by_relations(conn: &mut SqliteConnection) -> Result<()> {
    output::section("Authors with at least one book");
    for row in author::with_book_counts(conn)? {
        output::item(format!("{}: {} book(s)", row.name, row.book_count));
    }

    output::section("Books by authors born before 1900");
    for found in book::by_authors_born_before(conn, 1900)? {
        let born = found
            .birth_year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        output::item(&found.title);
        output::sub_item(format!("by {} ({born})", found.author));
    }

    output::section("Customers with orders over $25");
    for entry in customer::with_orders_over(conn, Decimal::new(25, 0))? {
        output::item(entry.customer.full_name());
        for summary in &entry.orders {
            output::sub_item(format!(
                "Order #{}: ${:.2} ({})",
                summary.id, summary.total_amount, summary.status
            ));
        }
    }
    Ok(())
}

fn aggregate_relations(conn: &mut SqliteConnection) -> Result<()> {
    let summaries = category::summaries(conn)?;

    output::section("Category statistics");
    let rows: Vec<CategoryStatsRow> = summaries.iter().map(CategoryStatsRow::from).collect();
    output::table(&rows);

    output::section("Average book price by category");
    for summary in &summaries {
        if let Some(average) = summary.average_price {
            output::item(format!("{}: ${average:.2} avg", summary.name));
        }
    }

    output::section("Books with reviews (avg rating)");
    for rating in book::ratings(conn)? {
        output::item(format!(
            "{}: {:.1}/5 ({} reviews)",
            rating.title, rating.average_rating, rating.review_count
        ));
    }
    Ok(())
}

fn create_connected(conn: &mut SqliteConnection) -> Result<()> {
    output::section("Creating an order with items");
    let buyer = customer::first(conn)?;
    let picks = book::first_n(conn, 2)?;
    let Some(buyer) = buyer.filter(|_| picks.len() >= 2) else {
        output::warning("Need a customer and two books to place an order");
        return Ok(());
    };

    let lines: Vec<OrderLine> = picks
        .iter()
        .map(|pick| OrderLine {
            book_id: pick.id,
            quantity: 1,
            price_at_purchase: pick.price,
        })
        .collect();
    let created = order::create(conn, buyer.id, OrderStatus::Pending, &lines)?;

    output::success(&format!("Created Order #{}", created.order.id));
    output::field("Customer", created.customer_label());
    output::field("Total", format!("${:.2}", created.order.total_amount));
    for line in &created.items {
        output::sub_item(format!("- {}", line.title_label()));
    }

    order::delete(conn, created.order.id)?;
    output::note("(Test order cleaned up)");
    Ok(())
}
