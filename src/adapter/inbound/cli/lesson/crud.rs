//! Lesson 2: create, read, update and delete.

use diesel::SqliteConnection;
use rust_decimal::Decimal;
use tracing::debug;

use super::super::output;
use crate::adapter::outbound::sqlite::{author, book, category, customer, SqliteBookstore};
use crate::domain::{NewAuthor, NewBook, NewCategory, NewCustomer};
use crate::error::Result;

/// Categories created and removed again by the lesson.
pub const DEMO_CATEGORIES: [(&str, &str); 3] = [
    ("Biography", "Life stories of real people"),
    ("History", "Books about historical events"),
    ("Self-Help", "Personal development books"),
];

/// Customer upserted and then deleted by the lesson.
pub const DEMO_CUSTOMER_EMAIL: &str = "newuser@example.com";

const TOLKIEN_EMAIL: &str = "tolkien@example.com";
const HOBBIT_ISBN: &str = "978-0547928227";

/// Run the CRUD lesson.
///
/// # Errors
/// Returns the first failing query.
pub fn run(store: &SqliteBookstore) -> Result<()> {
    output::header("Lesson 2: CRUD operations");
    let mut conn = store.conn()?;

    create_operations(&mut conn)?;
    read_operations(&mut conn)?;
    update_operations(&mut conn)?;
    delete_operations(&mut conn)?;

    output::section("Key takeaways");
    output::success("Upsert on a unique column for create-or-leave logic");
    output::success("ON CONFLICT DO NOTHING to skip duplicates in bulk inserts");
    output::success("Column arithmetic for increments and scaled prices");
    output::success("One UPDATE statement for batch changes");
    output::hint("Next: bookstore lesson relations");
    Ok(())
}

fn create_operations(conn: &mut SqliteConnection) -> Result<()> {
    output::section("CREATE: a single author");
    let tolkien = author::upsert(
        conn,
        &NewAuthor {
            name: "J.R.R. Tolkien".to_string(),
            email: Some(TOLKIEN_EMAIL.to_string()),
            bio: Some(
                "English writer and philologist, author of The Hobbit and The Lord of the Rings."
                    .to_string(),
            ),
            birth_year: Some(1892),
        },
    )?;
    output::success(&format!("Author: {} (ID: {})", tolkien.name, tolkien.id));

    output::section("CREATE: several categories, skipping duplicates");
    let new_categories: Vec<NewCategory> = DEMO_CATEGORIES
        .iter()
        .map(|(name, description)| NewCategory::new(*name, *description))
        .collect();
    let created = category::create_many(conn, &new_categories)?;
    output::success(&format!("Created {created} new categories"));

    output::section("CREATE: a book connected to its author");
    let fiction = category::find_by_name(conn, "Fiction")?;
    let hobbit = book::upsert(
        conn,
        &NewBook {
            title: "The Hobbit".to_string(),
            isbn: Some(HOBBIT_ISBN.to_string()),
            author_id: Some(tolkien.id),
            category_id: fiction.map(|c| c.id),
            price: Decimal::new(1899, 2),
            stock_quantity: 25,
            description: Some("A fantasy novel about Bilbo Baggins.".to_string()),
        },
    )?;
    output::success(&format!("Book: {}", hobbit.title));
    Ok(())
}

fn read_operations(conn: &mut SqliteConnection) -> Result<()> {
    output::section("READ: books under $15, cheapest first");
    for listing in book::cheaper_than(conn, Decimal::new(15, 0))? {
        output::item(format!("{} - ${:.2}", listing.title, listing.price));
    }

    output::section("READ: Fiction or Mystery books");
    let mut ids = Vec::new();
    for name in ["Fiction", "Mystery"] {
        if let Some(found) = category::find_by_name(conn, name)? {
            ids.push(found.id);
        }
    }
    for found in book::in_categories(conn, &ids)? {
        output::item(format!(
            "{} ({})",
            found.title,
            found.category.as_deref().unwrap_or("Uncategorized")
        ));
    }

    output::section("READ: books page 1, 3 per page");
    for listing in book::list_by_title(conn, 3, 0)? {
        output::item(&listing.title);
    }

    output::section("READ: titles containing 'the'");
    for title in book::search_titles(conn, "the")? {
        output::item(title);
    }
    Ok(())
}

fn update_operations(conn: &mut SqliteConnection) -> Result<()> {
    output::section("UPDATE: restock 1984");
    match book::find_by_title(conn, "1984")? {
        Some(found) => {
            let updated = book::increment_stock(conn, found.id, 5)?;
            output::item(format!("{}: stock now {}", updated.title, updated.stock_quantity));
        }
        None => output::warning("1984 is not in the catalog"),
    }

    output::section("UPDATE: 5% off every Mystery book");
    let discounted = match category::find_by_name(conn, "Mystery")? {
        Some(mystery) => book::scale_category_prices(conn, mystery.id, Decimal::new(95, 2))?,
        None => 0,
    };
    output::success(&format!("Updated {discounted} books"));

    output::section("UPDATE: upsert a customer");
    let upserted = customer::upsert_phone(
        conn,
        &NewCustomer::new("New", "User", DEMO_CUSTOMER_EMAIL, "555-9999"),
    )?;
    output::success(&format!("Customer: {}", upserted.full_name()));
    Ok(())
}

fn delete_operations(conn: &mut SqliteConnection) -> Result<()> {
    output::section("DELETE: the demo customer");
    match customer::delete_by_email(conn, DEMO_CUSTOMER_EMAIL)? {
        Some(deleted) => output::success(&format!("Deleted: {}", deleted.full_name())),
        None => {
            debug!(email = DEMO_CUSTOMER_EMAIL, "Nothing to delete");
            output::warning("Customer not found (already deleted)");
        }
    }

    output::section("DELETE: the demo categories");
    let names: Vec<&str> = DEMO_CATEGORIES.iter().map(|(name, _)| *name).collect();
    let deleted = category::delete_by_names(conn, &names)?;
    output::success(&format!("Deleted {deleted} categories"));
    Ok(())
}
