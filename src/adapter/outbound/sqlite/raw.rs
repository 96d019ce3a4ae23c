//! Hand-written SQL through `diesel::sql_query`.
//!
//! Same bookstore, no query builder: statements are plain strings with `?`
//! placeholders and results map onto `QueryableByName` rows.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Integer, Nullable, Text};

use crate::domain::money::{price_from_f64, price_to_f64, Price};
use crate::domain::NewCustomer;
use crate::error::{Error, Result};

#[derive(QueryableByName)]
struct NameRow {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct VersionRow {
    #[diesel(sql_type = Text)]
    version: String,
}

/// One line of the category price report.
#[derive(QueryableByName, Debug, Clone, PartialEq)]
pub struct PriceReportRow {
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = BigInt)]
    pub book_count: i64,
    #[diesel(sql_type = Nullable<Double>)]
    pub avg_price: Option<f64>,
}

impl PriceReportRow {
    #[must_use]
    pub fn average_price(&self) -> Price {
        self.avg_price.map(price_from_f64).unwrap_or_default()
    }
}

/// Id, title and price of a book.
#[derive(QueryableByName, Debug, Clone, PartialEq)]
pub struct PricedTitle {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Double)]
    pub price: f64,
}

impl PricedTitle {
    #[must_use]
    pub fn price(&self) -> Price {
        price_from_f64(self.price)
    }
}

/// Id and name of a category.
#[derive(QueryableByName, Debug, Clone, PartialEq, Eq)]
pub struct CategoryName {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Text)]
    pub name: String,
}

/// SQLite library version.
///
/// # Errors
/// Returns an error if the query fails.
pub fn sqlite_version(conn: &mut SqliteConnection) -> Result<String> {
    let row: VersionRow = diesel::sql_query("SELECT sqlite_version() AS version").get_result(conn)?;
    Ok(row.version)
}

/// User tables in the database, by name.
///
/// # Errors
/// Returns an error if the query fails.
pub fn list_tables(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let rows: Vec<NameRow> = diesel::sql_query(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '__diesel%' \
         ORDER BY name",
    )
    .load(conn)?;
    Ok(rows.into_iter().map(|row| row.name).collect())
}

/// Every category name, alphabetically.
///
/// # Errors
/// Returns an error if the query fails.
pub fn category_names(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    let rows: Vec<NameRow> =
        diesel::sql_query("SELECT name FROM categories ORDER BY name").load(conn)?;
    Ok(rows.into_iter().map(|row| row.name).collect())
}

/// Book count and average price per category, busiest first.
///
/// # Errors
/// Returns an error if the query fails.
pub fn category_price_report(conn: &mut SqliteConnection) -> Result<Vec<PriceReportRow>> {
    Ok(diesel::sql_query(
        "SELECT c.name AS name, \
                COUNT(b.id) AS book_count, \
                ROUND(AVG(b.price), 2) AS avg_price \
         FROM categories c \
         LEFT JOIN books b ON c.id = b.category_id \
         GROUP BY c.id, c.name \
         ORDER BY book_count DESC, c.name",
    )
    .load(conn)?)
}

/// Look a book up by exact title.
///
/// # Errors
/// Returns an error if the query fails.
pub fn find_priced_title(conn: &mut SqliteConnection, title: &str) -> Result<Option<PricedTitle>> {
    Ok(diesel::sql_query("SELECT id, title, price FROM books WHERE title = ? ORDER BY id LIMIT 1")
        .bind::<Text, _>(title)
        .get_result(conn)
        .optional()?)
}

/// Overwrite a book's price and return the stored row.
///
/// # Errors
/// Returns [`Error::NotFound`] if no book has this id.
pub fn update_price(conn: &mut SqliteConnection, id: i32, price: Price) -> Result<PricedTitle> {
    diesel::sql_query(
        "UPDATE books SET price = ?, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ? RETURNING id, title, price",
    )
    .bind::<Double, _>(price_to_f64(price))
    .bind::<Integer, _>(id)
    .get_result(conn)
    .optional()?
    .ok_or_else(|| Error::not_found("book", id))
}

/// Insert a category unless the name is taken.
///
/// Returns the new row, or `None` when the name already existed.
///
/// # Errors
/// Returns an error if the insert fails.
pub fn insert_category(
    conn: &mut SqliteConnection,
    name: &str,
    description: &str,
) -> Result<Option<CategoryName>> {
    Ok(diesel::sql_query(
        "INSERT INTO categories (name, description) VALUES (?, ?) \
         ON CONFLICT (name) DO NOTHING RETURNING id, name",
    )
    .bind::<Text, _>(name)
    .bind::<Text, _>(description)
    .get_result(conn)
    .optional()?)
}

/// Delete a category by name and return what was removed.
///
/// # Errors
/// Returns an error if the delete fails.
pub fn delete_category(conn: &mut SqliteConnection, name: &str) -> Result<Option<CategoryName>> {
    Ok(
        diesel::sql_query("DELETE FROM categories WHERE name = ? RETURNING id, name")
            .bind::<Text, _>(name)
            .get_result(conn)
            .optional()?,
    )
}

/// Insert customers one statement per row, skipping duplicate emails.
///
/// Returns the number of rows inserted.
///
/// # Errors
/// Returns an error if a statement fails.
pub fn insert_customers(conn: &mut SqliteConnection, batch: &[NewCustomer]) -> Result<usize> {
    conn.transaction::<_, Error, _>(|conn| {
        let mut inserted = 0;
        for customer in batch {
            inserted += diesel::sql_query(
                "INSERT INTO customers (first_name, last_name, email, phone) \
                 VALUES (?, ?, ?, ?) ON CONFLICT (email) DO NOTHING",
            )
            .bind::<Text, _>(&customer.first_name)
            .bind::<Text, _>(&customer.last_name)
            .bind::<Text, _>(&customer.email)
            .bind::<Nullable<Text>, _>(customer.phone.as_deref())
            .execute(conn)?;
        }
        Ok(inserted)
    })
}
