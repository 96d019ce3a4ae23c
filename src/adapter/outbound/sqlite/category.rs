//! Category queries.

use diesel::prelude::*;
use tracing::debug;

use super::database::model::{CategoryRow, NewCategoryRow};
use super::database::schema::{books, categories};
use crate::domain::money::price_from_f64;
use crate::domain::stats::{category_summaries, CategorySummary};
use crate::domain::{Category, NewCategory};
use crate::error::{Error, Result};

/// All categories ordered by id.
///
/// # Errors
/// Returns an error if the query fails.
pub fn list(conn: &mut SqliteConnection) -> Result<Vec<Category>> {
    let rows: Vec<CategoryRow> = categories::table
        .select(CategoryRow::as_select())
        .order(categories::id.asc())
        .load(conn)?;
    Ok(rows.into_iter().map(Category::from).collect())
}

/// Category names in alphabetical order.
///
/// # Errors
/// Returns an error if the query fails.
pub fn names(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    Ok(categories::table
        .select(categories::name)
        .order(categories::name.asc())
        .load(conn)?)
}

/// Category with exactly this name.
///
/// # Errors
/// Returns an error if the query fails.
pub fn find_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<Category>> {
    let row: Option<CategoryRow> = categories::table
        .select(CategoryRow::as_select())
        .filter(categories::name.eq(name))
        .first(conn)
        .optional()?;
    Ok(row.map(Category::from))
}

/// Insert categories, skipping names that already exist.
///
/// Returns how many rows were actually inserted.
///
/// # Errors
/// Returns an error if an insert fails for any reason other than a
/// duplicate name.
pub fn create_many(conn: &mut SqliteConnection, new: &[NewCategory]) -> Result<usize> {
    conn.transaction::<_, Error, _>(|conn| {
        let mut inserted = 0;
        for category in new {
            inserted += diesel::insert_into(categories::table)
                .values(NewCategoryRow::from(category))
                .on_conflict(categories::name)
                .do_nothing()
                .execute(conn)?;
        }
        debug!(requested = new.len(), inserted, "Created categories");
        Ok(inserted)
    })
}

/// Delete every category whose name is in `names`.
///
/// # Errors
/// Returns an error if the delete fails.
pub fn delete_by_names(conn: &mut SqliteConnection, names: &[&str]) -> Result<usize> {
    let deleted = diesel::delete(categories::table.filter(categories::name.eq_any(names.to_vec())))
        .execute(conn)?;
    debug!(deleted, "Deleted categories");
    Ok(deleted)
}

/// Book count and average price for every category.
///
/// Loads categories and book prices, then reduces the rows in memory.
///
/// # Errors
/// Returns an error if either query fails.
pub fn summaries(conn: &mut SqliteConnection) -> Result<Vec<CategorySummary>> {
    let categories = list(conn)?;
    let prices: Vec<(Option<i32>, f64)> = books::table
        .select((books::category_id, books::price))
        .load(conn)?;
    let prices: Vec<_> = prices
        .into_iter()
        .map(|(category_id, price)| (category_id, price_from_f64(price)))
        .collect();
    Ok(category_summaries(&categories, &prices))
}
