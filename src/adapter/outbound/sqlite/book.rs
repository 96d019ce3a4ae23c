//! Book queries and mutations.

use diesel::dsl::now;
use diesel::prelude::*;
use diesel::sql_types::{Double, Integer};
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use super::database::model::{BookRow, NewBookRow};
use super::database::schema::{authors, books, categories, reviews};
use super::store::contains_pattern;
use crate::domain::money::{price_from_f64, price_to_f64, Price};
use crate::domain::stats::{book_ratings, BookRating};
use crate::domain::{
    Book, BookByAuthor, BookListing, BookStock, BookWithCategory, NewBook, SampleBook,
};
use crate::error::{Error, Result};

define_sql_function! {
    /// SQLite `round(x, digits)`.
    fn round(x: Double, digits: Integer) -> Double;
}

fn listings(rows: Vec<(String, f64)>) -> Vec<BookListing> {
    rows.into_iter()
        .map(|(title, price)| BookListing {
            title,
            price: price_from_f64(price),
        })
        .collect()
}

/// A page of titles and prices ordered by title.
///
/// # Errors
/// Returns an error if the query fails.
pub fn list_by_title(
    conn: &mut SqliteConnection,
    limit: i64,
    offset: i64,
) -> Result<Vec<BookListing>> {
    let rows = books::table
        .select((books::title, books::price))
        .order(books::title.asc())
        .limit(limit)
        .offset(offset)
        .load(conn)?;
    Ok(listings(rows))
}

/// Book with the given ISBN.
///
/// # Errors
/// Returns an error if the query fails.
pub fn find_by_isbn(conn: &mut SqliteConnection, isbn: &str) -> Result<Option<Book>> {
    let row: Option<BookRow> = books::table
        .select(BookRow::as_select())
        .filter(books::isbn.eq(isbn))
        .first(conn)
        .optional()?;
    Ok(row.map(Book::from))
}

/// Title, price and stock of the book with the given ISBN.
///
/// # Errors
/// Returns an error if the query fails.
pub fn stock_by_isbn(conn: &mut SqliteConnection, isbn: &str) -> Result<Option<BookStock>> {
    let row: Option<(String, f64, i32)> = books::table
        .select((books::title, books::price, books::stock_quantity))
        .filter(books::isbn.eq(isbn))
        .first(conn)
        .optional()?;
    Ok(row.map(|(title, price, stock_quantity)| BookStock {
        title,
        price: price_from_f64(price),
        stock_quantity,
    }))
}

/// First book with exactly this title.
///
/// # Errors
/// Returns an error if the query fails.
pub fn find_by_title(conn: &mut SqliteConnection, title: &str) -> Result<Option<Book>> {
    let row: Option<BookRow> = books::table
        .select(BookRow::as_select())
        .filter(books::title.eq(title))
        .order(books::id.asc())
        .first(conn)
        .optional()?;
    Ok(row.map(Book::from))
}

/// The first `limit` books by id.
///
/// # Errors
/// Returns an error if the query fails.
pub fn first_n(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<Book>> {
    let rows: Vec<BookRow> = books::table
        .select(BookRow::as_select())
        .order(books::id.asc())
        .limit(limit)
        .load(conn)?;
    Ok(rows.into_iter().map(Book::from).collect())
}

/// The lowest-id book this customer has not reviewed yet.
///
/// # Errors
/// Returns an error if the query fails.
pub fn first_unreviewed_by(conn: &mut SqliteConnection, customer_id: i32) -> Result<Option<Book>> {
    let reviewed = reviews::table
        .filter(reviews::customer_id.eq(customer_id))
        .select(reviews::book_id);
    let row: Option<BookRow> = books::table
        .select(BookRow::as_select())
        .filter(books::id.ne_all(reviewed))
        .order(books::id.asc())
        .first(conn)
        .optional()?;
    Ok(row.map(Book::from))
}

/// Create a book keyed on ISBN, leaving an existing row untouched.
///
/// # Errors
/// Returns an error if the insert or the lookup fails.
pub fn upsert(conn: &mut SqliteConnection, book: &NewBook) -> Result<Book> {
    let row = NewBookRow::from(book);
    conn.transaction::<_, Error, _>(|conn| {
        let stored: BookRow = match book.isbn.as_deref() {
            Some(isbn) => {
                let created = diesel::insert_into(books::table)
                    .values(&row)
                    .on_conflict(books::isbn)
                    .do_nothing()
                    .execute(conn)?;
                debug!(isbn, created, "Upserted book");
                books::table
                    .select(BookRow::as_select())
                    .filter(books::isbn.eq(isbn))
                    .first(conn)?
            }
            None => diesel::insert_into(books::table)
                .values(&row)
                .returning(BookRow::as_returning())
                .get_result(conn)?,
        };
        Ok(Book::from(stored))
    })
}

/// Books strictly cheaper than `price`, cheapest first.
///
/// # Errors
/// Returns an error if the query fails.
pub fn cheaper_than(conn: &mut SqliteConnection, price: Price) -> Result<Vec<BookListing>> {
    let rows = books::table
        .select((books::title, books::price))
        .filter(books::price.lt(price_to_f64(price)))
        .order((books::price.asc(), books::title.asc()))
        .load(conn)?;
    Ok(listings(rows))
}

/// Books costing at least `price`, most expensive first.
///
/// # Errors
/// Returns an error if the query fails.
pub fn at_least(conn: &mut SqliteConnection, price: Price) -> Result<Vec<BookListing>> {
    let rows = books::table
        .select((books::title, books::price))
        .filter(books::price.ge(price_to_f64(price)))
        .order((books::price.desc(), books::title.asc()))
        .load(conn)?;
    Ok(listings(rows))
}

/// Books in any of the given categories, with the category name.
///
/// # Errors
/// Returns an error if the query fails.
pub fn in_categories(
    conn: &mut SqliteConnection,
    category_ids: &[i32],
) -> Result<Vec<BookWithCategory>> {
    let rows: Vec<(String, Option<String>)> = books::table
        .left_join(categories::table)
        .filter(books::category_id.eq_any(category_ids.to_vec()))
        .select((books::title, categories::name.nullable()))
        .order(books::id.asc())
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|(title, category)| BookWithCategory { title, category })
        .collect())
}

/// Titles containing `term`, ignoring ASCII case, ordered by title.
///
/// # Errors
/// Returns an error if the query fails.
pub fn search_titles(conn: &mut SqliteConnection, term: &str) -> Result<Vec<String>> {
    Ok(books::table
        .select(books::title)
        .filter(books::title.like(contains_pattern(term)).escape('\\'))
        .order(books::title.asc())
        .load(conn)?)
}

/// Titles of books whose author's name contains `term`, ordered by title.
///
/// # Errors
/// Returns an error if the query fails.
pub fn titles_by_author_containing(conn: &mut SqliteConnection, term: &str) -> Result<Vec<String>> {
    Ok(books::table
        .inner_join(authors::table)
        .filter(authors::name.like(contains_pattern(term)).escape('\\'))
        .select(books::title)
        .order(books::title.asc())
        .load(conn)?)
}

/// Add `delta` to a book's stock and return the updated row.
///
/// # Errors
/// Returns [`Error::NotFound`] if no book has this id.
pub fn increment_stock(conn: &mut SqliteConnection, id: i32, delta: i32) -> Result<Book> {
    let row: Option<BookRow> = diesel::update(books::table.find(id))
        .set((
            books::stock_quantity.eq(books::stock_quantity + delta),
            books::updated_at.eq(now),
        ))
        .returning(BookRow::as_returning())
        .get_result(conn)
        .optional()?;
    row.map(Book::from).ok_or_else(|| Error::not_found("book", id))
}

/// Multiply the price of every book in a category by `factor`.
///
/// Prices are rounded to cents in SQL. Returns the number of books updated.
///
/// # Errors
/// Returns [`Error::Validation`] for a negative or non-representable factor.
pub fn scale_category_prices(
    conn: &mut SqliteConnection,
    category_id: i32,
    factor: Price,
) -> Result<usize> {
    let factor = factor
        .to_f64()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .ok_or_else(|| Error::Validation(format!("invalid price factor {factor}")))?;
    let updated = diesel::update(books::table.filter(books::category_id.eq(category_id)))
        .set((
            books::price.eq(round(books::price * factor, 2)),
            books::updated_at.eq(now),
        ))
        .execute(conn)?;
    debug!(category_id, factor, updated, "Scaled category prices");
    Ok(updated)
}

/// Overwrite a book's price and return the updated row.
///
/// # Errors
/// Returns [`Error::NotFound`] if no book has this id.
pub fn set_price(conn: &mut SqliteConnection, id: i32, price: Price) -> Result<Book> {
    let row: Option<BookRow> = diesel::update(books::table.find(id))
        .set((books::price.eq(price_to_f64(price)), books::updated_at.eq(now)))
        .returning(BookRow::as_returning())
        .get_result(conn)
        .optional()?;
    row.map(Book::from).ok_or_else(|| Error::not_found("book", id))
}

/// Books whose author was born before `year`.
///
/// # Errors
/// Returns an error if the query fails.
pub fn by_authors_born_before(conn: &mut SqliteConnection, year: i32) -> Result<Vec<BookByAuthor>> {
    let rows: Vec<(String, String, Option<i32>)> = books::table
        .inner_join(authors::table)
        .filter(authors::birth_year.lt(year))
        .select((books::title, authors::name, authors::birth_year))
        .order((authors::birth_year.asc(), books::title.asc()))
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|(title, author, birth_year)| BookByAuthor {
            title,
            author,
            birth_year,
        })
        .collect())
}

/// The first `limit` books by title with author and category names.
///
/// # Errors
/// Returns an error if the query fails.
pub fn samples(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<SampleBook>> {
    let rows: Vec<(String, Option<String>, Option<String>, f64)> = books::table
        .left_join(authors::table)
        .left_join(categories::table)
        .select((
            books::title,
            authors::name.nullable(),
            categories::name.nullable(),
            books::price,
        ))
        .order(books::title.asc())
        .limit(limit)
        .load(conn)?;
    Ok(rows
        .into_iter()
        .map(|(title, author, category, price)| SampleBook {
            title,
            author,
            category,
            price: price_from_f64(price),
        })
        .collect())
}

/// Review count and average rating of every reviewed book.
///
/// # Errors
/// Returns an error if the query fails.
pub fn ratings(conn: &mut SqliteConnection) -> Result<Vec<BookRating>> {
    let rows: Vec<(i32, String, i32)> = books::table
        .inner_join(reviews::table)
        .select((books::id, books::title, reviews::rating))
        .order((books::id.asc(), reviews::id.asc()))
        .load(conn)?;
    Ok(book_ratings(&rows))
}

/// Author name of each reviewed book, keyed by book id.
///
/// # Errors
/// Returns an error if the query fails.
pub fn reviewed_book_authors(conn: &mut SqliteConnection) -> Result<Vec<(i32, Option<String>)>> {
    Ok(books::table
        .left_join(authors::table)
        .filter(books::id.eq_any(reviews::table.select(reviews::book_id)))
        .select((books::id, authors::name.nullable()))
        .load(conn)?)
}

/// Take `quantity` units out of a book's stock if enough are available.
///
/// Returns `false`, changing nothing, when the stock is too low or the book
/// does not exist.
///
/// # Errors
/// Returns an error if the update fails.
pub fn reserve_stock(conn: &mut SqliteConnection, id: i32, quantity: i32) -> Result<bool> {
    let updated = diesel::update(
        books::table
            .filter(books::id.eq(id))
            .filter(books::stock_quantity.ge(quantity)),
    )
    .set((
        books::stock_quantity.eq(books::stock_quantity - quantity),
        books::updated_at.eq(now),
    ))
    .execute(conn)?;
    Ok(updated == 1)
}
