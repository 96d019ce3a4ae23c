//! Author queries.

use diesel::dsl::count;
use diesel::prelude::*;
use tracing::debug;

use super::database::model::{AuthorRow, BookRow, NewAuthorRow};
use super::database::schema::{authors, books};
use super::store::contains_pattern;
use crate::domain::money::price_from_f64;
use crate::domain::{Author, AuthorBookCount, AuthorWithBooks, BookListing, NewAuthor};
use crate::error::{Error, Result};

/// All authors ordered by name.
///
/// # Errors
/// Returns an error if the query fails.
pub fn list_by_name(conn: &mut SqliteConnection) -> Result<Vec<Author>> {
    let rows: Vec<AuthorRow> = authors::table
        .select(AuthorRow::as_select())
        .order(authors::name.asc())
        .load(conn)?;
    Ok(rows.into_iter().map(Author::from).collect())
}

/// First author whose name contains `term`.
///
/// # Errors
/// Returns an error if the query fails.
pub fn find_by_name_containing(conn: &mut SqliteConnection, term: &str) -> Result<Option<Author>> {
    let row: Option<AuthorRow> = authors::table
        .select(AuthorRow::as_select())
        .filter(authors::name.like(contains_pattern(term)).escape('\\'))
        .order(authors::id.asc())
        .first(conn)
        .optional()?;
    Ok(row.map(Author::from))
}

/// Author with the given email.
///
/// # Errors
/// Returns an error if the query fails.
pub fn find_by_email(conn: &mut SqliteConnection, email: &str) -> Result<Option<Author>> {
    let row: Option<AuthorRow> = authors::table
        .select(AuthorRow::as_select())
        .filter(authors::email.eq(email))
        .first(conn)
        .optional()?;
    Ok(row.map(Author::from))
}

/// Create an author keyed on email, leaving an existing row untouched.
///
/// Authors without an email have no unique key and are always inserted.
///
/// # Errors
/// Returns an error if the insert or the lookup fails.
pub fn upsert(conn: &mut SqliteConnection, author: &NewAuthor) -> Result<Author> {
    let row = NewAuthorRow::from(author);
    conn.transaction::<_, Error, _>(|conn| {
        let inserted: AuthorRow = match author.email.as_deref() {
            Some(email) => {
                let created = diesel::insert_into(authors::table)
                    .values(&row)
                    .on_conflict(authors::email)
                    .do_nothing()
                    .execute(conn)?;
                debug!(email, created, "Upserted author");
                authors::table
                    .select(AuthorRow::as_select())
                    .filter(authors::email.eq(email))
                    .first(conn)?
            }
            None => diesel::insert_into(authors::table)
                .values(&row)
                .returning(AuthorRow::as_returning())
                .get_result(conn)?,
        };
        Ok(Author::from(inserted))
    })
}

/// The first `limit` authors with the title and price of each of their books.
///
/// # Errors
/// Returns an error if either query fails.
pub fn with_books(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<AuthorWithBooks>> {
    let parents: Vec<AuthorRow> = authors::table
        .select(AuthorRow::as_select())
        .order(authors::id.asc())
        .limit(limit)
        .load(conn)?;

    let children: Vec<BookRow> = BookRow::belonging_to(&parents)
        .select(BookRow::as_select())
        .order(books::title.asc())
        .load(conn)?;

    Ok(children
        .grouped_by(&parents)
        .into_iter()
        .zip(parents)
        .map(|(books, author)| AuthorWithBooks {
            author: Author::from(author),
            books: books
                .into_iter()
                .map(|book| BookListing {
                    title: book.title,
                    price: price_from_f64(book.price),
                })
                .collect(),
        })
        .collect())
}

/// Authors that have at least one book, with their book count, by name.
///
/// # Errors
/// Returns an error if the query fails.
pub fn with_book_counts(conn: &mut SqliteConnection) -> Result<Vec<AuthorBookCount>> {
    let rows: Vec<(i32, String, i64)> = authors::table
        .inner_join(books::table)
        .group_by((authors::id, authors::name))
        .select((authors::id, authors::name, count(books::id)))
        .order(authors::name.asc())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(author_id, name, book_count)| AuthorBookCount {
            author_id,
            name,
            book_count,
        })
        .collect())
}
