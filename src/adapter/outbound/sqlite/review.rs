//! Review queries.

use diesel::prelude::*;

use super::database::model::{NewReviewRow, ReviewRow};
use super::database::schema::reviews;
use crate::domain::review::is_valid_rating;
use crate::domain::{NewReview, Review};
use crate::error::{Error, Result};

/// Store a review unless this customer already reviewed this book.
///
/// Returns `None` for a duplicate.
///
/// # Errors
/// Returns [`Error::Validation`] for a rating outside 1..=5, or an error if
/// the insert fails.
pub fn create(conn: &mut SqliteConnection, review: &NewReview) -> Result<Option<Review>> {
    if !is_valid_rating(review.rating) {
        return Err(Error::Validation(format!(
            "rating must be between 1 and 5, got {}",
            review.rating
        )));
    }
    let row: Option<ReviewRow> = diesel::insert_into(reviews::table)
        .values(NewReviewRow::from(review))
        .on_conflict((reviews::book_id, reviews::customer_id))
        .do_nothing()
        .returning(ReviewRow::as_returning())
        .get_result(conn)
        .optional()?;
    Ok(row.map(Review::from))
}

/// All reviews of a book, oldest first.
///
/// # Errors
/// Returns an error if the query fails.
pub fn for_book(conn: &mut SqliteConnection, book_id: i32) -> Result<Vec<Review>> {
    let rows: Vec<ReviewRow> = reviews::table
        .select(ReviewRow::as_select())
        .filter(reviews::book_id.eq(book_id))
        .order(reviews::id.asc())
        .load(conn)?;
    Ok(rows.into_iter().map(Review::from).collect())
}
