//! The eight practice exercises and their checker.
//!
//! Each exercise is a plain function over a borrowed connection, so the
//! checker can run the mutating ones inside a transaction that is always
//! rolled back.

use std::collections::HashMap;

use diesel::prelude::*;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::adapter::outbound::sqlite::store::rolled_back;
use crate::adapter::outbound::sqlite::{author, book, category, customer, order, review};
use crate::domain::review::{is_valid_rating, MAX_RATING, MIN_RATING};
use crate::domain::stats::rank_by_rating;
use crate::domain::{NewReview, OrderLine, OrderStatus, Price};
use crate::error::{Error, Result};

/// A reviewed book ranked by its average rating.
#[derive(Debug, Clone, PartialEq)]
pub struct TopRatedBook {
    pub title: String,
    pub author: String,
    pub average_rating: f64,
    pub review_count: usize,
}

/// Exercise 1: every category name, alphabetically.
///
/// # Errors
/// Returns an error if the query fails.
pub fn category_names(conn: &mut SqliteConnection) -> Result<Vec<String>> {
    category::names(conn)
}

/// Exercise 2: `(title, price)` of books costing at least `min_price`,
/// most expensive first.
///
/// # Errors
/// Returns an error if the query fails.
pub fn expensive_books(
    conn: &mut SqliteConnection,
    min_price: Price,
) -> Result<Vec<(String, Price)>> {
    Ok(book::at_least(conn, min_price)?
        .into_iter()
        .map(|listing| (listing.title, listing.price))
        .collect())
}

/// Exercise 3: titles by authors whose name contains `name`, ignoring case.
///
/// # Errors
/// Returns an error if the query fails.
pub fn books_by_author(conn: &mut SqliteConnection, name: &str) -> Result<Vec<String>> {
    book::titles_by_author_containing(conn, name)
}

/// Exercise 4: `(author, book count)` for authors with at least one book,
/// most prolific first, then by name.
///
/// # Errors
/// Returns an error if the query fails.
pub fn author_book_counts(conn: &mut SqliteConnection) -> Result<Vec<(String, i64)>> {
    let mut counts: Vec<(String, i64)> = author::with_book_counts(conn)?
        .into_iter()
        .map(|row| (row.name, row.book_count))
        .collect();
    counts.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
    Ok(counts)
}

/// Exercise 5: review the book titled `book_title` as `customer_email`.
///
/// Returns the new review id, or `None` when the book or customer is
/// unknown or this customer already reviewed the book.
///
/// # Errors
/// Returns [`Error::Validation`] for a rating outside 1..=5.
pub fn add_review(
    conn: &mut SqliteConnection,
    book_title: &str,
    customer_email: &str,
    rating: i32,
    comment: Option<&str>,
) -> Result<Option<i32>> {
    if !is_valid_rating(rating) {
        return Err(Error::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    let Some(found) = book::find_by_title(conn, book_title)? else {
        debug!(book_title, "No book with this title");
        return Ok(None);
    };
    let Some(reviewer) = customer::find_by_email(conn, customer_email)? else {
        debug!(customer_email, "No customer with this email");
        return Ok(None);
    };

    let created = review::create(
        conn,
        &NewReview {
            book_id: found.id,
            customer_id: reviewer.id,
            rating,
            comment: comment.map(str::to_string),
        },
    )?;
    Ok(created.map(|r| r.id))
}

/// Exercise 6: take `percent` off every book in the named category.
///
/// Returns the number of books repriced; an unknown category reprices none.
///
/// # Errors
/// Returns [`Error::Validation`] when `percent` is outside 0..=100.
pub fn apply_discount(
    conn: &mut SqliteConnection,
    category_name: &str,
    percent: Decimal,
) -> Result<usize> {
    let hundred = Decimal::ONE_HUNDRED;
    if percent < Decimal::ZERO || percent > hundred {
        return Err(Error::Validation(format!(
            "discount must be between 0 and 100 percent, got {percent}"
        )));
    }
    let Some(target) = category::find_by_name(conn, category_name)? else {
        return Ok(0);
    };
    let factor = (hundred - percent) / hundred;
    let updated = book::scale_category_prices(conn, target.id, factor)?;
    info!(category = category_name, %percent, updated, "Applied discount");
    Ok(updated)
}

/// Exercise 7: the `limit` best-rated reviewed books with their author.
///
/// # Errors
/// Returns an error if either query fails.
pub fn top_rated_books(conn: &mut SqliteConnection, limit: usize) -> Result<Vec<TopRatedBook>> {
    let mut ratings = book::ratings(conn)?;
    rank_by_rating(&mut ratings, limit);
    let authors: HashMap<i32, Option<String>> =
        book::reviewed_book_authors(conn)?.into_iter().collect();

    Ok(ratings
        .into_iter()
        .map(|rating| TopRatedBook {
            author: authors
                .get(&rating.book_id)
                .cloned()
                .flatten()
                .unwrap_or_else(|| "Unknown".to_string()),
            title: rating.title,
            average_rating: rating.average_rating,
            review_count: rating.review_count,
        })
        .collect())
}

/// Exercise 8: place an order of `(isbn, quantity)` items for a customer.
///
/// Everything happens in one transaction: the order, its items at the
/// current price, the stock decrements and the total. An unknown customer
/// or book, a non-positive quantity, an empty item list or too little stock
/// rolls the whole order back and yields `None`.
///
/// # Errors
/// Returns an error if a statement fails.
pub fn create_order(
    conn: &mut SqliteConnection,
    customer_email: &str,
    items: &[(&str, i32)],
) -> Result<Option<i32>> {
    if items.is_empty() || items.iter().any(|(_, quantity)| *quantity <= 0) {
        return Ok(None);
    }
    let Some(buyer) = customer::find_by_email(conn, customer_email)? else {
        return Ok(None);
    };

    let placed = conn.transaction::<_, Error, _>(|conn| {
        let mut lines = Vec::with_capacity(items.len());
        for (isbn, quantity) in items {
            let Some(found) = book::find_by_isbn(conn, isbn)? else {
                debug!(isbn, "Unknown book, abandoning order");
                return Err(diesel::result::Error::RollbackTransaction.into());
            };
            if !book::reserve_stock(conn, found.id, *quantity)? {
                debug!(isbn, quantity, stock = found.stock_quantity, "Insufficient stock");
                return Err(diesel::result::Error::RollbackTransaction.into());
            }
            lines.push(OrderLine {
                book_id: found.id,
                quantity: *quantity,
                price_at_purchase: found.price,
            });
        }
        let details = order::create(conn, buyer.id, OrderStatus::Pending, &lines)?;
        Ok(details.order.id)
    });

    match placed {
        Ok(id) => Ok(Some(id)),
        Err(Error::Database(diesel::result::Error::RollbackTransaction)) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Outcome of one exercise in the checker.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ExerciseCheck {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl ExerciseCheck {
    fn from_outcome(name: &'static str, outcome: Result<Option<String>>) -> Self {
        match outcome {
            Ok(Some(detail)) => Self {
                name,
                passed: true,
                detail,
            },
            Ok(None) => Self {
                name,
                passed: false,
                detail: "returned None/empty".to_string(),
            },
            Err(err) => Self {
                name,
                passed: false,
                detail: format!("Error: {err}"),
            },
        }
    }
}

fn non_empty<T>(items: Vec<T>, describe: impl FnOnce(usize) -> String) -> Option<String> {
    (!items.is_empty()).then(|| describe(items.len()))
}

/// Run all eight exercises against the database.
///
/// The mutating exercises run in transactions that are always rolled back,
/// so the database is left as it was found.
pub fn check_all(conn: &mut SqliteConnection) -> Vec<ExerciseCheck> {
    let mut checks = Vec::with_capacity(8);

    checks.push(ExerciseCheck::from_outcome(
        "Exercise 1: Get all categories",
        category_names(conn).map(|names| non_empty(names, |n| format!("{n} categories"))),
    ));
    checks.push(ExerciseCheck::from_outcome(
        "Exercise 2: Filter expensive books",
        expensive_books(conn, Decimal::new(1500, 2))
            .map(|books| non_empty(books, |n| format!("{n} books at $15.00 or more"))),
    ));
    checks.push(ExerciseCheck::from_outcome(
        "Exercise 3: Get books by author",
        books_by_author(conn, "Agatha").map(|titles| non_empty(titles, |n| format!("{n} titles"))),
    ));
    checks.push(ExerciseCheck::from_outcome(
        "Exercise 4: Author book counts",
        author_book_counts(conn).map(|rows| non_empty(rows, |n| format!("{n} authors"))),
    ));

    checks.push(ExerciseCheck::from_outcome(
        "Exercise 5: Add review",
        rolled_back(conn, |conn| {
            let Some(reviewer) = customer::first(conn)? else {
                return Ok(None);
            };
            let Some(target) = book::first_unreviewed_by(conn, reviewer.id)? else {
                return Ok(None);
            };
            let created =
                add_review(conn, &target.title, &reviewer.email, 5, Some("Checker review"))?;
            Ok(created.map(|id| format!("review {id} stored and rolled back")))
        }),
    ));
    checks.push(ExerciseCheck::from_outcome(
        "Exercise 6: Apply discount",
        rolled_back(conn, |conn| {
            let updated = apply_discount(conn, "Fiction", Decimal::TEN)?;
            Ok((updated > 0).then(|| format!("{updated} books discounted and rolled back")))
        }),
    ));
    checks.push(ExerciseCheck::from_outcome(
        "Exercise 7: Top rated books",
        top_rated_books(conn, 5).map(|books| non_empty(books, |n| format!("{n} ranked books"))),
    ));
    checks.push(ExerciseCheck::from_outcome(
        "Exercise 8: Create order",
        rolled_back(conn, |conn| {
            let Some(buyer) = customer::first(conn)? else {
                return Ok(None);
            };
            let Some(isbn) = book::first_n(conn, 10)?
                .into_iter()
                .find(|b| b.stock_quantity > 0)
                .and_then(|b| b.isbn)
            else {
                return Ok(None);
            };
            Ok(create_order(conn, &buyer.email, &[(isbn.as_str(), 1)])?
                .map(|id| format!("order {id} placed and rolled back")))
        }),
    ));

    let passed = checks.iter().filter(|c| c.passed).count();
    info!(passed, total = checks.len(), "Checked exercises");
    checks
}
