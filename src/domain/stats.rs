//! Aggregate statistics over loaded rows.
//!
//! Lessons issue filtered queries and then reduce the returned rows here:
//! counting related records and averaging derived metrics such as price or
//! rating. Nothing in this module touches the database.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::catalog::Category;
use super::money::{round_cents, Price};
use super::order::OrderLine;

/// Row counts for every table, gathered concurrently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub authors: i64,
    pub books: i64,
    pub categories: i64,
    pub customers: i64,
    pub orders: i64,
    pub reviews: i64,
}

impl TableCounts {
    /// Counts paired with display labels, in table order.
    #[must_use]
    pub fn labelled(&self) -> [(&'static str, i64); 6] {
        [
            ("Authors", self.authors),
            ("Books", self.books),
            ("Categories", self.categories),
            ("Customers", self.customers),
            ("Orders", self.orders),
            ("Reviews", self.reviews),
        ]
    }
}

/// Mean of a set of prices, rounded to cents.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn average_price(prices: &[Price]) -> Option<Price> {
    if prices.is_empty() {
        return None;
    }
    let total: Decimal = prices.iter().sum();
    Some(round_cents(total / Decimal::from(prices.len())))
}

/// Mean of a set of ratings. Returns `None` for an empty slice.
#[must_use]
pub fn average_rating(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let total: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    Some(total as f64 / ratings.len() as f64)
}

/// Sum of price times quantity over all lines.
#[must_use]
pub fn order_total(lines: &[OrderLine]) -> Price {
    round_cents(lines.iter().map(OrderLine::subtotal).sum())
}

/// Book count and average price for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category_id: i32,
    pub name: String,
    pub book_count: usize,
    pub average_price: Option<Price>,
}

/// Group book prices under their categories.
///
/// Every category appears in the output, in input order, even when it has no
/// books. Books without a category, or pointing at a category not in
/// `categories`, are skipped.
#[must_use]
pub fn category_summaries(
    categories: &[Category],
    books: &[(Option<i32>, Price)],
) -> Vec<CategorySummary> {
    let mut prices_by_category: HashMap<i32, Vec<Price>> = HashMap::new();
    for (category_id, price) in books {
        if let Some(id) = category_id {
            prices_by_category.entry(*id).or_default().push(*price);
        }
    }

    categories
        .iter()
        .map(|category| {
            let prices = prices_by_category
                .get(&category.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            CategorySummary {
                category_id: category.id,
                name: category.name.clone(),
                book_count: prices.len(),
                average_price: average_price(prices),
            }
        })
        .collect()
}

/// Review count and average rating for one book.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRating {
    pub book_id: i32,
    pub title: String,
    pub review_count: usize,
    pub average_rating: f64,
}

/// Collapse `(book_id, title, rating)` rows into one entry per book.
///
/// Books keep the order in which they first appear in `rows`.
#[must_use]
pub fn book_ratings(rows: &[(i32, String, i32)]) -> Vec<BookRating> {
    let mut order: Vec<i32> = Vec::new();
    let mut grouped: HashMap<i32, (String, Vec<i32>)> = HashMap::new();

    for (book_id, title, rating) in rows {
        grouped
            .entry(*book_id)
            .or_insert_with(|| {
                order.push(*book_id);
                (title.clone(), Vec::new())
            })
            .1
            .push(*rating);
    }

    order
        .into_iter()
        .filter_map(|book_id| {
            let (title, ratings) = grouped.remove(&book_id)?;
            Some(BookRating {
                book_id,
                title,
                review_count: ratings.len(),
                average_rating: average_rating(&ratings)?,
            })
        })
        .collect()
}

/// Sort ratings best first, breaking ties by title, and keep `limit`.
pub fn rank_by_rating(ratings: &mut Vec<BookRating>, limit: usize) {
    ratings.sort_by(|left, right| {
        right
            .average_rating
            .total_cmp(&left.average_rating)
            .then_with(|| left.title.cmp(&right.title))
    });
    ratings.truncate(limit);
}
