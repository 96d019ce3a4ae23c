//! Book reviews.

use chrono::NaiveDateTime;

/// A customer's review of a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: i32,
    pub book_id: i32,
    pub customer_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Fields for creating a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub book_id: i32,
    pub customer_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Lowest accepted rating.
pub const MIN_RATING: i32 = 1;
/// Highest accepted rating.
pub const MAX_RATING: i32 = 5;

/// True when `rating` is within the accepted 1..=5 range.
#[must_use]
pub fn is_valid_rating(rating: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}
