//! Authors, categories and books.

use chrono::NaiveDateTime;

use super::money::Price;

/// A book author.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub birth_year: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl Author {
    /// Birth year for display, `"unknown"` when not recorded.
    #[must_use]
    pub fn birth_year_label(&self) -> String {
        self.birth_year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Fields for creating an author.
#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub name: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub birth_year: Option<i32>,
}

/// A book category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Fields for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
        }
    }
}

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub isbn: Option<String>,
    pub author_id: Option<i32>,
    pub category_id: Option<i32>,
    pub price: Price,
    pub stock_quantity: i32,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fields for creating a book.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub isbn: Option<String>,
    pub author_id: Option<i32>,
    pub category_id: Option<i32>,
    pub price: Price,
    pub stock_quantity: i32,
    pub description: Option<String>,
}

/// Title and price projection.
#[derive(Debug, Clone, PartialEq)]
pub struct BookListing {
    pub title: String,
    pub price: Price,
}

/// Title, price and stock projection.
#[derive(Debug, Clone, PartialEq)]
pub struct BookStock {
    pub title: String,
    pub price: Price,
    pub stock_quantity: i32,
}

/// A book title with the name of its category, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookWithCategory {
    pub title: String,
    pub category: Option<String>,
}

/// A book together with its author and category names.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBook {
    pub title: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub price: Price,
}

impl SampleBook {
    #[must_use]
    pub fn author_label(&self) -> &str {
        self.author.as_deref().unwrap_or("Unknown")
    }

    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("Uncategorized")
    }
}

/// An author with the title and price of each of their books.
#[derive(Debug, Clone)]
pub struct AuthorWithBooks {
    pub author: Author,
    pub books: Vec<BookListing>,
}

/// An author name with the number of books they wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorBookCount {
    pub author_id: i32,
    pub name: String,
    pub book_count: i64,
}

/// A book with the name and birth year of its author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookByAuthor {
    pub title: String,
    pub author: String,
    pub birth_year: Option<i32>,
}
