//! Database model types for Diesel ORM.
//!
//! Rows mirror the tables one-to-one. Conversion into domain types happens
//! here so that REAL prices become cent-rounded decimals and status text
//! becomes [`OrderStatus`] before leaving the adapter.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::{authors, books, categories, customers, order_items, orders, reviews};
use crate::domain::money::{price_from_f64, price_to_f64};
use crate::domain::{
    Author, Book, Category, Customer, NewAuthor, NewBook, NewCategory, NewCustomer, NewReview,
    Order, OrderItem, OrderLine, OrderStatus, Review,
};
use crate::error::{Error, Result};

/// Database row for an author.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = authors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AuthorRow {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub birth_year: Option<i32>,
    pub created_at: NaiveDateTime,
}

/// Database row for an author (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = authors)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewAuthorRow<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub birth_year: Option<i32>,
}

/// Database row for a category.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Database row for a category (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = categories)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewCategoryRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
}

/// Database row for a book.
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(table_name = books)]
#[diesel(belongs_to(AuthorRow, foreign_key = author_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BookRow {
    pub id: i32,
    pub title: String,
    pub isbn: Option<String>,
    pub author_id: Option<i32>,
    pub category_id: Option<i32>,
    pub price: f64,
    pub stock_quantity: i32,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database row for a book (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = books)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewBookRow<'a> {
    pub title: &'a str,
    pub isbn: Option<&'a str>,
    pub author_id: Option<i32>,
    pub category_id: Option<i32>,
    pub price: f64,
    pub stock_quantity: i32,
    pub description: Option<&'a str>,
}

/// Database row for a customer.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CustomerRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Database row for a customer (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = customers)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewCustomerRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
}

/// Database row for an order.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderRow {
    pub id: i32,
    pub customer_id: Option<i32>,
    pub order_date: NaiveDateTime,
    pub status: String,
    pub total_amount: f64,
}

/// Database row for an order (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub customer_id: Option<i32>,
    pub status: &'a str,
    pub total_amount: f64,
}

/// Database row for an order item.
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
    pub book_id: Option<i32>,
    pub quantity: i32,
    pub price_at_purchase: f64,
}

/// Database row for an order item (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i32,
    pub book_id: Option<i32>,
    pub quantity: i32,
    pub price_at_purchase: f64,
}

/// Database row for a review.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReviewRow {
    pub id: i32,
    pub book_id: i32,
    pub customer_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Database row for a review (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = reviews)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewReviewRow<'a> {
    pub book_id: i32,
    pub customer_id: i32,
    pub rating: i32,
    pub comment: Option<&'a str>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            bio: row.bio,
            birth_year: row.birth_year,
            created_at: row.created_at,
        }
    }
}

impl<'a> From<&'a NewAuthor> for NewAuthorRow<'a> {
    fn from(author: &'a NewAuthor) -> Self {
        Self {
            name: &author.name,
            email: author.email.as_deref(),
            bio: author.bio.as_deref(),
            birth_year: author.birth_year,
        }
    }
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

impl<'a> From<&'a NewCategory> for NewCategoryRow<'a> {
    fn from(category: &'a NewCategory) -> Self {
        Self {
            name: &category.name,
            description: category.description.as_deref(),
        }
    }
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            isbn: row.isbn,
            author_id: row.author_id,
            category_id: row.category_id,
            price: price_from_f64(row.price),
            stock_quantity: row.stock_quantity,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl<'a> From<&'a NewBook> for NewBookRow<'a> {
    fn from(book: &'a NewBook) -> Self {
        Self {
            title: &book.title,
            isbn: book.isbn.as_deref(),
            author_id: book.author_id,
            category_id: book.category_id,
            price: price_to_f64(book.price),
            stock_quantity: book.stock_quantity,
            description: book.description.as_deref(),
        }
    }
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

impl<'a> From<&'a NewCustomer> for NewCustomerRow<'a> {
    fn from(customer: &'a NewCustomer) -> Self {
        Self {
            first_name: &customer.first_name,
            last_name: &customer.last_name,
            email: &customer.email,
            phone: customer.phone.as_deref(),
        }
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = Error;

    fn try_from(row: OrderRow) -> Result<Self> {
        let status: OrderStatus = row
            .status
            .parse()
            .map_err(|e: crate::domain::order::UnknownStatus| Error::Validation(e.to_string()))?;
        Ok(Self {
            id: row.id,
            customer_id: row.customer_id,
            order_date: row.order_date,
            status,
            total_amount: price_from_f64(row.total_amount),
        })
    }
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            book_id: row.book_id,
            quantity: row.quantity,
            price_at_purchase: price_from_f64(row.price_at_purchase),
        }
    }
}

impl NewOrderItemRow {
    /// Build the insertable row for `line` under `order_id`.
    #[must_use]
    pub fn for_line(order_id: i32, line: &OrderLine) -> Self {
        Self {
            order_id,
            book_id: Some(line.book_id),
            quantity: line.quantity,
            price_at_purchase: price_to_f64(line.price_at_purchase),
        }
    }
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            book_id: row.book_id,
            customer_id: row.customer_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

impl<'a> From<&'a NewReview> for NewReviewRow<'a> {
    fn from(review: &'a NewReview) -> Self {
        Self {
            book_id: review.book_id,
            customer_id: review.customer_id,
            rating: review.rating,
            comment: review.comment.as_deref(),
        }
    }
}
