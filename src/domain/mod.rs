//! Bookstore domain types.
//!
//! Plain data carried between the persistence adapter and the lessons,
//! plus the row reductions in [`stats`].

pub mod catalog;
pub mod customer;
pub mod money;
pub mod order;
pub mod review;
pub mod stats;

pub use catalog::{
    Author, AuthorBookCount, AuthorWithBooks, Book, BookByAuthor, BookListing, BookStock,
    BookWithCategory, Category, NewAuthor, NewBook, NewCategory, SampleBook,
};
pub use customer::{Customer, CustomerOrders, NewCustomer};
pub use money::Price;
pub use order::{
    Order, OrderDetails, OrderItem, OrderItemDetail, OrderLine, OrderStatus, OrderSummary,
};
pub use review::{NewReview, Review};
pub use stats::{BookRating, CategorySummary, TableCounts};
