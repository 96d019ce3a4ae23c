//! Sample bookstore data.
//!
//! Seeding is idempotent: catalog rows are upserts keyed on their unique
//! columns, and orders are only created while the orders table is empty.

use diesel::prelude::*;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::database::schema::{authors, books, categories, customers, order_items, orders, reviews};
use super::store::{count, Table};
use super::{author, book, category, customer, order, review};
use crate::domain::{
    NewAuthor, NewBook, NewCategory, NewCustomer, NewReview, OrderLine, OrderStatus, TableCounts,
};
use crate::error::{Error, Result};

const CATEGORIES: [(&str, &str); 5] = [
    ("Fiction", "Novels and short stories"),
    ("Non-Fiction", "Memoir, history and essays"),
    ("Mystery", "Detective fiction and thrillers"),
    ("Science Fiction", "Futures, robots and dystopias"),
    ("Fantasy", "Magic and other worlds"),
];

struct SeedAuthor {
    name: &'static str,
    email: &'static str,
    birth_year: i32,
    bio: &'static str,
}

const AUTHORS: [SeedAuthor; 7] = [
    SeedAuthor {
        name: "J.K. Rowling",
        email: "jk.rowling@example.com",
        birth_year: 1965,
        bio: "British author of the Harry Potter series.",
    },
    SeedAuthor {
        name: "George Orwell",
        email: "george.orwell@example.com",
        birth_year: 1903,
        bio: "English novelist and critic of totalitarianism.",
    },
    SeedAuthor {
        name: "Agatha Christie",
        email: "agatha.christie@example.com",
        birth_year: 1890,
        bio: "Best-selling novelist of all time.",
    },
    SeedAuthor {
        name: "Jane Austen",
        email: "jane.austen@example.com",
        birth_year: 1775,
        bio: "Novelist of the English landed gentry.",
    },
    SeedAuthor {
        name: "Mark Twain",
        email: "mark.twain@example.com",
        birth_year: 1835,
        bio: "American writer and humorist.",
    },
    SeedAuthor {
        name: "Isaac Asimov",
        email: "isaac.asimov@example.com",
        birth_year: 1920,
        bio: "Writer and professor of biochemistry.",
    },
    SeedAuthor {
        name: "Toni Morrison",
        email: "toni.morrison@example.com",
        birth_year: 1931,
        bio: "Nobel laureate in literature.",
    },
];

struct SeedBook {
    title: &'static str,
    isbn: &'static str,
    author_email: &'static str,
    category: &'static str,
    cents: i64,
    stock: i32,
}

const BOOKS: [SeedBook; 10] = [
    SeedBook {
        title: "Harry Potter and the Sorcerer's Stone",
        isbn: "978-0590353427",
        author_email: "jk.rowling@example.com",
        category: "Fantasy",
        cents: 2499,
        stock: 50,
    },
    SeedBook {
        title: "Harry Potter and the Chamber of Secrets",
        isbn: "978-0439064873",
        author_email: "jk.rowling@example.com",
        category: "Fantasy",
        cents: 2299,
        stock: 40,
    },
    SeedBook {
        title: "1984",
        isbn: "978-0451524935",
        author_email: "george.orwell@example.com",
        category: "Science Fiction",
        cents: 1599,
        stock: 30,
    },
    SeedBook {
        title: "Animal Farm",
        isbn: "978-0451526342",
        author_email: "george.orwell@example.com",
        category: "Fiction",
        cents: 999,
        stock: 45,
    },
    SeedBook {
        title: "Murder on the Orient Express",
        isbn: "978-0062693662",
        author_email: "agatha.christie@example.com",
        category: "Mystery",
        cents: 1699,
        stock: 20,
    },
    SeedBook {
        title: "And Then There Were None",
        isbn: "978-0062073488",
        author_email: "agatha.christie@example.com",
        category: "Mystery",
        cents: 1499,
        stock: 25,
    },
    SeedBook {
        title: "Pride and Prejudice",
        isbn: "978-0141439518",
        author_email: "jane.austen@example.com",
        category: "Fiction",
        cents: 1299,
        stock: 35,
    },
    SeedBook {
        title: "The Adventures of Tom Sawyer",
        isbn: "978-0143039563",
        author_email: "mark.twain@example.com",
        category: "Fiction",
        cents: 1199,
        stock: 15,
    },
    SeedBook {
        title: "Life on the Mississippi",
        isbn: "978-0140390506",
        author_email: "mark.twain@example.com",
        category: "Non-Fiction",
        cents: 1350,
        stock: 10,
    },
    SeedBook {
        title: "Foundation",
        isbn: "978-0553293357",
        author_email: "isaac.asimov@example.com",
        category: "Science Fiction",
        cents: 1799,
        stock: 22,
    },
];

const CUSTOMERS: [(&str, &str, &str, Option<&str>); 5] = [
    ("Alice", "Johnson", "alice@example.com", Some("555-0101")),
    ("Bob", "Smith", "bob@example.com", Some("555-0102")),
    ("Carol", "Williams", "carol@example.com", Some("555-0103")),
    ("David", "Brown", "david@example.com", None),
    ("Emma", "Davis", "emma@example.com", Some("555-0105")),
];

/// Customer email, status, and `(isbn, quantity)` lines.
const ORDERS: [(&str, OrderStatus, &[(&str, i32)]); 6] = [
    (
        "alice@example.com",
        OrderStatus::Delivered,
        &[("978-0590353427", 1), ("978-0451524935", 1)],
    ),
    ("bob@example.com", OrderStatus::Shipped, &[("978-0062693662", 2)]),
    ("carol@example.com", OrderStatus::Pending, &[("978-0451526342", 1)]),
    (
        "david@example.com",
        OrderStatus::Processing,
        &[("978-0141439518", 1), ("978-0143039563", 1)],
    ),
    ("alice@example.com", OrderStatus::Delivered, &[("978-0553293357", 1)]),
    ("emma@example.com", OrderStatus::Cancelled, &[("978-0062073488", 1)]),
];

/// Customer email, ISBN, rating, comment.
const REVIEWS: [(&str, &str, i32, &str); 8] = [
    ("alice@example.com", "978-0590353427", 5, "Magical from the first page."),
    ("bob@example.com", "978-0590353427", 4, "Great start to the series."),
    ("alice@example.com", "978-0451524935", 5, "Chilling and still relevant."),
    ("carol@example.com", "978-0451524935", 4, "Bleak but brilliant."),
    ("bob@example.com", "978-0062693662", 5, "Did not see the ending coming."),
    ("emma@example.com", "978-0062693662", 3, "Slow in the middle."),
    ("david@example.com", "978-0141439518", 4, "Witty and warm."),
    ("david@example.com", "978-0553293357", 5, "Big ideas, brisk pace."),
];

/// Insert the sample bookstore, leaving existing rows in place.
///
/// Returns the row counts once seeding has finished.
///
/// # Errors
/// Returns the first failing statement; nothing is written in that case.
pub fn seed(conn: &mut SqliteConnection) -> Result<TableCounts> {
    conn.transaction::<_, Error, _>(|conn| {
        let new_categories: Vec<NewCategory> = CATEGORIES
            .iter()
            .map(|(name, description)| NewCategory::new(*name, *description))
            .collect();
        let created = category::create_many(conn, &new_categories)?;
        debug!(created, "Seeded categories");

        for seed in &AUTHORS {
            author::upsert(
                conn,
                &NewAuthor {
                    name: seed.name.to_string(),
                    email: Some(seed.email.to_string()),
                    bio: Some(seed.bio.to_string()),
                    birth_year: Some(seed.birth_year),
                },
            )?;
        }

        for seed in &BOOKS {
            let author_id = author::find_by_email(conn, seed.author_email)?.map(|a| a.id);
            let category_id = category::find_by_name(conn, seed.category)?.map(|c| c.id);
            book::upsert(
                conn,
                &NewBook {
                    title: seed.title.to_string(),
                    isbn: Some(seed.isbn.to_string()),
                    author_id,
                    category_id,
                    price: Decimal::new(seed.cents, 2),
                    stock_quantity: seed.stock,
                    description: None,
                },
            )?;
        }

        let new_customers: Vec<NewCustomer> = CUSTOMERS
            .iter()
            .map(|(first, last, email, phone)| NewCustomer {
                first_name: (*first).to_string(),
                last_name: (*last).to_string(),
                email: (*email).to_string(),
                phone: phone.map(str::to_string),
            })
            .collect();
        let created = customer::insert_many(conn, &new_customers)?;
        debug!(created, "Seeded customers");

        if count(conn, Table::Orders)? == 0 {
            for (email, status, items) in &ORDERS {
                let Some(buyer) = customer::find_by_email(conn, email)? else {
                    continue;
                };
                let mut lines = Vec::with_capacity(items.len());
                for (isbn, quantity) in *items {
                    if let Some(found) = book::find_by_isbn(conn, isbn)? {
                        lines.push(OrderLine {
                            book_id: found.id,
                            quantity: *quantity,
                            price_at_purchase: found.price,
                        });
                    }
                }
                order::create(conn, buyer.id, *status, &lines)?;
            }
        }

        for (email, isbn, rating, comment) in &REVIEWS {
            let buyer = customer::find_by_email(conn, email)?;
            let found = book::find_by_isbn(conn, isbn)?;
            if let (Some(buyer), Some(found)) = (buyer, found) {
                review::create(
                    conn,
                    &NewReview {
                        book_id: found.id,
                        customer_id: buyer.id,
                        rating: *rating,
                        comment: Some((*comment).to_string()),
                    },
                )?;
            }
        }

        let counts = table_counts(conn)?;
        info!(
            authors = counts.authors,
            books = counts.books,
            orders = counts.orders,
            reviews = counts.reviews,
            "Seeded bookstore"
        );
        Ok(counts)
    })
}

/// Delete every row and restart the id sequences.
///
/// # Errors
/// Returns the first failing statement; nothing is deleted in that case.
pub fn clear(conn: &mut SqliteConnection) -> Result<usize> {
    conn.transaction::<_, Error, _>(|conn| {
        let mut deleted = 0;
        deleted += diesel::delete(reviews::table).execute(conn)?;
        deleted += diesel::delete(order_items::table).execute(conn)?;
        deleted += diesel::delete(orders::table).execute(conn)?;
        deleted += diesel::delete(books::table).execute(conn)?;
        deleted += diesel::delete(authors::table).execute(conn)?;
        deleted += diesel::delete(categories::table).execute(conn)?;
        deleted += diesel::delete(customers::table).execute(conn)?;
        diesel::sql_query("DELETE FROM sqlite_sequence").execute(conn)?;
        info!(deleted, "Cleared bookstore");
        Ok(deleted)
    })
}

fn table_counts(conn: &mut SqliteConnection) -> Result<TableCounts> {
    Ok(TableCounts {
        authors: count(conn, Table::Authors)?,
        books: count(conn, Table::Books)?,
        categories: count(conn, Table::Categories)?,
        customers: count(conn, Table::Customers)?,
        orders: count(conn, Table::Orders)?,
        reviews: count(conn, Table::Reviews)?,
    })
}
