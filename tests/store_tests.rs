use bookstore::adapter::outbound::sqlite::store::rolled_back;
use bookstore::adapter::outbound::sqlite::{
    author, book, category, customer, order, raw, review, seed, Table,
};
use bookstore::domain::{NewAuthor, NewCategory, NewCustomer, NewReview, OrderLine, OrderStatus};
use bookstore::error::Error;
use bookstore::testkit::TempDb;
use rust_decimal_macros::dec;

mod support;

use support::assertions::{assert_price, assert_sorted_desc};

#[tokio::test]
async fn table_counts_cover_seeded_rows() {
    let db = TempDb::seeded().unwrap();
    let counts = db.store().table_counts().await.unwrap();

    assert_eq!(counts.authors, 7);
    assert_eq!(counts.books, 10);
    assert_eq!(counts.categories, 5);
    assert_eq!(counts.customers, 5);
    assert_eq!(counts.orders, 6);
    assert_eq!(counts.reviews, 8);
}

#[tokio::test]
async fn count_tables_keeps_requested_order() {
    let db = TempDb::seeded().unwrap();
    let counts = db
        .store()
        .count_tables(&[Table::Orders, Table::Authors])
        .await
        .unwrap();
    assert_eq!(counts, vec![(Table::Orders, 6), (Table::Authors, 7)]);
}

#[test]
fn seeding_twice_changes_nothing() {
    let db = TempDb::seeded().unwrap();
    let again = db.with_conn(seed::seed).unwrap();
    assert_eq!(again.books, 10);
    assert_eq!(again.orders, 6);
    assert_eq!(again.reviews, 8);
}

#[test]
fn clear_then_seed_restarts_ids() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    assert!(seed::clear(&mut conn).unwrap() > 0);
    assert_eq!(author::list_by_name(&mut conn).unwrap().len(), 0);

    seed::seed(&mut conn).unwrap();
    let fiction = category::find_by_name(&mut conn, "Fiction").unwrap().unwrap();
    assert_eq!(fiction.id, 1);
}

#[test]
fn author_lookups() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();

    let names: Vec<String> = author::list_by_name(&mut conn)
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names.first().map(String::as_str), Some("Agatha Christie"));
    assert_eq!(names.len(), 7);

    let rowling = author::find_by_name_containing(&mut conn, "rowling")
        .unwrap()
        .unwrap();
    assert_eq!(rowling.name, "J.K. Rowling");
    assert_eq!(rowling.birth_year_label(), "1965");
}

#[test]
fn author_upsert_leaves_existing_row() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let new = NewAuthor {
        name: "Renamed".to_string(),
        email: Some("george.orwell@example.com".to_string()),
        bio: None,
        birth_year: None,
    };
    let stored = author::upsert(&mut conn, &new).unwrap();
    assert_eq!(stored.name, "George Orwell");
    assert_eq!(stored.birth_year, Some(1903));
}

#[test]
fn authors_with_books_include_bookless_authors() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let all = author::with_books(&mut conn, 10).unwrap();

    let morrison = all
        .iter()
        .find(|entry| entry.author.name == "Toni Morrison")
        .unwrap();
    assert!(morrison.books.is_empty());

    let rowling = all
        .iter()
        .find(|entry| entry.author.name == "J.K. Rowling")
        .unwrap();
    assert_eq!(rowling.books.len(), 2);
}

#[test]
fn book_counts_skip_authors_without_books() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let counts = author::with_book_counts(&mut conn).unwrap();
    assert_eq!(counts.len(), 6);
    assert!(counts.iter().all(|row| row.book_count >= 1));
    assert!(!counts.iter().any(|row| row.name == "Toni Morrison"));
}

#[test]
fn category_batch_skips_duplicates_and_deletes_by_name() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let batch = [
        NewCategory::new("Fiction", "duplicate"),
        NewCategory::new("Poetry", "Verse"),
    ];
    assert_eq!(category::create_many(&mut conn, &batch).unwrap(), 1);
    assert_eq!(category::create_many(&mut conn, &batch).unwrap(), 0);

    let summaries = category::summaries(&mut conn).unwrap();
    let poetry = summaries.iter().find(|s| s.name == "Poetry").unwrap();
    assert_eq!(poetry.book_count, 0);
    assert_eq!(poetry.average_price, None);

    assert_eq!(
        category::delete_by_names(&mut conn, &["Poetry", "Drama"]).unwrap(),
        1
    );
}

#[test]
fn category_summaries_average_prices() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let summaries = category::summaries(&mut conn).unwrap();
    let fantasy = summaries.iter().find(|s| s.name == "Fantasy").unwrap();
    assert_eq!(fantasy.book_count, 2);
    assert_eq!(fantasy.average_price, Some(dec!(23.99)));
}

#[test]
fn price_filters_order_results() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();

    let cheap = book::cheaper_than(&mut conn, dec!(15)).unwrap();
    assert!(cheap.iter().all(|b| b.price < dec!(15)));
    assert_eq!(cheap.first().map(|b| b.title.as_str()), Some("Animal Farm"));

    let pricey = book::at_least(&mut conn, dec!(15)).unwrap();
    let prices: Vec<_> = pricey.iter().map(|b| b.price).collect();
    assert_sorted_desc(&prices);
    assert_eq!(pricey.len(), 5);
}

#[test]
fn pagination_walks_titles_in_order() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let first = book::list_by_title(&mut conn, 3, 0).unwrap();
    let second = book::list_by_title(&mut conn, 3, 3).unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(first[0].title, "1984");
    assert!(first[2].title < second[0].title);
}

#[test]
fn title_search_ignores_case_and_escapes_wildcards() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();

    let titles = book::search_titles(&mut conn, "THE").unwrap();
    assert!(titles.contains(&"The Adventures of Tom Sawyer".to_string()));
    assert!(titles.contains(&"Murder on the Orient Express".to_string()));

    assert!(book::search_titles(&mut conn, "%").unwrap().is_empty());
    assert!(book::search_titles(&mut conn, "_").unwrap().is_empty());
}

#[test]
fn books_in_categories_carry_category_names() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let mystery = category::find_by_name(&mut conn, "Mystery").unwrap().unwrap();
    let found = book::in_categories(&mut conn, &[mystery.id]).unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|b| b.category.as_deref() == Some("Mystery")));
}

#[test]
fn stock_and_price_updates() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let novel = book::find_by_isbn(&mut conn, "978-0451524935").unwrap().unwrap();

    let restocked = book::increment_stock(&mut conn, novel.id, 5).unwrap();
    assert_eq!(restocked.stock_quantity, novel.stock_quantity + 5);

    let repriced = book::set_price(&mut conn, novel.id, dec!(19.50)).unwrap();
    assert_price(repriced.price, dec!(19.50));

    let missing = book::increment_stock(&mut conn, 9_999, 1).unwrap_err();
    assert!(missing.is_not_found());
}

#[test]
fn category_discount_rounds_to_cents() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let mystery = category::find_by_name(&mut conn, "Mystery").unwrap().unwrap();

    let updated = book::scale_category_prices(&mut conn, mystery.id, dec!(0.95)).unwrap();
    assert_eq!(updated, 2);

    let orient = book::find_by_isbn(&mut conn, "978-0062693662").unwrap().unwrap();
    assert_price(orient.price, dec!(16.14));
}

#[test]
fn reserve_stock_refuses_overdraw() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let sawyer = book::find_by_isbn(&mut conn, "978-0143039563").unwrap().unwrap();

    assert!(!book::reserve_stock(&mut conn, sawyer.id, sawyer.stock_quantity + 1).unwrap());
    assert!(book::reserve_stock(&mut conn, sawyer.id, sawyer.stock_quantity).unwrap());
    let after = book::find_by_isbn(&mut conn, "978-0143039563").unwrap().unwrap();
    assert_eq!(after.stock_quantity, 0);
}

#[test]
fn samples_fall_back_for_missing_relations() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let novel = book::find_by_isbn(&mut conn, "978-0451524935").unwrap().unwrap();
    category::delete_by_names(&mut conn, &["Science Fiction"]).unwrap();

    let samples = book::samples(&mut conn, 20).unwrap();
    let orphan = samples.iter().find(|s| s.title == novel.title).unwrap();
    assert_eq!(orphan.category_label(), "Uncategorized");
    assert_eq!(orphan.author_label(), "George Orwell");
}

#[test]
fn older_authors_are_filtered_through_the_join() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let classics = book::by_authors_born_before(&mut conn, 1900).unwrap();
    assert!(classics.iter().all(|b| b.birth_year.unwrap_or(i32::MAX) < 1900));
    assert!(classics.iter().any(|b| b.title == "Pride and Prejudice"));
    assert!(!classics.iter().any(|b| b.author == "George Orwell"));
}

#[test]
fn customer_upsert_updates_phone() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let created = customer::upsert_phone(
        &mut conn,
        &NewCustomer::new("New", "User", "newuser@example.com", "555-9999"),
    )
    .unwrap();
    let updated = customer::upsert_phone(
        &mut conn,
        &NewCustomer::new("Ignored", "Name", "newuser@example.com", "555-0000"),
    )
    .unwrap();
    assert_eq!(created.id, updated.id);
    assert_eq!(updated.first_name, "New");
    assert_eq!(updated.phone.as_deref(), Some("555-0000"));
}

#[test]
fn deleting_a_missing_customer_is_a_no_op() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    assert!(customer::delete_by_email(&mut conn, "nobody@example.com")
        .unwrap()
        .is_none());
    let removed = customer::delete_by_email(&mut conn, "carol@example.com").unwrap();
    assert_eq!(removed.map(|c| c.first_name), Some("Carol".to_string()));
}

#[test]
fn customer_batch_skips_existing_emails() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let batch = [
        NewCustomer::new("Alice", "Again", "alice@example.com", "555-0000"),
        NewCustomer::new("Frank", "Miller", "frank@example.com", "555-0106"),
    ];
    assert_eq!(customer::insert_many(&mut conn, &batch).unwrap(), 1);
    let newest = customer::recent(&mut conn, 1).unwrap();
    assert_eq!(newest[0].email, "frank@example.com");
}

#[test]
fn customers_with_large_orders_only_show_those_orders() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let big = customer::with_orders_over(&mut conn, dec!(25)).unwrap();

    let emails: Vec<_> = big.iter().map(|c| c.customer.email.as_str()).collect();
    assert_eq!(emails, ["alice@example.com", "bob@example.com"]);
    assert!(big
        .iter()
        .flat_map(|c| &c.orders)
        .all(|o| o.total_amount > dec!(25)));
    assert_eq!(big[0].orders.len(), 1);
}

#[test]
fn order_details_and_cascading_delete() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let buyer = customer::first(&mut conn).unwrap().unwrap();
    let picks = book::first_n(&mut conn, 2).unwrap();
    let lines: Vec<OrderLine> = picks
        .iter()
        .map(|b| OrderLine {
            book_id: b.id,
            quantity: 2,
            price_at_purchase: b.price,
        })
        .collect();

    let created = order::create(&mut conn, buyer.id, OrderStatus::Pending, &lines).unwrap();
    assert_eq!(created.customer_label(), buyer.full_name());
    assert_eq!(created.items.len(), 2);
    assert_eq!(
        created.order.total_amount,
        (picks[0].price + picks[1].price) * dec!(2)
    );
    assert_eq!(order::item_count(&mut conn, created.order.id).unwrap(), 2);

    assert!(order::delete(&mut conn, created.order.id).unwrap());
    assert_eq!(order::item_count(&mut conn, created.order.id).unwrap(), 0);
    assert!(!order::delete(&mut conn, created.order.id).unwrap());
}

#[test]
fn empty_orders_are_rejected() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let err = order::create(&mut conn, 1, OrderStatus::Pending, &[]).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn orders_list_with_items_and_titles() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let orders = order::with_details(&mut conn, 3).unwrap();
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0].customer_label(), "Alice Johnson");
    assert_eq!(orders[0].order.status, OrderStatus::Delivered);
    assert_eq!(orders[0].items.len(), 2);
    assert_price(orders[0].order.total_amount, dec!(40.98));
}

#[test]
fn duplicate_reviews_are_skipped() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let farm = book::find_by_isbn(&mut conn, "978-0451526342").unwrap().unwrap();
    let review = NewReview {
        book_id: farm.id,
        customer_id: 1,
        rating: 4,
        comment: None,
    };
    assert!(review::create(&mut conn, &review).unwrap().is_some());
    assert!(review::create(&mut conn, &review).unwrap().is_none());
    assert_eq!(review::for_book(&mut conn, farm.id).unwrap().len(), 1);

    let bad = NewReview { rating: 0, ..review };
    assert!(matches!(
        review::create(&mut conn, &bad).unwrap_err(),
        Error::Validation(_)
    ));
}

#[test]
fn first_unreviewed_book_skips_existing_reviews() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let alice = customer::find_by_email(&mut conn, "alice@example.com").unwrap().unwrap();

    let next = book::first_unreviewed_by(&mut conn, alice.id).unwrap().unwrap();
    assert_eq!(next.isbn.as_deref(), Some("978-0439064873"));

    let review = NewReview {
        book_id: next.id,
        customer_id: alice.id,
        rating: 3,
        comment: None,
    };
    assert!(review::create(&mut conn, &review).unwrap().is_some());
    let after = book::first_unreviewed_by(&mut conn, alice.id).unwrap().unwrap();
    assert_ne!(after.id, next.id);
    assert_ne!(after.isbn.as_deref(), Some("978-0590353427"));
}

#[test]
fn ratings_only_cover_reviewed_books() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let ratings = book::ratings(&mut conn).unwrap();
    assert_eq!(ratings.len(), 5);
    let potter = ratings
        .iter()
        .find(|r| r.title.starts_with("Harry Potter and the Sorcerer"))
        .unwrap();
    assert_eq!(potter.review_count, 2);
    assert!((potter.average_rating - 4.5).abs() < f64::EPSILON);
}

#[test]
fn rolled_back_work_does_not_persist() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let deleted = rolled_back(&mut conn, |conn| {
        customer::delete_by_email(conn, "alice@example.com")
    })
    .unwrap();
    assert!(deleted.is_some());
    assert!(customer::find_by_email(&mut conn, "alice@example.com")
        .unwrap()
        .is_some());
}

#[test]
fn store_transaction_rolls_back_on_error() {
    let db = TempDb::seeded().unwrap();
    let result: Result<(), Error> = db.store().transaction(|conn| {
        customer::delete_by_email(conn, "bob@example.com")?;
        Err(Error::Validation("abort".into()))
    });
    assert!(result.is_err());
    let mut conn = db.conn().unwrap();
    assert!(customer::find_by_email(&mut conn, "bob@example.com")
        .unwrap()
        .is_some());
}

#[test]
fn raw_category_names_follow_inserts_and_deletes() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    assert_eq!(
        raw::category_names(&mut conn).unwrap(),
        category::names(&mut conn).unwrap()
    );

    raw::insert_category(&mut conn, "Atlases", "Maps").unwrap().unwrap();
    assert!(raw::category_names(&mut conn)
        .unwrap()
        .contains(&"Atlases".to_string()));

    raw::delete_category(&mut conn, "Atlases").unwrap().unwrap();
    let names = raw::category_names(&mut conn).unwrap();
    assert_eq!(names.len(), 5);
    assert!(!names.contains(&"Atlases".to_string()));
}
