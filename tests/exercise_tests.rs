use bookstore::adapter::outbound::sqlite::{book, category};
use bookstore::application::exercise::{
    add_review, apply_discount, author_book_counts, books_by_author, category_names, check_all,
    create_order, expensive_books, top_rated_books,
};
use bookstore::error::Error;
use bookstore::testkit::TempDb;
use rust_decimal_macros::dec;

#[test]
fn category_names_are_sorted() {
    let db = TempDb::seeded().unwrap();
    let names = db.with_conn(category_names).unwrap();
    assert_eq!(
        names,
        ["Fantasy", "Fiction", "Mystery", "Non-Fiction", "Science Fiction"]
    );
}

#[test]
fn expensive_books_are_most_expensive_first() {
    let db = TempDb::seeded().unwrap();
    let books = db.with_conn(|conn| expensive_books(conn, dec!(15))).unwrap();
    assert_eq!(books.len(), 5);
    assert_eq!(books[0].0, "Harry Potter and the Sorcerer's Stone");
    assert_eq!(books[0].1, dec!(24.99));
    assert!(books.iter().all(|(_, price)| *price >= dec!(15)));
}

#[test]
fn books_by_author_matches_part_of_the_name() {
    let db = TempDb::seeded().unwrap();
    let titles = db.with_conn(|conn| books_by_author(conn, "agatha")).unwrap();
    assert_eq!(
        titles,
        ["And Then There Were None", "Murder on the Orient Express"]
    );
    let none = db.with_conn(|conn| books_by_author(conn, "Nobody")).unwrap();
    assert!(none.is_empty());
}

#[test]
fn author_counts_rank_prolific_authors_first() {
    let db = TempDb::seeded().unwrap();
    let counts = db.with_conn(author_book_counts).unwrap();
    assert_eq!(counts[0], ("Agatha Christie".to_string(), 2));
    assert_eq!(counts.last(), Some(&("Jane Austen".to_string(), 1)));
    assert!(!counts.iter().any(|(name, _)| name == "Toni Morrison"));
}

#[test]
fn add_review_stores_once() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();

    let first =
        add_review(&mut conn, "Animal Farm", "alice@example.com", 4, Some("Sharp")).unwrap();
    assert!(first.is_some());
    let again = add_review(&mut conn, "Animal Farm", "alice@example.com", 5, None).unwrap();
    assert_eq!(again, None);
}

#[test]
fn add_review_ignores_unknown_book_or_customer() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    assert_eq!(
        add_review(&mut conn, "Missing Book", "alice@example.com", 3, None).unwrap(),
        None
    );
    assert_eq!(
        add_review(&mut conn, "Animal Farm", "ghost@example.com", 3, None).unwrap(),
        None
    );
}

#[test]
fn add_review_rejects_out_of_range_rating() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let err = add_review(&mut conn, "Animal Farm", "alice@example.com", 6, None).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn apply_discount_reprices_category() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    assert_eq!(apply_discount(&mut conn, "Fiction", dec!(10)).unwrap(), 3);

    let farm = book::find_by_isbn(&mut conn, "978-0451526342").unwrap().unwrap();
    assert_eq!(farm.price, dec!(8.99));
}

#[test]
fn apply_discount_edge_cases() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    assert_eq!(apply_discount(&mut conn, "Poetry", dec!(10)).unwrap(), 0);
    assert!(matches!(
        apply_discount(&mut conn, "Fiction", dec!(101)).unwrap_err(),
        Error::Validation(_)
    ));
    assert!(matches!(
        apply_discount(&mut conn, "Fiction", dec!(-1)).unwrap_err(),
        Error::Validation(_)
    ));
}

#[test]
fn top_rated_books_rank_by_average_then_title() {
    let db = TempDb::seeded().unwrap();
    let top = db.with_conn(|conn| top_rated_books(conn, 3)).unwrap();
    let titles: Vec<_> = top.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(
        titles,
        ["Foundation", "1984", "Harry Potter and the Sorcerer's Stone"]
    );
    assert_eq!(top[0].author, "Isaac Asimov");
    assert!((top[1].average_rating - 4.5).abs() < f64::EPSILON);
}

#[test]
fn top_rated_books_fall_back_to_unknown_author() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    diesel::RunQueryDsl::execute(
        diesel::sql_query("UPDATE books SET author_id = NULL WHERE title = 'Foundation'"),
        &mut conn,
    )
    .unwrap();
    let top = top_rated_books(&mut conn, 1).unwrap();
    assert_eq!(top[0].author, "Unknown");
}

#[test]
fn create_order_decrements_stock_and_totals() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let before = book::find_by_isbn(&mut conn, "978-0451524935").unwrap().unwrap();

    let id = create_order(&mut conn, "alice@example.com", &[("978-0451524935", 2)])
        .unwrap()
        .unwrap();

    let after = book::find_by_isbn(&mut conn, "978-0451524935").unwrap().unwrap();
    assert_eq!(after.stock_quantity, before.stock_quantity - 2);
    let details = bookstore::adapter::outbound::sqlite::order::details(&mut conn, id)
        .unwrap()
        .unwrap();
    assert_eq!(details.order.total_amount, dec!(31.98));
    assert_eq!(details.items[0].price_at_purchase, before.price);
}

#[test]
fn create_order_rolls_back_on_any_bad_line() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let before = book::find_by_isbn(&mut conn, "978-0451524935").unwrap().unwrap();

    let cases: [(&str, Vec<(&str, i32)>); 5] = [
        ("ghost@example.com", vec![("978-0451524935", 1)]),
        ("alice@example.com", vec![]),
        ("alice@example.com", vec![("978-0451524935", 0)]),
        ("alice@example.com", vec![("978-0451524935", 1), ("000-0000000000", 1)]),
        ("alice@example.com", vec![("978-0451524935", 1), ("978-0143039563", 1_000)]),
    ];
    for (email, items) in cases {
        assert_eq!(create_order(&mut conn, email, &items).unwrap(), None);
    }

    let after = book::find_by_isbn(&mut conn, "978-0451524935").unwrap().unwrap();
    assert_eq!(after.stock_quantity, before.stock_quantity);
    let orders = db.store().count(bookstore::adapter::outbound::sqlite::Table::Orders).unwrap();
    assert_eq!(orders, 6);
}

#[test]
fn checker_passes_everything_and_changes_nothing() {
    let db = TempDb::seeded().unwrap();
    let mut conn = db.conn().unwrap();
    let fiction_before = category::find_by_name(&mut conn, "Fiction").unwrap().unwrap();
    let prices_before = book::at_least(&mut conn, dec!(0)).unwrap();

    let checks = check_all(&mut conn);
    assert_eq!(checks.len(), 8);
    assert!(checks.iter().all(|c| c.passed), "{checks:#?}");
    assert!(checks[4].detail.contains("stored"), "{:?}", checks[4]);

    let prices_after = book::at_least(&mut conn, dec!(0)).unwrap();
    assert_eq!(prices_before, prices_after);
    assert_eq!(
        category::find_by_name(&mut conn, "Fiction").unwrap().unwrap(),
        fiction_before
    );
    drop(conn);
    assert_eq!(db.store().count(bookstore::adapter::outbound::sqlite::Table::Reviews).unwrap(), 8);
}

#[test]
fn checker_reports_empty_database() {
    let db = TempDb::empty().unwrap();
    let checks = db.with_conn(|conn| Ok(check_all(conn))).unwrap();
    assert!(checks.iter().all(|c| !c.passed));
    assert!(checks[0].detail.contains("None/empty"));
}
