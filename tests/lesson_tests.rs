use bookstore::adapter::inbound::cli::command::LessonCommand;
use bookstore::adapter::inbound::cli::lesson::{self, crud, raw_sql};
use bookstore::adapter::inbound::cli::session;
use bookstore::adapter::outbound::sqlite::{book, category, customer, Table};
use bookstore::testkit::{config, TempDb};
use rust_decimal_macros::dec;

const ALL_LESSONS: [LessonCommand; 4] = [
    LessonCommand::Basics,
    LessonCommand::Crud,
    LessonCommand::Relations,
    LessonCommand::RawSql,
];

#[tokio::test]
async fn every_lesson_runs_on_seeded_data() {
    let db = TempDb::seeded().unwrap();
    for lesson in ALL_LESSONS {
        lesson::execute(lesson, db.store()).await.unwrap();
    }
}

#[tokio::test]
async fn every_lesson_runs_on_an_empty_database() {
    let db = TempDb::empty().unwrap();
    for lesson in ALL_LESSONS {
        lesson::execute(lesson, db.store()).await.unwrap();
    }
}

#[tokio::test]
async fn basics_runs_with_a_single_connection() {
    let db = TempDb::seeded().unwrap();
    let store = session::open_existing(&config::with_pool_size(&db, 1)).unwrap();
    lesson::execute(LessonCommand::Basics, &store).await.unwrap();
}

#[tokio::test]
async fn basics_only_reads() {
    let db = TempDb::seeded().unwrap();
    let before = db.store().table_counts().await.unwrap();
    lesson::execute(LessonCommand::Basics, db.store()).await.unwrap();
    assert_eq!(db.store().table_counts().await.unwrap(), before);
}

#[tokio::test]
async fn crud_cleans_up_its_demo_rows() {
    let db = TempDb::seeded().unwrap();
    lesson::execute(LessonCommand::Crud, db.store()).await.unwrap();

    let mut conn = db.conn().unwrap();
    assert!(customer::find_by_email(&mut conn, crud::DEMO_CUSTOMER_EMAIL)
        .unwrap()
        .is_none());
    for (name, _) in crud::DEMO_CATEGORIES {
        assert!(category::find_by_name(&mut conn, name).unwrap().is_none());
    }
    assert_eq!(category::names(&mut conn).unwrap().len(), 5);
}

#[tokio::test]
async fn crud_keeps_its_lasting_changes() {
    let db = TempDb::seeded().unwrap();
    lesson::execute(LessonCommand::Crud, db.store()).await.unwrap();

    let mut conn = db.conn().unwrap();
    let hobbit = book::find_by_title(&mut conn, "The Hobbit").unwrap().unwrap();
    assert_eq!(hobbit.price, dec!(18.99));
    let orwell = book::find_by_title(&mut conn, "1984").unwrap().unwrap();
    assert_eq!(orwell.stock_quantity, 35);
    let orient = book::find_by_title(&mut conn, "Murder on the Orient Express")
        .unwrap()
        .unwrap();
    assert_eq!(orient.price, dec!(16.14));
}

#[tokio::test]
async fn crud_can_run_twice() {
    let db = TempDb::seeded().unwrap();
    lesson::execute(LessonCommand::Crud, db.store()).await.unwrap();
    lesson::execute(LessonCommand::Crud, db.store()).await.unwrap();

    assert_eq!(db.store().count(Table::Books).unwrap(), 11);
    assert_eq!(db.store().count(Table::Authors).unwrap(), 8);
}

#[tokio::test]
async fn relations_removes_its_test_order() {
    let db = TempDb::seeded().unwrap();
    lesson::execute(LessonCommand::Relations, db.store()).await.unwrap();
    assert_eq!(db.store().count(Table::Orders).unwrap(), 6);
}

#[tokio::test]
async fn raw_sql_raises_price_and_adds_customers_once() {
    let db = TempDb::seeded().unwrap();
    lesson::execute(LessonCommand::RawSql, db.store()).await.unwrap();

    let mut conn = db.conn().unwrap();
    let repriced = book::find_by_title(&mut conn, raw_sql::REPRICED_TITLE)
        .unwrap()
        .unwrap();
    assert_eq!(repriced.price, dec!(17.59));
    assert!(category::find_by_name(&mut conn, raw_sql::TEMPORARY_CATEGORY)
        .unwrap()
        .is_none());
    drop(conn);
    assert_eq!(db.store().count(Table::Customers).unwrap(), 8);

    lesson::execute(LessonCommand::RawSql, db.store()).await.unwrap();
    assert_eq!(db.store().count(Table::Customers).unwrap(), 8);
}
