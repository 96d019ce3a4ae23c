//! Lesson transcripts.
//!
//! Every lesson checks a connection out of the pool, runs its sections in
//! order and gives the connection back when it returns. The first failing
//! query ends the lesson with that error.

pub mod basics;
pub mod crud;
pub mod raw_sql;
pub mod relations;

use super::command::LessonCommand;
use crate::adapter::outbound::sqlite::SqliteBookstore;
use crate::error::Result;

/// Run one lesson against the store.
///
/// # Errors
/// Returns the first error the lesson hits.
pub async fn execute(lesson: LessonCommand, store: &SqliteBookstore) -> Result<()> {
    tracing::debug!(?lesson, "Starting lesson");
    match lesson {
        LessonCommand::Basics => basics::run(store).await,
        LessonCommand::Crud => crud::run(store),
        LessonCommand::Relations => relations::run(store),
        LessonCommand::RawSql => raw_sql::run(store),
    }
}
