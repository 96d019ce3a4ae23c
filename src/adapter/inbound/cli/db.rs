//! Handlers for `bookstore db`.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use serde_json::json;

use super::command::{DbCommand, ResetArgs};
use super::{output, session};
use crate::adapter::outbound::sqlite::{run_migrations, seed, SqliteBookstore};
use crate::domain::TableCounts;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Execute a database maintenance command.
///
/// # Errors
/// Returns an error if migrating, seeding or clearing fails.
pub fn execute(command: DbCommand, config: &Config) -> Result<()> {
    let store = session::open(config)?;
    match command {
        DbCommand::Migrate => migrate(&store),
        DbCommand::Seed => seed_sample(&store),
        DbCommand::Setup => {
            migrate(&store)?;
            seed_sample(&store)
        }
        DbCommand::Reset(args) => reset(&store, &args, &session::database_url(config)),
    }
}

fn migrate(store: &SqliteBookstore) -> Result<()> {
    let applied = run_migrations(store.pool())?;
    if output::is_json() {
        output::json_output(json!({
            "command": "db.migrate",
            "applied": applied,
        }));
        return Ok(());
    }
    if applied.is_empty() {
        output::success("Schema is up to date");
    } else {
        for version in &applied {
            output::action_done("Applied", version);
        }
    }
    Ok(())
}

fn seed_sample(store: &SqliteBookstore) -> Result<()> {
    let mut conn = store.conn()?;
    let counts = seed::seed(&mut conn)?;
    report_counts("db.seed", "Seeded sample bookstore", &counts);
    Ok(())
}

fn reset(store: &SqliteBookstore, args: &ResetArgs, database: &str) -> Result<()> {
    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete every row in {database}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            output::note("Reset cancelled.");
            return Ok(());
        }
    }

    run_migrations(store.pool())?;
    let mut conn = store.conn()?;
    let deleted = seed::clear(&mut conn)?;
    if !output::is_json() {
        output::action_done("Deleted", &format!("{deleted} rows"));
    }
    let counts = seed::seed(&mut conn)?;
    report_counts("db.reset", "Reseeded sample bookstore", &counts);
    Ok(())
}

fn report_counts(command: &str, message: &str, counts: &TableCounts) {
    if output::is_json() {
        output::json_output(json!({
            "command": command,
            "counts": counts,
        }));
        return;
    }
    output::success(message);
    for (label, count) in counts.labelled() {
        output::field(label, count);
    }
}
