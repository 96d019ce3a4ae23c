use std::path::Path;

use assert_cmd::Command;

/// The `bookstore` binary pointed at `database`, with no user config.
pub fn bookstore(database: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bookstore"));
    cmd.env_remove("DATABASE_URL")
        .env_remove("RUST_LOG")
        .env("HOME", database.parent().unwrap_or(database))
        .arg("--color")
        .arg("never")
        .arg("--database")
        .arg(database);
    cmd
}
