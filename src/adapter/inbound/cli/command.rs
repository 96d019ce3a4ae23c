//! The `bookstore` argument grammar.
//!
//! Each subcommand is one lesson transcript, the exercise checker, or a
//! database maintenance step. Global flags choose the configuration file,
//! the database and the output style.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::paths;

/// Guided lessons for querying a bookstore database through Diesel
#[derive(Parser, Debug)]
#[command(name = "bookstore")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file [default: ~/.bookstore/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path, overriding config and DATABASE_URL
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Log every SQL statement (shown with -v)
    #[arg(long, global = true)]
    pub log_queries: bool,

    /// When to color the transcript
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Print one JSON object per transcript line
    #[arg(long, global = true)]
    pub json: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Raise the log level (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The configuration file to read.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(paths::default_config)
    }
}

/// Value of `--color`.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test the connection and summarize the database
    Overview,

    /// Run one lesson transcript
    #[command(subcommand)]
    Lesson(LessonCommand),

    /// Check the practice exercises (changes are rolled back)
    Exercises,

    /// Create, seed or reset the database
    #[command(subcommand)]
    Db(DbCommand),
}

/// Subcommands for `bookstore lesson`.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonCommand {
    /// Connecting and simple queries
    Basics,
    /// Create, read, update and delete
    Crud,
    /// Includes, relation filters, aggregates, nested writes
    Relations,
    /// Hand-written SQL through the same connection
    RawSql,
}

/// Subcommands for `bookstore db`.
#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Apply pending migrations
    Migrate,
    /// Insert the sample bookstore (existing rows are kept)
    Seed,
    /// Migrate, then seed
    Setup,
    /// Delete every row and seed again
    Reset(ResetArgs),
}

/// Arguments for `bookstore db reset`.
#[derive(Parser, Debug)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "bookstore");
    }

    #[test]
    fn test_parse_overview_defaults() {
        let cli = Cli::try_parse_from(["bookstore", "overview"]).unwrap();
        assert!(matches!(cli.command, Commands::Overview));
        assert!(!cli.json);
        assert!(!cli.quiet);
        assert!(!cli.log_queries);
        assert_eq!(cli.verbose, 0);
        assert!(cli.database.is_none());
        assert_eq!(cli.config_path(), paths::default_config());
    }

    #[test]
    fn test_parse_lessons() {
        let cases = [
            ("basics", LessonCommand::Basics),
            ("crud", LessonCommand::Crud),
            ("relations", LessonCommand::Relations),
            ("raw-sql", LessonCommand::RawSql),
        ];
        for (name, expected) in cases {
            let cli = Cli::try_parse_from(["bookstore", "lesson", name]).unwrap();
            assert!(matches!(cli.command, Commands::Lesson(lesson) if lesson == expected));
        }
    }

    #[test]
    fn test_unknown_lesson_is_rejected() {
        assert!(Cli::try_parse_from(["bookstore", "lesson", "joins"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bookstore",
            "lesson",
            "basics",
            "--database",
            "/tmp/shop.db",
            "--json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.database.as_deref(), Some("/tmp/shop.db"));
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_reset_yes() {
        let cli = Cli::try_parse_from(["bookstore", "db", "reset", "--yes"]).unwrap();
        assert!(matches!(cli.command, Commands::Db(DbCommand::Reset(ResetArgs { yes: true }))));
    }

    #[test]
    fn test_parse_color_never() {
        let cli = Cli::try_parse_from(["bookstore", "--color", "never", "exercises"]).unwrap();
        assert!(matches!(cli.color, ColorChoice::Never));
    }

    #[test]
    fn test_explicit_config_path() {
        let cli = Cli::try_parse_from(["bookstore", "--config", "shop.toml", "overview"]).unwrap();
        assert_eq!(cli.config_path(), PathBuf::from("shop.toml"));
    }
}
