//! CLI module graph and command dispatch.

pub mod command;
pub mod db;
pub mod diagnostic;
pub mod exercises;
pub mod lesson;
pub mod output;
pub mod overview;
pub mod paths;
pub mod session;

use self::command::{Cli, Commands};
use self::diagnostic::ConfigDiagnostic;
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::config::Config;

/// Load the configuration the command line points at.
///
/// A missing file is only tolerated at the default location. TOML errors
/// come back as a diagnostic that shows the offending snippet.
///
/// # Errors
/// Returns a renderable report when the file cannot be loaded.
pub fn load_config(cli: &Cli) -> miette::Result<Config> {
    let path = cli.config_path();
    let loaded = if cli.config.is_some() {
        Config::load(&path)
    } else {
        Config::load_or_default(&path)
    };

    let mut config = match loaded {
        Ok(config) => config,
        Err(Error::Config(ConfigError::Parse(error))) => {
            let content = std::fs::read_to_string(&path).unwrap_or_default();
            return Err(ConfigDiagnostic::from_toml(&path, &content, &error).into());
        }
        Err(Error::Config(ConfigError::ReadFile(error))) => {
            return Err(miette::miette!(
                help = "pass an existing file with --config, or omit it to use the defaults",
                "failed to read {}: {error}",
                path.display()
            ));
        }
        Err(error) => return Err(miette::miette!("{error}")),
    };

    if let Some(url) = &cli.database {
        config.database.url = Some(url.clone());
    }
    if cli.log_queries {
        config.database.log_queries = true;
    }
    Ok(config)
}

/// Run the parsed command.
///
/// # Errors
/// Returns the first error a command hits.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Overview => {
            let store = session::open_existing(&config)?;
            overview::execute(&store).await
        }
        Commands::Lesson(lesson) => {
            let store = session::open_existing(&config)?;
            lesson::execute(lesson, &store).await
        }
        Commands::Exercises => {
            let store = session::open_existing(&config)?;
            exercises::execute(&store)
        }
        Commands::Db(command) => db::execute(command, &config),
    }
}
