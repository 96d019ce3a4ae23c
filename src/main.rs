use bookstore::adapter::inbound::cli::command::Cli;
use bookstore::adapter::inbound::cli::output::{self, OutputConfig};
use bookstore::adapter::inbound::cli::{load_config, run};
use clap::Parser;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::set_color(&cli.color);
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(report) => {
            eprintln!("{report:?}");
            std::process::exit(1);
        }
    };

    config.init_logging(cli.verbose);
    debug!(command = ?cli.command, "bookstore starting");

    if let Err(e) = run(cli, config).await {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
