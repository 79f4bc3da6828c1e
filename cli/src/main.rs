//! engine-sql - terminal client for the engine's statement protocol
//!
//! # Usage
//!
//! ```bash
//! # Single statement
//! engine-sql -u http://localhost:8080/v1/statement --catalog tpch -s tiny -c "SELECT * FROM nation"
//!
//! # Execute SQL file
//! engine-sql --file queries.sql
//!
//! # JSON output with final statistics
//! engine-sql --json --stats -c "SELECT count(*) FROM orders"
//! ```

use clap::Parser;

use engine_cli::logging::{init_logging, LogFormat};
use engine_cli::{CLIConfiguration, CLIError, OutputFormat, OutputFormatter, Result};

mod args;
mod connect;

use args::Cli;
use connect::{create_session, resolve_color};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut errors = OutputFormatter::new(OutputFormat::Table, !cli.no_color);

    if let Err(e) = run(&cli, &mut errors).await {
        eprintln!("{}", errors.format_error(&e.to_string()));
        std::process::exit(match e {
            CLIError::Cancelled => 130,
            _ => 1,
        });
    }
}

async fn run(cli: &Cli, errors: &mut OutputFormatter) -> Result<()> {
    init_logging(cli.verbose, LogFormat::parse(&cli.log_format))?;

    let config = CLIConfiguration::load(&cli.config)?;
    *errors = OutputFormatter::new(OutputFormat::Table, resolve_color(cli, &config));
    let mut session = create_session(cli, &config)?;

    match (&cli.file, &cli.command) {
        (Some(file), None) => {
            let sql = std::fs::read_to_string(file).map_err(|e| {
                CLIError::FileError(format!("Failed to read {}: {}", file.display(), e))
            })?;
            session.execute_batch(&sql).await
        },

        (None, Some(command)) => session.execute_batch(command).await,

        (None, None) => Err(CLIError::ConfigurationError(
            "Nothing to run: pass --command or --file".into(),
        )),

        // clap rejects this combination already
        (Some(_), Some(_)) => Err(CLIError::ConfigurationError(
            "Cannot specify both --file and --command".into(),
        )),
    }
}
