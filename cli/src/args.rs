use clap::Parser;
use engine_cli::config::DEFAULT_CONFIG_PATH;
use engine_cli::OutputFormat;
use std::path::PathBuf;

// Macro to create the version string at compile time
macro_rules! version_string {
    () => {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nCommit: ",
            env!("GIT_COMMIT_HASH"),
            " (",
            env!("GIT_BRANCH"),
            ")"
        )
    };
}

/// engine-sql - run SQL against a distributed SQL engine's statement API
#[derive(Parser, Debug)]
#[command(name = "engine-sql")]
#[command(version = version_string!())]
#[command(about = "Run SQL statements through the engine's HTTP statement protocol", long_about = None)]
pub struct Cli {
    /// Statement endpoint (e.g., http://localhost:8080/v1/statement)
    #[arg(short = 'u', long = "url", env = "ENGINE_URL")]
    pub url: Option<String>,

    /// Catalog for the statement
    #[arg(long = "catalog")]
    pub catalog: Option<String>,

    /// Schema for the statement
    #[arg(short = 's', long = "schema")]
    pub schema: Option<String>,

    /// User reported to the engine
    #[arg(long = "user")]
    pub user: Option<String>,

    /// Identity header prefix (e.g. X-Presto, X-Trino)
    #[arg(long = "header-prefix")]
    pub header_prefix: Option<String>,

    /// Bearer token
    #[arg(long = "token", env = "ENGINE_TOKEN")]
    pub token: Option<String>,

    /// HTTP Basic Auth username
    #[arg(long = "username")]
    pub username: Option<String>,

    /// HTTP Basic Auth password
    #[arg(long = "password", requires = "username")]
    pub password: Option<String>,

    /// Execute SQL from file and exit
    #[arg(short = 'f', long = "file", conflicts_with = "command")]
    pub file: Option<PathBuf>,

    /// Execute SQL command and exit
    #[arg(short = 'c', long = "command")]
    pub command: Option<String>,

    /// Output format
    #[arg(long = "format")]
    pub format: Option<OutputFormat>,

    /// Enable JSON output (shorthand for --format=json)
    #[arg(long = "json", conflicts_with_all = ["format", "csv"])]
    pub json: bool,

    /// Enable CSV output (shorthand for --format=csv)
    #[arg(long = "csv", conflicts_with = "format")]
    pub csv: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Print the query info document after each statement
    #[arg(long = "info")]
    pub info: bool,

    /// Print final execution statistics after each statement
    #[arg(long = "stats")]
    pub stats: bool,

    /// Configuration file path
    #[arg(long = "config", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Log format: compact or json
    #[arg(long = "log-format", default_value = "compact")]
    pub log_format: String,

    /// HTTP request timeout in seconds (0 = none)
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Connection timeout in seconds (TCP + TLS handshake, default: 10)
    #[arg(long = "connection-timeout", value_name = "SECONDS", default_value_t = 10)]
    pub connection_timeout: u64,

    /// Delay between continuation polls in milliseconds
    #[arg(long = "poll-interval-ms", value_name = "MILLIS")]
    pub poll_interval_ms: Option<u64>,

    /// Overall query deadline in seconds (0 = none)
    #[arg(long = "query-timeout", value_name = "SECONDS")]
    pub query_timeout: Option<u64>,

    /// Retries on transport failures
    #[arg(long = "max-retries")]
    pub max_retries: Option<u32>,

    /// Use fast timeout preset (optimized for local development)
    #[arg(long = "fast-timeouts", conflicts_with = "relaxed_timeouts")]
    pub fast_timeouts: bool,

    /// Use relaxed timeout preset (optimized for high-latency networks)
    #[arg(long = "relaxed-timeouts")]
    pub relaxed_timeouts: bool,
}
