// Logging module, powered by tracing-subscriber
//
// engine-link logs through the `log` facade; `tracing_log::LogTracer`
// routes those records into the tracing subscriber installed here.
// Logs go to stderr so they never mix with result output on stdout.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::{CLIError, Result};

/// Log format type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact text format: timestamp LEVEL target - message
    Compact,
    /// JSON Lines format for structured logging
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Build the filter: `RUST_LOG` wins, otherwise `warn` (or `debug` when
/// verbose) with noisy HTTP internals held at `warn`.
fn build_env_filter(verbose: bool) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = if verbose { "debug" } else { "warn" };
    let mut directives = vec![level.to_string()];
    for target in ["hyper", "hyper_util", "h2", "reqwest", "rustls"] {
        directives.push(format!("{}=warn", target));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str).map_err(|e| {
        CLIError::ConfigurationError(format!("Invalid tracing filter '{}': {}", filter_str, e))
    })
}

/// Initialize logging for the CLI process.
///
/// Installs a stderr `fmt` layer (compact or JSON lines) behind an
/// `EnvFilter`, plus the `LogTracer` bridge for `log::*` records.
pub fn init_logging(verbose: bool, format: LogFormat) -> Result<()> {
    // ok() in case already initialized
    tracing_log::LogTracer::init().ok();

    let filter = build_env_filter(verbose)?;
    let layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(layer.with_filter(filter));
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CLIError::ConfigurationError(format!("Failed to install logger: {}", e)))?;

    tracing::debug!(verbose, ?format, "Logging initialized");
    Ok(())
}
