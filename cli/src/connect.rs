use crate::args::Cli;
use engine_cli::{CLIConfiguration, CLISession, OutputFormat, Result};
use engine_link::{AuthProvider, EngineLinkClient, EngineLinkTimeouts};
use std::time::Duration;

const DEFAULT_URL: &str = "http://localhost:8080/v1/statement";

/// Build timeouts configuration from CLI arguments and the config file
fn build_timeouts(cli: &Cli, config: &CLIConfiguration) -> EngineLinkTimeouts {
    // Check for preset flags first
    if cli.fast_timeouts {
        return EngineLinkTimeouts::fast();
    }
    if cli.relaxed_timeouts {
        return EngineLinkTimeouts::relaxed();
    }

    let request_timeout = cli.timeout.unwrap_or(config.resolved_server().timeout);
    EngineLinkTimeouts::builder()
        .connection_timeout_secs(cli.connection_timeout)
        .request_timeout_secs(request_timeout)
        .build()
}

/// Authentication priority: CLI args > config file
fn resolve_auth(cli: &Cli, config: &CLIConfiguration) -> AuthProvider {
    if let Some(token) = cli.token.clone() {
        AuthProvider::jwt_token(token)
    } else if let Some(username) = cli.username.clone() {
        AuthProvider::basic_auth(username, cli.password.clone().unwrap_or_default())
    } else {
        config.auth_provider()
    }
}

fn resolve_format(cli: &Cli, config: &CLIConfiguration) -> Result<OutputFormat> {
    if cli.json {
        Ok(OutputFormat::Json)
    } else if cli.csv {
        Ok(OutputFormat::Csv)
    } else if let Some(format) = cli.format {
        Ok(format)
    } else {
        OutputFormat::from_config(&config.resolved_ui().format)
    }
}

/// Color is on unless `--no-color` is passed or `[ui] color = false`
pub fn resolve_color(cli: &Cli, config: &CLIConfiguration) -> bool {
    !cli.no_color && config.resolved_ui().color
}

pub fn create_session(cli: &Cli, config: &CLIConfiguration) -> Result<CLISession> {
    let server = config.resolved_server();

    let url = cli
        .url
        .clone()
        .or(server.url.clone())
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    let mut builder = EngineLinkClient::builder()
        .endpoint(url)
        .auth(resolve_auth(cli, config))
        .timeouts(build_timeouts(cli, config))
        .http_version(config.http_version())
        .max_retries(cli.max_retries.unwrap_or(server.max_retries))
        .poll_interval(
            cli.poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.poll_interval()),
        );

    if let Some(catalog) = cli.catalog.clone().or(server.catalog) {
        builder = builder.catalog(catalog);
    }
    if let Some(schema) = cli.schema.clone().or(server.schema) {
        builder = builder.schema(schema);
    }
    if let Some(user) = cli.user.clone().or(server.user) {
        builder = builder.user(user);
    }
    if let Some(prefix) = cli.header_prefix.clone().or(server.header_prefix) {
        builder = builder.header_prefix(prefix);
    }

    let query_timeout = match cli.query_timeout {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => config.query_timeout(),
    };
    if let Some(timeout) = query_timeout {
        builder = builder.query_timeout(timeout);
    }

    let client = builder.build()?;
    tracing::debug!(client = ?client, "Client ready");

    Ok(CLISession::new(client, resolve_format(cli, config)?, resolve_color(cli, config))
        .with_info(cli.info)
        .with_stats(cli.stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use engine_cli::OutputFormatter;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("engine-sql").chain(args.iter().copied())).unwrap()
    }

    fn ui_config(color: bool) -> CLIConfiguration {
        toml::from_str(&format!("[ui]\ncolor = {}\n", color)).unwrap()
    }

    #[test]
    fn test_resolve_color_respects_flag_and_config() {
        assert!(resolve_color(&parse(&[]), &CLIConfiguration::default()));
        assert!(resolve_color(&parse(&[]), &ui_config(true)));
        assert!(!resolve_color(&parse(&["--no-color"]), &ui_config(true)));
        assert!(!resolve_color(&parse(&[]), &ui_config(false)));
    }

    #[test]
    fn test_error_line_follows_resolved_color() {
        let config = ui_config(true);
        let plain = OutputFormatter::new(
            OutputFormat::Table,
            resolve_color(&parse(&["--no-color"]), &config),
        );
        assert_eq!(plain.format_error("boom"), "ERROR: boom");

        let colored = OutputFormatter::new(OutputFormat::Table, resolve_color(&parse(&[]), &config));
        assert!(colored.format_error("boom").starts_with("\x1b[31mERROR"));
    }
}
