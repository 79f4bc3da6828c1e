//! CLI session state and statement execution
//!
//! Runs each statement in its own engine-link `QuerySession`, renders the
//! result with the configured [`OutputFormatter`] and turns Ctrl-C into a
//! server-side cancellation.

use engine_link::{EngineLinkClient, EngineLinkError, QuerySession};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::{
    error::{CLIError, Result},
    formatter::{OutputFormat, OutputFormatter},
    parser::split_statements,
};

/// Terminal session against one engine endpoint
pub struct CLISession {
    client: EngineLinkClient,
    formatter: OutputFormatter,

    /// Print the query info document after each statement
    show_info: bool,

    /// Print final execution statistics after each statement
    show_stats: bool,

    queries_executed: u64,
}

impl CLISession {
    pub fn new(client: EngineLinkClient, format: OutputFormat, color: bool) -> Self {
        Self {
            client,
            formatter: OutputFormatter::new(format, color),
            show_info: false,
            show_stats: false,
            queries_executed: 0,
        }
    }

    pub fn with_info(mut self, show_info: bool) -> Self {
        self.show_info = show_info;
        self
    }

    pub fn with_stats(mut self, show_stats: bool) -> Self {
        self.show_stats = show_stats;
        self
    }

    pub fn queries_executed(&self) -> u64 {
        self.queries_executed
    }

    pub fn formatter(&self) -> &OutputFormatter {
        &self.formatter
    }

    /// Execute one statement and print its output
    pub async fn execute(&mut self, sql: &str) -> Result<()> {
        let output = self.run_statement(sql).await?;
        println!("{}", output);
        Ok(())
    }

    /// Execute every `;`-separated statement of a script, stopping at the
    /// first failure
    pub async fn execute_batch(&mut self, script: &str) -> Result<()> {
        let statements = split_statements(script)?;
        debug!(count = statements.len(), "Executing script");
        for statement in statements {
            self.execute(&statement).await?;
        }
        Ok(())
    }

    /// Execute one statement and return the rendered output.
    ///
    /// Ctrl-C while the statement runs requests cancellation from the server
    /// and yields [`CLIError::Cancelled`].
    pub async fn run_statement(&mut self, sql: &str) -> Result<String> {
        let start = Instant::now();
        self.queries_executed += 1;

        let mut session = self.client.session();
        let poll_interval = self.client.config().poll_interval;

        match tokio::select! {
            result = session.submit(sql) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        } {
            Some(result) => result?,
            // Nothing to cancel yet; the submission never completed
            None => return Err(CLIError::Cancelled),
        }

        self.drive(&mut session, poll_interval).await?;
        let elapsed = start.elapsed();

        let results = session.results().ok_or_else(|| {
            CLIError::LinkError(EngineLinkError::IncoherentState {
                state: session.state(),
                server_state: session.server_state().map(str::to_string),
            })
        })?;

        let mut output = self.formatter.format_results(&results, elapsed)?;

        if self.show_stats {
            if let Some(stats) = session.stats() {
                output.push_str("\n\n");
                output.push_str(&self.formatter.format_stats(stats));
            }
        }

        if self.show_info {
            match session.get_info().await {
                Ok(Some(info)) => {
                    output.push_str("\n\n");
                    output.push_str(&info);
                },
                Ok(None) => debug!("Server sent no info URI"),
                Err(e) => warn!(error = %e, "Failed to fetch query info"),
            }
        }

        Ok(output)
    }

    async fn drive(&self, session: &mut QuerySession, poll_interval: Duration) -> Result<()> {
        let interrupted = tokio::select! {
            result = session.await_completion(poll_interval) => {
                result?;
                false
            },
            _ = tokio::signal::ctrl_c() => true,
        };

        if interrupted {
            match session.cancel_handle() {
                Some(handle) => {
                    let accepted = handle.cancel().await;
                    eprintln!(
                        "Cancel {} for query {}",
                        if accepted { "requested" } else { "was not accepted" },
                        session.query_id().unwrap_or("?")
                    );
                },
                None => eprintln!("Query has no cancel URI; abandoning it"),
            }
            return Err(CLIError::Cancelled);
        }
        Ok(())
    }
}

impl std::fmt::Debug for CLISession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CLISession")
            .field("client", &self.client)
            .field("format", &self.formatter.format())
            .field("show_info", &self.show_info)
            .field("show_stats", &self.show_stats)
            .field("queries_executed", &self.queries_executed)
            .finish()
    }
}
