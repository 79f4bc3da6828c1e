//! Query session: one SQL statement driven through the engine's
//! continuation chain.
//!
//! ```text
//! submit(sql) ── POST endpoint ──► envelope ──► merge ──┐
//!                                                       ▼
//!                 ┌──── while continuation URI present ─┐
//!                 │  sleep(poll_interval)               │
//!                 │  GET continuation ──► envelope      │
//!                 │  merge                              │
//!                 └─────────────────────────────────────┘
//!                                                       ▼
//!                          state == Finished ? Ok : IncoherentState
//! ```
//!
//! A session owns its state exclusively; `submit` and `await_completion`
//! take `&mut self`, so concurrent polling of one session cannot compile.

mod cancel;
mod state;

pub use cancel::CancelHandle;

use log::{debug, warn};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::{
    config::SessionConfig,
    error::{EngineLinkError, Result},
    models::{Column, ErrorDetail, ExecutionState, QueryResults, QueryStats, Row, StatusEnvelope},
    transport::{HttpRequest, HttpResponse, HttpTransport},
};
use state::SessionState;

/// Longest server error body quoted in a protocol error
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Lifecycle of one SQL statement against the engine.
///
/// # Example
///
/// ```rust,no_run
/// use engine_link::EngineLinkClient;
/// use std::time::Duration;
///
/// # async fn example() -> engine_link::Result<()> {
/// let client = EngineLinkClient::builder()
///     .endpoint("http://localhost:8080/v1/statement")
///     .catalog("tpch")
///     .schema("tiny")
///     .build()?;
///
/// let mut session = client.session();
/// session.submit("SELECT count(*) FROM nation").await?;
/// session.await_completion(Duration::from_millis(200)).await?;
///
/// if let Some(rows) = session.get_data() {
///     println!("{} rows", rows.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct QuerySession {
    config: Arc<SessionConfig>,
    transport: Arc<dyn HttpTransport>,
    state: SessionState,
    polls: u64,
}

impl QuerySession {
    pub fn new(config: Arc<SessionConfig>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            state: SessionState::default(),
            polls: 0,
        }
    }

    /// Submit `sql` to the engine.
    ///
    /// Accepted only on a fresh session. On success the session is `Running`
    /// (or further, if the first response already says so) with the first
    /// envelope merged. On failure nothing about the session changes, so the
    /// caller may submit again.
    pub async fn submit(&mut self, sql: &str) -> Result<()> {
        if sql.trim().is_empty() {
            return Err(EngineLinkError::InvalidUsage("SQL text is empty".into()));
        }
        match self.state.execution_state {
            ExecutionState::NotStarted => {},
            ExecutionState::Running => {
                return Err(EngineLinkError::InvalidUsage(
                    "a statement is already running on this session".into(),
                ));
            },
            ExecutionState::Finished | ExecutionState::Failed => {
                return Err(EngineLinkError::InvalidUsage(
                    "session already executed a statement; create a new session".into(),
                ));
            },
        }

        let sql_preview: String = sql.chars().take(80).collect();
        debug!(
            "[ENGINE_QUERY] Submitting query: \"{}{}\" (len={}) endpoint={}",
            sql_preview.replace('\n', " "),
            if sql_preview.len() < sql.len() { "..." } else { "" },
            sql.len(),
            self.config.endpoint
        );

        let start = Instant::now();
        let request = HttpRequest::post(self.config.endpoint.as_str(), sql)
            .with_headers(self.config.identity_headers());
        let response = self.send(request).await?;
        let envelope = decode_success(response)?;

        self.state.begin();
        self.polls = 0;
        let appended = self.state.merge(envelope);

        debug!(
            "[ENGINE_QUERY] Submitted: query_id={} state={} rows={} duration_ms={}",
            self.state.query_id.as_deref().unwrap_or("?"),
            self.state.execution_state,
            appended,
            start.elapsed().as_millis()
        );
        Ok(())
    }

    /// Follow the continuation chain until the server ends it.
    ///
    /// Sleeps `poll_interval` before every poll. Succeeds only if the chain
    /// ends with the query `Finished`.
    pub async fn await_completion(&mut self, poll_interval: Duration) -> Result<()> {
        if self.state.execution_state == ExecutionState::NotStarted {
            return Err(EngineLinkError::InvalidUsage(
                "no statement has been submitted on this session".into(),
            ));
        }

        let started = Instant::now();
        while let Some(next_uri) = self.state.continuation_uri.clone() {
            self.ensure_not_failed()?;
            if let Some(limit) = self.config.query_timeout {
                let elapsed = started.elapsed();
                if elapsed >= limit {
                    warn!(
                        "[ENGINE_QUERY] Query deadline exceeded: query_id={} elapsed_ms={}",
                        self.state.query_id.as_deref().unwrap_or("?"),
                        elapsed.as_millis()
                    );
                    return Err(EngineLinkError::QueryTimeout { elapsed });
                }
            }

            tokio::time::sleep(poll_interval).await;

            let request = HttpRequest::get(next_uri).with_headers(self.config.identity_headers());
            let response = self.send(request).await?;
            let envelope = decode_success(response)?;
            self.polls += 1;
            let appended = self.state.merge(envelope);

            debug!(
                "[ENGINE_QUERY] Poll {}: state={} appended={} total_rows={}",
                self.polls,
                self.state.server_state.as_deref().unwrap_or("?"),
                appended,
                self.state.rows.len()
            );
        }

        match self.state.execution_state {
            ExecutionState::Finished => {
                debug!(
                    "[ENGINE_QUERY] Finished: query_id={} rows={} polls={} total_ms={}",
                    self.state.query_id.as_deref().unwrap_or("?"),
                    self.state.rows.len(),
                    self.polls,
                    started.elapsed().as_millis()
                );
                Ok(())
            },
            state => {
                if let Some(error) = &self.state.error {
                    warn!("[ENGINE_QUERY] Query ended in state {}: {}", state, error);
                }
                Err(EngineLinkError::IncoherentState {
                    state,
                    server_state: self.state.server_state.clone(),
                })
            },
        }
    }

    /// `submit` followed by `await_completion` with the configured poll interval
    pub async fn execute(&mut self, sql: &str) -> Result<()> {
        self.submit(sql).await?;
        self.await_completion(self.config.poll_interval).await
    }

    /// Accumulated rows, available only once the query is `Finished`.
    pub fn get_data(&self) -> Option<&[Row]> {
        match self.state.execution_state {
            ExecutionState::Finished => Some(&self.state.rows),
            _ => None,
        }
    }

    /// Snapshot of the complete result, available only once `Finished`
    pub fn results(&self) -> Option<QueryResults> {
        (self.state.execution_state == ExecutionState::Finished).then(|| self.state.to_results())
    }

    /// Consume the session into its result, available only once `Finished`
    pub fn into_results(self) -> Option<QueryResults> {
        match self.state.execution_state {
            ExecutionState::Finished => Some(self.state.into_results()),
            _ => None,
        }
    }

    /// Fetch the query info document as raw text.
    ///
    /// The engine keeps this document for a limited time (about 15 minutes)
    /// after completion. Returns `Ok(None)` if the server never sent an info
    /// URI.
    pub async fn get_info(&self) -> Result<Option<String>> {
        let Some(info_uri) = self.state.info_uri.clone() else {
            return Ok(None);
        };

        let request = HttpRequest::get(info_uri).with_headers(self.config.identity_headers());
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(protocol_error(&response));
        }
        Ok(Some(response.text()))
    }

    /// [`get_info`](Self::get_info) decoded as JSON
    pub async fn get_info_json(&self) -> Result<Option<JsonValue>> {
        match self.get_info().await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Ask the server to cancel the query.
    ///
    /// `true` only if the server answered 204; `false` for any other status,
    /// a transport failure, or when no cancel URI is known. The session state
    /// is not changed.
    pub async fn cancel(&self) -> bool {
        match self.cancel_handle() {
            Some(handle) => handle.cancel().await,
            None => {
                debug!("[ENGINE_QUERY] Cancel requested but no cancel URI is known");
                false
            },
        }
    }

    /// Owned cancellation handle for use from another task
    pub fn cancel_handle(&self) -> Option<CancelHandle> {
        let uri = self.state.cancel_uri.clone()?;
        Some(CancelHandle::new(
            uri,
            self.config.identity_headers(),
            Arc::clone(&self.transport),
        ))
    }

    pub fn state(&self) -> ExecutionState {
        self.state.execution_state
    }

    /// Last raw state tag reported by the server
    pub fn server_state(&self) -> Option<&str> {
        self.state.server_state.as_deref()
    }

    pub fn query_id(&self) -> Option<&str> {
        self.state.query_id.as_deref()
    }

    pub fn columns(&self) -> &[Column] {
        &self.state.columns
    }

    pub fn stats(&self) -> Option<&QueryStats> {
        self.state.stats.as_ref()
    }

    /// Error reported by the server, if any
    pub fn error(&self) -> Option<&ErrorDetail> {
        self.state.error.as_ref()
    }

    pub fn continuation_uri(&self) -> Option<&str> {
        self.state.continuation_uri.as_deref()
    }

    pub fn info_uri(&self) -> Option<&str> {
        self.state.info_uri.as_deref()
    }

    pub fn cancel_uri(&self) -> Option<&str> {
        self.state.cancel_uri.as_deref()
    }

    /// Rows accumulated so far, whatever the state
    pub fn rows_received(&self) -> usize {
        self.state.rows.len()
    }

    /// Continuation polls performed since submission
    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn ensure_not_failed(&self) -> Result<()> {
        if self.state.execution_state != ExecutionState::Failed {
            return Ok(());
        }
        let state = self
            .state
            .server_state
            .clone()
            .unwrap_or_else(|| ExecutionState::Failed.to_string());
        let message = self
            .state
            .error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "server reported a failure state".to_string());
        warn!(
            "[ENGINE_QUERY] Query failed: query_id={} state={} message=\"{}\"",
            self.state.query_id.as_deref().unwrap_or("?"),
            state,
            message
        );
        Err(EngineLinkError::QueryFailed { state, message })
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let idempotent = request.method.is_idempotent();
        let transport = &self.transport;
        self.config
            .retry
            .run(idempotent, || transport.send(request.clone()))
            .await
    }
}

impl std::fmt::Debug for QuerySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySession")
            .field("endpoint", &self.config.endpoint)
            .field("state", &self.state.execution_state)
            .field("query_id", &self.state.query_id)
            .field("rows", &self.state.rows.len())
            .field("polls", &self.polls)
            .finish()
    }
}

/// Status must be exactly 200 and the body a status envelope
fn decode_success(response: HttpResponse) -> Result<StatusEnvelope> {
    if response.status != 200 {
        return Err(protocol_error(&response));
    }
    StatusEnvelope::decode(&response.body)
}

fn protocol_error(response: &HttpResponse) -> EngineLinkError {
    let message = match StatusEnvelope::decode(&response.body) {
        Ok(StatusEnvelope {
            error: Some(error), ..
        }) => error.to_string(),
        _ => {
            let text = response.text();
            if text.trim().is_empty() {
                "empty response body".to_string()
            } else {
                text.chars().take(MAX_ERROR_BODY_CHARS).collect()
            }
        },
    };
    warn!(
        "[ENGINE_HTTP] Server error: status={} message=\"{}\"",
        response.status, message
    );
    EngineLinkError::ProtocolError {
        status_code: response.status,
        message,
    }
}
