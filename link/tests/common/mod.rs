#![allow(dead_code)]
//! Shared helpers for engine-link integration tests.
//!
//! [`ScriptedTransport`] answers requests from a fixed script, in order, and
//! records every request it sees so tests can assert on the exact traffic.

use engine_link::{
    EngineLinkError, HttpRequest, HttpResponse, HttpTransport, QuerySession, Result, RetryPolicy,
    SessionConfig, TransportErrorKind,
};
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ENDPOINT: &str = "http://engine:8080/v1/statement";

/// Poll interval short enough to keep tests fast
pub const FAST_POLL: Duration = Duration::from_millis(1);

pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Result<HttpResponse>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Every request sent so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Replies not consumed yet
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(EngineLinkError::TransportError {
                kind: TransportErrorKind::Other,
                message: format!("script exhausted at {} {}", request.method, request.url),
            })
        })
    }
}

/// 200 response carrying `body` as JSON
pub fn ok(body: JsonValue) -> Result<HttpResponse> {
    Ok(HttpResponse::new(200, body.to_string()))
}

pub fn status(code: u16, body: &str) -> Result<HttpResponse> {
    Ok(HttpResponse::new(code, body.to_string()))
}

pub fn transport_error(kind: TransportErrorKind) -> Result<HttpResponse> {
    Err(EngineLinkError::TransportError {
        kind,
        message: format!("simulated {} failure", kind),
    })
}

/// Config with retries that back off for at most a few milliseconds
pub fn test_config() -> SessionConfig {
    let mut config = SessionConfig::new(ENDPOINT, "hive");
    config.user = "alice".into();
    config.schema = "web".into();
    config.poll_interval = FAST_POLL;
    config.retry = RetryPolicy::new(2, Duration::from_millis(1), Duration::from_millis(2), 2.0);
    config
}

pub fn session_with(replies: Vec<Result<HttpResponse>>) -> (QuerySession, Arc<ScriptedTransport>) {
    session_with_config(test_config(), replies)
}

pub fn session_with_config(
    config: SessionConfig,
    replies: Vec<Result<HttpResponse>>,
) -> (QuerySession, Arc<ScriptedTransport>) {
    let transport = ScriptedTransport::new(replies);
    let session = QuerySession::new(Arc::new(config), transport.clone());
    (session, transport)
}
