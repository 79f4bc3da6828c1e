//! Per-session configuration.
//!
//! Identity fields are fixed when the session is built; the request headers
//! derived from them are rebuilt for every request and never stored.

use std::time::Duration;

use crate::{auth::AuthProvider, retry::RetryPolicy};

/// Default header prefix for identity headers (`X-Engine-User`, ...)
pub const DEFAULT_HEADER_PREFIX: &str = "X-Engine";

/// Default client source reported in `User-Agent`
pub const DEFAULT_SOURCE: &str = "engine-link";

pub const DEFAULT_USER: &str = "engine";
pub const DEFAULT_CATALOG: &str = "hive";
pub const DEFAULT_SCHEMA: &str = "default";

/// Default delay between continuation polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Everything a [`QuerySession`](crate::QuerySession) needs besides a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Statement submission URL, e.g. `http://engine:8080/v1/statement`
    pub endpoint: String,

    pub catalog: String,

    pub schema: String,

    pub user: String,

    /// Client name reported as the first half of `User-Agent`
    pub source: String,

    /// Client version reported as the second half of `User-Agent`
    pub client_version: String,

    /// Prefix of the identity headers; `X-Presto` and `X-Trino` engines
    /// expect their own product name here
    pub header_prefix: String,

    /// Delay between continuation polls used by `QuerySession::execute`
    pub poll_interval: Duration,

    /// Overall deadline for the polling loop; `None` polls until the server
    /// ends the continuation chain
    pub query_timeout: Option<Duration>,

    /// Retry policy for transport failures
    pub retry: RetryPolicy,

    pub auth: AuthProvider,

    /// Additional static headers sent with every request
    pub extra_headers: Vec<(String, String)>,
}

impl SessionConfig {
    /// Configuration with defaults for everything but the endpoint and catalog
    pub fn new(endpoint: impl Into<String>, catalog: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            catalog: catalog.into(),
            ..Self::default()
        }
    }

    /// `User-Agent` value: `<source>/<version>`
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.source, self.client_version)
    }

    /// Headers sent with every request, in a fixed order.
    pub fn identity_headers(&self) -> Vec<(String, String)> {
        let prefix = self.header_prefix.trim_end_matches('-');
        let mut headers = Vec::with_capacity(5 + self.extra_headers.len());
        headers.push((format!("{}-User", prefix), self.user.clone()));
        headers.push((format!("{}-Catalog", prefix), self.catalog.clone()));
        headers.push((format!("{}-Schema", prefix), self.schema.clone()));
        headers.push(("User-Agent".to_string(), self.user_agent()));
        if let Some(authorization) = self.auth.authorization_header() {
            headers.push(("Authorization".to_string(), authorization));
        }
        headers.extend(self.extra_headers.iter().cloned());
        headers
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            catalog: DEFAULT_CATALOG.to_string(),
            schema: DEFAULT_SCHEMA.to_string(),
            user: DEFAULT_USER.to_string(),
            source: DEFAULT_SOURCE.to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            header_prefix: DEFAULT_HEADER_PREFIX.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            query_timeout: None,
            retry: RetryPolicy::default(),
            auth: AuthProvider::None,
            extra_headers: Vec::new(),
        }
    }
}
