//! Main engine-link client with builder pattern.
//!
//! The client holds the immutable session configuration and the transport;
//! every statement runs in its own [`QuerySession`].

use log::debug;
use std::{sync::Arc, time::Duration};

use crate::{
    auth::AuthProvider,
    config::SessionConfig,
    error::{EngineLinkError, Result},
    models::{HttpVersion, QueryResults},
    retry::RetryPolicy,
    session::QuerySession,
    timeouts::EngineLinkTimeouts,
    transport::{HttpTransport, ReqwestTransport},
};

/// Main engine client.
///
/// Use [`EngineLinkClientBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust,no_run
/// use engine_link::EngineLinkClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = EngineLinkClient::builder()
///     .endpoint("http://localhost:8080/v1/statement")
///     .catalog("hive")
///     .user("alice")
///     .build()?;
///
/// let results = client.execute_query("SELECT 1").await?;
/// println!("Rows: {:?}", results.rows);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EngineLinkClient {
    config: Arc<SessionConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl EngineLinkClient {
    /// Create a new builder for configuring the client
    pub fn builder() -> EngineLinkClientBuilder {
        EngineLinkClientBuilder::new()
    }

    /// Client over an explicit transport, skipping endpoint validation
    pub fn with_transport(config: SessionConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// A fresh session for one statement
    pub fn session(&self) -> QuerySession {
        QuerySession::new(Arc::clone(&self.config), Arc::clone(&self.transport))
    }

    /// Run `sql` to completion in a new session and return its results
    pub async fn execute_query(&self, sql: &str) -> Result<QueryResults> {
        let mut session = self.session();
        session.execute(sql).await?;
        let state = session.state();
        let server_state = session.server_state().map(str::to_string);
        session
            .into_results()
            .ok_or(EngineLinkError::IncoherentState {
                state,
                server_state,
            })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl std::fmt::Debug for EngineLinkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineLinkClient")
            .field("endpoint", &self.config.endpoint)
            .field("catalog", &self.config.catalog)
            .field("schema", &self.config.schema)
            .field("user", &self.config.user)
            .finish()
    }
}

/// Builder for configuring [`EngineLinkClient`] instances.
pub struct EngineLinkClientBuilder {
    endpoint: Option<String>,
    config: SessionConfig,
    timeouts: EngineLinkTimeouts,
    http_version: HttpVersion,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl EngineLinkClientBuilder {
    fn new() -> Self {
        Self {
            endpoint: None,
            config: SessionConfig::default(),
            timeouts: EngineLinkTimeouts::default(),
            http_version: HttpVersion::default(),
            transport: None,
        }
    }

    /// Set the statement submission URL (required)
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.config.catalog = catalog.into();
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.config.schema = schema.into();
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = user.into();
        self
    }

    /// Set the client source and version reported as `User-Agent`
    pub fn client_info(mut self, source: impl Into<String>, version: impl Into<String>) -> Self {
        self.config.source = source.into();
        self.config.client_version = version.into();
        self
    }

    /// Set the identity header prefix, e.g. `X-Presto`
    pub fn header_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.header_prefix = prefix.into();
        self
    }

    /// Add a static header sent with every request
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Set authentication provider
    pub fn auth(mut self, auth: AuthProvider) -> Self {
        self.config.auth = auth;
        self
    }

    /// Set bearer token authentication
    pub fn jwt_token(mut self, token: impl Into<String>) -> Self {
        self.config.auth = AuthProvider::jwt_token(token.into());
        self
    }

    /// Delay between continuation polls used by `execute_query`
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Overall deadline for a query's polling loop
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.config.query_timeout = Some(timeout);
        self
    }

    /// Set maximum number of retries for transport failures
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set request timeout (per HTTP request)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request_timeout = timeout;
        self
    }

    /// Set the full timeout configuration
    pub fn timeouts(mut self, timeouts: EngineLinkTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the HTTP protocol version to use
    pub fn http_version(mut self, version: HttpVersion) -> Self {
        self.http_version = version;
        self
    }

    /// Use a custom transport instead of the built-in reqwest one
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<EngineLinkClient> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| EngineLinkError::ConfigurationError("endpoint is required".into()))?;
        validate_endpoint(&endpoint)?;

        if self.config.catalog.trim().is_empty() {
            return Err(EngineLinkError::ConfigurationError("catalog must not be empty".into()));
        }
        if self.config.user.trim().is_empty() {
            return Err(EngineLinkError::ConfigurationError("user must not be empty".into()));
        }

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.timeouts, self.http_version)?),
        };

        let config = SessionConfig {
            endpoint,
            ..self.config
        };
        debug!(
            "[CLIENT] Built client endpoint={} catalog={} schema={} user={} max_retries={}",
            config.endpoint, config.catalog, config.schema, config.user, config.retry.max_retries
        );

        Ok(EngineLinkClient::with_transport(config, transport))
    }
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = reqwest::Url::parse(endpoint).map_err(|e| {
        EngineLinkError::ConfigurationError(format!("invalid endpoint '{}': {}", endpoint, e))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(EngineLinkError::ConfigurationError(format!(
            "unsupported endpoint scheme '{}'",
            other
        ))),
    }
}
