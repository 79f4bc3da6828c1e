//! # engine-link
//!
//! Client for a distributed SQL engine's asynchronous HTTP statement
//! protocol.
//!
//! A statement is POSTed to the engine, which executes it out-of-band and
//! answers with a status envelope. Each envelope may carry a batch of rows
//! and a continuation URI; the client follows continuation URIs until the
//! server stops sending one, accumulating every batch in order.
//!
//! ## Features
//!
//! - **Query sessions**: one [`QuerySession`] per statement with an explicit,
//!   monotonic [`ExecutionState`]
//! - **Pluggable transport**: [`HttpTransport`] seam with a `reqwest`
//!   implementation
//! - **Bounded retries**: exponential backoff on transport failures only
//! - **Diagnostics and cancellation**: query info document and partial-cancel
//!   URI, including an owned [`CancelHandle`] for use from another task
//!
//! ## Example
//!
//! ```rust,no_run
//! use engine_link::{AuthProvider, EngineLinkClient};
//!
//! # async fn example() -> engine_link::Result<()> {
//! let client = EngineLinkClient::builder()
//!     .endpoint("http://localhost:8080/v1/statement")
//!     .catalog("hive")
//!     .schema("default")
//!     .user("alice")
//!     .auth(AuthProvider::basic_auth("alice".into(), "secret".into()))
//!     .build()?;
//!
//! let results = client.execute_query("SELECT 1").await?;
//! assert_eq!(results.rows.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod retry;
pub mod session;
pub mod timeouts;
pub mod transport;

pub use auth::AuthProvider;
pub use client::{EngineLinkClient, EngineLinkClientBuilder};
pub use config::SessionConfig;
pub use error::{EngineLinkError, Result, TransportErrorKind};
pub use models::{
    Column, ErrorDetail, ExecutionState, HttpVersion, QueryResults, QueryStats, Row, StatusEnvelope,
};
pub use retry::RetryPolicy;
pub use session::{CancelHandle, QuerySession};
pub use timeouts::{EngineLinkTimeouts, EngineLinkTimeoutsBuilder};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
