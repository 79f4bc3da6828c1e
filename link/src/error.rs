//! Error types for engine-link.
//!
//! Every failure surfaces synchronously as the result of the call that
//! triggered it. Nothing is swallowed; either a session reaches `Finished`
//! with its full result set or the caller receives one of these errors.

use std::time::Duration;

use thiserror::Error;

use crate::models::ExecutionState;

/// Result type for engine-link operations
pub type Result<T> = std::result::Result<T, EngineLinkError>;

/// Why a request could not be performed at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection could not be established (DNS, refused, TLS handshake).
    /// The request never reached the server.
    Connect,
    /// The request was sent but no complete answer arrived in time.
    Timeout,
    /// Any other transport failure (body read, protocol violation, ...).
    Other,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportErrorKind::Connect => write!(f, "connect"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Other => write!(f, "transport"),
        }
    }
}

/// Errors that can occur while talking to the engine
#[derive(Error, Debug)]
pub enum EngineLinkError {
    /// The underlying HTTP request could not be performed.
    #[error("Transport error ({kind}): {message}")]
    TransportError {
        kind: TransportErrorKind,
        message: String,
    },

    /// The server answered with a non-success HTTP status.
    #[error("Protocol error (HTTP {status_code}): {message}")]
    ProtocolError { status_code: u16, message: String },

    /// The server reported a failure state while the query was still
    /// being driven through its continuation chain.
    #[error("Query failed with state {state}: {message}")]
    QueryFailed { state: String, message: String },

    /// The continuation chain ended but the query is not `Finished`.
    #[error("Incoherent state at end of query: {state} (server state: {})", .server_state.as_deref().unwrap_or("none"))]
    IncoherentState {
        state: ExecutionState,
        server_state: Option<String>,
    },

    /// The call was rejected before any network traffic.
    #[error("Invalid usage: {0}")]
    InvalidUsage(String),

    /// A success response carried a body that is not a status envelope.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The overall query deadline elapsed while polling.
    #[error("Query timed out after {elapsed:?}")]
    QueryTimeout { elapsed: Duration },
}

impl EngineLinkError {
    pub(crate) fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        EngineLinkError::TransportError {
            kind,
            message: message.into(),
        }
    }

    /// Only transport failures are ever worth another attempt.
    pub fn is_retriable(&self) -> bool {
        matches!(self, EngineLinkError::TransportError { .. })
    }

    /// Transport failure kind, if this is a transport error
    pub fn transport_kind(&self) -> Option<TransportErrorKind> {
        match self {
            EngineLinkError::TransportError { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// HTTP status of a protocol error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            EngineLinkError::ProtocolError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Server-side disagreement with the client: bad status or a reported
    /// failure state.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            EngineLinkError::ProtocolError { .. } | EngineLinkError::QueryFailed { .. }
        )
    }
}

impl From<reqwest::Error> for EngineLinkError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_timeout() {
            TransportErrorKind::Timeout
        } else {
            TransportErrorKind::Other
        };
        EngineLinkError::transport(kind, err.to_string())
    }
}

impl From<serde_json::Error> for EngineLinkError {
    fn from(err: serde_json::Error) -> Self {
        EngineLinkError::SerializationError(err.to_string())
    }
}
