//! Timeout configuration for engine-link requests.
//!
//! These bound individual HTTP requests. The overall lifetime of a query is
//! bounded separately by `SessionConfig::query_timeout`.

use std::time::Duration;

/// Per-request timeout configuration.
///
/// # Examples
///
/// ```rust
/// use engine_link::EngineLinkTimeouts;
/// use std::time::Duration;
///
/// // Use defaults (recommended for most cases)
/// let timeouts = EngineLinkTimeouts::default();
///
/// // Custom timeouts for high-latency environments
/// let timeouts = EngineLinkTimeouts::builder()
///     .connection_timeout(Duration::from_secs(60))
///     .request_timeout(Duration::from_secs(120))
///     .build();
///
/// // Aggressive timeouts for local development
/// let timeouts = EngineLinkTimeouts::fast();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineLinkTimeouts {
    /// Timeout for establishing connections (TCP + TLS handshake).
    /// Default: 10 seconds
    pub connection_timeout: Duration,

    /// Timeout for a whole request, from send until the body is read.
    /// Set to 0 to disable.
    /// Default: 30 seconds
    pub request_timeout: Duration,
}

impl Default for EngineLinkTimeouts {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl EngineLinkTimeouts {
    /// Create a new builder for custom timeout configuration.
    pub fn builder() -> EngineLinkTimeoutsBuilder {
        EngineLinkTimeoutsBuilder::new()
    }

    /// Short timeouts suitable for a local engine.
    pub fn fast() -> Self {
        Self {
            connection_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
        }
    }

    /// Long timeouts for remote or overloaded clusters.
    pub fn relaxed() -> Self {
        Self {
            connection_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Check if a duration represents "no timeout" (zero or very large).
    pub fn is_no_timeout(duration: Duration) -> bool {
        duration.is_zero() || duration > Duration::from_secs(86400 * 365)
    }
}

/// Builder for creating custom [`EngineLinkTimeouts`] configurations.
#[derive(Debug, Clone)]
pub struct EngineLinkTimeoutsBuilder {
    timeouts: EngineLinkTimeouts,
}

impl EngineLinkTimeoutsBuilder {
    fn new() -> Self {
        Self {
            timeouts: EngineLinkTimeouts::default(),
        }
    }

    /// Set the connection timeout (TCP + TLS handshake).
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connection_timeout = timeout;
        self
    }

    /// Set the connection timeout in seconds.
    pub fn connection_timeout_secs(self, secs: u64) -> Self {
        self.connection_timeout(Duration::from_secs(secs))
    }

    /// Set the per-request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request_timeout = timeout;
        self
    }

    /// Set the per-request timeout in seconds. 0 disables it.
    pub fn request_timeout_secs(self, secs: u64) -> Self {
        self.request_timeout(Duration::from_secs(secs))
    }

    /// Build the timeout configuration.
    pub fn build(self) -> EngineLinkTimeouts {
        self.timeouts
    }
}
