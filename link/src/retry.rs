//! Bounded retry with exponential backoff.
//!
//! Only transport failures are retried. A non-success HTTP status, an
//! undecodable body or a failure state reported by the server is final.
//!
//! ```text
//! Attempt 1: immediate
//! Attempt 2: wait initial_backoff
//! Attempt 3: wait initial_backoff * multiplier
//! ...        capped at max_backoff, at most max_retries extra attempts
//! ```
//!
//! Submission (POST) is only retried when the connection could not be
//! established, so a request that may have reached the server is never sent
//! twice. Idempotent requests (GET, DELETE) retry on any transport failure.

use log::warn;
use std::future::Future;
use std::time::Duration;

use crate::error::{EngineLinkError, Result, TransportErrorKind};

/// Retry policy configuration for exponential backoff.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first one
    pub max_retries: u32,

    /// Backoff before the first retry
    pub initial_backoff: Duration,

    /// Upper bound for any single backoff
    pub max_backoff: Duration,

    /// Growth factor between consecutive backoffs
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(
        max_retries: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
        backoff_multiplier: f64,
    ) -> Self {
        Self {
            max_retries,
            initial_backoff,
            max_backoff,
            backoff_multiplier,
        }
    }

    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Same policy with a different retry budget
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Backoff to wait before retry number `attempt` (0-indexed).
    ///
    /// `backoff = min(initial_backoff * multiplier^attempt, max_backoff)`
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.max(1.0).powi(attempt.min(i32::MAX as u32) as i32);
        let millis = self.initial_backoff.as_millis() as f64 * factor;
        let capped = millis.min(self.max_backoff.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Whether `err` may be retried for a request with the given idempotency
    pub fn should_retry(&self, err: &EngineLinkError, idempotent: bool) -> bool {
        if !err.is_retriable() {
            return false;
        }
        idempotent || err.transport_kind() == Some(TransportErrorKind::Connect)
    }

    /// Run `operation` until it succeeds, fails with a non-retriable error, or
    /// the retry budget is spent.
    pub async fn run<T, F, Fut>(&self, idempotent: bool, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_retries && self.should_retry(&err, idempotent) => {
                    let backoff = self.backoff_for(attempt);
                    attempt += 1;
                    warn!(
                        "[ENGINE_HTTP] Retriable error (attempt {}/{}): {} backoff_ms={}",
                        attempt,
                        self.max_retries + 1,
                        err,
                        backoff.as_millis()
                    );
                    tokio::time::sleep(backoff).await;
                },
                Err(err) => return Err(err),
            }
        }
    }
}
