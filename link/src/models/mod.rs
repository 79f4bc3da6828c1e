//! Data models for engine-link.
//!
//! Wire structures decoded from the engine's statement protocol plus the
//! client-side lifecycle and result types built from them.

pub mod column;
pub mod error_detail;
pub mod execution_state;
pub mod http_version;
pub mod query_results;
pub mod query_stats;
pub mod status_envelope;

#[cfg(test)]
mod tests;

pub use column::Column;
pub use error_detail::ErrorDetail;
pub use execution_state::ExecutionState;
pub use http_version::HttpVersion;
pub use query_results::QueryResults;
pub use query_stats::QueryStats;
pub use status_envelope::StatusEnvelope;

/// One result row; values are ordered by column position
pub type Row = Vec<serde_json::Value>;
