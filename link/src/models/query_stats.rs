use serde::{Deserialize, Serialize};

/// Execution statistics attached to a status envelope (`stats`).
///
/// Only `state` drives the client; the counters are kept for progress
/// reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStats {
    /// Server execution state tag, e.g. "QUEUED", "RUNNING", "FINISHED", "FAILED"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default)]
    pub queued: bool,

    #[serde(default)]
    pub scheduled: bool,

    #[serde(default)]
    pub nodes: u64,

    #[serde(default)]
    pub total_splits: u64,

    #[serde(default)]
    pub queued_splits: u64,

    #[serde(default)]
    pub running_splits: u64,

    #[serde(default)]
    pub completed_splits: u64,

    #[serde(default)]
    pub cpu_time_millis: u64,

    #[serde(default)]
    pub wall_time_millis: u64,

    #[serde(default)]
    pub processed_rows: u64,

    #[serde(default)]
    pub processed_bytes: u64,
}

impl QueryStats {
    /// Completed splits as a percentage of total splits.
    ///
    /// Returns `None` until the server has scheduled any splits.
    pub fn progress_percentage(&self) -> Option<f64> {
        if self.total_splits == 0 {
            return None;
        }
        Some(self.completed_splits as f64 * 100.0 / self.total_splits as f64)
    }
}
