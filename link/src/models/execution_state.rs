use serde::{Deserialize, Serialize};

/// Client-side view of where a query is in its lifecycle.
///
/// Transitions are monotonic: `NotStarted` → `Running` → `Finished` | `Failed`.
/// `Finished` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    /// Session constructed, nothing submitted yet
    #[default]
    NotStarted,

    /// Submitted and accepted by the server; results may still be arriving
    Running,

    /// Server reported completion; all rows have been received
    Finished,

    /// Server reported a failure (or cancellation) state
    Failed,
}

impl ExecutionState {
    /// Map a server `stats.state` tag onto the client lifecycle.
    ///
    /// Every in-progress stage the engine reports collapses to `Running`.
    /// Anything not recognised is treated as an engine-defined failure state.
    pub fn from_server_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "QUEUED" | "WAITING_FOR_RESOURCES" | "DISPATCHING" | "PLANNING" | "STARTING"
            | "RUNNING" | "BLOCKED" | "FINISHING" => ExecutionState::Running,
            "FINISHED" => ExecutionState::Finished,
            _ => ExecutionState::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionState::Finished | ExecutionState::Failed)
    }

    fn rank(&self) -> u8 {
        match self {
            ExecutionState::NotStarted => 0,
            ExecutionState::Running => 1,
            ExecutionState::Finished | ExecutionState::Failed => 2,
        }
    }

    /// Whether moving to `next` keeps the lifecycle monotonic.
    ///
    /// Staying in the same state is allowed; terminal states never change.
    pub fn can_transition_to(&self, next: ExecutionState) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionState::NotStarted => write!(f, "NOT_STARTED"),
            ExecutionState::Running => write!(f, "RUNNING"),
            ExecutionState::Finished => write!(f, "FINISHED"),
            ExecutionState::Failed => write!(f, "FAILED"),
        }
    }
}
