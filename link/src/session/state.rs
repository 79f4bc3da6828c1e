//! Accumulated state of one query and the single envelope merge.

use log::warn;

use crate::models::{Column, ErrorDetail, ExecutionState, QueryResults, QueryStats, Row, StatusEnvelope};

/// Everything the session has learned from the server so far.
///
/// Mutated only through [`SessionState::begin`] and [`SessionState::merge`].
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionState {
    pub(crate) execution_state: ExecutionState,
    /// Last raw `stats.state` tag
    pub(crate) server_state: Option<String>,
    pub(crate) query_id: Option<String>,
    pub(crate) continuation_uri: Option<String>,
    pub(crate) info_uri: Option<String>,
    pub(crate) cancel_uri: Option<String>,
    pub(crate) columns: Vec<Column>,
    /// Append-only for the lifetime of one submission
    pub(crate) rows: Vec<Row>,
    pub(crate) stats: Option<QueryStats>,
    pub(crate) error: Option<ErrorDetail>,
    pub(crate) update_type: Option<String>,
    pub(crate) update_count: Option<u64>,
}

impl SessionState {
    /// Start a fresh submission: empty rows, no URIs, `Running`.
    pub(crate) fn begin(&mut self) {
        *self = SessionState {
            execution_state: ExecutionState::Running,
            ..SessionState::default()
        };
    }

    /// Merge one decoded envelope. Returns the number of rows appended.
    ///
    /// - continuation URI: replaced, absence clears it
    /// - rows: batch appended in order
    /// - info / cancel URIs, query id, columns, error: last value wins, absence keeps
    /// - execution state: follows `stats.state`, forward only
    pub(crate) fn merge(&mut self, envelope: StatusEnvelope) -> usize {
        let StatusEnvelope {
            id,
            info_uri,
            next_uri,
            partial_cancel_uri,
            columns,
            data,
            stats,
            error,
            update_type,
            update_count,
        } = envelope;

        self.continuation_uri = next_uri;

        let appended = match data {
            Some(batch) => {
                let count = batch.len();
                self.rows.extend(batch);
                count
            },
            None => 0,
        };

        if info_uri.is_some() {
            self.info_uri = info_uri;
        }
        if partial_cancel_uri.is_some() {
            self.cancel_uri = partial_cancel_uri;
        }
        if id.is_some() {
            self.query_id = id;
        }
        if let Some(columns) = columns.filter(|c| !c.is_empty()) {
            self.columns = columns;
        }
        if error.is_some() {
            self.error = error;
        }
        if update_type.is_some() {
            self.update_type = update_type;
        }
        if update_count.is_some() {
            self.update_count = update_count;
        }

        if let Some(stats) = stats {
            if let Some(tag) = stats.state.as_deref() {
                let next = ExecutionState::from_server_tag(tag);
                if self.execution_state.can_transition_to(next) {
                    self.execution_state = next;
                } else {
                    warn!(
                        "[ENGINE_QUERY] Ignoring backward state transition {} -> {} (server tag {})",
                        self.execution_state, next, tag
                    );
                }
                self.server_state = Some(tag.to_string());
            }
            self.stats = Some(stats);
        }

        appended
    }

    pub(crate) fn to_results(&self) -> QueryResults {
        QueryResults {
            query_id: self.query_id.clone(),
            columns: self.columns.clone(),
            rows: self.rows.clone(),
            stats: self.stats.clone(),
            update_type: self.update_type.clone(),
            update_count: self.update_count,
        }
    }

    pub(crate) fn into_results(self) -> QueryResults {
        QueryResults {
            query_id: self.query_id,
            columns: self.columns,
            rows: self.rows,
            stats: self.stats,
            update_type: self.update_type,
            update_count: self.update_count,
        }
    }
}
